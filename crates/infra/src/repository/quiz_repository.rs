//! # QuizRepository
//!
//! クイズの永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **1 操作 1 リクエスト**: 各メソッドは DynamoDB への呼び出しを 1 回だけ行う。
//!   リトライやページングはしない（`scan` は 1 ページ分のみ返す）
//! - **設問の追記**: `list_append` による条件付き更新でアトミックに追記する。
//!   存在しないクイズへの追記は [`InfraErrorKind::ConditionFailed`](crate::InfraErrorKind::ConditionFailed)
//! - **不正アイテム**: 読み出したアイテムが形式に合わない場合は、`find_by_id` も `scan` も
//!   [`InfraErrorKind::InvalidItem`](crate::InfraErrorKind::InvalidItem) で失敗する
//! - **上書き作成**: `insert` は条件なしの PutItem。ID が衝突した場合は既存アイテムを上書きする
//!
//! ## アイテム形式
//!
//! ```text
//! {
//!   "quizId":    S,
//!   "quizName":  S,
//!   "createdBy": S,
//!   "questions": L [ M { "question": S, "answer": S, "coordinates"?: <任意> } ]
//! }
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::{
    Client,
    error::DisplayErrorContext,
    operation::update_item::UpdateItemError,
    types::{AttributeValue, ReturnValue},
};
use quizbox_domain::{
    quiz::{Question, Quiz},
    quiz_id::QuizId,
};

use crate::{
    InfraError,
    attribute::{attribute_to_json, json_to_attribute},
};

pub(crate) const QUIZ_ID_ATTR: &str = "quizId";
const QUIZ_NAME_ATTR: &str = "quizName";
const CREATED_BY_ATTR: &str = "createdBy";
const QUESTIONS_ATTR: &str = "questions";
const QUESTION_ATTR: &str = "question";
const ANSWER_ATTR: &str = "answer";
const COORDINATES_ATTR: &str = "coordinates";

/// クイズリポジトリトレイト
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// クイズを保存する（同一 ID のアイテムは上書き）
    async fn insert(&self, quiz: &Quiz) -> Result<(), InfraError>;

    /// テーブルを 1 回スキャンし、得られたクイズを返す
    ///
    /// 変換できないアイテムが 1 件でもあれば `InvalidItem` エラー。
    async fn scan(&self) -> Result<Vec<Quiz>, InfraError>;

    /// ID でクイズを取得する
    async fn find_by_id(&self, quiz_id: &QuizId) -> Result<Option<Quiz>, InfraError>;

    /// 設問を末尾に追加し、更新後の設問リストを返す
    ///
    /// クイズが存在しない場合は `ConditionFailed` エラー。
    async fn append_question(
        &self,
        quiz_id: &QuizId,
        question: &Question,
    ) -> Result<Vec<Question>, InfraError>;

    /// クイズを削除する（存在しなくても成功）
    async fn delete(&self, quiz_id: &QuizId) -> Result<(), InfraError>;
}

/// DynamoDB 実装の QuizRepository
pub struct DynamoDbQuizRepository {
    client:     Client,
    table_name: String,
}

impl DynamoDbQuizRepository {
    pub fn new(client: Client, table_name: String) -> Self {
        Self { client, table_name }
    }
}

#[async_trait]
impl QuizRepository for DynamoDbQuizRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(quiz_id = %quiz.quiz_id()))]
    async fn insert(&self, quiz: &Quiz) -> Result<(), InfraError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(quiz_to_item(quiz)))
            .send()
            .await
            .map_err(|e| {
                InfraError::dynamo_db(format!("クイズの保存に失敗: {}", DisplayErrorContext(&e)))
            })?;

        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn scan(&self) -> Result<Vec<Quiz>, InfraError> {
        let output = self
            .client
            .scan()
            .table_name(&self.table_name)
            .send()
            .await
            .map_err(|e| {
                InfraError::dynamo_db(format!("クイズ一覧の取得に失敗: {}", DisplayErrorContext(&e)))
            })?;

        if output.last_evaluated_key().is_some() {
            tracing::debug!("スキャン結果に続きがありますが、1 ページ目のみ返します");
        }

        quizzes_from_items(output.items())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%quiz_id))]
    async fn find_by_id(&self, quiz_id: &QuizId) -> Result<Option<Quiz>, InfraError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(QUIZ_ID_ATTR, AttributeValue::S(quiz_id.to_string()))
            .send()
            .await
            .map_err(|e| {
                InfraError::dynamo_db(format!("クイズの取得に失敗: {}", DisplayErrorContext(&e)))
            })?;

        output.item().map(quiz_from_item).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%quiz_id))]
    async fn append_question(
        &self,
        quiz_id: &QuizId,
        question: &Question,
    ) -> Result<Vec<Question>, InfraError> {
        let output = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(QUIZ_ID_ATTR, AttributeValue::S(quiz_id.to_string()))
            .update_expression("SET questions = list_append(questions, :q)")
            .condition_expression("attribute_exists(quizId)")
            .expression_attribute_values(
                ":q",
                AttributeValue::L(vec![AttributeValue::M(question_to_item(question))]),
            )
            .return_values(ReturnValue::UpdatedNew)
            .send()
            .await
            .map_err(|e| {
                let condition_failed = e
                    .as_service_error()
                    .is_some_and(UpdateItemError::is_conditional_check_failed_exception);
                if condition_failed {
                    InfraError::condition_failed("Quiz", quiz_id.as_str())
                } else {
                    InfraError::dynamo_db(format!("設問の追加に失敗: {}", DisplayErrorContext(&e)))
                }
            })?;

        let attributes = output.attributes().ok_or_else(|| {
            InfraError::invalid_item("更新後の属性が返されませんでした".to_string())
        })?;

        questions_from_attributes(attributes)
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%quiz_id))]
    async fn delete(&self, quiz_id: &QuizId) -> Result<(), InfraError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key(QUIZ_ID_ATTR, AttributeValue::S(quiz_id.to_string()))
            .send()
            .await
            .map_err(|e| {
                InfraError::dynamo_db(format!("クイズの削除に失敗: {}", DisplayErrorContext(&e)))
            })?;

        Ok(())
    }
}

// ===== アイテム変換 =====

/// Quiz を DynamoDB アイテムに変換する
fn quiz_to_item(quiz: &Quiz) -> HashMap<String, AttributeValue> {
    let mut item = HashMap::new();
    item.insert(
        QUIZ_ID_ATTR.to_string(),
        AttributeValue::S(quiz.quiz_id().to_string()),
    );
    item.insert(
        QUIZ_NAME_ATTR.to_string(),
        AttributeValue::S(quiz.quiz_name().to_string()),
    );
    item.insert(
        CREATED_BY_ATTR.to_string(),
        AttributeValue::S(quiz.created_by().to_string()),
    );
    item.insert(
        QUESTIONS_ATTR.to_string(),
        AttributeValue::L(
            quiz.questions()
                .iter()
                .map(|q| AttributeValue::M(question_to_item(q)))
                .collect(),
        ),
    );
    item
}

/// Question を DynamoDB のマップに変換する
fn question_to_item(question: &Question) -> HashMap<String, AttributeValue> {
    let mut item = HashMap::new();
    item.insert(
        QUESTION_ATTR.to_string(),
        AttributeValue::S(question.question.clone()),
    );
    item.insert(
        ANSWER_ATTR.to_string(),
        AttributeValue::S(question.answer.clone()),
    );
    if let Some(coordinates) = &question.coordinates {
        item.insert(COORDINATES_ATTR.to_string(), json_to_attribute(coordinates));
    }
    item
}

/// スキャン結果を Quiz に変換する（1 件でも不正なら全体を失敗にする）
fn quizzes_from_items(items: &[HashMap<String, AttributeValue>]) -> Result<Vec<Quiz>, InfraError> {
    items.iter().map(quiz_from_item).collect()
}

/// DynamoDB アイテムを Quiz に変換する
fn quiz_from_item(item: &HashMap<String, AttributeValue>) -> Result<Quiz, InfraError> {
    let quiz_id = get_s(item, QUIZ_ID_ATTR)?;
    let quiz_name = get_s(item, QUIZ_NAME_ATTR)?;
    let created_by = get_s(item, CREATED_BY_ATTR)?;
    let questions = questions_from_attributes(item)?;

    Ok(Quiz::from_stored(
        QuizId::new(quiz_id),
        quiz_name,
        created_by,
        questions,
    ))
}

/// `questions` 属性を設問リストに変換する（属性がなければ空）
fn questions_from_attributes(
    attributes: &HashMap<String, AttributeValue>,
) -> Result<Vec<Question>, InfraError> {
    let Some(value) = attributes.get(QUESTIONS_ATTR) else {
        return Ok(Vec::new());
    };
    let list = value.as_l().map_err(|_| {
        InfraError::invalid_item(format!("属性 '{QUESTIONS_ATTR}' がリストではありません"))
    })?;

    list.iter()
        .map(|entry| {
            let map = entry.as_m().map_err(|_| {
                InfraError::invalid_item("設問がマップではありません".to_string())
            })?;
            question_from_item(map)
        })
        .collect()
}

/// DynamoDB のマップを Question に変換する
fn question_from_item(item: &HashMap<String, AttributeValue>) -> Result<Question, InfraError> {
    let coordinates = item
        .get(COORDINATES_ATTR)
        .map(attribute_to_json)
        .transpose()?;

    Ok(Question {
        question: get_s(item, QUESTION_ATTR)?,
        answer: get_s(item, ANSWER_ATTR)?,
        coordinates,
    })
}

/// DynamoDB アイテムから文字列属性を取得する
fn get_s(item: &HashMap<String, AttributeValue>, key: &str) -> Result<String, InfraError> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or_else(|| InfraError::invalid_item(format!("属性 '{key}' が見つかりません")))
}
