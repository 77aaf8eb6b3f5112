//! # DynamoDB クライアントとテーブル準備
//!
//! 本番のテーブルはデプロイ定義が作成する。[`ensure_quiz_table`] は
//! DynamoDB Local を相手にするローカル開発とテストでのみ使う。

use aws_sdk_dynamodb::{
    Client,
    error::SdkError,
    operation::create_table::CreateTableError,
    types::{AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType},
};

use crate::{InfraError, aws::load_sdk_config, repository::quiz_repository::QUIZ_ID_ATTR};

/// `endpoint` が `None` なら AWS 既定のエンドポイントに接続する
pub async fn create_client(endpoint: Option<&str>) -> Client {
    Client::new(&load_sdk_config(endpoint).await)
}

/// [`ensure_quiz_table`] の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStatus {
    Created,
    AlreadyExists,
}

/// `quizId`（S）を HASH キーとするオンデマンド課金のテーブルを用意する
///
/// 作成を先に試み、`ResourceInUseException` は既存とみなす。
/// 並行して起動した複数の関数が同時に呼んでも成功する。
pub async fn ensure_quiz_table(client: &Client, table_name: &str) -> Result<TableStatus, InfraError> {
    let key = KeySchemaElement::builder()
        .attribute_name(QUIZ_ID_ATTR)
        .key_type(KeyType::Hash)
        .build()
        .map_err(|e| InfraError::dynamo_db(format!("キースキーマが不正です: {e}")))?;
    let attribute = AttributeDefinition::builder()
        .attribute_name(QUIZ_ID_ATTR)
        .attribute_type(ScalarAttributeType::S)
        .build()
        .map_err(|e| InfraError::dynamo_db(format!("属性定義が不正です: {e}")))?;

    let outcome = client
        .create_table()
        .table_name(table_name)
        .key_schema(key)
        .attribute_definitions(attribute)
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await;

    match outcome {
        Ok(_) => {
            tracing::info!(table = table_name, "クイズテーブルを作成");
            Ok(TableStatus::Created)
        }
        Err(err) if is_resource_in_use(&err) => {
            tracing::debug!(table = table_name, "クイズテーブルは作成済み");
            Ok(TableStatus::AlreadyExists)
        }
        Err(err) => Err(InfraError::dynamo_db(format!(
            "テーブル {table_name} を作成できません: {}",
            aws_sdk_dynamodb::error::DisplayErrorContext(&err)
        ))),
    }
}

fn is_resource_in_use<R>(err: &SdkError<CreateTableError, R>) -> bool {
    err.as_service_error()
        .is_some_and(CreateTableError::is_resource_in_use_exception)
}
