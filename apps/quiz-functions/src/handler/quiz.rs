//! # クイズハンドラ
//!
//! `Quizzes` テーブルに対する CRUD を提供する。
//!
//! ## 関数
//!
//! - `createQuiz` - クイズ作成（設問は空）
//! - `getAllQuizzes` - クイズ一覧（1 回のスキャン結果）
//! - `getQuizQuestions` - クイズ取得
//! - `addQuestion` - 設問の追加
//! - `deleteQuiz` - クイズ削除

use std::sync::Arc;

use quizbox_domain::{
    quiz::{Question, Quiz, deserialize_coordinates},
    quiz_id::{QuizId, QuizIdGenerator},
};
use quizbox_infra::repository::QuizRepository;
use quizbox_shared::{MessageBody, event_log::BusinessEvent, log_business_event};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::HandlerError,
    pipeline::{ApiEvent, ApiResponse},
};

/// パスパラメータ名
pub const QUIZ_ID_PARAM: &str = "quizId";

/// クイズ関数の共有状態
pub struct QuizState {
    pub repository:   Arc<dyn QuizRepository>,
    pub id_generator: Arc<dyn QuizIdGenerator>,
}

// --- リクエスト/レスポンス型 ---

/// クイズ作成リクエスト
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizRequest {
    pub quiz_name:  String,
    pub created_by: String,
}

/// クイズ作成レスポンス
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizResponse {
    pub quiz_id: QuizId,
    pub message: String,
}

/// 設問追加リクエスト
#[derive(Debug, Deserialize)]
pub struct AddQuestionRequest {
    pub question:    String,
    pub answer:      String,
    #[serde(default, deserialize_with = "deserialize_coordinates")]
    pub coordinates: Option<Value>,
}

impl From<AddQuestionRequest> for Question {
    fn from(req: AddQuestionRequest) -> Self {
        Self {
            question:    req.question,
            answer:      req.answer,
            coordinates: req.coordinates,
        }
    }
}

/// 設問追加レスポンス
#[derive(Debug, Serialize)]
pub struct AddQuestionResponse {
    pub questions: Vec<Question>,
}

// --- ハンドラ ---

/// createQuiz
///
/// 採番した ID で設問が空のクイズを保存する。
///
/// ## レスポンス
///
/// - `201 Created`: `{quizId, message}`
pub async fn create_quiz(
    state: Arc<QuizState>,
    event: ApiEvent,
) -> Result<ApiResponse, HandlerError> {
    let req: CreateQuizRequest = event.json_body()?;

    let quiz = Quiz::new(state.id_generator.generate(), req.quiz_name, req.created_by);
    state.repository.insert(&quiz).await?;

    log_business_event!(
        BusinessEvent::QuizCreated,
        event.entity_id = %quiz.quiz_id(),
        "クイズ作成"
    );

    ApiResponse::created(&CreateQuizResponse {
        quiz_id: quiz.quiz_id().clone(),
        message: "Quiz created successfully!".to_string(),
    })
}

/// getAllQuizzes
///
/// ## レスポンス
///
/// - `200 OK`: クイズの配列（空テーブルでは `[]`）
pub async fn get_all_quizzes(
    state: Arc<QuizState>,
    _event: ApiEvent,
) -> Result<ApiResponse, HandlerError> {
    let quizzes = state.repository.scan().await?;
    ApiResponse::ok(&quizzes)
}

/// getQuizQuestions
///
/// ## レスポンス
///
/// - `200 OK`: クイズ
/// - `404 Not Found`: クイズが見つからない
pub async fn get_quiz_questions(
    state: Arc<QuizState>,
    event: ApiEvent,
) -> Result<ApiResponse, HandlerError> {
    let quiz_id = QuizId::new(event.path_parameter(QUIZ_ID_PARAM)?);

    let quiz = state
        .repository
        .find_by_id(&quiz_id)
        .await?
        .ok_or_else(|| HandlerError::not_found("Quiz not found"))?;

    ApiResponse::ok(&quiz)
}

/// addQuestion
///
/// 設問をクイズの末尾に追加する。存在しないクイズへの追加は
/// 条件付き更新の失敗として 500 になる。
///
/// ## レスポンス
///
/// - `200 OK`: `{questions}`（追加後の設問リスト）
pub async fn add_question(
    state: Arc<QuizState>,
    event: ApiEvent,
) -> Result<ApiResponse, HandlerError> {
    let quiz_id = QuizId::new(event.path_parameter(QUIZ_ID_PARAM)?);
    let req: AddQuestionRequest = event.json_body()?;

    let questions = state
        .repository
        .append_question(&quiz_id, &req.into())
        .await?;

    log_business_event!(
        BusinessEvent::QuestionAdded,
        event.entity_id = %quiz_id,
        question_count = questions.len(),
        "設問追加"
    );

    ApiResponse::ok(&AddQuestionResponse { questions })
}

/// deleteQuiz
///
/// 存在しないクイズの削除も成功として扱う。
///
/// ## レスポンス
///
/// - `200 OK`: `{message}`
pub async fn delete_quiz(
    state: Arc<QuizState>,
    event: ApiEvent,
) -> Result<ApiResponse, HandlerError> {
    let quiz_id = QuizId::new(event.path_parameter(QUIZ_ID_PARAM)?);

    state.repository.delete(&quiz_id).await?;

    log_business_event!(
        BusinessEvent::QuizDeleted,
        event.entity_id = %quiz_id,
        "クイズ削除"
    );

    ApiResponse::ok(&MessageBody::new("Quiz deleted successfully"))
}
