//! # 関数名
//!
//! このプロセスが担当する Lambda 関数を表す。
//!
//! 関数名は `QUIZBOX_FUNCTION` または Lambda の `_HANDLER` 環境変数から読み取る。
//! `createQuiz` のような関数名と、`handler.createQuiz` のようなドット区切りの
//! ハンドラパスの両方を受け付ける（最後のセグメントを関数名とする）。
//!
//! クイズ関数とユーザー関数を別の列挙型にすることで、
//! 必要なクライアント（DynamoDB または Cognito）だけを作成できる。

use std::str::FromStr;

use thiserror::Error;

/// クイズ関数
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[strum(serialize_all = "camelCase")]
pub enum QuizFunction {
    CreateQuiz,
    GetAllQuizzes,
    GetQuizQuestions,
    AddQuestion,
    DeleteQuiz,
}

impl QuizFunction {
    /// 未分類の失敗時の応答メッセージ
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::CreateQuiz => "Failed to create quiz",
            Self::GetAllQuizzes => "Failed to fetch quizzes",
            Self::GetQuizQuestions => "Failed to fetch quiz",
            Self::AddQuestion => "Failed to add question",
            Self::DeleteQuiz => "Failed to delete quiz",
        }
    }

    /// リクエストボディを読むか
    pub fn consumes_body(self) -> bool {
        matches!(self, Self::CreateQuiz | Self::AddQuestion)
    }
}

/// ユーザー関数
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[strum(serialize_all = "camelCase")]
pub enum UserFunction {
    RegisterUser,
    LoginUser,
}

impl UserFunction {
    /// 未分類の失敗時の応答メッセージ
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::RegisterUser => "User registration failed",
            Self::LoginUser => "Login failed",
        }
    }
}

/// Lambda 関数名
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum FunctionName {
    #[display("{_0}")]
    Quiz(QuizFunction),
    #[display("{_0}")]
    User(UserFunction),
}

/// 不明な関数名
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("不明な関数名: {0}")]
pub struct UnknownFunction(pub String);

impl FromStr for FunctionName {
    type Err = UnknownFunction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.rsplit('.').next().unwrap_or(s).trim();

        if let Ok(function) = name.parse::<QuizFunction>() {
            return Ok(Self::Quiz(function));
        }
        if let Ok(function) = name.parse::<UserFunction>() {
            return Ok(Self::User(function));
        }
        Err(UnknownFunction(s.to_string()))
    }
}
