//! # 関数設定
//!
//! 環境変数から Lambda 関数の設定を読み込む。

use std::env;

use quizbox_domain::{DomainError, quiz_id::QuizIdStrategy};
use quizbox_functions::function::{FunctionName, UnknownFunction};
use thiserror::Error;

/// クイズテーブル名の既定値
const DEFAULT_QUIZZES_TABLE: &str = "Quizzes";

/// 設定エラー
#[derive(Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// 必須の環境変数が未設定
    #[error("環境変数 {0} が設定されていません")]
    Missing(&'static str),

    /// 関数名が不明
    #[error(transparent)]
    UnknownFunction(#[from] UnknownFunction),

    /// 値が不正
    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// Lambda 関数の設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionConfig {
    /// 担当する関数
    pub function:          FunctionName,
    /// クイズテーブル名
    pub quizzes_table:     String,
    /// クイズ ID の採番戦略
    pub quiz_id_strategy:  QuizIdStrategy,
    /// DynamoDB Local のエンドポイント（設定時はテーブルを自動作成する）
    pub dynamodb_endpoint: Option<String>,
    /// Cognito 互換エミュレータのエンドポイント
    pub cognito_endpoint:  Option<String>,
    /// Cognito アプリクライアント ID（ユーザー関数では必須）
    pub cognito_client_id: Option<String>,
}

impl FunctionConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// キーから値を引く関数で設定を読み込む
    ///
    /// 空文字列は未設定として扱う。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let function: FunctionName = get("QUIZBOX_FUNCTION")
            .or_else(|| get("_HANDLER"))
            .ok_or(ConfigError::Missing("QUIZBOX_FUNCTION"))?
            .parse()?;

        let quiz_id_strategy = match get("QUIZ_ID_STRATEGY") {
            Some(value) => value.parse::<QuizIdStrategy>()?,
            None => QuizIdStrategy::default(),
        };

        let cognito_client_id = get("COGNITO_CLIENT_ID");
        if matches!(function, FunctionName::User(_)) && cognito_client_id.is_none() {
            return Err(ConfigError::Missing("COGNITO_CLIENT_ID"));
        }

        Ok(Self {
            function,
            quizzes_table: get("QUIZZES_TABLE").unwrap_or_else(|| DEFAULT_QUIZZES_TABLE.to_string()),
            quiz_id_strategy,
            dynamodb_endpoint: get("DYNAMODB_ENDPOINT"),
            cognito_endpoint: get("COGNITO_ENDPOINT"),
            cognito_client_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use quizbox_functions::function::{QuizFunction, UserFunction};

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<FunctionConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        FunctionConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_関数名のみ指定した場合は既定値で補完される() {
        let config = load(&[("QUIZBOX_FUNCTION", "createQuiz")]).unwrap();

        assert_eq!(
            config,
            FunctionConfig {
                function:          FunctionName::Quiz(QuizFunction::CreateQuiz),
                quizzes_table:     "Quizzes".to_string(),
                quiz_id_strategy:  QuizIdStrategy::Timestamp,
                dynamodb_endpoint: None,
                cognito_endpoint:  None,
                cognito_client_id: None,
            }
        );
    }

    #[test]
    fn test_lambdaのハンドラパスから関数名を読み取る() {
        let config = load(&[("_HANDLER", "handler.getAllQuizzes")]).unwrap();

        assert_eq!(config.function, FunctionName::Quiz(QuizFunction::GetAllQuizzes));
    }

    #[test]
    fn test_quizbox_functionは_handlerより優先される() {
        let config = load(&[
            ("QUIZBOX_FUNCTION", "deleteQuiz"),
            ("_HANDLER", "handler.createQuiz"),
        ])
        .unwrap();

        assert_eq!(config.function, FunctionName::Quiz(QuizFunction::DeleteQuiz));
    }

    #[test]
    fn test_関数名がない場合はエラー() {
        assert_eq!(load(&[]), Err(ConfigError::Missing("QUIZBOX_FUNCTION")));
    }

    #[test]
    fn test_ユーザー関数はcognito_client_idが必須() {
        let result = load(&[("QUIZBOX_FUNCTION", "loginUser")]);

        assert_eq!(result, Err(ConfigError::Missing("COGNITO_CLIENT_ID")));
    }

    #[test]
    fn test_ユーザー関数の設定を読み込める() {
        let config = load(&[
            ("QUIZBOX_FUNCTION", "registerUser"),
            ("COGNITO_CLIENT_ID", "abc123"),
            ("COGNITO_ENDPOINT", "http://localhost:9229"),
        ])
        .unwrap();

        assert_eq!(config.function, FunctionName::User(UserFunction::RegisterUser));
        assert_eq!(config.cognito_client_id.as_deref(), Some("abc123"));
        assert_eq!(config.cognito_endpoint.as_deref(), Some("http://localhost:9229"));
    }

    #[test]
    fn test_オプション設定を読み込める() {
        let config = load(&[
            ("QUIZBOX_FUNCTION", "addQuestion"),
            ("QUIZZES_TABLE", "QuizzesDev"),
            ("QUIZ_ID_STRATEGY", "uuid"),
            ("DYNAMODB_ENDPOINT", "http://localhost:18000"),
        ])
        .unwrap();

        assert_eq!(config.quizzes_table, "QuizzesDev");
        assert_eq!(config.quiz_id_strategy, QuizIdStrategy::Uuid);
        assert_eq!(config.dynamodb_endpoint.as_deref(), Some("http://localhost:18000"));
    }

    #[test]
    fn test_空文字列は未設定として扱う() {
        let config = load(&[("QUIZBOX_FUNCTION", "createQuiz"), ("QUIZZES_TABLE", "")]).unwrap();

        assert_eq!(config.quizzes_table, "Quizzes");
    }

    #[test]
    fn test_不正な採番戦略はエラー() {
        let result = load(&[("QUIZBOX_FUNCTION", "createQuiz"), ("QUIZ_ID_STRATEGY", "random")]);

        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_不明な関数名はエラー() {
        let result = load(&[("QUIZBOX_FUNCTION", "updateQuiz")]);

        assert!(matches!(result, Err(ConfigError::UnknownFunction(_))));
    }
}
