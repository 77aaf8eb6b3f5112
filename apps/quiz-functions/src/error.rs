//! # 関数エラー定義
//!
//! ハンドラとパイプラインで発生するエラーを定義する。
//!
//! [`HandlerError::Http`] はステータスコードが明示された失敗で、
//! [`HttpErrorHandler`](crate::pipeline::HttpErrorHandler) がそのまま応答に変換する。
//! それ以外のバリアントは未分類の失敗として 500 になる。

use http::StatusCode;
use quizbox_infra::{InfraError, InfraErrorKind};
use quizbox_shared::event_log::ErrorCategory;
use serde_json::{Value, json};
use thiserror::Error;

/// ハンドラで発生するエラー
#[derive(Debug, Error)]
pub enum HandlerError {
    /// ステータスコード付きの失敗
    #[error("{message}（HTTP {status}）")]
    Http {
        status:  StatusCode,
        message: String,
        detail:  Option<Value>,
    },

    /// インフラ層のエラー
    #[error(transparent)]
    Infra(#[from] InfraError),

    /// レスポンスのシリアライズ失敗
    #[error("シリアライズエラー: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 内部エラー
    #[error("内部エラー: {0}")]
    Internal(String),
}

impl HandlerError {
    /// 400 Bad Request
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Http {
            status:  StatusCode::BAD_REQUEST,
            message: message.into(),
            detail:  None,
        }
    }

    /// 詳細付きの 400 Bad Request
    pub fn bad_request_with_detail(message: impl Into<String>, detail: Value) -> Self {
        Self::Http {
            status:  StatusCode::BAD_REQUEST,
            message: message.into(),
            detail:  Some(detail),
        }
    }

    /// 404 Not Found
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::Http {
            status:  StatusCode::NOT_FOUND,
            message: message.into(),
            detail:  None,
        }
    }

    /// ID プロバイダの拒否を 400 に変換する
    ///
    /// 拒否以外のインフラエラーはそのまま返す。
    pub fn from_identity_rejection(error: InfraError, message: impl Into<String>) -> Self {
        match error.as_identity_rejection() {
            Some((code, reason)) => Self::bad_request_with_detail(
                message,
                json!({ "code": code, "message": reason }),
            ),
            None => Self::Infra(error),
        }
    }

    /// エラー種別名（未分類エラーの応答 `error.type` に使う）
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Http { .. } => "Http",
            Self::Infra(e) => e.kind_name(),
            Self::Serialization(_) => "Serialization",
            Self::Internal(_) => "Internal",
        }
    }

    /// ログ出力用のエラーカテゴリ
    pub fn category(&self) -> &'static str {
        match self {
            Self::Infra(e) => match e.kind() {
                InfraErrorKind::Cognito(_) | InfraErrorKind::IdentityRejected { .. } => {
                    ErrorCategory::ExternalService.as_str()
                }
                _ => ErrorCategory::Infrastructure.as_str(),
            },
            _ => ErrorCategory::Internal.as_str(),
        }
    }

    /// 未分類エラーの応答に含めるシリアライズ表現
    pub fn to_detail(&self) -> Value {
        json!({
            "type": self.kind_name(),
            "message": self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_拒否エラーは詳細付きの400に変換される() {
        let infra = InfraError::identity_rejected("UsernameExistsException", "User already exists");

        let sut = HandlerError::from_identity_rejection(infra, "User registration failed");

        match sut {
            HandlerError::Http {
                status,
                message,
                detail,
            } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(message, "User registration failed");
                assert_eq!(
                    detail,
                    Some(json!({ "code": "UsernameExistsException", "message": "User already exists" }))
                );
            }
            other => panic!("Http バリアントになること: {other:?}"),
        }
    }

    #[test]
    fn test_拒否以外のインフラエラーはそのまま保持される() {
        let infra = InfraError::cognito("timeout");

        let sut = HandlerError::from_identity_rejection(infra, "Login failed");

        assert!(matches!(sut, HandlerError::Infra(_)));
        assert_eq!(sut.kind_name(), "Cognito");
        assert_eq!(sut.category(), ErrorCategory::ExternalService.as_str());
    }

    #[test]
    fn test_dynamo_dbエラーはインフラカテゴリになる() {
        let sut = HandlerError::from(InfraError::dynamo_db("throttled"));

        assert_eq!(sut.category(), ErrorCategory::Infrastructure.as_str());
        assert_eq!(
            sut.to_detail(),
            json!({ "type": "DynamoDb", "message": "DynamoDB 操作に失敗: throttled" })
        );
    }

    #[test]
    fn test_内部エラーの詳細は種別とメッセージを持つ() {
        let sut = HandlerError::Internal("壊れた状態".to_string());

        assert_eq!(
            sut.to_detail(),
            json!({ "type": "Internal", "message": "内部エラー: 壊れた状態" })
        );
    }
}
