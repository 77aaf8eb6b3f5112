//! # エラー変換ステップ
//!
//! ハンドラまたは前処理ステップの失敗を HTTP 形式の応答に変換する。
//!
//! | 失敗 | 応答 |
//! |------|------|
//! | [`HandlerError::Http`] | 指定ステータス、`{"message", "error"?}` |
//! | それ以外 | 500、`{"message": <フォールバック>, "error": {"type", "message"}}` |

use http::StatusCode;
use quizbox_infra::InfraError;
use quizbox_shared::ErrorBody;

use super::{ApiResponse, ErrorStep};
use crate::error::HandlerError;

/// エラー変換ステップ
#[derive(Debug, Clone)]
pub struct HttpErrorHandler {
    fallback_message: String,
}

impl HttpErrorHandler {
    /// 未分類の失敗に使うメッセージを指定して作成する
    pub fn new(fallback_message: impl Into<String>) -> Self {
        Self {
            fallback_message: fallback_message.into(),
        }
    }
}

impl ErrorStep for HttpErrorHandler {
    fn handle(&self, error: HandlerError) -> Result<ApiResponse, HandlerError> {
        let (status, body) = match &error {
            HandlerError::Http {
                status,
                message,
                detail,
            } => (
                *status,
                ErrorBody {
                    message: message.clone(),
                    error:   detail.clone(),
                },
            ),
            unclassified => {
                log_unclassified(unclassified);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::with_error(&self.fallback_message, unclassified.to_detail()),
                )
            }
        };

        ApiResponse::json(status, &body)
    }
}

fn log_unclassified(error: &HandlerError) {
    match error {
        HandlerError::Infra(infra) => log_infra_error(error, infra),
        _ => tracing::error!(
            error.category = error.category(),
            error.kind = error.kind_name(),
            "{}",
            error
        ),
    }
}

fn log_infra_error(error: &HandlerError, infra: &InfraError) {
    tracing::error!(
        error.category = error.category(),
        error.kind = error.kind_name(),
        span_trace = %infra.span_trace(),
        "{}",
        infra
    );
}
