//! # レスポンスボディ
//!
//! 全関数で共通のレスポンスボディ構造体を提供する。
//!
//! ## 設計
//!
//! - 純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - HTTP ステータスとの対応付けは functions クレートのパイプラインの責務
//! - 成功・失敗ともに人間可読な `message` を持つ

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// メッセージのみのレスポンスボディ
///
/// ```
/// use quizbox_shared::MessageBody;
///
/// let body = MessageBody::new("Quiz deleted successfully");
/// assert_eq!(body.message, "Quiz deleted successfully");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// 失敗レスポンスのボディ
///
/// `message` は利用者向けの説明、`error` は原因となったエラーの
/// シリアライズ表現（存在する場合のみ出力）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error:   Option<Value>,
}

impl ErrorBody {
    /// エラー詳細なしで作成する
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error:   None,
        }
    }

    /// エラー詳細付きで作成する
    pub fn with_error(message: impl Into<String>, error: Value) -> Self {
        Self {
            message: message.into(),
            error:   Some(error),
        }
    }
}
