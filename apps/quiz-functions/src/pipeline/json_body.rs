//! # JSON ボディ解析ステップ
//!
//! ハンドラ呼び出し前に未解析のボディを JSON 値に置き換える。
//! Content-Type は参照しない。

use serde_json::Value;

use super::{ApiEvent, EventBody, RequestStep};
use crate::error::HandlerError;

/// 不正な JSON を受け取った場合の応答メッセージ
pub const MALFORMED_JSON_MESSAGE: &str = "Invalid or malformed JSON was provided";

/// JSON ボディ解析ステップ
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonBodyParser;

impl RequestStep for JsonBodyParser {
    fn apply(&self, mut event: ApiEvent) -> Result<ApiEvent, HandlerError> {
        if let EventBody::Raw(bytes) = &event.body {
            let value: Value = serde_json::from_slice(bytes).map_err(|e| {
                tracing::debug!(error = %e, "リクエストボディの JSON 解析に失敗");
                HandlerError::bad_request(MALFORMED_JSON_MESSAGE)
            })?;
            event.body = EventBody::Json(value);
        }
        Ok(event)
    }
}
