//! # 応答
//!
//! ハンドラが返す HTTP 形式の応答。ボディは JSON 文字列として保持する。

use http::{HeaderValue, StatusCode, header::CONTENT_TYPE};
use lambda_http::{Body, Response};
use serde::Serialize;
use serde_json::Value;

use crate::error::HandlerError;

/// ハンドラの応答
///
/// `{"statusCode": ..., "body": "<JSON 文字列>"}` としてシリアライズされる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub body:        String,
}

impl ApiResponse {
    /// 任意の値を JSON ボディとする応答を作成する
    pub fn json<T: Serialize>(status: StatusCode, body: &T) -> Result<Self, HandlerError> {
        Ok(Self {
            status_code: status.as_u16(),
            body:        serde_json::to_string(body)?,
        })
    }

    /// 200 OK
    pub fn ok<T: Serialize>(body: &T) -> Result<Self, HandlerError> {
        Self::json(StatusCode::OK, body)
    }

    /// 201 Created
    pub fn created<T: Serialize>(body: &T) -> Result<Self, HandlerError> {
        Self::json(StatusCode::CREATED, body)
    }

    /// ステータスコード
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// ボディを JSON 値として解析する
    pub fn body_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

impl From<ApiResponse> for Response<Body> {
    fn from(response: ApiResponse) -> Self {
        let status = response.status();
        let mut http_response = Response::new(Body::Text(response.body));
        *http_response.status_mut() = status;
        http_response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        http_response
    }
}
