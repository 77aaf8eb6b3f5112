//! # 入力イベント
//!
//! API Gateway プロキシイベントのうち、ハンドラが参照するパスパラメータとボディを保持する。

use std::collections::HashMap;

use lambda_http::{Request, RequestExt};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::HandlerError;

/// イベントのボディ
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EventBody {
    /// ボディなし
    #[default]
    Empty,
    /// 未解析のバイト列
    Raw(Vec<u8>),
    /// 解析済みの JSON 値
    Json(Value),
}

/// ハンドラに渡される入力イベント
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApiEvent {
    pub path_parameters: HashMap<String, String>,
    pub body:            EventBody,
}

impl ApiEvent {
    pub fn new() -> Self {
        Self::default()
    }

    /// パスパラメータを追加する
    pub fn with_path_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_parameters.insert(name.into(), value.into());
        self
    }

    /// 未解析のボディを設定する
    pub fn with_raw_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = EventBody::Raw(body.into());
        self
    }

    /// 解析済みの JSON ボディを設定する
    pub fn with_json_body(mut self, body: Value) -> Self {
        self.body = EventBody::Json(body);
        self
    }

    /// 必須のパスパラメータを取得する
    ///
    /// 存在しない場合は 400。
    pub fn path_parameter(&self, name: &str) -> Result<&str, HandlerError> {
        self.path_parameters
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| HandlerError::bad_request(format!("Path parameter '{name}' is required")))
    }

    /// ボディをリクエスト構造体にデシリアライズする
    ///
    /// ボディがない場合、構造が一致しない場合はいずれも 400。
    pub fn json_body<T: DeserializeOwned>(&self) -> Result<T, HandlerError> {
        let parsed = match &self.body {
            EventBody::Empty => return Err(HandlerError::bad_request("Request body is required")),
            EventBody::Json(value) => T::deserialize(value),
            EventBody::Raw(bytes) => serde_json::from_slice(bytes),
        };
        parsed.map_err(|e| HandlerError::bad_request(format!("Invalid request body: {e}")))
    }
}

impl From<Request> for ApiEvent {
    fn from(request: Request) -> Self {
        let path_parameters = request
            .path_parameters()
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        // Body::Empty と空文字列はどちらもボディなしとして扱う
        let bytes: &[u8] = request.body().as_ref();
        let body = if bytes.is_empty() {
            EventBody::Empty
        } else {
            EventBody::Raw(bytes.to_vec())
        };

        Self {
            path_parameters,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use lambda_http::Body;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, PartialEq, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Payload {
        quiz_name: String,
    }

    #[test]
    fn test_lambdaリクエストのボディは未解析のまま保持される() {
        let request = Request::new(Body::Text(r#"{"quizName":"Capitals"}"#.to_string()));

        let event = ApiEvent::from(request);

        assert_eq!(event.body, EventBody::Raw(br#"{"quizName":"Capitals"}"#.to_vec()));
    }

    #[test]
    fn test_ボディのないリクエストはemptyになる() {
        let event = ApiEvent::from(Request::new(Body::Empty));

        assert_eq!(event.body, EventBody::Empty);
        assert!(event.path_parameters.is_empty());
    }

    #[test]
    fn test_lambdaリクエストのパスパラメータを取り込む() {
        let mut params = HashMap::new();
        params.insert("quizId".to_string(), "1700000000123".to_string());
        let request = Request::new(Body::Empty).with_path_parameters(params);

        let event = ApiEvent::from(request);

        assert_eq!(event.path_parameter("quizId").unwrap(), "1700000000123");
    }

    #[test]
    fn test_パスパラメータがない場合は400() {
        let event = ApiEvent::new();
        let result = event.path_parameter("quizId");

        assert!(matches!(
            result,
            Err(HandlerError::Http { status, .. }) if status == http::StatusCode::BAD_REQUEST
        ));
    }

    #[test]
    fn test_ボディがない場合はrequest_body_is_requiredの400() {
        let result = ApiEvent::new().json_body::<Payload>();

        assert!(matches!(
            result,
            Err(HandlerError::Http { message, .. }) if message == "Request body is required"
        ));
    }

    #[test]
    fn test_構造が一致しないボディはinvalid_request_bodyの400() {
        let event = ApiEvent::new().with_json_body(json!({ "name": "x" }));

        let result = event.json_body::<Payload>();

        assert!(matches!(
            result,
            Err(HandlerError::Http { message, .. }) if message.starts_with("Invalid request body: ")
        ));
    }

    #[test]
    fn test_解析済みボディと未解析ボディはどちらもデシリアライズできる() {
        let parsed = ApiEvent::new().with_json_body(json!({ "quizName": "Capitals" }));
        let raw = ApiEvent::new().with_raw_body(r#"{"quizName":"Capitals"}"#);

        let expected = Payload {
            quiz_name: "Capitals".to_string(),
        };
        assert_eq!(parsed.json_body::<Payload>().unwrap(), expected);
        assert_eq!(raw.json_body::<Payload>().unwrap(), expected);
    }
}
