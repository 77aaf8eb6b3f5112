//! # リクエストパイプライン
//!
//! ハンドラの前後に横断的な処理を順序付きで適用する。
//! ハンドラはビジネスロジックのみを持ち、ボディ解析とエラー応答への変換は
//! パイプラインのステップが担当する。
//!
//! ## 実行順序
//!
//! ```text
//! ApiEvent → RequestStep[0] → … → RequestStep[n] → Handler ─┬─ Ok ──────────────→ ApiResponse
//!                                                            └─ Err → ErrorStep[0] → … → ApiResponse / Err
//! ```
//!
//! - 前処理ステップは登録順に実行し、各ステップがイベントを置き換える
//! - 前処理ステップまたはハンドラが失敗した場合、エラーステップを登録順に実行し、
//!   最初に応答を返したステップの結果を採用する
//! - エラーステップがない（またはすべてが `Err` を返した）場合、失敗は呼び出し元に伝播する
//!
//! ## 使用例
//!
//! ```rust,ignore
//! let pipeline = Pipeline::new(move |event| create_quiz(state.clone(), event))
//!     .parse_json_body()
//!     .translate_errors("Failed to create quiz");
//! let response = pipeline.invoke(event).await?;
//! ```

mod error_handler;
mod event;
mod json_body;
mod response;

use std::future::Future;

use async_trait::async_trait;
pub use error_handler::HttpErrorHandler;
pub use event::{ApiEvent, EventBody};
pub use json_body::{JsonBodyParser, MALFORMED_JSON_MESSAGE};
pub use response::ApiResponse;

use crate::error::HandlerError;

/// ハンドラ
///
/// `Fn(ApiEvent) -> Future<Output = Result<ApiResponse, HandlerError>>` のクロージャに実装済み。
#[async_trait]
pub trait Handler: Send + Sync {
    async fn call(&self, event: ApiEvent) -> Result<ApiResponse, HandlerError>;
}

#[async_trait]
impl<F, Fut> Handler for F
where
    F: Fn(ApiEvent) -> Fut + Send + Sync,
    Fut: Future<Output = Result<ApiResponse, HandlerError>> + Send + 'static,
{
    async fn call(&self, event: ApiEvent) -> Result<ApiResponse, HandlerError> {
        self(event).await
    }
}

/// ハンドラ呼び出し前のステップ
pub trait RequestStep: Send + Sync {
    fn apply(&self, event: ApiEvent) -> Result<ApiEvent, HandlerError>;
}

impl<F> RequestStep for F
where
    F: Fn(ApiEvent) -> Result<ApiEvent, HandlerError> + Send + Sync,
{
    fn apply(&self, event: ApiEvent) -> Result<ApiEvent, HandlerError> {
        self(event)
    }
}

/// 失敗時のステップ
///
/// 応答を返せない場合は `Err` でエラーを次のステップに渡す。
pub trait ErrorStep: Send + Sync {
    fn handle(&self, error: HandlerError) -> Result<ApiResponse, HandlerError>;
}

impl<F> ErrorStep for F
where
    F: Fn(HandlerError) -> Result<ApiResponse, HandlerError> + Send + Sync,
{
    fn handle(&self, error: HandlerError) -> Result<ApiResponse, HandlerError> {
        self(error)
    }
}

/// ハンドラと前後のステップを束ねたパイプライン
pub struct Pipeline {
    handler:       Box<dyn Handler>,
    request_steps: Vec<Box<dyn RequestStep>>,
    error_steps:   Vec<Box<dyn ErrorStep>>,
}

impl Pipeline {
    pub fn new(handler: impl Handler + 'static) -> Self {
        Self {
            handler:       Box::new(handler),
            request_steps: Vec::new(),
            error_steps:   Vec::new(),
        }
    }

    /// 前処理ステップを末尾に追加する
    pub fn before(mut self, step: impl RequestStep + 'static) -> Self {
        self.request_steps.push(Box::new(step));
        self
    }

    /// エラーステップを末尾に追加する
    pub fn on_error(mut self, step: impl ErrorStep + 'static) -> Self {
        self.error_steps.push(Box::new(step));
        self
    }

    /// [`JsonBodyParser`] を前処理ステップに追加する
    pub fn parse_json_body(self) -> Self {
        self.before(JsonBodyParser)
    }

    /// [`HttpErrorHandler`] をエラーステップに追加する
    pub fn translate_errors(self, fallback_message: impl Into<String>) -> Self {
        self.on_error(HttpErrorHandler::new(fallback_message))
    }

    /// イベントを処理して応答を返す
    pub async fn invoke(&self, event: ApiEvent) -> Result<ApiResponse, HandlerError> {
        match self.run(event).await {
            Ok(response) => Ok(response),
            Err(error) => self.recover(error),
        }
    }

    async fn run(&self, event: ApiEvent) -> Result<ApiResponse, HandlerError> {
        let mut event = event;
        for step in &self.request_steps {
            event = step.apply(event)?;
        }
        self.handler.call(event).await
    }

    fn recover(&self, error: HandlerError) -> Result<ApiResponse, HandlerError> {
        let mut error = error;
        for step in &self.error_steps {
            match step.handle(error) {
                Ok(response) => return Ok(response),
                Err(next) => error = next,
            }
        }
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use http::StatusCode;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    use super::*;

    /// ボディをそのまま 200 で返すハンドラ
    async fn echo(event: ApiEvent) -> Result<ApiResponse, HandlerError> {
        match event.body {
            EventBody::Json(value) => ApiResponse::ok(&value),
            EventBody::Raw(bytes) => ApiResponse::ok(&String::from_utf8_lossy(&bytes)),
            EventBody::Empty => ApiResponse::ok(&Value::Null),
        }
    }

    async fn fail(_event: ApiEvent) -> Result<ApiResponse, HandlerError> {
        Err(HandlerError::Internal("boom".to_string()))
    }

    #[tokio::test]
    async fn test_成功時はハンドラの応答をそのまま返す() {
        let expected = ApiResponse::created(&json!({ "quizId": "1" })).unwrap();
        let returned = expected.clone();
        let sut = Pipeline::new(move |_event: ApiEvent| {
            let response = returned.clone();
            async move { Ok::<_, HandlerError>(response) }
        })
        .parse_json_body()
        .translate_errors("fallback");

        let response = sut.invoke(ApiEvent::new()).await.unwrap();

        assert_eq!(response, expected);
    }

    #[tokio::test]
    async fn test_前処理ステップは登録順に実行される() {
        // Given: 実行順を記録するステップを 2 つ登録
        let order = Arc::new(Mutex::new(Vec::new()));
        let first = {
            let order = order.clone();
            move |event: ApiEvent| -> Result<ApiEvent, HandlerError> {
                order.lock().unwrap().push("first");
                Ok(event.with_path_parameter("step", "first"))
            }
        };
        let second = {
            let order = order.clone();
            move |event: ApiEvent| -> Result<ApiEvent, HandlerError> {
                order.lock().unwrap().push("second");
                let previous = event.path_parameters.get("step").cloned().unwrap_or_default();
                Ok(event.with_raw_body(format!(r#""{previous}-second""#)))
            }
        };
        let sut = Pipeline::new(echo).before(first).before(second).parse_json_body();

        // When
        let response = sut.invoke(ApiEvent::new()).await.unwrap();

        // Then: 後のステップは前のステップの結果を受け取る
        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
        assert_eq!(response.body_json().unwrap(), json!("first-second"));
    }

    #[tokio::test]
    async fn test_json解析後のボディがハンドラに渡される() {
        let sut = Pipeline::new(echo).parse_json_body();
        let event = ApiEvent::new().with_raw_body(r#"{"quizName":"Capitals","createdBy":"alice"}"#);

        let response = sut.invoke(event).await.unwrap();

        assert_eq!(
            response.body_json().unwrap(),
            json!({ "quizName": "Capitals", "createdBy": "alice" })
        );
    }

    #[tokio::test]
    async fn test_不正なjsonはハンドラを呼ばずに400になる() {
        let called = Arc::new(Mutex::new(false));
        let flag = called.clone();
        let sut = Pipeline::new(move |event: ApiEvent| {
            *flag.lock().unwrap() = true;
            echo(event)
        })
        .parse_json_body()
        .translate_errors("fallback");

        let response = sut
            .invoke(ApiEvent::new().with_raw_body("{oops"))
            .await
            .unwrap();

        assert!(!*called.lock().unwrap());
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.body_json().unwrap(),
            json!({ "message": MALFORMED_JSON_MESSAGE })
        );
    }

    #[tokio::test]
    async fn test_未分類の失敗はフォールバックメッセージの500になる() {
        let sut = Pipeline::new(fail).translate_errors("Failed to fetch quizzes");

        let response = sut.invoke(ApiEvent::new()).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.body_json().unwrap(),
            json!({
                "message": "Failed to fetch quizzes",
                "error": { "type": "Internal", "message": "内部エラー: boom" }
            })
        );
    }

    #[tokio::test]
    async fn test_エラーステップがない場合は失敗が伝播する() {
        let sut = Pipeline::new(fail);

        let result = sut.invoke(ApiEvent::new()).await;

        assert!(matches!(result, Err(HandlerError::Internal(msg)) if msg == "boom"));
    }

    #[tokio::test]
    async fn test_エラーステップはerrを返すと次のステップに渡す() {
        // Given: Http 以外は次に渡すステップを先に登録
        let passthrough = |error: HandlerError| -> Result<ApiResponse, HandlerError> {
            match error {
                HandlerError::Http { .. } => ApiResponse::ok(&"handled by first"),
                other => Err(other),
            }
        };
        let sut = Pipeline::new(fail)
            .on_error(passthrough)
            .translate_errors("fallback");

        // When
        let response = sut.invoke(ApiEvent::new()).await.unwrap();

        // Then: 2 番目のステップが応答を返す
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body_json().unwrap()["message"], "fallback");
    }

    #[tokio::test]
    async fn test_すべてのエラーステップがerrを返すと最後のエラーが伝播する() {
        let rewrap = |_error: HandlerError| -> Result<ApiResponse, HandlerError> {
            Err(HandlerError::Internal("rewrapped".to_string()))
        };
        let sut = Pipeline::new(fail).on_error(rewrap);

        let result = sut.invoke(ApiEvent::new()).await;

        assert!(matches!(result, Err(HandlerError::Internal(msg)) if msg == "rewrapped"));
    }
}
