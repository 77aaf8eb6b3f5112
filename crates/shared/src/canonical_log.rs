//! # Canonical Log Line
//!
//! Lambda 呼び出しごとに、結果を 1 行に集約したサマリログを出力する tower Layer。
//! [Canonical Log Lines](https://brandur.org/canonical-log-lines) の考え方に基づく。
//!
//! ## 出力フィールド
//!
//! | フィールド | 内容 |
//! |-----------|------|
//! | `log.type` | 常に `"canonical"` |
//! | `faas.name` | 関数名（例: `createQuiz`） |
//! | `faas.coldstart` | プロセス起動後の最初の呼び出しか |
//! | `http.status_code` | 応答ステータス（ランタイムエラー時は出力しない） |
//! | `http.latency_ms` | 呼び出し全体の所要時間 |
//!
//! Lambda ランタイムが作る `requestId` 付きスパンの内側で動作するため、
//! JSON ログにはリクエスト ID も含まれる。
//!
//! ```text
//! lambda_http::run → CanonicalLogLineLayer → Pipeline → handler
//! ```

use std::{
    future::Future,
    pin::Pin,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    task::{Context, Poll},
    time::Instant,
};

use http::{Request, Response};
use tower::{Layer, Service};

/// Canonical Log Line を出力する Layer
#[derive(Clone, Debug)]
pub struct CanonicalLogLineLayer {
    function_name: Arc<str>,
    cold_start:    Arc<AtomicBool>,
}

impl CanonicalLogLineLayer {
    pub fn new(function_name: impl Into<String>) -> Self {
        Self {
            function_name: Arc::from(function_name.into()),
            cold_start:    Arc::new(AtomicBool::new(true)),
        }
    }
}

impl<S> Layer<S> for CanonicalLogLineLayer {
    type Service = CanonicalLogLineService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CanonicalLogLineService {
            inner,
            function_name: self.function_name.clone(),
            cold_start: self.cold_start.clone(),
        }
    }
}

/// [`CanonicalLogLineLayer`] が生成する Service
#[derive(Clone, Debug)]
pub struct CanonicalLogLineService<S> {
    inner:         S,
    function_name: Arc<str>,
    cold_start:    Arc<AtomicBool>,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for CanonicalLogLineService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: std::fmt::Display + 'static,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;
    type Response = S::Response;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        // poll_ready 済みの inner を取り出し、代わりにクローンを残す
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let function_name = self.function_name.clone();
        let cold_start = self.cold_start.swap(false, Ordering::Relaxed);
        let start = Instant::now();

        Box::pin(async move {
            let result = inner.call(req).await;
            let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            match &result {
                Ok(response) => tracing::info!(
                    log.r#type = "canonical",
                    faas.name = %function_name,
                    faas.coldstart = cold_start,
                    http.status_code = response.status().as_u16(),
                    http.latency_ms = latency_ms,
                    "呼び出し完了"
                ),
                Err(err) => tracing::error!(
                    log.r#type = "canonical",
                    faas.name = %function_name,
                    faas.coldstart = cold_start,
                    http.latency_ms = latency_ms,
                    error.message = %err,
                    "呼び出し失敗"
                ),
            }

            result
        })
    }
}
