//! # ログ初期化
//!
//! 全 Lambda 関数で共通の tracing subscriber を組み立てる。
//!
//! | 環境変数 | 効果 |
//! |---------|------|
//! | `LOG_FORMAT` | `json` / `pretty`。未設定なら Lambda 上では JSON、ローカルでは Pretty |
//! | `RUST_LOG` | フィルタ。未設定なら [`DEFAULT_FILTER`] |
//! | `AWS_LAMBDA_FUNCTION_NAME` | Lambda 実行環境の判定に使用 |

use std::str::FromStr;

/// `RUST_LOG` 未設定時のフィルタ
pub const DEFAULT_FILTER: &str = "info,quizbox=debug";

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// 1 行 1 JSON（CloudWatch Logs Insights 向け）
    Json,
    /// ローカル開発向け
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            other => Err(format!("unknown LOG_FORMAT={other:?}")),
        }
    }
}

/// トレーシング初期化設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    pub log_format: LogFormat,
    /// Lambda 上では CloudWatch にエスケープシーケンスが残るため無効
    pub ansi:       bool,
}

impl TracingConfig {
    /// プロセスの環境変数から設定を決める
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意の参照関数から設定を決める
    ///
    /// 不正な `LOG_FORMAT` は実行環境の既定値に戻し、stderr に警告を出す
    /// （subscriber の初期化前なので tracing は使えない）。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let on_lambda = lookup("AWS_LAMBDA_FUNCTION_NAME").is_some_and(|name| !name.is_empty());
        let fallback = if on_lambda {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        };

        let log_format = match lookup("LOG_FORMAT").filter(|value| !value.is_empty()) {
            None => fallback,
            Some(value) => value.parse().unwrap_or_else(|err| {
                eprintln!("WARNING: {err}, falling back to {fallback:?}");
                fallback
            }),
        };

        Self {
            log_format,
            ansi: !on_lambda,
        }
    }
}

/// グローバル subscriber を登録する
///
/// [`tracing_error::ErrorLayer`] を含むため、インフラ層エラーの SpanTrace に
/// 呼び出し経路が記録される。2 回目以降の呼び出しは何もしない。
#[cfg(feature = "observability")]
pub fn init_tracing(config: &TracingConfig) {
    use tracing_subscriber::{Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER));

    let output = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .without_time()
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .with_ansi(config.ansi)
            .boxed(),
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(output)
        .with(tracing_error::ErrorLayer::default())
        .try_init();
}
