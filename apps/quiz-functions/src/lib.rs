//! # Quizbox 関数ライブラリ
//!
//! クイズ・ユーザー関数のハンドラと、それを包むリクエストパイプラインを公開する。
//! バイナリ（`bootstrap`）は設定の読み込みとクライアント作成のみを行う。

pub mod app_builder;
pub mod error;
pub mod function;
pub mod handler;
pub mod pipeline;

pub use error::HandlerError;
pub use function::{FunctionName, QuizFunction, UserFunction};
pub use pipeline::{ApiEvent, ApiResponse, EventBody, Pipeline};
