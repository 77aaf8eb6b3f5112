//! # Quizbox 共有ユーティリティ
//!
//! このクレートは、Quizbox の各クレートで使用される共通ユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - 他のすべてのクレート（domain, infra, functions）から依存される
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - 外部クレートへの依存は最小限に抑える（ログ基盤は `observability` feature）

#[cfg(feature = "observability")]
pub mod canonical_log;
pub mod event_log;
pub mod observability;
pub mod response_body;

pub use response_body::{ErrorBody, MessageBody};
