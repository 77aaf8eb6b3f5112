//! # Quizbox ドメイン層
//!
//! クイズとその設問、ユーザー認証情報のドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! 永続化と認証は外部のマネージドサービス（DynamoDB / Cognito）が担うため、
//! このクレートが持つのはストアが必要とする最小限のデータ形状と、
//! ID 採番・時刻取得の抽象化のみ。
//!
//! ## 依存関係の方向
//!
//! ```text
//! functions → infra → domain
//!          ↘       ↘
//!            shared
//! ```
//!
//! ドメイン層はインフラ層（DynamoDB、Cognito）には一切依存しない。
//!
//! ## モジュール構成
//!
//! - [`quiz`] - クイズと設問
//! - [`quiz_id`] - クイズ ID と採番戦略
//! - [`credentials`] - メールアドレス・平文パスワード
//! - [`clock`] - 時刻プロバイダ
//! - [`error`] - ドメイン層エラー

pub mod clock;
pub mod credentials;
pub mod error;
pub mod quiz;
pub mod quiz_id;

pub use error::DomainError;
