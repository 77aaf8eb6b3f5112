//! # Quizbox インフラ層
//!
//! DynamoDB と Cognito との通信を担当するインフラストラクチャ層。
//!
//! ## 設計方針
//!
//! このクレートはハンドラが依存するインターフェース（リポジトリ・ID プロバイダのトレイト）と
//! その AWS 実装を提供する。SDK の型はこのクレートの外に出さない。
//!
//! ## 責務
//!
//! - **AWS 設定**: SDK 設定の読み込み（ローカルエンドポイントの差し替えを含む）
//! - **リポジトリ実装**: `Quizzes` テーブルへの読み書き
//! - **ID プロバイダ実装**: Cognito ユーザープールへの登録・認証
//!
//! ## 依存関係
//!
//! ```text
//! functions → infra → domain
//!     ↘                 ↑
//!       shared ─────────┘
//! ```
//!
//! ## モジュール構成
//!
//! - [`aws`] - AWS SDK 設定の読み込み
//! - [`attribute`] - JSON 値と DynamoDB 属性値の相互変換
//! - [`dynamodb`] - DynamoDB クライアント作成とテーブル自動作成
//! - [`error`] - インフラ層エラー定義
//! - [`identity`] - ID プロバイダ実装
//! - [`repository`] - リポジトリ実装
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use quizbox_infra::{dynamodb, repository::DynamoDbQuizRepository};
//!
//! async fn setup() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = dynamodb::create_client(Some("http://localhost:18000")).await;
//!     dynamodb::ensure_quiz_table(&client, "Quizzes").await?;
//!     let repository = DynamoDbQuizRepository::new(client, "Quizzes".to_string());
//!     Ok(())
//! }
//! ```

pub mod attribute;
pub mod aws;
pub mod dynamodb;
pub mod error;
pub mod identity;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod repository;

pub use error::{InfraError, InfraErrorKind};
pub use identity::{AuthTokens, CognitoIdentityProvider, IdentityProvider, SignUpResult};
pub use repository::{DynamoDbQuizRepository, QuizRepository};
