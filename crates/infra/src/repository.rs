//! # リポジトリ実装
//!
//! ハンドラが依存するリポジトリトレイトと、その DynamoDB 実装を提供する。
//!
//! ## 設計方針
//!
//! - **依存性逆転**: ハンドラは `Arc<dyn QuizRepository>` のみを知る
//! - **テスタビリティ**: トレイト経由でインメモリ実装に差し替え可能

pub mod quiz_repository;

pub use quiz_repository::{DynamoDbQuizRepository, QuizRepository};
