//! # ハンドラ
//!
//! 各 Lambda 関数のビジネスロジックを定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラは外部サービスを 1 回だけ呼び出し、結果を応答に整形する
//! - ボディ解析とエラー応答への変換は [`Pipeline`](crate::pipeline::Pipeline) に任せる
//! - 依存コンポーネントは `Arc<dyn Trait>` の State として注入する

pub mod quiz;
pub mod user;

pub use quiz::{QuizState, add_question, create_quiz, delete_quiz, get_all_quizzes, get_quiz_questions};
pub use user::{UserState, login_user, register_user};
