//! # ドメイン層エラー
//!
//! リクエストボディの検証は JSON の構造チェックに留めているため、
//! ここで扱うのは設定値（ID 採番戦略など）を解釈できなかった場合だけ。

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// 許容されない値
    #[error("不正な値: {0}")]
    Validation(String),
}
