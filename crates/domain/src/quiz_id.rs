//! # クイズ ID
//!
//! クイズの主キー `quizId` と、その採番戦略を定義する。
//!
//! ## 採番戦略
//!
//! | 戦略 | 形式 | 備考 |
//! |------|------|------|
//! | [`Timestamp`](QuizIdStrategy::Timestamp) | 作成時刻の Unix ミリ秒（例: `"1700000000123"`） | 既定。同一ミリ秒内の並行作成で衝突しうる |
//! | [`Uuid`](QuizIdStrategy::Uuid) | UUID v7 文字列 | 衝突しない。時刻順にソート可能 |
//!
//! 時刻ベースの ID は既存データとの互換のため既定のまま残している。
//! 衝突時は PutItem が既存クイズを上書きする。

use std::{str::FromStr, sync::Arc};

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{
    DomainError,
    clock::{Clock, SystemClock},
};

/// クイズの一意識別子
///
/// 不透明な文字列として扱い、形式は検証しない
/// （採番戦略が変わっても既存の ID をそのまま扱えるようにするため）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(transparent)]
#[display("{_0}")]
pub struct QuizId(String);

impl QuizId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// クイズ ID の採番器
pub trait QuizIdGenerator: Send + Sync {
    fn generate(&self) -> QuizId;
}

/// 現在時刻の Unix ミリ秒を ID とする採番器
pub struct TimestampQuizIdGenerator {
    clock: Arc<dyn Clock>,
}

impl TimestampQuizIdGenerator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl Default for TimestampQuizIdGenerator {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl QuizIdGenerator for TimestampQuizIdGenerator {
    fn generate(&self) -> QuizId {
        QuizId::new(self.clock.epoch_millis().to_string())
    }
}

/// UUID v7 を ID とする採番器
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidQuizIdGenerator;

impl QuizIdGenerator for UuidQuizIdGenerator {
    fn generate(&self) -> QuizId {
        QuizId::new(uuid::Uuid::now_v7().to_string())
    }
}

/// 採番戦略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum QuizIdStrategy {
    #[default]
    Timestamp,
    Uuid,
}

impl QuizIdStrategy {
    /// 戦略に対応する採番器を作成する
    pub fn generator(self, clock: Arc<dyn Clock>) -> Arc<dyn QuizIdGenerator> {
        match self {
            Self::Timestamp => Arc::new(TimestampQuizIdGenerator::new(clock)),
            Self::Uuid => Arc::new(UuidQuizIdGenerator),
        }
    }
}

impl FromStr for QuizIdStrategy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "timestamp" => Ok(Self::Timestamp),
            "uuid" => Ok(Self::Uuid),
            _ => Err(DomainError::Validation(format!(
                "不正なクイズ ID 採番戦略: {s}（timestamp または uuid）"
            ))),
        }
    }
}
