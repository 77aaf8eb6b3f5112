//! # インフラ層エラー
//!
//! [`InfraError`] は種別 [`InfraErrorKind`] に、生成時点の [`SpanTrace`] を添えたもの。
//! 呼び出し側は [`InfraError::kind`] で分岐し、SpanTrace は 500 応答のログにだけ使う。
//!
//! ID プロバイダが要求を拒否した場合（重複ユーザー、認証失敗など）と、
//! プロバイダとの通信自体が失敗した場合は別の種別になる。前者はクライアントの誤り、
//! 後者はサーバー側の障害として扱われる。

use std::fmt;

use thiserror::Error;
use tracing_error::SpanTrace;

pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

#[derive(Debug, Error, strum::IntoStaticStr)]
pub enum InfraErrorKind {
    /// 通信失敗、スロットリング、リクエスト検証エラーなど
    #[error("DynamoDB 操作に失敗: {0}")]
    DynamoDb(String),

    /// `attribute_exists` などの条件式が成立しなかった
    #[error("{entity} {id} が存在しないため更新できません")]
    ConditionFailed { entity: String, id: String },

    /// 読み出したアイテムを JSON に戻せない
    #[error("不正なアイテム: {0}")]
    InvalidItem(String),

    /// Cognito との通信失敗、Cognito 内部エラー
    #[error("Cognito 呼び出しに失敗: {0}")]
    Cognito(String),

    /// プロバイダが返したエラーコードとメッセージをそのまま保持する
    #[error("{code}: {message}")]
    IdentityRejected { code: String, message: String },
}

impl InfraError {
    fn new(kind: InfraErrorKind) -> Self {
        Self {
            kind,
            span_trace: SpanTrace::capture(),
        }
    }

    pub fn dynamo_db(msg: impl Into<String>) -> Self {
        Self::new(InfraErrorKind::DynamoDb(msg.into()))
    }

    pub fn condition_failed(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::new(InfraErrorKind::ConditionFailed {
            entity: entity.into(),
            id:     id.into(),
        })
    }

    pub fn invalid_item(msg: impl Into<String>) -> Self {
        Self::new(InfraErrorKind::InvalidItem(msg.into()))
    }

    pub fn cognito(msg: impl Into<String>) -> Self {
        Self::new(InfraErrorKind::Cognito(msg.into()))
    }

    pub fn identity_rejected(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(InfraErrorKind::IdentityRejected {
            code:    code.into(),
            message: message.into(),
        })
    }

    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    /// バリアント名（例: `"DynamoDb"`）
    pub fn kind_name(&self) -> &'static str {
        (&self.kind).into()
    }

    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    /// プロバイダによる拒否なら `(code, message)` を返す
    pub fn as_identity_rejection(&self) -> Option<(&str, &str)> {
        if let InfraErrorKind::IdentityRejected { code, message } = &self.kind {
            Some((code.as_str(), message.as_str()))
        } else {
            None
        }
    }
}

impl fmt::Display for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

// SpanTrace は長いため、kind のみ表示し trace はスパン名の一覧に留める
impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut spans = Vec::new();
        self.span_trace.with_spans(|metadata, _fields| {
            spans.push(metadata.name());
            true
        });
        f.debug_struct("InfraError")
            .field("kind", &self.kind)
            .field("spans", &spans)
            .finish()
    }
}

impl std::error::Error for InfraError {}
