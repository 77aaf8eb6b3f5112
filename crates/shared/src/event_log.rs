//! # ビジネスイベントログ
//!
//! ハンドラが記録する業務上の出来事を [`BusinessEvent`] として列挙し、
//! [`log_business_event!`] で一定のフィールド構成の INFO ログにする。
//!
//! 出力されるフィールド（ドット記法のキーは JSON 出力でフラットになる）:
//!
//! ```text
//! event.kind=business_event event.category=quiz event.action=quiz.created
//! event.entity_type=quiz event.result=success ...呼び出し側の追加フィールド
//! ```
//!
//! CloudWatch Logs Insights では `filter `event.kind` = "business_event"` で抽出できる。

/// 業務イベント
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusinessEvent {
    QuizCreated,
    QuestionAdded,
    QuizDeleted,
    UserRegistered,
    RegistrationFailed,
    LoginSucceeded,
    LoginFailed,
}

impl BusinessEvent {
    pub fn category(self) -> &'static str {
        match self {
            Self::QuizCreated | Self::QuestionAdded | Self::QuizDeleted => "quiz",
            Self::UserRegistered
            | Self::RegistrationFailed
            | Self::LoginSucceeded
            | Self::LoginFailed => "auth",
        }
    }

    pub fn action(self) -> &'static str {
        match self {
            Self::QuizCreated => "quiz.created",
            Self::QuestionAdded => "quiz.question_added",
            Self::QuizDeleted => "quiz.deleted",
            Self::UserRegistered => "auth.user_registered",
            Self::RegistrationFailed => "auth.registration_failure",
            Self::LoginSucceeded => "auth.login_success",
            Self::LoginFailed => "auth.login_failure",
        }
    }

    pub fn entity_type(self) -> &'static str {
        match self.category() {
            "quiz" => "quiz",
            _ => "user",
        }
    }

    pub fn result(self) -> &'static str {
        match self {
            Self::RegistrationFailed | Self::LoginFailed => "failure",
            _ => "success",
        }
    }
}

/// [`BusinessEvent`] を INFO レベルで出力する
///
/// 第 1 引数にイベント、以降に `tracing::info!` と同じ書式で
/// 追加フィールドとメッセージを渡す。
///
/// ```ignore
/// log_business_event!(
///     BusinessEvent::QuizDeleted,
///     event.entity_id = %quiz_id,
///     "クイズ削除"
/// );
/// ```
#[macro_export]
macro_rules! log_business_event {
    ($event:expr, $($rest:tt)+) => {{
        let business_event: $crate::event_log::BusinessEvent = $event;
        ::tracing::info!(
            event.kind = "business_event",
            event.category = business_event.category(),
            event.action = business_event.action(),
            event.entity_type = business_event.entity_type(),
            event.result = business_event.result(),
            $($rest)+
        )
    }};
}

/// 予期しないエラーを記録するときの `error.category`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// DynamoDB
    Infrastructure,
    /// Cognito
    ExternalService,
    Internal,
}

impl ErrorCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Infrastructure => "infrastructure",
            Self::ExternalService => "external_service",
            Self::Internal => "internal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_失敗イベントのみresultがfailureになる() {
        let failures: Vec<BusinessEvent> = [
            BusinessEvent::QuizCreated,
            BusinessEvent::QuestionAdded,
            BusinessEvent::QuizDeleted,
            BusinessEvent::UserRegistered,
            BusinessEvent::RegistrationFailed,
            BusinessEvent::LoginSucceeded,
            BusinessEvent::LoginFailed,
        ]
        .into_iter()
        .filter(|e| e.result() == "failure")
        .collect();

        assert_eq!(
            failures,
            vec![BusinessEvent::RegistrationFailed, BusinessEvent::LoginFailed]
        );
    }

    #[test]
    fn test_actionはカテゴリを接頭辞に持つ() {
        for event in [BusinessEvent::QuestionAdded, BusinessEvent::LoginFailed] {
            assert!(event.action().starts_with(&format!("{}.", event.category())));
        }
        assert_eq!(BusinessEvent::LoginFailed.entity_type(), "user");
        assert_eq!(BusinessEvent::QuizDeleted.entity_type(), "quiz");
    }
}
