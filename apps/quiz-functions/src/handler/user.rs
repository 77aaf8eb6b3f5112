//! # ユーザーハンドラ
//!
//! ユーザー登録・ログインを ID プロバイダに委譲する。
//!
//! ## 関数
//!
//! - `registerUser` - ユーザー登録（メールアドレスをユーザー名に使う）
//! - `loginUser` - ログイン（`USER_PASSWORD_AUTH`）
//!
//! プロバイダが要求を拒否した場合は 400、プロバイダの障害は 500 を返す。

use std::sync::Arc;

use quizbox_domain::credentials::Credentials;
use quizbox_infra::identity::{IdentityProvider, SignUpResult};
use quizbox_shared::{event_log::BusinessEvent, log_business_event};
use serde::Serialize;

use crate::{
    error::HandlerError,
    pipeline::{ApiEvent, ApiResponse},
};

/// 登録失敗時のメッセージ
pub const REGISTRATION_FAILED: &str = "User registration failed";
/// ログイン失敗時のメッセージ
pub const LOGIN_FAILED: &str = "Login failed";

/// ユーザー関数の共有状態
pub struct UserState {
    pub identity: Arc<dyn IdentityProvider>,
}

/// 登録レスポンス
#[derive(Debug, Serialize)]
pub struct RegisterUserResponse {
    pub message: String,
    pub result:  SignUpResult,
}

/// ログインレスポンス
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginUserResponse {
    pub message:       String,
    pub id_token:      String,
    pub access_token:  String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// registerUser
///
/// ## レスポンス
///
/// - `200 OK`: `{message, result}`（`result` はプロバイダの応答）
/// - `400 Bad Request`: プロバイダが登録を拒否（重複ユーザー、パスワードポリシー違反など）
pub async fn register_user(
    state: Arc<UserState>,
    event: ApiEvent,
) -> Result<ApiResponse, HandlerError> {
    let credentials: Credentials = event.json_body()?;

    let result = match state.identity.sign_up(&credentials).await {
        Ok(result) => result,
        Err(e) => {
            log_business_event!(
                BusinessEvent::RegistrationFailed,
                error = %e,
                "ユーザー登録失敗"
            );
            return Err(HandlerError::from_identity_rejection(e, REGISTRATION_FAILED));
        }
    };

    log_business_event!(
        BusinessEvent::UserRegistered,
        event.entity_id = %result.user_sub,
        "ユーザー登録"
    );

    ApiResponse::ok(&RegisterUserResponse {
        message: "User registered successfully".to_string(),
        result,
    })
}

/// loginUser
///
/// ## レスポンス
///
/// - `200 OK`: `{message, idToken, accessToken, refreshToken}`
/// - `400 Bad Request`: 認証失敗、未確認ユーザー、追加チャレンジ要求
pub async fn login_user(
    state: Arc<UserState>,
    event: ApiEvent,
) -> Result<ApiResponse, HandlerError> {
    let credentials: Credentials = event.json_body()?;

    let tokens = match state.identity.initiate_auth(&credentials).await {
        Ok(tokens) => tokens,
        Err(e) => {
            log_business_event!(
                BusinessEvent::LoginFailed,
                error = %e,
                "ログイン失敗"
            );
            return Err(HandlerError::from_identity_rejection(e, LOGIN_FAILED));
        }
    };

    log_business_event!(
        BusinessEvent::LoginSucceeded,
        "ログイン成功"
    );

    ApiResponse::ok(&LoginUserResponse {
        message:       "Login successful".to_string(),
        id_token:      tokens.id_token,
        access_token:  tokens.access_token,
        refresh_token: tokens.refresh_token,
    })
}
