//! # ID プロバイダ
//!
//! ユーザー登録・ログインを外部の ID プロバイダ（Cognito ユーザープール）に委譲する。
//!
//! このシステムはユーザー情報を保存せず、プロバイダの結果とトークンを
//! 呼び出し元にそのまま返す。

pub mod cognito;

use async_trait::async_trait;
use quizbox_domain::credentials::Credentials;
use serde::Serialize;

use crate::InfraError;

pub use cognito::CognitoIdentityProvider;

/// サインアップ結果
///
/// プロバイダの応答形式（PascalCase）をそのまま JSON に出力する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SignUpResult {
    pub user_confirmed:        bool,
    pub user_sub:              String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_delivery_details: Option<CodeDeliveryDetails>,
}

/// 確認コードの送付先
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CodeDeliveryDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination:     Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_medium: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_name:  Option<String>,
}

/// 認証成功時に発行されるトークン
#[derive(Clone, PartialEq, Eq)]
pub struct AuthTokens {
    pub id_token:      String,
    pub access_token:  String,
    pub refresh_token: Option<String>,
}

impl std::fmt::Debug for AuthTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthTokens")
            .field("id_token", &"[REDACTED]")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// ID プロバイダトレイト
///
/// プロバイダが要求を拒否した場合（重複ユーザー・認証失敗・追加チャレンジ要求など）は
/// [`InfraErrorKind::IdentityRejected`](crate::InfraErrorKind::IdentityRejected) を返す。
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// ユーザーを登録する（メールアドレスをユーザー名と `email` 属性に使う）
    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpResult, InfraError>;

    /// メールアドレスとパスワードで認証する
    async fn initiate_auth(&self, credentials: &Credentials) -> Result<AuthTokens, InfraError>;
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_サインアップ結果はpascal_caseで出力される() {
        let result = SignUpResult {
            user_confirmed:        false,
            user_sub:              "d2f3c1a0-0000-4000-8000-000000000000".to_string(),
            code_delivery_details: Some(CodeDeliveryDetails {
                destination:     Some("a***@e***".to_string()),
                delivery_medium: Some("EMAIL".to_string()),
                attribute_name:  Some("email".to_string()),
            }),
        };

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "UserConfirmed": false,
                "UserSub": "d2f3c1a0-0000-4000-8000-000000000000",
                "CodeDeliveryDetails": {
                    "Destination": "a***@e***",
                    "DeliveryMedium": "EMAIL",
                    "AttributeName": "email"
                }
            })
        );
    }

    #[test]
    fn test_送付先がない場合はcode_delivery_detailsを出力しない() {
        let result = SignUpResult {
            user_confirmed:        true,
            user_sub:              "sub".to_string(),
            code_delivery_details: None,
        };

        let json = serde_json::to_value(&result).unwrap();

        assert!(json.get("CodeDeliveryDetails").is_none());
    }

    #[test]
    fn test_トークンのdebug出力はマスクされる() {
        let tokens = AuthTokens {
            id_token:      "id.jwt".to_string(),
            access_token:  "access.jwt".to_string(),
            refresh_token: Some("refresh".to_string()),
        };

        let debug = format!("{tokens:?}");

        assert!(!debug.contains("jwt"));
        assert!(!debug.contains("\"refresh\""));
    }
}
