//! # Cognito ID プロバイダ
//!
//! Amazon Cognito ユーザープールの `SignUp` / `InitiateAuth` を呼び出す。
//!
//! ## エラー分類
//!
//! | SDK エラー | 分類 |
//! |-----------|------|
//! | サービスエラー（`UsernameExistsException`, `NotAuthorizedException` など） | `IdentityRejected` |
//! | `InternalErrorException` | `Cognito`（障害） |
//! | 通信失敗・タイムアウト・応答の解析失敗 | `Cognito`（障害） |
//! | 認証結果なし（追加チャレンジ要求） | `IdentityRejected`（`ChallengeRequired`） |

use async_trait::async_trait;
use aws_sdk_cognitoidentityprovider::{
    Client,
    error::{DisplayErrorContext, ProvideErrorMetadata, SdkError},
    operation::initiate_auth::InitiateAuthOutput,
    types::{AttributeType, AuthFlowType},
};
use quizbox_domain::credentials::Credentials;

use super::{AuthTokens, CodeDeliveryDetails, IdentityProvider, SignUpResult};
use crate::{InfraError, aws::load_sdk_config};

/// Cognito の内部エラーを示すエラーコード
const INTERNAL_ERROR_CODE: &str = "InternalErrorException";

/// 追加チャレンジ要求を示す拒否コード
pub const CHALLENGE_REQUIRED_CODE: &str = "ChallengeRequired";

/// Cognito 実装の IdentityProvider
pub struct CognitoIdentityProvider {
    client:    Client,
    client_id: String,
}

impl CognitoIdentityProvider {
    pub fn new(client: Client, client_id: String) -> Self {
        Self { client, client_id }
    }

    /// Cognito クライアントを作成する
    ///
    /// # 引数
    ///
    /// * `endpoint` - Cognito 互換エミュレータのエンドポイント URL。`None` の場合は AWS 既定
    pub async fn create_client(endpoint: Option<&str>) -> Client {
        let config = load_sdk_config(endpoint).await;
        Client::new(&config)
    }
}

#[async_trait]
impl IdentityProvider for CognitoIdentityProvider {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpResult, InfraError> {
        let email_attribute = AttributeType::builder()
            .name("email")
            .value(credentials.email.as_str())
            .build()
            .map_err(|e| InfraError::cognito(format!("email 属性の構築に失敗: {e}")))?;

        let output = self
            .client
            .sign_up()
            .client_id(&self.client_id)
            .username(credentials.email.as_str())
            .password(credentials.password.as_str())
            .user_attributes(email_attribute)
            .send()
            .await
            .map_err(|e| classify_sdk_error(e, "ユーザー登録"))?;

        let code_delivery_details = output.code_delivery_details().map(|details| {
            CodeDeliveryDetails {
                destination:     details.destination().map(str::to_string),
                delivery_medium: details.delivery_medium().map(|m| m.as_str().to_string()),
                attribute_name:  details.attribute_name().map(str::to_string),
            }
        });

        Ok(SignUpResult {
            user_confirmed: output.user_confirmed(),
            user_sub: output.user_sub().to_string(),
            code_delivery_details,
        })
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn initiate_auth(&self, credentials: &Credentials) -> Result<AuthTokens, InfraError> {
        let output = self
            .client
            .initiate_auth()
            .auth_flow(AuthFlowType::UserPasswordAuth)
            .client_id(&self.client_id)
            .auth_parameters("USERNAME", credentials.email.as_str())
            .auth_parameters("PASSWORD", credentials.password.as_str())
            .send()
            .await
            .map_err(|e| classify_sdk_error(e, "認証"))?;

        tokens_from_output(&output)
    }
}

/// 認証応答からトークンを取り出す
///
/// 認証結果がなくチャレンジのみ返された場合は `ChallengeRequired` の拒否とする。
fn tokens_from_output(output: &InitiateAuthOutput) -> Result<AuthTokens, InfraError> {
    let Some(result) = output.authentication_result() else {
        let challenge = output
            .challenge_name()
            .map(|c| c.as_str().to_string())
            .unwrap_or_else(|| "不明".to_string());
        return Err(InfraError::identity_rejected(
            CHALLENGE_REQUIRED_CODE,
            format!("追加の認証チャレンジが必要です: {challenge}"),
        ));
    };

    let id_token = result
        .id_token()
        .ok_or_else(|| InfraError::cognito("認証結果に ID トークンが含まれていません"))?;
    let access_token = result
        .access_token()
        .ok_or_else(|| InfraError::cognito("認証結果にアクセストークンが含まれていません"))?;

    Ok(AuthTokens {
        id_token:      id_token.to_string(),
        access_token:  access_token.to_string(),
        refresh_token: result.refresh_token().map(str::to_string),
    })
}

/// SDK エラーを拒否と障害に分類する
fn classify_sdk_error<E, R>(err: SdkError<E, R>, operation: &str) -> InfraError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    if let Some(service_err) = err.as_service_error()
        && let Some(code) = service_err.code()
        && code != INTERNAL_ERROR_CODE
    {
        return InfraError::identity_rejected(code, service_err.message().unwrap_or_default());
    }

    InfraError::cognito(format!("{operation}に失敗: {}", DisplayErrorContext(&err)))
}
