//! # AWS SDK 設定
//!
//! DynamoDB・Cognito クライアントが共有する SDK 設定を読み込む。
//!
//! - **本番環境**: Lambda 実行ロールの認証情報とリージョンを環境から解決する
//! - **ローカル開発**: エンドポイントを差し替え、ダミーの認証情報とリージョンを使う

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_dynamodb::config::Credentials;

/// ローカルエンドポイント使用時のリージョン
const LOCAL_REGION: &str = "ap-northeast-1";

/// SDK 設定を読み込む
///
/// # 引数
///
/// * `endpoint` - ローカルエンドポイント URL（例: `http://localhost:18000`）。
///   `None` の場合は環境の既定値を使う
pub async fn load_sdk_config(endpoint: Option<&str>) -> SdkConfig {
    let loader = aws_config::defaults(BehaviorVersion::latest());

    match endpoint {
        Some(endpoint) => {
            loader
                .endpoint_url(endpoint)
                .region(Region::new(LOCAL_REGION))
                // ローカルエミュレータはクレデンシャルを検証しないが、SDK はプロバイダが必要
                .credentials_provider(Credentials::new("local", "local", None, None, "local"))
                .load()
                .await
        }
        None => loader.load().await,
    }
}
