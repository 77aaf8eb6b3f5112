//! # Quizbox Lambda 関数
//!
//! API Gateway プロキシイベントを受け取り、設定された関数のパイプラインで処理する。
//! 全関数で同じバイナリ（`bootstrap`）を使い、環境変数で担当する関数を切り替える。
//!
//! ## 処理の流れ
//!
//! ```text
//! lambda_http::run → CanonicalLogLineLayer → ApiEvent::from → Pipeline::invoke → Response
//! ```
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `QUIZBOX_FUNCTION` / `_HANDLER` | **Yes**（いずれか） | 担当する関数（例: `createQuiz`, `handler.loginUser`） |
//! | `COGNITO_CLIENT_ID` | ユーザー関数のみ | Cognito アプリクライアント ID |
//! | `QUIZZES_TABLE` | No | クイズテーブル名（デフォルト: `Quizzes`） |
//! | `QUIZ_ID_STRATEGY` | No | `timestamp`（デフォルト）または `uuid` |
//! | `DYNAMODB_ENDPOINT` | No | DynamoDB Local のエンドポイント。設定時はテーブルを自動作成 |
//! | `COGNITO_ENDPOINT` | No | Cognito 互換エミュレータのエンドポイント |
//! | `LOG_FORMAT` | No | `json` または `pretty`（デフォルトは Lambda 上で `json`、ローカルで `pretty`） |
//!
//! ## ローカル実行
//!
//! ```bash
//! QUIZBOX_FUNCTION=createQuiz DYNAMODB_ENDPOINT=http://localhost:18000 cargo lambda watch
//! ```

mod config;

use std::sync::Arc;

use anyhow::Context as _;
use config::FunctionConfig;
use lambda_http::{Body, Request, Response, service_fn};
use quizbox_domain::clock::SystemClock;
use quizbox_functions::{
    ApiEvent,
    FunctionName,
    Pipeline,
    app_builder::{quiz_pipeline, user_pipeline},
    handler::{QuizState, UserState},
};
use quizbox_infra::{CognitoIdentityProvider, DynamoDbQuizRepository, dynamodb};
use quizbox_shared::{
    canonical_log::CanonicalLogLineLayer,
    observability::{TracingConfig, init_tracing},
};
use tower::ServiceBuilder;

/// Lambda 関数のエントリーポイント
#[tokio::main]
async fn main() -> Result<(), lambda_http::Error> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    init_tracing(&TracingConfig::from_env());

    let config = FunctionConfig::from_env().context("設定の読み込みに失敗しました")?;
    tracing::info!(function = %config.function, "Lambda 関数を起動します");

    // クライアントはコールドスタート時に 1 回だけ作成し、呼び出し間で共有する
    let pipeline = Arc::new(build_pipeline(&config).await?);

    let service = ServiceBuilder::new()
        .layer(CanonicalLogLineLayer::new(config.function.to_string()))
        .service(service_fn(move |request: Request| {
            let pipeline = pipeline.clone();
            async move { handle(&pipeline, request).await }
        }));

    lambda_http::run(service).await
}

/// 1 回の呼び出しを処理する
async fn handle(pipeline: &Pipeline, request: Request) -> Result<Response<Body>, lambda_http::Error> {
    let response = pipeline.invoke(ApiEvent::from(request)).await?;
    Ok(response.into())
}

/// 関数に必要なクライアントと State を作成し、パイプラインを構築する
async fn build_pipeline(config: &FunctionConfig) -> anyhow::Result<Pipeline> {
    match config.function {
        FunctionName::Quiz(function) => {
            let endpoint = config.dynamodb_endpoint.as_deref();
            let client = dynamodb::create_client(endpoint).await;

            // ローカル開発時のみテーブルを自動作成（本番はデプロイ定義で作成済み）
            if endpoint.is_some() {
                dynamodb::ensure_quiz_table(&client, &config.quizzes_table)
                    .await
                    .context("クイズテーブルの準備に失敗しました")?;
            }

            let state = Arc::new(QuizState {
                repository:   Arc::new(DynamoDbQuizRepository::new(
                    client,
                    config.quizzes_table.clone(),
                )),
                id_generator: config.quiz_id_strategy.generator(Arc::new(SystemClock)),
            });
            Ok(quiz_pipeline(function, state))
        }
        FunctionName::User(function) => {
            let client_id = config
                .cognito_client_id
                .clone()
                .context("COGNITO_CLIENT_ID が設定されていません")?;
            let client =
                CognitoIdentityProvider::create_client(config.cognito_endpoint.as_deref()).await;

            let state = Arc::new(UserState {
                identity: Arc::new(CognitoIdentityProvider::new(client, client_id)),
            });
            Ok(user_pipeline(function, state))
        }
    }
}
