//! # テスト用モック
//!
//! ハンドラテストで使用するインメモリのリポジトリと ID プロバイダ。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! quizbox-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use quizbox_domain::{
    credentials::Credentials,
    quiz::{Question, Quiz},
    quiz_id::QuizId,
};

use crate::{
    error::InfraError,
    identity::{
        AuthTokens,
        CodeDeliveryDetails,
        IdentityProvider,
        SignUpResult,
        cognito::CHALLENGE_REQUIRED_CODE,
    },
    repository::QuizRepository,
};

// ===== InMemoryQuizRepository =====

/// インメモリの QuizRepository
///
/// DynamoDB 実装と同じく、`insert` は同一 ID を上書きし、
/// 存在しないクイズへの `append_question` は条件不成立エラーになる。
#[derive(Clone, Default)]
pub struct InMemoryQuizRepository {
    quizzes: Arc<Mutex<Vec<Quiz>>>,
    failure: Option<String>,
}

impl InMemoryQuizRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// すべての操作が DynamoDB エラーで失敗するリポジトリを作成する
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            quizzes: Arc::default(),
            failure: Some(message.into()),
        }
    }

    pub fn add_quiz(&self, quiz: Quiz) {
        self.quizzes.lock().unwrap().push(quiz);
    }

    /// 保存されているクイズの件数
    pub fn len(&self) -> usize {
        self.quizzes.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_failure(&self) -> Result<(), InfraError> {
        match &self.failure {
            Some(message) => Err(InfraError::dynamo_db(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn insert(&self, quiz: &Quiz) -> Result<(), InfraError> {
        self.check_failure()?;
        let mut quizzes = self.quizzes.lock().unwrap();
        quizzes.retain(|q| q.quiz_id() != quiz.quiz_id());
        quizzes.push(quiz.clone());
        Ok(())
    }

    async fn scan(&self) -> Result<Vec<Quiz>, InfraError> {
        self.check_failure()?;
        Ok(self.quizzes.lock().unwrap().clone())
    }

    async fn find_by_id(&self, quiz_id: &QuizId) -> Result<Option<Quiz>, InfraError> {
        self.check_failure()?;
        Ok(self
            .quizzes
            .lock()
            .unwrap()
            .iter()
            .find(|q| q.quiz_id() == quiz_id)
            .cloned())
    }

    async fn append_question(
        &self,
        quiz_id: &QuizId,
        question: &Question,
    ) -> Result<Vec<Question>, InfraError> {
        self.check_failure()?;
        let mut quizzes = self.quizzes.lock().unwrap();
        let Some(index) = quizzes.iter().position(|q| q.quiz_id() == quiz_id) else {
            return Err(InfraError::condition_failed("Quiz", quiz_id.as_str()));
        };
        let updated = quizzes.remove(index).with_question(question.clone());
        let questions = updated.questions().to_vec();
        quizzes.insert(index, updated);
        Ok(questions)
    }

    async fn delete(&self, quiz_id: &QuizId) -> Result<(), InfraError> {
        self.check_failure()?;
        self.quizzes
            .lock()
            .unwrap()
            .retain(|q| q.quiz_id() != quiz_id);
        Ok(())
    }
}

// ===== StubIdentityProvider =====

/// インメモリの IdentityProvider
///
/// Cognito と同じエラーコードで拒否を返す:
/// - 登録済みメールアドレスでの登録: `UsernameExistsException`
/// - 未登録ユーザー・パスワード不一致でのログイン: `NotAuthorizedException`
/// - チャレンジ要求中のユーザーのログイン: `ChallengeRequired`
#[derive(Clone, Default)]
pub struct StubIdentityProvider {
    users:      Arc<Mutex<Vec<(String, String)>>>,
    challenged: Arc<Mutex<Vec<String>>>,
    failure:    Option<String>,
}

impl StubIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// すべての操作が Cognito の障害で失敗するプロバイダを作成する
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            users:      Arc::default(),
            challenged: Arc::default(),
            failure:    Some(message.into()),
        }
    }

    /// 登録済みユーザーを追加する
    pub fn add_user(&self, email: impl Into<String>, password: impl Into<String>) {
        self.users
            .lock()
            .unwrap()
            .push((email.into(), password.into()));
    }

    /// ログイン時に認証結果の代わりに NEW_PASSWORD_REQUIRED チャレンジを返すようにする
    pub fn require_challenge(&self, email: impl Into<String>) {
        self.challenged.lock().unwrap().push(email.into());
    }

    fn check_failure(&self) -> Result<(), InfraError> {
        match &self.failure {
            Some(message) => Err(InfraError::cognito(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl IdentityProvider for StubIdentityProvider {
    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpResult, InfraError> {
        self.check_failure()?;
        let mut users = self.users.lock().unwrap();
        let email = credentials.email.as_str();
        if users.iter().any(|(registered, _)| registered == email) {
            return Err(InfraError::identity_rejected(
                "UsernameExistsException",
                "User already exists",
            ));
        }
        users.push((email.to_string(), credentials.password.as_str().to_string()));

        Ok(SignUpResult {
            user_confirmed:        false,
            user_sub:              format!("sub-{}", users.len()),
            code_delivery_details: Some(CodeDeliveryDetails {
                destination:     Some(email.to_string()),
                delivery_medium: Some("EMAIL".to_string()),
                attribute_name:  Some("email".to_string()),
            }),
        })
    }

    async fn initiate_auth(&self, credentials: &Credentials) -> Result<AuthTokens, InfraError> {
        self.check_failure()?;
        let users = self.users.lock().unwrap();
        let matched = users.iter().any(|(email, password)| {
            email == credentials.email.as_str() && password == credentials.password.as_str()
        });
        if !matched {
            return Err(InfraError::identity_rejected(
                "NotAuthorizedException",
                "Incorrect username or password.",
            ));
        }

        let email = credentials.email.as_str();
        if self.challenged.lock().unwrap().iter().any(|e| e == email) {
            return Err(InfraError::identity_rejected(
                CHALLENGE_REQUIRED_CODE,
                "追加の認証チャレンジが必要です: NEW_PASSWORD_REQUIRED",
            ));
        }
        Ok(AuthTokens {
            id_token:      format!("id-token-{email}"),
            access_token:  format!("access-token-{email}"),
            refresh_token: Some(format!("refresh-token-{email}")),
        })
    }
}
