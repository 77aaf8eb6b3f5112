//! # 認証情報
//!
//! ユーザー登録・ログインで ID プロバイダに転送する値オブジェクト。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 用途 |
//! |---|------------|------|
//! | [`Email`] | メールアドレス | ユーザー名兼 `email` 属性 |
//! | [`PlainPassword`] | 平文パスワード | 登録・ログイン時の入力値 |
//! | [`Credentials`] | 認証情報 | 上記の組 |
//!
//! 形式の検証は ID プロバイダに委ねる。

use serde::Deserialize;

/// メールアドレス
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, derive_more::Display)]
#[serde(transparent)]
#[display("{_0}")]
pub struct Email(String);

impl Email {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 平文パスワード
///
/// # セキュリティ
///
/// Debug 出力ではパスワードの値をマスクする。Display は実装しない。
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct PlainPassword(String);

impl std::fmt::Debug for PlainPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PlainPassword").field(&"[REDACTED]").finish()
    }
}

impl PlainPassword {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 認証情報（メールアドレス + 平文パスワード）
///
/// 登録・ログインのリクエストボディ `{"email", "password"}` に対応する。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub email:    Email,
    pub password: PlainPassword,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email:    Email::new(email),
            password: PlainPassword::new(password),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_平文パスワードのdebug出力はマスクされる() {
        let credentials = Credentials::new("alice@example.com", "hunter2");

        let debug = format!("{credentials:?}");

        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("alice@example.com"));
    }

    #[test]
    fn test_リクエストボディからデシリアライズできる() {
        let credentials: Credentials = serde_json::from_str(
            r#"{"email": "alice@example.com", "password": "P@ssw0rd!"}"#,
        )
        .unwrap();

        assert_eq!(credentials.email.as_str(), "alice@example.com");
        assert_eq!(credentials.password.as_str(), "P@ssw0rd!");
    }
}
