//! The narrow request/response surface of the external identity provider.
//!
//! Protocol internals (challenge flows, token issuance, credential storage)
//! stay on the provider's side; this is only the call surface the screens
//! need: register, login, refresh.

use crate::error::AuthError;
use daybook_domain::UserId;
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub username: String,
}

/// Tokens handed back to the client after login or refresh.
#[derive(Debug, Clone, Serialize)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: i32,
}

pub trait IdentityProvider: Send + Sync + 'static {
    fn register(
        &self,
        registration: Registration,
    ) -> impl Future<Output = Result<UserId, AuthError>> + Send;
    fn login(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<TokenSet, AuthError>> + Send;
    fn refresh(
        &self,
        refresh_token: &str,
    ) -> impl Future<Output = Result<TokenSet, AuthError>> + Send;
}

#[derive(Debug, Clone)]
struct StaticAccount {
    password: String,
    sub: String,
}

/// In-process identity provider for local development and router tests.
/// Issued access tokens are the bare user id, which pairs with the
/// verifier's insecure mode.
#[derive(Default)]
pub struct StaticIdentityProvider {
    accounts: Mutex<HashMap<String, StaticAccount>>,
}

impl StaticIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityProvider for StaticIdentityProvider {
    async fn register(&self, registration: Registration) -> Result<UserId, AuthError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(&registration.email) {
            return Err(AuthError::Rejected("Email already in use".to_string()));
        }
        let sub = ulid::Ulid::new().to_string();
        accounts.insert(
            registration.email,
            StaticAccount {
                password: registration.password,
                sub: sub.clone(),
            },
        );
        UserId::from_string(sub).map_err(|e| AuthError::Provider(e.to_string()))
    }

    async fn login(&self, email: &str, password: &str) -> Result<TokenSet, AuthError> {
        let accounts = self.accounts.lock().unwrap();
        let account = accounts
            .get(email)
            .filter(|a| a.password == password)
            .ok_or_else(|| AuthError::Rejected("Invalid credential".to_string()))?;
        Ok(TokenSet {
            access_token: account.sub.clone(),
            refresh_token: Some(format!("refresh:{}", account.sub)),
            expires_in: 3600,
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenSet, AuthError> {
        let sub = refresh_token
            .strip_prefix("refresh:")
            .ok_or_else(|| AuthError::InvalidToken("Unknown refresh token".to_string()))?;
        Ok(TokenSet {
            access_token: sub.to_string(),
            refresh_token: Some(refresh_token.to_string()),
            expires_in: 3600,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> Registration {
        Registration {
            email: "a@example.com".to_string(),
            password: "hunter2!".to_string(),
            username: "Alice".to_string(),
        }
    }

    #[tokio::test]
    async fn register_then_login_round_trips() {
        let idp = StaticIdentityProvider::new();
        let user = idp.register(registration()).await.unwrap();
        let tokens = idp.login("a@example.com", "hunter2!").await.unwrap();
        assert_eq!(tokens.access_token, user.as_str());

        let refreshed = idp
            .refresh(tokens.refresh_token.as_deref().unwrap())
            .await
            .unwrap();
        assert_eq!(refreshed.access_token, user.as_str());
    }

    #[tokio::test]
    async fn duplicate_email_and_bad_password_are_rejected() {
        let idp = StaticIdentityProvider::new();
        idp.register(registration()).await.unwrap();
        assert!(matches!(
            idp.register(registration()).await,
            Err(AuthError::Rejected(_))
        ));
        assert!(matches!(
            idp.login("a@example.com", "wrong").await,
            Err(AuthError::Rejected(_))
        ));
    }
}
