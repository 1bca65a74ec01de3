//! Cognito-backed identity provider.

use crate::error::AuthError;
use crate::provider::{IdentityProvider, Registration, TokenSet};
use aws_sdk_cognitoidentityprovider::types::{AttributeType, AuthFlowType};
use aws_sdk_cognitoidentityprovider::Client;
use daybook_domain::UserId;
use tracing::{info, warn};

pub struct CognitoIdentityProvider {
    client: Client,
    client_id: String,
}

/// Translates provider faults into the short messages clients display.
/// Anything unrecognized stays an opaque provider error.
fn map_cognito_error(e: impl std::fmt::Display) -> AuthError {
    let text = e.to_string();
    if text.contains("UsernameExistsException") {
        AuthError::Rejected("Email already in use".to_string())
    } else if text.contains("NotAuthorizedException") || text.contains("UserNotFoundException") {
        AuthError::Rejected("Invalid credential".to_string())
    } else if text.contains("InvalidPasswordException") || text.contains("InvalidParameterException")
    {
        AuthError::Rejected(text)
    } else {
        AuthError::Provider(text)
    }
}

impl CognitoIdentityProvider {
    pub async fn new(client_id: String) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self {
            client: Client::new(&config),
            client_id,
        }
    }

    fn tokens_from(
        result: Option<&aws_sdk_cognitoidentityprovider::types::AuthenticationResultType>,
    ) -> Result<TokenSet, AuthError> {
        let auth = result
            .ok_or_else(|| AuthError::Provider("No authentication result".to_string()))?;
        Ok(TokenSet {
            access_token: auth
                .access_token()
                .ok_or_else(|| AuthError::Provider("Missing access token".to_string()))?
                .to_string(),
            refresh_token: auth.refresh_token().map(str::to_string),
            expires_in: auth.expires_in(),
        })
    }
}

impl IdentityProvider for CognitoIdentityProvider {
    async fn register(&self, registration: Registration) -> Result<UserId, AuthError> {
        let email_attr = AttributeType::builder()
            .name("email")
            .value(&registration.email)
            .build()
            .map_err(|e| AuthError::Provider(e.to_string()))?;
        let username_attr = AttributeType::builder()
            .name("preferred_username")
            .value(&registration.username)
            .build()
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        let response = self
            .client
            .sign_up()
            .client_id(&self.client_id)
            .username(&registration.email)
            .password(&registration.password)
            .user_attributes(email_attr)
            .user_attributes(username_attr)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Sign-up rejected by identity provider");
                map_cognito_error(e)
            })?;

        let sub = response.user_sub().to_string();
        info!(sub = %sub, "User registered");
        UserId::from_string(sub).map_err(|e| AuthError::Provider(e.to_string()))
    }

    async fn login(&self, email: &str, password: &str) -> Result<TokenSet, AuthError> {
        let response = self
            .client
            .initiate_auth()
            .auth_flow(AuthFlowType::UserPasswordAuth)
            .client_id(&self.client_id)
            .auth_parameters("USERNAME", email)
            .auth_parameters("PASSWORD", password)
            .send()
            .await
            .map_err(map_cognito_error)?;

        Self::tokens_from(response.authentication_result())
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenSet, AuthError> {
        let response = self
            .client
            .initiate_auth()
            .auth_flow(AuthFlowType::RefreshTokenAuth)
            .client_id(&self.client_id)
            .auth_parameters("REFRESH_TOKEN", refresh_token)
            .send()
            .await
            .map_err(map_cognito_error)?;

        Self::tokens_from(response.authentication_result())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cognito_faults_map_to_client_facing_messages() {
        assert!(matches!(
            map_cognito_error("... UsernameExistsException ..."),
            AuthError::Rejected(msg) if msg == "Email already in use"
        ));
        assert!(matches!(
            map_cognito_error("... NotAuthorizedException ..."),
            AuthError::Rejected(msg) if msg == "Invalid credential"
        ));
        assert!(matches!(
            map_cognito_error("service unavailable"),
            AuthError::Provider(_)
        ));
    }
}
