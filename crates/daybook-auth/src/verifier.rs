//! Bearer-token verification.
//!
//! Access tokens are RS256 JWTs issued by the identity provider; the
//! verifier fetches the issuer's JWKS once at startup and validates
//! signature, issuer and client id. The insecure mode exists for local
//! development and router tests only: it takes the bearer token as the
//! literal user id and must never be configured in a deployed service.

use crate::error::AuthError;
use daybook_domain::UserId;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::info;

/// The claims this service cares about. Everything else in the token is
/// the provider's business.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
}

impl Claims {
    pub fn user_id(&self) -> Result<UserId, AuthError> {
        UserId::from_string(self.sub.clone())
            .map_err(|_| AuthError::InvalidToken("Missing sub claim".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct Jwk {
    kid: String,
    kty: String,
    n: String,
    e: String,
}

#[derive(Debug, Deserialize)]
struct Jwks {
    keys: Vec<Jwk>,
}

pub struct JwtVerifier {
    keys: HashMap<String, DecodingKey>,
    validation: Validation,
    client_id: Option<String>,
}

impl JwtVerifier {
    /// Fetches `{issuer}/.well-known/jwks.json` and prepares validation
    /// against the issuer. Key rotation requires a restart; acceptable for
    /// the deployment sizes this serves.
    pub async fn from_issuer(issuer: &str, client_id: Option<String>) -> Result<Self, AuthError> {
        let url = format!("{}/.well-known/jwks.json", issuer.trim_end_matches('/'));
        let jwks: Jwks = reqwest::get(&url)
            .await
            .map_err(|e| AuthError::Provider(format!("JWKS fetch failed: {e}")))?
            .json()
            .await
            .map_err(|e| AuthError::Provider(format!("JWKS parse failed: {e}")))?;

        let mut keys = HashMap::new();
        for jwk in jwks.keys.into_iter().filter(|k| k.kty == "RSA") {
            let key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
                .map_err(|e| AuthError::Provider(format!("Bad JWK {}: {e}", jwk.kid)))?;
            keys.insert(jwk.kid, key);
        }
        if keys.is_empty() {
            return Err(AuthError::Provider("JWKS contained no RSA keys".to_string()));
        }
        info!(issuer, key_count = keys.len(), "JWKS loaded");

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[issuer]);
        // Access tokens carry client_id rather than aud; checked below.
        validation.validate_aud = false;

        Ok(Self {
            keys,
            validation,
            client_id,
        })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header =
            decode_header(token).map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidToken("Token has no kid".to_string()))?;
        let key = self
            .keys
            .get(&kid)
            .ok_or_else(|| AuthError::InvalidToken(format!("Unknown signing key {kid}")))?;

        let data = decode::<Claims>(token, key, &self.validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        if let Some(expected) = &self.client_id {
            if data.claims.client_id.as_deref() != Some(expected.as_str()) {
                return Err(AuthError::InvalidToken(
                    "Token was issued for another client".to_string(),
                ));
            }
        }

        Ok(data.claims)
    }
}

pub enum TokenVerifier {
    Jwt(JwtVerifier),
    /// Bearer token is taken as the raw user id. Local dev and tests only.
    Insecure,
}

impl TokenVerifier {
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        match self {
            TokenVerifier::Jwt(verifier) => verifier.verify(token),
            TokenVerifier::Insecure => {
                if token.is_empty() {
                    return Err(AuthError::InvalidToken("Empty bearer token".to_string()));
                }
                Ok(Claims {
                    sub: token.to_string(),
                    email: None,
                    client_id: None,
                })
            }
        }
    }
}
