//! Bearer-token extraction for record routes.

use crate::error::ApiError;
use crate::state::AppState;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use daybook_auth::IdentityProvider;
use daybook_domain::UserId;
use daybook_store::RecordStore;

/// The authenticated caller. Every record handler takes this; there is no
/// unauthenticated path to stored data.
pub struct Owner(pub UserId);

#[async_trait]
impl<S, P> FromRequestParts<AppState<S, P>> for Owner
where
    S: RecordStore,
    P: IdentityProvider,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S, P>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("Expected a bearer token".to_string()))?;

        let claims = state.verifier.verify(token)?;
        Ok(Owner(claims.user_id()?))
    }
}
