//! Auth endpoints: thin pass-throughs to the identity provider. The
//! provider owns the protocol; this layer only shapes requests and seeds
//! the new user's profile record.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use daybook_auth::{IdentityProvider, Registration, TokenSet};
use daybook_domain::{UserId, UserProfile};
use daybook_store::RecordStore;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: UserId,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

pub async fn register<S: RecordStore, P: IdentityProvider>(
    State(state): State<AppState<S, P>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    let email = req.email.trim().to_string();
    let user_id = state
        .idp
        .register(Registration {
            email: email.clone(),
            password: req.password,
            username: req.username.clone(),
        })
        .await?;

    // Seed the profile record so the profile screen has data on first load.
    let profile = UserProfile::new(user_id.clone(), req.username, Some(email));
    state.store.put_profile(&profile).await?;

    tracing::info!(user_id = user_id.as_str(), "User registered");
    Ok((StatusCode::CREATED, Json(RegisterResponse { user_id })))
}

pub async fn login<S: RecordStore, P: IdentityProvider>(
    State(state): State<AppState<S, P>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenSet>, ApiError> {
    let tokens = state.idp.login(req.email.trim(), &req.password).await?;
    Ok(Json(tokens))
}

pub async fn refresh<S: RecordStore, P: IdentityProvider>(
    State(state): State<AppState<S, P>>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<TokenSet>, ApiError> {
    let tokens = state.idp.refresh(&req.refresh_token).await?;
    Ok(Json(tokens))
}
