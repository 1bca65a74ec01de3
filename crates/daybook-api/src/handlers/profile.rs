use crate::auth::Owner;
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use daybook_auth::IdentityProvider;
use daybook_domain::UserProfile;
use daybook_store::RecordStore;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub bio: Option<String>,
    pub profile_url: Option<String>,
    pub cover_url: Option<String>,
}

/// First read creates a default profile, so a freshly registered user
/// always sees something on the profile screen.
pub async fn get<S: RecordStore, P: IdentityProvider>(
    State(state): State<AppState<S, P>>,
    Owner(owner): Owner,
) -> Result<Json<UserProfile>, ApiError> {
    match state.store.get_profile(&owner).await? {
        Some(profile) => Ok(Json(profile)),
        None => {
            let profile = UserProfile::new(owner.clone(), String::new(), None);
            state.store.put_profile(&profile).await?;
            tracing::info!(owner = owner.as_str(), "Default profile created");
            Ok(Json(profile))
        }
    }
}

pub async fn update<S: RecordStore, P: IdentityProvider>(
    State(state): State<AppState<S, P>>,
    Owner(owner): Owner,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    let mut profile = match state.store.get_profile(&owner).await? {
        Some(profile) => profile,
        None => UserProfile::new(owner.clone(), String::new(), None),
    };

    if let Some(username) = req.username {
        if username.trim().is_empty() {
            return Err(ApiError::BadRequest("Username cannot be empty".to_string()));
        }
        profile.username = username.trim().to_string();
    }
    if let Some(bio) = req.bio {
        profile.bio = bio;
    }
    if let Some(url) = req.profile_url {
        profile.profile_url = Some(url);
    }
    if let Some(url) = req.cover_url {
        profile.cover_url = Some(url);
    }

    state.store.put_profile(&profile).await?;
    Ok(Json(profile))
}
