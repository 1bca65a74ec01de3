use super::record_id;
use crate::auth::Owner;
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use daybook_auth::IdentityProvider;
use daybook_domain::{Folder, Note, Timestamp};
use daybook_store::{Collection, RecordStore};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateFolderRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFolderRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

pub async fn list<S: RecordStore, P: IdentityProvider>(
    State(state): State<AppState<S, P>>,
    Owner(owner): Owner,
) -> Result<Json<Vec<Folder>>, ApiError> {
    Ok(Json(state.store.list_folders(&owner).await?))
}

pub async fn create<S: RecordStore, P: IdentityProvider>(
    State(state): State<AppState<S, P>>,
    Owner(owner): Owner,
    Json(req): Json<CreateFolderRequest>,
) -> Result<(StatusCode, Json<Folder>), ApiError> {
    let folder = Folder::new(req.name, req.description, owner.clone())?;
    state.store.put_folder(&folder).await?;
    state.feed.publish(&owner, Collection::Folders);

    tracing::info!(folder_id = folder.id.as_str(), owner = owner.as_str(), "Folder created");
    Ok((StatusCode::CREATED, Json(folder)))
}

pub async fn update<S: RecordStore, P: IdentityProvider>(
    State(state): State<AppState<S, P>>,
    Owner(owner): Owner,
    Path(id): Path<String>,
    Json(req): Json<UpdateFolderRequest>,
) -> Result<Json<Folder>, ApiError> {
    if req.name.is_none() && req.description.is_none() {
        return Err(ApiError::BadRequest(
            "At least one of 'name' or 'description' is required".to_string(),
        ));
    }
    let id = record_id(&id)?;
    let mut folder = state.store.get_folder(&owner, &id).await?;
    // Omitted fields keep their current value.
    let name = req.name.unwrap_or_else(|| folder.name.clone());
    let description = req
        .description
        .unwrap_or_else(|| folder.description.clone());
    folder.rename(name, description)?;
    state.store.put_folder(&folder).await?;
    state.feed.publish(&owner, Collection::Folders);
    Ok(Json(folder))
}

/// Deleting a folder discards its embedded notes with it; they have no
/// life of their own.
pub async fn delete<S: RecordStore, P: IdentityProvider>(
    State(state): State<AppState<S, P>>,
    Owner(owner): Owner,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = record_id(&id)?;
    state.store.delete_folder(&owner, &id).await?;
    state.feed.publish(&owner, Collection::Folders);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_note<S: RecordStore, P: IdentityProvider>(
    State(state): State<AppState<S, P>>,
    Owner(owner): Owner,
    Path(folder_id): Path<String>,
    Json(req): Json<NoteRequest>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let folder_id = record_id(&folder_id)?;
    let mut folder = state.store.get_folder(&owner, &folder_id).await?;
    let note = Note::new(req.title, req.content)?;
    folder.add_note(note.clone());
    state.store.put_folder(&folder).await?;
    state.feed.publish(&owner, Collection::Folders);
    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn update_note<S: RecordStore, P: IdentityProvider>(
    State(state): State<AppState<S, P>>,
    Owner(owner): Owner,
    Path((folder_id, note_id)): Path<(String, String)>,
    Json(req): Json<NoteRequest>,
) -> Result<Json<Note>, ApiError> {
    let folder_id = record_id(&folder_id)?;
    let note_id = record_id(&note_id)?;
    Note::validate_title(&req.title)?;

    let mut folder = state.store.get_folder(&owner, &folder_id).await?;
    let note = Note {
        id: note_id,
        title: req.title.trim().to_string(),
        content: req.content,
        timestamp: Some(Timestamp::now()),
    };
    folder.replace_note(note.clone())?;
    state.store.put_folder(&folder).await?;
    state.feed.publish(&owner, Collection::Folders);
    Ok(Json(note))
}

pub async fn delete_note<S: RecordStore, P: IdentityProvider>(
    State(state): State<AppState<S, P>>,
    Owner(owner): Owner,
    Path((folder_id, note_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let folder_id = record_id(&folder_id)?;
    let note_id = record_id(&note_id)?;
    let mut folder = state.store.get_folder(&owner, &folder_id).await?;
    folder.remove_note(&note_id)?;
    state.store.put_folder(&folder).await?;
    state.feed.publish(&owner, Collection::Folders);
    Ok(StatusCode::NO_CONTENT)
}
