//! Live list feeds over SSE.
//!
//! Each connection owns one [`Subscription`]; the handle drops with the
//! stream when the client disconnects, which is the teardown the screens
//! need. On every change the full list is re-fetched and emitted, so the
//! client's view is always a wholesale replacement, never a partial merge.

use crate::auth::Owner;
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use daybook_auth::IdentityProvider;
use daybook_domain::summary::sort_newest_first;
use daybook_store::{Collection, RecordStore, Subscription};
use futures::Stream;

pub async fn tasks<S: RecordStore, P: IdentityProvider>(
    State(state): State<AppState<S, P>>,
    Owner(owner): Owner,
) -> Sse<impl Stream<Item = Result<Event, ApiError>>> {
    let subscription = state.feed.subscribe(&owner, Collection::Tasks);
    let stream = futures::stream::unfold(
        (state, owner, subscription, true),
        |(state, owner, mut subscription, initial)| async move {
            if !initial && !subscription.changed().await {
                return None;
            }
            let event = match state.store.list_tasks(&owner).await {
                Ok(mut tasks) => {
                    sort_newest_first(&mut tasks);
                    Event::default()
                        .event("tasks")
                        .json_data(&tasks)
                        .map_err(|e| ApiError::Internal(e.to_string()))
                }
                Err(e) => Err(ApiError::from(e)),
            };
            Some((event, (state, owner, subscription, false)))
        },
    );
    Sse::new(stream).keep_alive(KeepAlive::default())
}

pub async fn folders<S: RecordStore, P: IdentityProvider>(
    State(state): State<AppState<S, P>>,
    Owner(owner): Owner,
) -> Sse<impl Stream<Item = Result<Event, ApiError>>> {
    let subscription: Subscription = state.feed.subscribe(&owner, Collection::Folders);
    let stream = futures::stream::unfold(
        (state, owner, subscription, true),
        |(state, owner, mut subscription, initial)| async move {
            if !initial && !subscription.changed().await {
                return None;
            }
            let event = match state.store.list_folders(&owner).await {
                Ok(folders) => Event::default()
                    .event("folders")
                    .json_data(&folders)
                    .map_err(|e| ApiError::Internal(e.to_string())),
                Err(e) => Err(ApiError::from(e)),
            };
            Some((event, (state, owner, subscription, false)))
        },
    );
    Sse::new(stream).keep_alive(KeepAlive::default())
}
