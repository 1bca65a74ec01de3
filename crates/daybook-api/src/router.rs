use crate::handlers::{folders, profile, schedules, session, tasks};
use crate::live;
use crate::state::AppState;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use daybook_auth::IdentityProvider;
use daybook_store::RecordStore;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct HealthBody {
    status: &'static str,
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthBody { status: "ok" }))
}

pub fn app<S: RecordStore, P: IdentityProvider>(state: AppState<S, P>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/auth/register", axum::routing::post(session::register::<S, P>))
        .route("/auth/login", axum::routing::post(session::login::<S, P>))
        .route("/auth/refresh", axum::routing::post(session::refresh::<S, P>))
        .route(
            "/tasks",
            get(tasks::list::<S, P>).post(tasks::create::<S, P>),
        )
        .route("/tasks/summary", get(tasks::summary::<S, P>))
        .route("/tasks/live", get(live::tasks::<S, P>))
        .route(
            "/tasks/:id",
            axum::routing::patch(tasks::update::<S, P>).delete(tasks::delete::<S, P>),
        )
        .route(
            "/folders",
            get(folders::list::<S, P>).post(folders::create::<S, P>),
        )
        .route("/folders/live", get(live::folders::<S, P>))
        .route(
            "/folders/:id",
            axum::routing::patch(folders::update::<S, P>).delete(folders::delete::<S, P>),
        )
        .route(
            "/folders/:id/notes",
            axum::routing::post(folders::create_note::<S, P>),
        )
        .route(
            "/folders/:id/notes/:note_id",
            axum::routing::patch(folders::update_note::<S, P>)
                .delete(folders::delete_note::<S, P>),
        )
        .route(
            "/schedules",
            get(schedules::list::<S, P>).post(schedules::create::<S, P>),
        )
        .route("/schedules/calendar", get(schedules::calendar::<S, P>))
        .route(
            "/schedules/:id",
            axum::routing::patch(schedules::update::<S, P>).delete(schedules::delete::<S, P>),
        )
        .route(
            "/profile",
            get(profile::get::<S, P>).patch(profile::update::<S, P>),
        )
        .with_state(state)
}
