use super::record_id;
use crate::auth::Owner;
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use daybook_auth::IdentityProvider;
use daybook_domain::{build_date_index, schedules_on, DayMarking, Schedule};
use daybook_store::{Collection, RecordStore, SchedulePatch};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub selected: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct CreateScheduleRequest {
    pub subject: String,
    pub time: String,
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct UpdateScheduleRequest {
    pub subject: Option<String>,
    pub time: Option<String>,
    pub date: Option<NaiveDate>,
}

pub async fn list<S: RecordStore, P: IdentityProvider>(
    State(state): State<AppState<S, P>>,
    Owner(owner): Owner,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Schedule>>, ApiError> {
    let schedules = state.store.list_schedules(&owner).await?;
    match query.date {
        Some(date) => Ok(Json(
            schedules_on(&schedules, date).into_iter().cloned().collect(),
        )),
        None => Ok(Json(schedules)),
    }
}

pub async fn create<S: RecordStore, P: IdentityProvider>(
    State(state): State<AppState<S, P>>,
    Owner(owner): Owner,
    Json(req): Json<CreateScheduleRequest>,
) -> Result<(StatusCode, Json<Schedule>), ApiError> {
    let schedule = Schedule::new(req.subject, req.time, req.date, owner.clone())?;
    state.store.put_schedule(&schedule).await?;
    state.feed.publish(&owner, Collection::Schedules);

    tracing::info!(
        schedule_id = schedule.id.as_str(),
        owner = owner.as_str(),
        date = %schedule.date,
        "Schedule created"
    );
    Ok((StatusCode::CREATED, Json(schedule)))
}

pub async fn update<S: RecordStore, P: IdentityProvider>(
    State(state): State<AppState<S, P>>,
    Owner(owner): Owner,
    Path(id): Path<String>,
    Json(req): Json<UpdateScheduleRequest>,
) -> Result<Json<Schedule>, ApiError> {
    if req.subject.is_none() && req.time.is_none() && req.date.is_none() {
        return Err(ApiError::BadRequest(
            "At least one of 'subject', 'time' or 'date' is required".to_string(),
        ));
    }
    for field in [req.subject.as_deref(), req.time.as_deref()].into_iter().flatten() {
        if field.trim().is_empty() {
            return Err(ApiError::BadRequest("Fields cannot be blank".to_string()));
        }
    }

    let id = record_id(&id)?;
    let patch = SchedulePatch {
        subject: req.subject.map(|s| s.trim().to_string()),
        time: req.time.map(|t| t.trim().to_string()),
        date: req.date,
    };
    let schedule = state.store.update_schedule(&owner, &id, patch).await?;
    state.feed.publish(&owner, Collection::Schedules);
    Ok(Json(schedule))
}

pub async fn delete<S: RecordStore, P: IdentityProvider>(
    State(state): State<AppState<S, P>>,
    Owner(owner): Owner,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = record_id(&id)?;
    state.store.delete_schedule(&owner, &id).await?;
    state.feed.publish(&owner, Collection::Schedules);
    Ok(StatusCode::NO_CONTENT)
}

/// The calendar widget's marking map, recomputed over the full list on
/// every call.
pub async fn calendar<S: RecordStore, P: IdentityProvider>(
    State(state): State<AppState<S, P>>,
    Owner(owner): Owner,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<BTreeMap<NaiveDate, DayMarking>>, ApiError> {
    let schedules = state.store.list_schedules(&owner).await?;
    Ok(Json(build_date_index(&schedules, query.selected)))
}
