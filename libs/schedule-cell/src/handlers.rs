// libs/schedule-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use chrono::{DateTime, Utc};
use headers::{authorization::Bearer, Authorization};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{CreateBlockedTimeRequest, ScheduleError, SlotQuery, UpdateWorkingHoursRequest};
use crate::services::resolver::AvailabilityService;
use crate::services::timetable::TimetableService;

#[derive(Debug, Deserialize)]
pub struct BlockedTimeListQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

fn professional_id(user: &User) -> Result<Uuid, AppError> {
    Uuid::parse_str(&user.id).map_err(|_| AppError::BadRequest("Invalid professional ID".to_string()))
}

fn map_schedule_error(e: ScheduleError) -> AppError {
    match e {
        ScheduleError::ProfessionalNotFound => AppError::NotFound("Professional not found".to_string()),
        ScheduleError::ServiceNotFound => AppError::NotFound("Service not found".to_string()),
        ScheduleError::BlockedTimeNotFound => AppError::NotFound("Blocked time not found".to_string()),
        ScheduleError::InvalidRange(msg) => AppError::BadRequest(msg),
        ScheduleError::ValidationError(msg) => AppError::ValidationError(msg),
        ScheduleError::DatabaseError(msg) => AppError::Internal(msg),
    }
}

// ==============================================================================
// WORKING HOURS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_working_hours(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let owner = professional_id(&user)?;
    let timetable = TimetableService::new(&state);

    let working_hours = timetable
        .get_working_hours(owner, auth.token())
        .await
        .map_err(map_schedule_error)?;

    Ok(Json(json!({ "working_hours": working_hours })))
}

#[axum::debug_handler]
pub async fn update_working_hours(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdateWorkingHoursRequest>,
) -> Result<Json<Value>, AppError> {
    let owner = professional_id(&user)?;
    let timetable = TimetableService::new(&state);

    let working_hours = timetable
        .update_working_hours(owner, request, auth.token())
        .await
        .map_err(map_schedule_error)?;

    Ok(Json(json!({
        "success": true,
        "working_hours": working_hours,
        "message": "Working hours updated successfully"
    })))
}

// ==============================================================================
// BLOCKED TIMES
// ==============================================================================

#[axum::debug_handler]
pub async fn list_blocked_times(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<BlockedTimeListQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let owner = professional_id(&user)?;
    let timetable = TimetableService::new(&state);

    let blocked_times = timetable
        .list_blocked_times(owner, query.from, query.to, auth.token())
        .await
        .map_err(map_schedule_error)?;

    Ok(Json(json!({ "blocked_times": blocked_times })))
}

#[axum::debug_handler]
pub async fn create_blocked_time(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateBlockedTimeRequest>,
) -> Result<Json<Value>, AppError> {
    let owner = professional_id(&user)?;
    let timetable = TimetableService::new(&state);

    let blocked_time = timetable
        .create_blocked_time(owner, request, auth.token())
        .await
        .map_err(map_schedule_error)?;

    Ok(Json(json!({
        "success": true,
        "blocked_time": blocked_time,
        "message": "Blocked time created successfully"
    })))
}

#[axum::debug_handler]
pub async fn delete_blocked_time(
    State(state): State<Arc<AppConfig>>,
    Path(blocked_time_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let owner = professional_id(&user)?;
    let timetable = TimetableService::new(&state);

    timetable
        .delete_blocked_time(blocked_time_id, owner, auth.token())
        .await
        .map_err(map_schedule_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Blocked time deleted successfully"
    })))
}

// ==============================================================================
// AVAILABILITY (public: the booking page calls this unauthenticated)
// ==============================================================================

#[axum::debug_handler]
pub async fn get_available_slots(
    State(state): State<Arc<AppConfig>>,
    Path(professional_id): Path<Uuid>,
    Query(query): Query<SlotQuery>,
) -> Result<Json<Value>, AppError> {
    let resolver = AvailabilityService::new(&state);

    let slots = resolver
        .available_slots(professional_id, query, None)
        .await
        .map_err(map_schedule_error)?;

    Ok(Json(json!({
        "professional_id": professional_id,
        "slots": slots,
        "total": slots.len()
    })))
}
