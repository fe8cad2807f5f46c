// libs/booking-cell/src/handlers.rs
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
use shared_models::pagination::{PageInfo, PageParams};

use crate::models::{
    AppointmentSearchQuery, BookAppointmentRequest, BookingError, CancelAppointmentRequest,
    PublicBookingRequest, RescheduleAppointmentRequest, UpdateStatusRequest,
};
use crate::services::booking::BookingService;
use crate::services::clients::ClientDirectory;
use crate::services::stats::BookingStatsService;

#[derive(Debug, Deserialize)]
pub struct UpcomingQuery {
    pub hours_ahead: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct ClientListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

fn professional_id(user: &User) -> Result<Uuid, AppError> {
    Uuid::parse_str(&user.id).map_err(|_| AppError::BadRequest("Invalid professional ID".to_string()))
}

fn map_booking_error(e: BookingError) -> AppError {
    match e {
        BookingError::AppointmentNotFound => AppError::NotFound("Appointment not found".to_string()),
        BookingError::ProfessionalNotFound => AppError::NotFound("Professional not found".to_string()),
        BookingError::ServiceNotFound => AppError::NotFound("Service not found".to_string()),
        BookingError::SlotTaken => {
            AppError::Conflict("Slot is no longer available, please pick another time".to_string())
        }
        BookingError::InvalidRange(msg) => AppError::BadRequest(msg),
        BookingError::InvalidStatusTransition(status) => {
            AppError::BadRequest(format!("Appointment cannot change from status {}", status))
        }
        BookingError::ValidationError(msg) => AppError::ValidationError(msg),
        BookingError::DatabaseError(msg) => AppError::Internal(msg),
    }
}

// ==============================================================================
// BOOKING HANDLERS
// ==============================================================================

/// Public booking form submission; no account, anon storage access only.
#[axum::debug_handler]
pub async fn book_public(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<PublicBookingRequest>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);

    let confirmation = booking_service
        .book_public(request)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "success": true,
        "booking": confirmation,
        "message": "Appointment booked successfully"
    })))
}

/// A professional booking directly on their own calendar.
#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(mut request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let owner = professional_id(&user)?;
    if request.professional_id != owner && !user.is_admin() {
        return Err(AppError::Auth(
            "Not authorized to book for this professional".to_string(),
        ));
    }
    if !user.is_admin() {
        request.professional_id = owner;
    }

    let booking_service = BookingService::new(&state);

    let confirmation = booking_service
        .book_appointment(request, Some(auth.token()))
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "success": true,
        "booking": confirmation,
        "message": "Appointment booked successfully"
    })))
}

#[axum::debug_handler]
pub async fn search_appointments(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<AppointmentSearchQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let owner = professional_id(&user)?;
    let booking_service = BookingService::new(&state);

    let page = query.page_params();
    let appointments = booking_service
        .search_appointments(owner, query, auth.token())
        .await
        .map_err(map_booking_error)?;

    let pagination = PageInfo::new(&page, appointments.len() as i64);

    Ok(Json(json!({
        "appointments": appointments,
        "pagination": pagination
    })))
}

#[axum::debug_handler]
pub async fn get_upcoming_appointments(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<UpcomingQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let owner = professional_id(&user)?;
    let hours_ahead = query.hours_ahead.unwrap_or(24);

    let booking_service = BookingService::new(&state);
    let appointments = booking_service
        .upcoming_appointments(owner, hours_ahead, auth.token())
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "upcoming_appointments": appointments,
        "total": appointments.len(),
        "hours_ahead": hours_ahead
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);

    let appointment = booking_service
        .get_appointment(appointment_id, auth.token())
        .await
        .map_err(map_booking_error)?;

    if appointment.professional_id.to_string() != user.id && !user.is_admin() {
        return Err(AppError::Auth("Not authorized to view this appointment".to_string()));
    }

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn update_appointment_status(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let owner = professional_id(&user)?;
    let booking_service = BookingService::new(&state);

    let appointment = booking_service
        .update_status(appointment_id, owner, request, auth.token())
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment updated successfully"
    })))
}

#[axum::debug_handler]
pub async fn reschedule_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<RescheduleAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let owner = professional_id(&user)?;
    let booking_service = BookingService::new(&state);

    let appointment = booking_service
        .reschedule_appointment(appointment_id, owner, request, auth.token())
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment rescheduled successfully"
    })))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<CancelAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let owner = professional_id(&user)?;
    let booking_service = BookingService::new(&state);

    let appointment = booking_service
        .cancel_appointment(appointment_id, owner, request, auth.token())
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment cancelled successfully"
    })))
}

// ==============================================================================
// ANALYTICS & CLIENTS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_booking_stats(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<StatsQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let owner = professional_id(&user)?;
    let stats_service = BookingStatsService::new(&state);

    let stats = stats_service
        .dashboard(owner, query.from_date, query.to_date, auth.token())
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({ "stats": stats })))
}

#[axum::debug_handler]
pub async fn list_clients(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<ClientListQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let owner = professional_id(&user)?;
    let directory = ClientDirectory::new(&state);

    let page = PageParams {
        page: query.page,
        limit: query.limit,
    };
    let clients = directory
        .list_clients(owner, &page, auth.token())
        .await
        .map_err(map_booking_error)?;

    let pagination = PageInfo::new(&page, clients.len() as i64);

    Ok(Json(json!({
        "clients": clients,
        "pagination": pagination
    })))
}
