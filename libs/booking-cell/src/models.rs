// libs/booking-cell/src/models.rs
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use catalog_cell::models::Service;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

/// A committed booking. Identity and interval fields are immutable after
/// creation (a reschedule writes a new interval under the same identity);
/// `duration + buffer` and `price_cents` are snapshots of the service at
/// booking time, so later catalog edits only affect future bookings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub professional_id: Uuid,
    pub service_id: Uuid,
    pub client_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub buffer_minutes: i64,
    pub price_cents: i64,
    pub status: AppointmentStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<PaymentMethod>,
    pub notes: Option<String>,
    pub client_notes: Option<String>,
    pub reminder_sent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// End of the occupied span on the professional's timeline.
    pub fn occupied_until(&self) -> DateTime<Utc> {
        self.end_time + Duration::minutes(self.buffer_minutes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::NoShow => write!(f, "no_show"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
    Refunded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    Cash,
    BankTransfer,
}

// ==============================================================================
// CLIENT DIRECTORY
// ==============================================================================

/// A professional's client record, keyed by email per professional and
/// created on first booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub professional_id: Uuid,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub total_bookings: i64,
    pub total_spent_cents: i64,
    pub last_booking: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

/// Payment selection on the booking form. No gateway is integrated; `Card`
/// records the booking as paid, `PayLater` as unpaid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentChoice {
    Card,
    PayLater,
}

/// The public booking form: the professional is derived from the service.
#[derive(Debug, Clone, Deserialize)]
pub struct PublicBookingRequest {
    pub service_id: Uuid,
    pub client_email: String,
    pub client_name: String,
    pub client_phone: Option<String>,
    pub start_time: DateTime<Utc>,
    pub notes: Option<String>,
    pub payment_method: Option<PaymentChoice>,
}

/// Direct booking by an authenticated professional on their own calendar.
#[derive(Debug, Clone, Deserialize)]
pub struct BookAppointmentRequest {
    pub professional_id: Uuid,
    pub service_id: Uuid,
    pub client_email: String,
    pub client_name: String,
    pub client_phone: Option<String>,
    pub start_time: DateTime<Utc>,
    pub client_notes: Option<String>,
    pub payment_method: Option<PaymentChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AppointmentStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RescheduleAppointmentRequest {
    pub new_start_time: DateTime<Utc>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelledBy {
    Client,
    Professional,
    System,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CancelAppointmentRequest {
    pub reason: Option<String>,
    pub cancelled_by: CancelledBy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppointmentSearchQuery {
    pub status: Option<AppointmentStatus>,
    pub service_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl AppointmentSearchQuery {
    pub fn page_params(&self) -> shared_models::pagination::PageParams {
        shared_models::pagination::PageParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// Appointment joined with its service and client, the shape the dashboard
/// and the booking confirmation render.
#[derive(Debug, Clone, Serialize)]
pub struct BookingConfirmation {
    pub appointment: Appointment,
    pub service: Service,
    pub client: Client,
}

// ==============================================================================
// ANALYTICS MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct BookingStats {
    pub total_appointments: i64,
    pub pending: i64,
    pub confirmed: i64,
    pub completed: i64,
    pub cancelled: i64,
    pub no_show: i64,
    pub revenue_cents: i64,
    pub outstanding_cents: i64,
    pub unique_clients: i64,
    pub popular_services: Vec<ServiceUsage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceUsage {
    pub service_id: Uuid,
    pub bookings: i64,
    pub revenue_cents: i64,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum BookingError {
    #[error("Appointment not found")]
    AppointmentNotFound,

    #[error("Professional not found")]
    ProfessionalNotFound,

    #[error("Service not found")]
    ServiceNotFound,

    /// Commit-time re-validation lost the race; the caller must re-query
    /// availability and pick a fresh slot.
    #[error("Slot is no longer available")]
    SlotTaken,

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Appointment cannot change from status {0}")]
    InvalidStatusTransition(AppointmentStatus),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
