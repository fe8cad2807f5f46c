// libs/catalog-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bookable offering. `duration_minutes` is the consultation itself;
/// `buffer_minutes` is idle time appended after it before the next booking
/// may start. Appointments snapshot both at booking time, so edits here only
/// affect future bookings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub professional_id: Uuid,
    pub name: String,
    pub description: String,
    pub duration_minutes: i64,
    pub buffer_minutes: i64,
    pub price_cents: i64,
    pub currency: String,
    pub category: Option<String>,
    pub max_bookings_per_day: Option<i64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    pub description: String,
    pub duration_minutes: i64,
    pub price_cents: i64,
    pub currency: Option<String>,
    pub category: Option<String>,
    pub buffer_minutes: Option<i64>,
    pub max_bookings_per_day: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration_minutes: Option<i64>,
    pub price_cents: Option<i64>,
    pub currency: Option<String>,
    pub category: Option<String>,
    pub buffer_minutes: Option<i64>,
    pub max_bookings_per_day: Option<i64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceListQuery {
    pub category: Option<String>,
    pub is_active: Option<bool>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl ServiceListQuery {
    pub fn page_params(&self) -> shared_models::pagination::PageParams {
        shared_models::pagination::PageParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    #[error("Service not found")]
    NotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

pub const MIN_DURATION_MINUTES: i64 = 15;
pub const MIN_PRICE_CENTS: i64 = 100;

impl CreateServiceRequest {
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() || self.description.trim().is_empty() {
            return Err(CatalogError::ValidationError(
                "Name and description are required".to_string(),
            ));
        }
        if self.duration_minutes < MIN_DURATION_MINUTES {
            return Err(CatalogError::ValidationError(format!(
                "Service duration must be at least {} minutes",
                MIN_DURATION_MINUTES
            )));
        }
        if self.price_cents < MIN_PRICE_CENTS {
            return Err(CatalogError::ValidationError(
                "Service price must be at least $1.00".to_string(),
            ));
        }
        if self.buffer_minutes.is_some_and(|b| b < 0) {
            return Err(CatalogError::ValidationError(
                "Buffer time cannot be negative".to_string(),
            ));
        }
        if self.max_bookings_per_day.is_some_and(|m| m < 1) {
            return Err(CatalogError::ValidationError(
                "Max bookings per day must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl UpdateServiceRequest {
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.duration_minutes.is_some_and(|d| d < MIN_DURATION_MINUTES) {
            return Err(CatalogError::ValidationError(format!(
                "Service duration must be at least {} minutes",
                MIN_DURATION_MINUTES
            )));
        }
        if self.price_cents.is_some_and(|p| p < MIN_PRICE_CENTS) {
            return Err(CatalogError::ValidationError(
                "Service price must be at least $1.00".to_string(),
            ));
        }
        if self.buffer_minutes.is_some_and(|b| b < 0) {
            return Err(CatalogError::ValidationError(
                "Buffer time cannot be negative".to_string(),
            ));
        }
        if self.max_bookings_per_day.is_some_and(|m| m < 1) {
            return Err(CatalogError::ValidationError(
                "Max bookings per day must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
