// libs/schedule-cell/src/models.rs
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==============================================================================
// PROFESSIONAL
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Professional {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// IANA timezone name; all schedule times-of-day are local to it.
    pub timezone: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Professional {
    pub fn tz(&self) -> Result<Tz, ScheduleError> {
        self.timezone
            .parse()
            .map_err(|_| ScheduleError::ValidationError(format!("Invalid timezone: {}", self.timezone)))
    }
}

// ==============================================================================
// WORKING HOURS
// ==============================================================================

/// One `[start,end)` window of a working day, local time-of-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingHours {
    pub id: Uuid,
    pub professional_id: Uuid,
    /// 0 = Sunday .. 6 = Saturday.
    pub day_of_week: u8,
    pub is_available: bool,
    /// Ordered, pairwise non-overlapping.
    pub time_slots: Vec<TimeSlot>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateWorkingHoursRequest {
    pub day_of_week: u8,
    pub is_available: bool,
    pub time_slots: Vec<TimeSlot>,
}

// ==============================================================================
// BLOCKED TIME
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurringPattern {
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockedTime {
    pub id: Uuid,
    pub professional_id: Uuid,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_recurring: bool,
    pub recurring_pattern: Option<RecurringPattern>,
    /// Exclusive upper bound on recurrence; `None` means unbounded.
    pub recurring_end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBlockedTimeRequest {
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_recurring: Option<bool>,
    pub recurring_pattern: Option<RecurringPattern>,
    pub recurring_end_date: Option<NaiveDate>,
}

// ==============================================================================
// AVAILABILITY
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableSlot {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlotQuery {
    pub service_id: Uuid,
    pub date: NaiveDate,
}

/// Commit-time verdict for a single requested interval. The read path
/// (slot listing) never produces these; the booking cell maps them onto
/// its own error taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotCheck {
    Available,
    InPast,
    BeyondHorizon,
    OutsideWorkingHours,
    Conflict,
    QuotaExceeded,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum ScheduleError {
    #[error("Professional not found")]
    ProfessionalNotFound,

    #[error("Service not found")]
    ServiceNotFound,

    #[error("Blocked time not found")]
    BlockedTimeNotFound,

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

// ==============================================================================
// VALIDATION
// ==============================================================================

impl TimeSlot {
    pub fn is_well_formed(&self) -> bool {
        self.start_time < self.end_time
    }
}

/// Working-hour slots must be ordered and pairwise non-overlapping.
/// Exact abutment (`a.end == b.start`) is allowed.
pub fn validate_time_slots(slots: &[TimeSlot]) -> Result<(), ScheduleError> {
    for slot in slots {
        if !slot.is_well_formed() {
            return Err(ScheduleError::ValidationError(format!(
                "Slot start {} must be before end {}",
                slot.start_time, slot.end_time
            )));
        }
    }

    for pair in slots.windows(2) {
        if pair[1].start_time < pair[0].end_time {
            return Err(ScheduleError::ValidationError(
                "Working-hour slots must be ordered and non-overlapping".to_string(),
            ));
        }
    }

    Ok(())
}
