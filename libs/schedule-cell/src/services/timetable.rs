// libs/schedule-cell/src/services/timetable.rs
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    validate_time_slots, BlockedTime, CreateBlockedTimeRequest, ScheduleError,
    UpdateWorkingHoursRequest, WorkingHours,
};

pub struct TimetableService {
    supabase: SupabaseClient,
}

impl TimetableService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    // ==============================================================================
    // WORKING HOURS
    // ==============================================================================

    /// The full week, ordered Sunday..Saturday. Days never configured are
    /// simply absent.
    pub async fn get_working_hours(
        &self,
        professional_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<WorkingHours>, ScheduleError> {
        debug!("Fetching working hours for professional {}", professional_id);

        let path = format!(
            "/rest/v1/working_hours?professional_id=eq.{}&order=day_of_week.asc",
            professional_id
        );

        self.supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| ScheduleError::DatabaseError(e.to_string()))
    }

    /// Replace one weekday's configuration. Slots must be ordered and
    /// non-overlapping; an unavailable day may keep an empty slot list.
    pub async fn update_working_hours(
        &self,
        professional_id: Uuid,
        request: UpdateWorkingHoursRequest,
        auth_token: &str,
    ) -> Result<WorkingHours, ScheduleError> {
        debug!(
            "Updating working hours for professional {} day {}",
            professional_id, request.day_of_week
        );

        if request.day_of_week > 6 {
            return Err(ScheduleError::ValidationError(
                "Day of week must be between 0 (Sunday) and 6 (Saturday)".to_string(),
            ));
        }
        validate_time_slots(&request.time_slots)?;
        if request.is_available && request.time_slots.is_empty() {
            return Err(ScheduleError::ValidationError(
                "An available day needs at least one time slot".to_string(),
            ));
        }

        let existing = self
            .get_working_day_row(professional_id, request.day_of_week, auth_token)
            .await?;

        let payload = json!({
            "professional_id": professional_id,
            "day_of_week": request.day_of_week,
            "is_available": request.is_available,
            "time_slots": request.time_slots,
            "updated_at": Utc::now().to_rfc3339()
        });

        let result: Vec<WorkingHours> = match existing {
            Some(row) => {
                let path = format!("/rest/v1/working_hours?id=eq.{}", row.id);
                self.supabase
                    .update_returning(&path, Some(auth_token), payload)
                    .await
            }
            None => {
                let mut insert = payload;
                insert["created_at"] = json!(Utc::now().to_rfc3339());
                self.supabase
                    .insert_returning("/rest/v1/working_hours", Some(auth_token), insert)
                    .await
            }
        }
        .map_err(|e| ScheduleError::DatabaseError(e.to_string()))?;

        result
            .into_iter()
            .next()
            .ok_or_else(|| ScheduleError::DatabaseError("Working hours update returned no row".to_string()))
    }

    async fn get_working_day_row(
        &self,
        professional_id: Uuid,
        day_of_week: u8,
        auth_token: &str,
    ) -> Result<Option<WorkingHours>, ScheduleError> {
        let path = format!(
            "/rest/v1/working_hours?professional_id=eq.{}&day_of_week=eq.{}",
            professional_id, day_of_week
        );
        let result: Vec<WorkingHours> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| ScheduleError::DatabaseError(e.to_string()))?;

        Ok(result.into_iter().next())
    }

    // ==============================================================================
    // BLOCKED TIMES
    // ==============================================================================

    pub async fn list_blocked_times(
        &self,
        professional_id: Uuid,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        auth_token: &str,
    ) -> Result<Vec<BlockedTime>, ScheduleError> {
        let mut query_parts = vec![format!("professional_id=eq.{}", professional_id)];

        // Range filters apply to one-off entries; recurring entries are
        // always returned since they expand lazily against any range.
        match (from, to) {
            (Some(from), Some(to)) => query_parts.push(format!(
                "or=(is_recurring.eq.true,and(start_time.lt.{},end_time.gt.{}))",
                to.to_rfc3339(),
                from.to_rfc3339()
            )),
            (Some(from), None) => query_parts.push(format!(
                "or=(is_recurring.eq.true,end_time.gt.{})",
                from.to_rfc3339()
            )),
            (None, Some(to)) => query_parts.push(format!(
                "or=(is_recurring.eq.true,start_time.lt.{})",
                to.to_rfc3339()
            )),
            (None, None) => {}
        }

        let path = format!(
            "/rest/v1/blocked_times?{}&order=start_time.asc",
            query_parts.join("&")
        );

        self.supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| ScheduleError::DatabaseError(e.to_string()))
    }

    pub async fn create_blocked_time(
        &self,
        professional_id: Uuid,
        request: CreateBlockedTimeRequest,
        auth_token: &str,
    ) -> Result<BlockedTime, ScheduleError> {
        debug!("Creating blocked time for professional {}", professional_id);

        if request.start_time >= request.end_time {
            return Err(ScheduleError::InvalidRange(
                "Blocked time start must be before end".to_string(),
            ));
        }

        let is_recurring = request.is_recurring.unwrap_or(false);
        if is_recurring && request.recurring_pattern.is_none() {
            return Err(ScheduleError::ValidationError(
                "Recurring blocked time needs a pattern".to_string(),
            ));
        }
        if !is_recurring && (request.recurring_pattern.is_some() || request.recurring_end_date.is_some()) {
            return Err(ScheduleError::ValidationError(
                "Recurrence fields require is_recurring".to_string(),
            ));
        }
        if let Some(end_date) = request.recurring_end_date {
            if end_date <= request.start_time.date_naive() {
                return Err(ScheduleError::InvalidRange(
                    "Recurrence end date must be after the first occurrence".to_string(),
                ));
            }
        }

        let blocked_data = json!({
            "professional_id": professional_id,
            "title": request.title,
            "start_time": request.start_time.to_rfc3339(),
            "end_time": request.end_time.to_rfc3339(),
            "is_recurring": is_recurring,
            "recurring_pattern": request.recurring_pattern,
            "recurring_end_date": request.recurring_end_date,
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        });

        let result: Vec<BlockedTime> = self
            .supabase
            .insert_returning("/rest/v1/blocked_times", Some(auth_token), blocked_data)
            .await
            .map_err(|e| ScheduleError::DatabaseError(e.to_string()))?;

        result
            .into_iter()
            .next()
            .ok_or_else(|| ScheduleError::DatabaseError("Blocked time creation returned no row".to_string()))
    }

    pub async fn delete_blocked_time(
        &self,
        blocked_time_id: Uuid,
        professional_id: Uuid,
        auth_token: &str,
    ) -> Result<(), ScheduleError> {
        debug!("Deleting blocked time {}", blocked_time_id);

        let path = format!(
            "/rest/v1/blocked_times?id=eq.{}&professional_id=eq.{}",
            blocked_time_id, professional_id
        );

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let deleted: Vec<Value> = self
            .supabase
            .request_with_headers(Method::DELETE, &path, Some(auth_token), None, Some(headers))
            .await
            .map_err(|e| ScheduleError::DatabaseError(e.to_string()))?;

        if deleted.is_empty() {
            return Err(ScheduleError::BlockedTimeNotFound);
        }

        Ok(())
    }
}
