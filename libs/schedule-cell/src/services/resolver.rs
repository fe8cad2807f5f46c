// libs/schedule-cell/src/services/resolver.rs
//
// Availability resolver: turns working hours, blocked times and existing
// appointments into the ordered list of bookable start-times for one day.
// The read path is side-effect-free; the booking cell reuses `check_interval`
// for its commit-time re-validation.

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use reqwest::Method;
use serde::Deserialize;
use tracing::{debug, warn};
use uuid::Uuid;

use catalog_cell::models::{CatalogError, Service};
use catalog_cell::services::catalog::CatalogService;
use shared_config::{AppConfig, SchedulingConfig};
use shared_database::supabase::SupabaseClient;

use crate::interval::{intersects_any, merge_intervals, Interval};
use crate::models::{
    AvailableSlot, BlockedTime, Professional, RecurringPattern, ScheduleError, SlotCheck,
    SlotQuery, TimeSlot, WorkingHours,
};

/// Lean appointment row: just the fields the busy-set needs. The full model
/// belongs to the booking cell.
#[derive(Debug, Clone, Deserialize)]
pub struct AppointmentRow {
    pub id: Uuid,
    pub service_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub buffer_minutes: i64,
    pub status: String,
}

impl AppointmentRow {
    /// Appointments hold their slot while pending or confirmed; cancelled and
    /// no-show rows free it, completed rows only count toward daily quotas.
    fn occupies_timeline(&self) -> bool {
        matches!(self.status.as_str(), "pending" | "confirmed")
    }

    fn counts_toward_quota(&self) -> bool {
        matches!(self.status.as_str(), "pending" | "confirmed" | "completed")
    }

    fn busy_interval(&self) -> Interval {
        Interval::new(
            self.start_time,
            self.end_time + Duration::minutes(self.buffer_minutes),
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SlotParams {
    pub duration: Duration,
    pub buffer: Duration,
    pub granularity: Duration,
    /// Candidates strictly before this instant are discarded.
    pub not_before: DateTime<Utc>,
}

pub struct AvailabilityService {
    supabase: SupabaseClient,
    catalog: CatalogService,
    scheduling: SchedulingConfig,
}

impl AvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            catalog: CatalogService::new(config),
            scheduling: config.scheduling.clone(),
        }
    }

    /// Ordered bookable start-times for one professional, service and date.
    ///
    /// Closed weekday, fully booked day and out-of-horizon dates all resolve
    /// to an empty list; unknown professional or service is an error.
    pub async fn available_slots(
        &self,
        professional_id: Uuid,
        query: SlotQuery,
        auth_token: Option<&str>,
    ) -> Result<Vec<AvailableSlot>, ScheduleError> {
        debug!(
            "Resolving slots for professional {} service {} on {}",
            professional_id, query.service_id, query.date
        );

        let professional = self.get_professional(professional_id, auth_token).await?;
        let tz = professional.tz()?;
        let service = self.get_owned_service(query.service_id, professional_id, auth_token).await?;

        let now = Utc::now();
        let today = now.with_timezone(&tz).date_naive();

        if query.date < today || query.date > today + Duration::days(self.scheduling.max_advance_days) {
            return Ok(vec![]);
        }

        let working_day = match self.get_working_day(professional_id, weekday_index(query.date), auth_token).await? {
            Some(day) if day.is_available && !day.time_slots.is_empty() => day,
            _ => return Ok(vec![]),
        };

        let (window_start, window_end) = fetch_window(query.date);
        let appointments = self
            .fetch_appointments(professional_id, window_start, window_end, auth_token)
            .await?;
        let blocked = self
            .fetch_blocked_times(professional_id, window_start, window_end, auth_token)
            .await?;

        if day_quota_reached(&service, &appointments, query.date, tz, None) {
            debug!("Service {} fully booked on {}", service.id, query.date);
            return Ok(vec![]);
        }

        let busy = build_busy_set(&appointments, &blocked, query.date, tz, None);

        let params = SlotParams {
            duration: Duration::minutes(service.duration_minutes),
            buffer: Duration::minutes(service.buffer_minutes),
            granularity: Duration::minutes(self.scheduling.slot_granularity_minutes),
            not_before: now + Duration::minutes(self.scheduling.min_lead_minutes),
        };

        let slots = compute_day_slots(query.date, tz, &working_day.time_slots, &busy, &params);

        debug!("Found {} available slots", slots.len());
        Ok(slots)
    }

    /// Commit-time verdict for one requested start. `exclude_appointment_id`
    /// lets a reschedule ignore its own current slot.
    pub async fn check_interval(
        &self,
        professional_id: Uuid,
        service_id: Uuid,
        start_time: DateTime<Utc>,
        exclude_appointment_id: Option<Uuid>,
        auth_token: Option<&str>,
    ) -> Result<SlotCheck, ScheduleError> {
        let professional = self.get_professional(professional_id, auth_token).await?;
        let tz = professional.tz()?;
        let service = self.get_owned_service(service_id, professional_id, auth_token).await?;

        let now = Utc::now();
        if start_time < now + Duration::minutes(self.scheduling.min_lead_minutes) {
            return Ok(SlotCheck::InPast);
        }

        let local_date = start_time.with_timezone(&tz).date_naive();
        let today = now.with_timezone(&tz).date_naive();
        if local_date > today + Duration::days(self.scheduling.max_advance_days) {
            return Ok(SlotCheck::BeyondHorizon);
        }

        let occupied = Interval::new(
            start_time,
            start_time + Duration::minutes(service.duration_minutes + service.buffer_minutes),
        );

        let inside_working_hours = match self
            .get_working_day(professional_id, weekday_index(local_date), auth_token)
            .await?
        {
            Some(day) if day.is_available => day.time_slots.iter().any(|slot| {
                working_window(local_date, slot, tz)
                    .map(|window| window.contains(&occupied))
                    .unwrap_or(false)
            }),
            _ => false,
        };

        if !inside_working_hours {
            return Ok(SlotCheck::OutsideWorkingHours);
        }

        let (window_start, window_end) = fetch_window(local_date);
        let appointments = self
            .fetch_appointments(professional_id, window_start, window_end, auth_token)
            .await?;
        let blocked = self
            .fetch_blocked_times(professional_id, window_start, window_end, auth_token)
            .await?;

        let busy = build_busy_set(&appointments, &blocked, local_date, tz, exclude_appointment_id);
        let candidate = Interval::new(
            start_time,
            start_time + Duration::minutes(service.duration_minutes),
        );

        if intersects_any(&candidate, &busy) {
            return Ok(SlotCheck::Conflict);
        }

        if day_quota_reached(&service, &appointments, local_date, tz, exclude_appointment_id) {
            return Ok(SlotCheck::QuotaExceeded);
        }

        Ok(SlotCheck::Available)
    }

    // ==============================================================================
    // DATA ACCESS
    // ==============================================================================

    pub async fn get_professional(
        &self,
        professional_id: Uuid,
        auth_token: Option<&str>,
    ) -> Result<Professional, ScheduleError> {
        let path = format!("/rest/v1/professionals?id=eq.{}", professional_id);
        let result: Vec<Professional> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await
            .map_err(|e| ScheduleError::DatabaseError(e.to_string()))?;

        match result.into_iter().next() {
            Some(professional) if professional.is_active => Ok(professional),
            _ => Err(ScheduleError::ProfessionalNotFound),
        }
    }

    async fn get_owned_service(
        &self,
        service_id: Uuid,
        professional_id: Uuid,
        auth_token: Option<&str>,
    ) -> Result<Service, ScheduleError> {
        let service = self
            .catalog
            .get_service(service_id, auth_token)
            .await
            .map_err(|e| match e {
                CatalogError::NotFound => ScheduleError::ServiceNotFound,
                other => ScheduleError::DatabaseError(other.to_string()),
            })?;

        if service.professional_id != professional_id {
            return Err(ScheduleError::ServiceNotFound);
        }
        if !service.is_active {
            return Err(ScheduleError::ValidationError(
                "Service is no longer offered".to_string(),
            ));
        }
        if service.duration_minutes <= 0 {
            return Err(ScheduleError::ValidationError(
                "Service duration must be positive".to_string(),
            ));
        }

        Ok(service)
    }

    async fn get_working_day(
        &self,
        professional_id: Uuid,
        day_of_week: u8,
        auth_token: Option<&str>,
    ) -> Result<Option<WorkingHours>, ScheduleError> {
        let path = format!(
            "/rest/v1/working_hours?professional_id=eq.{}&day_of_week=eq.{}",
            professional_id, day_of_week
        );
        let result: Vec<WorkingHours> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await
            .map_err(|e| ScheduleError::DatabaseError(e.to_string()))?;

        Ok(result.into_iter().next())
    }

    async fn fetch_appointments(
        &self,
        professional_id: Uuid,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
        auth_token: Option<&str>,
    ) -> Result<Vec<AppointmentRow>, ScheduleError> {
        let path = format!(
            "/rest/v1/appointments?professional_id=eq.{}&status=in.(pending,confirmed,completed)&start_time=gte.{}&start_time=lt.{}&order=start_time.asc",
            professional_id,
            window_start.to_rfc3339(),
            window_end.to_rfc3339(),
        );

        self.supabase
            .request(Method::GET, &path, auth_token, None)
            .await
            .map_err(|e| ScheduleError::DatabaseError(e.to_string()))
    }

    async fn fetch_blocked_times(
        &self,
        professional_id: Uuid,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
        auth_token: Option<&str>,
    ) -> Result<Vec<BlockedTime>, ScheduleError> {
        // Recurring entries expand lazily, so all of them are candidates;
        // one-off entries only matter when they intersect the window.
        let path = format!(
            "/rest/v1/blocked_times?professional_id=eq.{}&or=(is_recurring.eq.true,and(start_time.lt.{},end_time.gt.{}))",
            professional_id,
            window_end.to_rfc3339(),
            window_start.to_rfc3339(),
        );

        self.supabase
            .request(Method::GET, &path, auth_token, None)
            .await
            .map_err(|e| ScheduleError::DatabaseError(e.to_string()))
    }
}

// ==============================================================================
// PURE SLOT COMPUTATION
// ==============================================================================

pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// UTC fetch window padded a day on each side so timezone offsets and buffers
/// protruding across local midnight never fall outside it.
fn fetch_window(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = (date - Duration::days(1)).and_hms_opt(0, 0, 0).unwrap();
    let end = (date + Duration::days(2)).and_hms_opt(0, 0, 0).unwrap();
    (Utc.from_utc_datetime(&start), Utc.from_utc_datetime(&end))
}

/// Resolve a local wall-clock instant to UTC. DST-ambiguous times take the
/// earlier offset; times inside a DST gap do not exist and yield `None`.
fn localize(date: NaiveDate, time: NaiveTime, tz: Tz) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&date.and_time(time)) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => None,
    }
}

fn working_window(date: NaiveDate, slot: &TimeSlot, tz: Tz) -> Option<Interval> {
    let start = localize(date, slot.start_time, tz)?;
    let end = localize(date, slot.end_time, tz)?;
    (start < end).then(|| Interval::new(start, end))
}

/// The occurrence of a blocked time on `date`, if any. Recurring entries
/// expand relative to their own start date and preserve the local
/// time-of-day span; `recurring_end_date` is exclusive.
pub fn blocked_occurrence_on(blocked: &BlockedTime, date: NaiveDate, tz: Tz) -> Option<Interval> {
    if !blocked.is_recurring {
        return Some(Interval::new(blocked.start_time, blocked.end_time));
    }

    let local_start = blocked.start_time.with_timezone(&tz);
    let base_date = local_start.date_naive();

    if date < base_date {
        return None;
    }
    if blocked.recurring_end_date.is_some_and(|end| date >= end) {
        return None;
    }

    let matches = match blocked.recurring_pattern {
        Some(RecurringPattern::Daily) => true,
        Some(RecurringPattern::Weekly) => date.weekday() == base_date.weekday(),
        Some(RecurringPattern::Monthly) => date.day() == base_date.day(),
        None => {
            warn!("Recurring blocked time {} has no pattern", blocked.id);
            false
        }
    };
    if !matches {
        return None;
    }

    let span = blocked.end_time - blocked.start_time;
    let occurrence_start = localize(date, local_start.time(), tz)?;
    Some(Interval::new(occurrence_start, occurrence_start + span))
}

/// Merge appointments (expanded by their buffer) and blocked-time occurrences
/// into the day's busy set.
pub fn build_busy_set(
    appointments: &[AppointmentRow],
    blocked: &[BlockedTime],
    date: NaiveDate,
    tz: Tz,
    exclude_appointment_id: Option<Uuid>,
) -> Vec<Interval> {
    let mut busy: Vec<Interval> = appointments
        .iter()
        .filter(|apt| apt.occupies_timeline())
        .filter(|apt| Some(apt.id) != exclude_appointment_id)
        .map(|apt| apt.busy_interval())
        .collect();

    busy.extend(
        blocked
            .iter()
            .filter_map(|entry| blocked_occurrence_on(entry, date, tz)),
    );

    merge_intervals(busy)
}

fn day_quota_reached(
    service: &Service,
    appointments: &[AppointmentRow],
    date: NaiveDate,
    tz: Tz,
    exclude_appointment_id: Option<Uuid>,
) -> bool {
    let Some(max_per_day) = service.max_bookings_per_day else {
        return false;
    };

    let booked = appointments
        .iter()
        .filter(|apt| apt.service_id == service.id)
        .filter(|apt| apt.counts_toward_quota())
        .filter(|apt| Some(apt.id) != exclude_appointment_id)
        .filter(|apt| apt.start_time.with_timezone(&tz).date_naive() == date)
        .count() as i64;

    booked >= max_per_day
}

/// Candidate generation for one day: fixed-granularity starts inside each
/// working window, requiring the full occupied span (duration + buffer) to
/// fit the window, then filtered against the busy set with the candidate's
/// `[start, start + duration)` span.
pub fn compute_day_slots(
    date: NaiveDate,
    tz: Tz,
    working_slots: &[TimeSlot],
    busy: &[Interval],
    params: &SlotParams,
) -> Vec<AvailableSlot> {
    let mut slots = Vec::new();
    let occupied_span = params.duration + params.buffer;

    for working_slot in working_slots {
        let Some(window) = working_window(date, working_slot, tz) else {
            continue;
        };

        let mut current = window.start;
        while current + occupied_span <= window.end {
            let candidate = Interval::new(current, current + params.duration);

            if current >= params.not_before && !intersects_any(&candidate, busy) {
                slots.push(AvailableSlot {
                    start_time: candidate.start,
                    end_time: candidate.end,
                    duration_minutes: params.duration.num_minutes(),
                });
            }

            current += params.granularity;
        }
    }

    slots.sort_by_key(|slot| slot.start_time);
    slots.dedup_by_key(|slot| slot.start_time);
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Tz;

    const UTC_TZ: Tz = chrono_tz::UTC;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn date() -> NaiveDate {
        // A Monday.
        NaiveDate::from_ymd_opt(2025, 6, 16).unwrap()
    }

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 16, h, m, 0).unwrap()
    }

    fn params(duration_min: i64, buffer_min: i64) -> SlotParams {
        SlotParams {
            duration: Duration::minutes(duration_min),
            buffer: Duration::minutes(buffer_min),
            granularity: Duration::minutes(15),
            not_before: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
        }
    }

    fn working_day() -> Vec<TimeSlot> {
        vec![
            TimeSlot { start_time: t(9, 0), end_time: t(12, 0) },
            TimeSlot { start_time: t(13, 0), end_time: t(17, 0) },
        ]
    }

    fn starts(slots: &[AvailableSlot]) -> Vec<DateTime<Utc>> {
        slots.iter().map(|s| s.start_time).collect()
    }

    #[test]
    fn slots_stay_within_working_windows() {
        let slots = compute_day_slots(date(), UTC_TZ, &working_day(), &[], &params(60, 0));

        assert_eq!(slots.first().unwrap().start_time, at(9, 0));
        // Last morning start leaving room for 60 minutes before 12:00.
        assert!(starts(&slots).contains(&at(11, 0)));
        assert!(!starts(&slots).contains(&at(11, 15)));
        // Afternoon resumes at 13:00 and ends at 16:00 for a 60-minute service.
        assert!(starts(&slots).contains(&at(13, 0)));
        assert_eq!(slots.last().unwrap().start_time, at(16, 0));
    }

    #[test]
    fn existing_appointment_excludes_intersecting_starts() {
        // 09:00-12:00 & 13:00-17:00 working day, one busy interval
        // 10:00-11:00, 60-minute service with no buffer.
        let busy = merge_intervals(vec![Interval::new(at(10, 0), at(11, 0))]);
        let slots = compute_day_slots(date(), UTC_TZ, &working_day(), &busy, &params(60, 0));
        let starts = starts(&slots);

        assert!(starts.contains(&at(9, 0)));
        // Any start in (09:00, 11:00) would run into the busy interval.
        assert!(!starts.contains(&at(9, 15)));
        assert!(!starts.contains(&at(9, 30)));
        assert!(!starts.contains(&at(10, 0)));
        assert!(!starts.contains(&at(10, 45)));
        // Back-to-back after the busy interval is allowed with zero buffer.
        assert!(starts.contains(&at(11, 0)));
    }

    #[test]
    fn buffer_extends_required_window_room() {
        let slots = compute_day_slots(date(), UTC_TZ, &working_day(), &[], &params(60, 30));
        let starts = starts(&slots);

        // 10:30 + 60 + 30 = 12:00 still fits; 10:45 does not.
        assert!(starts.contains(&at(10, 30)));
        assert!(!starts.contains(&at(10, 45)));
    }

    #[test]
    fn blocked_time_abutting_window_end_keeps_earlier_slots() {
        // Blocked 16:00-17:00, exactly abutting the end of a 30-minute
        // service's last candidate at 15:30.
        let busy = merge_intervals(vec![Interval::new(at(16, 0), at(17, 0))]);
        let slots = compute_day_slots(date(), UTC_TZ, &working_day(), &busy, &params(30, 0));
        let starts = starts(&slots);

        assert!(starts.contains(&at(15, 30)));
        assert!(!starts.contains(&at(16, 0)));
    }

    #[test]
    fn candidates_are_ascending_and_unique() {
        let slots = compute_day_slots(date(), UTC_TZ, &working_day(), &[], &params(30, 0));
        for pair in slots.windows(2) {
            assert!(pair[0].start_time < pair[1].start_time);
        }
    }

    #[test]
    fn past_candidates_are_discarded() {
        let mut p = params(60, 0);
        p.not_before = at(10, 10);

        let slots = compute_day_slots(date(), UTC_TZ, &working_day(), &[], &p);
        assert_eq!(slots.first().unwrap().start_time, at(10, 15));
    }

    #[test]
    fn closed_day_has_no_candidates() {
        let slots = compute_day_slots(date(), UTC_TZ, &[], &[], &params(30, 0));
        assert!(slots.is_empty());
    }

    #[test]
    fn local_times_resolve_through_professional_timezone() {
        let tz: Tz = "America/New_York".parse().unwrap();
        let slots = compute_day_slots(
            date(),
            tz,
            &[TimeSlot { start_time: t(9, 0), end_time: t(10, 0) }],
            &[],
            &params(60, 0),
        );

        // 09:00 EDT == 13:00 UTC in June.
        assert_eq!(slots, vec![AvailableSlot {
            start_time: at(13, 0),
            end_time: at(14, 0),
            duration_minutes: 60,
        }]);
    }

    // ==============================================================================
    // RECURRING BLOCKED TIME EXPANSION
    // ==============================================================================

    fn blocked(start: DateTime<Utc>, end: DateTime<Utc>, pattern: Option<RecurringPattern>, until: Option<NaiveDate>) -> BlockedTime {
        BlockedTime {
            id: Uuid::new_v4(),
            professional_id: Uuid::new_v4(),
            title: "Lunch".to_string(),
            start_time: start,
            end_time: end,
            is_recurring: pattern.is_some(),
            recurring_pattern: pattern,
            recurring_end_date: until,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn one_off_blocked_time_is_used_verbatim() {
        let entry = blocked(at(12, 0), at(13, 0), None, None);
        let occurrence = blocked_occurrence_on(&entry, date(), UTC_TZ).unwrap();
        assert_eq!(occurrence, Interval::new(at(12, 0), at(13, 0)));
    }

    #[test]
    fn daily_pattern_repeats_same_time_of_day() {
        let base = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();
        let entry = blocked(base, base + Duration::hours(1), Some(RecurringPattern::Daily), None);

        let occurrence = blocked_occurrence_on(&entry, date(), UTC_TZ).unwrap();
        assert_eq!(occurrence, Interval::new(at(12, 0), at(13, 0)));
    }

    #[test]
    fn recurrence_never_fires_before_its_own_start() {
        let base = Utc.with_ymd_and_hms(2025, 6, 20, 12, 0, 0).unwrap();
        let entry = blocked(base, base + Duration::hours(1), Some(RecurringPattern::Daily), None);

        assert!(blocked_occurrence_on(&entry, date(), UTC_TZ).is_none());
    }

    #[test]
    fn recurring_end_date_is_exclusive() {
        let base = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();
        let entry = blocked(
            base,
            base + Duration::hours(1),
            Some(RecurringPattern::Daily),
            Some(date()),
        );

        assert!(blocked_occurrence_on(&entry, date(), UTC_TZ).is_none());
        assert!(blocked_occurrence_on(&entry, date() - Duration::days(1), UTC_TZ).is_some());
    }

    #[test]
    fn weekly_pattern_matches_weekday_only() {
        // 2025-06-09 is the Monday before `date()`.
        let base = Utc.with_ymd_and_hms(2025, 6, 9, 9, 0, 0).unwrap();
        let entry = blocked(base, base + Duration::hours(2), Some(RecurringPattern::Weekly), None);

        assert!(blocked_occurrence_on(&entry, date(), UTC_TZ).is_some());
        assert!(blocked_occurrence_on(&entry, date() + Duration::days(1), UTC_TZ).is_none());
    }

    #[test]
    fn monthly_pattern_matches_day_of_month() {
        let base = Utc.with_ymd_and_hms(2025, 5, 16, 9, 0, 0).unwrap();
        let entry = blocked(base, base + Duration::hours(1), Some(RecurringPattern::Monthly), None);

        assert!(blocked_occurrence_on(&entry, date(), UTC_TZ).is_some());
        assert!(blocked_occurrence_on(&entry, date() + Duration::days(1), UTC_TZ).is_none());
    }

    // ==============================================================================
    // BUSY SET CONSTRUCTION
    // ==============================================================================

    fn appointment_row(start: DateTime<Utc>, end: DateTime<Utc>, buffer: i64, status: &str) -> AppointmentRow {
        AppointmentRow {
            id: Uuid::new_v4(),
            service_id: Uuid::new_v4(),
            start_time: start,
            end_time: end,
            buffer_minutes: buffer,
            status: status.to_string(),
        }
    }

    #[test]
    fn cancelled_appointments_free_their_slot() {
        let rows = vec![
            appointment_row(at(10, 0), at(11, 0), 0, "cancelled"),
            appointment_row(at(14, 0), at(15, 0), 0, "confirmed"),
        ];

        let busy = build_busy_set(&rows, &[], date(), UTC_TZ, None);
        assert_eq!(busy, vec![Interval::new(at(14, 0), at(15, 0))]);
    }

    #[test]
    fn appointment_buffer_expands_busy_interval() {
        let rows = vec![appointment_row(at(10, 0), at(11, 0), 15, "pending")];

        let busy = build_busy_set(&rows, &[], date(), UTC_TZ, None);
        assert_eq!(busy, vec![Interval::new(at(10, 0), at(11, 15))]);
    }

    #[test]
    fn excluded_appointment_is_ignored() {
        let mut row = appointment_row(at(10, 0), at(11, 0), 0, "confirmed");
        let id = Uuid::new_v4();
        row.id = id;

        let busy = build_busy_set(&[row], &[], date(), UTC_TZ, Some(id));
        assert!(busy.is_empty());
    }
}
