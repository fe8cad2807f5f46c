// libs/schedule-cell/tests/timetable_test.rs
use chrono::{Duration, NaiveTime, Utc};
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use schedule_cell::models::{
    CreateBlockedTimeRequest, RecurringPattern, ScheduleError, TimeSlot, UpdateWorkingHoursRequest,
};
use schedule_cell::services::timetable::TimetableService;
use shared_utils::test_utils::{MockRows, TestConfig};

struct TestSetup {
    timetable: TimetableService,
    mock_server: MockServer,
    professional_id: Uuid,
}

impl TestSetup {
    async fn new() -> Self {
        let mock_server = MockServer::start().await;
        let config = TestConfig::with_base_url(&mock_server.uri()).to_app_config();

        Self {
            timetable: TimetableService::new(&config),
            mock_server,
            professional_id: Uuid::new_v4(),
        }
    }
}

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[tokio::test]
async fn replaces_a_day_creating_it_when_absent() {
    let setup = TestSetup::new().await;

    // No existing row for the day.
    Mock::given(method("GET"))
        .and(path("/rest/v1/working_hours"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<serde_json::Value>::new()))
        .mount(&setup.mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/working_hours"))
        .respond_with(ResponseTemplate::new(201).set_body_json(vec![MockRows::working_day(
            &setup.professional_id.to_string(),
            1,
            &[("09:00:00", "12:00:00"), ("13:00:00", "17:00:00")],
        )]))
        .expect(1)
        .mount(&setup.mock_server)
        .await;

    let updated = setup
        .timetable
        .update_working_hours(
            setup.professional_id,
            UpdateWorkingHoursRequest {
                day_of_week: 1,
                is_available: true,
                time_slots: vec![
                    TimeSlot { start_time: t(9, 0), end_time: t(12, 0) },
                    TimeSlot { start_time: t(13, 0), end_time: t(17, 0) },
                ],
            },
            "test-token",
        )
        .await
        .unwrap();

    assert_eq!(updated.day_of_week, 1);
    assert_eq!(updated.time_slots.len(), 2);
}

#[tokio::test]
async fn rejects_overlapping_day_slots_without_a_write() {
    let setup = TestSetup::new().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/working_hours"))
        .respond_with(ResponseTemplate::new(201).set_body_json(Vec::<serde_json::Value>::new()))
        .expect(0)
        .mount(&setup.mock_server)
        .await;

    let result = setup
        .timetable
        .update_working_hours(
            setup.professional_id,
            UpdateWorkingHoursRequest {
                day_of_week: 1,
                is_available: true,
                time_slots: vec![
                    TimeSlot { start_time: t(9, 0), end_time: t(13, 0) },
                    TimeSlot { start_time: t(12, 0), end_time: t(17, 0) },
                ],
            },
            "test-token",
        )
        .await;

    assert!(matches!(result, Err(ScheduleError::ValidationError(_))));
}

#[tokio::test]
async fn rejects_out_of_range_weekday() {
    let setup = TestSetup::new().await;

    let result = setup
        .timetable
        .update_working_hours(
            setup.professional_id,
            UpdateWorkingHoursRequest {
                day_of_week: 7,
                is_available: false,
                time_slots: vec![],
            },
            "test-token",
        )
        .await;

    assert!(matches!(result, Err(ScheduleError::ValidationError(_))));
}

#[tokio::test]
async fn creates_a_recurring_blocked_time() {
    let setup = TestSetup::new().await;
    let start = Utc::now() + Duration::days(1);

    Mock::given(method("POST"))
        .and(path("/rest/v1/blocked_times"))
        .respond_with(ResponseTemplate::new(201).set_body_json(vec![serde_json::json!({
            "id": Uuid::new_v4(),
            "professional_id": setup.professional_id,
            "title": "Lunch",
            "start_time": start.to_rfc3339(),
            "end_time": (start + Duration::hours(1)).to_rfc3339(),
            "is_recurring": true,
            "recurring_pattern": "daily",
            "recurring_end_date": null,
            "created_at": start.to_rfc3339(),
            "updated_at": start.to_rfc3339()
        })]))
        .mount(&setup.mock_server)
        .await;

    let blocked = setup
        .timetable
        .create_blocked_time(
            setup.professional_id,
            CreateBlockedTimeRequest {
                title: "Lunch".to_string(),
                start_time: start,
                end_time: start + Duration::hours(1),
                is_recurring: Some(true),
                recurring_pattern: Some(RecurringPattern::Daily),
                recurring_end_date: None,
            },
            "test-token",
        )
        .await
        .unwrap();

    assert!(blocked.is_recurring);
    assert_eq!(blocked.recurring_pattern, Some(RecurringPattern::Daily));
}

#[tokio::test]
async fn recurring_block_without_pattern_is_invalid() {
    let setup = TestSetup::new().await;
    let start = Utc::now() + Duration::days(1);

    let result = setup
        .timetable
        .create_blocked_time(
            setup.professional_id,
            CreateBlockedTimeRequest {
                title: "Lunch".to_string(),
                start_time: start,
                end_time: start + Duration::hours(1),
                is_recurring: Some(true),
                recurring_pattern: None,
                recurring_end_date: None,
            },
            "test-token",
        )
        .await;

    assert!(matches!(result, Err(ScheduleError::ValidationError(_))));
}

#[tokio::test]
async fn inverted_block_interval_is_an_invalid_range() {
    let setup = TestSetup::new().await;
    let start = Utc::now() + Duration::days(1);

    let result = setup
        .timetable
        .create_blocked_time(
            setup.professional_id,
            CreateBlockedTimeRequest {
                title: "Oops".to_string(),
                start_time: start,
                end_time: start - Duration::hours(1),
                is_recurring: None,
                recurring_pattern: None,
                recurring_end_date: None,
            },
            "test-token",
        )
        .await;

    assert!(matches!(result, Err(ScheduleError::InvalidRange(_))));
}

#[tokio::test]
async fn delete_of_missing_block_is_not_found() {
    let setup = TestSetup::new().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/blocked_times"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<serde_json::Value>::new()))
        .mount(&setup.mock_server)
        .await;

    let result = setup
        .timetable
        .delete_blocked_time(Uuid::new_v4(), setup.professional_id, "test-token")
        .await;

    assert!(matches!(result, Err(ScheduleError::BlockedTimeNotFound)));
}
