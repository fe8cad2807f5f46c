// libs/catalog-cell/tests/catalog_test.rs
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use catalog_cell::models::{CatalogError, CreateServiceRequest, UpdateServiceRequest};
use catalog_cell::services::catalog::CatalogService;
use shared_models::pagination::PageParams;
use shared_utils::test_utils::{MockRows, TestConfig};

struct TestSetup {
    catalog: CatalogService,
    mock_server: MockServer,
    professional_id: Uuid,
}

impl TestSetup {
    async fn new() -> Self {
        let mock_server = MockServer::start().await;
        let config = TestConfig::with_base_url(&mock_server.uri()).to_app_config();

        Self {
            catalog: CatalogService::new(&config),
            mock_server,
            professional_id: Uuid::new_v4(),
        }
    }
}

fn create_request() -> CreateServiceRequest {
    CreateServiceRequest {
        name: "Business Consultation".to_string(),
        description: "Strategic business planning".to_string(),
        duration_minutes: 60,
        price_cents: 15000,
        currency: None,
        category: Some("Consulting".to_string()),
        buffer_minutes: Some(10),
        max_bookings_per_day: Some(4),
    }
}

#[tokio::test]
async fn creates_a_service() {
    let setup = TestSetup::new().await;
    let service_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/rest/v1/services"))
        .respond_with(ResponseTemplate::new(201).set_body_json(vec![MockRows::service(
            &service_id.to_string(),
            &setup.professional_id.to_string(),
            60,
            10,
        )]))
        .expect(1)
        .mount(&setup.mock_server)
        .await;

    let service = setup
        .catalog
        .create_service(setup.professional_id, create_request(), "test-token")
        .await
        .unwrap();

    assert_eq!(service.id, service_id);
    assert!(service.is_active);
}

#[tokio::test]
async fn rejects_short_duration_without_a_write() {
    let setup = TestSetup::new().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/services"))
        .respond_with(ResponseTemplate::new(201).set_body_json(Vec::<serde_json::Value>::new()))
        .expect(0)
        .mount(&setup.mock_server)
        .await;

    let mut request = create_request();
    request.duration_minutes = 5;

    let result = setup
        .catalog
        .create_service(setup.professional_id, request, "test-token")
        .await;

    assert!(matches!(result, Err(CatalogError::ValidationError(_))));
}

#[tokio::test]
async fn lists_services_for_the_owner() {
    let setup = TestSetup::new().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![
            MockRows::service(
                &Uuid::new_v4().to_string(),
                &setup.professional_id.to_string(),
                60,
                0,
            ),
            MockRows::service(
                &Uuid::new_v4().to_string(),
                &setup.professional_id.to_string(),
                30,
                5,
            ),
        ]))
        .mount(&setup.mock_server)
        .await;

    let page = PageParams {
        page: Some(1),
        limit: Some(10),
    };
    let services = setup
        .catalog
        .list_services(setup.professional_id, None, Some(true), &page, "test-token")
        .await
        .unwrap();

    assert_eq!(services.len(), 2);
}

#[tokio::test]
async fn missing_service_update_is_not_found() {
    let setup = TestSetup::new().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<serde_json::Value>::new()))
        .mount(&setup.mock_server)
        .await;

    let result = setup
        .catalog
        .update_service(
            Uuid::new_v4(),
            setup.professional_id,
            UpdateServiceRequest {
                name: Some("Renamed".to_string()),
                description: None,
                duration_minutes: None,
                price_cents: None,
                currency: None,
                category: None,
                buffer_minutes: None,
                max_bookings_per_day: None,
                is_active: None,
            },
            "test-token",
        )
        .await;

    assert!(matches!(result, Err(CatalogError::NotFound)));
}

#[tokio::test]
async fn archive_deactivates_instead_of_deleting() {
    let setup = TestSetup::new().await;
    let service_id = Uuid::new_v4();

    let mut archived = MockRows::service(
        &service_id.to_string(),
        &setup.professional_id.to_string(),
        60,
        0,
    );
    archived["is_active"] = serde_json::json!(false);

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![archived]))
        .mount(&setup.mock_server)
        .await;

    let service = setup
        .catalog
        .archive_service(service_id, setup.professional_id, "test-token")
        .await
        .unwrap();

    assert!(!service.is_active);
}
