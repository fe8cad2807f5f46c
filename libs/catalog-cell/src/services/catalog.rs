// libs/catalog-cell/src/services/catalog.rs
use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::pagination::PageParams;

use crate::models::{CatalogError, CreateServiceRequest, Service, UpdateServiceRequest};

pub struct CatalogService {
    supabase: SupabaseClient,
}

impl CatalogService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn create_service(
        &self,
        professional_id: Uuid,
        request: CreateServiceRequest,
        auth_token: &str,
    ) -> Result<Service, CatalogError> {
        debug!("Creating service for professional {}", professional_id);

        request.validate()?;

        let service_data = json!({
            "professional_id": professional_id,
            "name": request.name,
            "description": request.description,
            "duration_minutes": request.duration_minutes,
            "buffer_minutes": request.buffer_minutes.unwrap_or(0),
            "price_cents": request.price_cents,
            "currency": request.currency.unwrap_or_else(|| "USD".to_string()),
            "category": request.category,
            "max_bookings_per_day": request.max_bookings_per_day,
            "is_active": true,
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        });

        let result: Vec<Service> = self
            .supabase
            .insert_returning("/rest/v1/services", Some(auth_token), service_data)
            .await
            .map_err(|e| CatalogError::DatabaseError(e.to_string()))?;

        result
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::DatabaseError("Service creation returned no row".to_string()))
    }

    /// Fetch a service regardless of owner; callers are responsible for any
    /// ownership check. The availability resolver uses this with the anon key.
    pub async fn get_service(
        &self,
        service_id: Uuid,
        auth_token: Option<&str>,
    ) -> Result<Service, CatalogError> {
        let path = format!("/rest/v1/services?id=eq.{}", service_id);
        let result: Vec<Service> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await
            .map_err(|e| CatalogError::DatabaseError(e.to_string()))?;

        result.into_iter().next().ok_or(CatalogError::NotFound)
    }

    pub async fn list_services(
        &self,
        professional_id: Uuid,
        category: Option<&str>,
        is_active: Option<bool>,
        page: &PageParams,
        auth_token: &str,
    ) -> Result<Vec<Service>, CatalogError> {
        let mut query_parts = vec![format!("professional_id=eq.{}", professional_id)];

        if let Some(category) = category {
            query_parts.push(format!("category=eq.{}", category));
        }
        if let Some(is_active) = is_active {
            query_parts.push(format!("is_active=eq.{}", is_active));
        }

        let path = format!(
            "/rest/v1/services?{}&order=created_at.desc&limit={}&offset={}",
            query_parts.join("&"),
            page.limit(),
            page.offset(),
        );

        let result: Vec<Service> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| CatalogError::DatabaseError(e.to_string()))?;

        Ok(result)
    }

    pub async fn update_service(
        &self,
        service_id: Uuid,
        professional_id: Uuid,
        request: UpdateServiceRequest,
        auth_token: &str,
    ) -> Result<Service, CatalogError> {
        debug!("Updating service {}", service_id);

        request.validate()?;

        let mut update_data = serde_json::Map::new();

        if let Some(name) = request.name {
            update_data.insert("name".to_string(), json!(name));
        }
        if let Some(description) = request.description {
            update_data.insert("description".to_string(), json!(description));
        }
        if let Some(duration) = request.duration_minutes {
            update_data.insert("duration_minutes".to_string(), json!(duration));
        }
        if let Some(price) = request.price_cents {
            update_data.insert("price_cents".to_string(), json!(price));
        }
        if let Some(currency) = request.currency {
            update_data.insert("currency".to_string(), json!(currency));
        }
        if let Some(category) = request.category {
            update_data.insert("category".to_string(), json!(category));
        }
        if let Some(buffer) = request.buffer_minutes {
            update_data.insert("buffer_minutes".to_string(), json!(buffer));
        }
        if let Some(max_per_day) = request.max_bookings_per_day {
            update_data.insert("max_bookings_per_day".to_string(), json!(max_per_day));
        }
        if let Some(is_active) = request.is_active {
            update_data.insert("is_active".to_string(), json!(is_active));
        }

        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!(
            "/rest/v1/services?id=eq.{}&professional_id=eq.{}",
            service_id, professional_id
        );

        let result: Vec<Service> = self
            .supabase
            .update_returning(&path, Some(auth_token), Value::Object(update_data))
            .await
            .map_err(|e| CatalogError::DatabaseError(e.to_string()))?;

        result.into_iter().next().ok_or(CatalogError::NotFound)
    }

    /// Archive rather than delete: past appointments keep referencing the row.
    pub async fn archive_service(
        &self,
        service_id: Uuid,
        professional_id: Uuid,
        auth_token: &str,
    ) -> Result<Service, CatalogError> {
        debug!("Archiving service {}", service_id);

        let path = format!(
            "/rest/v1/services?id=eq.{}&professional_id=eq.{}",
            service_id, professional_id
        );
        let body = json!({
            "is_active": false,
            "updated_at": Utc::now().to_rfc3339()
        });

        let result: Vec<Service> = self
            .supabase
            .update_returning(&path, Some(auth_token), body)
            .await
            .map_err(|e| CatalogError::DatabaseError(e.to_string()))?;

        result.into_iter().next().ok_or(CatalogError::NotFound)
    }
}
