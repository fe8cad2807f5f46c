// libs/booking-cell/src/services/clients.rs
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::pagination::PageParams;

use crate::models::{BookingError, Client};

pub struct ClientDirectory {
    supabase: SupabaseClient,
}

impl ClientDirectory {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Clients are keyed by email per professional; the booking form creates
    /// the record on first contact and reuses it afterwards.
    pub async fn find_or_create(
        &self,
        professional_id: Uuid,
        email: &str,
        name: &str,
        phone: Option<&str>,
        auth_token: Option<&str>,
    ) -> Result<Client, BookingError> {
        let normalized = email.trim().to_lowercase();

        let path = format!(
            "/rest/v1/clients?professional_id=eq.{}&email=eq.{}",
            professional_id, normalized
        );
        let existing: Vec<Client> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await
            .map_err(|e| BookingError::DatabaseError(e.to_string()))?;

        if let Some(client) = existing.into_iter().next() {
            debug!("Reusing client {} for {}", client.id, normalized);
            return Ok(client);
        }

        let client_data = json!({
            "professional_id": professional_id,
            "email": normalized,
            "name": name,
            "phone": phone,
            "total_bookings": 0,
            "total_spent_cents": 0,
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        });

        let created: Vec<Client> = self
            .supabase
            .insert_returning("/rest/v1/clients", auth_token, client_data)
            .await
            .map_err(|e| BookingError::DatabaseError(e.to_string()))?;

        created
            .into_iter()
            .next()
            .ok_or_else(|| BookingError::DatabaseError("Client creation returned no row".to_string()))
    }

    /// Roll a committed booking into the client's running totals.
    pub async fn record_booking(
        &self,
        client: &Client,
        booked_for: DateTime<Utc>,
        amount_paid_cents: i64,
        auth_token: Option<&str>,
    ) -> Result<(), BookingError> {
        let path = format!("/rest/v1/clients?id=eq.{}", client.id);
        let update = json!({
            "total_bookings": client.total_bookings + 1,
            "total_spent_cents": client.total_spent_cents + amount_paid_cents,
            "last_booking": booked_for.to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        });

        let _updated: Vec<Client> = self
            .supabase
            .update_returning(&path, auth_token, update)
            .await
            .map_err(|e| BookingError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    pub async fn list_clients(
        &self,
        professional_id: Uuid,
        page: &PageParams,
        auth_token: &str,
    ) -> Result<Vec<Client>, BookingError> {
        let path = format!(
            "/rest/v1/clients?professional_id=eq.{}&order=name.asc&limit={}&offset={}",
            professional_id,
            page.limit(),
            page.offset(),
        );

        self.supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| BookingError::DatabaseError(e.to_string()))
    }
}
