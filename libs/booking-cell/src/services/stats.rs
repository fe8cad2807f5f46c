// libs/booking-cell/src/services/stats.rs
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use reqwest::Method;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    Appointment, AppointmentStatus, BookingError, BookingStats, PaymentStatus, ServiceUsage,
};

const POPULAR_SERVICES_LIMIT: usize = 5;

pub struct BookingStatsService {
    supabase: SupabaseClient,
}

impl BookingStatsService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Dashboard aggregates over one professional's appointments in a range.
    pub async fn dashboard(
        &self,
        professional_id: Uuid,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        auth_token: &str,
    ) -> Result<BookingStats, BookingError> {
        debug!("Computing booking stats for professional {}", professional_id);

        let mut query_parts = vec![format!("professional_id=eq.{}", professional_id)];
        if let Some(from) = from {
            query_parts.push(format!("start_time=gte.{}", from.to_rfc3339()));
        }
        if let Some(to) = to {
            query_parts.push(format!("start_time=lte.{}", to.to_rfc3339()));
        }

        let path = format!(
            "/rest/v1/appointments?{}&order=start_time.asc",
            query_parts.join("&")
        );
        let appointments: Vec<Appointment> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| BookingError::DatabaseError(e.to_string()))?;

        Ok(summarize(&appointments))
    }
}

fn summarize(appointments: &[Appointment]) -> BookingStats {
    let mut stats = BookingStats {
        total_appointments: appointments.len() as i64,
        pending: 0,
        confirmed: 0,
        completed: 0,
        cancelled: 0,
        no_show: 0,
        revenue_cents: 0,
        outstanding_cents: 0,
        unique_clients: 0,
        popular_services: Vec::new(),
    };

    let mut clients = HashSet::new();
    let mut per_service: HashMap<Uuid, ServiceUsage> = HashMap::new();

    for appointment in appointments {
        match appointment.status {
            AppointmentStatus::Pending => stats.pending += 1,
            AppointmentStatus::Confirmed => stats.confirmed += 1,
            AppointmentStatus::Completed => stats.completed += 1,
            AppointmentStatus::Cancelled => stats.cancelled += 1,
            AppointmentStatus::NoShow => stats.no_show += 1,
        }

        clients.insert(appointment.client_id);

        let paid = appointment.payment_status == PaymentStatus::Paid;
        if paid {
            stats.revenue_cents += appointment.price_cents;
        }
        if appointment.payment_status == PaymentStatus::Unpaid
            && appointment.status != AppointmentStatus::Cancelled
        {
            stats.outstanding_cents += appointment.price_cents;
        }

        if appointment.status != AppointmentStatus::Cancelled {
            let usage = per_service
                .entry(appointment.service_id)
                .or_insert_with(|| ServiceUsage {
                    service_id: appointment.service_id,
                    bookings: 0,
                    revenue_cents: 0,
                });
            usage.bookings += 1;
            if paid {
                usage.revenue_cents += appointment.price_cents;
            }
        }
    }

    stats.unique_clients = clients.len() as i64;

    let mut popular: Vec<ServiceUsage> = per_service.into_values().collect();
    popular.sort_by(|a, b| {
        b.bookings
            .cmp(&a.bookings)
            .then(b.revenue_cents.cmp(&a.revenue_cents))
    });
    popular.truncate(POPULAR_SERVICES_LIMIT);
    stats.popular_services = popular;

    stats
}
