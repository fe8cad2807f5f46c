// libs/booking-cell/src/services/booking.rs
//
// Commit path: re-validates the requested interval against the live busy set
// under the professional's advisory lock, then inserts. A candidate listed by
// the resolver may have gone stale by commit time; losing that race is
// reported as SlotTaken and never retried here.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use catalog_cell::models::{CatalogError, Service};
use catalog_cell::services::catalog::CatalogService;
use schedule_cell::models::{ScheduleError, SlotCheck};
use schedule_cell::services::resolver::AvailabilityService;
use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::flow::{BookingFlow, ClientDetails, FlowEvent};
use crate::models::{
    Appointment, AppointmentSearchQuery, AppointmentStatus, BookAppointmentRequest,
    BookingConfirmation, BookingError, CancelAppointmentRequest, CancelledBy, PaymentChoice,
    PaymentMethod, PaymentStatus, PublicBookingRequest, RescheduleAppointmentRequest,
    UpdateStatusRequest,
};
use crate::services::clients::ClientDirectory;
use crate::services::guard::SlotGuard;
use crate::services::lifecycle::AppointmentLifecycle;

pub struct BookingService {
    supabase: SupabaseClient,
    catalog: CatalogService,
    availability: AvailabilityService,
    clients: ClientDirectory,
    lifecycle: AppointmentLifecycle,
    guard: Arc<SlotGuard>,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_guard(config, SlotGuard::global())
    }

    /// Tests inject their own lock registry; handlers share the process-wide
    /// one so concurrent requests serialize per professional.
    pub fn with_guard(config: &AppConfig, guard: Arc<SlotGuard>) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            catalog: CatalogService::new(config),
            availability: AvailabilityService::new(config),
            clients: ClientDirectory::new(config),
            lifecycle: AppointmentLifecycle::new(),
            guard,
        }
    }

    // ==============================================================================
    // BOOKING COMMIT
    // ==============================================================================

    /// Public booking-form commit. The submitted form is driven through the
    /// whole wizard state machine first, so step-level validation applies
    /// even to a single-shot API call.
    pub async fn book_public(
        &self,
        request: PublicBookingRequest,
    ) -> Result<BookingConfirmation, BookingError> {
        let service = self.get_service_any_owner(request.service_id, None).await?;

        let mut flow = BookingFlow::new();
        flow.apply(FlowEvent::ServiceSelected(service.id))
            .map_err(|e| BookingError::ValidationError(e.to_string()))?;
        flow.apply(FlowEvent::SlotSelected(request.start_time))
            .map_err(|e| BookingError::ValidationError(e.to_string()))?;
        flow.apply(FlowEvent::ClientProvided(ClientDetails {
            email: request.client_email,
            name: request.client_name,
            phone: request.client_phone,
            notes: request.notes,
        }))
        .map_err(|e| BookingError::ValidationError(e.to_string()))?;
        flow.apply(FlowEvent::Confirmed)
            .map_err(|e| BookingError::ValidationError(e.to_string()))?;

        let booking_request = flow
            .into_booking_request(service.professional_id, request.payment_method)
            .map_err(|e| BookingError::ValidationError(e.to_string()))?;

        self.book_appointment(booking_request, None).await
    }

    /// Reserve a slot. Holds the professional's advisory lock across the
    /// commit-time re-validation and the insert, so two overlapping commits
    /// cannot both succeed.
    pub async fn book_appointment(
        &self,
        request: BookAppointmentRequest,
        auth_token: Option<&str>,
    ) -> Result<BookingConfirmation, BookingError> {
        info!(
            "Booking {} for professional {} at {}",
            request.service_id, request.professional_id, request.start_time
        );

        if request.client_name.trim().is_empty() || !request.client_email.contains('@') {
            return Err(BookingError::ValidationError(
                "Client name and a valid email are required".to_string(),
            ));
        }

        let service = self
            .get_service_any_owner(request.service_id, auth_token)
            .await?;
        if service.professional_id != request.professional_id {
            return Err(BookingError::ServiceNotFound);
        }
        if !service.is_active {
            return Err(BookingError::ValidationError(
                "Service is no longer offered".to_string(),
            ));
        }

        let _held = self.guard.acquire(request.professional_id).await;

        // Re-validate at commit time: the candidate may have been taken
        // between listing and commit.
        let check = self
            .availability
            .check_interval(
                request.professional_id,
                request.service_id,
                request.start_time,
                None,
                auth_token,
            )
            .await
            .map_err(map_schedule_error)?;
        require_available(check, request.start_time, request.professional_id)?;

        let client = self
            .clients
            .find_or_create(
                request.professional_id,
                &request.client_email,
                &request.client_name,
                request.client_phone.as_deref(),
                auth_token,
            )
            .await?;

        let (payment_status, payment_method) = match request.payment_method {
            Some(PaymentChoice::Card) => (PaymentStatus::Paid, Some(PaymentMethod::Card)),
            Some(PaymentChoice::PayLater) | None => (PaymentStatus::Unpaid, None),
        };

        let end_time = request.start_time + Duration::minutes(service.duration_minutes);
        let appointment_data = json!({
            "professional_id": request.professional_id,
            "service_id": service.id,
            "client_id": client.id,
            "start_time": request.start_time.to_rfc3339(),
            "end_time": end_time.to_rfc3339(),
            "buffer_minutes": service.buffer_minutes,
            "price_cents": service.price_cents,
            "status": AppointmentStatus::Pending,
            "payment_status": payment_status,
            "payment_method": payment_method,
            "client_notes": request.client_notes,
            "reminder_sent": false,
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        });

        let inserted: Vec<Appointment> = self
            .supabase
            .insert_returning("/rest/v1/appointments", auth_token, appointment_data)
            .await
            .map_err(|e| BookingError::DatabaseError(e.to_string()))?;

        let appointment = inserted
            .into_iter()
            .next()
            .ok_or_else(|| BookingError::DatabaseError("Appointment insert returned no row".to_string()))?;

        let paid_cents = match payment_status {
            PaymentStatus::Paid => service.price_cents,
            _ => 0,
        };
        self.clients
            .record_booking(&client, appointment.start_time, paid_cents, auth_token)
            .await?;

        info!(
            "Appointment {} booked for professional {}",
            appointment.id, appointment.professional_id
        );

        Ok(BookingConfirmation {
            appointment,
            service,
            client,
        })
    }

    // ==============================================================================
    // MUTATIONS
    // ==============================================================================

    pub async fn update_status(
        &self,
        appointment_id: Uuid,
        professional_id: Uuid,
        request: UpdateStatusRequest,
        auth_token: &str,
    ) -> Result<Appointment, BookingError> {
        let current = self
            .get_owned_appointment(appointment_id, professional_id, auth_token)
            .await?;

        self.lifecycle
            .validate_transition(&current.status, &request.status)?;

        let mut update = serde_json::Map::new();
        update.insert("status".to_string(), json!(request.status));
        if let Some(notes) = request.notes {
            update.insert("notes".to_string(), json!(notes));
        }
        // No gateway integration: a paid booking that gets cancelled is
        // recorded as refunded, nothing is charged back here.
        if request.status == AppointmentStatus::Cancelled
            && current.payment_status == PaymentStatus::Paid
        {
            update.insert("payment_status".to_string(), json!(PaymentStatus::Refunded));
        }
        update.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        self.patch_appointment(appointment_id, serde_json::Value::Object(update), auth_token)
            .await
    }

    pub async fn cancel_appointment(
        &self,
        appointment_id: Uuid,
        professional_id: Uuid,
        request: CancelAppointmentRequest,
        auth_token: &str,
    ) -> Result<Appointment, BookingError> {
        debug!("Cancelling appointment {}", appointment_id);

        let actor = match request.cancelled_by {
            CancelledBy::Client => "client",
            CancelledBy::Professional => "professional",
            CancelledBy::System => "system",
        };
        let notes = request
            .reason
            .map(|reason| format!("Cancelled by {}: {}", actor, reason));

        self.update_status(
            appointment_id,
            professional_id,
            UpdateStatusRequest {
                status: AppointmentStatus::Cancelled,
                notes,
            },
            auth_token,
        )
        .await
    }

    /// Move a live booking to a new interval under the same identity. The new
    /// interval passes the same commit-time validation as a fresh booking,
    /// with the appointment's own slot excluded from the busy set.
    pub async fn reschedule_appointment(
        &self,
        appointment_id: Uuid,
        professional_id: Uuid,
        request: RescheduleAppointmentRequest,
        auth_token: &str,
    ) -> Result<Appointment, BookingError> {
        let current = self
            .get_owned_appointment(appointment_id, professional_id, auth_token)
            .await?;

        if !self.lifecycle.can_reschedule(&current.status) {
            return Err(BookingError::InvalidStatusTransition(current.status));
        }

        let _held = self.guard.acquire(professional_id).await;

        let check = self
            .availability
            .check_interval(
                professional_id,
                current.service_id,
                request.new_start_time,
                Some(appointment_id),
                Some(auth_token),
            )
            .await
            .map_err(map_schedule_error)?;
        require_available(check, request.new_start_time, professional_id)?;

        let duration = current.end_time - current.start_time;
        let mut update = serde_json::Map::new();
        update.insert("start_time".to_string(), json!(request.new_start_time.to_rfc3339()));
        update.insert(
            "end_time".to_string(),
            json!((request.new_start_time + duration).to_rfc3339()),
        );
        if let Some(reason) = request.reason {
            update.insert("notes".to_string(), json!(format!("Rescheduled: {}", reason)));
        }
        update.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        self.patch_appointment(appointment_id, serde_json::Value::Object(update), auth_token)
            .await
    }

    // ==============================================================================
    // QUERIES
    // ==============================================================================

    pub async fn get_appointment(
        &self,
        appointment_id: Uuid,
        auth_token: &str,
    ) -> Result<Appointment, BookingError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let result: Vec<Appointment> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| BookingError::DatabaseError(e.to_string()))?;

        result.into_iter().next().ok_or(BookingError::AppointmentNotFound)
    }

    pub async fn search_appointments(
        &self,
        professional_id: Uuid,
        query: AppointmentSearchQuery,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, BookingError> {
        let mut query_parts = vec![format!("professional_id=eq.{}", professional_id)];

        if let Some(status) = query.status {
            query_parts.push(format!("status=eq.{}", status));
        }
        if let Some(service_id) = query.service_id {
            query_parts.push(format!("service_id=eq.{}", service_id));
        }
        if let Some(client_id) = query.client_id {
            query_parts.push(format!("client_id=eq.{}", client_id));
        }
        if let Some(from_date) = query.from_date {
            query_parts.push(format!("start_time=gte.{}", from_date.to_rfc3339()));
        }
        if let Some(to_date) = query.to_date {
            query_parts.push(format!("start_time=lte.{}", to_date.to_rfc3339()));
        }

        let page = query.page_params();
        let path = format!(
            "/rest/v1/appointments?{}&order=start_time.desc&limit={}&offset={}",
            query_parts.join("&"),
            page.limit(),
            page.offset(),
        );

        self.supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| BookingError::DatabaseError(e.to_string()))
    }

    pub async fn upcoming_appointments(
        &self,
        professional_id: Uuid,
        hours_ahead: i64,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, BookingError> {
        let now = Utc::now();
        let until = now + Duration::hours(hours_ahead);

        let path = format!(
            "/rest/v1/appointments?professional_id=eq.{}&status=in.(pending,confirmed)&start_time=gte.{}&start_time=lt.{}&order=start_time.asc",
            professional_id,
            now.to_rfc3339(),
            until.to_rfc3339(),
        );

        self.supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| BookingError::DatabaseError(e.to_string()))
    }

    // ==============================================================================
    // PRIVATE HELPERS
    // ==============================================================================

    async fn get_owned_appointment(
        &self,
        appointment_id: Uuid,
        professional_id: Uuid,
        auth_token: &str,
    ) -> Result<Appointment, BookingError> {
        let appointment = self.get_appointment(appointment_id, auth_token).await?;
        // Foreign appointments are indistinguishable from missing ones.
        if appointment.professional_id != professional_id {
            return Err(BookingError::AppointmentNotFound);
        }
        Ok(appointment)
    }

    async fn get_service_any_owner(
        &self,
        service_id: Uuid,
        auth_token: Option<&str>,
    ) -> Result<Service, BookingError> {
        self.catalog
            .get_service(service_id, auth_token)
            .await
            .map_err(|e| match e {
                CatalogError::NotFound => BookingError::ServiceNotFound,
                other => BookingError::DatabaseError(other.to_string()),
            })
    }

    async fn patch_appointment(
        &self,
        appointment_id: Uuid,
        body: serde_json::Value,
        auth_token: &str,
    ) -> Result<Appointment, BookingError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let result: Vec<Appointment> = self
            .supabase
            .update_returning(&path, Some(auth_token), body)
            .await
            .map_err(|e| BookingError::DatabaseError(e.to_string()))?;

        result.into_iter().next().ok_or(BookingError::AppointmentNotFound)
    }
}

fn map_schedule_error(e: ScheduleError) -> BookingError {
    match e {
        ScheduleError::ProfessionalNotFound => BookingError::ProfessionalNotFound,
        ScheduleError::ServiceNotFound => BookingError::ServiceNotFound,
        ScheduleError::InvalidRange(msg) => BookingError::InvalidRange(msg),
        ScheduleError::ValidationError(msg) => BookingError::ValidationError(msg),
        ScheduleError::BlockedTimeNotFound | ScheduleError::DatabaseError(_) => {
            BookingError::DatabaseError(e.to_string())
        }
    }
}

fn require_available(
    check: SlotCheck,
    start_time: DateTime<Utc>,
    professional_id: Uuid,
) -> Result<(), BookingError> {
    match check {
        SlotCheck::Available => Ok(()),
        SlotCheck::InPast => Err(BookingError::InvalidRange(
            "Appointment time must be in the future".to_string(),
        )),
        SlotCheck::BeyondHorizon => Err(BookingError::InvalidRange(
            "Appointment is beyond the booking horizon".to_string(),
        )),
        SlotCheck::OutsideWorkingHours => Err(BookingError::InvalidRange(
            "Requested time is outside working hours".to_string(),
        )),
        SlotCheck::Conflict | SlotCheck::QuotaExceeded => {
            warn!(
                "Commit-time conflict for professional {} at {}",
                professional_id, start_time
            );
            Err(BookingError::SlotTaken)
        }
    }
}
