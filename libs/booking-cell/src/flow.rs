// libs/booking-cell/src/flow.rs
//
// The client-facing booking wizard as a domain state machine: named states
// with explicit forward/back transitions, independent of any UI. The public
// booking endpoint drives a submitted form through the whole machine before
// the commit path runs.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{BookAppointmentRequest, PaymentChoice};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStep {
    SelectService,
    SelectSlot,
    ClientInfo,
    Confirm,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientDetails {
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub enum FlowEvent {
    ServiceSelected(Uuid),
    SlotSelected(DateTime<Utc>),
    ClientProvided(ClientDetails),
    Confirmed,
    Back,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum FlowError {
    #[error("Step {step:?} does not accept this input")]
    InvalidTransition { step: BookingStep },

    #[error("Validation error: {0}")]
    Invalid(String),

    #[error("Booking flow is not complete")]
    Incomplete,
}

#[derive(Debug, Clone)]
pub struct BookingFlow {
    step: BookingStep,
    service_id: Option<Uuid>,
    start_time: Option<DateTime<Utc>>,
    client: Option<ClientDetails>,
}

impl BookingFlow {
    pub fn new() -> Self {
        Self {
            step: BookingStep::SelectService,
            service_id: None,
            start_time: None,
            client: None,
        }
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    pub fn is_complete(&self) -> bool {
        self.step == BookingStep::Done
    }

    /// Advance (or step back) through the wizard. Each forward event is only
    /// legal in its own state; `Back` walks one step toward the start and
    /// keeps already-entered data.
    pub fn apply(&mut self, event: FlowEvent) -> Result<(), FlowError> {
        match (self.step, event) {
            (BookingStep::SelectService, FlowEvent::ServiceSelected(service_id)) => {
                self.service_id = Some(service_id);
                self.step = BookingStep::SelectSlot;
                Ok(())
            }
            (BookingStep::SelectSlot, FlowEvent::SlotSelected(start_time)) => {
                self.start_time = Some(start_time);
                self.step = BookingStep::ClientInfo;
                Ok(())
            }
            (BookingStep::ClientInfo, FlowEvent::ClientProvided(details)) => {
                validate_client_details(&details)?;
                self.client = Some(details);
                self.step = BookingStep::Confirm;
                Ok(())
            }
            (BookingStep::Confirm, FlowEvent::Confirmed) => {
                self.step = BookingStep::Done;
                Ok(())
            }
            (step, FlowEvent::Back) => {
                self.step = match step {
                    BookingStep::SelectService => BookingStep::SelectService,
                    BookingStep::SelectSlot => BookingStep::SelectService,
                    BookingStep::ClientInfo => BookingStep::SelectSlot,
                    BookingStep::Confirm => BookingStep::ClientInfo,
                    // A completed flow is immutable.
                    BookingStep::Done => return Err(FlowError::InvalidTransition { step }),
                };
                Ok(())
            }
            (step, _) => Err(FlowError::InvalidTransition { step }),
        }
    }

    /// Convert a completed flow into the commit request.
    pub fn into_booking_request(
        self,
        professional_id: Uuid,
        payment_method: Option<PaymentChoice>,
    ) -> Result<BookAppointmentRequest, FlowError> {
        if !self.is_complete() {
            return Err(FlowError::Incomplete);
        }

        let client = self.client.ok_or(FlowError::Incomplete)?;

        Ok(BookAppointmentRequest {
            professional_id,
            service_id: self.service_id.ok_or(FlowError::Incomplete)?,
            client_email: client.email,
            client_name: client.name,
            client_phone: client.phone,
            start_time: self.start_time.ok_or(FlowError::Incomplete)?,
            client_notes: client.notes,
            payment_method,
        })
    }
}

impl Default for BookingFlow {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_client_details(details: &ClientDetails) -> Result<(), FlowError> {
    if details.name.trim().is_empty() {
        return Err(FlowError::Invalid("Client name is required".to_string()));
    }

    let email = details.email.trim();
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !well_formed {
        return Err(FlowError::Invalid("Client email is invalid".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    fn details() -> ClientDetails {
        ClientDetails {
            email: "jane@example.com".to_string(),
            name: "Jane Smith".to_string(),
            phone: None,
            notes: None,
        }
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 16, 10, 0, 0).unwrap()
    }

    #[test]
    fn happy_path_reaches_done() {
        let mut flow = BookingFlow::new();
        flow.apply(FlowEvent::ServiceSelected(Uuid::new_v4())).unwrap();
        flow.apply(FlowEvent::SlotSelected(start())).unwrap();
        flow.apply(FlowEvent::ClientProvided(details())).unwrap();
        flow.apply(FlowEvent::Confirmed).unwrap();

        assert!(flow.is_complete());
    }

    #[test]
    fn events_out_of_order_are_rejected() {
        let mut flow = BookingFlow::new();
        assert_matches!(
            flow.apply(FlowEvent::SlotSelected(start())),
            Err(FlowError::InvalidTransition { step: BookingStep::SelectService })
        );
        assert_matches!(
            flow.apply(FlowEvent::Confirmed),
            Err(FlowError::InvalidTransition { .. })
        );
    }

    #[test]
    fn back_retraces_one_step_and_keeps_data() {
        let mut flow = BookingFlow::new();
        let service_id = Uuid::new_v4();
        flow.apply(FlowEvent::ServiceSelected(service_id)).unwrap();
        flow.apply(FlowEvent::SlotSelected(start())).unwrap();
        flow.apply(FlowEvent::Back).unwrap();

        assert_eq!(flow.step(), BookingStep::SelectSlot);

        // Moving forward again still works with the retained service.
        flow.apply(FlowEvent::SlotSelected(start())).unwrap();
        flow.apply(FlowEvent::ClientProvided(details())).unwrap();
        flow.apply(FlowEvent::Confirmed).unwrap();

        let request = flow.into_booking_request(Uuid::new_v4(), None).unwrap();
        assert_eq!(request.service_id, service_id);
    }

    #[test]
    fn back_from_start_is_a_no_op() {
        let mut flow = BookingFlow::new();
        flow.apply(FlowEvent::Back).unwrap();
        assert_eq!(flow.step(), BookingStep::SelectService);
    }

    #[test]
    fn done_flow_is_immutable() {
        let mut flow = BookingFlow::new();
        flow.apply(FlowEvent::ServiceSelected(Uuid::new_v4())).unwrap();
        flow.apply(FlowEvent::SlotSelected(start())).unwrap();
        flow.apply(FlowEvent::ClientProvided(details())).unwrap();
        flow.apply(FlowEvent::Confirmed).unwrap();

        assert_matches!(flow.apply(FlowEvent::Back), Err(FlowError::InvalidTransition { .. }));
    }

    #[test]
    fn rejects_bad_email_at_client_step() {
        let mut flow = BookingFlow::new();
        flow.apply(FlowEvent::ServiceSelected(Uuid::new_v4())).unwrap();
        flow.apply(FlowEvent::SlotSelected(start())).unwrap();

        let mut bad = details();
        bad.email = "not-an-email".to_string();
        assert_matches!(
            flow.apply(FlowEvent::ClientProvided(bad)),
            Err(FlowError::Invalid(_))
        );
        assert_eq!(flow.step(), BookingStep::ClientInfo);
    }

    #[test]
    fn incomplete_flow_cannot_become_a_request() {
        let mut flow = BookingFlow::new();
        flow.apply(FlowEvent::ServiceSelected(Uuid::new_v4())).unwrap();

        assert_matches!(
            flow.into_booking_request(Uuid::new_v4(), None),
            Err(FlowError::Incomplete)
        );
    }
}
