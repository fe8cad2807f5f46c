// libs/booking-cell/src/services/lifecycle.rs
use tracing::{debug, warn};

use crate::models::{AppointmentStatus, BookingError};

/// Appointment status machine. Identity is immutable; only status moves, and
/// only along these edges.
pub struct AppointmentLifecycle;

impl AppointmentLifecycle {
    pub fn new() -> Self {
        Self
    }

    pub fn validate_transition(
        &self,
        current: &AppointmentStatus,
        next: &AppointmentStatus,
    ) -> Result<(), BookingError> {
        debug!("Validating status transition {} -> {}", current, next);

        if !self.valid_transitions(current).contains(next) {
            warn!("Invalid status transition attempted: {} -> {}", current, next);
            return Err(BookingError::InvalidStatusTransition(*current));
        }

        Ok(())
    }

    pub fn valid_transitions(&self, current: &AppointmentStatus) -> Vec<AppointmentStatus> {
        match current {
            AppointmentStatus::Pending => vec![
                AppointmentStatus::Confirmed,
                AppointmentStatus::Cancelled,
                AppointmentStatus::NoShow,
            ],
            AppointmentStatus::Confirmed => vec![
                AppointmentStatus::Completed,
                AppointmentStatus::Cancelled,
                AppointmentStatus::NoShow,
            ],
            // Terminal states.
            AppointmentStatus::Completed
            | AppointmentStatus::Cancelled
            | AppointmentStatus::NoShow => vec![],
        }
    }

    pub fn is_terminal(&self, status: &AppointmentStatus) -> bool {
        self.valid_transitions(status).is_empty()
    }

    /// Only live bookings can move to a new interval.
    pub fn can_reschedule(&self, status: &AppointmentStatus) -> bool {
        matches!(
            status,
            AppointmentStatus::Pending | AppointmentStatus::Confirmed
        )
    }
}

impl Default for AppointmentLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn pending_can_confirm_or_exit() {
        let lifecycle = AppointmentLifecycle::new();
        assert!(lifecycle
            .validate_transition(&AppointmentStatus::Pending, &AppointmentStatus::Confirmed)
            .is_ok());
        assert!(lifecycle
            .validate_transition(&AppointmentStatus::Pending, &AppointmentStatus::Cancelled)
            .is_ok());
        assert_matches!(
            lifecycle.validate_transition(&AppointmentStatus::Pending, &AppointmentStatus::Completed),
            Err(BookingError::InvalidStatusTransition(AppointmentStatus::Pending))
        );
    }

    #[test]
    fn confirmed_can_complete() {
        let lifecycle = AppointmentLifecycle::new();
        assert!(lifecycle
            .validate_transition(&AppointmentStatus::Confirmed, &AppointmentStatus::Completed)
            .is_ok());
    }

    #[test]
    fn terminal_states_reject_everything() {
        let lifecycle = AppointmentLifecycle::new();
        for terminal in [
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::NoShow,
        ] {
            assert!(lifecycle.is_terminal(&terminal));
            assert!(lifecycle
                .validate_transition(&terminal, &AppointmentStatus::Pending)
                .is_err());
        }
    }

    #[test]
    fn only_live_bookings_reschedule() {
        let lifecycle = AppointmentLifecycle::new();
        assert!(lifecycle.can_reschedule(&AppointmentStatus::Pending));
        assert!(lifecycle.can_reschedule(&AppointmentStatus::Confirmed));
        assert!(!lifecycle.can_reschedule(&AppointmentStatus::Cancelled));
        assert!(!lifecycle.can_reschedule(&AppointmentStatus::Completed));
    }
}
