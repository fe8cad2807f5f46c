pub mod flow;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{
    Appointment, AppointmentStatus, BookingError, Client, PaymentMethod, PaymentStatus,
};
pub use services::booking::BookingService;
