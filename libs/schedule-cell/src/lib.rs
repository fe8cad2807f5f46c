pub mod handlers;
pub mod interval;
pub mod models;
pub mod router;
pub mod services;

pub use models::{
    AvailableSlot, BlockedTime, Professional, RecurringPattern, ScheduleError, SlotCheck,
    TimeSlot, WorkingHours,
};
