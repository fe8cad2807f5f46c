pub mod resolver;
pub mod timetable;

pub use resolver::AvailabilityService;
pub use timetable::TimetableService;
