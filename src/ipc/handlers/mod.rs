pub mod attendance;
pub mod calendar;
pub mod core;
pub mod grades;
pub mod notifications;
pub mod recognition;
pub mod schedule;
pub mod students;
