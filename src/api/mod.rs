pub mod advance;
pub mod attendance;
pub mod dashboard;
pub mod employee;
pub mod revenue;
pub mod statistics;
