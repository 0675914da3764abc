pub mod advance;
pub mod attendance;
pub mod employee;
pub mod revenue;
pub mod role;
pub mod status_history;
