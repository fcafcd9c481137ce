pub mod employees;
pub mod projects;
pub mod tasks;
pub mod timesheet;
pub mod workstreams;
