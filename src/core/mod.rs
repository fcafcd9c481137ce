pub mod access;
pub mod aggregate;
pub mod backup;
pub mod employee;
pub mod log;
pub mod project;
pub mod store;
pub mod submit;
pub mod tasks;
pub mod timesheet;
pub mod workstream;
