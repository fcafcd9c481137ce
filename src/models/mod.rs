pub mod employee;
pub mod project;
pub mod role;
pub mod task;
pub mod time_entry;
pub mod workstream;
