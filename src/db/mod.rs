pub mod employees;
pub mod initialize;
pub mod log;
pub mod migrate;
pub mod paging;
pub mod pool;
pub mod projects;
pub mod stats;
pub mod tasks;
pub mod workstreams;
