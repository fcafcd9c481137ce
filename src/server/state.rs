use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// Shared server state: one SQLite connection behind a mutex.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<DbPool>>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(pool: DbPool, config: Config) -> Self {
        Self {
            db: Arc::new(Mutex::new(pool)),
            config: Arc::new(config),
        }
    }

    /// Run `func` with exclusive access to the connection.
    pub fn with_conn<F, T>(&self, func: F) -> AppResult<T>
    where
        F: FnOnce(&Connection) -> AppResult<T>,
    {
        let pool = self
            .db
            .lock()
            .map_err(|_| AppError::Other("database mutex poisoned".into()))?;
        pool.with_conn(func)
    }

    pub fn page_size(&self) -> u32 {
        self.config.default_page_size
    }
}
