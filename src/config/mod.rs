use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_server_port")]
    pub server_port: u16,
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    #[serde(default = "default_expected_daily_hours")]
    pub expected_daily_hours: f64,
    #[serde(default = "default_max_hours_per_day")]
    pub max_hours_per_day: f64,
    #[serde(default = "default_separator_char")]
    pub separator_char: String,
}

fn default_server_port() -> u16 {
    8080
}
fn default_page_size() -> u32 {
    20
}
fn default_expected_daily_hours() -> f64 {
    8.0
}
fn default_max_hours_per_day() -> f64 {
    24.0
}
fn default_separator_char() -> String {
    "-".to_string()
}

impl Default for Config {
    fn default() -> Self {
        let db_path = Self::database_file();
        Self {
            database: db_path.to_string_lossy().to_string(),
            server_port: default_server_port(),
            default_page_size: default_page_size(),
            expected_daily_hours: default_expected_daily_hours(),
            max_hours_per_day: default_max_hours_per_day(),
            separator_char: default_separator_char(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rtimesheet")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".rtimesheet")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rtimesheet.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rtimesheet.sqlite")
    }

    /// Load configuration from file, or return defaults if not found.
    /// `RTIMESHEET_PORT` overrides the server port.
    pub fn load() -> AppResult<Self> {
        let mut cfg = Self::load_from(&Self::config_file())?;

        if let Ok(port) = env::var("RTIMESHEET_PORT") {
            cfg.server_port = port
                .parse()
                .map_err(|_| AppError::Config(format!("invalid RTIMESHEET_PORT '{port}'")))?;
        }

        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("failed to read {}: {e}", path.display())))?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("failed to parse {}: {e}", path.display())))
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    pub fn expected_daily_minutes(&self) -> i64 {
        crate::utils::time::hours_to_minutes(self.expected_daily_hours)
    }

    pub fn separator(&self) -> char {
        self.separator_char.chars().next().unwrap_or('-')
    }

    /// Initialize configuration and database files.
    /// Returns the resolved database path.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();

        // DB name: user provided or default
        let db_path = match custom_db {
            Some(name) => {
                let p = Path::new(&name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => dir.join("rtimesheet.sqlite"),
        };

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write config file
        if !is_test {
            fs::create_dir_all(&dir)?;
            let config = Config {
                database: db_path.to_string_lossy().to_string(),
                ..Config::default()
            };
            fs::write(Self::config_file(), config.to_yaml()?)?;
            success(format!("Config file: {}", Self::config_file().display()));
        }

        Ok(db_path)
    }
}
