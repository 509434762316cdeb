//! Runtime configuration read from `CALENDAR_*` environment variables.

use chrono::NaiveDateTime;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use crate::clock::{Clock, FixedClock, SystemClock};
use crate::event::parse_timestamp;
use crate::persistence::StoreBackend;

pub const HTTP_ADDR_VAR: &str = "CALENDAR_HTTP_ADDR";
pub const STORE_VAR: &str = "CALENDAR_STORE";
pub const DB_FILE_VAR: &str = "CALENDAR_DB_FILE";
pub const LOG_VAR: &str = "CALENDAR_LOG";
pub const FIXED_NOW_VAR: &str = "CALENDAR_FIXED_NOW";

const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_DB_FILE: &str = "calendar.db";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    variable: &'static str,
    message: String,
}

impl ConfigError {
    fn new(variable: &'static str, message: impl Into<String>) -> Self {
        Self {
            variable,
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.variable, self.message)
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub http_addr: SocketAddr,
    pub store: StoreBackend,
    pub log_level: String,
    /// Pins the clock; unset means wall-clock time.
    pub fixed_now: Option<NaiveDateTime>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let http_addr = value(HTTP_ADDR_VAR)
            .unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string())
            .trim()
            .parse::<SocketAddr>()
            .map_err(|err| ConfigError::new(HTTP_ADDR_VAR, format!("{err}")))?;

        let db_file = value(DB_FILE_VAR).unwrap_or_else(|| DEFAULT_DB_FILE.to_string());
        let store = match value(STORE_VAR).as_deref().map(str::trim) {
            None | Some("sqlite") => StoreBackend::Sqlite(PathBuf::from(db_file)),
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::new(
                    STORE_VAR,
                    format!("unknown store '{other}' (expected sqlite or memory)"),
                ));
            }
        };

        let log_level = value(LOG_VAR).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        let fixed_now = value(FIXED_NOW_VAR)
            .map(|text| parse_timestamp(&text))
            .transpose()
            .map_err(|err| ConfigError::new(FIXED_NOW_VAR, err.to_string()))?;

        Ok(Self {
            http_addr,
            store,
            log_level,
            fixed_now,
        })
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        match self.fixed_now {
            Some(now) => Arc::new(FixedClock(now)),
            None => Arc::new(SystemClock),
        }
    }
}
