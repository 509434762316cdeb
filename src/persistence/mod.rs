use crate::event::{StoredEvent, UserRecord};
use std::fmt;
use std::sync::Arc;

#[derive(Debug)]
pub enum PersistenceError {
    #[cfg(feature = "sqlite")]
    Sqlite(rusqlite::Error),
    DuplicateUser(String),
    UnknownUser(String),
    InvalidData(String),
    Unsupported(String),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "sqlite")]
            PersistenceError::Sqlite(err) => write!(f, "sqlite error: {err}"),
            PersistenceError::DuplicateUser(key) => write!(f, "user {key} already registered"),
            PersistenceError::UnknownUser(key) => write!(f, "user {key} not found"),
            PersistenceError::InvalidData(msg) => write!(f, "invalid data: {msg}"),
            PersistenceError::Unsupported(msg) => write!(f, "unsupported store: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Storage for registered users and their events.
///
/// Events come back exactly as stored; parsing them is the caller's concern.
pub trait EventStore: Send + Sync {
    fn backend_name(&self) -> &'static str;
    fn register_user(&self, user: &UserRecord) -> PersistenceResult<()>;
    fn find_user(&self, user_key: &str) -> PersistenceResult<Option<UserRecord>>;

    fn user_exists(&self, user_key: &str) -> PersistenceResult<bool> {
        Ok(self.find_user(user_key)?.is_some())
    }

    fn insert_event(&self, user_key: &str, event: &StoredEvent) -> PersistenceResult<()>;
    /// All events of one user, in insertion order.
    fn events_for_user(&self, user_key: &str) -> PersistenceResult<Vec<StoredEvent>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite(std::path::PathBuf),
    Memory,
}

impl StoreBackend {
    pub fn name(&self) -> &'static str {
        match self {
            StoreBackend::Sqlite(_) => "sqlite",
            StoreBackend::Memory => "memory",
        }
    }
}

pub fn open_store(backend: &StoreBackend) -> PersistenceResult<Arc<dyn EventStore>> {
    match backend {
        #[cfg(feature = "sqlite")]
        StoreBackend::Sqlite(path) => Ok(Arc::new(sqlite::SqliteEventStore::new(path)?)),
        #[cfg(not(feature = "sqlite"))]
        StoreBackend::Sqlite(_) => Err(PersistenceError::Unsupported(
            "rebuild with the `sqlite` feature to use the sqlite store".to_string(),
        )),
        StoreBackend::Memory => Ok(Arc::new(memory::MemoryEventStore::new())),
    }
}

pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::MemoryEventStore;
