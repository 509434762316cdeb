pub mod clock;
pub mod config;
pub mod event;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod locale;
pub mod logging;
pub mod persistence;
pub mod presenter;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AppConfig, ConfigError};
pub use event::{Event, EventError, NewEvent, StoredEvent, UserRecord, parse_timestamp};
pub use locale::Locale;
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteEventStore;
pub use persistence::{
    EventStore, MemoryEventStore, PersistenceError, PersistenceResult, StoreBackend, open_store,
};
pub use presenter::{EventPresenter, select_offset, select_today};
pub use service::{CalendarError, CalendarResult, CalendarService};
