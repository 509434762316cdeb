use super::{EventStore, PersistenceError, PersistenceResult};
use crate::event::{StoredEvent, UserRecord, format_timestamp, parse_timestamp};
use parking_lot::Mutex;
use rusqlite::{Connection, ErrorCode, OptionalExtension, params};
use tracing::debug;

pub struct SqliteEventStore {
    connection: Mutex<Connection>,
}

impl SqliteEventStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path.as_ref())?;
        Self::initialize_schema(&connection)?;
        debug!(path = %path.as_ref().display(), "opened sqlite event store");
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    pub fn in_memory() -> PersistenceResult<Self> {
        let connection = Connection::open_in_memory()?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            PRAGMA foreign_keys = ON;
            CREATE TABLE IF NOT EXISTS users (
                user_key TEXT PRIMARY KEY,
                created_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_key TEXT NOT NULL REFERENCES users(user_key),
                title TEXT NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS events_user_key ON events(user_key);
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _) if failure.code == ErrorCode::ConstraintViolation
    )
}

impl EventStore for SqliteEventStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn register_user(&self, user: &UserRecord) -> PersistenceResult<()> {
        let conn = self.connection.lock();
        conn.execute(
            "INSERT INTO users (user_key, created_at) VALUES (?1, ?2)",
            params![user.user_key, format_timestamp(user.created_at)],
        )
        .map_err(|err| {
            if is_constraint_violation(&err) {
                PersistenceError::DuplicateUser(user.user_key.clone())
            } else {
                PersistenceError::from(err)
            }
        })?;
        Ok(())
    }

    fn find_user(&self, user_key: &str) -> PersistenceResult<Option<UserRecord>> {
        let conn = self.connection.lock();
        let mut stmt = conn.prepare("SELECT created_at FROM users WHERE user_key = ?1")?;
        let created_at: Option<String> = stmt
            .query_row(params![user_key], |row| row.get(0))
            .optional()?;

        let Some(created_at) = created_at else {
            return Ok(None);
        };
        let created_at = parse_timestamp(&created_at)
            .map_err(|err| PersistenceError::InvalidData(err.to_string()))?;
        Ok(Some(UserRecord {
            user_key: user_key.to_string(),
            created_at,
        }))
    }

    fn insert_event(&self, user_key: &str, event: &StoredEvent) -> PersistenceResult<()> {
        let conn = self.connection.lock();
        conn.execute(
            "INSERT INTO events (user_key, title, start_time, end_time) VALUES (?1, ?2, ?3, ?4)",
            params![user_key, event.title, event.start_time, event.end_time],
        )
        .map_err(|err| {
            if is_constraint_violation(&err) {
                PersistenceError::UnknownUser(user_key.to_string())
            } else {
                PersistenceError::from(err)
            }
        })?;
        Ok(())
    }

    fn events_for_user(&self, user_key: &str) -> PersistenceResult<Vec<StoredEvent>> {
        let conn = self.connection.lock();
        let mut stmt = conn.prepare(
            "SELECT title, start_time, end_time FROM events WHERE user_key = ?1 ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![user_key], |row| {
            Ok(StoredEvent {
                title: row.get(0)?,
                start_time: row.get(1)?,
                end_time: row.get(2)?,
            })
        })?;

        let mut events = Vec::new();
        for event in rows {
            events.push(event?);
        }
        Ok(events)
    }
}
