use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const STORAGE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    InvalidTimestamp(String),
    EmptyTitle,
}

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventError::InvalidTimestamp(text) => write!(f, "invalid timestamp '{text}'"),
            EventError::EmptyTitle => write!(f, "event title must not be empty"),
        }
    }
}

impl std::error::Error for EventError {}

/// Parses an ISO-8601 local date-time. A bare date resolves to midnight.
pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime, EventError> {
    let trimmed = text.trim();
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed);
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_| EventError::InvalidTimestamp(text.to_string()))
}

pub fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format(STORAGE_FORMAT).to_string()
}

/// A calendar entry with parsed timestamps, ready for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub title: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

impl Event {
    pub fn new(
        title: impl Into<String>,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
    ) -> Self {
        Self {
            title: title.into(),
            start_time,
            end_time,
        }
    }

    /// Start and end both inclusive.
    pub fn is_in_progress(&self, now: NaiveDateTime) -> bool {
        self.start_time <= now && now <= self.end_time
    }

    pub fn starts_on(&self, date: NaiveDate) -> bool {
        self.start_time.date() == date
    }

    pub fn to_stored(&self) -> StoredEvent {
        StoredEvent {
            title: self.title.clone(),
            start_time: format_timestamp(self.start_time),
            end_time: format_timestamp(self.end_time),
        }
    }
}

/// An event row as persisted, timestamps still in their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEvent {
    pub title: String,
    pub start_time: String,
    pub end_time: String,
}

impl StoredEvent {
    pub fn parse(&self) -> Result<Event, EventError> {
        Ok(Event {
            title: self.title.clone(),
            start_time: parse_timestamp(&self.start_time)?,
            end_time: parse_timestamp(&self.end_time)?,
        })
    }
}

/// Payload for creating an event; timestamps arrive as text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub start_time: String,
    pub end_time: String,
}

impl NewEvent {
    pub fn new(
        title: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }

    pub fn validate(&self) -> Result<Event, EventError> {
        if self.title.trim().is_empty() {
            return Err(EventError::EmptyTitle);
        }
        Ok(Event {
            title: self.title.clone(),
            start_time: parse_timestamp(&self.start_time)?,
            end_time: parse_timestamp(&self.end_time)?,
        })
    }
}

/// A registered user. The key is the only credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_key: String,
    pub created_at: NaiveDateTime,
}

impl UserRecord {
    pub fn generate(created_at: NaiveDateTime) -> Self {
        Self {
            user_key: uuid::Uuid::new_v4().simple().to_string(),
            created_at,
        }
    }
}
