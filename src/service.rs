use chrono::{Duration, NaiveDateTime};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::event::{Event, EventError, NewEvent, StoredEvent, UserRecord};
use crate::persistence::{EventStore, PersistenceError};
use crate::presenter::EventPresenter;

#[derive(Debug)]
pub enum CalendarError {
    Persistence(PersistenceError),
    UnknownUser(String),
    InvalidEvent(EventError),
    MalformedEvent { title: String, source: EventError },
    TimeOutOfRange(NaiveDateTime),
}

impl fmt::Display for CalendarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarError::Persistence(err) => write!(f, "storage error: {err}"),
            CalendarError::UnknownUser(key) => write!(f, "user {key} not found"),
            CalendarError::InvalidEvent(err) => write!(f, "{err}"),
            CalendarError::MalformedEvent { title, source } => {
                write!(f, "stored event '{title}' is malformed: {source}")
            }
            CalendarError::TimeOutOfRange(now) => {
                write!(f, "demonstration events around {now} fall outside the calendar")
            }
        }
    }
}

impl std::error::Error for CalendarError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CalendarError::Persistence(err) => Some(err),
            CalendarError::InvalidEvent(err) => Some(err),
            CalendarError::MalformedEvent { source, .. } => Some(source),
            CalendarError::UnknownUser(_) | CalendarError::TimeOutOfRange(_) => None,
        }
    }
}

impl From<PersistenceError> for CalendarError {
    fn from(value: PersistenceError) -> Self {
        match value {
            PersistenceError::UnknownUser(key) => CalendarError::UnknownUser(key),
            other => CalendarError::Persistence(other),
        }
    }
}

impl From<EventError> for CalendarError {
    fn from(value: EventError) -> Self {
        CalendarError::InvalidEvent(value)
    }
}

pub type CalendarResult<T> = Result<T, CalendarError>;

/// Demonstration events relative to `now`, or `None` when one of them would
/// fall outside chrono's representable range.
pub fn test_events(now: NaiveDateTime) -> Option<Vec<Event>> {
    // (title, start, end) in minutes from now
    const SPANS: [(&str, i64, i64); 4] = [
        ("Spotkanie", -30, 30),
        ("Rozmowa z klientem", 2 * 60, 3 * 60),
        ("Lekarz", 25 * 60, 26 * 60),
        ("Planowanie projektu", 73 * 60, 74 * 60),
    ];
    let at = |minutes: i64| now.checked_add_signed(Duration::try_minutes(minutes)?);
    SPANS
        .iter()
        .map(|&(title, start, end)| Some(Event::new(title, at(start)?, at(end)?)))
        .collect()
}

/// Glue between an [`EventStore`] and the [`EventPresenter`].
pub struct CalendarService {
    store: Arc<dyn EventStore>,
    clock: Arc<dyn Clock>,
    presenter: EventPresenter,
}

impl CalendarService {
    pub fn new(store: Arc<dyn EventStore>, clock: Arc<dyn Clock>) -> Self {
        Self::with_presenter(store, clock, EventPresenter::default())
    }

    pub fn with_presenter(
        store: Arc<dyn EventStore>,
        clock: Arc<dyn Clock>,
        presenter: EventPresenter,
    ) -> Self {
        Self {
            store,
            clock,
            presenter,
        }
    }

    pub fn store_name(&self) -> &'static str {
        self.store.backend_name()
    }

    pub fn register(&self) -> CalendarResult<UserRecord> {
        let user = UserRecord::generate(self.clock.now());
        self.store.register_user(&user)?;
        info!(user_key = %user.user_key, "registered user");
        Ok(user)
    }

    pub fn add_event(&self, user_key: &str, new_event: &NewEvent) -> CalendarResult<Event> {
        let event = new_event.validate().inspect_err(|err| {
            warn!(user_key, error = %err, "rejected event");
        })?;
        self.ensure_user(user_key)?;
        self.store.insert_event(user_key, &event.to_stored())?;
        debug!(user_key, title = %event.title, "stored event");
        Ok(event)
    }

    pub fn seed_test_events(&self, user_key: &str) -> CalendarResult<Vec<Event>> {
        self.ensure_user(user_key)?;
        let now = self.clock.now();
        let events = test_events(now).ok_or(CalendarError::TimeOutOfRange(now))?;
        for event in &events {
            self.store.insert_event(user_key, &event.to_stored())?;
        }
        info!(user_key, count = events.len(), "seeded test events");
        Ok(events)
    }

    pub fn today_events(&self, user_key: &str) -> CalendarResult<Vec<String>> {
        let events = self.load_events(user_key)?;
        let rendered = self.presenter.today(&events, self.clock.now());
        debug!(user_key, count = rendered.len(), "listed today's events");
        Ok(rendered)
    }

    pub fn events_at_offset(&self, user_key: &str, offset: i64) -> CalendarResult<Vec<String>> {
        let events = self.load_events(user_key)?;
        let rendered = self.presenter.at_offset(&events, offset, self.clock.now());
        debug!(user_key, offset, count = rendered.len(), "listed events at offset");
        Ok(rendered)
    }

    pub fn user_exists(&self, user_key: &str) -> CalendarResult<bool> {
        Ok(self.store.user_exists(user_key)?)
    }

    fn ensure_user(&self, user_key: &str) -> CalendarResult<()> {
        if self.user_exists(user_key)? {
            Ok(())
        } else {
            Err(CalendarError::UnknownUser(user_key.to_string()))
        }
    }

    // Any unparseable row fails the whole listing.
    fn load_events(&self, user_key: &str) -> CalendarResult<Vec<Event>> {
        self.ensure_user(user_key)?;
        self.store
            .events_for_user(user_key)?
            .iter()
            .map(|stored| parse_stored(user_key, stored))
            .collect()
    }
}

fn parse_stored(user_key: &str, stored: &StoredEvent) -> CalendarResult<Event> {
    stored.parse().map_err(|source| {
        warn!(user_key, title = %stored.title, error = %source, "malformed stored event");
        CalendarError::MalformedEvent {
            title: stored.title.clone(),
            source,
        }
    })
}
