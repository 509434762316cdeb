use super::{EventStore, PersistenceError, PersistenceResult};
use crate::event::{StoredEvent, UserRecord};
use parking_lot::RwLock;
use std::collections::HashMap;

struct UserEntry {
    user: UserRecord,
    events: Vec<StoredEvent>,
}

/// Process-local store. Contents are lost when it is dropped.
#[derive(Default)]
pub struct MemoryEventStore {
    users: RwLock<HashMap<String, UserEntry>>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventStore for MemoryEventStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn register_user(&self, user: &UserRecord) -> PersistenceResult<()> {
        let mut guard = self.users.write();
        if guard.contains_key(&user.user_key) {
            return Err(PersistenceError::DuplicateUser(user.user_key.clone()));
        }
        guard.insert(
            user.user_key.clone(),
            UserEntry {
                user: user.clone(),
                events: Vec::new(),
            },
        );
        Ok(())
    }

    fn find_user(&self, user_key: &str) -> PersistenceResult<Option<UserRecord>> {
        Ok(self
            .users
            .read()
            .get(user_key)
            .map(|entry| entry.user.clone()))
    }

    fn insert_event(&self, user_key: &str, event: &StoredEvent) -> PersistenceResult<()> {
        let mut guard = self.users.write();
        let entry = guard
            .get_mut(user_key)
            .ok_or_else(|| PersistenceError::UnknownUser(user_key.to_string()))?;
        entry.events.push(event.clone());
        Ok(())
    }

    fn events_for_user(&self, user_key: &str) -> PersistenceResult<Vec<StoredEvent>> {
        let guard = self.users.read();
        Ok(guard
            .get(user_key)
            .map(|entry| entry.events.clone())
            .unwrap_or_default())
    }
}
