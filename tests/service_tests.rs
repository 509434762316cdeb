use std::sync::Arc;

use calendar_backend::{
    CalendarError, CalendarService, EventError, EventStore, FixedClock, MemoryEventStore,
    NewEvent, StoredEvent,
};
use chrono::{Duration, NaiveDate, NaiveDateTime};

fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

fn service_at(now: NaiveDateTime) -> (CalendarService, Arc<MemoryEventStore>) {
    let store = Arc::new(MemoryEventStore::new());
    let service = CalendarService::new(store.clone(), Arc::new(FixedClock(now)));
    (service, store)
}

#[test]
fn register_issues_distinct_keys_stamped_with_now() {
    let now = dt(2025, 1, 6, 12, 0);
    let (service, store) = service_at(now);
    let first = service.register().unwrap();
    let second = service.register().unwrap();
    assert_ne!(first.user_key, second.user_key);
    assert_eq!(first.created_at, now);
    assert_eq!(store.find_user(&first.user_key).unwrap(), Some(first));
}

#[test]
fn running_meeting_is_listed_as_ongoing() {
    let now = dt(2025, 1, 6, 12, 0);
    let (service, _) = service_at(now);
    let user = service.register().unwrap();
    service
        .add_event(
            &user.user_key,
            &NewEvent::new("Spotkanie", "2025-01-06T11:30:00", "2025-01-06T12:30:00"),
        )
        .unwrap();

    assert_eq!(
        service.today_events(&user.user_key).unwrap(),
        vec!["Dziś trwa Spotkanie do 12:30"]
    );
}

#[test]
fn tomorrow_event_is_listed_on_offset_one() {
    let (service, _) = service_at(dt(2025, 1, 6, 21, 15));
    let user = service.register().unwrap();
    service
        .add_event(
            &user.user_key,
            &NewEvent::new("Lekarz", "2025-01-07T10:00", "2025-01-07T11:00"),
        )
        .unwrap();

    assert_eq!(
        service.events_at_offset(&user.user_key, 1).unwrap(),
        vec!["Jutro o 10:00 Lekarz"]
    );
    assert!(service.today_events(&user.user_key).unwrap().is_empty());
}

#[test]
fn seeded_events_cover_today_tomorrow_and_later() {
    let (service, _) = service_at(dt(2025, 1, 6, 12, 0));
    let user = service.register().unwrap();
    let seeded = service.seed_test_events(&user.user_key).unwrap();
    assert_eq!(seeded.len(), 4);

    assert_eq!(
        service.today_events(&user.user_key).unwrap(),
        vec![
            "Dziś o 14:00 Rozmowa z klientem",
            "Dziś trwa Spotkanie do 12:30",
        ]
    );
    assert_eq!(
        service.events_at_offset(&user.user_key, 1).unwrap(),
        vec!["Jutro o 13:00 Lekarz"]
    );
    assert!(service.events_at_offset(&user.user_key, 2).unwrap().is_empty());
    assert_eq!(
        service.events_at_offset(&user.user_key, 3).unwrap(),
        vec!["W czwartek, 9 stycznia o 13:00 Planowanie projektu"]
    );
}

#[test]
fn events_are_scoped_to_their_owner() {
    let (service, _) = service_at(dt(2025, 1, 6, 12, 0));
    let alice = service.register().unwrap();
    let bob = service.register().unwrap();
    service.seed_test_events(&alice.user_key).unwrap();

    assert!(service.today_events(&bob.user_key).unwrap().is_empty());
    assert_eq!(service.today_events(&alice.user_key).unwrap().len(), 2);
}

#[test]
fn unknown_user_is_reported() {
    let (service, _) = service_at(dt(2025, 1, 6, 12, 0));
    let new_event = NewEvent::new("Lekarz", "2025-01-07T10:00", "2025-01-07T11:00");

    assert!(matches!(
        service.today_events("missing"),
        Err(CalendarError::UnknownUser(key)) if key == "missing"
    ));
    assert!(matches!(
        service.events_at_offset("missing", 4),
        Err(CalendarError::UnknownUser(_))
    ));
    assert!(matches!(
        service.add_event("missing", &new_event),
        Err(CalendarError::UnknownUser(_))
    ));
    assert!(matches!(
        service.seed_test_events("missing"),
        Err(CalendarError::UnknownUser(_))
    ));
}

#[test]
fn invalid_new_events_are_rejected() {
    let (service, store) = service_at(dt(2025, 1, 6, 12, 0));
    let user = service.register().unwrap();

    let blank = NewEvent::new("   ", "2025-01-07T10:00", "2025-01-07T11:00");
    assert!(matches!(
        service.add_event(&user.user_key, &blank),
        Err(CalendarError::InvalidEvent(EventError::EmptyTitle))
    ));

    let bad_time = NewEvent::new("Lekarz", "jutro 10:00", "2025-01-07T11:00");
    assert!(matches!(
        service.add_event(&user.user_key, &bad_time),
        Err(CalendarError::InvalidEvent(EventError::InvalidTimestamp(_)))
    ));

    assert!(store.events_for_user(&user.user_key).unwrap().is_empty());
}

#[test]
fn added_events_are_stored_in_normalized_form() {
    let (service, store) = service_at(dt(2025, 1, 6, 12, 0));
    let user = service.register().unwrap();
    service
        .add_event(
            &user.user_key,
            &NewEvent::new("Basen", "2025-01-08 07:45", "2025-01-08"),
        )
        .unwrap();

    let stored = store.events_for_user(&user.user_key).unwrap();
    assert_eq!(
        stored,
        vec![StoredEvent {
            title: "Basen".into(),
            start_time: "2025-01-08T07:45:00".into(),
            end_time: "2025-01-08T00:00:00".into(),
        }]
    );
}

#[test]
fn malformed_stored_row_fails_the_listing() {
    let (service, store) = service_at(dt(2025, 1, 6, 12, 0));
    let user = service.register().unwrap();
    service.seed_test_events(&user.user_key).unwrap();
    store
        .insert_event(
            &user.user_key,
            &StoredEvent {
                title: "Zepsute".into(),
                start_time: "06/01/2025 13:00".into(),
                end_time: "2025-01-06T14:00:00".into(),
            },
        )
        .unwrap();

    match service.events_at_offset(&user.user_key, 7) {
        Err(CalendarError::MalformedEvent { title, source }) => {
            assert_eq!(title, "Zepsute");
            assert_eq!(
                source,
                EventError::InvalidTimestamp("06/01/2025 13:00".into())
            );
        }
        other => panic!("expected malformed event error, got {other:?}"),
    }
}

#[test]
fn seeding_at_the_end_of_time_fails_without_storing() {
    let now = NaiveDateTime::MAX - Duration::hours(12);
    let (service, store) = service_at(now);
    let user = service.register().unwrap();

    assert!(matches!(
        service.seed_test_events(&user.user_key),
        Err(CalendarError::TimeOutOfRange(at)) if at == now
    ));
    assert!(store.events_for_user(&user.user_key).unwrap().is_empty());
}
