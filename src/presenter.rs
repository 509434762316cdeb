//! Day selection and rendering of event listings.
//!
//! Everything here is a pure function of its inputs: the caller supplies the
//! events and the "now" anchor, so results are reproducible in tests.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::event::Event;
use crate::locale::Locale;

/// The calendar date `offset` days after `now`'s date, if representable.
pub fn target_date(now: NaiveDateTime, offset: i64) -> Option<NaiveDate> {
    let delta = Duration::try_days(offset)?;
    now.date().checked_add_signed(delta)
}

/// Events starting today that have not finished yet: upcoming ones plus those
/// currently in progress.
pub fn select_today(events: &[Event], now: NaiveDateTime) -> Vec<&Event> {
    let today = now.date();
    events
        .iter()
        .filter(|event| event.starts_on(today))
        .filter(|event| event.start_time >= now || event.is_in_progress(now))
        .collect()
}

/// Events starting on the day `offset` days from today, regardless of the
/// time of day.
pub fn select_offset(events: &[Event], offset: i64, now: NaiveDateTime) -> Vec<&Event> {
    let Some(date) = target_date(now, offset) else {
        return Vec::new();
    };
    events.iter().filter(|event| event.starts_on(date)).collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EventPresenter {
    locale: Locale,
}

impl EventPresenter {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// Renders one event as it appears in a listing for `offset`.
    ///
    /// On offset 0 an in-progress event is shown with its end time and the
    /// day prefix is dropped.
    pub fn format_event(&self, event: &Event, offset: i64, now: NaiveDateTime) -> String {
        let prefix = self.locale.day_prefix(offset, event.start_time);
        let start_time_text = event.start_time.format("%H:%M");
        let end_time_text = event.end_time.format("%H:%M");

        if offset == 0 && event.is_in_progress(now) {
            return format!(
                "{} {} {} {} {}",
                self.locale.today, self.locale.ongoing, event.title, self.locale.until, end_time_text
            );
        }

        format!("{prefix}{} {start_time_text} {}", self.locale.at, event.title)
    }

    pub fn today(&self, events: &[Event], now: NaiveDateTime) -> Vec<String> {
        let selected = select_today(events, now);
        self.render_sorted(&selected, 0, now)
    }

    pub fn at_offset(&self, events: &[Event], offset: i64, now: NaiveDateTime) -> Vec<String> {
        let selected = select_offset(events, offset, now);
        self.render_sorted(&selected, offset, now)
    }

    // Listing order is ordinal order of the rendered text, not event time.
    fn render_sorted(&self, events: &[&Event], offset: i64, now: NaiveDateTime) -> Vec<String> {
        let mut rendered: Vec<String> = events
            .iter()
            .map(|event| self.format_event(event, offset, now))
            .collect();
        rendered.sort();
        rendered
    }
}
