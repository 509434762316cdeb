use chrono::{Datelike, NaiveDateTime};

/// Words and name tables used to render event listings.
///
/// Weekday names are Monday-first, month names January-first, both already
/// inflected for use inside a date phrase ("W środę, 8 stycznia").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locale {
    pub today: &'static str,
    pub tomorrow: &'static str,
    pub day_after_tomorrow: &'static str,
    pub on_day: &'static str,
    pub at: &'static str,
    pub ongoing: &'static str,
    pub until: &'static str,
    pub weekdays: [&'static str; 7],
    pub months: [&'static str; 12],
}

impl Locale {
    pub const POLISH: Locale = Locale {
        today: "Dziś",
        tomorrow: "Jutro",
        day_after_tomorrow: "Pojutrze",
        on_day: "W",
        at: "o",
        ongoing: "trwa",
        until: "do",
        weekdays: [
            "poniedziałek",
            "wtorek",
            "środę",
            "czwartek",
            "piątek",
            "sobotę",
            "niedzielę",
        ],
        months: [
            "stycznia",
            "lutego",
            "marca",
            "kwietnia",
            "maja",
            "czerwca",
            "lipca",
            "sierpnia",
            "września",
            "października",
            "listopada",
            "grudnia",
        ],
    };

    pub fn weekday_name(&self, timestamp: NaiveDateTime) -> &'static str {
        self.weekdays[timestamp.weekday().num_days_from_monday() as usize]
    }

    pub fn month_name(&self, timestamp: NaiveDateTime) -> &'static str {
        self.months[timestamp.month0() as usize]
    }

    /// Leading phrase for a listing `offset` days from today, including the
    /// trailing space.
    pub fn day_prefix(&self, offset: i64, start_time: NaiveDateTime) -> String {
        match offset {
            0 => format!("{} ", self.today),
            1 => format!("{} ", self.tomorrow),
            2 => format!("{} ", self.day_after_tomorrow),
            _ => format!(
                "{} {}, {} {} ",
                self.on_day,
                self.weekday_name(start_time),
                start_time.day(),
                self.month_name(start_time)
            ),
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::POLISH
    }
}
