//! Opening hours

use jiff::civil::{Date, DateTime, Time, Weekday, time};

const EVENING_OPEN: Time = time(20, 0, 0, 0);
const EVENING_CLOSE: Time = time(23, 30, 0, 0);

/// Hours the shop is open on a single day, inclusive of both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpeningWindow {
    /// Opening time
    pub open: Time,

    /// Closing time
    pub close: Time,
}

impl OpeningWindow {
    /// Check if a time of day falls inside the window. Seconds are ignored.
    #[must_use]
    pub fn contains(&self, at: Time) -> bool {
        let minute = minute_of_day(at);

        minute >= minute_of_day(self.open) && minute <= minute_of_day(self.close)
    }
}

/// Weekly opening schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpeningHours {
    // Indexed from Sunday.
    days: [Option<OpeningWindow>; 7],
}

impl Default for OpeningHours {
    /// Evenings from 20:00 to 23:30, closed on Tuesdays and Thursdays.
    fn default() -> Self {
        let evening = Some(OpeningWindow {
            open: EVENING_OPEN,
            close: EVENING_CLOSE,
        });

        Self {
            days: [evening, evening, None, evening, None, evening, evening],
        }
    }
}

impl OpeningHours {
    /// A schedule that is always closed.
    #[must_use]
    pub fn closed() -> Self {
        Self { days: [None; 7] }
    }

    /// Set the window for one weekday.
    #[must_use]
    pub fn with_day(mut self, weekday: Weekday, window: Option<OpeningWindow>) -> Self {
        if let Some(day) = self.days.get_mut(day_index(weekday)) {
            *day = window;
        }

        self
    }

    /// The window for a weekday, `None` when closed all day.
    #[must_use]
    pub fn window(&self, weekday: Weekday) -> Option<OpeningWindow> {
        self.days.get(day_index(weekday)).copied().flatten()
    }

    /// Check if the shop is open at a local date and time.
    #[must_use]
    pub fn is_open_at(&self, at: DateTime) -> bool {
        self.window(at.weekday())
            .is_some_and(|window| window.contains(at.time()))
    }

    /// The next time the shop opens after `at`, looking a week ahead.
    #[must_use]
    pub fn next_opening(&self, at: DateTime) -> Option<DateTime> {
        let mut date: Date = at.date();

        for offset in 0..=7 {
            let opening = self
                .window(date.weekday())
                .filter(|window| offset > 0 || minute_of_day(at.time()) < minute_of_day(window.open));

            if let Some(window) = opening {
                return Some(date.to_datetime(window.open));
            }

            date = date.tomorrow().ok()?;
        }

        None
    }

    /// Human readable schedule, one line per weekday from Monday.
    pub fn describe(&self) -> Vec<String> {
        let mut weekday = Weekday::Monday;
        let mut lines = Vec::with_capacity(7);

        for _ in 0..7 {
            let hours = match self.window(weekday) {
                Some(window) => format!(
                    "{} - {}",
                    window.open.strftime("%H:%M"),
                    window.close.strftime("%H:%M")
                ),
                None => "cerrado".to_string(),
            };

            lines.push(format!("{}: {hours}", weekday_name(weekday)));
            weekday = weekday.next();
        }

        lines
    }
}

fn day_index(weekday: Weekday) -> usize {
    usize::try_from(weekday.to_sunday_zero_offset()).unwrap_or_default()
}

fn minute_of_day(at: Time) -> i32 {
    i32::from(at.hour()) * 60 + i32::from(at.minute())
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Monday => "lunes",
        Weekday::Tuesday => "martes",
        Weekday::Wednesday => "miércoles",
        Weekday::Thursday => "jueves",
        Weekday::Friday => "viernes",
        Weekday::Saturday => "sábado",
        Weekday::Sunday => "domingo",
    }
}
