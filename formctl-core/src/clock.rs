//! Source of the real-world current date.
//!
//! Widgets evaluate constraints against "today" at render time. The
//! original deployments pinned the calendar to a fixed UTC+5 region, so
//! "today" is a zone question, not just a machine-local one. `Fixed`
//! exists so tests can pin the date.

use chrono::{Local, NaiveDate, Utc};
use chrono_tz::Tz;

/// Where a widget gets "today" from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    /// Machine-local date
    System,
    /// Date in a fixed timezone
    Zone(Tz),
    /// A pinned date (tests, reproductions)
    Fixed(NaiveDate),
}

impl Default for Clock {
    fn default() -> Self {
        Clock::System
    }
}

impl Clock {
    /// Current calendar date according to this clock
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::System => Local::now().date_naive(),
            Clock::Zone(tz) => Utc::now().with_timezone(tz).date_naive(),
            Clock::Fixed(date) => *date,
        }
    }

    /// Convenience constructor for a pinned date
    pub fn fixed(year: i32, month: u32, day: u32) -> Self {
        Clock::Fixed(
            NaiveDate::from_ymd_opt(year, month, day).expect("valid fixed clock date"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = Clock::fixed(2025, 3, 7);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 3, 7).unwrap());
    }

    #[test]
    fn test_default_is_system() {
        assert_eq!(Clock::default(), Clock::System);
    }

    #[test]
    fn test_zone_clock_returns_a_date() {
        // Smoke: zone conversion must not panic and must be within one day
        // of UTC's date.
        let utc_today = Utc::now().date_naive();
        let zoned = Clock::Zone(chrono_tz::Indian::Maldives).today();
        let delta = (zoned - utc_today).num_days().abs();
        assert!(delta <= 1);
    }
}
