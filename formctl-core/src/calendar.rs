//! Month-grid computation for the calendar picker.
//!
//! One configurable engine replaces the pile of near-identical picker
//! implementations this toolkit grew out of. The grid is derived state:
//! recomputed from the view, the options, and the real current date on
//! every render, never cached.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::config::{PickerOptions, YearLimit};
use crate::error::{FormError, Result};

/// The month/year a picker is currently displaying, independent of any
/// selected date. Month is a 0-11 index (January = 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthView {
    year: i32,
    month: u32,
}

impl MonthView {
    /// Create a view for a given year and 0-11 month index.
    ///
    /// An out-of-range month is clamped to December rather than panicking;
    /// navigation keeps the invariant from then on.
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year,
            month: month.min(11),
        }
    }

    /// View containing a specific date
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month0(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// 0-11 month index
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The following month, wrapping December into the next year
    pub fn next(&self) -> Self {
        if self.month == 11 {
            Self {
                year: self.year + 1,
                month: 0,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The preceding month, wrapping January into the previous year
    pub fn prev(&self) -> Self {
        if self.month == 0 {
            Self {
                year: self.year - 1,
                month: 11,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// First calendar day of the viewed month
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
            .expect("month index kept in 0..=11")
    }

    /// Number of days in the viewed month ("day 0 of next month")
    pub fn day_count(&self) -> u32 {
        self.next()
            .first_day()
            .pred_opt()
            .map(|d| d.day())
            .unwrap_or(0)
    }

    /// Leading blank cells before day 1 in a Sunday-start week (0-6)
    pub fn leading_blanks(&self) -> u32 {
        self.first_day().weekday().num_days_from_sunday()
    }

    /// Date of a given day-of-month within this view, if it exists
    pub fn date(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month + 1, day)
    }

    /// Whether a date falls inside the viewed month
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month0() == self.month
    }
}

/// Future/past exclusion rules, evaluated against the current date at
/// render time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateConstraint {
    pub disable_future: bool,
    pub disable_past: bool,
}

impl DateConstraint {
    /// Whether a date is selectable under these rules.
    ///
    /// With `today_exempt` (the default) today always passes. Without it,
    /// an active past-exclusion also catches today itself, matching the
    /// picker variants that compared against a wall-clock instant.
    pub fn allows(&self, date: NaiveDate, today: NaiveDate, today_exempt: bool) -> bool {
        if self.disable_future && date > today {
            return false;
        }
        if self.disable_past && (date < today || (date == today && !today_exempt)) {
            return false;
        }
        true
    }
}

/// Which weekday pair counts as the weekend.
///
/// The deployments this replaces disagreed (regional Friday/Saturday vs
/// implicit Saturday/Sunday), so the rule is configuration, not a
/// constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeekendRule {
    #[default]
    FridaySaturday,
    SaturdaySunday,
}

impl WeekendRule {
    pub fn is_weekend(&self, weekday: Weekday) -> bool {
        match self {
            WeekendRule::FridaySaturday => {
                matches!(weekday, Weekday::Fri | Weekday::Sat)
            }
            WeekendRule::SaturdaySunday => {
                matches!(weekday, Weekday::Sat | Weekday::Sun)
            }
        }
    }
}

/// One rendered calendar cell with its derived display/interaction flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    /// Day of month, 1-based
    pub day: u32,
    pub is_today: bool,
    pub is_weekend: bool,
    pub is_disabled: bool,
}

/// A fully computed month of cells, in ascending day order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    /// Blank cells before day 1 (Sunday-start week)
    pub leading_blanks: u32,
    pub cells: Vec<DayCell>,
}

impl MonthGrid {
    /// Cell for a day-of-month, if the day exists in this month
    pub fn cell(&self, day: u32) -> Option<&DayCell> {
        if day == 0 {
            return None;
        }
        self.cells.get(day as usize - 1)
    }
}

/// Compute the grid for a view under the given options.
///
/// `today` comes from the caller's clock so constraint evaluation and the
/// today highlight agree within a render.
pub fn month_grid(view: MonthView, opts: &PickerOptions, today: NaiveDate) -> MonthGrid {
    let day_count = view.day_count();
    let mut cells = Vec::with_capacity(day_count as usize);

    for day in 1..=day_count {
        let Some(date) = view.date(day) else { continue };
        let weekday = date.weekday();
        let is_weekend = opts.weekend_rule.is_weekend(weekday);

        let mut is_disabled = !opts
            .constraint
            .allows(date, today, opts.today_exempt);
        if opts.weekends_disabled && is_weekend {
            is_disabled = true;
        }
        // Year-locked pickers shade everything past today
        if opts.year_limit == YearLimit::CurrentYear && date > today {
            is_disabled = true;
        }

        cells.push(DayCell {
            day,
            is_today: date == today,
            is_weekend,
            is_disabled,
        });
    }

    MonthGrid {
        leading_blanks: view.leading_blanks(),
        cells,
    }
}

/// Format a date for the host field: zero-padded `YYYY-MM-DD`, year with
/// at least four digits. This is the bit-exact external contract.
pub fn format_value(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Parse a `YYYY-MM-DD` host-field value back into a date
pub fn parse_value(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| FormError::invalid_date(value, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PickerOptions;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_counts() {
        assert_eq!(MonthView::new(2025, 0).day_count(), 31);
        assert_eq!(MonthView::new(2025, 1).day_count(), 28);
        assert_eq!(MonthView::new(2024, 1).day_count(), 29); // leap year
        assert_eq!(MonthView::new(2025, 3).day_count(), 30);
        assert_eq!(MonthView::new(2025, 11).day_count(), 31);
    }

    #[test]
    fn test_leading_blanks() {
        // 2025-03-01 is a Saturday
        assert_eq!(MonthView::new(2025, 2).leading_blanks(), 6);
        // 2023-10-01 is a Sunday
        assert_eq!(MonthView::new(2023, 9).leading_blanks(), 0);
        // 2025-09-01 is a Monday
        assert_eq!(MonthView::new(2025, 8).leading_blanks(), 1);
    }

    #[test]
    fn test_navigation_wraps_years() {
        let dec = MonthView::new(2024, 11);
        assert_eq!(dec.next(), MonthView::new(2025, 0));
        let jan = MonthView::new(2025, 0);
        assert_eq!(jan.prev(), MonthView::new(2024, 11));
    }

    #[test]
    fn test_navigation_round_trip() {
        for month in 0..12 {
            let view = MonthView::new(2025, month);
            assert_eq!(view.next().prev(), view);
            assert_eq!(view.prev().next(), view);
        }
    }

    #[test]
    fn test_format_value_contract() {
        assert_eq!(format_value(date(2025, 3, 7)), "2025-03-07");
        assert_eq!(format_value(date(33, 1, 1)), "0033-01-01");
        assert_eq!(format_value(date(12025, 12, 31)), "12025-12-31");
    }

    #[test]
    fn test_parse_value_round_trip() {
        let d = date(2025, 3, 7);
        assert_eq!(parse_value(&format_value(d)).unwrap(), d);
        assert!(parse_value("07/03/2025").is_err());
    }

    #[test]
    fn test_weekend_rules() {
        let fri = date(2025, 8, 29);
        let sat = date(2025, 8, 30);
        let sun = date(2025, 8, 31);
        assert!(WeekendRule::FridaySaturday.is_weekend(fri.weekday()));
        assert!(WeekendRule::FridaySaturday.is_weekend(sat.weekday()));
        assert!(!WeekendRule::FridaySaturday.is_weekend(sun.weekday()));
        assert!(WeekendRule::SaturdaySunday.is_weekend(sun.weekday()));
        assert!(!WeekendRule::SaturdaySunday.is_weekend(fri.weekday()));
    }

    #[test]
    fn test_grid_cell_count_matches_month() {
        let opts = PickerOptions::default();
        let today = date(2025, 8, 28);
        let grid = month_grid(MonthView::new(2025, 1), &opts, today);
        assert_eq!(grid.cells.len(), 28);
        assert_eq!(grid.cell(1).unwrap().day, 1);
        assert_eq!(grid.cell(28).unwrap().day, 28);
        assert!(grid.cell(29).is_none());
        assert!(grid.cell(0).is_none());
    }

    #[test]
    fn test_disable_future_exempts_today() {
        let opts = PickerOptions {
            constraint: DateConstraint {
                disable_future: true,
                disable_past: false,
            },
            ..Default::default()
        };
        let today = date(2025, 8, 15);
        let grid = month_grid(MonthView::for_date(today), &opts, today);

        for cell in &grid.cells {
            if cell.day > 15 {
                assert!(cell.is_disabled, "day {} should be disabled", cell.day);
            } else {
                assert!(!cell.is_disabled, "day {} should be enabled", cell.day);
            }
        }
        assert!(grid.cell(15).unwrap().is_today);
    }

    #[test]
    fn test_disable_past_without_exemption_catches_today() {
        let opts = PickerOptions {
            constraint: DateConstraint {
                disable_future: false,
                disable_past: true,
            },
            today_exempt: false,
            ..Default::default()
        };
        let today = date(2025, 8, 15);
        let grid = month_grid(MonthView::for_date(today), &opts, today);
        assert!(grid.cell(15).unwrap().is_disabled);
        assert!(!grid.cell(16).unwrap().is_disabled);
    }

    #[test]
    fn test_weekends_disabled_flag() {
        let opts = PickerOptions {
            weekends_disabled: true,
            ..Default::default()
        };
        let today = date(2025, 8, 28);
        let grid = month_grid(MonthView::new(2025, 7), &opts, today);
        // 2025-08-29 is a Friday
        assert!(grid.cell(29).unwrap().is_weekend);
        assert!(grid.cell(29).unwrap().is_disabled);
        assert!(!grid.cell(28).unwrap().is_disabled);
    }

    #[test]
    fn test_year_limit_disables_future_days() {
        let opts = PickerOptions {
            year_limit: YearLimit::CurrentYear,
            ..Default::default()
        };
        let today = date(2025, 8, 15);
        let grid = month_grid(MonthView::for_date(today), &opts, today);
        assert!(!grid.cell(15).unwrap().is_disabled);
        assert!(grid.cell(16).unwrap().is_disabled);
    }
}
