//! The calendar picker component.
//!
//! One instance binds to one host field. The picker owns its transient
//! view state (displayed month, selected date, open flag) and talks to
//! the field only through [`HostField`]: it writes formatted date strings
//! and reads nothing back.

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::calendar::{self, MonthGrid, MonthView};
use crate::clock::Clock;
use crate::config::{PickerOptions, YearLimit};

/// Anything with a settable text value can host a picker
pub trait HostField {
    /// Current field text
    fn value(&self) -> &str;
    /// Replace the field text
    fn set_value(&mut self, value: &str);
}

/// A plain string field, sufficient for tests and simple hosts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField(pub String);

impl HostField for TextField {
    fn value(&self) -> &str {
        &self.0
    }

    fn set_value(&mut self, value: &str) {
        self.0 = value.to_string();
    }
}

/// Calendar picker bound to one host field
#[derive(Debug, Clone)]
pub struct DatePicker {
    options: PickerOptions,
    clock: Clock,
    view: MonthView,
    selected: Option<NaiveDate>,
    open: bool,
}

impl DatePicker {
    /// Construct a picker. The view starts on the current month; the host
    /// field's existing value is left untouched.
    pub fn new(options: PickerOptions, clock: Clock) -> Self {
        let view = MonthView::for_date(clock.today());
        Self {
            options,
            clock,
            view,
            selected: None,
            open: false,
        }
    }

    pub fn options(&self) -> &PickerOptions {
        &self.options
    }

    pub fn view(&self) -> MonthView {
        self.view
    }

    pub fn selected(&self) -> Option<NaiveDate> {
        self.selected
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Today according to this picker's clock
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Make the popup visible. Placement below the host field is the
    /// renderer's job; the component only tracks visibility.
    pub fn open(&mut self) {
        self.open = true;
    }

    /// Hide the popup. View state and the selection survive.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Grid for the current view, recomputed from scratch
    pub fn grid(&self) -> MonthGrid {
        calendar::month_grid(self.view, &self.options, self.today())
    }

    /// Advance or retreat the view by one month, wrapping year
    /// boundaries. On a year-locked picker a step that would leave the
    /// current year is silently ignored.
    pub fn navigate_month(&mut self, delta: i32) {
        let next = match delta {
            1 => self.view.next(),
            -1 => self.view.prev(),
            _ => return,
        };
        if self.year_allowed(next.year()) {
            self.view = next;
        }
    }

    /// Jump the view to a 0-11 month index; out-of-range input is ignored
    pub fn jump_to_month(&mut self, month: u32) {
        if month <= 11 {
            self.view = MonthView::new(self.view.year(), month);
        }
    }

    /// Jump the view to a year; ignored when year-locked elsewhere or
    /// when the year cannot be represented as a calendar date
    pub fn jump_to_year(&mut self, year: i32) {
        if NaiveDate::from_ymd_opt(year, 1, 1).is_none() {
            return;
        }
        if self.year_allowed(year) {
            self.view = MonthView::new(year, self.view.month());
        }
    }

    /// Select the real current date, write it to the host field, and
    /// recenter the view on it.
    ///
    /// When `today_exempt` is off and a constraint excludes today, the
    /// action is a no-op (the old silently-return behavior).
    pub fn select_today(&mut self, field: &mut dyn HostField) {
        let today = self.today();
        if !self
            .options
            .constraint
            .allows(today, today, self.options.today_exempt)
        {
            debug!("today excluded by constraint, ignoring today action");
            return;
        }
        self.selected = Some(today);
        self.view = MonthView::for_date(today);
        field.set_value(&calendar::format_value(today));
    }

    /// Clear the selection and empty the host field. The popup stays
    /// open and the view stays where it was.
    pub fn clear(&mut self, field: &mut dyn HostField) {
        self.selected = None;
        field.set_value("");
    }

    /// Select a day of the displayed month.
    ///
    /// A disabled or nonexistent day is a no-op and returns false. On
    /// success the formatted value is written to the field and the popup
    /// closes.
    pub fn select_day(&mut self, day: u32, field: &mut dyn HostField) -> bool {
        let grid = self.grid();
        let selectable = grid.cell(day).map(|c| !c.is_disabled).unwrap_or(false);
        if !selectable {
            return false;
        }
        let Some(date) = self.view.date(day) else {
            return false;
        };
        self.selected = Some(date);
        field.set_value(&calendar::format_value(date));
        self.close();
        debug!(%date, "day selected");
        true
    }

    fn year_allowed(&self, year: i32) -> bool {
        match self.options.year_limit {
            YearLimit::Unlimited => true,
            YearLimit::CurrentYear => year == self.today().year(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::DateConstraint;

    fn picker_at(y: i32, m: u32, d: u32, options: PickerOptions) -> DatePicker {
        DatePicker::new(options, Clock::fixed(y, m, d))
    }

    #[test]
    fn test_construct_does_not_touch_field() {
        let mut field = TextField("existing".into());
        let picker = picker_at(2025, 3, 7, PickerOptions::new());
        assert_eq!(picker.view(), MonthView::new(2025, 2));
        assert_eq!(field.value(), "existing");
        // No selection until the user acts
        assert!(picker.selected().is_none());
        field.set_value("still mine");
        assert_eq!(field.value(), "still mine");
    }

    #[test]
    fn test_open_close_preserves_state() {
        let mut field = TextField::default();
        let mut picker = picker_at(2025, 3, 7, PickerOptions::new());
        picker.open();
        assert!(picker.is_open());
        assert!(picker.select_day(12, &mut field));
        assert!(!picker.is_open()); // selection closes
        picker.open();
        picker.close();
        assert_eq!(picker.selected(), Some(NaiveDate::from_ymd_opt(2025, 3, 12).unwrap()));
    }

    #[test]
    fn test_navigation_round_trip() {
        let mut picker = picker_at(2025, 1, 15, PickerOptions::new());
        let start = picker.view();
        picker.navigate_month(1);
        picker.navigate_month(-1);
        assert_eq!(picker.view(), start);
        // wrap backwards through the year boundary and back
        picker.navigate_month(-1);
        assert_eq!(picker.view(), MonthView::new(2024, 11));
        picker.navigate_month(1);
        assert_eq!(picker.view(), start);
    }

    #[test]
    fn test_navigation_keeps_selection() {
        let mut field = TextField::default();
        let mut picker = picker_at(2025, 3, 7, PickerOptions::new());
        picker.open();
        assert!(picker.select_day(7, &mut field));
        picker.open();
        picker.navigate_month(1);
        picker.navigate_month(1);
        assert_eq!(
            picker.selected(),
            Some(NaiveDate::from_ymd_opt(2025, 3, 7).unwrap())
        );
        assert_eq!(field.value(), "2025-03-07");
    }

    #[test]
    fn test_select_day_writes_formatted_value() {
        let mut field = TextField::default();
        let mut picker = picker_at(2025, 3, 20, PickerOptions::new());
        assert!(picker.select_day(7, &mut field));
        assert_eq!(field.value(), "2025-03-07");
    }

    #[test]
    fn test_select_disabled_day_is_noop() {
        let mut field = TextField::default();
        let options = PickerOptions {
            constraint: DateConstraint {
                disable_future: true,
                disable_past: false,
            },
            ..PickerOptions::new()
        };
        let mut picker = picker_at(2025, 3, 7, options);
        picker.open();
        assert!(!picker.select_day(20, &mut field));
        assert!(picker.selected().is_none());
        assert_eq!(field.value(), "");
        assert!(picker.is_open());
    }

    #[test]
    fn test_select_nonexistent_day_is_noop() {
        let mut field = TextField::default();
        let mut picker = picker_at(2025, 2, 10, PickerOptions::new());
        assert!(!picker.select_day(30, &mut field)); // no Feb 30
        assert!(!picker.select_day(0, &mut field));
    }

    #[test]
    fn test_clear_empties_field_keeps_view() {
        let mut field = TextField::default();
        let mut picker = picker_at(2025, 3, 7, PickerOptions::new());
        picker.select_day(12, &mut field);
        picker.open();
        picker.navigate_month(1);
        let view = picker.view();
        picker.clear(&mut field);
        assert_eq!(field.value(), "");
        assert!(picker.selected().is_none());
        assert_eq!(picker.view(), view);
        assert!(picker.is_open());
    }

    #[test]
    fn test_select_today_with_disable_past() {
        let mut field = TextField::default();
        let options = PickerOptions {
            constraint: DateConstraint {
                disable_future: false,
                disable_past: true,
            },
            ..PickerOptions::new()
        };
        let mut picker = picker_at(2025, 3, 7, options);
        picker.navigate_month(1);
        picker.select_today(&mut field);
        assert_eq!(field.value(), "2025-03-07");
        assert_eq!(picker.view(), MonthView::new(2025, 2));
        // everything before today in the recentered month is disabled
        let grid = picker.grid();
        for cell in &grid.cells {
            assert_eq!(cell.is_disabled, cell.day < 7, "day {}", cell.day);
        }
    }

    #[test]
    fn test_select_today_ignored_when_not_exempt() {
        let mut field = TextField::default();
        let options = PickerOptions {
            constraint: DateConstraint {
                disable_future: false,
                disable_past: true,
            },
            today_exempt: false,
            ..PickerOptions::new()
        };
        let mut picker = picker_at(2025, 3, 7, options);
        picker.select_today(&mut field);
        assert_eq!(field.value(), "");
        assert!(picker.selected().is_none());
    }

    #[test]
    fn test_year_locked_navigation_ignored() {
        let options = PickerOptions {
            year_limit: YearLimit::CurrentYear,
            ..PickerOptions::new()
        };
        let mut picker = picker_at(2025, 12, 10, options);
        picker.navigate_month(1); // would enter 2026
        assert_eq!(picker.view(), MonthView::new(2025, 11));
        picker.jump_to_year(2030);
        assert_eq!(picker.view().year(), 2025);
        picker.jump_to_month(0); // within-year jump still works
        assert_eq!(picker.view(), MonthView::new(2025, 0));
        picker.navigate_month(-1); // would enter 2024
        assert_eq!(picker.view(), MonthView::new(2025, 0));
    }

    #[test]
    fn test_jump_to_unrepresentable_year_ignored() {
        let mut picker = picker_at(2025, 6, 1, PickerOptions::new());
        picker.jump_to_year(300_000);
        picker.jump_to_year(-300_000);
        assert_eq!(picker.view(), MonthView::new(2025, 5));
        // the view still renders
        assert_eq!(picker.grid().cells.len(), 30);
    }

    #[test]
    fn test_jump_out_of_range_month_ignored() {
        let mut picker = picker_at(2025, 6, 1, PickerOptions::new());
        picker.jump_to_month(12);
        assert_eq!(picker.view(), MonthView::new(2025, 5));
        picker.jump_to_month(3);
        assert_eq!(picker.view(), MonthView::new(2025, 3));
    }
}
