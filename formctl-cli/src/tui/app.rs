//! Core application state for the widget host.
//!
//! The app is the "page": it owns one widget instance per form field, the
//! register table, and the shared dismissal registry every widget
//! subscribes to on construction.

use std::collections::HashMap;

use formctl_core::{
    Clock, DatePicker, DismissRegistry, HostField, PickerOptions, Region, Row, SelectModel,
    SubscriberId, TableModel, TableSpec, TextField,
};

/// Active tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    /// Data-entry form with the picker and select widgets
    #[default]
    Form,
    /// Register table backed by the remote feed
    Table,
}

/// The widget attached to a form field
#[derive(Debug)]
pub enum FieldWidget {
    Date(DatePicker),
    Select(SelectModel),
}

impl FieldWidget {
    pub fn is_open(&self) -> bool {
        match self {
            FieldWidget::Date(picker) => picker.is_open(),
            FieldWidget::Select(select) => select.is_open(),
        }
    }

    pub fn close(&mut self) {
        match self {
            FieldWidget::Date(picker) => picker.close(),
            FieldWidget::Select(select) => select.close(),
        }
    }
}

/// One labelled host field plus its widget
#[derive(Debug)]
pub struct FormField {
    pub label: String,
    pub value: TextField,
    pub widget: FieldWidget,
    pub subscriber: SubscriberId,
    /// On-screen rectangle from the last render; zero-sized until drawn
    pub region: Region,
}

impl FormField {
    fn date(
        label: &str,
        attrs: &[(&str, &str)],
        clock: Clock,
        dismiss: &mut DismissRegistry,
    ) -> Self {
        let attrs: HashMap<String, String> = attrs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let options = PickerOptions::from_attrs(&attrs);
        Self {
            label: label.to_string(),
            value: TextField::default(),
            widget: FieldWidget::Date(DatePicker::new(options, clock)),
            subscriber: dismiss.subscribe(),
            region: Region::new(0, 0, 0, 0),
        }
    }

    fn select(
        label: &str,
        items: Vec<String>,
        allow_add: bool,
        dismiss: &mut DismissRegistry,
    ) -> Self {
        Self {
            label: label.to_string(),
            value: TextField::default(),
            widget: FieldWidget::Select(SelectModel::new(items, allow_add)),
            subscriber: dismiss.subscribe(),
            region: Region::new(0, 0, 0, 0),
        }
    }
}

/// Main application state
#[derive(Debug)]
pub struct App {
    pub tab: Tab,
    pub clock: Clock,
    pub fields: Vec<FormField>,
    pub focused: usize,
    /// Day cursor inside an open picker popup
    pub cursor_day: u32,
    /// Highlighted entry inside an open select popup
    pub select_highlight: usize,
    pub table: TableModel,
    pub table_scroll: usize,
    /// Table search input is being edited
    pub editing_search: bool,
    pub dismiss: DismissRegistry,
    /// Open popup rectangle from the last render
    pub popup_region: Option<Region>,
    pub status_message: Option<String>,
    pub should_quit: bool,
}

impl App {
    /// Build the demo page: three date fields with the constraint
    /// variants the old pickers hardcoded, one year-locked field, and a
    /// staff select fed from the remote sheet.
    pub fn new(clock: Clock) -> Self {
        let mut dismiss = DismissRegistry::new();
        let fields = vec![
            FormField::date("Visit Date", &[], clock, &mut dismiss),
            FormField::date(
                "Date Of Birth",
                &[("disable-future", "true")],
                clock,
                &mut dismiss,
            ),
            FormField::date(
                "Next Appointment",
                &[("disable-past", "true")],
                clock,
                &mut dismiss,
            ),
            FormField::date(
                "Reviewed On",
                &[("year-limit", "current"), ("weekends-disabled", "true")],
                clock,
                &mut dismiss,
            ),
            FormField::select("Entered By", Vec::new(), true, &mut dismiss),
        ];

        Self {
            tab: Tab::Form,
            clock,
            fields,
            focused: 0,
            cursor_day: 1,
            select_highlight: 0,
            table: TableModel::new(register_spec(), clock),
            table_scroll: 0,
            editing_search: false,
            dismiss,
            popup_region: None,
            status_message: None,
            should_quit: false,
        }
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Index of the field whose widget popup is open, if any
    pub fn open_widget(&self) -> Option<usize> {
        self.fields.iter().position(|f| f.widget.is_open())
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focused = self
                .focused
                .checked_sub(1)
                .unwrap_or(self.fields.len() - 1);
        }
    }

    /// Open the focused field's widget, closing any other open popup
    pub fn open_focused(&mut self) {
        for (idx, field) in self.fields.iter_mut().enumerate() {
            if idx != self.focused {
                field.widget.close();
            }
        }
        let Some(field) = self.fields.get_mut(self.focused) else {
            return;
        };
        match &mut field.widget {
            FieldWidget::Date(picker) => {
                picker.open();
                self.cursor_day = initial_cursor(picker);
            }
            FieldWidget::Select(select) => {
                select.open();
                self.select_highlight = 0;
            }
        }
    }

    /// Close one field's popup, keeping its state
    pub fn close_widget(&mut self, idx: usize) {
        if let Some(field) = self.fields.get_mut(idx) {
            field.widget.close();
        }
        self.popup_region = None;
    }

    /// Move the picker day cursor, clamped to the displayed month
    pub fn move_cursor(&mut self, delta: i32) {
        if let Some(idx) = self.open_widget() {
            if let FieldWidget::Date(picker) = &self.fields[idx].widget {
                let max = picker.view().day_count() as i32;
                let next = (self.cursor_day as i32 + delta).clamp(1, max);
                self.cursor_day = next as u32;
            }
        }
    }

    /// Re-clamp the cursor after a month change
    pub fn clamp_cursor(&mut self) {
        if let Some(idx) = self.open_widget() {
            if let FieldWidget::Date(picker) = &self.fields[idx].widget {
                self.cursor_day = self.cursor_day.clamp(1, picker.view().day_count());
            }
        }
    }

    /// Field whose rectangle contains a point
    pub fn field_at(&self, x: u16, y: u16) -> Option<usize> {
        self.fields.iter().position(|f| f.region.contains(x, y))
    }

    /// Route a pointer press through the dismissal registry: widgets the
    /// press landed outside of close their popups
    pub fn dismiss_at(&mut self, x: u16, y: u16) {
        let outside = self.dismiss.press(x, y);
        for field in &mut self.fields {
            if outside.contains(&field.subscriber) && field.widget.is_open() {
                field.widget.close();
            }
        }
        if self.open_widget().is_none() {
            self.popup_region = None;
        }
    }

    /// Merge a staff feed into the select field
    pub fn staff_loaded(&mut self, options: &[String]) {
        for field in &mut self.fields {
            if let FieldWidget::Select(select) = &mut field.widget {
                select.extend_from_feed(options);
            }
        }
    }

    /// Cycle the table's discrete filter: all -> each value -> all
    pub fn cycle_table_filter(&mut self) {
        let values = self.table.filter_values();
        if values.is_empty() {
            return;
        }
        let next = match self.table.filter_value() {
            None => Some(values[0].clone()),
            Some(current) => values
                .iter()
                .position(|v| v == current)
                .and_then(|pos| values.get(pos + 1))
                .cloned(),
        };
        self.table.set_filter_value(next);
        self.table_scroll = 0;
    }

    /// Host-field value of a field (render helper)
    pub fn field_value(&self, idx: usize) -> &str {
        self.fields.get(idx).map(|f| f.value.value()).unwrap_or("")
    }
}

/// Where the day cursor starts when a picker opens: the selection if it
/// is in view, else today if in view, else day 1
fn initial_cursor(picker: &DatePicker) -> u32 {
    if let Some(selected) = picker.selected() {
        if picker.view().contains(selected) {
            return chrono::Datelike::day(&selected);
        }
    }
    let today = picker.today();
    if picker.view().contains(today) {
        return chrono::Datelike::day(&today);
    }
    1
}

/// The immunization-register table layout the feed serves
pub fn register_spec() -> TableSpec {
    TableSpec {
        headers: [
            "currently_living",
            "unique_id",
            "beneficiary_name",
            "beneficiary_national_id",
            "dob",
            "age",
            "sex",
            "island_residence",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
        filter_column: "currently_living".to_string(),
        suggest_column: "beneficiary_national_id".to_string(),
        sort_column: "dob".to_string(),
        age_column: Some(("age".to_string(), "dob".to_string())),
    }
}

/// Load table rows, or record the failure as the status placeholder
pub fn load_table(app: &mut App, result: Result<Vec<Row>, formctl_core::FormError>) {
    match result {
        Ok(rows) => {
            let count = rows.len();
            app.table.load(rows);
            app.set_status(format!("{} rows loaded", count));
        }
        Err(err) => {
            tracing::warn!(error = %err, "table feed failed");
            app.set_status("Failed to load data.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(Clock::fixed(2025, 8, 28))
    }

    #[test]
    fn test_focus_wraps() {
        let mut app = app();
        app.focused = app.fields.len() - 1;
        app.focus_next();
        assert_eq!(app.focused, 0);
        app.focus_prev();
        assert_eq!(app.focused, app.fields.len() - 1);
    }

    #[test]
    fn test_open_focused_closes_others() {
        let mut app = app();
        app.focused = 0;
        app.open_focused();
        assert_eq!(app.open_widget(), Some(0));
        app.focused = 2;
        app.open_focused();
        assert_eq!(app.open_widget(), Some(2));
    }

    #[test]
    fn test_cursor_starts_on_today() {
        let mut app = app();
        app.open_focused();
        assert_eq!(app.cursor_day, 28);
    }

    #[test]
    fn test_cursor_clamps_to_month() {
        let mut app = app();
        app.open_focused();
        app.move_cursor(30);
        assert_eq!(app.cursor_day, 31); // August has 31 days
        app.move_cursor(-60);
        assert_eq!(app.cursor_day, 1);
    }

    #[test]
    fn test_dismiss_closes_only_outside_widgets() {
        let mut app = app();
        app.open_focused();
        let idx = app.open_widget().unwrap();
        let sub = app.fields[idx].subscriber;
        // pretend render published a field + popup region
        app.dismiss
            .set_regions(sub, vec![Region::new(0, 0, 20, 3), Region::new(0, 3, 23, 10)]);

        app.dismiss_at(5, 5); // inside the popup
        assert_eq!(app.open_widget(), Some(idx));
        app.dismiss_at(70, 20); // outside everything
        assert_eq!(app.open_widget(), None);
    }

    #[test]
    fn test_staff_feed_extends_select() {
        let mut app = app();
        app.staff_loaded(&["Dr. Shifa".to_string(), "Nurse Hawwa".to_string()]);
        let select = app
            .fields
            .iter()
            .find_map(|f| match &f.widget {
                FieldWidget::Select(s) => Some(s),
                _ => None,
            })
            .unwrap();
        assert_eq!(select.items().len(), 2);
    }

    #[test]
    fn test_cycle_table_filter_round_trip() {
        let mut app = app();
        let rows: Vec<Row> = ["Male'", "Hulhumale'", "Male'"]
            .iter()
            .map(|living| {
                match serde_json::json!({ "currently_living": living, "dob": "" }) {
                    serde_json::Value::Object(map) => map,
                    _ => unreachable!(),
                }
            })
            .collect();
        app.table.load(rows);

        assert!(app.table.filter_value().is_none());
        app.cycle_table_filter();
        assert_eq!(app.table.filter_value(), Some("Hulhumale'"));
        app.cycle_table_filter();
        assert_eq!(app.table.filter_value(), Some("Male'"));
        app.cycle_table_filter();
        assert!(app.table.filter_value().is_none());
    }

    #[test]
    fn test_load_table_failure_sets_placeholder() {
        let mut app = app();
        load_table(&mut app, Err(formctl_core::FormError::fetch("boom")));
        assert_eq!(app.status_message.as_deref(), Some("Failed to load data."));
        assert!(app.table.is_empty());
    }
}
