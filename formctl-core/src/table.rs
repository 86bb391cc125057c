//! Filterable register table model.
//!
//! Rows are string-keyed JSON objects straight off the feed. The model
//! owns the full data set plus the current filters and recomputes the
//! visible ordering whenever either changes. One column may be derived
//! (an age column computed from a date-of-birth column at render time).

use chrono::{Datelike, NaiveDate};

use crate::calendar::{self, MonthView};
use crate::clock::Clock;

/// A feed row: column key to cell value
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Static description of a register table
#[derive(Debug, Clone)]
pub struct TableSpec {
    /// Column keys in display order
    pub headers: Vec<String>,
    /// Column driving the discrete value filter
    pub filter_column: String,
    /// Column whose unique values feed the suggestion list
    pub suggest_column: String,
    /// Date column rows sort by, newest first, absent last
    pub sort_column: String,
    /// Derived column and the date column it is computed from
    pub age_column: Option<(String, String)>,
}

/// Table state: data, filters, visible ordering
#[derive(Debug)]
pub struct TableModel {
    spec: TableSpec,
    clock: Clock,
    rows: Vec<Row>,
    visible: Vec<usize>,
    search: String,
    filter_value: Option<String>,
}

impl TableModel {
    pub fn new(spec: TableSpec, clock: Clock) -> Self {
        Self {
            spec,
            clock,
            rows: Vec::new(),
            visible: Vec::new(),
            search: String::new(),
            filter_value: None,
        }
    }

    pub fn spec(&self) -> &TableSpec {
        &self.spec
    }

    /// Replace the data set and reapply filters
    pub fn load(&mut self, rows: Vec<Row>) {
        self.rows = rows;
        self.apply();
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
        self.apply();
    }

    pub fn filter_value(&self) -> Option<&str> {
        self.filter_value.as_deref()
    }

    pub fn set_filter_value(&mut self, value: Option<String>) {
        self.filter_value = value;
        self.apply();
    }

    /// Drop both filters; the full data set becomes visible again
    pub fn clear_filters(&mut self) {
        self.search.clear();
        self.filter_value = None;
        self.apply();
    }

    /// Unique non-empty values of the filter column, sorted
    pub fn filter_values(&self) -> Vec<String> {
        let mut values: Vec<String> = self
            .rows
            .iter()
            .filter_map(|row| non_empty_text(row, &self.spec.filter_column))
            .collect();
        values.sort();
        values.dedup();
        values
    }

    /// Unique non-empty suggestion values from the currently visible
    /// rows, in row order
    pub fn suggestions(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for &idx in &self.visible {
            if let Some(value) = non_empty_text(&self.rows[idx], &self.spec.suggest_column) {
                if !seen.contains(&value) {
                    seen.push(value);
                }
            }
        }
        seen
    }

    /// Visible rows in display order
    pub fn visible_rows(&self) -> Vec<&Row> {
        self.visible.iter().map(|&idx| &self.rows[idx]).collect()
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Header display names: Title Case from snake_case keys
    pub fn display_headers(&self) -> Vec<String> {
        self.spec.headers.iter().map(|h| display_name(h)).collect()
    }

    /// Cell text for one row/column, deriving the age column
    pub fn cell_text(&self, row: &Row, header: &str) -> String {
        if let Some((age_col, dob_col)) = &self.spec.age_column {
            if header == age_col {
                let dob = text_value(row, dob_col);
                return age_string(&dob, self.clock.today());
            }
        }
        text_value(row, header)
    }

    /// Recompute the visible set: both filters AND-combined, then the
    /// date sort (newest first, rows without a date last)
    fn apply(&mut self) {
        let needle = self.search.to_lowercase();
        let mut visible: Vec<usize> = (0..self.rows.len())
            .filter(|&idx| {
                let row = &self.rows[idx];
                let matches_search = needle.is_empty()
                    || self.spec.headers.iter().any(|header| {
                        text_value(row, header).to_lowercase().contains(&needle)
                    });
                let matches_filter = match &self.filter_value {
                    Some(value) => text_value(row, &self.spec.filter_column) == *value,
                    None => true,
                };
                matches_search && matches_filter
            })
            .collect();

        let sort_column = self.spec.sort_column.clone();
        visible.sort_by(|&a, &b| {
            let da = sort_date(&self.rows[a], &sort_column);
            let db = sort_date(&self.rows[b], &sort_column);
            match (da, db) {
                (Some(da), Some(db)) => db.cmp(&da),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
        });

        self.visible = visible;
    }
}

fn sort_date(row: &Row, column: &str) -> Option<NaiveDate> {
    calendar::parse_value(&text_value(row, column)).ok()
}

fn text_value(row: &Row, key: &str) -> String {
    match row.get(key) {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn non_empty_text(row: &Row, key: &str) -> Option<String> {
    let value = text_value(row, key);
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Title Case a snake_case column key for display
pub fn display_name(header: &str) -> String {
    header
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Age from a `YYYY-MM-DD` date of birth as `xY yM zD`, skipping zero
/// components. Borrowed days come from the month before today. An
/// unparseable or empty dob yields an empty string.
pub fn age_string(dob: &str, today: NaiveDate) -> String {
    let Ok(dob) = calendar::parse_value(dob) else {
        return String::new();
    };

    let mut years = today.year() - dob.year();
    let mut months = today.month() as i32 - dob.month() as i32;
    let mut days = today.day() as i32 - dob.day() as i32;

    if days < 0 {
        months -= 1;
        days += MonthView::for_date(today).prev().day_count() as i32;
    }
    if months < 0 {
        years -= 1;
        months += 12;
    }

    let mut parts = Vec::new();
    if years != 0 {
        parts.push(format!("{}Y", years));
    }
    if months != 0 {
        parts.push(format!("{}M", months));
    }
    if days != 0 {
        parts.push(format!("{}D", days));
    }
    parts.join(" ")
}
