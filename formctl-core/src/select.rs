//! Searchable select model.
//!
//! A replacement for a native select: an item list filtered live by a
//! case-insensitive substring query, with optional "add new" support and
//! the ability to fold in options fetched from a remote feed.

use tracing::debug;

use crate::picker::HostField;

/// One row offered by the open list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectEntry {
    /// An existing item
    Item(String),
    /// Offer to add the current query as a new item
    AddNew(String),
}

impl SelectEntry {
    /// Text shown for this entry
    pub fn label(&self) -> String {
        match self {
            SelectEntry::Item(item) => item.clone(),
            SelectEntry::AddNew(item) => format!("[Add] {}", item),
        }
    }
}

/// Searchable select bound to one host field
#[derive(Debug, Clone, Default)]
pub struct SelectModel {
    items: Vec<String>,
    query: String,
    selected: Option<String>,
    open: bool,
    allow_add: bool,
}

impl SelectModel {
    pub fn new(items: Vec<String>, allow_add: bool) -> Self {
        Self {
            items,
            allow_add,
            ..Default::default()
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Close the list and drop the query; items and selection survive
    pub fn close(&mut self) {
        self.open = false;
        self.query.clear();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn push_query_char(&mut self, c: char) {
        self.query.push(c);
    }

    pub fn backspace_query(&mut self) {
        self.query.pop();
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Entries matching the current query, with an add-entry appended
    /// when enabled and the trimmed query names no existing item
    pub fn entries(&self) -> Vec<SelectEntry> {
        let needle = self.query.trim().to_lowercase();
        let mut entries: Vec<SelectEntry> = self
            .items
            .iter()
            .filter(|item| needle.is_empty() || item.to_lowercase().contains(&needle))
            .cloned()
            .map(SelectEntry::Item)
            .collect();

        let trimmed = self.query.trim();
        if self.allow_add && !trimmed.is_empty() && !self.items.iter().any(|i| i == trimmed) {
            entries.push(SelectEntry::AddNew(trimmed.to_string()));
        }

        entries
    }

    /// Choose an entry: an add-entry appends its item first. The value is
    /// written to the host field, the list closes, the query resets.
    pub fn choose(&mut self, entry: &SelectEntry, field: &mut dyn HostField) {
        let value = match entry {
            SelectEntry::Item(item) => item.clone(),
            SelectEntry::AddNew(item) => {
                self.items.push(item.clone());
                debug!(item = %item, "added new select item");
                item.clone()
            }
        };
        self.selected = Some(value.clone());
        field.set_value(&value);
        self.close();
    }

    /// Merge options from a remote feed, skipping duplicates
    pub fn extend_from_feed(&mut self, options: &[String]) {
        for option in options {
            if !self.items.iter().any(|i| i == option) {
                self.items.push(option.clone());
            }
        }
    }
}
