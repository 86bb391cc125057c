//! Keyboard and mouse routing.
//!
//! Input goes to the open popup first, then to the active tab. Mouse
//! presses are offered to the dismissal registry before any widget gets
//! to interact with them, so a press outside a popup closes it exactly
//! once regardless of what else is on screen.

use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::tui::app::{App, FieldWidget, Tab};
use crate::tui::ui;

/// Result of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleResult {
    Continue,
    Quit,
}

/// Poll for the next terminal event with a timeout
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

pub fn handle_key(app: &mut App, key: KeyEvent) -> HandleResult {
    // Ctrl+C always quits, whatever mode we are in
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return HandleResult::Quit;
    }

    if let Some(idx) = app.open_widget() {
        handle_popup_key(app, idx, key);
        return HandleResult::Continue;
    }

    if app.editing_search {
        handle_search_key(app, key);
        return HandleResult::Continue;
    }

    match key.code {
        KeyCode::Char('q') => return HandleResult::Quit,
        KeyCode::Char('1') => app.tab = Tab::Form,
        KeyCode::Char('2') => app.tab = Tab::Table,
        _ => match app.tab {
            Tab::Form => handle_form_key(app, key),
            Tab::Table => handle_table_key(app, key),
        },
    }
    HandleResult::Continue
}

fn handle_form_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Tab | KeyCode::Down | KeyCode::Char('j') => app.focus_next(),
        KeyCode::BackTab | KeyCode::Up | KeyCode::Char('k') => app.focus_prev(),
        KeyCode::Enter | KeyCode::Char(' ') => app.open_focused(),
        _ => {}
    }
}

fn handle_table_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('/') => app.editing_search = true,
        KeyCode::Char('f') => app.cycle_table_filter(),
        KeyCode::Char('c') => {
            app.table.clear_filters();
            app.table_scroll = 0;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            let max = app.table.visible_len().saturating_sub(1);
            app.table_scroll = (app.table_scroll + 1).min(max);
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.table_scroll = app.table_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

/// Live search: every keystroke re-filters the table
fn handle_search_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => app.editing_search = false,
        KeyCode::Backspace => {
            let mut query = app.table.search().to_string();
            query.pop();
            app.table.set_search(query);
            app.table_scroll = 0;
        }
        KeyCode::Char(c) => {
            let mut query = app.table.search().to_string();
            query.push(c);
            app.table.set_search(query);
            app.table_scroll = 0;
        }
        _ => {}
    }
}

fn handle_popup_key(app: &mut App, idx: usize, key: KeyEvent) {
    match &app.fields[idx].widget {
        FieldWidget::Date(_) => handle_picker_key(app, idx, key),
        FieldWidget::Select(_) => handle_select_key(app, idx, key),
    }
}

fn handle_picker_key(app: &mut App, idx: usize, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_widget(idx),
        KeyCode::Left => app.move_cursor(-1),
        KeyCode::Right => app.move_cursor(1),
        KeyCode::Up => app.move_cursor(-7),
        KeyCode::Down => app.move_cursor(7),
        KeyCode::PageUp => {
            if let FieldWidget::Date(picker) = &mut app.fields[idx].widget {
                picker.navigate_month(-1);
            }
            app.clamp_cursor();
        }
        KeyCode::PageDown => {
            if let FieldWidget::Date(picker) = &mut app.fields[idx].widget {
                picker.navigate_month(1);
            }
            app.clamp_cursor();
        }
        KeyCode::Char('[') => {
            if let FieldWidget::Date(picker) = &mut app.fields[idx].widget {
                let year = picker.view().year();
                picker.jump_to_year(year - 1);
            }
            app.clamp_cursor();
        }
        KeyCode::Char(']') => {
            if let FieldWidget::Date(picker) = &mut app.fields[idx].widget {
                let year = picker.view().year();
                picker.jump_to_year(year + 1);
            }
            app.clamp_cursor();
        }
        KeyCode::Char('t') => {
            let field = &mut app.fields[idx];
            if let FieldWidget::Date(picker) = &mut field.widget {
                picker.select_today(&mut field.value);
            }
            app.clamp_cursor();
        }
        KeyCode::Char('c') => {
            let field = &mut app.fields[idx];
            if let FieldWidget::Date(picker) = &mut field.widget {
                picker.clear(&mut field.value);
            }
        }
        KeyCode::Enter => {
            let cursor = app.cursor_day;
            let field = &mut app.fields[idx];
            if let FieldWidget::Date(picker) = &mut field.widget {
                // disabled day: no-op, popup stays open
                picker.select_day(cursor, &mut field.value);
            }
            if app.open_widget().is_none() {
                app.popup_region = None;
            }
        }
        _ => {}
    }
}

fn handle_select_key(app: &mut App, idx: usize, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_widget(idx),
        KeyCode::Up => app.select_highlight = app.select_highlight.saturating_sub(1),
        KeyCode::Down => {
            if let FieldWidget::Select(select) = &app.fields[idx].widget {
                let max = select.entries().len().saturating_sub(1);
                app.select_highlight = (app.select_highlight + 1).min(max);
            }
        }
        KeyCode::Backspace => {
            if let FieldWidget::Select(select) = &mut app.fields[idx].widget {
                select.backspace_query();
            }
            clamp_select_highlight(app, idx);
        }
        KeyCode::Enter => {
            let highlight = app.select_highlight;
            let field = &mut app.fields[idx];
            if let FieldWidget::Select(select) = &mut field.widget {
                let entries = select.entries();
                if let Some(entry) = entries.get(highlight) {
                    select.choose(entry, &mut field.value);
                }
            }
            if app.open_widget().is_none() {
                app.popup_region = None;
            }
        }
        KeyCode::Char(c) => {
            if let FieldWidget::Select(select) = &mut app.fields[idx].widget {
                select.push_query_char(c);
            }
            clamp_select_highlight(app, idx);
        }
        _ => {}
    }
}

fn clamp_select_highlight(app: &mut App, idx: usize) {
    if let FieldWidget::Select(select) = &app.fields[idx].widget {
        let max = select.entries().len().saturating_sub(1);
        app.select_highlight = app.select_highlight.min(max);
    }
}

pub fn handle_mouse(app: &mut App, mouse: MouseEvent) -> HandleResult {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return HandleResult::Continue;
    }
    let (x, y) = (mouse.column, mouse.row);

    // A press inside an open popup interacts with it
    if let (Some(idx), Some(popup)) = (app.open_widget(), app.popup_region) {
        if popup.contains(x, y) {
            let field = &mut app.fields[idx];
            match &mut field.widget {
                FieldWidget::Date(picker) => {
                    let grid = picker.grid();
                    if let Some(day) = ui::day_at(popup, &grid, x, y) {
                        picker.select_day(day, &mut field.value);
                    }
                }
                FieldWidget::Select(select) => {
                    let entries = select.entries();
                    if let Some(pos) = ui::select_entry_at(popup, entries.len(), x, y) {
                        select.choose(&entries[pos], &mut field.value);
                    }
                }
            }
            if app.open_widget().is_none() {
                app.popup_region = None;
            }
            return HandleResult::Continue;
        }
    }

    // Everything else goes through the shared dismissal dispatch
    app.dismiss_at(x, y);

    if app.tab == Tab::Form {
        if let Some(idx) = app.field_at(x, y) {
            app.focused = idx;
            app.open_focused();
        }
    }
    HandleResult::Continue
}
