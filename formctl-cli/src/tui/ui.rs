//! UI rendering using ratatui
//!
//! Rendering also publishes geometry: every field's rectangle and the
//! open popup's rectangle are written back to the app and into the
//! dismissal registry, so the mouse handlers and the renderer always
//! agree about what is where.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row as TableRow, Table, Tabs},
    Frame,
};

use formctl_core::{MonthGrid, Region, SelectEntry};

use crate::tui::app::{App, FieldWidget, Tab};

/// Primary accent color
const ACCENT: Color = Color::Cyan;
/// Secondary color for less important elements
const SECONDARY: Color = Color::DarkGray;
/// Highlight color for the day cursor and select highlight
const HIGHLIGHT: Color = Color::Yellow;
/// Success color (today, add-new entries)
const SUCCESS: Color = Color::Green;
/// Dim text color (disabled days)
const DIM: Color = Color::Rgb(100, 100, 100);
/// Weekend day color
const WEEKEND: Color = Color::Red;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Calendar cell width in columns; the grid is seven cells wide
const CELL_WIDTH: u16 = 3;
/// Rows of the calendar popup that are chrome above the day cells
/// (top border plus the weekday header)
const CALENDAR_HEADER_ROWS: u16 = 2;

/// Render the entire UI
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab header
            Constraint::Min(5),    // Content area
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_tabs(frame, app, chunks[0]);

    match app.tab {
        Tab::Form => render_form(frame, app, chunks[1]),
        Tab::Table => render_table(frame, app, chunks[1]),
    }

    render_status_bar(frame, app, chunks[2]);

    if app.editing_search {
        render_search_input(frame, app);
    }
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles = vec!["Form [1]", "Register [2]"];
    let selected = match app.tab {
        Tab::Form => 0,
        Tab::Table => 1,
    };
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(" formctl "))
        .select(selected)
        .style(Style::default().fg(SECONDARY))
        .highlight_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, area);
}

/// Render the form fields, record their rectangles, then draw the open
/// popup on top and refresh the dismissal regions.
fn render_form(frame: &mut Frame, app: &mut App, area: Rect) {
    let mut constraints: Vec<Constraint> =
        app.fields.iter().map(|_| Constraint::Length(3)).collect();
    constraints.push(Constraint::Min(0));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (idx, rect) in rows.iter().take(app.fields.len()).enumerate() {
        let focused = idx == app.focused;
        let field = &mut app.fields[idx];
        field.region = Region::new(rect.x, rect.y, rect.width, rect.height);

        let border_style = if focused {
            Style::default().fg(ACCENT)
        } else {
            Style::default().fg(SECONDARY)
        };
        let value = field.value.0.as_str();
        let content = if value.is_empty() {
            Span::styled(placeholder(&field.widget), Style::default().fg(DIM))
        } else {
            Span::raw(value)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!(" {} ", field.label));
        frame.render_widget(Paragraph::new(Line::from(content)).block(block), *rect);
    }

    app.popup_region = None;
    if let Some(idx) = app.open_widget() {
        let field_region = app.fields[idx].region;
        let popup = match &app.fields[idx].widget {
            FieldWidget::Date(picker) => {
                let popup = calendar_popup_rect(field_region, area, &picker.grid());
                render_calendar_popup(frame, app, idx, popup);
                popup
            }
            FieldWidget::Select(select) => {
                let popup = select_popup_rect(field_region, area, select.entries().len());
                render_select_popup(frame, app, idx, popup);
                popup
            }
        };
        app.popup_region = Some(Region::new(popup.x, popup.y, popup.width, popup.height));
    }

    // Publish current geometry so outside presses dismiss correctly
    for idx in 0..app.fields.len() {
        let mut regions = vec![app.fields[idx].region];
        if app.fields[idx].widget.is_open() {
            if let Some(popup) = app.popup_region {
                regions.push(popup);
            }
        }
        let subscriber = app.fields[idx].subscriber;
        app.dismiss.set_regions(subscriber, regions);
    }
}

fn placeholder(widget: &FieldWidget) -> &'static str {
    match widget {
        FieldWidget::Date(_) => "YYYY-MM-DD",
        FieldWidget::Select(_) => "choose...",
    }
}

/// Popup rectangle below a host field, pulled up if it would run off
/// the bottom of the screen
fn popup_below(field: Region, area: Rect, width: u16, height: u16) -> Rect {
    let x = field.x.min(area.right().saturating_sub(width));
    let below = field.y + field.height;
    let y = if below + height <= area.bottom() {
        below
    } else {
        field.y.saturating_sub(height)
    };
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn calendar_popup_rect(field: Region, area: Rect, grid: &MonthGrid) -> Rect {
    let day_rows = (grid.leading_blanks as usize + grid.cells.len()).div_ceil(7) as u16;
    // borders + weekday header + day rows + hint line
    let height = day_rows + 4;
    let width = 7 * CELL_WIDTH + 2;
    popup_below(field, area, width, height)
}

fn select_popup_rect(field: Region, area: Rect, entries: usize) -> Rect {
    let visible = entries.clamp(1, 8) as u16;
    // borders + query line + entries
    let height = visible + 3;
    let width = field.width.clamp(20, 34);
    popup_below(field, area, width, height)
}

fn render_calendar_popup(frame: &mut Frame, app: &App, idx: usize, popup: Rect) {
    let FieldWidget::Date(picker) = &app.fields[idx].widget else {
        return;
    };
    let grid = picker.grid();
    let view = picker.view();
    let selected_day = picker
        .selected()
        .filter(|d| view.contains(*d))
        .map(|d| chrono::Datelike::day(&d));

    let title = format!(
        " {} {} ",
        MONTH_NAMES[view.month() as usize],
        view.year()
    );

    let mut lines = Vec::new();
    lines.push(Line::from(Span::styled(
        "Su Mo Tu We Th Fr Sa",
        Style::default().fg(SECONDARY),
    )));

    let mut spans: Vec<Span> = (0..grid.leading_blanks)
        .map(|_| Span::raw("   "))
        .collect();
    for cell in &grid.cells {
        let mut style = Style::default();
        if cell.is_weekend {
            style = style.fg(WEEKEND);
        }
        if cell.is_disabled {
            style = style.fg(DIM);
        }
        if cell.is_today {
            style = style.fg(SUCCESS).add_modifier(Modifier::BOLD);
        }
        if selected_day == Some(cell.day) {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        if cell.day == app.cursor_day {
            style = style.bg(HIGHLIGHT).fg(Color::Black);
        }
        spans.push(Span::styled(format!("{:>2} ", cell.day), style));
        if spans.len() == 7 {
            lines.push(Line::from(std::mem::take(&mut spans)));
        }
    }
    if !spans.is_empty() {
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(Span::styled(
        "t today  c clear",
        Style::default().fg(DIM),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
        .title(title);
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn render_select_popup(frame: &mut Frame, app: &App, idx: usize, popup: Rect) {
    let FieldWidget::Select(select) = &app.fields[idx].widget else {
        return;
    };
    let entries = select.entries();
    let visible = (popup.height.saturating_sub(3)) as usize;
    let offset = app.select_highlight.saturating_sub(visible.saturating_sub(1));

    let mut lines = vec![Line::from(vec![
        Span::styled("> ", Style::default().fg(ACCENT)),
        Span::raw(select.query().to_string()),
        Span::styled("_", Style::default().fg(ACCENT)),
    ])];
    for (pos, entry) in entries.iter().enumerate().skip(offset).take(visible) {
        let mut style = match entry {
            SelectEntry::Item(_) => Style::default(),
            SelectEntry::AddNew(_) => Style::default().fg(SUCCESS),
        };
        if pos == app.select_highlight {
            style = style.bg(ACCENT).fg(Color::Black);
        }
        lines.push(Line::from(Span::styled(entry.label(), style)));
    }
    if entries.is_empty() {
        lines.push(Line::from(Span::styled(
            "no matches",
            Style::default().fg(DIM),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
        .title(format!(" {} ", app.fields[idx].label));
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let model = &app.table;
    let mut title = format!(" Register ({} rows", model.visible_len());
    if let Some(value) = model.filter_value() {
        title.push_str(&format!(", filter: {}", value));
    }
    if !model.search().is_empty() {
        title.push_str(&format!(", search: {}", model.search()));
    }
    title.push_str(") ");

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(SECONDARY))
        .title(title);

    if model.is_empty() {
        let placeholder = app
            .status_message
            .as_deref()
            .unwrap_or("No data loaded. Pass --url to load a register feed.");
        frame.render_widget(
            Paragraph::new(placeholder).style(Style::default().fg(DIM)).block(block),
            area,
        );
        return;
    }

    let headers = model.display_headers();
    let ncols = headers.len().max(1) as u32;
    let header_row = TableRow::new(
        headers
            .iter()
            .map(|h| Cell::from(h.clone()).style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))),
    );

    let spec_headers: Vec<String> = model.spec().headers.clone();
    let rows: Vec<TableRow> = model
        .visible_rows()
        .into_iter()
        .skip(app.table_scroll)
        .map(|row| {
            TableRow::new(
                spec_headers
                    .iter()
                    .map(|header| Cell::from(model.cell_text(row, header))),
            )
        })
        .collect();

    let widths: Vec<Constraint> = (0..ncols).map(|_| Constraint::Ratio(1, ncols)).collect();
    let table = Table::new(rows, widths).header(header_row).block(block);
    frame.render_widget(table, area);
}

/// Centered search overlay, live against the table
fn render_search_input(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let width = 44.min(area.width);
    let popup = Rect::new(
        area.width.saturating_sub(width) / 2,
        area.height / 2,
        width,
        3,
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(HIGHLIGHT))
        .title(" Search ");
    let line = Line::from(vec![
        Span::styled("/ ", Style::default().fg(HIGHLIGHT)),
        Span::raw(app.table.search().to_string()),
        Span::styled("_", Style::default().fg(HIGHLIGHT)),
    ]);
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(line).block(block), popup);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let help = if app.open_widget().is_some() {
        match &app.fields[app.open_widget().unwrap_or_default()].widget {
            FieldWidget::Date(_) => {
                "arrows: move | PgUp/PgDn: month | [/]: year | t: today | c: clear | Enter: pick | Esc: close"
            }
            FieldWidget::Select(_) => "type to filter | Up/Down: highlight | Enter: choose | Esc: close",
        }
    } else if app.editing_search {
        "type to search | Enter/Esc: done"
    } else {
        match app.tab {
            Tab::Form => "Tab/j/k: field | Enter: open | 1/2: tab | q: quit",
            Tab::Table => "/: search | f: filter | c: clear | j/k: scroll | 1/2: tab | q: quit",
        }
    };

    let mut spans = vec![Span::styled(help, Style::default().fg(SECONDARY))];
    if let Some(message) = &app.status_message {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            message.clone(),
            Style::default().fg(HIGHLIGHT),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Day under a point inside a calendar popup, if it lands on a real,
/// in-month cell. Must mirror the layout `render_calendar_popup` draws.
pub fn day_at(popup: Region, grid: &MonthGrid, x: u16, y: u16) -> Option<u32> {
    let inner_x = popup.x + 1;
    let inner_y = popup.y + CALENDAR_HEADER_ROWS;
    if x < inner_x || y < inner_y {
        return None;
    }
    let col = (x - inner_x) / CELL_WIDTH;
    let row = y - inner_y;
    if col >= 7 {
        return None;
    }
    let slot = row as u32 * 7 + col as u32;
    let day = (slot + 1).checked_sub(grid.leading_blanks)?;
    if day == 0 || day > grid.cells.len() as u32 {
        return None;
    }
    Some(day)
}

/// Entry index under a point inside a select popup (row 0 is the query
/// line, entries start one row below it)
pub fn select_entry_at(popup: Region, entries: usize, x: u16, y: u16) -> Option<usize> {
    if !popup.contains(x, y) {
        return None;
    }
    let first_entry_row = popup.y + 2;
    if y < first_entry_row {
        return None;
    }
    let pos = (y - first_entry_row) as usize;
    if pos < entries {
        Some(pos)
    } else {
        None
    }
}
