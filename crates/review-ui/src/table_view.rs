//! Generic bordered table renderer for the analyzer's data views.
//!
//! Every table screen (review lists, counts, averages) is described by a
//! [`TableSpec`] view model and rendered with one function: header row,
//! zebra-striped data rows, an optional highlighted totals row, and a scroll
//! window for datasets taller than the terminal.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::themes::Theme;

/// Widest a single column may grow, in terminal cells.
const MAX_COLUMN_WIDTH: usize = 40;

/// View model for one table screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    /// Block title.
    pub title: String,
    /// Column headers.
    pub headers: Vec<String>,
    /// Data rows; each row has one cell per header.
    pub rows: Vec<Vec<String>>,
    /// Optional totals row rendered highlighted after the data rows.
    pub totals: Option<Vec<String>>,
}

/// Render `spec` into `area`, starting at data row `scroll`.
pub fn render_table(frame: &mut Frame, area: Rect, spec: &TableSpec, scroll: usize, theme: &Theme) {
    if spec.rows.is_empty() {
        render_no_rows(frame, area, &spec.title, theme);
        return;
    }

    let header_cells = spec
        .headers
        .iter()
        .map(|h| Cell::from(h.as_str()).style(theme.table_header));
    let header = Row::new(header_cells).height(1);

    let scroll = scroll.min(spec.rows.len().saturating_sub(1));
    let data_rows: Vec<Row> = spec.rows[scroll..]
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let style = if (scroll + i) % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(row.iter().map(|cell| Cell::from(cell.as_str()))).style(style)
        })
        .collect();

    let mut all_rows = data_rows;
    if let Some(totals) = &spec.totals {
        all_rows.push(
            Row::new(totals.iter().map(|cell| Cell::from(cell.as_str())))
                .style(theme.table_total),
        );
    }

    let widths: Vec<Constraint> = column_widths(spec)
        .into_iter()
        .map(|w| Constraint::Length(w as u16))
        .collect();

    let title = if scroll > 0 {
        format!(" {} (from row {}) ", spec.title, scroll + 1)
    } else {
        format!(" {} ", spec.title)
    };

    let table = Table::new(all_rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Placeholder shown when a spec has no data rows at all.
fn render_no_rows(frame: &mut Frame, area: Rect, title: &str, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No data to display", theme.warning)),
        Line::from(""),
        Line::from(Span::styled("Press Esc to go back", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(ratatui::text::Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", title)),
        ),
        area,
    );
}

/// Width of each column: the widest cell in it (header included), clamped.
fn column_widths(spec: &TableSpec) -> Vec<usize> {
    let mut widths: Vec<usize> = spec.headers.iter().map(|h| h.width()).collect();

    let all_rows = spec.rows.iter().chain(spec.totals.iter());
    for row in all_rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.width());
            }
        }
    }

    widths.into_iter().map(|w| w.min(MAX_COLUMN_WIDTH)).collect()
}

// ── Tests ──────────────────────────────────────────────────────────────────────
