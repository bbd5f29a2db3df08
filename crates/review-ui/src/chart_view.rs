//! Horizontal bar charts for the analyzer's chart views.
//!
//! A [`ChartSpec`] describes one chart: the review share per park, the
//! average rating per park, the top locations for a park, or the monthly
//! average series. Bars are drawn with block characters and scaled against
//! the largest value in the series; labels are aligned with their display
//! width so multi-byte location names line up.

use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::themes::Theme;

/// Character drawing the filled portion of a bar.
const FILLED_CHAR: char = '\u{2588}'; // █  FULL BLOCK
/// Character drawing the unfilled remainder of a bar.
const EMPTY_CHAR: char = '\u{2591}'; // ░  LIGHT SHADE

/// Widest a bar label may grow before truncation, in terminal cells.
const MAX_LABEL_WIDTH: usize = 24;
/// Bars never shrink below this many cells, however narrow the terminal.
const MIN_BAR_WIDTH: usize = 10;

/// One horizontal bar.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartBar {
    /// Left-hand label (park, location, or month).
    pub label: String,
    /// Bar length is proportional to this value.
    pub value: f64,
    /// Text rendered after the bar (count, percentage, or rating).
    pub caption: String,
}

/// View model for one chart screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    /// Block title.
    pub title: String,
    /// Value every bar is scaled against (the series maximum).
    pub max_value: f64,
    /// Bars in display order.
    pub bars: Vec<ChartBar>,
}

impl ChartSpec {
    /// Build a spec, deriving the scale from the largest bar value.
    pub fn new(title: impl Into<String>, bars: Vec<ChartBar>) -> Self {
        let max_value = bars.iter().map(|b| b.value).fold(0.0, f64::max);
        Self {
            title: title.into(),
            max_value,
            bars,
        }
    }
}

/// Render `spec` into `area`, starting at bar `scroll`.
pub fn render_chart(frame: &mut Frame, area: Rect, spec: &ChartSpec, scroll: usize, theme: &Theme) {
    let title = if scroll > 0 {
        format!(" {} (from entry {}) ", spec.title, scroll + 1)
    } else {
        format!(" {} ", spec.title)
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    if spec.bars.is_empty() {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled("No data to display", theme.warning)),
            Line::from(""),
            Line::from(Span::styled("Press Esc to go back", theme.dim)),
        ];
        frame.render_widget(Paragraph::new(Text::from(text)).block(block), area);
        return;
    }

    let label_width = spec
        .bars
        .iter()
        .map(|b| b.label.width())
        .max()
        .unwrap_or(0)
        .min(MAX_LABEL_WIDTH);
    let caption_width = spec.bars.iter().map(|b| b.caption.width()).max().unwrap_or(0);

    // Two border columns plus one space on each side of the bar.
    let bar_width = (area.width as usize)
        .saturating_sub(label_width + caption_width + 4)
        .max(MIN_BAR_WIDTH);

    let scroll = scroll.min(spec.bars.len().saturating_sub(1));
    let lines: Vec<Line> = spec.bars[scroll..]
        .iter()
        .map(|bar| bar_line(bar, spec.max_value, label_width, bar_width, theme))
        .collect();

    frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

/// Build the single display line for one bar.
fn bar_line<'a>(
    bar: &'a ChartBar,
    max_value: f64,
    label_width: usize,
    bar_width: usize,
    theme: &Theme,
) -> Line<'a> {
    let fraction = if max_value > 0.0 {
        (bar.value / max_value).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (fraction * bar_width as f64).round() as usize;

    // Bars closest to the maximum get the strongest colour.
    let tone = if fraction >= 0.8 {
        theme.bar_high
    } else if fraction >= 0.4 {
        theme.bar_medium
    } else {
        theme.bar_low
    };

    Line::from(vec![
        Span::styled(fit_label(&bar.label, label_width), theme.label),
        Span::raw(" "),
        Span::styled(FILLED_CHAR.to_string().repeat(filled), tone),
        Span::styled(
            EMPTY_CHAR.to_string().repeat(bar_width - filled),
            theme.bar_empty,
        ),
        Span::raw(" "),
        Span::styled(bar.caption.as_str(), theme.value),
    ])
}

/// Pad `label` to exactly `width` display cells, truncating with an
/// ellipsis when it is too wide.
fn fit_label(label: &str, width: usize) -> String {
    if label.width() <= width {
        let padding = width - label.width();
        return format!("{}{}", label, " ".repeat(padding));
    }

    let mut truncated = String::new();
    for c in label.chars() {
        let next_width = truncated.width() + c.to_string().width() + 1; // +1 for the ellipsis
        if next_width > width {
            break;
        }
        truncated.push(c);
    }
    truncated.push('\u{2026}'); // …
    let padding = width.saturating_sub(truncated.width());
    format!("{}{}", truncated, " ".repeat(padding))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
