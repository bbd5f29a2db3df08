use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`.  Background values
/// 0–6 are considered dark; 7–15 are considered light.  If the variable is
/// absent or unparseable, `BackgroundType::Dark` is returned as the safe
/// default.
pub fn detect_background() -> BackgroundType {
    if let Ok(val) = std::env::var("COLORFGBG") {
        if let Some(bg) = val.split(';').next_back() {
            if let Ok(bg_num) = bg.parse::<u8>() {
                return if bg_num <= 6 {
                    BackgroundType::Dark
                } else {
                    BackgroundType::Light
                };
            }
        }
    }
    BackgroundType::Dark
}

/// Complete theme definition carrying all UI styles used by the review-ui
/// components.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Text ─────────────────────────────────────────────────────────────────
    pub header: Style,
    pub text: Style,
    pub dim: Style,
    pub label: Style,
    pub value: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub success: Style,
    pub warning: Style,
    pub error: Style,

    // ── Menus ────────────────────────────────────────────────────────────────
    /// Highlight for the key a menu entry is bound to.
    pub menu_key: Style,

    // ── Bar charts ───────────────────────────────────────────────────────────
    /// Filled portion of a bar below 40 % of the chart maximum.
    pub bar_low: Style,
    /// Filled portion of a bar between 40 % and 80 % of the maximum.
    pub bar_medium: Style,
    /// Filled portion of a bar at or above 80 % of the maximum.
    pub bar_high: Style,
    /// Unfilled remainder of a bar.
    pub bar_empty: Style,

    // ── Tables ───────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_row: Style,
    pub table_row_alt: Style,
    pub table_total: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            menu_key: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),

            bar_low: Style::default().fg(Color::Blue),
            bar_medium: Style::default().fg(Color::Cyan),
            bar_high: Style::default().fg(Color::Green),
            bar_empty: Style::default().fg(Color::DarkGray),

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Light-background terminal theme.
    ///
    /// Uses dark colours for text so that content remains legible against a
    /// white/light-grey terminal canvas.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Magenta),
            error: Style::default().fg(Color::Red),

            menu_key: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),

            bar_low: Style::default().fg(Color::Blue),
            bar_medium: Style::default().fg(Color::Magenta),
            bar_high: Style::default().fg(Color::Green),
            bar_empty: Style::default().fg(Color::Gray),

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),
            table_total: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Resolve a theme by its settings name.
    ///
    /// `"auto"` (and any unknown name) falls back to background detection.
    pub fn from_name(name: &str) -> Self {
        match name {
            "dark" => Self::dark(),
            "light" => Self::light(),
            _ => match detect_background() {
                BackgroundType::Light => Self::light(),
                _ => Self::dark(),
            },
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_dark() {
        let theme = Theme::dark();
        assert_eq!(theme.text.fg, Some(Color::White));
        let named = Theme::from_name("dark");
        assert_eq!(named.text.fg, theme.text.fg);
    }

    #[test]
    fn test_from_name_light() {
        let theme = Theme::from_name("light");
        assert_eq!(theme.text.fg, Some(Color::Black));
    }

    #[test]
    fn test_from_name_unknown_does_not_panic() {
        // Unknown names fall back to detection; either palette is fine.
        let _ = Theme::from_name("neon");
    }

    #[test]
    fn test_detect_background_returns_value() {
        // The environment is not controlled here; just assert it resolves.
        let bg = detect_background();
        assert!(matches!(
            bg,
            BackgroundType::Dark | BackgroundType::Light | BackgroundType::Unknown
        ));
    }
}
