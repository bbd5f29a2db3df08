//! Menu-driven application loop for the park reviews analyzer.
//!
//! The interactive session is an explicit finite-state machine over
//! [`Screen`] values: menu pages lead to park selection, table, chart and
//! message screens, and every key press is a state transition. `q` and
//! `Ctrl+C` are the normal "exit" transition from any screen; keys outside
//! the valid choice set leave the state unchanged (the menu re-prompts
//! instead of crashing).

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use review_core::error::Result;
use review_core::formatting::{format_average, format_count, percentage};
use review_data::aggregator::ReviewAggregator;
use review_data::loader::Dataset;
use review_data::summary::park_summaries;
use review_export::ExportFormat;

use crate::chart_view::{self, ChartBar, ChartSpec};
use crate::table_view::{self, TableSpec};
use crate::themes::Theme;

/// How many locations the top-locations chart shows.
const TOP_LOCATIONS: usize = 10;

// ── Screens ───────────────────────────────────────────────────────────────────

/// Menu pages of the interactive session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuPage {
    Main,
    View,
    Charts,
    Export,
}

/// Operations that need a park chosen first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParkAction {
    ListReviews,
    TopLocations,
    MonthlyAverage,
}

/// The current state of the menu loop.
#[derive(Debug, Clone)]
pub enum Screen {
    /// One of the menu pages.
    Menu(MenuPage),
    /// Park selection before running `action`.
    ParkSelect { action: ParkAction, back: MenuPage },
    /// A rendered data table.
    Table {
        spec: TableSpec,
        scroll: usize,
        back: MenuPage,
    },
    /// A rendered bar chart.
    Chart {
        spec: ChartSpec,
        scroll: usize,
        back: MenuPage,
    },
    /// A transient message (export confirmation, recoverable error).
    Message {
        text: String,
        is_error: bool,
        back: MenuPage,
    },
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the interactive session.
pub struct App {
    /// Active colour theme.
    pub theme: Theme,
    /// The immutable review collection loaded once at startup.
    dataset: Dataset,
    /// Sorted distinct park names driving the selection screen.
    parks: Vec<String>,
    /// Directory export files are written into.
    export_dir: PathBuf,
    /// Current state of the menu state machine.
    screen: Screen,
    /// Set to `true` to break out of the event loop on the next iteration.
    should_quit: bool,
}

impl App {
    /// Construct the application over a loaded dataset.
    pub fn new(theme_name: &str, dataset: Dataset, export_dir: PathBuf) -> Self {
        let parks = dataset.parks();
        Self {
            theme: Theme::from_name(theme_name),
            dataset,
            parks,
            export_dir,
            screen: Screen::Menu(MenuPage::Main),
            should_quit: false,
        }
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the interactive TUI until the user exits.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout so redraws stay
    /// responsive; the terminal is restored unconditionally on the way out.
    pub fn run(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            terminal.draw(|frame| self.render(frame))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    // ── Key handling ──────────────────────────────────────────────────────────

    /// Apply one key press to the state machine.
    fn handle_key(&mut self, key: KeyEvent) {
        // Exit transitions are valid from every screen; the interrupt is an
        // ordinary transition, not an exception.
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
                return;
            }
            _ => {}
        }

        if matches!(
            key.code,
            KeyCode::Up | KeyCode::Down | KeyCode::PageUp | KeyCode::PageDown
        ) {
            self.handle_scroll(key.code);
            return;
        }

        if let Some(next) = self.next_screen(key.code) {
            self.screen = next;
        }
    }

    /// Scroll keys mutate the current screen in place.
    fn handle_scroll(&mut self, code: KeyCode) {
        let (scroll, len) = match &mut self.screen {
            Screen::Table { spec, scroll, .. } => (scroll, spec.rows.len()),
            Screen::Chart { spec, scroll, .. } => (scroll, spec.bars.len()),
            _ => return,
        };
        match code {
            KeyCode::Down => {
                if *scroll + 1 < len {
                    *scroll += 1;
                }
            }
            KeyCode::Up => *scroll = scroll.saturating_sub(1),
            KeyCode::PageDown => *scroll = (*scroll + 10).min(len.saturating_sub(1)),
            KeyCode::PageUp => *scroll = scroll.saturating_sub(10),
            _ => {}
        }
    }

    /// Compute the transition for `code`, or `None` to stay on the current
    /// screen.
    fn next_screen(&self, code: KeyCode) -> Option<Screen> {
        match &self.screen {
            Screen::Menu(page) => self.menu_transition(*page, code),
            Screen::ParkSelect { action, back } => {
                self.park_select_transition(*action, *back, code)
            }
            Screen::Table { back, .. } | Screen::Chart { back, .. } => {
                matches!(code, KeyCode::Esc).then(|| Screen::Menu(*back))
            }
            // Any key dismisses a message.
            Screen::Message { back, .. } => Some(Screen::Menu(*back)),
        }
    }

    fn menu_transition(&self, page: MenuPage, code: KeyCode) -> Option<Screen> {
        match page {
            MenuPage::Main => match code {
                KeyCode::Char('1') => Some(Screen::Menu(MenuPage::View)),
                KeyCode::Char('2') => Some(Screen::Menu(MenuPage::Charts)),
                KeyCode::Char('3') => Some(Screen::Menu(MenuPage::Export)),
                _ => None,
            },
            MenuPage::View => match code {
                KeyCode::Char('1') => Some(Screen::ParkSelect {
                    action: ParkAction::ListReviews,
                    back: MenuPage::View,
                }),
                KeyCode::Char('2') => Some(self.count_by_park_screen()),
                KeyCode::Char('3') => Some(self.count_by_park_location_screen()),
                KeyCode::Char('4') => Some(self.average_by_park_screen()),
                KeyCode::Char('5') => Some(self.average_by_park_location_screen()),
                KeyCode::Esc => Some(Screen::Menu(MenuPage::Main)),
                _ => None,
            },
            MenuPage::Charts => match code {
                KeyCode::Char('1') => Some(self.park_share_chart_screen()),
                KeyCode::Char('2') => Some(self.average_chart_screen()),
                KeyCode::Char('3') => Some(Screen::ParkSelect {
                    action: ParkAction::TopLocations,
                    back: MenuPage::Charts,
                }),
                KeyCode::Char('4') => Some(Screen::ParkSelect {
                    action: ParkAction::MonthlyAverage,
                    back: MenuPage::Charts,
                }),
                KeyCode::Esc => Some(Screen::Menu(MenuPage::Main)),
                _ => None,
            },
            MenuPage::Export => match code {
                KeyCode::Char('1') => Some(self.export_screen(ExportFormat::Txt)),
                KeyCode::Char('2') => Some(self.export_screen(ExportFormat::Csv)),
                KeyCode::Char('3') => Some(self.export_screen(ExportFormat::Json)),
                KeyCode::Esc => Some(Screen::Menu(MenuPage::Main)),
                _ => None,
            },
        }
    }

    fn park_select_transition(
        &self,
        action: ParkAction,
        back: MenuPage,
        code: KeyCode,
    ) -> Option<Screen> {
        match code {
            KeyCode::Esc => Some(Screen::Menu(back)),
            KeyCode::Char(c) => {
                let digit = c.to_digit(10)? as usize;
                if digit == 0 {
                    return None;
                }
                let park = self.parks.get(digit - 1)?.clone();
                Some(self.run_park_action(action, &park, back))
            }
            _ => None,
        }
    }

    /// Run a park-scoped engine operation, turning recoverable errors into
    /// message screens.
    fn run_park_action(&self, action: ParkAction, park: &str, back: MenuPage) -> Screen {
        let built = match action {
            ParkAction::ListReviews => self.reviews_table_screen(park, back),
            ParkAction::TopLocations => self.top_locations_chart_screen(park, back),
            ParkAction::MonthlyAverage => self.monthly_chart_screen(park, back),
        };
        built.unwrap_or_else(|err| Screen::Message {
            text: err.to_string(),
            is_error: true,
            back,
        })
    }

    // ── Screen builders ───────────────────────────────────────────────────────

    fn count_by_park_screen(&self) -> Screen {
        let counts = ReviewAggregator::count_by_park(&self.dataset.records);
        let total: u64 = counts.values().sum();
        let rows = counts
            .into_iter()
            .map(|(park, count)| vec![park, format_count(count)])
            .collect();
        Screen::Table {
            spec: TableSpec {
                title: "Reviews per park".to_string(),
                headers: vec!["Park".to_string(), "Reviews".to_string()],
                rows,
                totals: Some(vec!["TOTAL".to_string(), format_count(total)]),
            },
            scroll: 0,
            back: MenuPage::View,
        }
    }

    fn count_by_park_location_screen(&self) -> Screen {
        let counts = ReviewAggregator::count_by_park_location(&self.dataset.records);
        let rows = counts
            .into_iter()
            .flat_map(|(park, locations)| {
                locations.into_iter().map(move |(location, count)| {
                    vec![park.clone(), location_label(&location), format_count(count)]
                })
            })
            .collect();
        Screen::Table {
            spec: TableSpec {
                title: "Reviews per park and location".to_string(),
                headers: vec![
                    "Park".to_string(),
                    "Location".to_string(),
                    "Reviews".to_string(),
                ],
                rows,
                totals: None,
            },
            scroll: 0,
            back: MenuPage::View,
        }
    }

    fn average_by_park_screen(&self) -> Screen {
        let averages = ReviewAggregator::average_by_park(&self.dataset.records);
        let rows = averages
            .into_iter()
            .map(|(park, avg)| vec![park, format_average(avg)])
            .collect();
        Screen::Table {
            spec: TableSpec {
                title: "Average rating per park".to_string(),
                headers: vec!["Park".to_string(), "Average".to_string()],
                rows,
                totals: None,
            },
            scroll: 0,
            back: MenuPage::View,
        }
    }

    fn average_by_park_location_screen(&self) -> Screen {
        let averages = ReviewAggregator::average_by_park_location(&self.dataset.records);
        let rows = averages
            .into_iter()
            .flat_map(|(park, locations)| {
                locations.into_iter().map(move |(location, avg)| {
                    vec![park.clone(), location_label(&location), format_average(avg)]
                })
            })
            .collect();
        Screen::Table {
            spec: TableSpec {
                title: "Average rating per park and location".to_string(),
                headers: vec![
                    "Park".to_string(),
                    "Location".to_string(),
                    "Average".to_string(),
                ],
                rows,
                totals: None,
            },
            scroll: 0,
            back: MenuPage::View,
        }
    }

    fn reviews_table_screen(&self, park: &str, back: MenuPage) -> Result<Screen> {
        let reviews = ReviewAggregator::reviews_for_park(&self.dataset.records, park)?;
        let count = reviews.len() as u64;
        let rows = reviews
            .into_iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.rating
                        .map(|v| v.to_string())
                        .unwrap_or_else(|| "n/a".to_string()),
                    r.year_month
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "unknown".to_string()),
                    location_label(&r.location),
                ]
            })
            .collect();
        Ok(Screen::Table {
            spec: TableSpec {
                title: format!("Reviews for {}", park),
                headers: vec![
                    "Id".to_string(),
                    "Rating".to_string(),
                    "Month".to_string(),
                    "Location".to_string(),
                ],
                rows,
                totals: Some(vec![
                    "TOTAL".to_string(),
                    String::new(),
                    String::new(),
                    format!("{} review(s)", format_count(count)),
                ]),
            },
            scroll: 0,
            back,
        })
    }

    fn park_share_chart_screen(&self) -> Screen {
        let counts = ReviewAggregator::count_by_park(&self.dataset.records);
        let total: u64 = counts.values().sum();
        let bars = counts
            .into_iter()
            .map(|(park, count)| ChartBar {
                label: park,
                value: count as f64,
                caption: format!(
                    "{} ({:.1}%)",
                    format_count(count),
                    percentage(count as f64, total as f64)
                ),
            })
            .collect();
        Screen::Chart {
            spec: ChartSpec::new("Review share per park", bars),
            scroll: 0,
            back: MenuPage::Charts,
        }
    }

    fn average_chart_screen(&self) -> Screen {
        let averages = ReviewAggregator::average_by_park(&self.dataset.records);
        let bars = averages
            .into_iter()
            .map(|(park, avg)| ChartBar {
                label: park,
                value: avg.unwrap_or(0.0),
                caption: format_average(avg),
            })
            .collect();
        Screen::Chart {
            spec: ChartSpec::new("Average rating per park", bars),
            scroll: 0,
            back: MenuPage::Charts,
        }
    }

    fn top_locations_chart_screen(&self, park: &str, back: MenuPage) -> Result<Screen> {
        let top = ReviewAggregator::top_locations(&self.dataset.records, park, TOP_LOCATIONS)?;
        let bars = top
            .into_iter()
            .map(|(location, count)| ChartBar {
                label: location_label(&location),
                value: count as f64,
                caption: format_count(count),
            })
            .collect();
        Ok(Screen::Chart {
            spec: ChartSpec::new(format!("Top {} locations for {}", TOP_LOCATIONS, park), bars),
            scroll: 0,
            back,
        })
    }

    fn monthly_chart_screen(&self, park: &str, back: MenuPage) -> Result<Screen> {
        let monthly = ReviewAggregator::monthly_average(&self.dataset.records, park)?;
        let bars = monthly
            .into_iter()
            .map(|(month, avg)| ChartBar {
                label: month.to_string(),
                value: avg,
                caption: format!("{:.2}", avg),
            })
            .collect();
        Ok(Screen::Chart {
            spec: ChartSpec::new(format!("Monthly average for {}", park), bars),
            scroll: 0,
            back,
        })
    }

    fn export_screen(&self, format: ExportFormat) -> Screen {
        let summaries = park_summaries(&self.dataset.records);
        match format.export(&summaries, &self.export_dir) {
            Ok(path) => Screen::Message {
                text: format!("Summary saved to {}", path.display()),
                is_error: false,
                back: MenuPage::Export,
            },
            Err(err) => Screen::Message {
                text: format!("Export failed: {}", err),
                is_error: true,
                back: MenuPage::Export,
            },
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the current screen into `frame`.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        match &self.screen {
            Screen::Menu(page) => self.render_menu(frame, area, *page),
            Screen::ParkSelect { .. } => self.render_park_select(frame, area),
            Screen::Table { spec, scroll, .. } => {
                table_view::render_table(frame, area, spec, *scroll, &self.theme)
            }
            Screen::Chart { spec, scroll, .. } => {
                chart_view::render_chart(frame, area, spec, *scroll, &self.theme)
            }
            Screen::Message { text, is_error, .. } => {
                self.render_message(frame, area, text, *is_error)
            }
        }
    }

    fn render_menu(&self, frame: &mut Frame, area: Rect, page: MenuPage) {
        let (title, entries) = menu_entries(page);

        let mut lines = vec![
            Line::from(Span::styled(title, self.theme.header)),
            Line::from(""),
        ];
        for (key, label) in entries {
            lines.push(Line::from(vec![
                Span::styled(format!("[{}] ", key), self.theme.menu_key),
                Span::styled(*label, self.theme.text),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("{} reviews loaded", format_count(self.dataset.records.len() as u64)),
            self.theme.dim,
        )));

        frame.render_widget(
            Paragraph::new(Text::from(lines)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Park Reviews "),
            ),
            area,
        );
    }

    fn render_park_select(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![
            Line::from(Span::styled("Choose a park", self.theme.header)),
            Line::from(""),
        ];
        // Digits 1-9; real datasets have a handful of parks.
        for (i, park) in self.parks.iter().take(9).enumerate() {
            lines.push(Line::from(vec![
                Span::styled(format!("[{}] ", i + 1), self.theme.menu_key),
                Span::styled(park.as_str(), self.theme.text),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Esc: back",
            self.theme.dim,
        )));

        frame.render_widget(
            Paragraph::new(Text::from(lines)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Park Reviews "),
            ),
            area,
        );
    }

    fn render_message(&self, frame: &mut Frame, area: Rect, text: &str, is_error: bool) {
        let style = if is_error {
            self.theme.error
        } else {
            self.theme.success
        };
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(text, style)),
            Line::from(""),
            Line::from(Span::styled(
                "Press any key to return",
                self.theme.dim,
            )),
        ];
        frame.render_widget(
            Paragraph::new(Text::from(lines)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Park Reviews "),
            ),
            area,
        );
    }
}

/// Display label for a reviewer location, making the empty bucket visible.
fn location_label(location: &str) -> String {
    if location.is_empty() {
        "(unknown)".to_string()
    } else {
        location.to_string()
    }
}

/// Title and key bindings for each menu page.
fn menu_entries(page: MenuPage) -> (&'static str, &'static [(&'static str, &'static str)]) {
    match page {
        MenuPage::Main => (
            "Park Reviews Analyzer",
            &[
                ("1", "View data"),
                ("2", "Charts"),
                ("3", "Export summary"),
                ("q", "Quit"),
            ],
        ),
        MenuPage::View => (
            "Data views",
            &[
                ("1", "List reviews for a park"),
                ("2", "Reviews per park"),
                ("3", "Reviews per park and location"),
                ("4", "Average rating per park"),
                ("5", "Average rating per park and location"),
                ("Esc", "Back"),
            ],
        ),
        MenuPage::Charts => (
            "Charts",
            &[
                ("1", "Review share per park"),
                ("2", "Average rating per park"),
                ("3", "Top 10 locations for a park"),
                ("4", "Monthly average for a park"),
                ("Esc", "Back"),
            ],
        ),
        MenuPage::Export => (
            "Export summary",
            &[("1", "TXT"), ("2", "CSV"), ("3", "JSON"), ("Esc", "Back")],
        ),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
