//! Terminal UI layer for the park reviews analyzer.
//!
//! Provides themes, a generic table renderer, horizontal bar charts, and the
//! menu-driven application state machine built on top of [`ratatui`].

pub mod app;
pub mod chart_view;
pub mod table_view;
pub mod themes;

pub use review_core as core;
