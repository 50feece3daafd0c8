//! Terminal front end for the wizard.
//!
//! [`run_tui`] owns the terminal; [`draw`] renders the screen for the current
//! step and [`handle_events`] maps keys to [`App`](crate::App) actions.

mod app;
mod input;
mod theme;
mod ui;

pub use app::run_tui;
pub use input::handle_events;
pub use theme::Theme;
pub use ui::draw;
