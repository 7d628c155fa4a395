//! Terminal UI rendering.

pub mod palette;
pub mod status_bar;
pub mod task_panel;
pub mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::app::App;
use crate::store::{ProjectLookup, TaskSource};

/// Main draw function for the entire UI.
pub fn draw<S, P>(frame: &mut Frame, app: &App<S, P>, signed_in: bool)
where
    S: TaskSource + 'static,
    P: ProjectLookup + 'static,
{
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    let palette_open = app.modal().is_shown();
    task_panel::render(frame, chunks[0], app, !palette_open);
    status_bar::render(frame, chunks[1], app, signed_in);

    if palette_open {
        palette::render(frame, chunks[0], app);
    }
}
