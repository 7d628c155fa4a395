//! Status bar rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::app::App;
use crate::store::{ProjectLookup, TaskSource};

/// Render the status bar at the bottom of the screen.
pub fn render<S, P>(frame: &mut Frame, area: Rect, app: &App<S, P>, signed_in: bool)
where
    S: TaskSource + 'static,
    P: ProjectLookup + 'static,
{
    let help_text = if app.modal().is_shown() {
        "Enter: run | ↑↓: select | Esc: close"
    } else {
        "Ctrl+K: search | ↑↓/jk: navigate | Enter: complete | d: remove | r: reload | q: quit"
    };

    let (dot_color, session) = if signed_in {
        (theme::SUCCESS, "Signed in")
    } else {
        (theme::WARNING, "Signed out")
    };

    let mut spans = vec![
        Span::styled("dida", theme::bold()),
        Span::raw(" | "),
        Span::styled("●", theme::normal().fg(dot_color)),
        Span::raw(format!(" {session} | {}", app.route)),
        Span::raw(" | "),
    ];
    if let Some(message) = &app.status_message {
        spans.push(Span::styled(message.as_str(), theme::normal().fg(theme::ERROR)));
        spans.push(Span::raw(" | "));
    }
    spans.push(Span::styled(help_text, theme::dimmed()));

    let paragraph = Paragraph::new(Line::from(spans)).style(theme::status_bar_bg());
    frame.render_widget(paragraph, area);
}
