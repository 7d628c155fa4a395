//! Task list rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

use dida_proto::task::TaskStatus;

use super::theme;
use crate::app::App;

/// Render the task list with the selected row highlighted.
pub fn render<S, P>(frame: &mut Frame, area: Rect, app: &App<S, P>, focused: bool) {
    let items: Vec<ListItem> = app
        .tasks
        .iter()
        .enumerate()
        .map(|(idx, task)| {
            let done = task.status == TaskStatus::Completed;
            let checkbox = if done { "[✓]" } else { "[ ]" };
            let text_style = if done { theme::done() } else { theme::normal() };

            let mut spans = vec![
                Span::styled(checkbox, text_style),
                Span::raw(" "),
                Span::styled(task.title.as_str(), text_style),
            ];
            if !task.content.is_empty() {
                spans.push(Span::styled(
                    format!("  {}", task.content.chars().take(30).collect::<String>()),
                    theme::dimmed(),
                ));
            }

            let item = ListItem::new(Line::from(spans));
            if focused && idx == app.selected_task {
                item.style(theme::selected())
            } else {
                item
            }
        })
        .collect();

    let block = Block::default()
        .title(Span::styled("Tasks", theme::panel_title(theme::TASKS_TITLE)))
        .borders(Borders::ALL)
        .border_style(if focused {
            theme::highlighted()
        } else {
            theme::normal()
        });

    frame.render_widget(List::new(items).block(block), area);
}
