//! Command palette popup: input line, loading marker and results.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use super::theme;
use crate::app::{App, PaletteEntry};
use crate::store::{ProjectLookup, TaskSource};

/// Render the palette centred over `area`.
pub fn render<S, P>(frame: &mut Frame, area: Rect, app: &App<S, P>)
where
    S: TaskSource + 'static,
    P: ProjectLookup + 'static,
{
    let popup = centered(area, 60, 50);
    frame.render_widget(Clear, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(popup);

    let state = app.search_state();
    let marker = if state.loading {
        Span::styled("… ", theme::normal().fg(theme::WARNING))
    } else {
        Span::styled("🔍 ", theme::dimmed())
    };
    let input = Paragraph::new(Line::from(vec![marker, Span::raw(app.input.as_str())])).block(
        Block::default()
            .title(Span::styled(
                "Search (> for commands)",
                theme::panel_title(theme::PALETTE_TITLE),
            ))
            .borders(Borders::ALL)
            .border_style(theme::highlighted()),
    );
    frame.render_widget(input, chunks[0]);

    let entries = app.palette_entries();
    let items: Vec<ListItem> = if let Some(error) = &state.last_error {
        vec![ListItem::new(Span::styled(
            error.as_str(),
            theme::normal().fg(theme::ERROR),
        ))]
    } else if state.searching && entries.is_empty() {
        vec![ListItem::new(Span::styled("没有找到相关内容", theme::dimmed()))]
    } else {
        entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| {
                let line = match entry {
                    PaletteEntry::Command(name) => Line::from(Span::raw(name.as_str())),
                    PaletteEntry::Task(task) => {
                        let style = if task.done { theme::done() } else { theme::normal() };
                        let from = task.from.as_ref().map_or("", |f| f.name.as_str());
                        Line::from(vec![
                            Span::styled(task.title.as_str(), style),
                            Span::styled(format!("  {from}"), theme::dimmed()),
                        ])
                    }
                };
                let item = ListItem::new(line);
                if idx == app.selected_entry.min(entries.len().saturating_sub(1)) {
                    item.style(theme::selected())
                } else {
                    item
                }
            })
            .collect()
    };

    let list = List::new(items).block(Block::default().borders(Borders::ALL));
    frame.render_widget(list, chunks[1]);
}

fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
