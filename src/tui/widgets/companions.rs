use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::truncate;
use crate::analytics::format_time;
use crate::tui::App;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Companions ({}) ", app.companions.items.len()))
        .title_style(Style::default().fg(Color::Cyan));

    if !app.identity.is_signed_in() {
        let hint = Paragraph::new("Sign in to see your companions.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(hint, area);
        return;
    }

    let items: Vec<ListItem> = app
        .companions
        .items
        .iter()
        .map(|c| {
            let duration = c
                .duration
                .map(|d| format_time(d as u64))
                .unwrap_or_else(|| "-".to_string());

            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<5}", c.id),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("{:<24}", truncate(&c.name, 22)),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    format!("{:<16}", truncate(c.subject.as_deref().unwrap_or("-"), 14)),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(
                    format!("{:<28}", truncate(c.topic.as_deref().unwrap_or("-"), 26)),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(duration, Style::default().fg(Color::Yellow)),
            ]))
        })
        .collect();

    let header_style = Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::BOLD);
    let header = Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{:<5}", "ID"), header_style),
        Span::styled(format!("{:<24}", "Name"), header_style),
        Span::styled(format!("{:<16}", "Subject"), header_style),
        Span::styled(format!("{:<28}", "Topic"), header_style),
        Span::styled("Duration", header_style),
    ]);

    let inner = block.inner(area);
    f.render_widget(block, area);

    let list = List::new(items)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(app.companions.selected);

    let header_area = Rect {
        height: inner.height.min(1),
        ..inner
    };
    f.render_widget(Paragraph::new(header), header_area);

    let list_area = Rect {
        y: inner.y + header_area.height,
        height: inner.height.saturating_sub(header_area.height),
        ..inner
    };

    f.render_stateful_widget(list, list_area, &mut state);
}
