use chrono::DateTime;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::truncate;
use crate::tui::App;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Recent Sessions ")
        .title_style(Style::default().fg(Color::Magenta));

    if !app.identity.is_signed_in() {
        let hint = Paragraph::new("Sign in to track your learning journey.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(hint, area);
        return;
    }

    if app.journey.items.is_empty() {
        let hint = Paragraph::new("No sessions yet. Start one with `converso session record <companion-id>`.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(hint, area);
        return;
    }

    let items: Vec<ListItem> = app
        .journey
        .items
        .iter()
        .map(|s| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<10}", format_date(&s.created_at)),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("{:<24}", truncate(&s.companion_name, 22)),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    format!("{:<16}", truncate(s.subject.as_deref().unwrap_or("-"), 14)),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(
                    truncate(s.topic.as_deref().unwrap_or("-"), 30),
                    Style::default().fg(Color::Gray),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(app.journey.selected);

    f.render_stateful_widget(list, area, &mut state);
}

fn format_date(date_str: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        dt.format("%b %d").to_string()
    } else {
        date_str.chars().take(10).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_date_rfc3339() {
        assert_eq!(format_date("2026-03-02T09:30:00.000000Z"), "Mar 02");
    }

    #[test]
    fn format_date_falls_back_to_prefix() {
        assert_eq!(format_date("2026-03-02 09:30:00"), "2026-03-02");
    }
}
