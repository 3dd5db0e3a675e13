use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::nav::{APP_DESCRIPTION, APP_TITLE};
use crate::tui::App;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let mut text = vec![
        Line::from(Span::styled(
            APP_TITLE,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            APP_DESCRIPTION,
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
    ];

    match app.identity.user_id() {
        Some(user_id) => {
            let stats = &app.stats;
            text.extend(vec![
                Line::from(vec![
                    Span::styled("Signed in as ", Style::default().fg(Color::Gray)),
                    Span::styled(user_id.to_string(), Style::default().fg(Color::Cyan)),
                ]),
                Line::from(""),
                Line::from(vec![
                    Span::styled("Companions: ", Style::default().fg(Color::Gray)),
                    Span::styled(
                        format!("{}", stats.companions),
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    ),
                ]),
                Line::from(vec![
                    Span::styled("Subjects: ", Style::default().fg(Color::Gray)),
                    Span::styled(
                        format!("{}", stats.subjects),
                        Style::default().fg(Color::White),
                    ),
                ]),
                Line::from(vec![
                    Span::styled("Sessions: ", Style::default().fg(Color::Gray)),
                    Span::styled(
                        format!("{}", stats.sessions),
                        Style::default().fg(Color::Green),
                    ),
                ]),
            ]);
        }
        None => {
            text.push(Line::from(Span::styled(
                "Signed out. Pass --user or set CONVERSO_USER to see your analytics.",
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Home ")
        .title_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}
