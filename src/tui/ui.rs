use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use super::widgets::{companions, dashboard, home, journey};
use super::App;
use crate::nav::{Route, APP_TITLE};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Nav bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Help bar
        ])
        .split(f.area());

    draw_nav(f, app, chunks[0]);
    draw_content(f, app, chunks[1]);
    draw_help_bar(f, app, chunks[2]);
}

fn draw_nav(f: &mut Frame, app: &App, area: Rect) {
    let links = app.nav_links();
    let selected = links.iter().position(|l| l.active).unwrap_or(0);
    let titles: Vec<&str> = links.iter().map(|l| l.label).collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", APP_TITLE)),
        )
        .select(selected)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    f.render_widget(tabs, area);
}

fn draw_content(f: &mut Frame, app: &App, area: Rect) {
    match app.route {
        Route::Home => home::draw(f, app, area),
        Route::Companion => companions::draw(f, app, area),
        Route::MyJourney => journey::draw(f, app, area),
        Route::Dashboard if app.identity.is_signed_in() => dashboard::draw(f, app, area),
        Route::Dashboard => home::draw(f, app, area),
    }
}

fn key(k: &'static str) -> Span<'static> {
    Span::styled(k, Style::default().fg(Color::Cyan))
}

fn draw_help_bar(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![key("h/l"), Span::raw(" Views  ")];

    match app.route {
        Route::Companion | Route::MyJourney => {
            spans.extend(vec![
                key("j/k"),
                Span::raw(" Nav  "),
                key("g/G"),
                Span::raw(" Top/Bot  "),
            ]);
        }
        Route::Dashboard => {
            spans.extend(vec![
                key("t"),
                Span::raw(format!(" {}  ", app.dashboard.timeframe.label())),
                key("m"),
                Span::raw(format!(" {}  ", app.dashboard.metric.label())),
            ]);
        }
        Route::Home => {}
    }

    spans.extend(vec![
        key("^r"),
        Span::raw(" Refresh  "),
        key("q"),
        Span::raw(" Quit"),
    ]);

    let help = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));

    f.render_widget(help, area);
}
