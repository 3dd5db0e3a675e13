use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::truncate;
use crate::analytics::{chart_heights, format_time};
use crate::dashboard::{DashboardView, RECENT_ACHIEVEMENTS};
use crate::models::{InsightKind, Metric, SubjectProgress, Timeframe};
use crate::tui::App;

const PROGRESS_BAR_WIDTH: usize = 20;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    if app.dashboard.loading {
        let loading = Paragraph::new("Loading...")
            .block(Block::default().borders(Borders::ALL).title(" Learning Analytics "));
        f.render_widget(loading, area);
        return;
    }

    let view = app.dashboard.view();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),  // Header + key metrics
            Constraint::Length(14), // Chart + subject progress
            Constraint::Length(12), // Insights
            Constraint::Min(0),     // Streaks + achievements
        ])
        .split(area);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[3]);

    draw_header(f, &view, chunks[0]);
    draw_weekly_chart(f, &view, middle[0]);
    draw_subjects(f, &view.subjects, middle[1]);
    draw_insights(f, &view, chunks[2]);
    draw_streaks(f, &view, bottom[0]);
    draw_achievements(f, bottom[1]);
}

fn selector_spans<T: Copy + PartialEq>(
    options: &[T],
    selected: T,
    label: impl Fn(T) -> &'static str,
) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for option in options {
        let style = if *option == selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} ", label(*option)), style));
        spans.push(Span::raw(" "));
    }
    spans
}

fn metric_span(label: &str, value: String, color: Color) -> Vec<Span<'static>> {
    vec![
        Span::styled(format!("{}: ", label), Style::default().fg(Color::Gray)),
        Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::raw("    "),
    ]
}

fn draw_header(f: &mut Frame, view: &DashboardView, area: Rect) {
    let mut metrics = Vec::new();
    metrics.extend(metric_span(
        "Total Study Time",
        format_time(view.stats.total_minutes),
        Color::Blue,
    ));
    metrics.extend(metric_span(
        "Average Score",
        format!("{}%", view.stats.average_score),
        Color::Green,
    ));
    metrics.extend(metric_span(
        "Day Streak",
        format!("{}", view.streaks.current),
        Color::Magenta,
    ));
    metrics.extend(metric_span(
        "Improvement",
        format!("+{}%", view.stats.improvement_rate),
        Color::LightRed,
    ));

    let text = vec![
        Line::from(Span::styled(
            "Track your progress and discover insights",
            Style::default().fg(Color::Gray),
        )),
        Line::from(selector_spans(&Timeframe::ALL, view.timeframe, |t| t.label())),
        Line::from(""),
        Line::from(metrics),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Learning Analytics ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    f.render_widget(Paragraph::new(text).block(block), area);
}

fn format_metric_value(metric: Metric, value: u32) -> String {
    match metric {
        Metric::Time => format_time(value as u64),
        Metric::Performance | Metric::Engagement => format!("{}%", value),
    }
}

fn draw_weekly_chart(f: &mut Frame, view: &DashboardView, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Line::from(
            [
                vec![Span::raw(" Weekly Performance ")],
                selector_spans(&Metric::ALL, view.metric, |m| m.label()),
            ]
            .concat(),
        ))
        .title_style(Style::default().fg(Color::Cyan));

    if view.weekly.is_empty() {
        let empty = Paragraph::new("No sessions to chart yet.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let heights = chart_heights(&view.weekly, view.metric);
    let bars: Vec<Bar> = view
        .weekly
        .iter()
        .zip(heights)
        .map(|(bucket, height)| {
            Bar::default()
                .value(height as u64)
                .text_value(format_metric_value(view.metric, bucket.value(view.metric)))
                .label(Line::from(bucket.day.clone()))
                .style(Style::default().fg(Color::Blue))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(7)
        .bar_gap(2)
        .max(100)
        .value_style(Style::default().fg(Color::White).bg(Color::Blue));

    f.render_widget(chart, area);
}

fn progress_bar(percent: u32) -> String {
    let filled = (percent.min(100) as usize * PROGRESS_BAR_WIDTH) / 100;
    format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(PROGRESS_BAR_WIDTH - filled)
    )
}

fn draw_subjects(f: &mut Frame, subjects: &[SubjectProgress], area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Subject Progress ")
        .title_style(Style::default().fg(Color::Green));

    let mut text = Vec::new();
    for subject in subjects {
        text.push(Line::from(vec![
            Span::styled(
                format!("{:<20}", truncate(&subject.subject, 18)),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("{}% • {} sessions", subject.progress, subject.sessions),
                Style::default().fg(Color::Gray),
            ),
        ]));
        text.push(Line::from(vec![
            Span::styled(progress_bar(subject.progress), Style::default().fg(Color::Green)),
            Span::styled(
                format!(
                    "  Avg Score: {}%  {}% remaining",
                    subject.avg_score,
                    subject.remaining()
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    if text.is_empty() {
        text.push(Line::from(Span::styled(
            "No subjects yet.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    f.render_widget(Paragraph::new(text).block(block), area);
}

fn insight_color(kind: InsightKind) -> Color {
    match kind {
        InsightKind::Strength => Color::Green,
        InsightKind::Improvement => Color::Yellow,
        InsightKind::Trend => Color::Blue,
        InsightKind::Recommendation => Color::Magenta,
    }
}

fn draw_insights(f: &mut Frame, view: &DashboardView, area: Rect) {
    let items: Vec<ListItem> = view
        .insights
        .iter()
        .map(|insight| {
            let color = insight_color(insight.kind);
            let mut spans = vec![
                Span::raw(format!("{} ", insight.icon)),
                Span::styled(
                    format!("{}: ", insight.title),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(insight.description.clone(), Style::default().fg(color)),
            ];
            if let Some(action) = &insight.actionable {
                spans.push(Span::styled(
                    format!("  -> {}", action),
                    Style::default().fg(Color::Gray),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" AI-Powered Insights ")
        .title_style(Style::default().fg(Color::Magenta));

    f.render_widget(List::new(items).block(block), area);
}

fn draw_streaks(f: &mut Frame, view: &DashboardView, area: Rect) {
    let streaks = &view.streaks;
    let row = |label: &'static str, value: u32, color: Color| {
        Line::from(vec![
            Span::styled(format!("{:<16}", label), Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}", value),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ])
    };

    let text = vec![
        row("Current Streak", streaks.current, Color::LightRed),
        row("Longest Streak", streaks.longest, Color::Magenta),
        row("This Week", streaks.this_week, Color::Blue),
        row("This Month", streaks.this_month, Color::Green),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Learning Streaks ")
        .title_style(Style::default().fg(Color::LightRed));

    f.render_widget(Paragraph::new(text).block(block), area);
}

fn draw_achievements(f: &mut Frame, area: Rect) {
    let text: Vec<Line> = RECENT_ACHIEVEMENTS
        .iter()
        .map(|a| {
            Line::from(vec![
                Span::raw(format!("{} ", a.icon)),
                Span::styled(
                    format!("{}: ", a.title),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(a.description, Style::default().fg(Color::Gray)),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Recent Achievements ")
        .title_style(Style::default().fg(Color::Yellow));

    f.render_widget(Paragraph::new(text).block(block).wrap(Wrap { trim: true }), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_empty_and_full() {
        assert_eq!(progress_bar(0), "░".repeat(PROGRESS_BAR_WIDTH));
        assert_eq!(progress_bar(100), "█".repeat(PROGRESS_BAR_WIDTH));
    }

    #[test]
    fn progress_bar_half() {
        let bar = progress_bar(50);
        assert_eq!(bar.chars().filter(|c| *c == '█').count(), 10);
    }

    #[test]
    fn metric_values_formatted_per_metric() {
        assert_eq!(format_metric_value(Metric::Time, 90), "1h 30m");
        assert_eq!(format_metric_value(Metric::Performance, 85), "85%");
        assert_eq!(format_metric_value(Metric::Engagement, 1), "1%");
    }
}
