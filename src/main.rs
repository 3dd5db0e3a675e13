mod analytics;
mod config;
mod dashboard;
mod db;
mod error;
mod identity;
mod insights;
mod models;
mod nav;
mod source;
mod tui;

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use analytics::format_time;
use config::Config;
use dashboard::{Dashboard, RECENT_ACHIEVEMENTS};
use db::Database;
use error::{Error, Result};
use models::{JsonOutput, Metric, Timeframe};
use nav::{nav_items, Route};

#[derive(Parser)]
#[command(name = "converso")]
#[command(about = "Learning analytics for your Converso AI companions")]
#[command(version)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Act as this user (overrides CONVERSO_USER)
    #[arg(long, short, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Manage your AI companions
    #[command(subcommand)]
    Companion(CompanionCommands),

    /// Record and list study sessions
    #[command(subcommand)]
    Session(SessionCommands),

    /// Show the learning analytics dashboard
    Dashboard {
        /// Timeframe: week/month/year
        #[arg(long, short, default_value = "week")]
        timeframe: String,

        /// Charted metric: time/performance/engagement
        #[arg(long, short, default_value = "time")]
        metric: String,
    },

    /// Show the navigation links for a route
    Nav {
        /// Current path, e.g. /my-journey
        #[arg(long, short, default_value = "/")]
        path: String,
    },

    /// Launch interactive terminal UI
    Tui,
}

#[derive(Subcommand)]
enum CompanionCommands {
    /// List your companions
    List,

    /// Create a companion
    Add {
        /// Companion name
        name: String,

        /// Subject, e.g. maths or science
        #[arg(long, short)]
        subject: Option<String>,

        /// Topic the companion teaches
        #[arg(long, short)]
        topic: Option<String>,

        /// Session length in minutes
        #[arg(long, short)]
        duration: Option<u32>,
    },

    /// Delete one of your companions
    Delete {
        /// Companion ID
        id: i64,
    },
}

#[derive(Subcommand)]
enum SessionCommands {
    /// Record a session with a companion
    Record {
        /// Companion ID
        companion_id: i64,
    },

    /// List your recent sessions
    List {
        /// Maximum number of sessions to show
        #[arg(long, short, default_value_t = 10)]
        limit: usize,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let json = cli.json;
    if let Err(e) = run(cli) {
        if json {
            if let Ok(out) = serde_json::to_string(&JsonOutput::<()>::err(e.to_string())) {
                println!("{}", out);
            }
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

fn print_json<T: serde::Serialize>(data: T) -> Result<()> {
    println!("{}", serde_json::to_string(&JsonOutput::ok(data))?);
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.user.clone());
    let db = Database::open(&config.db_path)?;
    let identity = config.identity;

    match cli.command {
        Commands::Init => {
            db.init()?;
            if cli.json {
                print_json(())?;
            } else {
                println!("Database initialized at: {}", config.db_path.display());
            }
        }

        Commands::Companion(companion_cmd) => {
            let user_id = identity.require_user()?;
            match companion_cmd {
                CompanionCommands::List => {
                    let companions = db.list_companions(user_id)?;
                    if cli.json {
                        print_json(&companions)?;
                    } else if companions.is_empty() {
                        println!("No companions found.");
                    } else {
                        println!(
                            "{:<5} {:<24} {:<16} {:<24} DURATION",
                            "ID", "NAME", "SUBJECT", "TOPIC"
                        );
                        println!("{}", "-".repeat(80));
                        for c in companions {
                            println!(
                                "{:<5} {:<24} {:<16} {:<24} {}",
                                c.id,
                                truncate(&c.name, 22),
                                truncate(c.subject.as_deref().unwrap_or("-"), 14),
                                truncate(c.topic.as_deref().unwrap_or("-"), 22),
                                c.duration
                                    .map(|d| format_time(d as u64))
                                    .unwrap_or_else(|| "-".to_string())
                            );
                        }
                    }
                }

                CompanionCommands::Add {
                    name,
                    subject,
                    topic,
                    duration,
                } => {
                    let id = db.add_companion(
                        user_id,
                        &name,
                        subject.as_deref(),
                        topic.as_deref(),
                        duration,
                    )?;
                    tracing::info!(id, user_id, "companion created");

                    if cli.json {
                        print_json(serde_json::json!({ "id": id, "name": name }))?;
                    } else {
                        println!("Added companion '{}' with ID: {}", name, id);
                    }
                }

                CompanionCommands::Delete { id } => {
                    if !db.delete_companion(user_id, id)? {
                        return Err(Error::CompanionNotFound(id));
                    }
                    if cli.json {
                        print_json(())?;
                    } else {
                        println!("Companion {} deleted.", id);
                    }
                }
            }
        }

        Commands::Session(session_cmd) => {
            let user_id = identity.require_user()?;
            match session_cmd {
                SessionCommands::Record { companion_id } => {
                    let companion = db
                        .get_companion(companion_id)?
                        .ok_or(Error::CompanionNotFound(companion_id))?;
                    let id = db.record_session(user_id, companion_id)?;

                    if cli.json {
                        print_json(serde_json::json!({
                            "id": id,
                            "companion_id": companion_id
                        }))?;
                    } else {
                        println!("Recorded session with {}.", companion.name);
                    }
                }

                SessionCommands::List { limit } => {
                    let sessions = db.list_sessions(user_id, Some(limit))?;
                    if cli.json {
                        print_json(&sessions)?;
                    } else if sessions.is_empty() {
                        println!("No sessions yet.");
                    } else {
                        println!("{:<22} {:<24} SUBJECT", "WHEN", "COMPANION");
                        println!("{}", "-".repeat(60));
                        for s in sessions {
                            println!(
                                "{:<22} {:<24} {}",
                                truncate(&s.created_at, 20),
                                truncate(&s.companion_name, 22),
                                s.subject.as_deref().unwrap_or("-")
                            );
                        }
                    }
                }
            }
        }

        Commands::Dashboard { timeframe, metric } => {
            let timeframe = Timeframe::from_str(&timeframe).ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "Invalid timeframe '{}'. Use: week, month, or year",
                    timeframe
                ))
            })?;
            let metric = Metric::from_str(&metric).ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "Invalid metric '{}'. Use: time, performance, or engagement",
                    metric
                ))
            })?;
            identity.require_user()?;

            let now = Utc::now();
            let mut dashboard = Dashboard::new(now);
            dashboard.load(&db, &identity, now, &mut rand::thread_rng());
            dashboard.set_timeframe(timeframe);
            dashboard.set_metric(metric);

            if cli.json {
                print_json(dashboard.view())?;
            } else {
                print_dashboard(&dashboard);
            }
        }

        Commands::Nav { path } => {
            if Route::from_path(&path).is_none() {
                tracing::warn!(path = path.as_str(), "unknown route");
            }
            let links = nav_items(&path, &identity);
            if cli.json {
                print_json(&links)?;
            } else {
                for link in links {
                    let marker = if link.active { "*" } else { " " };
                    println!("{} {:<12} {}", marker, link.label, link.href);
                }
            }
        }

        Commands::Tui => {
            tui::run(db, identity)?;
        }
    }

    Ok(())
}

fn print_dashboard(dashboard: &Dashboard) {
    let view = dashboard.view();

    println!("=== Learning Analytics ({}) ===", view.timeframe.label());
    println!("Total study time: {}", format_time(view.stats.total_minutes));
    println!("Completed sessions: {}", view.stats.completed_sessions);
    println!("Average score: {}%", view.stats.average_score);
    println!("Day streak: {}", view.streaks.current);
    println!("Improvement: +{}%", view.stats.improvement_rate);

    println!();
    println!("--- Weekly Performance ({}) ---", view.metric.label());
    if view.weekly.is_empty() {
        println!("No sessions to chart yet.");
    }
    let heights = analytics::chart_heights(&view.weekly, view.metric);
    for (bucket, height) in view.weekly.iter().zip(heights) {
        let value = bucket.value(view.metric);
        let label = match view.metric {
            Metric::Time => format_time(value as u64),
            _ => format!("{}%", value),
        };
        println!(
            "{:<4} {:<20} {}",
            bucket.day,
            "#".repeat((height / 5) as usize),
            label
        );
    }

    println!();
    println!("--- Subject Progress ---");
    if view.subjects.is_empty() {
        println!("No subjects yet.");
    }
    for s in &view.subjects {
        println!(
            "{:<20} {:>3}% • {} sessions (avg score {}%, {}% remaining)",
            truncate(&s.subject, 18),
            s.progress,
            s.sessions,
            s.avg_score,
            s.remaining()
        );
    }

    println!();
    println!("--- Insights ---");
    for insight in &view.insights {
        println!("{} {}: {}", insight.icon, insight.title, insight.description);
        if let Some(action) = &insight.actionable {
            println!("   -> {}", action);
        }
    }

    println!();
    println!("--- Learning Streaks ---");
    println!("Current: {}", view.streaks.current);
    println!("Longest: {}", view.streaks.longest);
    println!("This week: {}", view.streaks.this_week);
    println!("This month: {}", view.streaks.this_month);

    println!();
    println!("--- Recent Achievements ---");
    for a in RECENT_ACHIEVEMENTS.iter() {
        println!("{} {}: {}", a.icon, a.title, a.description);
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    mod truncate_tests {
        use super::*;

        #[test]
        fn truncate_short_string() {
            assert_eq!(truncate("hello", 10), "hello");
        }

        #[test]
        fn truncate_exact_length() {
            assert_eq!(truncate("hello", 5), "hello");
        }

        #[test]
        fn truncate_long_string() {
            assert_eq!(truncate("hello world", 8), "hello...");
        }

        #[test]
        fn truncate_empty_string() {
            assert_eq!(truncate("", 10), "");
        }
    }

    mod cli_parsing_tests {
        use super::*;

        #[test]
        fn parse_init_command() {
            let cli = Cli::try_parse_from(["converso", "init"]).unwrap();
            assert!(!cli.json);
            assert!(cli.user.is_none());
            assert!(matches!(cli.command, Commands::Init));
        }

        #[test]
        fn parse_global_flags() {
            let cli =
                Cli::try_parse_from(["converso", "--json", "--user", "user_1", "init"]).unwrap();
            assert!(cli.json);
            assert_eq!(cli.user, Some("user_1".to_string()));

            let cli = Cli::try_parse_from(["converso", "nav", "-u", "user_2", "--json"]).unwrap();
            assert!(cli.json);
            assert_eq!(cli.user, Some("user_2".to_string()));
        }

        #[test]
        fn parse_companion_add_full() {
            let cli = Cli::try_parse_from([
                "converso", "companion", "add", "Neura", "-s", "science", "-t", "cells", "-d",
                "15",
            ])
            .unwrap();
            match cli.command {
                Commands::Companion(CompanionCommands::Add {
                    name,
                    subject,
                    topic,
                    duration,
                }) => {
                    assert_eq!(name, "Neura");
                    assert_eq!(subject, Some("science".to_string()));
                    assert_eq!(topic, Some("cells".to_string()));
                    assert_eq!(duration, Some(15));
                }
                _ => panic!("Expected Companion Add command"),
            }
        }

        #[test]
        fn parse_companion_add_minimal() {
            let cli = Cli::try_parse_from(["converso", "companion", "add", "Neura"]).unwrap();
            match cli.command {
                Commands::Companion(CompanionCommands::Add {
                    subject,
                    topic,
                    duration,
                    ..
                }) => {
                    assert!(subject.is_none());
                    assert!(topic.is_none());
                    assert!(duration.is_none());
                }
                _ => panic!("Expected Companion Add command"),
            }
        }

        #[test]
        fn parse_companion_delete() {
            let cli = Cli::try_parse_from(["converso", "companion", "delete", "5"]).unwrap();
            assert!(matches!(
                cli.command,
                Commands::Companion(CompanionCommands::Delete { id: 5 })
            ));
        }

        #[test]
        fn parse_session_record() {
            let cli = Cli::try_parse_from(["converso", "session", "record", "3"]).unwrap();
            assert!(matches!(
                cli.command,
                Commands::Session(SessionCommands::Record { companion_id: 3 })
            ));
        }

        #[test]
        fn parse_session_list_default_limit() {
            let cli = Cli::try_parse_from(["converso", "session", "list"]).unwrap();
            assert!(matches!(
                cli.command,
                Commands::Session(SessionCommands::List { limit: 10 })
            ));
        }

        #[test]
        fn parse_dashboard_defaults() {
            let cli = Cli::try_parse_from(["converso", "dashboard"]).unwrap();
            match cli.command {
                Commands::Dashboard { timeframe, metric } => {
                    assert_eq!(timeframe, "week");
                    assert_eq!(metric, "time");
                }
                _ => panic!("Expected Dashboard command"),
            }
        }

        #[test]
        fn parse_dashboard_with_selectors() {
            let cli = Cli::try_parse_from([
                "converso",
                "dashboard",
                "--timeframe",
                "year",
                "-m",
                "engagement",
            ])
            .unwrap();
            match cli.command {
                Commands::Dashboard { timeframe, metric } => {
                    assert_eq!(timeframe, "year");
                    assert_eq!(metric, "engagement");
                }
                _ => panic!("Expected Dashboard command"),
            }
        }

        #[test]
        fn parse_nav_path() {
            let cli = Cli::try_parse_from(["converso", "nav", "--path", "/dashboard"]).unwrap();
            match cli.command {
                Commands::Nav { path } => assert_eq!(path, "/dashboard"),
                _ => panic!("Expected Nav command"),
            }
        }

        #[test]
        fn parse_tui_command() {
            let cli = Cli::try_parse_from(["converso", "tui"]).unwrap();
            assert!(matches!(cli.command, Commands::Tui));
        }

        #[test]
        fn parse_invalid_command_fails() {
            assert!(Cli::try_parse_from(["converso", "invalid"]).is_err());
        }

        #[test]
        fn parse_missing_required_arg_fails() {
            assert!(Cli::try_parse_from(["converso", "companion", "add"]).is_err());
            assert!(Cli::try_parse_from(["converso", "session", "record"]).is_err());
            assert!(Cli::try_parse_from(["converso", "companion", "delete", "abc"]).is_err());
        }
    }
}
