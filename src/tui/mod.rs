mod ui;
mod widgets;

use std::io;
use std::time::Duration;

use chrono::Utc;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use crate::dashboard::Dashboard;
use crate::db::{Database, Stats};
use crate::error::Result;
use crate::identity::Identity;
use crate::models::{Companion, SessionEntry};
use crate::nav::{nav_items, NavLink, Route};

const RECENT_SESSION_LIMIT: usize = 20;

pub struct StatefulList<T> {
    pub items: Vec<T>,
    pub selected: Option<usize>,
}

impl<T> StatefulList<T> {
    fn with_items(items: Vec<T>) -> Self {
        let selected = if items.is_empty() { None } else { Some(0) };
        Self { items, selected }
    }

    fn next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.selected {
            Some(i) if i + 1 < self.items.len() => i + 1,
            _ => 0,
        };
        self.selected = Some(i);
    }

    fn previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.selected {
            Some(0) | None => self.items.len() - 1,
            Some(i) => i - 1,
        };
        self.selected = Some(i);
    }

    fn first(&mut self) {
        if !self.items.is_empty() {
            self.selected = Some(0);
        }
    }

    fn last(&mut self) {
        if !self.items.is_empty() {
            self.selected = Some(self.items.len() - 1);
        }
    }
}

pub struct App {
    db: Database,
    pub identity: Identity,
    pub route: Route,
    pub dashboard: Dashboard,
    pub companions: StatefulList<Companion>,
    pub journey: StatefulList<SessionEntry>,
    pub stats: Stats,
    pub should_quit: bool,
}

impl App {
    pub fn new(db: Database, identity: Identity) -> Result<Self> {
        let mut app = Self {
            db,
            identity,
            route: Route::Home,
            dashboard: Dashboard::new(Utc::now()),
            companions: StatefulList::with_items(Vec::new()),
            journey: StatefulList::with_items(Vec::new()),
            stats: Stats::default(),
            should_quit: false,
        };
        app.refresh_data()?;
        Ok(app)
    }

    pub fn refresh_data(&mut self) -> Result<()> {
        if let Some(user_id) = self.identity.user_id() {
            self.stats = self.db.get_stats(user_id)?;
            self.companions = StatefulList::with_items(self.db.list_companions(user_id)?);
            self.journey =
                StatefulList::with_items(self.db.list_sessions(user_id, Some(RECENT_SESSION_LIMIT))?);
        }
        self.dashboard
            .load(&self.db, &self.identity, Utc::now(), &mut rand::thread_rng());
        Ok(())
    }

    pub fn nav_links(&self) -> Vec<NavLink> {
        nav_items(self.route.href(), &self.identity)
    }

    fn step_route(&mut self, forward: bool) {
        let links = self.nav_links();
        if links.is_empty() {
            return;
        }
        let current = links.iter().position(|l| l.active).unwrap_or(0);
        let next = if forward {
            (current + 1) % links.len()
        } else {
            (current + links.len() - 1) % links.len()
        };
        self.route = links[next].route;
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> Result<()> {
        match key {
            KeyCode::Char('q') => self.should_quit = true,

            KeyCode::Char('r') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.refresh_data()?;
            }

            KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => self.step_route(false),
            KeyCode::Char('l') | KeyCode::Right => self.step_route(true),
            KeyCode::Tab => self.step_route(!modifiers.contains(KeyModifiers::SHIFT)),

            KeyCode::Char('j') | KeyCode::Down => match self.route {
                Route::Companion => self.companions.next(),
                Route::MyJourney => self.journey.next(),
                _ => {}
            },
            KeyCode::Char('k') | KeyCode::Up => match self.route {
                Route::Companion => self.companions.previous(),
                Route::MyJourney => self.journey.previous(),
                _ => {}
            },
            KeyCode::Char('g') => match self.route {
                Route::Companion => self.companions.first(),
                Route::MyJourney => self.journey.first(),
                _ => {}
            },
            KeyCode::Char('G') => match self.route {
                Route::Companion => self.companions.last(),
                Route::MyJourney => self.journey.last(),
                _ => {}
            },

            KeyCode::Char('t') if self.route == Route::Dashboard => {
                self.dashboard.cycle_timeframe();
            }
            KeyCode::Char('m') if self.route == Route::Dashboard => {
                self.dashboard.cycle_metric();
            }

            _ => {}
        }
        Ok(())
    }
}

pub fn run(db: Database, identity: Identity) -> Result<()> {
    let mut app = App::new(db, identity)?;
    info!(signed_in = app.identity.is_signed_in(), "starting terminal UI");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key.code, key.modifiers)?;
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Metric, Timeframe};
    use ratatui::backend::TestBackend;

    fn setup_app(identity: Identity) -> App {
        let db = Database::open(":memory:").unwrap();
        db.init().unwrap();
        if let Some(user) = identity.user_id() {
            let a = db
                .add_companion(user, "Neura", Some("science"), Some("cells"), Some(30))
                .unwrap();
            db.add_companion(user, "Codey", Some("coding"), None, Some(45))
                .unwrap();
            db.record_session(user, a).unwrap();
        }
        App::new(db, identity).unwrap()
    }

    fn render(app: &App) -> String {
        let backend = TestBackend::new(120, 50);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui::draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    mod list_tests {
        use super::*;

        #[test]
        fn next_wraps_around() {
            let mut list = StatefulList::with_items(vec![1, 2, 3]);
            list.next();
            list.next();
            list.next();
            assert_eq!(list.selected, Some(0));
        }

        #[test]
        fn previous_wraps_around() {
            let mut list = StatefulList::with_items(vec![1, 2, 3]);
            list.previous();
            assert_eq!(list.selected, Some(2));
        }

        #[test]
        fn empty_list_has_no_selection() {
            let mut list: StatefulList<i32> = StatefulList::with_items(vec![]);
            list.next();
            list.last();
            assert_eq!(list.selected, None);
        }
    }

    mod navigation_tests {
        use super::*;

        #[test]
        fn signed_out_cycles_without_dashboard() {
            let mut app = setup_app(Identity::signed_out());
            let mut seen = Vec::new();
            for _ in 0..4 {
                app.handle_key(KeyCode::Char('l'), KeyModifiers::NONE).unwrap();
                seen.push(app.route);
            }
            assert!(!seen.contains(&Route::Dashboard));
            assert_eq!(app.route, Route::Companion);
        }

        #[test]
        fn signed_in_reaches_dashboard() {
            let mut app = setup_app(Identity::signed_in("user_1"));
            app.handle_key(KeyCode::Char('h'), KeyModifiers::NONE).unwrap();
            assert_eq!(app.route, Route::Dashboard);
        }

        #[test]
        fn dashboard_keys_change_selectors() {
            let mut app = setup_app(Identity::signed_in("user_1"));
            app.route = Route::Dashboard;
            app.handle_key(KeyCode::Char('t'), KeyModifiers::NONE).unwrap();
            app.handle_key(KeyCode::Char('m'), KeyModifiers::NONE).unwrap();
            assert_eq!(app.dashboard.timeframe, Timeframe::Month);
            assert_eq!(app.dashboard.metric, Metric::Performance);
        }

        #[test]
        fn refresh_keeps_selectors() {
            let mut app = setup_app(Identity::signed_in("user_1"));
            app.route = Route::Dashboard;
            app.handle_key(KeyCode::Char('t'), KeyModifiers::NONE).unwrap();
            app.handle_key(KeyCode::Char('r'), KeyModifiers::CONTROL)
                .unwrap();
            assert_eq!(app.dashboard.timeframe, Timeframe::Month);
        }

        #[test]
        fn quit_sets_flag() {
            let mut app = setup_app(Identity::signed_out());
            app.handle_key(KeyCode::Char('q'), KeyModifiers::NONE).unwrap();
            assert!(app.should_quit);
        }
    }

    mod render_tests {
        use super::*;

        #[test]
        fn nav_bar_hides_dashboard_when_signed_out() {
            let app = setup_app(Identity::signed_out());
            let screen = render(&app);
            assert!(screen.contains("My Journey"));
            assert!(!screen.contains("Dashboard"));
        }

        #[test]
        fn nav_bar_shows_dashboard_when_signed_in() {
            let app = setup_app(Identity::signed_in("user_1"));
            let screen = render(&app);
            assert!(screen.contains("Dashboard"));
        }

        #[test]
        fn dashboard_view_renders_sections() {
            let mut app = setup_app(Identity::signed_in("user_1"));
            app.route = Route::Dashboard;
            let screen = render(&app);
            assert!(screen.contains("Learning Analytics"));
            assert!(screen.contains("Subject Progress"));
            assert!(screen.contains("Insights"));
            assert!(screen.contains("Learning Streaks"));
            assert!(screen.contains("science"));
        }

        #[test]
        fn companion_view_lists_companions() {
            let mut app = setup_app(Identity::signed_in("user_1"));
            app.route = Route::Companion;
            let screen = render(&app);
            assert!(screen.contains("Neura"));
            assert!(screen.contains("Codey"));
        }

        #[test]
        fn journey_view_lists_history() {
            let mut app = setup_app(Identity::signed_in("user_1"));
            app.route = Route::MyJourney;
            let screen = render(&app);
            assert!(screen.contains("Neura"));
        }
    }
}
