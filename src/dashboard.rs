use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, error};

use crate::analytics;
use crate::error::Result;
use crate::identity::Identity;
use crate::insights::generate_insights;
use crate::models::{
    AchievementStats, CompanionRecord, LearningInsight, LearningStreaks, Metric, StudySession,
    SubjectProgress, Timeframe, WeeklyBucket,
};
use crate::source::CompanionSource;

pub struct Achievement {
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

// Static showcase until achievements are tracked per learner.
pub const RECENT_ACHIEVEMENTS: [Achievement; 4] = [
    Achievement {
        title: "Speed Learner",
        description: "Completed 5 sessions in one day",
        icon: "⚡",
    },
    Achievement {
        title: "Math Master",
        description: "Scored 95%+ in 10 math sessions",
        icon: "🧮",
    },
    Achievement {
        title: "Consistency King",
        description: "Maintained 14-day learning streak",
        icon: "👑",
    },
    Achievement {
        title: "Knowledge Seeker",
        description: "Explored 3 new subjects this month",
        icon: "🔍",
    },
];

/// Everything the dashboard renders, derived in one pass.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub timeframe: Timeframe,
    pub metric: Metric,
    pub stats: AchievementStats,
    pub streaks: LearningStreaks,
    pub weekly: Vec<WeeklyBucket>,
    pub subjects: Vec<SubjectProgress>,
    pub insights: Vec<LearningInsight>,
}

/// State behind the analytics dashboard.
///
/// Insights are refreshed whenever data is loaded or the timeframe changes.
/// The timeframe does not filter the data itself.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub timeframe: Timeframe,
    pub metric: Metric,
    pub sessions: Vec<StudySession>,
    pub subjects: Vec<SubjectProgress>,
    pub insights: Vec<LearningInsight>,
    pub loading: bool,
    pub loaded_at: DateTime<Utc>,
}

impl Dashboard {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            timeframe: Timeframe::default(),
            metric: Metric::default(),
            sessions: Vec::new(),
            subjects: Vec::new(),
            insights: generate_insights(&[], 0),
            loading: true,
            loaded_at: now,
        }
    }

    /// Fetch and aggregate the signed-in user's data.
    ///
    /// A failed fetch is logged and leaves the dashboard empty; it never
    /// propagates.
    pub fn load<S, R>(&mut self, source: &S, identity: &Identity, now: DateTime<Utc>, rng: &mut R)
    where
        S: CompanionSource + ?Sized,
        R: Rng + ?Sized,
    {
        self.loaded_at = now;

        let Some(user_id) = identity.user_id() else {
            self.loading = false;
            return;
        };

        self.loading = true;
        match fetch(source, user_id) {
            Ok((history, companions)) => {
                debug!(
                    user_id,
                    sessions = history.len(),
                    companions = companions.len(),
                    "fetched dashboard data"
                );
                self.apply(&companions, now, rng);
            }
            Err(e) => {
                error!(user_id, error = %e, "Error fetching user data");
            }
        }
        self.loading = false;
    }

    /// Aggregate already-fetched companion records.
    pub fn apply<R: Rng + ?Sized>(
        &mut self,
        companions: &[CompanionRecord],
        now: DateTime<Utc>,
        rng: &mut R,
    ) {
        self.loaded_at = now;
        self.sessions = analytics::to_study_sessions(companions, now, rng);
        self.subjects = analytics::subject_progress(&self.sessions, companions.len());
        self.refresh_insights();
    }

    fn refresh_insights(&mut self) {
        self.insights = generate_insights(&self.subjects, self.sessions.len());
    }

    pub fn set_timeframe(&mut self, timeframe: Timeframe) {
        self.timeframe = timeframe;
        self.refresh_insights();
    }

    pub fn cycle_timeframe(&mut self) {
        self.set_timeframe(self.timeframe.next());
    }

    pub fn set_metric(&mut self, metric: Metric) {
        self.metric = metric;
    }

    pub fn cycle_metric(&mut self) {
        self.metric = self.metric.next();
    }

    pub fn weekly_data(&self) -> Vec<WeeklyBucket> {
        analytics::weekly_data(&self.sessions, self.subjects.len())
    }

    pub fn achievement_stats(&self) -> AchievementStats {
        analytics::achievement_stats(&self.sessions, &self.subjects)
    }

    pub fn learning_streaks(&self) -> LearningStreaks {
        analytics::learning_streaks(&self.sessions, self.loaded_at)
    }

    pub fn view(&self) -> DashboardView {
        DashboardView {
            timeframe: self.timeframe,
            metric: self.metric,
            stats: self.achievement_stats(),
            streaks: self.learning_streaks(),
            weekly: self.weekly_data(),
            subjects: self.subjects.clone(),
            insights: self.insights.clone(),
        }
    }
}

fn fetch<S: CompanionSource + ?Sized>(
    source: &S,
    user_id: &str,
) -> Result<(Vec<CompanionRecord>, Vec<CompanionRecord>)> {
    let history = source.get_user_sessions(user_id)?;
    let companions = source.get_user_companions(user_id)?;
    Ok((history, companions))
}
