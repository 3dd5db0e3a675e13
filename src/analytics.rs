//! Aggregation behind the analytics dashboard.
//!
//! Everything here is a pure function of its inputs. The arithmetic mirrors
//! what learners already see on the web dashboard, quirks included:
//! weekly buckets are keyed by weekday name only, performance is normalised by
//! subject count and engagement by session count.

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use rand::Rng;

use crate::models::{
    AchievementStats, CompanionRecord, LearningStreaks, Metric, StudySession, SubjectProgress,
    WeeklyBucket,
};

pub const DEFAULT_SUBJECT: &str = "General";
pub const DEFAULT_DURATION_MINUTES: u32 = 30;
pub const DEFAULT_COMPANION_NAME: &str = "AI Companion";
pub const DEFAULT_TOPIC: &str = "Learning";

/// Scores are synthesised until real per-session scoring exists upstream.
pub const MIN_SCORE: u32 = 80;
pub const MAX_SCORE_EXCLUSIVE: u32 = 100;

/// Rounds half away from negative infinity, so 2.5 -> 3 and -2.5 -> -2.
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// `round(num / den)`, substituting `fallback` when the quotient is zero or
/// undefined.
fn ratio_or(num: f64, den: f64, fallback: f64) -> u32 {
    let q = if den == 0.0 { f64::NAN } else { num / den };
    let v = if q == 0.0 || q.is_nan() { fallback } else { q };
    round_half_up(v) as u32
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.is_empty())
}

/// Map companion records onto study sessions dated `now`.
pub fn to_study_sessions<R: Rng + ?Sized>(
    companions: &[CompanionRecord],
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<StudySession> {
    companions
        .iter()
        .enumerate()
        .map(|(index, c)| StudySession {
            id: non_empty(&c.id)
                .map(str::to_string)
                .unwrap_or_else(|| format!("session-{}", index)),
            date: now,
            subject: non_empty(&c.subject).unwrap_or(DEFAULT_SUBJECT).to_string(),
            duration: c
                .duration
                .filter(|d| *d != 0)
                .unwrap_or(DEFAULT_DURATION_MINUTES),
            score: rng.gen_range(MIN_SCORE..MAX_SCORE_EXCLUSIVE),
            companion: non_empty(&c.name)
                .unwrap_or(DEFAULT_COMPANION_NAME)
                .to_string(),
            topics: vec![non_empty(&c.topic).unwrap_or(DEFAULT_TOPIC).to_string()],
        })
        .collect()
}

/// Group sessions by subject, in order of first appearance.
///
/// `total_companions` is the denominator for progress, so a learner with one
/// companion per subject sees every subject at `100 / n` percent.
pub fn subject_progress(sessions: &[StudySession], total_companions: usize) -> Vec<SubjectProgress> {
    let mut subjects: Vec<&str> = Vec::new();
    for s in sessions {
        if !subjects.contains(&s.subject.as_str()) {
            subjects.push(&s.subject);
        }
    }

    subjects
        .into_iter()
        .map(|subject| {
            let matching: Vec<&StudySession> =
                sessions.iter().filter(|s| s.subject == subject).collect();
            let count = matching.len();

            let progress = if total_companions == 0 {
                0
            } else {
                let pct = round_half_up(count as f64 / total_companions as f64 * 100.0) as u32;
                pct.min(100)
            };

            let score_sum: u64 = matching.iter().map(|s| s.score as u64).sum();

            SubjectProgress {
                subject: subject.to_string(),
                progress,
                sessions: count,
                avg_score: ratio_or(score_sum as f64, count as f64, 0.0),
            }
        })
        .collect()
}

/// Short weekday name used as the bucket key.
pub fn weekday_label(date: &DateTime<Utc>) -> String {
    date.format("%a").to_string()
}

/// Per-weekday totals for the performance chart.
///
/// Sessions from different weeks that fall on the same weekday share a
/// bucket.
pub fn weekly_data(sessions: &[StudySession], subject_count: usize) -> Vec<WeeklyBucket> {
    struct Acc {
        day: String,
        time: u64,
        score: u64,
        topics: u64,
    }

    let mut acc: Vec<Acc> = Vec::new();
    for s in sessions {
        let day = weekday_label(&s.date);
        let idx = match acc.iter().position(|a| a.day == day) {
            Some(i) => i,
            None => {
                acc.push(Acc {
                    day,
                    time: 0,
                    score: 0,
                    topics: 0,
                });
                acc.len() - 1
            }
        };
        let bucket = &mut acc[idx];
        bucket.time += s.duration as u64;
        bucket.score += s.score as u64;
        bucket.topics += s.topics.len() as u64;
    }

    acc.into_iter()
        .map(|a| WeeklyBucket {
            day: a.day,
            time: u32::try_from(a.time).unwrap_or(u32::MAX),
            performance: ratio_or(a.score as f64, subject_count as f64, 1.0),
            engagement: ratio_or(a.topics as f64, sessions.len() as f64, 1.0),
        })
        .collect()
}

pub fn achievement_stats(sessions: &[StudySession], subjects: &[SubjectProgress]) -> AchievementStats {
    let total_minutes: u64 = sessions.iter().map(|s| s.duration as u64).sum();
    let score_sum: u64 = sessions.iter().map(|s| s.score as u64).sum();
    let progress_sum: u64 = subjects.iter().map(|s| s.progress as u64).sum();

    AchievementStats {
        total_minutes,
        completed_sessions: sessions.len(),
        average_score: ratio_or(score_sum as f64, sessions.len() as f64, 1.0),
        improvement_rate: ratio_or(progress_sum as f64, subjects.len() as f64, 1.0),
    }
}

/// Longest run of consecutive calendar days (UTC) with at least one session.
fn longest_daily_run(sessions: &[StudySession]) -> u32 {
    let days: BTreeSet<NaiveDate> = sessions.iter().map(|s| s.date.date_naive()).collect();

    let mut longest = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;
    for day in days {
        run = match prev.and_then(|p| p.succ_opt()) {
            Some(next) if next == day => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(day);
    }
    longest
}

/// Same day-of-month one month earlier. Days past the end of the shorter
/// month roll over into the next one, so Mar 31 maps to Mar 3 (Mar 2 in a leap
/// year) rather than clamping to the end of February.
fn one_month_before(now: DateTime<Utc>) -> DateTime<Utc> {
    now.with_day(1)
        .and_then(|first| first.checked_sub_months(Months::new(1)))
        .map(|first| first + Duration::days(i64::from(now.day()) - 1))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

pub fn learning_streaks(sessions: &[StudySession], now: DateTime<Utc>) -> LearningStreaks {
    // Sessions exactly one whole day old count toward the current streak.
    let current = sessions
        .iter()
        .filter(|s| (now - s.date).num_days() == 1)
        .count() as u32;

    let week_ago = now - Duration::days(7);
    let this_week = sessions.iter().filter(|s| s.date > week_ago).count() as u32;

    let month_ago = one_month_before(now);
    let this_month = sessions.iter().filter(|s| s.date > month_ago).count() as u32;

    LearningStreaks {
        current,
        longest: longest_daily_run(sessions).max(current),
        this_week,
        this_month,
    }
}

pub fn format_time(minutes: u64) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}

/// Bar heights as a percentage of the tallest bucket for `metric`.
pub fn chart_heights(buckets: &[WeeklyBucket], metric: Metric) -> Vec<u32> {
    let max = buckets.iter().map(|b| b.value(metric)).max().unwrap_or(0);
    buckets
        .iter()
        .map(|b| {
            if max == 0 {
                0
            } else {
                (b.value(metric) as u64 * 100 / max as u64) as u32
            }
        })
        .collect()
}
