use crate::models::{InsightKind, LearningInsight, SubjectProgress};

fn insight(
    kind: InsightKind,
    title: &str,
    description: String,
    icon: &str,
    actionable: Option<String>,
) -> LearningInsight {
    LearningInsight {
        kind,
        title: title.to_string(),
        description,
        icon: icon.to_string(),
        actionable,
    }
}

/// Rule-selected feedback for the dashboard.
///
/// With no subjects this is a single "start your journey" recommendation.
/// Otherwise it is always four items: strength, improvement, trend and
/// recommendation. Strength and improvement may name the same subject.
pub fn generate_insights(subjects: &[SubjectProgress], session_count: usize) -> Vec<LearningInsight> {
    if subjects.is_empty() {
        return vec![insight(
            InsightKind::Recommendation,
            "Start Your Learning Journey",
            "No study sessions found. Create a companion and start learning!".to_string(),
            "🚀",
            Some("Create your first AI companion".to_string()),
        )];
    }

    // Stable sorts: ties keep earlier subjects first, and the improvement
    // pick breaks ties in the order left by the strength sort.
    let mut ranked: Vec<&SubjectProgress> = subjects.iter().collect();
    ranked.sort_by(|a, b| b.avg_score.cmp(&a.avg_score));
    let top = ranked[0];
    ranked.sort_by(|a, b| a.progress.cmp(&b.progress));
    let weakest = ranked[0];

    vec![
        insight(
            InsightKind::Strength,
            "Excellence in Top Subject",
            format!(
                "You're performing exceptionally well in {} with {}% average score",
                top.subject, top.avg_score
            ),
            "🌟",
            Some(format!("Consider taking advanced {} challenges", top.subject)),
        ),
        insight(
            InsightKind::Improvement,
            "Needs Improvement",
            format!(
                "Your progress in {} is at {}%. Focus sessions could help",
                weakest.subject, weakest.progress
            ),
            "📚",
            Some(format!(
                "Schedule 2 extra {} sessions this week",
                weakest.subject
            )),
        ),
        insight(
            InsightKind::Trend,
            "Learning Progress",
            format!(
                "You've completed {} study sessions with consistent improvement",
                session_count
            ),
            "📈",
            Some("Keep up the great work!".to_string()),
        ),
        insight(
            InsightKind::Recommendation,
            "Consistency Boost",
            "Maintain regular study sessions to maximize retention and progress".to_string(),
            "⚡",
            Some("Set daily study reminders".to_string()),
        ),
    ]
}
