use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// A companion as stored locally
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Companion {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub subject: Option<String>,
    pub topic: Option<String>,
    pub duration: Option<u32>,
    pub created_at: String,
}

// A companion as handed to the dashboard by the data source. Every field may
// be missing; the aggregator fills in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanionRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub duration: Option<u32>,
}

impl From<&Companion> for CompanionRecord {
    fn from(c: &Companion) -> Self {
        Self {
            id: Some(c.id.to_string()),
            name: Some(c.name.clone()),
            subject: c.subject.clone(),
            topic: c.topic.clone(),
            duration: c.duration,
        }
    }
}

// One row of session history joined with the companion it was held with
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEntry {
    pub id: i64,
    pub companion_id: i64,
    pub companion_name: String,
    pub subject: Option<String>,
    pub topic: Option<String>,
    pub duration: Option<u32>,
    pub created_at: String,
}

impl From<&SessionEntry> for CompanionRecord {
    fn from(e: &SessionEntry) -> Self {
        Self {
            id: Some(e.companion_id.to_string()),
            name: Some(e.companion_name.clone()),
            subject: e.subject.clone(),
            topic: e.topic.clone(),
            duration: e.duration,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudySession {
    pub id: String,
    pub date: DateTime<Utc>,
    pub subject: String,
    /// Minutes.
    pub duration: u32,
    pub score: u32,
    pub companion: String,
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectProgress {
    pub subject: String,
    pub progress: u32,
    pub sessions: usize,
    pub avg_score: u32,
}

impl SubjectProgress {
    pub fn remaining(&self) -> u32 {
        100u32.saturating_sub(self.progress)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Strength,
    Improvement,
    Trend,
    Recommendation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningInsight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub actionable: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyBucket {
    pub day: String,
    pub time: u32,
    pub performance: u32,
    pub engagement: u32,
}

impl WeeklyBucket {
    pub fn value(&self, metric: Metric) -> u32 {
        match metric {
            Metric::Time => self.time,
            Metric::Performance => self.performance,
            Metric::Engagement => self.engagement,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementStats {
    pub total_minutes: u64,
    pub completed_sessions: usize,
    pub average_score: u32,
    pub improvement_rate: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LearningStreaks {
    pub current: u32,
    pub longest: u32,
    pub this_week: u32,
    pub this_month: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    #[default]
    Week,
    Month,
    Year,
}

impl Timeframe {
    pub const ALL: [Timeframe; 3] = [Timeframe::Week, Timeframe::Month, Timeframe::Year];

    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::Week => "Week",
            Timeframe::Month => "Month",
            Timeframe::Year => "Year",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "week" | "w" => Some(Timeframe::Week),
            "month" | "m" => Some(Timeframe::Month),
            "year" | "y" => Some(Timeframe::Year),
            _ => None,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Timeframe::Week => Timeframe::Month,
            Timeframe::Month => Timeframe::Year,
            Timeframe::Year => Timeframe::Week,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Time,
    Performance,
    Engagement,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Time, Metric::Performance, Metric::Engagement];

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Time => "Time",
            Metric::Performance => "Performance",
            Metric::Engagement => "Engagement",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "time" | "t" => Some(Metric::Time),
            "performance" | "perf" | "p" => Some(Metric::Performance),
            "engagement" | "e" => Some(Metric::Engagement),
            _ => None,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Metric::Time => Metric::Performance,
            Metric::Performance => Metric::Engagement,
            Metric::Engagement => Metric::Time,
        }
    }
}

// JSON output wrapper for CLI
#[derive(Debug, Serialize)]
pub struct JsonOutput<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod companion_record_tests {
        use super::*;

        #[test]
        fn from_companion_copies_fields() {
            let c = Companion {
                id: 7,
                user_id: "user_1".to_string(),
                name: "Neura".to_string(),
                subject: Some("science".to_string()),
                topic: None,
                duration: Some(15),
                created_at: "2026-01-01T00:00:00+00:00".to_string(),
            };
            let r = CompanionRecord::from(&c);
            assert_eq!(r.id.as_deref(), Some("7"));
            assert_eq!(r.name.as_deref(), Some("Neura"));
            assert_eq!(r.subject.as_deref(), Some("science"));
            assert!(r.topic.is_none());
            assert_eq!(r.duration, Some(15));
        }

        #[test]
        fn deserializes_with_missing_fields() {
            let r: CompanionRecord = serde_json::from_str(r#"{"name":"Codey"}"#).unwrap();
            assert_eq!(r.name.as_deref(), Some("Codey"));
            assert!(r.id.is_none());
            assert!(r.duration.is_none());
        }
    }

    mod insight_kind_tests {
        use super::*;

        #[test]
        fn serializes_as_type_field() {
            let insight = LearningInsight {
                kind: InsightKind::Strength,
                title: "t".to_string(),
                description: "d".to_string(),
                icon: "*".to_string(),
                actionable: None,
            };
            let json = serde_json::to_string(&insight).unwrap();
            assert!(json.contains("\"type\":\"strength\""));
            assert!(json.contains("\"actionable\":null"));
        }

        #[test]
        fn kinds_serialize_lowercase() {
            let json = serde_json::to_string(&[
                InsightKind::Strength,
                InsightKind::Improvement,
                InsightKind::Trend,
                InsightKind::Recommendation,
            ])
            .unwrap();
            assert_eq!(json, r#"["strength","improvement","trend","recommendation"]"#);
        }
    }

    mod selector_tests {
        use super::*;

        #[test]
        fn timeframe_from_str() {
            assert_eq!(Timeframe::from_str("week"), Some(Timeframe::Week));
            assert_eq!(Timeframe::from_str("MONTH"), Some(Timeframe::Month));
            assert_eq!(Timeframe::from_str("y"), Some(Timeframe::Year));
            assert_eq!(Timeframe::from_str("decade"), None);
        }

        #[test]
        fn selectors_serialize_lowercase() {
            assert_eq!(serde_json::to_string(&Timeframe::Month).unwrap(), r#""month""#);
            assert_eq!(serde_json::to_string(&Metric::Performance).unwrap(), r#""performance""#);
        }

        #[test]
        fn timeframe_cycles() {
            assert_eq!(Timeframe::Week.next(), Timeframe::Month);
            assert_eq!(Timeframe::Month.next(), Timeframe::Year);
            assert_eq!(Timeframe::Year.next(), Timeframe::Week);
        }

        #[test]
        fn metric_from_str() {
            assert_eq!(Metric::from_str("time"), Some(Metric::Time));
            assert_eq!(Metric::from_str("Performance"), Some(Metric::Performance));
            assert_eq!(Metric::from_str("e"), Some(Metric::Engagement));
            assert_eq!(Metric::from_str(""), None);
        }

        #[test]
        fn metric_cycles() {
            assert_eq!(Metric::Time.next(), Metric::Performance);
            assert_eq!(Metric::Performance.next(), Metric::Engagement);
            assert_eq!(Metric::Engagement.next(), Metric::Time);
        }

        #[test]
        fn bucket_value_by_metric() {
            let b = WeeklyBucket {
                day: "Mon".to_string(),
                time: 90,
                performance: 85,
                engagement: 2,
            };
            assert_eq!(b.value(Metric::Time), 90);
            assert_eq!(b.value(Metric::Performance), 85);
            assert_eq!(b.value(Metric::Engagement), 2);
        }

        #[test]
        fn remaining_progress() {
            let s = SubjectProgress {
                subject: "maths".to_string(),
                progress: 40,
                sessions: 2,
                avg_score: 88,
            };
            assert_eq!(s.remaining(), 60);
        }
    }

    mod json_output_tests {
        use super::*;

        #[test]
        fn ok_with_string() {
            let output = JsonOutput::ok("test data");
            assert!(output.success);
            assert_eq!(output.data, Some("test data"));
            assert!(output.error.is_none());
        }

        #[test]
        fn err_with_string() {
            let output = JsonOutput::<()>::err("something went wrong");
            assert!(!output.success);
            assert!(output.data.is_none());
            assert_eq!(output.error, Some("something went wrong".to_string()));
        }

        #[test]
        fn serializes_ok_correctly() {
            let output = JsonOutput::ok("test");
            let json = serde_json::to_string(&output).unwrap();
            assert!(json.contains("\"success\":true"));
            assert!(json.contains("\"data\":\"test\""));
            assert!(json.contains("\"error\":null"));
        }

        #[test]
        fn serializes_err_correctly() {
            let output = JsonOutput::<()>::err("error");
            let json = serde_json::to_string(&output).unwrap();
            assert!(json.contains("\"success\":false"));
            assert!(json.contains("\"data\":null"));
            assert!(json.contains("\"error\":\"error\""));
        }
    }
}
