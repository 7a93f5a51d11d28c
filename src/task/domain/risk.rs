//! Heuristic risk scoring over task snapshots.
//!
//! The score adds four terms:
//!
//! - due date: `+50` when overdue, otherwise `+30` when due within three days
//! - staleness (open tasks only): `+30` after 14 idle days, otherwise `+10`
//!   after 7
//! - blocked status: `+25`
//! - priority: `priority × 5`
//!
//! Scores of 50 and above are high risk; 25 and above are medium.

use super::{TaskSnapshot, TaskStatus};
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const SECONDS_PER_DAY: i64 = 86_400;

const OVERDUE_POINTS: i32 = 50;
const DUE_SOON_POINTS: i32 = 30;
const DUE_SOON_WINDOW_DAYS: i64 = 3;
const STALE_LONG_POINTS: i32 = 30;
const STALE_LONG_DAYS: i64 = 14;
const STALE_SHORT_POINTS: i32 = 10;
const STALE_SHORT_DAYS: i64 = 7;
const BLOCKED_POINTS: i32 = 25;
const PRIORITY_WEIGHT: i32 = 5;

const HIGH_THRESHOLD: i32 = 50;
const MED_THRESHOLD: i32 = 25;

/// Reason text for overdue tasks.
pub const REASON_OVERDUE: &str = "OVERDUE";
/// Reason text for tasks due within three days.
pub const REASON_DUE_SOON: &str = "Due Soon";
/// Reason text for tasks idle for at least 14 days.
pub const REASON_STALE_LONG: &str = "Stale (14d)";
/// Reason text for tasks idle for at least 7 days.
pub const REASON_STALE_SHORT: &str = "Stale (7d)";
/// Reason text for blocked tasks.
pub const REASON_BLOCKED: &str = "Blocked";

/// Coarse risk classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Score below 25.
    #[serde(rename = "low")]
    Low,
    /// Score from 25 up to 49.
    #[serde(rename = "med")]
    Med,
    /// Score of 50 or more.
    #[serde(rename = "high")]
    High,
}

impl RiskLevel {
    /// Classifies a score.
    #[must_use]
    pub const fn from_score(score: i32) -> Self {
        if score >= HIGH_THRESHOLD {
            Self::High
        } else if score >= MED_THRESHOLD {
            Self::Med
        } else {
            Self::Low
        }
    }

    /// Returns the display label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Med => "med",
            Self::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of scoring one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Total score.
    pub score: i32,
    /// Reasons in fixed order: due date, staleness, blocked.
    pub reasons: Vec<String>,
    /// Classification of `score`.
    pub level: RiskLevel,
}

/// Pure, deterministic task risk scorer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RiskScorer;

impl RiskScorer {
    /// Scores `task` as observed at `now`.
    #[must_use]
    pub fn assess(task: &TaskSnapshot, now: DateTime<Utc>) -> RiskAssessment {
        let mut score = 0;
        let mut reasons = Vec::new();

        if let Some(due_date) = task.due_date() {
            let due_at = due_date.and_time(NaiveTime::MIN).and_utc();
            let days_until = whole_days_between(now, due_at);
            if days_until < 0 {
                score += OVERDUE_POINTS;
                reasons.push(REASON_OVERDUE.to_owned());
            } else if days_until <= DUE_SOON_WINDOW_DAYS {
                score += DUE_SOON_POINTS;
                reasons.push(REASON_DUE_SOON.to_owned());
            }
        }

        if !task.status().is_done() {
            let days_since = whole_days_between(task.last_touched_at(), now);
            if days_since >= STALE_LONG_DAYS {
                score += STALE_LONG_POINTS;
                reasons.push(REASON_STALE_LONG.to_owned());
            } else if days_since >= STALE_SHORT_DAYS {
                score += STALE_SHORT_POINTS;
                reasons.push(REASON_STALE_SHORT.to_owned());
            }
        }

        if matches!(task.status(), TaskStatus::Blocked) {
            score += BLOCKED_POINTS;
            reasons.push(REASON_BLOCKED.to_owned());
        }

        score += i32::from(task.priority().value()) * PRIORITY_WEIGHT;

        RiskAssessment {
            score,
            reasons,
            level: RiskLevel::from_score(score),
        }
    }
}

/// Floor of the elapsed days from `start` to `end`; negative when `end`
/// precedes `start`.
#[must_use]
pub fn whole_days_between(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    (end - start).num_seconds().div_euclid(SECONDS_PER_DAY)
}
