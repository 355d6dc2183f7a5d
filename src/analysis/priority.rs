use crate::analysis::keywords::{matching_multipliers, scan_keywords};
use crate::models::issue::{Issue, Priority};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: i64 = 86_400;

/// Score at or above which an issue is critical and flagged as escalated.
pub const ESCALATION_THRESHOLD: f64 = 150.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityAssessment {
    pub tier: Priority,
    pub score: f64,
    pub days_open: i64,
    pub escalated: bool,
    /// Reporter's label, kept for "was X" display.
    pub declared_priority: String,
    pub details: Vec<String>,
}

/// Base score for a declared label; unrecognized labels score as medium.
pub fn base_score(declared: &str) -> f64 {
    match Priority::from_label(declared) {
        Some(Priority::Critical) => 100.0,
        Some(Priority::High) => 75.0,
        Some(Priority::Medium) | None => 50.0,
        Some(Priority::Low) => 25.0,
    }
}

/// Whole days elapsed, floored.
pub fn days_open(created_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - created_at).num_seconds().div_euclid(SECONDS_PER_DAY)
}

/// Single highest matching bracket; thresholds are strict.
pub fn age_bonus(days_open: i64) -> f64 {
    match days_open {
        d if d > 30 => 40.0,
        d if d > 21 => 30.0,
        d if d > 14 => 20.0,
        d if d > 7 => 10.0,
        d if d > 3 => 5.0,
        _ => 0.0,
    }
}

pub fn tier_for_score(score: f64) -> Priority {
    if score >= ESCALATION_THRESHOLD {
        Priority::Critical
    } else if score >= 100.0 {
        Priority::High
    } else if score >= 60.0 {
        Priority::Medium
    } else {
        Priority::Low
    }
}

/// Dynamic priority from declared label, age, keyword content and category.
pub fn compute_priority(issue: &Issue, now: DateTime<Utc>) -> PriorityAssessment {
    let mut details = Vec::new();

    let base = base_score(&issue.declared_priority);
    details.push(format!("base {base} ({})", issue.declared_priority));

    let days = days_open(issue.created_at, now);
    let bonus = age_bonus(days);
    if bonus > 0.0 {
        details.push(format!("+{bonus} age ({days}d open)"));
    }

    let hits = scan_keywords(&format!("{} {}", issue.title, issue.description));
    for keyword in &hits.high {
        details.push(format!("+15 keyword \"{keyword}\""));
    }
    for keyword in &hits.medium {
        details.push(format!("+5 keyword \"{keyword}\""));
    }

    let mut score = base + bonus + hits.points();
    for (needle, factor) in matching_multipliers(&issue.category) {
        score *= factor;
        details.push(format!("x{factor} category \"{needle}\""));
    }

    let tier = tier_for_score(score);

    PriorityAssessment {
        tier,
        score,
        days_open: days,
        escalated: score >= ESCALATION_THRESHOLD,
        declared_priority: issue.declared_priority.clone(),
        details,
    }
}
