use crate::analysis::priority::{compute_priority, PriorityAssessment};
use crate::models::facets::{FacetSelection, PriorityFilter, StatusFilter};
use crate::models::issue::{Issue, Priority, StatusBucket, WorkflowStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct ScoredIssue<'a> {
    pub issue: &'a Issue,
    pub assessment: PriorityAssessment,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl TierCounts {
    fn bump(&mut self, tier: Priority) {
        match tier {
            Priority::Critical => self.critical += 1,
            Priority::High => self.high += 1,
            Priority::Medium => self.medium += 1,
            Priority::Low => self.low += 1,
        }
    }
}

/// Status-bucket and tier counters for one facet selection. The status
/// facet never narrows these counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueStatistics {
    pub total_issues: usize,
    pub solved_issues: usize,
    pub unsolved_issues: usize,
    pub new_issues: usize,
    pub analyzed_issues: usize,
    pub catalyzed_issues: usize,
    pub by_tier: TierCounts,
}

fn matches_priority(filter: PriorityFilter, issue: &Issue, tier: Priority) -> bool {
    match filter {
        PriorityFilter::All => true,
        PriorityFilter::Critical => tier == Priority::Critical,
        PriorityFilter::High => tier == Priority::High,
        PriorityFilter::Medium => tier == Priority::Medium,
        PriorityFilter::Low => tier == Priority::Low,
        PriorityFilter::Solved => issue.is_solved(),
        PriorityFilter::Unsolved => !issue.is_solved(),
    }
}

fn matches_status(filter: StatusFilter, issue: &Issue) -> bool {
    let bucket = issue.status_bucket();
    match filter {
        StatusFilter::All => true,
        StatusFilter::New => bucket == StatusBucket::New,
        StatusFilter::Analyzed => bucket == StatusBucket::Analyzed,
        StatusFilter::Catalyzed => bucket == StatusBucket::Catalyzed,
        StatusFilter::Resolved => bucket == StatusBucket::Resolved,
    }
}

/// Conjunction of every facet in the selection.
pub fn matches_facets(issue: &Issue, tier: Priority, facets: &FacetSelection) -> bool {
    if !matches_priority(facets.priority, issue, tier) {
        return false;
    }
    if let Some(region_type) = facets.region_type {
        if issue.region_type != Some(region_type) {
            return false;
        }
    }
    if let Some(region_name) = &facets.region_name {
        if issue.region_name.as_deref() != Some(region_name.as_str()) {
            return false;
        }
    }
    if let Some(category) = &facets.category {
        if !issue.effective_category().eq_ignore_ascii_case(category.trim()) {
            return false;
        }
    }
    if let Some(channel) = facets.channel {
        if issue.channel != channel {
            return false;
        }
    }
    matches_status(facets.status, issue)
}

/// Issues matching every facet, highest score first, ties by id.
pub fn filter_issues<'a>(
    issues: &'a [Issue],
    facets: &FacetSelection,
    now: DateTime<Utc>,
) -> Vec<ScoredIssue<'a>> {
    let mut matched: Vec<ScoredIssue<'a>> = issues
        .iter()
        .map(|issue| ScoredIssue {
            issue,
            assessment: compute_priority(issue, now),
        })
        .filter(|scored| matches_facets(scored.issue, scored.assessment.tier, facets))
        .collect();

    matched.sort_by(|a, b| {
        b.assessment
            .score
            .total_cmp(&a.assessment.score)
            .then_with(|| a.issue.id.cmp(&b.issue.id))
    });
    matched
}

pub fn compute_statistics(
    issues: &[Issue],
    facets: &FacetSelection,
    now: DateTime<Utc>,
) -> IssueStatistics {
    let scoped = filter_issues(issues, &facets.without_status(), now);

    let mut stats = IssueStatistics {
        total_issues: scoped.len(),
        ..IssueStatistics::default()
    };

    for scored in &scoped {
        stats.by_tier.bump(scored.assessment.tier);
        if scored.issue.is_solved() {
            stats.solved_issues += 1;
            continue;
        }
        match scored.issue.workflow_status {
            WorkflowStatus::Analyzed => stats.analyzed_issues += 1,
            WorkflowStatus::Catalyzed => stats.catalyzed_issues += 1,
            WorkflowStatus::New | WorkflowStatus::Other => {}
        }
    }

    stats.unsolved_issues = stats.total_issues - stats.solved_issues;
    stats.new_issues = stats
        .unsolved_issues
        .saturating_sub(stats.analyzed_issues + stats.catalyzed_issues);
    stats
}

/// Groups issues by effective category, lowercased.
pub fn group_by_category(issues: &[Issue]) -> BTreeMap<String, Vec<&Issue>> {
    let mut groups: BTreeMap<String, Vec<&Issue>> = BTreeMap::new();
    for issue in issues {
        groups
            .entry(issue.effective_category().to_lowercase())
            .or_default()
            .push(issue);
    }
    groups
}
