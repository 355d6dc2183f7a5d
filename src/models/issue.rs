use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Priority tier, both as a manual label and as the computed tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "critical" => Some(Priority::Critical),
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueStatus {
    Unsolved,
    Solved,
}

/// Sub-state of an unsolved issue. Seed data may carry values outside the
/// known set; those deserialize to `Other` and count as new.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    #[default]
    New,
    Analyzed,
    Catalyzed,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Call,
    Ticket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegionType {
    Division,
    DivisionalGroup,
    Msa,
    Gsa,
}

/// Mutually exclusive status bucket derived from `status` + `workflow_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusBucket {
    New,
    Analyzed,
    Catalyzed,
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualCategorization {
    #[serde(rename = "type")]
    pub category_type: String,
    pub reason: String,
    pub priority: Priority,
    pub categorized_by: String,
    pub categorized_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub notes: String,
    pub resolved_by: String,
    pub resolved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub text: String,
    pub recorded_by: String,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Categorized,
    AnalysisValidated,
    Escalated,
    InfoRequested,
    ReviewClosed,
    OpportunityRecorded,
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub kind: ActivityKind,
    pub actor: String,
    pub note: Option<String>,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    pub account_id: String,
    pub title: String,
    pub description: String,
    pub declared_priority: String,
    pub status: IssueStatus,
    #[serde(default)]
    pub workflow_status: WorkflowStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub solved_at: Option<DateTime<Utc>>,
    pub category: String,
    pub channel: Channel,
    #[serde(default)]
    pub region_type: Option<RegionType>,
    #[serde(default)]
    pub region_name: Option<String>,
    #[serde(default)]
    pub manual_categorization: Option<ManualCategorization>,
    #[serde(default)]
    pub resolution: Option<Resolution>,
    #[serde(default)]
    pub opportunity: Option<Opportunity>,
    #[serde(default)]
    pub activity: Vec<ActivityEntry>,
}

impl Issue {
    /// Manual override wins over the reported category.
    pub fn effective_category(&self) -> &str {
        self.manual_categorization
            .as_ref()
            .map(|m| m.category_type.as_str())
            .unwrap_or(&self.category)
    }

    pub fn is_solved(&self) -> bool {
        self.status == IssueStatus::Solved
    }

    pub fn status_bucket(&self) -> StatusBucket {
        if self.is_solved() {
            return StatusBucket::Resolved;
        }
        match self.workflow_status {
            WorkflowStatus::Analyzed => StatusBucket::Analyzed,
            WorkflowStatus::Catalyzed => StatusBucket::Catalyzed,
            WorkflowStatus::New | WorkflowStatus::Other => StatusBucket::New,
        }
    }

    pub fn record(
        &mut self,
        kind: ActivityKind,
        actor: &str,
        note: Option<String>,
        at: DateTime<Utc>,
    ) {
        self.activity.push(ActivityEntry {
            kind,
            actor: actor.to_string(),
            note,
            at,
        });
    }
}
