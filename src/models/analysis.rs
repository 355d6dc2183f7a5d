use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Free-text diagnosis attached to an issue, pending reviewer validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueAnalysis {
    pub id: Uuid,
    pub issue_id: String,
    pub author: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub validated: bool,
    pub validated_by: Option<String>,
    pub validated_at: Option<DateTime<Utc>>,
}

impl IssueAnalysis {
    pub fn new(issue_id: &str, author: &str, text: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            issue_id: issue_id.to_string(),
            author: author.to_string(),
            text: text.trim().to_string(),
            created_at,
            validated: false,
            validated_by: None,
            validated_at: None,
        }
    }

    pub fn mark_validated(&mut self, reviewer: &str, at: DateTime<Utc>) {
        self.validated = true;
        self.validated_by = Some(reviewer.to_string());
        self.validated_at = Some(at);
    }
}
