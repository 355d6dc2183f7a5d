use crate::models::account::Account;
use crate::models::dashboard::DashboardState;
use crate::models::issue::{Channel, Issue, IssueStatus, RegionType, WorkflowStatus};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

const SEED_JSON: &str = include_str!("../../data/seed.json");

/// Seed issues carry ages instead of timestamps so the mock data never goes stale.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedIssue {
    id: String,
    account_id: String,
    title: String,
    description: String,
    declared_priority: String,
    status: IssueStatus,
    #[serde(default)]
    workflow_status: WorkflowStatus,
    opened_days_ago: i64,
    #[serde(default)]
    solved_days_ago: Option<i64>,
    category: String,
    channel: Channel,
    #[serde(default)]
    region_type: Option<RegionType>,
    #[serde(default)]
    region_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SeedFile {
    accounts: Vec<Account>,
    issues: Vec<SeedIssue>,
}

impl SeedIssue {
    fn into_issue(self, now: DateTime<Utc>) -> Issue {
        let solved_at = match self.status {
            IssueStatus::Solved => Some(now - Duration::days(self.solved_days_ago.unwrap_or(0))),
            IssueStatus::Unsolved => None,
        };

        Issue {
            id: self.id,
            account_id: self.account_id,
            title: self.title,
            description: self.description,
            declared_priority: self.declared_priority,
            status: self.status,
            workflow_status: self.workflow_status,
            created_at: now - Duration::days(self.opened_days_ago),
            solved_at,
            category: self.category,
            channel: self.channel,
            region_type: self.region_type,
            region_name: self.region_name,
            manual_categorization: None,
            resolution: None,
            opportunity: None,
            activity: Vec::new(),
        }
    }
}

pub fn load_seed(now: DateTime<Utc>) -> Result<(Vec<Account>, Vec<Issue>), String> {
    let seed: SeedFile =
        serde_json::from_str(SEED_JSON).map_err(|e| format!("Failed to parse seed data: {e}"))?;
    let issues = seed
        .issues
        .into_iter()
        .map(|issue| issue.into_issue(now))
        .collect();
    Ok((seed.accounts, issues))
}

pub fn initial_state(now: DateTime<Utc>) -> Result<DashboardState, String> {
    let (accounts, issues) = load_seed(now)?;
    log::info!("loaded {} accounts and {} issues from seed", accounts.len(), issues.len());
    Ok(DashboardState::new(accounts, issues))
}
