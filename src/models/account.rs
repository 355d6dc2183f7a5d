use crate::models::issue::RegionType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountContact {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub meeting_link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountMetrics {
    pub total_patients: u32,
    pub billable_patients: u32,
    pub active_patients: u32,
    pub monthly_revenue: f64,
    pub prior_month_revenue: f64,
    pub open_tickets: u32,
    pub onboarding_steps_completed: u32,
    pub onboarding_steps_total: u32,
}

/// A physician group customer account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    pub region_type: RegionType,
    pub region_name: String,
    pub contact: AccountContact,
    pub metrics: AccountMetrics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChurnRisk {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountOverview {
    pub account_id: String,
    pub account_name: String,
    pub billability_rate: f64,
    pub engagement_rate: f64,
    pub revenue_change_pct: f64,
    pub monthly_revenue: f64,
    pub onboarding_progress: f64,
    pub open_tickets: u32,
    pub unsolved_issues: usize,
    pub critical_issues: usize,
    pub churn_risk: ChurnRisk,
    pub churn_signals: Vec<String>,
}
