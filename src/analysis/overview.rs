use crate::analysis::priority::compute_priority;
use crate::models::account::{Account, AccountOverview, ChurnRisk};
use crate::models::issue::{Issue, Priority};
use chrono::{DateTime, Utc};

/// Percentage of `part` in `whole`; zero when `whole` is zero.
fn percent(part: f64, whole: f64) -> f64 {
    if whole.abs() < f64::EPSILON {
        0.0
    } else {
        part / whole * 100.0
    }
}

/// Churn risk points:
/// - engagement below 60% = 2, below 75% = 1
/// - revenue down more than 10% = 2, any decline = 1
/// - one per unsolved critical issue, at most 2
pub fn churn_risk(
    engagement_rate: f64,
    revenue_change_pct: f64,
    critical_issues: usize,
) -> (ChurnRisk, Vec<String>) {
    let mut points = 0;
    let mut signals = Vec::new();

    if engagement_rate < 60.0 {
        points += 2;
        signals.push(format!("engagement {engagement_rate:.0}% is below 60%"));
    } else if engagement_rate < 75.0 {
        points += 1;
        signals.push(format!("engagement {engagement_rate:.0}% is below 75%"));
    }

    if revenue_change_pct < -10.0 {
        points += 2;
        signals.push(format!("revenue down {:.1}% month over month", -revenue_change_pct));
    } else if revenue_change_pct < 0.0 {
        points += 1;
        signals.push(format!("revenue down {:.1}% month over month", -revenue_change_pct));
    }

    if critical_issues > 0 {
        points += critical_issues.min(2);
        signals.push(format!("{critical_issues} unsolved critical issue(s)"));
    }

    let risk = if points >= 4 {
        ChurnRisk::High
    } else if points >= 2 {
        ChurnRisk::Medium
    } else {
        ChurnRisk::Low
    };
    (risk, signals)
}

pub fn account_overview(
    account: &Account,
    issues: &[Issue],
    now: DateTime<Utc>,
) -> AccountOverview {
    let m = &account.metrics;
    let billability_rate = percent(m.billable_patients as f64, m.total_patients as f64);
    let engagement_rate = percent(m.active_patients as f64, m.total_patients as f64);
    let revenue_change_pct = percent(
        m.monthly_revenue - m.prior_month_revenue,
        m.prior_month_revenue,
    );
    let onboarding_progress = percent(
        m.onboarding_steps_completed as f64,
        m.onboarding_steps_total as f64,
    );

    let unsolved: Vec<&Issue> = issues
        .iter()
        .filter(|i| i.account_id == account.id && !i.is_solved())
        .collect();
    let critical_issues = unsolved
        .iter()
        .filter(|i| compute_priority(i, now).tier == Priority::Critical)
        .count();

    let (churn_risk, churn_signals) =
        churn_risk(engagement_rate, revenue_change_pct, critical_issues);

    AccountOverview {
        account_id: account.id.clone(),
        account_name: account.name.clone(),
        billability_rate,
        engagement_rate,
        revenue_change_pct,
        monthly_revenue: m.monthly_revenue,
        onboarding_progress: onboarding_progress.min(100.0),
        open_tickets: m.open_tickets,
        unsolved_issues: unsolved.len(),
        critical_issues,
        churn_risk,
        churn_signals,
    }
}
