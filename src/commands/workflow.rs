use crate::analysis::workflow::{
    apply_resolution_action, is_valid_analysis, record_opportunity, save_categorization,
    validate_analysis, CategorizationDraft, ResolutionAction, MIN_ANALYSIS_CHARS,
};
use crate::models::analysis::IssueAnalysis;
use crate::models::dashboard::{DashboardState, ModalKind, SharedState};
use crate::models::issue::Issue;
use chrono::{DateTime, Utc};
use uuid::Uuid;

fn find_issue<'a>(issues: &'a mut [Issue], issue_id: &str) -> Result<&'a mut Issue, String> {
    issues
        .iter_mut()
        .find(|i| i.id == issue_id)
        .ok_or(format!("Issue not found: {issue_id}"))
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn save_manual_categorization(
    issue_id: String,
    draft: CategorizationDraft,
    state: tauri::State<'_, SharedState>,
) -> Result<Issue, String> {
    save_categorization_internal(state.inner(), &issue_id, &draft, Utc::now())
}

pub fn save_categorization_internal(
    state: &SharedState,
    issue_id: &str,
    draft: &CategorizationDraft,
    now: DateTime<Utc>,
) -> Result<Issue, String> {
    let mut lock = state.lock().map_err(|_| "State lock error".to_string())?;
    let reviewer = lock.reviewer.clone();
    let issue = lock.issue_mut(issue_id)?;

    if let Err(reason) = save_categorization(issue, draft, &reviewer, now) {
        log::warn!("categorization of {issue_id} rejected: {reason}");
        return Err(reason);
    }
    let updated = issue.clone();

    log::info!("issue {issue_id} categorized as {}", updated.effective_category());
    lock.modals.close(ModalKind::Categorization);
    lock.touch();
    Ok(updated)
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn add_analysis(
    issue_id: String,
    text: String,
    state: tauri::State<'_, SharedState>,
) -> Result<IssueAnalysis, String> {
    add_analysis_internal(state.inner(), &issue_id, &text, Utc::now())
}

pub fn add_analysis_internal(
    state: &SharedState,
    issue_id: &str,
    text: &str,
    now: DateTime<Utc>,
) -> Result<IssueAnalysis, String> {
    let mut lock = state.lock().map_err(|_| "State lock error".to_string())?;
    let issue = lock.issue(issue_id)?;
    if issue.is_solved() {
        return Err(format!("Issue {issue_id} is already solved"));
    }
    if !is_valid_analysis(text) {
        log::warn!("analysis for {issue_id} rejected: too short");
        return Err(format!(
            "Analysis must be at least {MIN_ANALYSIS_CHARS} characters"
        ));
    }

    let analysis = IssueAnalysis::new(issue_id, &lock.reviewer, text, now);
    log::info!("analysis {} attached to {issue_id}", analysis.id);
    lock.analyses.push(analysis.clone());
    lock.touch();
    Ok(analysis)
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn validate_issue_analysis(
    analysis_id: String,
    state: tauri::State<'_, SharedState>,
) -> Result<IssueAnalysis, String> {
    validate_analysis_internal(state.inner(), &analysis_id, Utc::now())
}

pub fn validate_analysis_internal(
    state: &SharedState,
    analysis_id: &str,
    now: DateTime<Utc>,
) -> Result<IssueAnalysis, String> {
    let mut lock = state.lock().map_err(|_| "State lock error".to_string())?;
    let DashboardState {
        issues,
        analyses,
        reviewer,
        ..
    } = &mut *lock;

    let wanted = Uuid::parse_str(analysis_id)
        .map_err(|_| format!("Analysis not found: {analysis_id}"))?;
    let analysis = analyses
        .iter_mut()
        .find(|a| a.id == wanted)
        .ok_or(format!("Analysis not found: {analysis_id}"))?;
    let issue = find_issue(issues, &analysis.issue_id)?;

    validate_analysis(issue, analysis, reviewer, now)?;
    let validated = analysis.clone();

    log::info!("analysis {analysis_id} validated by {reviewer}");
    lock.touch();
    Ok(validated)
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn take_resolution_action(
    issue_id: String,
    action: ResolutionAction,
    notes: String,
    state: tauri::State<'_, SharedState>,
) -> Result<Issue, String> {
    resolution_action_internal(state.inner(), &issue_id, action, &notes, Utc::now())
}

pub fn resolution_action_internal(
    state: &SharedState,
    issue_id: &str,
    action: ResolutionAction,
    notes: &str,
    now: DateTime<Utc>,
) -> Result<Issue, String> {
    let mut lock = state.lock().map_err(|_| "State lock error".to_string())?;
    let DashboardState {
        issues,
        analyses,
        reviewer,
        ..
    } = &mut *lock;

    let issue = find_issue(issues, issue_id)?;
    if let Err(reason) = apply_resolution_action(issue, analyses, action, notes, reviewer, now) {
        log::warn!("{action:?} on {issue_id} rejected: {reason}");
        return Err(reason);
    }
    let updated = issue.clone();

    log::info!("{action:?} applied to {issue_id}");
    if action == ResolutionAction::Resolve || action == ResolutionAction::Close {
        lock.modals.close(ModalKind::Resolution);
    }
    lock.touch();
    Ok(updated)
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn record_issue_opportunity(
    issue_id: String,
    notes: String,
    text: String,
    state: tauri::State<'_, SharedState>,
) -> Result<Issue, String> {
    record_opportunity_internal(state.inner(), &issue_id, &notes, &text, Utc::now())
}

pub fn record_opportunity_internal(
    state: &SharedState,
    issue_id: &str,
    notes: &str,
    text: &str,
    now: DateTime<Utc>,
) -> Result<Issue, String> {
    let mut lock = state.lock().map_err(|_| "State lock error".to_string())?;
    let reviewer = lock.reviewer.clone();
    let issue = lock.issue_mut(issue_id)?;

    record_opportunity(issue, notes, text, &reviewer, now)?;
    let updated = issue.clone();

    log::info!("opportunity recorded on {issue_id}");
    lock.touch();
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::issues::{get_statistics_internal, list_issues_internal};
    use crate::commands::seed::initial_state;
    use crate::models::issue::{IssueStatus, Priority, WorkflowStatus};
    use std::sync::{Arc, Mutex};

    fn shared(now: DateTime<Utc>) -> SharedState {
        Arc::new(Mutex::new(initial_state(now).unwrap()))
    }

    #[test]
    fn categorization_updates_filtered_views_immediately() {
        let now = Utc::now();
        let state = shared(now);
        let before = get_statistics_internal(&state, now).unwrap();

        let draft = CategorizationDraft {
            category_type: "billing".to_string(),
            reason: "x".repeat(19),
            priority: Some(Priority::High),
        };
        assert!(save_categorization_internal(&state, "ISS-1004", &draft, now).is_err());

        let draft = CategorizationDraft {
            reason: "x".repeat(20),
            ..draft
        };
        let updated = save_categorization_internal(&state, "ISS-1004", &draft, now).unwrap();
        assert_eq!(updated.effective_category(), "billing");
        assert_eq!(updated.workflow_status, WorkflowStatus::Analyzed);

        state.lock().unwrap().facets.category = Some("billing".to_string());
        let ids: Vec<String> = list_issues_internal(&state, now)
            .unwrap()
            .into_iter()
            .map(|v| v.issue.id)
            .collect();
        assert!(ids.contains(&"ISS-1004".to_string()));

        state.lock().unwrap().facets.category = None;
        let after = get_statistics_internal(&state, now).unwrap();
        assert_eq!(after.analyzed_issues, before.analyzed_issues + 1);
        assert_eq!(after.new_issues, before.new_issues - 1);
    }

    #[test]
    fn short_analysis_is_rejected() {
        let now = Utc::now();
        let state = shared(now);
        assert!(add_analysis_internal(&state, "ISS-1004", "too short", now).is_err());
        assert!(add_analysis_internal(&state, "ISS-404", &"x".repeat(30), now).is_err());
        assert!(state.lock().unwrap().analyses.is_empty());
    }

    #[test]
    fn full_resolution_flow() {
        let now = Utc::now();
        let state = shared(now);

        let blocked = resolution_action_internal(
            &state,
            "ISS-1001",
            ResolutionAction::Resolve,
            "Resubmitted with corrected codes",
            now,
        );
        assert!(blocked.is_err());

        let analysis = add_analysis_internal(
            &state,
            "ISS-1001",
            "Payer updated modifier rules; clearinghouse mapping is stale",
            now,
        )
        .unwrap();
        validate_analysis_internal(&state, &analysis.id.to_string(), now).unwrap();

        let resolved = resolution_action_internal(
            &state,
            "ISS-1001",
            ResolutionAction::Resolve,
            "Resubmitted with corrected codes",
            now,
        )
        .unwrap();
        assert_eq!(resolved.status, IssueStatus::Solved);
        assert_eq!(resolved.solved_at, Some(now));

        let again =
            resolution_action_internal(&state, "ISS-1001", ResolutionAction::Escalate, "", now);
        assert!(again.is_err());
    }

    #[test]
    fn opportunity_catalyzes_issue() {
        let now = Utc::now();
        let state = shared(now);
        let offer = "Offer RPM cellular cuffs";
        assert!(record_opportunity_internal(&state, "ISS-1002", "short", offer, now).is_err());

        let updated = record_opportunity_internal(
            &state,
            "ISS-1002",
            "Firmware update resolves sync",
            offer,
            now,
        )
        .unwrap();
        assert_eq!(updated.workflow_status, WorkflowStatus::Catalyzed);
    }

    #[test]
    fn validating_unknown_analysis_fails() {
        let state = shared(Utc::now());
        assert!(validate_analysis_internal(&state, "nope", Utc::now()).is_err());
        let unknown = Uuid::new_v4().to_string();
        assert!(validate_analysis_internal(&state, &unknown, Utc::now()).is_err());
    }
}
