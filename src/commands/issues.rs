use crate::analysis::filters::{filter_issues, group_by_category, IssueStatistics, ScoredIssue};
use crate::analysis::priority::{compute_priority, PriorityAssessment};
use crate::analysis::workflow::{gates_for, WorkflowGates};
use crate::models::analysis::IssueAnalysis;
use crate::models::dashboard::SharedState;
use crate::models::facets::{FacetSelection, FacetUpdate};
use crate::models::issue::{Issue, StatusBucket};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueView {
    pub issue: Issue,
    pub assessment: PriorityAssessment,
    pub bucket: StatusBucket,
}

impl From<ScoredIssue<'_>> for IssueView {
    fn from(scored: ScoredIssue<'_>) -> Self {
        IssueView {
            issue: scored.issue.clone(),
            bucket: scored.issue.status_bucket(),
            assessment: scored.assessment,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueDetail {
    pub view: IssueView,
    pub analyses: Vec<IssueAnalysis>,
    pub gates: WorkflowGates,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryGroup {
    pub category: String,
    pub issue_ids: Vec<String>,
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn list_issues(state: tauri::State<'_, SharedState>) -> Result<Vec<IssueView>, String> {
    list_issues_internal(state.inner(), Utc::now())
}

pub fn list_issues_internal(
    state: &SharedState,
    now: DateTime<Utc>,
) -> Result<Vec<IssueView>, String> {
    let lock = state.lock().map_err(|_| "State lock error".to_string())?;
    let issues = lock.account_issues();
    let views = filter_issues(&issues, &lock.facets, now)
        .into_iter()
        .map(IssueView::from)
        .collect();
    Ok(views)
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_statistics(
    state: tauri::State<'_, SharedState>,
) -> Result<IssueStatistics, String> {
    get_statistics_internal(state.inner(), Utc::now())
}

pub fn get_statistics_internal(
    state: &SharedState,
    now: DateTime<Utc>,
) -> Result<IssueStatistics, String> {
    let mut lock = state.lock().map_err(|_| "State lock error".to_string())?;
    Ok(lock.statistics(now))
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_facets(state: tauri::State<'_, SharedState>) -> Result<FacetSelection, String> {
    get_facets_internal(state.inner())
}

pub fn get_facets_internal(state: &SharedState) -> Result<FacetSelection, String> {
    let lock = state.lock().map_err(|_| "State lock error".to_string())?;
    Ok(lock.facets.clone())
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn update_facets(
    update: FacetUpdate,
    state: tauri::State<'_, SharedState>,
) -> Result<FacetSelection, String> {
    update_facets_internal(state.inner(), update)
}

pub fn update_facets_internal(
    state: &SharedState,
    update: FacetUpdate,
) -> Result<FacetSelection, String> {
    let mut lock = state.lock().map_err(|_| "State lock error".to_string())?;
    update.apply_to(&mut lock.facets);
    log::debug!("facets now {:?}", lock.facets);
    Ok(lock.facets.clone())
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn reset_facets(state: tauri::State<'_, SharedState>) -> Result<FacetSelection, String> {
    reset_facets_internal(state.inner())
}

pub fn reset_facets_internal(state: &SharedState) -> Result<FacetSelection, String> {
    let mut lock = state.lock().map_err(|_| "State lock error".to_string())?;
    lock.facets = FacetSelection::default();
    Ok(lock.facets.clone())
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_issue_detail(
    issue_id: String,
    draft_notes: Option<String>,
    state: tauri::State<'_, SharedState>,
) -> Result<IssueDetail, String> {
    get_issue_detail_internal(
        state.inner(),
        &issue_id,
        draft_notes.as_deref().unwrap_or_default(),
        Utc::now(),
    )
}

/// `draft_notes` is the resolution text currently typed, which drives the gates.
pub fn get_issue_detail_internal(
    state: &SharedState,
    issue_id: &str,
    draft_notes: &str,
    now: DateTime<Utc>,
) -> Result<IssueDetail, String> {
    let lock = state.lock().map_err(|_| "State lock error".to_string())?;
    let issue = lock.issue(issue_id)?;
    let analyses = lock.analyses_for(issue_id);

    Ok(IssueDetail {
        view: IssueView {
            issue: issue.clone(),
            assessment: compute_priority(issue, now),
            bucket: issue.status_bucket(),
        },
        gates: gates_for(issue, &analyses, draft_notes),
        analyses,
    })
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn list_categories(
    state: tauri::State<'_, SharedState>,
) -> Result<Vec<CategoryGroup>, String> {
    list_categories_internal(state.inner())
}

pub fn list_categories_internal(state: &SharedState) -> Result<Vec<CategoryGroup>, String> {
    let lock = state.lock().map_err(|_| "State lock error".to_string())?;
    let issues = lock.account_issues();
    Ok(group_by_category(&issues)
        .into_iter()
        .map(|(category, members)| CategoryGroup {
            category,
            issue_ids: members.iter().map(|i| i.id.clone()).collect(),
        })
        .collect())
}
