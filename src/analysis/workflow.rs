use crate::models::analysis::IssueAnalysis;
use crate::models::issue::{
    ActivityKind, Issue, IssueStatus, ManualCategorization, Opportunity, Priority, Resolution,
    WorkflowStatus,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MIN_CATEGORIZATION_REASON_CHARS: usize = 20;
pub const MIN_ANALYSIS_CHARS: usize = 20;
pub const MIN_RESOLUTION_NOTES_CHARS: usize = 10;
pub const MIN_OPPORTUNITY_CHARS: usize = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategorizationDraft {
    #[serde(rename = "type")]
    pub category_type: String,
    pub reason: String,
    pub priority: Option<Priority>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionAction {
    Resolve,
    Escalate,
    RequestInfo,
    Close,
}

/// Enabled/disabled state of every gated control for one issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowGates {
    pub has_validated_analysis: bool,
    pub resolution_actions_enabled: bool,
    pub resolve_enabled: bool,
    pub opportunity_enabled: bool,
}

fn text_len(text: &str) -> usize {
    text.trim().chars().count()
}

pub fn can_save_categorization(draft: &CategorizationDraft) -> bool {
    !draft.category_type.trim().is_empty()
        && text_len(&draft.reason) >= MIN_CATEGORIZATION_REASON_CHARS
        && draft.priority.is_some()
}

pub fn is_valid_analysis(text: &str) -> bool {
    text_len(text) >= MIN_ANALYSIS_CHARS
}

pub fn has_validated_analysis(issue_id: &str, analyses: &[IssueAnalysis]) -> bool {
    analyses
        .iter()
        .any(|a| a.issue_id == issue_id && a.validated)
}

/// Escalate, request-info and close need only a validated analysis.
pub fn can_take_resolution_action(issue: &Issue, analyses: &[IssueAnalysis]) -> bool {
    !issue.is_solved() && has_validated_analysis(&issue.id, analyses)
}

pub fn can_resolve(issue: &Issue, analyses: &[IssueAnalysis], notes: &str) -> bool {
    can_take_resolution_action(issue, analyses) && text_len(notes) >= MIN_RESOLUTION_NOTES_CHARS
}

pub fn can_attach_opportunity(notes: &str, opportunity: &str) -> bool {
    text_len(notes) >= MIN_RESOLUTION_NOTES_CHARS && text_len(opportunity) >= MIN_OPPORTUNITY_CHARS
}

pub fn gates_for(issue: &Issue, analyses: &[IssueAnalysis], notes: &str) -> WorkflowGates {
    WorkflowGates {
        has_validated_analysis: has_validated_analysis(&issue.id, analyses),
        resolution_actions_enabled: can_take_resolution_action(issue, analyses),
        resolve_enabled: can_resolve(issue, analyses, notes),
        opportunity_enabled: !issue.is_solved() && text_len(notes) >= MIN_RESOLUTION_NOTES_CHARS,
    }
}

fn ensure_unsolved(issue: &Issue) -> Result<(), String> {
    if issue.is_solved() {
        return Err(format!("Issue {} is already solved", issue.id));
    }
    Ok(())
}

fn advance_to(issue: &mut Issue, target: WorkflowStatus) {
    let current = issue.workflow_status;
    let should_advance = match target {
        WorkflowStatus::Analyzed => matches!(current, WorkflowStatus::New | WorkflowStatus::Other),
        WorkflowStatus::Catalyzed => current != WorkflowStatus::Catalyzed,
        WorkflowStatus::New | WorkflowStatus::Other => false,
    };
    if should_advance {
        log::debug!("issue {} workflow {:?} -> {:?}", issue.id, current, target);
        issue.workflow_status = target;
    }
}

/// Creates or replaces the manual categorization and moves a new issue to analyzed.
pub fn save_categorization(
    issue: &mut Issue,
    draft: &CategorizationDraft,
    categorized_by: &str,
    now: DateTime<Utc>,
) -> Result<(), String> {
    ensure_unsolved(issue)?;
    let Some(priority) = draft.priority.filter(|_| can_save_categorization(draft)) else {
        return Err(format!(
            "Categorization needs a type, a priority and a reason of at least {MIN_CATEGORIZATION_REASON_CHARS} characters"
        ));
    };

    let edited = issue.manual_categorization.is_some();
    issue.manual_categorization = Some(ManualCategorization {
        category_type: draft.category_type.trim().to_string(),
        reason: draft.reason.trim().to_string(),
        priority,
        categorized_by: categorized_by.to_string(),
        categorized_at: now,
    });
    let note = format!(
        "{} as {} ({})",
        if edited { "recategorized" } else { "categorized" },
        draft.category_type.trim(),
        priority.label()
    );
    issue.record(ActivityKind::Categorized, categorized_by, Some(note), now);
    advance_to(issue, WorkflowStatus::Analyzed);
    Ok(())
}

pub fn validate_analysis(
    issue: &mut Issue,
    analysis: &mut IssueAnalysis,
    reviewer: &str,
    now: DateTime<Utc>,
) -> Result<(), String> {
    if analysis.issue_id != issue.id {
        return Err(format!(
            "Analysis {} does not belong to issue {}",
            analysis.id, issue.id
        ));
    }
    ensure_unsolved(issue)?;
    if analysis.validated {
        return Ok(());
    }

    analysis.mark_validated(reviewer, now);
    issue.record(ActivityKind::AnalysisValidated, reviewer, Some(analysis.id.to_string()), now);
    advance_to(issue, WorkflowStatus::Analyzed);
    Ok(())
}

/// Opportunity capture unlocks once resolution notes reach the minimum.
pub fn record_opportunity(
    issue: &mut Issue,
    notes: &str,
    text: &str,
    recorded_by: &str,
    now: DateTime<Utc>,
) -> Result<(), String> {
    ensure_unsolved(issue)?;
    if !can_attach_opportunity(notes, text) {
        return Err(format!(
            "Opportunity needs resolution notes and text of at least {MIN_OPPORTUNITY_CHARS} characters each"
        ));
    }

    issue.opportunity = Some(Opportunity {
        text: text.trim().to_string(),
        recorded_by: recorded_by.to_string(),
        recorded_at: now,
    });
    let note = Some(text.trim().to_string());
    issue.record(ActivityKind::OpportunityRecorded, recorded_by, note, now);
    advance_to(issue, WorkflowStatus::Catalyzed);
    Ok(())
}

pub fn apply_resolution_action(
    issue: &mut Issue,
    analyses: &[IssueAnalysis],
    action: ResolutionAction,
    notes: &str,
    actor: &str,
    now: DateTime<Utc>,
) -> Result<(), String> {
    ensure_unsolved(issue)?;
    if !can_take_resolution_action(issue, analyses) {
        return Err(format!(
            "Issue {} needs a validated analysis before resolution actions",
            issue.id
        ));
    }

    let note = Some(notes.trim().to_string()).filter(|n| !n.is_empty());
    match action {
        ResolutionAction::Resolve => {
            if !can_resolve(issue, analyses, notes) {
                return Err(format!(
                    "Resolution notes must be at least {MIN_RESOLUTION_NOTES_CHARS} characters"
                ));
            }
            issue.status = IssueStatus::Solved;
            issue.solved_at = Some(now);
            issue.resolution = Some(Resolution {
                notes: notes.trim().to_string(),
                resolved_by: actor.to_string(),
                resolved_at: now,
            });
            issue.record(ActivityKind::Resolved, actor, note, now);
        }
        ResolutionAction::Escalate => issue.record(ActivityKind::Escalated, actor, note, now),
        ResolutionAction::RequestInfo => {
            issue.record(ActivityKind::InfoRequested, actor, note, now)
        }
        ResolutionAction::Close => issue.record(ActivityKind::ReviewClosed, actor, note, now),
    }
    Ok(())
}
