use crate::analysis::overview::account_overview;
use crate::models::account::{Account, AccountOverview};
use crate::models::dashboard::{DashboardState, ModalKind, ModalState, SharedState};
use chrono::{DateTime, Utc};

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn list_accounts(state: tauri::State<'_, SharedState>) -> Result<Vec<Account>, String> {
    list_accounts_internal(state.inner())
}

pub fn list_accounts_internal(state: &SharedState) -> Result<Vec<Account>, String> {
    let lock = state.lock().map_err(|_| "State lock error".to_string())?;
    Ok(lock.accounts.clone())
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn select_account(
    account_id: String,
    state: tauri::State<'_, SharedState>,
) -> Result<AccountOverview, String> {
    select_account_internal(state.inner(), &account_id, Utc::now())
}

pub fn select_account_internal(
    state: &SharedState,
    account_id: &str,
    now: DateTime<Utc>,
) -> Result<AccountOverview, String> {
    let mut lock = state.lock().map_err(|_| "State lock error".to_string())?;
    lock.select_account(account_id)?;
    overview_of(&lock, now)
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_account_overview(
    state: tauri::State<'_, SharedState>,
) -> Result<AccountOverview, String> {
    get_account_overview_internal(state.inner(), Utc::now())
}

pub fn get_account_overview_internal(
    state: &SharedState,
    now: DateTime<Utc>,
) -> Result<AccountOverview, String> {
    let lock = state.lock().map_err(|_| "State lock error".to_string())?;
    overview_of(&lock, now)
}

fn overview_of(dashboard: &DashboardState, now: DateTime<Utc>) -> Result<AccountOverview, String> {
    let account = dashboard.selected_account()?;
    Ok(account_overview(account, &dashboard.issues, now))
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn open_modal(
    kind: ModalKind,
    issue_id: Option<String>,
    state: tauri::State<'_, SharedState>,
) -> Result<ModalState, String> {
    set_modal_internal(state.inner(), kind, true, issue_id)
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn close_modal(
    kind: ModalKind,
    state: tauri::State<'_, SharedState>,
) -> Result<ModalState, String> {
    set_modal_internal(state.inner(), kind, false, None)
}

pub fn set_modal_internal(
    state: &SharedState,
    kind: ModalKind,
    open: bool,
    issue_id: Option<String>,
) -> Result<ModalState, String> {
    let mut lock = state.lock().map_err(|_| "State lock error".to_string())?;
    if open {
        if let Some(id) = &issue_id {
            lock.issue(id)?;
        } else if kind != ModalKind::Contact {
            return Err(format!("{kind:?} dialog needs an issue"));
        }
        lock.modals.open(kind, issue_id);
    } else {
        lock.modals.close(kind);
    }
    Ok(lock.modals.clone())
}
