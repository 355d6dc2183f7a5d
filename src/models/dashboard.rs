use crate::analysis::filters::{compute_statistics, IssueStatistics};
use crate::models::account::Account;
use crate::models::analysis::IssueAnalysis;
use crate::models::facets::FacetSelection;
use crate::models::issue::Issue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub type SharedState = Arc<Mutex<DashboardState>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModalKind {
    Categorization,
    Analysis,
    Resolution,
    Contact,
}

/// Which dialogs are open, and for which issue. All closed by default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModalState {
    pub categorization: Option<String>,
    pub analysis: Option<String>,
    pub resolution: Option<String>,
    pub contact: bool,
}

impl ModalState {
    pub fn open(&mut self, kind: ModalKind, issue_id: Option<String>) {
        match kind {
            ModalKind::Categorization => self.categorization = issue_id,
            ModalKind::Analysis => self.analysis = issue_id,
            ModalKind::Resolution => self.resolution = issue_id,
            ModalKind::Contact => self.contact = true,
        }
    }

    pub fn close(&mut self, kind: ModalKind) {
        match kind {
            ModalKind::Categorization => self.categorization = None,
            ModalKind::Analysis => self.analysis = None,
            ModalKind::Resolution => self.resolution = None,
            ModalKind::Contact => self.contact = false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct StatsKey {
    account_id: String,
    facets: FacetSelection,
    revision: u64,
    now: i64,
}

/// Whole application state for one dashboard window.
#[derive(Debug, Default)]
pub struct DashboardState {
    pub accounts: Vec<Account>,
    /// Defaults to the first account.
    pub selected_account_id: String,
    pub facets: FacetSelection,
    pub modals: ModalState,
    pub issues: Vec<Issue>,
    pub analyses: Vec<IssueAnalysis>,
    /// Name stamped on categorizations, validations and resolutions.
    pub reviewer: String,
    /// Appended to outgoing email and SMS drafts.
    pub contact_signature: String,
    revision: u64,
    stats_cache: HashMap<StatsKey, IssueStatistics>,
}

impl DashboardState {
    pub fn new(accounts: Vec<Account>, issues: Vec<Issue>) -> Self {
        let selected_account_id = accounts.first().map(|a| a.id.clone()).unwrap_or_default();
        Self {
            accounts,
            selected_account_id,
            issues,
            reviewer: "Customer Success".to_string(),
            contact_signature: "Customer Success Team".to_string(),
            ..Self::default()
        }
    }

    pub fn selected_account(&self) -> Result<&Account, String> {
        self.accounts
            .iter()
            .find(|a| a.id == self.selected_account_id)
            .ok_or(format!("Account not found: {}", self.selected_account_id))
    }

    pub fn select_account(&mut self, account_id: &str) -> Result<(), String> {
        if !self.accounts.iter().any(|a| a.id == account_id) {
            return Err(format!("Account not found: {account_id}"));
        }
        if self.selected_account_id != account_id {
            log::info!("selected account {account_id}");
            self.selected_account_id = account_id.to_string();
            self.modals = ModalState::default();
        }
        Ok(())
    }

    /// Issues of the selected account.
    pub fn account_issues(&self) -> Vec<Issue> {
        self.issues
            .iter()
            .filter(|i| i.account_id == self.selected_account_id)
            .cloned()
            .collect()
    }

    pub fn issue(&self, issue_id: &str) -> Result<&Issue, String> {
        self.issues
            .iter()
            .find(|i| i.id == issue_id)
            .ok_or(format!("Issue not found: {issue_id}"))
    }

    pub fn issue_mut(&mut self, issue_id: &str) -> Result<&mut Issue, String> {
        self.issues
            .iter_mut()
            .find(|i| i.id == issue_id)
            .ok_or(format!("Issue not found: {issue_id}"))
    }

    pub fn analyses_for(&self, issue_id: &str) -> Vec<IssueAnalysis> {
        self.analyses
            .iter()
            .filter(|a| a.issue_id == issue_id)
            .cloned()
            .collect()
    }

    /// Marks issue data as changed so derived views are recomputed.
    pub fn touch(&mut self) {
        self.revision += 1;
        self.stats_cache.clear();
    }

    /// Statistics for the current facets. Only the latest key is kept, since
    /// the clock moves on every read.
    pub fn statistics(&mut self, now: DateTime<Utc>) -> IssueStatistics {
        let key = StatsKey {
            account_id: self.selected_account_id.clone(),
            facets: self.facets.without_status(),
            revision: self.revision,
            now: now.timestamp(),
        };
        if let Some(cached) = self.stats_cache.get(&key) {
            log::debug!("statistics cache hit (revision {})", self.revision);
            return *cached;
        }

        let stats = compute_statistics(&self.account_issues(), &key.facets, now);
        self.stats_cache.clear();
        self.stats_cache.insert(key, stats);
        stats
    }
}
