//! Admin session over the lead list.
//!
//! The session is either logged out or holds an [`AdminCredential`] plus the
//! leads fetched with it. Every privileged call receives the credential
//! explicitly. A failed refresh or delete never touches the local list; it
//! only sets the session's error message.

use tracing::{info, warn};

use crate::api::LeadApi;
use crate::csv::CsvExport;
use crate::inflight::InFlight;
use crate::types::{AdminCredential, Lead, LeadId};

pub const INVALID_PASSWORD_MESSAGE: &str = "Invalid password";
pub const DELETE_FAILED_MESSAGE: &str = "Error deleting lead";
pub const CONFIRM_DELETE_PROMPT: &str = "Are you sure?";

/// Destructive-action guard consulted before every delete.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Confirms everything. For non-interactive callers that already asked.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated { count: usize },
    InvalidPassword,
    Unreachable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Refreshed { count: usize },
    Failed,
    NotAuthenticated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Backend confirmed; the id is gone from the local list.
    Deleted,
    /// The confirmation guard declined.
    Cancelled,
    /// Backend refused or was unreachable; list unchanged.
    Failed,
    /// The id is not in the local list; nothing was sent.
    UnknownId,
    NotAuthenticated,
}

#[derive(Debug, Default)]
enum SessionState {
    #[default]
    LoggedOut,
    Authenticated {
        credential: AdminCredential,
        leads: Vec<Lead>,
    },
}

/// Password-gated view over all leads.
#[derive(Debug, Default)]
pub struct AdminSession {
    state: SessionState,
    error: Option<String>,
    loading: bool,
}

impl AdminSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated { .. })
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Current inline error, if the last operation failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Leads in backend order. Empty when logged out.
    #[must_use]
    pub fn leads(&self) -> &[Lead] {
        match &self.state {
            SessionState::Authenticated { leads, .. } => leads,
            SessionState::LoggedOut => &[],
        }
    }

    /// Try the password against the listing endpoint.
    ///
    /// A login attempt replaces any earlier session: the previous credential
    /// and list are dropped before the request goes out.
    pub async fn login(&mut self, api: &dyn LeadApi, credential: AdminCredential) -> LoginOutcome {
        self.state = SessionState::LoggedOut;
        self.error = None;
        let in_flight = InFlight::start(&mut self.loading);
        let result = api.list_leads(&credential).await;
        drop(in_flight);

        match result {
            Ok(leads) => {
                let count = leads.len();
                info!(count, "admin session authenticated");
                self.state = SessionState::Authenticated { credential, leads };
                LoginOutcome::Authenticated { count }
            }
            Err(e) if e.is_transport() => {
                self.error = Some(format!("Error connecting to backend: {e}"));
                LoginOutcome::Unreachable
            }
            Err(e) => {
                warn!(status = e.status(), "admin login refused");
                self.error = Some(INVALID_PASSWORD_MESSAGE.to_owned());
                LoginOutcome::InvalidPassword
            }
        }
    }

    /// Re-fetch the list with the held credential.
    pub async fn refresh(&mut self, api: &dyn LeadApi) -> RefreshOutcome {
        let SessionState::Authenticated { credential, leads } = &mut self.state else {
            return RefreshOutcome::NotAuthenticated;
        };

        self.error = None;
        let in_flight = InFlight::start(&mut self.loading);
        let result = api.list_leads(credential).await;
        drop(in_flight);

        match result {
            Ok(fresh) => {
                *leads = fresh;
                RefreshOutcome::Refreshed { count: leads.len() }
            }
            Err(e) => {
                self.error = Some(format!("Error: {e}"));
                RefreshOutcome::Failed
            }
        }
    }

    /// Delete one lead after confirmation. The local list only changes once
    /// the backend has confirmed.
    pub async fn delete(
        &mut self,
        api: &dyn LeadApi,
        id: &LeadId,
        confirm: &mut dyn Confirm,
    ) -> DeleteOutcome {
        let SessionState::Authenticated { credential, leads } = &mut self.state else {
            return DeleteOutcome::NotAuthenticated;
        };
        if !leads.iter().any(|l| &l.id == id) {
            return DeleteOutcome::UnknownId;
        }
        if !confirm.confirm(CONFIRM_DELETE_PROMPT) {
            return DeleteOutcome::Cancelled;
        }

        match api.delete_lead(credential, id).await {
            Ok(()) => {
                leads.retain(|l| &l.id != id);
                info!(%id, "lead deleted");
                DeleteOutcome::Deleted
            }
            Err(e) if e.is_transport() => {
                self.error = Some(format!("Error: {e}"));
                DeleteOutcome::Failed
            }
            Err(e) => {
                warn!(%id, status = e.status(), "lead delete refused");
                self.error = Some(DELETE_FAILED_MESSAGE.to_owned());
                DeleteOutcome::Failed
            }
        }
    }

    /// Forget the credential and the list. Nothing is sent to the backend.
    pub fn logout(&mut self) {
        self.state = SessionState::LoggedOut;
        self.error = None;
    }

    /// CSV of the current list, stamped with today's UTC date.
    #[must_use]
    pub fn export_csv(&self) -> CsvExport {
        CsvExport::now(self.leads())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::ApiError;
    use crate::types::NewLead;

    /// In-memory backend with a fixed password.
    struct MemoryApi {
        password: &'static str,
        refusal_status: u16,
        leads: Mutex<Vec<Lead>>,
        fail_deletes: bool,
        deleted: Mutex<Vec<LeadId>>,
    }

    impl MemoryApi {
        fn with_leads(n: i64) -> Self {
            let leads = (1..=n)
                .map(|i| Lead {
                    id: LeadId::from(i),
                    name: format!("Lead {i}"),
                    email: format!("lead{i}@example.com"),
                    phone: format!("555-000{i}"),
                    website: format!("https://lead{i}.example.com"),
                    guests: None,
                    created_at: "2024-05-01 09:30:00".to_owned(),
                })
                .collect();
            Self {
                password: "secret",
                refusal_status: 401,
                leads: Mutex::new(leads),
                fail_deletes: false,
                deleted: Mutex::new(Vec::new()),
            }
        }

        fn check(&self, credential: &AdminCredential) -> Result<(), ApiError> {
            if credential.expose() == self.password {
                Ok(())
            } else {
                Err(ApiError::Rejected {
                    status: self.refusal_status,
                    message: Some("Unauthorized".to_owned()),
                })
            }
        }
    }

    #[async_trait::async_trait]
    impl LeadApi for MemoryApi {
        async fn create_lead(&self, _: &NewLead) -> Result<(), ApiError> {
            Ok(())
        }

        async fn list_leads(&self, credential: &AdminCredential) -> Result<Vec<Lead>, ApiError> {
            self.check(credential)?;
            Ok(self.leads.lock().unwrap().clone())
        }

        async fn delete_lead(&self, credential: &AdminCredential, id: &LeadId) -> Result<(), ApiError> {
            self.check(credential)?;
            if self.fail_deletes {
                return Err(ApiError::Rejected {
                    status: 500,
                    message: None,
                });
            }
            self.deleted.lock().unwrap().push(id.clone());
            self.leads.lock().unwrap().retain(|l| &l.id != id);
            Ok(())
        }
    }

    async fn logged_in(api: &MemoryApi) -> AdminSession {
        let mut session = AdminSession::new();
        session.login(api, AdminCredential::new("secret")).await;
        session
    }

    #[tokio::test]
    async fn login_with_right_password_loads_all_leads() {
        let api = MemoryApi::with_leads(3);
        let mut session = AdminSession::new();

        let outcome = session.login(&api, AdminCredential::new("secret")).await;

        assert_eq!(outcome, LoginOutcome::Authenticated { count: 3 });
        assert!(session.is_authenticated());
        assert_eq!(session.leads().len(), 3);
        assert_eq!(session.error(), None);
    }

    #[tokio::test]
    async fn login_with_wrong_password_stays_logged_out() {
        let api = MemoryApi::with_leads(3);
        let mut session = AdminSession::new();

        let outcome = session.login(&api, AdminCredential::new("guess")).await;

        assert_eq!(outcome, LoginOutcome::InvalidPassword);
        assert!(!session.is_authenticated());
        assert_eq!(session.error(), Some("Invalid password"));
        assert!(session.leads().is_empty());
    }

    #[tokio::test]
    async fn forbidden_login_is_invalid_password() {
        let mut api = MemoryApi::with_leads(1);
        api.refusal_status = 403;
        let mut session = AdminSession::new();

        let outcome = session.login(&api, AdminCredential::new("guess")).await;

        assert_eq!(outcome, LoginOutcome::InvalidPassword);
        assert!(!session.is_authenticated());
        assert_eq!(session.error(), Some("Invalid password"));
    }

    #[tokio::test]
    async fn failed_relogin_drops_previous_session() {
        let api = MemoryApi::with_leads(2);
        let mut session = logged_in(&api).await;

        let outcome = session.login(&api, AdminCredential::new("guess")).await;

        assert_eq!(outcome, LoginOutcome::InvalidPassword);
        assert!(!session.is_authenticated());
        assert!(session.leads().is_empty());
        assert_eq!(session.refresh(&api).await, RefreshOutcome::NotAuthenticated);
    }

    #[tokio::test]
    async fn delete_removes_exactly_that_id() {
        let api = MemoryApi::with_leads(3);
        let mut session = logged_in(&api).await;

        let outcome = session
            .delete(&api, &LeadId::from(2), &mut AssumeYes)
            .await;

        assert_eq!(outcome, DeleteOutcome::Deleted);
        let ids: Vec<&str> = session.leads().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["1", "3"]);
    }

    #[tokio::test]
    async fn declined_confirmation_sends_nothing() {
        let api = MemoryApi::with_leads(2);
        let mut session = logged_in(&api).await;
        let mut asked = Vec::new();
        let mut decline = |prompt: &str| {
            asked.push(prompt.to_owned());
            false
        };

        let outcome = session.delete(&api, &LeadId::from(1), &mut decline).await;

        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert_eq!(asked, ["Are you sure?"]);
        assert!(api.deleted.lock().unwrap().is_empty());
        assert_eq!(session.leads().len(), 2);
    }

    #[tokio::test]
    async fn failed_delete_keeps_list() {
        let mut api = MemoryApi::with_leads(2);
        api.fail_deletes = true;
        let mut session = logged_in(&api).await;

        let outcome = session.delete(&api, &LeadId::from(1), &mut AssumeYes).await;

        assert_eq!(outcome, DeleteOutcome::Failed);
        assert_eq!(session.error(), Some("Error deleting lead"));
        assert_eq!(session.leads().len(), 2);
    }

    #[tokio::test]
    async fn unknown_id_is_rejected_locally() {
        let api = MemoryApi::with_leads(1);
        let mut session = logged_in(&api).await;

        let outcome = session.delete(&api, &LeadId::from(99), &mut AssumeYes).await;

        assert_eq!(outcome, DeleteOutcome::UnknownId);
        assert!(api.deleted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_requires_login() {
        let api = MemoryApi::with_leads(1);
        let mut session = AdminSession::new();
        let outcome = session.delete(&api, &LeadId::from(1), &mut AssumeYes).await;
        assert_eq!(outcome, DeleteOutcome::NotAuthenticated);
    }

    #[tokio::test]
    async fn logout_forgets_credential_and_list() {
        let api = MemoryApi::with_leads(2);
        let mut session = logged_in(&api).await;

        session.logout();

        assert!(!session.is_authenticated());
        assert!(session.leads().is_empty());
        assert_eq!(session.refresh(&api).await, RefreshOutcome::NotAuthenticated);
    }

    #[tokio::test]
    async fn refresh_picks_up_backend_changes() {
        let api = MemoryApi::with_leads(3);
        let mut session = logged_in(&api).await;
        api.leads.lock().unwrap().pop();

        assert_eq!(
            session.refresh(&api).await,
            RefreshOutcome::Refreshed { count: 2 }
        );
        assert_eq!(session.leads().len(), 2);
    }

    #[tokio::test]
    async fn export_uses_current_list() {
        let api = MemoryApi::with_leads(2);
        let session = logged_in(&api).await;

        let export = session.export_csv();

        assert_eq!(export.body.lines().count(), 3);
        assert!(export.filename.starts_with("demo-requests-"));
    }

    /// Lists once, then never answers again.
    struct StallingApi {
        answered: Mutex<bool>,
    }

    #[async_trait::async_trait]
    impl LeadApi for StallingApi {
        async fn create_lead(&self, _: &NewLead) -> Result<(), ApiError> {
            std::future::pending().await
        }

        async fn list_leads(&self, _: &AdminCredential) -> Result<Vec<Lead>, ApiError> {
            let first = !std::mem::replace(&mut *self.answered.lock().unwrap(), true);
            if first {
                return Ok(Vec::new());
            }
            std::future::pending().await
        }

        async fn delete_lead(&self, _: &AdminCredential, _: &LeadId) -> Result<(), ApiError> {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_requests_clear_loading() {
        let api = StallingApi {
            answered: Mutex::new(false),
        };
        let mut session = AdminSession::new();
        let wait = std::time::Duration::from_millis(50);

        let outcome = session.login(&api, AdminCredential::new("secret")).await;
        assert_eq!(outcome, LoginOutcome::Authenticated { count: 0 });

        assert!(tokio::time::timeout(wait, session.refresh(&api)).await.is_err());
        assert!(!session.is_loading());
        assert!(session.is_authenticated());

        let relogin = session.login(&api, AdminCredential::new("secret"));
        assert!(tokio::time::timeout(wait, relogin).await.is_err());
        assert!(!session.is_loading());
        assert!(!session.is_authenticated());
    }
}
