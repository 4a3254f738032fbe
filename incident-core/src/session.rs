use crate::api::{perform, HttpIncidentApi, IncidentApi};
use crate::config::ClientConfig;
use crate::error::ConfigError;
use crate::store::{Action, Notice, ViewState};
use std::collections::VecDeque;

/// How a session answers the "are you sure?" prompt before a delete.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmPolicy {
    Always,
    Never,
}

/// Drives a [`ViewState`] against an [`IncidentApi`] one action at a time.
///
/// Each dispatch runs every effect it triggers to completion before
/// returning, so callers observe settled state. Notices are acknowledged
/// automatically and kept in [`IncidentSession::notices`].
pub struct IncidentSession<A> {
    api: A,
    state: ViewState,
    confirm: ConfirmPolicy,
    notices: Vec<Notice>,
}

impl<A: IncidentApi> IncidentSession<A> {
    pub fn new(api: A, page_size: usize) -> Self {
        Self {
            api,
            state: ViewState::new(page_size),
            confirm: ConfirmPolicy::Always,
            notices: Vec::new(),
        }
    }

    pub fn with_confirm(mut self, confirm: ConfirmPolicy) -> Self {
        self.confirm = confirm;
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub async fn dispatch(&mut self, action: Action) {
        let mut queue = VecDeque::from([action]);
        while let Some(next) = queue.pop_front() {
            let effect = self.state.reduce(next);

            if let Some(notice) = self.state.notice.clone() {
                self.notices.push(notice);
                self.state.reduce(Action::NoticeDismissed);
            }
            if self.state.pending_delete.is_some() {
                queue.push_back(match self.confirm {
                    ConfirmPolicy::Always => Action::DeleteConfirmed,
                    ConfirmPolicy::Never => Action::DeleteCancelled,
                });
            }
            if let Some(effect) = effect {
                queue.push_back(perform(&self.api, effect).await);
            }
        }
    }

    /// Mounts the view and waits for the first page.
    pub async fn mount(&mut self) {
        self.dispatch(Action::Mounted).await;
    }
}

impl IncidentSession<HttpIncidentApi> {
    /// Session against the backend named by `INCIDENT_API_BASE_URL`
    /// (or `.env`), for native callers.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = ClientConfig::from_env()?;
        let page_size = config.page_size;
        Ok(Self::new(HttpIncidentApi::new(config), page_size))
    }
}
