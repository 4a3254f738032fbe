//! Connects the reactive view to the store and the backend.

use incident_core::view::DELETE_PROMPT;
use incident_core::{perform, Action, HttpIncidentApi, ViewState};
use leptos::*;
use tracing::warn;
use wasm_bindgen_futures::spawn_local;

/// Handle every event handler uses to reach the store.
#[derive(Clone, Copy)]
pub struct Dispatcher {
    state: RwSignal<ViewState>,
    api: StoredValue<HttpIncidentApi>,
}

impl Dispatcher {
    pub fn new(state: RwSignal<ViewState>, api: HttpIncidentApi) -> Self {
        Self {
            state,
            api: store_value(api),
        }
    }

    pub fn dispatch(self, action: Action) {
        let effect = self.state.try_update(|s| s.reduce(action)).flatten();
        self.prompt();

        if let Some(effect) = effect {
            let api = self.api.get_value();
            spawn_local(async move {
                let done = perform(&api, effect).await;
                self.dispatch(done);
            });
        }
    }

    /// Answers whatever the store is waiting on from the user.
    fn prompt(self) {
        if let Some(notice) = self.state.with_untracked(|s| s.notice.clone()) {
            alert(&notice.message);
            self.dispatch(Action::NoticeDismissed);
        }
        if self.state.with_untracked(|s| s.pending_delete.is_some()) {
            let answer = if confirm(DELETE_PROMPT) {
                Action::DeleteConfirmed
            } else {
                Action::DeleteCancelled
            };
            self.dispatch(answer);
        }
    }
}

fn alert(message: &str) {
    if let Err(e) = window().alert_with_message(message) {
        warn!(?e, "alert failed");
    }
}

fn confirm(message: &str) -> bool {
    window().confirm_with_message(message).unwrap_or_else(|e| {
        warn!(?e, "confirm failed");
        false
    })
}
