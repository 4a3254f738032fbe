use crate::form::{Draft, Field, Modal, Submission};
use crate::model::{Incident, NewIncident, Page, PAGE_SIZE};
use crate::pagination::Pagination;
use tracing::{debug, info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Create,
    Update,
    Delete,
}

/// Blocking message shown to the user after a failed request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub operation: Operation,
    pub message: String,
    /// Underlying cause, for logs only.
    pub cause: String,
}

impl Notice {
    pub fn failed(operation: Operation, cause: impl Into<String>) -> Self {
        let message = match operation {
            Operation::Fetch => "There was an error fetching the incidents!",
            Operation::Create => "There was an error creating the incident!",
            Operation::Update => "There was an error updating the incident!",
            Operation::Delete => "There was an error deleting the incident!",
        };
        Self {
            operation,
            message: message.to_string(),
            cause: cause.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(Incident),
    Updated(Incident),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Mounted,
    NextPage,
    PreviousPage,
    PageLoaded { generation: u64, page: Page },
    FetchFailed { generation: u64, message: String },
    OpenCreate,
    OpenEdit(i64),
    FieldChanged { field: Field, value: String },
    Cancel,
    Submit,
    SubmitSucceeded {
        ticket: u64,
        outcome: SubmitOutcome,
    },
    SubmitFailed {
        ticket: u64,
        operation: Operation,
        message: String,
    },
    DeleteRequested(i64),
    DeleteConfirmed,
    DeleteCancelled,
    DeleteSucceeded(i64),
    DeleteFailed { message: String },
    NoticeDismissed,
}

/// Side effect requested by the reducer; the caller runs it and feeds the
/// completion back in as an [`Action`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    FetchPage {
        generation: u64,
        page: usize,
        size: usize,
    },
    /// `ticket` ties the reply back to the draft that sent it.
    Create { ticket: u64, body: NewIncident },
    Update { ticket: u64, body: Incident },
    Delete(i64),
}

/// Everything the incident view renders from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewState {
    pub incidents: Vec<Incident>,
    pub pagination: Pagination,
    pub loading: bool,
    /// Id of the most recent list fetch; replies from older ones are dropped.
    pub generation: u64,
    /// Page the latest in-flight fetch asked for.
    pub requested_page: Option<usize>,
    pub modal: Modal,
    /// Id of the most recent submit.
    pub submissions: u64,
    pub pending_delete: Option<i64>,
    pub notice: Option<Notice>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl ViewState {
    pub fn new(page_size: usize) -> Self {
        Self {
            incidents: Vec::new(),
            pagination: Pagination::new(page_size),
            loading: true,
            generation: 0,
            requested_page: None,
            modal: Modal::Closed,
            submissions: 0,
            pending_delete: None,
            notice: None,
        }
    }

    pub fn reduce(&mut self, action: Action) -> Option<Effect> {
        debug!(?action, "dispatch");
        match action {
            Action::Mounted => Some(self.fetch(self.pagination.page)),
            Action::NextPage => {
                let target = self.pagination.next_from(self.target_page())?;
                Some(self.fetch(target))
            }
            Action::PreviousPage => {
                let target = self.pagination.previous_from(self.target_page())?;
                Some(self.fetch(target))
            }
            Action::PageLoaded { generation, page } => {
                if generation != self.generation {
                    debug!(generation, latest = self.generation, "discarding stale page");
                    return None;
                }
                self.pagination.apply(&page);
                self.incidents = page.content;
                self.loading = false;
                self.requested_page = None;
                None
            }
            Action::FetchFailed {
                generation,
                message,
            } => {
                if generation != self.generation {
                    debug!(generation, latest = self.generation, "discarding stale failure");
                    return None;
                }
                self.loading = false;
                self.requested_page = None;
                self.raise(Notice::failed(Operation::Fetch, message));
                None
            }
            Action::OpenCreate => {
                if !self.modal.is_open() {
                    self.modal = Modal::Open(Draft::blank());
                }
                None
            }
            Action::OpenEdit(id) => {
                if self.modal.is_open() {
                    return None;
                }
                if let Some(incident) = self.incidents.iter().find(|i| i.id == id) {
                    self.modal = Modal::Open(Draft::edit(incident));
                }
                None
            }
            Action::FieldChanged { field, value } => {
                if let Some(draft) = self.modal.draft_mut() {
                    if !draft.set(field, value) {
                        debug!(field = field.name(), "ignoring edit of a locked field");
                    }
                }
                None
            }
            Action::Cancel => {
                self.modal = Modal::Closed;
                None
            }
            Action::Submit => self.submit(),
            Action::SubmitSucceeded {
                ticket,
                outcome: SubmitOutcome::Created(incident),
            } => {
                info!(id = incident.id, "incident created");
                self.settle(ticket, true);
                let last = self.pagination.last_page_after_insert();
                Some(self.fetch(last))
            }
            Action::SubmitSucceeded {
                ticket,
                outcome: SubmitOutcome::Updated(incident),
            } => {
                info!(id = incident.id, "incident updated");
                if let Some(slot) = self.incidents.iter_mut().find(|i| i.id == incident.id) {
                    *slot = incident;
                }
                self.settle(ticket, true);
                None
            }
            Action::SubmitFailed {
                ticket,
                operation,
                message,
            } => {
                self.settle(ticket, false);
                self.raise(Notice::failed(operation, message));
                None
            }
            Action::DeleteRequested(id) => {
                self.pending_delete = Some(id);
                None
            }
            Action::DeleteConfirmed => self.pending_delete.take().map(Effect::Delete),
            Action::DeleteCancelled => {
                self.pending_delete = None;
                None
            }
            Action::DeleteSucceeded(id) => {
                info!(id, "incident deleted");
                Some(self.fetch(self.pagination.page))
            }
            Action::DeleteFailed { message } => {
                self.raise(Notice::failed(Operation::Delete, message));
                None
            }
            Action::NoticeDismissed => {
                self.notice = None;
                None
            }
        }
    }

    fn target_page(&self) -> usize {
        self.requested_page.unwrap_or(self.pagination.page)
    }

    fn fetch(&mut self, page: usize) -> Effect {
        self.generation += 1;
        self.loading = true;
        self.requested_page = Some(page);
        Effect::FetchPage {
            generation: self.generation,
            page,
            size: self.pagination.size,
        }
    }

    fn submit(&mut self) -> Option<Effect> {
        let ticket = self.submissions + 1;
        let draft = self.modal.draft_mut()?;
        if draft.is_submitting() {
            return None;
        }
        match draft.submission() {
            Ok(submission) => {
                draft.missing.clear();
                draft.ticket = Some(ticket);
                self.submissions = ticket;
                Some(match submission {
                    Submission::Create(body) => Effect::Create { ticket, body },
                    Submission::Update(body) => Effect::Update { ticket, body },
                })
            }
            Err(missing) => {
                draft.missing = missing;
                None
            }
        }
    }

    /// Applies a submit reply to the draft that sent it. A draft that was
    /// cancelled or replaced in the meantime is left alone.
    fn settle(&mut self, ticket: u64, succeeded: bool) {
        let Some(draft) = self.modal.draft_mut() else {
            return;
        };
        if draft.ticket != Some(ticket) {
            debug!(ticket, "reply for a draft that is no longer open");
            return;
        }
        if succeeded {
            self.modal = Modal::Closed;
        } else {
            draft.ticket = None;
        }
    }

    fn raise(&mut self, notice: Notice) {
        warn!(operation = ?notice.operation, cause = %notice.cause, "request failed");
        self.notice = Some(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IncidentStatus, IncidentType};

    fn incident(id: i64) -> Incident {
        Incident {
            id,
            title: format!("incident {id}"),
            kind: IncidentType::Server,
            status: IncidentStatus::Open,
            reporter: "ops".into(),
            handler: None,
            detail: "details".into(),
            create_time: None,
            update_time: None,
        }
    }

    fn page(current: usize, total_elements: u64) -> Page {
        let total_pages = crate::model::page_count(total_elements, PAGE_SIZE);
        let start = (current * PAGE_SIZE) as i64;
        let len = (total_elements as i64 - start).clamp(0, PAGE_SIZE as i64);
        Page {
            content: (start + 1..=start + len).map(incident).collect(),
            total_elements,
            total_pages,
            current_page: current,
        }
    }

    fn loaded(current: usize, total_elements: u64) -> ViewState {
        let mut state = ViewState::default();
        let Some(Effect::FetchPage { generation, .. }) = state.reduce(Action::Mounted) else {
            panic!("mount must fetch");
        };
        state.reduce(Action::PageLoaded {
            generation,
            page: page(current, total_elements),
        });
        state
    }

    fn fill_create_draft(state: &mut ViewState) {
        for (field, value) in [
            (Field::Title, "Power loss"),
            (Field::Type, "Server"),
            (Field::Status, "Open"),
            (Field::Reporter, "sam"),
            (Field::Detail, "PDU tripped"),
        ] {
            state.reduce(Action::FieldChanged {
                field,
                value: value.into(),
            });
        }
    }

    #[test]
    fn mount_fetches_first_page_and_shows_loading() {
        let mut state = ViewState::default();
        assert!(state.loading);
        let effect = state.reduce(Action::Mounted);
        assert_eq!(
            effect,
            Some(Effect::FetchPage {
                generation: 1,
                page: 0,
                size: PAGE_SIZE
            })
        );
    }

    #[test]
    fn page_loaded_replaces_list_wholesale() {
        let state = loaded(1, 12);
        assert!(!state.loading);
        assert_eq!(state.pagination.page, 1);
        assert_eq!(state.pagination.total_pages, 3);
        assert_eq!(
            state.incidents.iter().map(|i| i.id).collect::<Vec<_>>(),
            vec![6, 7, 8, 9, 10]
        );
    }

    #[test]
    fn server_position_wins_over_requested_page() {
        let mut state = loaded(0, 12);
        let Some(Effect::FetchPage { generation, page: requested, .. }) =
            state.reduce(Action::NextPage)
        else {
            panic!("expected fetch");
        };
        assert_eq!(requested, 1);
        state.reduce(Action::PageLoaded {
            generation,
            page: page(2, 12),
        });
        assert_eq!(state.pagination.page, 2);
    }

    #[test]
    fn navigation_is_a_no_op_at_the_edges() {
        let mut first = loaded(0, 12);
        let before = first.clone();
        assert_eq!(first.reduce(Action::PreviousPage), None);
        assert_eq!(first, before);

        let mut last = loaded(2, 12);
        let before = last.clone();
        assert_eq!(last.reduce(Action::NextPage), None);
        assert_eq!(last, before);
    }

    #[test]
    fn rapid_clicks_advance_from_the_requested_page() {
        let mut state = loaded(0, 12);
        let Some(Effect::FetchPage { page: first, .. }) = state.reduce(Action::NextPage) else {
            panic!("expected fetch");
        };
        let Some(Effect::FetchPage { page: second, .. }) = state.reduce(Action::NextPage) else {
            panic!("expected fetch");
        };
        assert_eq!((first, second), (1, 2));
        assert_eq!(state.reduce(Action::NextPage), None);
    }

    #[test]
    fn stale_page_is_discarded() {
        let mut state = loaded(0, 12);
        let Some(Effect::FetchPage { generation: older, .. }) = state.reduce(Action::NextPage)
        else {
            panic!("expected fetch");
        };
        let Some(Effect::FetchPage { generation: newer, .. }) = state.reduce(Action::NextPage)
        else {
            panic!("expected fetch");
        };

        state.reduce(Action::PageLoaded {
            generation: newer,
            page: page(2, 12),
        });
        let settled = state.clone();
        state.reduce(Action::PageLoaded {
            generation: older,
            page: page(1, 12),
        });
        state.reduce(Action::FetchFailed {
            generation: older,
            message: "timeout".into(),
        });
        assert_eq!(state, settled);
        assert_eq!(state.pagination.page, 2);
    }

    #[test]
    fn fetch_failure_keeps_previous_list() {
        let mut state = loaded(0, 12);
        let before = state.incidents.clone();
        let Some(Effect::FetchPage { generation, .. }) = state.reduce(Action::NextPage) else {
            panic!("expected fetch");
        };
        state.reduce(Action::FetchFailed {
            generation,
            message: "502 Bad Gateway".into(),
        });
        assert!(!state.loading);
        assert_eq!(state.incidents, before);
        assert_eq!(state.pagination.page, 0);
        let notice = state.notice.clone().expect("notice");
        assert_eq!(notice.message, "There was an error fetching the incidents!");

        state.reduce(Action::NoticeDismissed);
        assert!(state.notice.is_none());
    }

    #[test]
    fn cancel_leaves_list_untouched() {
        let mut state = loaded(1, 12);
        let before = state.clone();
        state.reduce(Action::OpenEdit(7));
        state.reduce(Action::FieldChanged {
            field: Field::Detail,
            value: "scribble".into(),
        });
        state.reduce(Action::Cancel);
        assert_eq!(state, before);
    }

    #[test]
    fn open_edit_ignores_unknown_rows() {
        let mut state = loaded(0, 12);
        state.reduce(Action::OpenEdit(99));
        assert!(!state.modal.is_open());
    }

    #[test]
    fn incomplete_draft_is_not_sent() {
        let mut state = loaded(0, 12);
        state.reduce(Action::OpenCreate);
        state.reduce(Action::FieldChanged {
            field: Field::Title,
            value: "half".into(),
        });
        assert_eq!(state.reduce(Action::Submit), None);
        let draft = state.modal.draft().expect("still open");
        assert!(draft.missing.contains(&Field::Reporter));
        assert!(!draft.is_submitting());
    }

    #[test]
    fn create_success_jumps_to_last_page_after_insert() {
        let mut state = loaded(0, 10);
        state.reduce(Action::OpenCreate);
        fill_create_draft(&mut state);

        let Some(Effect::Create { ticket, body }) = state.reduce(Action::Submit) else {
            panic!("expected create");
        };
        assert_eq!(body.title, "Power loss");
        assert_eq!(state.reduce(Action::Submit), None, "double submit");

        let effect = state.reduce(Action::SubmitSucceeded {
            ticket,
            outcome: SubmitOutcome::Created(incident(11)),
        });
        assert!(!state.modal.is_open());
        assert!(matches!(effect, Some(Effect::FetchPage { page: 2, .. })));
    }

    #[test]
    fn create_failure_keeps_draft() {
        let mut state = loaded(0, 3);
        state.reduce(Action::OpenCreate);
        fill_create_draft(&mut state);
        let Some(Effect::Create { ticket, .. }) = state.reduce(Action::Submit) else {
            panic!("expected create");
        };
        let fields = state.modal.draft().expect("open").fields.clone();

        state.reduce(Action::SubmitFailed {
            ticket,
            operation: Operation::Create,
            message: "500".into(),
        });
        let draft = state.modal.draft().expect("modal stays open");
        assert_eq!(draft.fields, fields);
        assert!(!draft.is_submitting());
        assert_eq!(
            state.notice.as_ref().map(|n| n.message.as_str()),
            Some("There was an error creating the incident!")
        );
    }

    #[test]
    fn update_patches_the_row_in_place() {
        let mut state = loaded(0, 12);
        state.reduce(Action::OpenEdit(2));
        state.reduce(Action::FieldChanged {
            field: Field::Status,
            value: "Resolved".into(),
        });
        state.reduce(Action::FieldChanged {
            field: Field::Title,
            value: "ignored".into(),
        });
        let Some(Effect::Update { ticket, body }) = state.reduce(Action::Submit) else {
            panic!("expected update");
        };
        assert_eq!(body.title, "incident 2");
        assert_eq!(body.status, IncidentStatus::Resolved);

        let others: Vec<_> = state.incidents.iter().filter(|i| i.id != 2).cloned().collect();
        let effect = state.reduce(Action::SubmitSucceeded {
            ticket,
            outcome: SubmitOutcome::Updated(body.clone()),
        });
        assert_eq!(effect, None);
        assert!(!state.modal.is_open());
        assert_eq!(state.incidents[1], body);
        assert_eq!(
            state.incidents.iter().filter(|i| i.id != 2).cloned().collect::<Vec<_>>(),
            others
        );
    }

    #[test]
    fn update_failure_leaves_modal_as_is() {
        let mut state = loaded(0, 12);
        state.reduce(Action::OpenEdit(4));
        let Some(Effect::Update { ticket, .. }) = state.reduce(Action::Submit) else {
            panic!("expected update");
        };
        let list = state.incidents.clone();
        state.reduce(Action::SubmitFailed {
            ticket,
            operation: Operation::Update,
            message: "404".into(),
        });
        assert!(state.modal.is_open());
        assert_eq!(state.incidents, list);
        assert_eq!(
            state.notice.as_ref().map(|n| n.operation),
            Some(Operation::Update)
        );
    }

    #[test]
    fn late_update_reply_spares_the_next_draft() {
        let mut state = loaded(0, 12);
        state.reduce(Action::OpenEdit(1));
        state.reduce(Action::FieldChanged {
            field: Field::Status,
            value: "Resolved".into(),
        });
        let Some(Effect::Update { ticket, body }) = state.reduce(Action::Submit) else {
            panic!("expected update");
        };
        state.reduce(Action::Cancel);
        state.reduce(Action::OpenEdit(2));
        state.reduce(Action::FieldChanged {
            field: Field::Detail,
            value: "half typed".into(),
        });
        let draft = state.modal.draft().cloned().expect("row 2 open");

        state.reduce(Action::SubmitSucceeded {
            ticket,
            outcome: SubmitOutcome::Updated(body.clone()),
        });
        assert_eq!(state.modal.draft(), Some(&draft));
        assert_eq!(state.incidents[0], body);

        state.reduce(Action::SubmitFailed {
            ticket,
            operation: Operation::Update,
            message: "timeout".into(),
        });
        assert_eq!(state.modal.draft(), Some(&draft));
        assert_eq!(
            state.notice.as_ref().map(|n| n.operation),
            Some(Operation::Update)
        );
    }

    #[test]
    fn late_create_reply_refetches_without_closing_a_new_draft() {
        let mut state = loaded(0, 10);
        state.reduce(Action::OpenCreate);
        fill_create_draft(&mut state);
        let Some(Effect::Create { ticket, .. }) = state.reduce(Action::Submit) else {
            panic!("expected create");
        };
        state.reduce(Action::Cancel);
        state.reduce(Action::OpenCreate);
        fill_create_draft(&mut state);
        let Some(Effect::Create { ticket: second, .. }) = state.reduce(Action::Submit) else {
            panic!("expected create");
        };
        assert_ne!(ticket, second);

        let effect = state.reduce(Action::SubmitSucceeded {
            ticket,
            outcome: SubmitOutcome::Created(incident(11)),
        });
        assert!(matches!(effect, Some(Effect::FetchPage { page: 2, .. })));
        let draft = state.modal.draft().expect("second draft still open");
        assert_eq!(draft.ticket, Some(second));
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut state = loaded(1, 12);
        assert_eq!(state.reduce(Action::DeleteRequested(7)), None);
        assert_eq!(state.pending_delete, Some(7));
        assert_eq!(state.reduce(Action::DeleteCancelled), None);
        assert_eq!(state.reduce(Action::DeleteConfirmed), None);

        state.reduce(Action::DeleteRequested(7));
        assert_eq!(state.reduce(Action::DeleteConfirmed), Some(Effect::Delete(7)));
        assert_eq!(state.pending_delete, None);

        let effect = state.reduce(Action::DeleteSucceeded(7));
        assert!(matches!(effect, Some(Effect::FetchPage { page: 1, .. })));
    }

    #[test]
    fn delete_failure_raises_notice() {
        let mut state = loaded(0, 12);
        state.reduce(Action::DeleteFailed {
            message: "connection reset".into(),
        });
        assert_eq!(
            state.notice.map(|n| n.message),
            Some("There was an error deleting the incident!".to_string())
        );
    }
}
