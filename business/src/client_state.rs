//! The dashboard's client state and its transitions.
//!
//! `ClientState` is owned by a `StateCtx`; every change goes through [`UserAction`]. The fields
//! are the whole surface the presentation layer may read, so they are public, but consumers
//! only ever see a cloned snapshot.

use userdash_states::State;

use crate::api::ListResult;
use crate::operation::{OperationKind, OperationStatus};
use crate::pagination::PageNumber;
use crate::user::User;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientState {
    /// Users on the current page; empty until the first successful list fetch.
    pub users: Vec<User>,
    /// Record from the most recent successful detail fetch.
    pub selected_user: Option<User>,
    /// True from dispatch until settlement.
    pub loading: bool,
    /// Message of the last terminal failure, cleared when a new fetch begins.
    pub error: Option<String>,
    /// The page the user intends to view.
    pub current_page: PageNumber,
    /// Last known total; stays 1 until a list fetch succeeds.
    pub total_pages: u32,
    pub list_status: OperationStatus,
    pub detail_status: OperationStatus,
}

impl Default for ClientState {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            selected_user: None,
            loading: false,
            error: None,
            current_page: PageNumber::FIRST,
            total_pages: 1,
            list_status: OperationStatus::Idle,
            detail_status: OperationStatus::Idle,
        }
    }
}

/// Every way [`ClientState`] can change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    /// A fetch of this kind was dispatched.
    Pending(OperationKind),
    ListFulfilled(ListResult),
    DetailFulfilled(User),
    Rejected {
        operation: OperationKind,
        message: String,
    },
    SetCurrentPage(PageNumber),
    ClearSelectedUser,
}

impl ClientState {
    pub fn status(&self, operation: OperationKind) -> &OperationStatus {
        match operation {
            OperationKind::List => &self.list_status,
            OperationKind::Detail => &self.detail_status,
        }
    }

    fn status_mut(&mut self, operation: OperationKind) -> &mut OperationStatus {
        match operation {
            OperationKind::List => &mut self.list_status,
            OperationKind::Detail => &mut self.detail_status,
        }
    }

    pub fn has_previous_page(&self) -> bool {
        self.current_page > PageNumber::FIRST
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page.get() < self.total_pages
    }

    fn begin(&mut self, operation: OperationKind) {
        self.loading = true;
        self.error = None;
        *self.status_mut(operation) = OperationStatus::Pending;
    }

    fn fulfil_list(&mut self, result: ListResult) {
        self.loading = false;
        self.users = result.users;
        self.total_pages = result.total_pages.max(1);
        self.list_status = OperationStatus::Fulfilled;
    }

    fn fulfil_detail(&mut self, user: User) {
        self.loading = false;
        self.selected_user = Some(user);
        self.detail_status = OperationStatus::Fulfilled;
    }

    fn reject(&mut self, operation: OperationKind, message: String) {
        let message = if message.is_empty() {
            operation.fallback_message().to_owned()
        } else {
            message
        };
        self.loading = false;
        self.error = Some(message.clone());
        *self.status_mut(operation) = OperationStatus::Rejected(message);
    }
}

impl State for ClientState {
    type Action = UserAction;

    fn apply(&mut self, action: UserAction) {
        match action {
            UserAction::Pending(operation) => self.begin(operation),
            UserAction::ListFulfilled(result) => self.fulfil_list(result),
            UserAction::DetailFulfilled(user) => self.fulfil_detail(user),
            UserAction::Rejected { operation, message } => self.reject(operation, message),
            UserAction::SetCurrentPage(page) => self.current_page = page,
            UserAction::ClearSelectedUser => self.selected_user = None,
        }
    }
}
