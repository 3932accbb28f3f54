//! Fetch commands.
//!
//! Fetching is a side effect (network IO), so it lives in manual-only commands rather than in
//! the state. Each command marks its operation pending at dispatch, performs the retry-wrapped
//! request on a spawned task, and reports `Fulfilled`/`Rejected` through its updater. The
//! retry delay is an async sleep and never blocks other tasks.

use std::sync::Arc;

use log::info;
use userdash_states::{Command, CommandFuture, LatestOnlyUpdater};

use crate::api::UsersApi;
use crate::client_state::{ClientState, UserAction};
use crate::operation::OperationKind;
use crate::pagination::PageNumber;
use crate::user::UserId;

/// Fetches the user list and slices `page` out of it.
#[derive(Debug, Clone)]
pub struct FetchUserListCommand {
    pub api: Arc<UsersApi>,
    pub page: PageNumber,
}

impl Command<ClientState> for FetchUserListCommand {
    fn pending(&self) -> Option<UserAction> {
        Some(UserAction::Pending(OperationKind::List))
    }

    fn run(self, updater: LatestOnlyUpdater<UserAction>) -> CommandFuture {
        Box::pin(async move {
            info!(
                "FetchUserListCommand: fetching page {} (generation {})",
                self.page,
                updater.task().generation()
            );

            match self.api.fetch_page(self.page).await {
                Ok(result) => {
                    info!(
                        "FetchUserListCommand: fetched {} users for page {}",
                        result.users.len(),
                        self.page
                    );
                    updater.set(UserAction::ListFulfilled(result));
                }
                Err(failure) => {
                    updater.set(UserAction::Rejected {
                        operation: OperationKind::List,
                        message: failure.message,
                    });
                }
            }
        })
    }
}

/// Fetches a single user record.
#[derive(Debug, Clone)]
pub struct FetchUserDetailsCommand {
    pub api: Arc<UsersApi>,
    pub id: UserId,
}

impl Command<ClientState> for FetchUserDetailsCommand {
    fn pending(&self) -> Option<UserAction> {
        Some(UserAction::Pending(OperationKind::Detail))
    }

    fn run(self, updater: LatestOnlyUpdater<UserAction>) -> CommandFuture {
        Box::pin(async move {
            info!(
                "FetchUserDetailsCommand: fetching user {} (generation {})",
                self.id,
                updater.task().generation()
            );

            match self.api.fetch_detail(self.id).await {
                Ok(user) => {
                    info!("FetchUserDetailsCommand: fetched user {}", user.id);
                    updater.set(UserAction::DetailFulfilled(user));
                }
                Err(failure) => {
                    updater.set(UserAction::Rejected {
                        operation: OperationKind::Detail,
                        message: failure.message,
                    });
                }
            }
        })
    }
}
