//! The operations the presentation layer may call.
//!
//! `UserDashboard` owns the single [`StateCtx`] holding [`ClientState`] and is the only way to
//! change it. Operations are fire-and-forget: they return once the synchronous part of the
//! transition is applied, and outcomes are read from [`UserDashboard::snapshot`] after
//! [`UserDashboard::sync`] or [`UserDashboard::flush`].
//!
//! `set_current_page` does not fetch. A caller that changes the page is expected to follow up
//! with `fetch_user_list`; [`UserDashboard::go_to_page`] does both.

use std::sync::Arc;

use log::info;
use userdash_states::{StateCtx, TaskId};

use crate::BusinessConfig;
use crate::api::UsersApi;
use crate::client_state::{ClientState, UserAction};
use crate::commands::{FetchUserDetailsCommand, FetchUserListCommand};
use crate::pagination::PageNumber;
use crate::user::UserId;

#[derive(Debug)]
pub struct UserDashboard {
    ctx: StateCtx<ClientState>,
    api: Arc<UsersApi>,
    last_list_page: Option<PageNumber>,
    last_detail_id: Option<UserId>,
}

impl UserDashboard {
    /// Dashboard over the default reqwest transport.
    pub fn new(config: &BusinessConfig) -> Self {
        Self::with_api(config, UsersApi::new(config))
    }

    pub fn with_api(config: &BusinessConfig, api: UsersApi) -> Self {
        Self {
            ctx: StateCtx::new(ClientState::default()).with_policy(config.settle_policy()),
            api: Arc::new(api),
            last_list_page: None,
            last_detail_id: None,
        }
    }

    /// Cloned view of the observable state.
    pub fn snapshot(&self) -> ClientState {
        self.ctx.snapshot()
    }

    pub fn state(&self) -> &ClientState {
        self.ctx.state()
    }

    /// Starts a list fetch for `page`. `loading` is true once this returns.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn fetch_user_list(&mut self, page: PageNumber) -> TaskId {
        self.last_list_page = Some(page);
        self.ctx.dispatch(FetchUserListCommand {
            api: Arc::clone(&self.api),
            page,
        })
    }

    /// Starts a detail fetch for `id`. `loading` is true once this returns.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn fetch_user_details(&mut self, id: UserId) -> TaskId {
        self.last_detail_id = Some(id);
        self.ctx.dispatch(FetchUserDetailsCommand {
            api: Arc::clone(&self.api),
            id,
        })
    }

    /// Overwrites the current page immediately. Does not fetch.
    pub fn set_current_page(&mut self, page: PageNumber) {
        self.ctx.apply(UserAction::SetCurrentPage(page));
    }

    /// Drops the selected record, e.g. when the detail view is left.
    pub fn clear_selected_user(&mut self) {
        self.ctx.apply(UserAction::ClearSelectedUser);
    }

    /// Sets the page and dispatches the list fetch for it.
    pub fn go_to_page(&mut self, page: PageNumber) -> TaskId {
        self.set_current_page(page);
        self.fetch_user_list(page)
    }

    /// Moves one page forward, unless already on the last known page.
    pub fn next_page(&mut self) -> Option<TaskId> {
        let state = self.ctx.state();
        if !state.has_next_page() {
            return None;
        }
        let page = state.current_page.next();
        Some(self.go_to_page(page))
    }

    /// Moves one page back, unless already on the first page.
    pub fn previous_page(&mut self) -> Option<TaskId> {
        let state = self.ctx.state();
        if !state.has_previous_page() {
            return None;
        }
        let page = state.current_page.previous();
        Some(self.go_to_page(page))
    }

    /// Re-dispatches the list fetch for the current page.
    pub fn retry_user_list(&mut self) -> TaskId {
        let page = self.ctx.state().current_page;
        info!(
            "UserDashboard: retrying list for page {page} (last requested {:?})",
            self.last_list_page
        );
        self.fetch_user_list(page)
    }

    /// Re-dispatches the last detail fetch, if any was made.
    pub fn retry_user_details(&mut self) -> Option<TaskId> {
        let id = self.last_detail_id?;
        info!("UserDashboard: retrying details for user {id}");
        Some(self.fetch_user_details(id))
    }

    pub fn last_list_page(&self) -> Option<PageNumber> {
        self.last_list_page
    }

    pub fn last_detail_id(&self) -> Option<UserId> {
        self.last_detail_id
    }

    /// Applies settlements that have arrived so far.
    pub fn sync(&mut self) -> usize {
        self.ctx.sync()
    }

    pub fn in_flight(&self) -> usize {
        self.ctx.task_count()
    }

    /// Waits for the next in-flight fetch to finish and applies its outcome.
    pub async fn settle_next(&mut self) -> bool {
        self.ctx.await_next().await
    }

    /// Waits for every in-flight fetch and applies the outcomes.
    pub async fn flush(&mut self) {
        self.ctx.flush().await;
    }

    pub async fn shutdown(&mut self) {
        self.ctx.shutdown().await;
    }
}
