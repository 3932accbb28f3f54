//! Users dashboard core: a retrying client for the users API, client-side page slicing and the
//! state machine the presentation layer reads from.

mod api;
mod client_state;
mod commands;
mod config;
mod dashboard;
mod http;
mod operation;
mod pagination;
mod retry;
mod user;

#[cfg(test)]
mod test_utils;

pub use api::{ApiResult, FetchError, ListResult, TerminalFailure, UsersApi};
pub use client_state::{ClientState, UserAction};
pub use commands::{FetchUserDetailsCommand, FetchUserListCommand};
pub use config::{
    BusinessConfig, ConfigError, DEFAULT_API_BASE_URL, DEFAULT_ITEMS_PER_PAGE,
    DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY, ENV_PREFIX,
};
pub use dashboard::UserDashboard;
pub use http::{
    BoxFuture, FetchService, HttpError, HttpResult, ReqwestFetcher, Request, Response,
};
pub use operation::{OperationKind, OperationStatus};
pub use pagination::{PageNumber, PageNumberError, PageSlice, slice, total_pages};
pub use retry::{RetryDecision, RetryExhausted, RetryPolicy};
pub use user::{Address, Company, User, UserId};

pub use userdash_states::{SettlePolicy, TaskId};
