//! Users API client.
//!
//! Performs network IO against `GET /users` and `GET /users/{id}` and is intended to be used by
//! commands. Every call goes through the configured [`RetryPolicy`]; once the budget is spent
//! the caller receives a [`TerminalFailure`] with a fixed, operation-scoped message. The
//! underlying cause is logged here and not carried further.

use std::num::NonZeroUsize;
use std::sync::Arc;

use log::{error, info};
use serde::de::DeserializeOwned;
use thiserror::Error;
use ustr::Ustr;

use crate::BusinessConfig;
use crate::http::{FetchService, ReqwestFetcher, Request};
use crate::operation::OperationKind;
use crate::pagination::{PageNumber, slice};
use crate::retry::{RetryExhausted, RetryPolicy};
use crate::user::{User, UserId};

/// Why a single attempt failed. All variants are retried alike by the default policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("API returned status: {0}")]
    Status(u16),
    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// An operation gave up after exhausting its retry budget.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TerminalFailure {
    pub operation: OperationKind,
    pub attempts: u32,
    pub message: String,
}

impl TerminalFailure {
    pub fn new(operation: OperationKind, attempts: u32) -> Self {
        Self {
            operation,
            attempts,
            message: operation.failure_message(attempts),
        }
    }
}

/// One page of users together with the page count of the whole collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListResult {
    pub users: Vec<User>,
    pub total_pages: u32,
}

pub type ApiResult<T> = Result<T, TerminalFailure>;

/// Retry-wrapped client for the users endpoints.
#[derive(Debug, Clone)]
pub struct UsersApi {
    base_url: Ustr,
    items_per_page: NonZeroUsize,
    policy: RetryPolicy,
    fetcher: Arc<dyn FetchService>,
}

impl UsersApi {
    /// Client over the default reqwest transport.
    pub fn new(config: &BusinessConfig) -> Self {
        Self::with_fetcher(config, Arc::new(ReqwestFetcher::default()))
    }

    pub fn with_fetcher(config: &BusinessConfig, fetcher: Arc<dyn FetchService>) -> Self {
        Self {
            base_url: config.api_url(),
            items_per_page: config.items_per_page(),
            policy: config.retry_policy(),
            fetcher,
        }
    }

    /// Swaps in a custom retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// GET `/users`, unpaged.
    pub async fn fetch_list(&self) -> ApiResult<Vec<User>> {
        let url = format!("{}/users", self.base_url);
        self.get_with_retry(OperationKind::List, &url).await
    }

    /// GET `/users/{id}`
    pub async fn fetch_detail(&self, id: UserId) -> ApiResult<User> {
        let url = format!("{}/users/{id}", self.base_url);
        self.get_with_retry(OperationKind::Detail, &url).await
    }

    /// Fetches the whole collection and slices out `page`.
    pub async fn fetch_page(&self, page: PageNumber) -> ApiResult<ListResult> {
        let all = self.fetch_list().await?;
        let page_slice = slice(&all, page, self.items_per_page);
        info!(
            "UsersApi: page {page} holds {} of {} users ({} pages)",
            page_slice.items.len(),
            all.len(),
            page_slice.total_pages
        );

        Ok(ListResult {
            users: page_slice.items,
            total_pages: page_slice.total_pages,
        })
    }

    async fn get_with_retry<T: DeserializeOwned>(
        &self,
        operation: OperationKind,
        url: &str,
    ) -> ApiResult<T> {
        let label = operation.label();
        self.policy
            .run(label, |_attempt| self.get_once(url))
            .await
            .map_err(|RetryExhausted { attempts, last_error }| {
                error!("{label}: giving up after {attempts} attempts, last error: {last_error}");
                TerminalFailure::new(operation, attempts)
            })
    }

    /// One attempt: transport, status and body problems all surface as [`FetchError`].
    async fn get_once<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let response = self
            .fetcher
            .fetch(Request::get(url).header("accept", "application/json"))
            .await
            .map_err(|e| FetchError::Transport(e.message))?;

        if !response.is_success() {
            return Err(FetchError::Status(response.status));
        }

        response
            .json()
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::Instant;

    use super::*;
    use crate::test_utils::{ScriptedFetcher, Step, sample_user, sample_users};

    fn config() -> BusinessConfig {
        BusinessConfig::new("http://users.test")
            .with_retry_delay(Duration::from_millis(1000))
            .with_items_per_page(NonZeroUsize::new(10).expect("non-zero"))
    }

    #[tokio::test(start_paused = true)]
    async fn detail_succeeds_on_third_attempt_after_two_delays() {
        let fetcher = ScriptedFetcher::new(vec![
            Step::transport_error(),
            Step::status(500),
            Step::json(&sample_user(7)),
        ]);
        let api = UsersApi::with_fetcher(&config(), fetcher.clone());
        let start = Instant::now();

        let user = api.fetch_detail(7).await.expect("third attempt succeeds");

        assert_eq!(user, sample_user(7));
        assert_eq!(fetcher.calls(), 3);
        assert_eq!(start.elapsed(), Duration::from_millis(2000));
        assert_eq!(fetcher.urls()[0], "http://users.test/users/7");
    }

    #[tokio::test(start_paused = true)]
    async fn list_failing_every_attempt_is_terminal_with_fixed_message() {
        let fetcher = ScriptedFetcher::new(vec![Step::status(503); 3]);
        let api = UsersApi::with_fetcher(&config(), fetcher.clone());

        let err = api.fetch_list().await.expect_err("all attempts fail");

        assert_eq!(err.message, "Failed to fetch users after 3 attempts");
        assert_eq!(err.to_string(), "Failed to fetch users after 3 attempts");
        assert_eq!(err.attempts, 3);
        assert_eq!(fetcher.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn detail_failure_message_names_user_details() {
        let fetcher = ScriptedFetcher::new(vec![Step::transport_error(); 3]);
        let api = UsersApi::with_fetcher(&config(), fetcher);

        let err = api.fetch_detail(1).await.expect_err("all attempts fail");

        assert_eq!(err.message, "Failed to fetch user details after 3 attempts");
        assert_eq!(err.operation, OperationKind::Detail);
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_body_is_retried_like_a_transport_failure() {
        let fetcher = ScriptedFetcher::new(vec![
            Step::body(200, b""),
            Step::body(200, b"{not json"),
            Step::json(&sample_users(2)),
        ]);
        let api = UsersApi::with_fetcher(&config(), fetcher.clone());

        let users = api.fetch_list().await.expect("third attempt succeeds");

        assert_eq!(users.len(), 2);
        assert_eq!(fetcher.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_page_slices_full_collection() {
        let fetcher = ScriptedFetcher::new(vec![Step::json(&sample_users(23))]);
        let api = UsersApi::with_fetcher(&config(), fetcher.clone());

        let result = api
            .fetch_page(PageNumber::new(3).expect("non-zero"))
            .await
            .expect("page fetch succeeds");

        let ids: Vec<UserId> = result.users.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![21, 22, 23]);
        assert_eq!(result.total_pages, 3);
        assert_eq!(fetcher.urls(), vec!["http://users.test/users".to_owned()]);
    }

    #[tokio::test(start_paused = true)]
    async fn custom_policy_replaces_configured_budget() {
        let fetcher = ScriptedFetcher::new(vec![Step::status(500); 5]);
        let api = UsersApi::with_fetcher(&config(), fetcher.clone())
            .with_policy(RetryPolicy::fixed(5, Duration::from_millis(10)));

        let err = api.fetch_list().await.expect_err("all attempts fail");

        assert_eq!(err.message, "Failed to fetch users after 5 attempts");
        assert_eq!(fetcher.calls(), 5);
    }
}
