//! Test utilities for the business layer.
//!
//! [`ScriptedFetcher`] replays a fixed sequence of responses so retry counts and delays can be
//! asserted exactly under paused time. Integration tests against a real socket use wiremock
//! from `tests/`.
//!
//! # Example
//!
//! ```ignore
//! let fetcher = ScriptedFetcher::new(vec![Step::status(500), Step::json(&sample_user(7))]);
//! let api = UsersApi::with_fetcher(&config, fetcher.clone());
//! api.fetch_detail(7).await?;
//! assert_eq!(fetcher.calls(), 2);
//! ```

#![cfg(all(test, not(target_arch = "wasm32")))]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use crate::http::{BoxFuture, FetchService, HttpError, HttpResult, Request, Response};
use crate::user::{Address, Company, User, UserId};

/// One scripted answer.
#[derive(Debug, Clone)]
pub struct Step(HttpResult<Response>);

impl Step {
    /// The request never reaches a server.
    pub fn transport_error() -> Self {
        Self(Err(HttpError::new("connection refused")))
    }

    /// Empty body with the given status.
    pub fn status(status: u16) -> Self {
        Self::body(status, b"")
    }

    pub fn body(status: u16, body: &[u8]) -> Self {
        Self(Ok(Response {
            status,
            headers: HashMap::new(),
            body: body.to_vec(),
        }))
    }

    /// 200 with `value` serialized as JSON.
    pub fn json(value: &impl Serialize) -> Self {
        let body = serde_json::to_vec(value).expect("test value should serialize");
        Self::body(200, &body)
    }
}

#[derive(Debug, Default)]
struct Script {
    steps: VecDeque<Step>,
    urls: Vec<String>,
}

/// [`FetchService`] that answers from a script. Once the script runs out every call is a
/// transport error.
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    script: Mutex<Script>,
}

impl ScriptedFetcher {
    pub fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(Script {
                steps: steps.into(),
                urls: Vec::new(),
            }),
        })
    }

    /// Number of requests seen so far.
    pub fn calls(&self) -> usize {
        self.lock().urls.len()
    }

    /// Requested URLs in call order.
    pub fn urls(&self) -> Vec<String> {
        self.lock().urls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FetchService for ScriptedFetcher {
    fn fetch(&self, request: Request) -> BoxFuture<'_, HttpResult<Response>> {
        let step = {
            let mut script = self.lock();
            script.urls.push(request.url);
            script.steps.pop_front()
        };

        Box::pin(async move {
            match step {
                Some(Step(result)) => result,
                None => Err(HttpError::new("script exhausted")),
            }
        })
    }
}

/// Deterministic user record with the given id.
pub fn sample_user(id: UserId) -> User {
    User {
        id,
        name: format!("User {id}"),
        username: format!("user{id}"),
        email: format!("user{id}@example.com"),
        phone: format!("555-01{id:02}"),
        website: format!("user{id}.example.com"),
        company: Company {
            name: format!("Company {id}"),
            catch_phrase: "Synergised client-server interface".to_owned(),
            bs: "harness real-time e-markets".to_owned(),
        },
        address: Address {
            street: format!("{id} Main Street"),
            suite: format!("Apt. {id}"),
            city: "Gwenborough".to_owned(),
            zipcode: "92998-3874".to_owned(),
        },
    }
}

/// `sample_user(1)..=sample_user(n)`.
pub fn sample_users(n: u64) -> Vec<User> {
    (1..=n).map(sample_user).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_steps_in_order_then_fails() {
        let fetcher = ScriptedFetcher::new(vec![Step::status(500), Step::json(&sample_user(1))]);

        let first = fetcher.fetch(Request::get("http://a/1")).await.expect("scripted");
        assert_eq!(first.status, 500);

        let second = fetcher.fetch(Request::get("http://a/2")).await.expect("scripted");
        assert_eq!(second.json::<User>().expect("user json"), sample_user(1));

        assert!(fetcher.fetch(Request::get("http://a/3")).await.is_err());
        assert_eq!(fetcher.calls(), 3);
        assert_eq!(fetcher.urls(), vec!["http://a/1", "http://a/2", "http://a/3"]);
    }
}
