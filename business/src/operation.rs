//! Lifecycle of a single asynchronous fetch.
//!
//! Every dispatch runs through `Idle -> Pending -> {Fulfilled, Rejected}`. The client state keeps
//! only the most recent status per [`OperationKind`]; there is no queue or history.

use std::fmt;

/// The two operations the dashboard performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Fetch the user list and slice one page out of it.
    List,
    /// Fetch one user record.
    Detail,
}

impl OperationKind {
    /// Log prefix for this operation.
    pub fn label(self) -> &'static str {
        match self {
            Self::List => "FetchUserListCommand",
            Self::Detail => "FetchUserDetailsCommand",
        }
    }

    /// Message surfaced once the retry budget is spent.
    pub fn failure_message(self, attempts: u32) -> String {
        match self {
            Self::List => format!("Failed to fetch users after {attempts} attempts"),
            Self::Detail => format!("Failed to fetch user details after {attempts} attempts"),
        }
    }

    /// Used when a rejection arrives without a message.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::List => "Failed to fetch users",
            Self::Detail => "Failed to fetch user details",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => f.write_str("list"),
            Self::Detail => f.write_str("detail"),
        }
    }
}

/// Status of the latest operation of one kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OperationStatus {
    /// No fetch attempted yet.
    #[default]
    Idle,
    /// Fetch in progress.
    Pending,
    /// The last fetch succeeded.
    Fulfilled,
    /// The last fetch failed with this message.
    Rejected(String),
}

impl OperationStatus {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_fulfilled(&self) -> bool {
        matches!(self, Self::Fulfilled)
    }

    /// Fulfilled or rejected.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Fulfilled | Self::Rejected(_))
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Rejected(msg) => Some(msg.as_str()),
            _ => None,
        }
    }
}
