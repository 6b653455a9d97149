use std::fmt::Display;

use serde_derive::Serialize;

/// Why a lookup produced no hostname.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FailureReason {
    Timeout,
    NotFound,
    InvalidAddress,
    Cancelled,
    Resolver(String),
    WorkerFault(String),
}

impl Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::Timeout => write!(f, "timeout"),
            FailureReason::NotFound => write!(f, "not found"),
            FailureReason::InvalidAddress => write!(f, "invalid address"),
            FailureReason::Cancelled => write!(f, "cancelled"),
            FailureReason::Resolver(e) => write!(f, "resolver error: {e}"),
            FailureReason::WorkerFault(e) => write!(f, "worker fault: {e}"),
        }
    }
}

/// The result of one lookup request. Exactly one is produced per request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LookupOutcome {
    Resolved { ip: String, hostname: String },
    Failed { ip: String, reason: FailureReason },
}

impl LookupOutcome {
    pub fn resolved(ip: &str, hostname: &str) -> Self {
        LookupOutcome::Resolved {
            ip: ip.to_owned(),
            hostname: hostname.to_owned(),
        }
    }

    pub fn failed(ip: &str, reason: FailureReason) -> Self {
        LookupOutcome::Failed {
            ip: ip.to_owned(),
            reason,
        }
    }

    pub fn ip(&self) -> &str {
        match self {
            LookupOutcome::Resolved { ip, .. } => ip,
            LookupOutcome::Failed { ip, .. } => ip,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, LookupOutcome::Resolved { .. })
    }
}

impl Display for LookupOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupOutcome::Resolved { ip, hostname } => write!(f, "{ip} => {hostname}"),
            LookupOutcome::Failed { ip, reason } => write!(f, "{ip} => {reason}"),
        }
    }
}
