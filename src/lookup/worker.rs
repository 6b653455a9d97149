use std::net::IpAddr;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{Level, event};

use crate::core::konst::APP_NAME;
use crate::lookup::classify::LookupRequest;
use crate::lookup::outcome::{FailureReason, LookupOutcome};
use crate::lookup::resolver::{ResolveError, ReverseResolver};

/// Reverse resolve one request within `timeout`.
///
/// Never fails: timeouts, missing records, resolver errors and batch
/// cancellation all become a `Failed` outcome for this request.
pub async fn resolve(
    resolver: &dyn ReverseResolver,
    request: LookupRequest,
    timeout: Duration,
    cancel: &CancellationToken,
) -> LookupOutcome {
    event!(target: APP_NAME, Level::INFO, ip = %request.ip, "looking up {}", request.ip);

    let ip = match request.ip.parse::<IpAddr>() {
        Ok(ip) => ip,
        Err(_) => {
            let outcome = LookupOutcome::failed(&request.ip, FailureReason::InvalidAddress);
            event!(target: APP_NAME, Level::WARN, ip = %request.ip, "{outcome}");
            return outcome;
        }
    };

    // The deadline is private to this lookup. When it fires only this
    // future is dropped.
    let lookup = tokio::time::timeout(timeout, resolver.reverse(ip));

    let outcome = tokio::select! {
        biased;
        _ = cancel.cancelled() => LookupOutcome::failed(&request.ip, FailureReason::Cancelled),
        result = lookup => match result {
            Ok(Ok(hostname)) => LookupOutcome::resolved(&request.ip, &hostname),
            Ok(Err(ResolveError::NotFound)) => LookupOutcome::failed(&request.ip, FailureReason::NotFound),
            Ok(Err(ResolveError::Failed(e))) => LookupOutcome::failed(&request.ip, FailureReason::Resolver(e)),
            Err(_) => LookupOutcome::failed(&request.ip, FailureReason::Timeout),
        },
    };

    match outcome.is_resolved() {
        true => event!(target: APP_NAME, Level::INFO, ip = %request.ip, "{outcome}"),
        false => event!(target: APP_NAME, Level::WARN, ip = %request.ip, "{outcome}"),
    }

    outcome
}
