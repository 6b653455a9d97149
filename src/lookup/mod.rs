pub mod aggregate;
pub mod classify;
pub mod dispatch;
pub mod outcome;
pub mod resolver;
pub mod worker;

#[cfg(test)]
pub mod testing;

use tracing::{Level, event};

use crate::core::konst::APP_NAME;
use crate::lookup::aggregate::{ResultMap, aggregate};
use crate::lookup::classify::partition;
use crate::lookup::dispatch::Dispatcher;
use crate::lookup::outcome::LookupOutcome;

/// Everything one batch produced.
#[derive(Debug)]
pub struct BatchReport {
    pub map: ResultMap,
    /// Raw outcomes in completion order, failures included.
    pub outcomes: Vec<LookupOutcome>,
    /// Tokens that were not looked up.
    pub unsupported: Vec<String>,
}

/// Classify `tokens`, resolve the accepted ones and fold the results.
pub async fn run_batch<I, S>(tokens: I, dispatcher: &Dispatcher) -> BatchReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let (requests, unsupported) = partition(tokens);

    for token in &unsupported {
        event!(target: APP_NAME, Level::INFO, token = %token, "skipping unsupported input `{token}`");
    }

    let outcomes = dispatcher.run_all(requests).await;
    let map = aggregate(&outcomes);

    BatchReport {
        map,
        outcomes,
        unsupported,
    }
}
