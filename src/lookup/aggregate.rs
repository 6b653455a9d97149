use std::collections::BTreeMap;

use crate::lookup::outcome::LookupOutcome;

/// IP address to hostname. Ordered by key so output is stable between runs.
pub type ResultMap = BTreeMap<String, String>;

/// Fold outcomes into a `ResultMap`. Failed lookups are dropped.
/// If an address appears twice, the last resolved hostname wins.
pub fn aggregate<'a, I>(outcomes: I) -> ResultMap
where
    I: IntoIterator<Item = &'a LookupOutcome>,
{
    outcomes
        .into_iter()
        .filter_map(|outcome| match outcome {
            LookupOutcome::Resolved { ip, hostname } => Some((ip.to_owned(), hostname.to_owned())),
            LookupOutcome::Failed { .. } => None,
        })
        .collect()
}
