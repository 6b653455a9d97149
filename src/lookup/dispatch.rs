use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{Level, event};

use crate::core::konst::APP_NAME;
use crate::lookup::classify::LookupRequest;
use crate::lookup::outcome::{FailureReason, LookupOutcome};
use crate::lookup::resolver::ReverseResolver;
use crate::lookup::worker::resolve;

/// Runs lookups concurrently, at most `parallelism` in flight.
pub struct Dispatcher {
    resolver: Arc<dyn ReverseResolver>,
    parallelism: usize,
    timeout: Duration,
    cancel: CancellationToken,
}

impl Dispatcher {
    pub fn new(resolver: Arc<dyn ReverseResolver>, parallelism: usize, timeout: Duration) -> Self {
        Self {
            resolver,
            parallelism: parallelism.max(1),
            timeout,
            cancel: CancellationToken::new(),
        }
    }

    /// Share a cancellation token with the batch. Cancelling it fails every
    /// lookup that has not completed yet.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    /// Resolve every request, returning exactly one outcome per request in
    /// completion order.
    pub async fn run_all(&self, requests: Vec<LookupRequest>) -> Vec<LookupOutcome> {
        event!(
            target: APP_NAME,
            Level::DEBUG,
            "dispatching {} lookups with parallelism {}",
            requests.len(),
            self.parallelism
        );

        futures::stream::iter(requests)
            .map(|request| {
                let resolver = self.resolver.clone();
                let cancel = self.cancel.clone();
                let timeout = self.timeout;
                async move {
                    let ip = request.ip.clone();
                    // A panicking resolver only takes down its own task.
                    let task =
                        tokio::spawn(async move { resolve(resolver.as_ref(), request, timeout, &cancel).await });
                    match task.await {
                        Ok(outcome) => outcome,
                        Err(e) => {
                            event!(target: APP_NAME, Level::ERROR, ip = %ip, "lookup worker failed: {e}");
                            LookupOutcome::failed(&ip, FailureReason::WorkerFault(e.to_string()))
                        }
                    }
                }
            })
            .buffer_unordered(self.parallelism)
            .collect()
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use tokio::time::Instant;

    use super::*;
    use crate::lookup::resolver::ResolveError;
    use crate::lookup::testing::{Behavior, MockResolver};

    const TIMEOUT: Duration = Duration::from_secs(3);

    fn requests(ips: &[&str]) -> Vec<LookupRequest> {
        ips.iter().map(|ip| LookupRequest { ip: (*ip).to_owned() }).collect()
    }

    fn ip_set(outcomes: &[LookupOutcome]) -> HashSet<String> {
        outcomes.iter().map(|o| o.ip().to_owned()).collect()
    }

    fn delayed(t: Duration) -> Arc<MockResolver> {
        Arc::new(MockResolver::new().with_default(Behavior::Delay(t, "host.example")))
    }

    const FIVE: [&str; 5] = ["10.0.0.1", "10.0.0.2", "10.0.0.3", "10.0.0.4", "10.0.0.5"];

    #[tokio::test]
    async fn one_outcome_per_request_for_any_parallelism() {
        let ips: Vec<String> = (1..=20).map(|i| format!("192.0.2.{i}")).collect();
        let ip_refs: Vec<&str> = ips.iter().map(String::as_str).collect();

        for parallelism in [1, 2, 3, 8, 64] {
            let resolver = Arc::new(
                MockResolver::new()
                    .with("192.0.2.1", Behavior::Resolve("one.example"))
                    .with("192.0.2.2", Behavior::Fail(ResolveError::Failed("refused".to_owned())))
                    .with("192.0.2.3", Behavior::Resolve("three.example")),
            );
            let dispatcher = Dispatcher::new(resolver.clone(), parallelism, TIMEOUT);
            let outcomes = dispatcher.run_all(requests(&ip_refs)).await;

            assert_eq!(outcomes.len(), ips.len());
            assert_eq!(ip_set(&outcomes), ips.iter().cloned().collect::<HashSet<_>>());
            assert_eq!(resolver.call_count(), ips.len() as u64);
        }
    }

    #[tokio::test]
    async fn empty_batch_returns_no_outcomes() {
        let dispatcher = Dispatcher::new(Arc::new(MockResolver::new()), 4, TIMEOUT);
        assert!(dispatcher.run_all(vec![]).await.is_empty());
    }

    #[tokio::test]
    async fn zero_parallelism_is_clamped_to_one() {
        let dispatcher = Dispatcher::new(Arc::new(MockResolver::new()), 0, TIMEOUT);
        assert_eq!(dispatcher.parallelism(), 1);
        assert_eq!(dispatcher.run_all(requests(&FIVE)).await.len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn sequential_when_parallelism_is_one() {
        let t = Duration::from_millis(200);
        let dispatcher = Dispatcher::new(delayed(t), 1, TIMEOUT);

        let start = Instant::now();
        let outcomes = dispatcher.run_all(requests(&FIVE)).await;
        let elapsed = start.elapsed();

        assert_eq!(outcomes.len(), 5);
        assert!(elapsed >= t * 5, "elapsed {elapsed:?}");
        assert!(elapsed < t * 6, "elapsed {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_when_parallelism_covers_batch() {
        let t = Duration::from_millis(200);
        let dispatcher = Dispatcher::new(delayed(t), 5, TIMEOUT);

        let start = Instant::now();
        let outcomes = dispatcher.run_all(requests(&FIVE)).await;
        let elapsed = start.elapsed();

        assert!(outcomes.iter().all(LookupOutcome::is_resolved));
        assert!(elapsed >= t, "elapsed {elapsed:?}");
        assert!(elapsed < t * 2, "elapsed {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn all_timeouts_bounded_by_waves_of_parallelism() {
        let resolver = Arc::new(MockResolver::new().with_default(Behavior::Hang));
        let dispatcher = Dispatcher::new(resolver, 2, TIMEOUT);

        let start = Instant::now();
        let outcomes = dispatcher.run_all(requests(&FIVE)).await;
        let elapsed = start.elapsed();

        // ceil(5 / 2) waves of one timeout each.
        assert_eq!(outcomes.len(), 5);
        assert!(
            outcomes
                .iter()
                .all(|o| matches!(o, LookupOutcome::Failed { reason: FailureReason::Timeout, .. }))
        );
        assert!(elapsed >= TIMEOUT * 3, "elapsed {elapsed:?}");
        assert!(elapsed < TIMEOUT * 3 + Duration::from_millis(100), "elapsed {elapsed:?}");
    }

    #[tokio::test]
    async fn panicking_worker_does_not_abort_siblings() {
        let resolver = Arc::new(
            MockResolver::new()
                .with("10.0.0.1", Behavior::Resolve("one.example"))
                .with("10.0.0.2", Behavior::Panic)
                .with("10.0.0.3", Behavior::Resolve("three.example")),
        );
        let dispatcher = Dispatcher::new(resolver, 3, TIMEOUT);
        let outcomes = dispatcher.run_all(requests(&["10.0.0.1", "10.0.0.2", "10.0.0.3"])).await;

        assert_eq!(outcomes.len(), 3);
        let faulted: Vec<&LookupOutcome> = outcomes
            .iter()
            .filter(|o| matches!(o, LookupOutcome::Failed { reason: FailureReason::WorkerFault(_), .. }))
            .collect();
        assert_eq!(faulted.len(), 1);
        assert_eq!(faulted[0].ip(), "10.0.0.2");
        assert!(outcomes.contains(&LookupOutcome::resolved("10.0.0.1", "one.example")));
        assert!(outcomes.contains(&LookupOutcome::resolved("10.0.0.3", "three.example")));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_still_yields_one_outcome_per_request() {
        let resolver = Arc::new(
            MockResolver::new()
                .with("10.0.0.1", Behavior::Resolve("fast.example"))
                .with_default(Behavior::Hang),
        );
        let cancel = CancellationToken::new();
        let dispatcher = Dispatcher::new(resolver, 2, TIMEOUT).with_cancellation(cancel.clone());

        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            canceller.cancel();
        });

        let start = Instant::now();
        let outcomes = dispatcher.run_all(requests(&FIVE)).await;

        assert_eq!(outcomes.len(), 5);
        assert!(start.elapsed() < TIMEOUT);
        assert!(outcomes.contains(&LookupOutcome::resolved("10.0.0.1", "fast.example")));
        let cancelled = outcomes
            .iter()
            .filter(|o| matches!(o, LookupOutcome::Failed { reason: FailureReason::Cancelled, .. }))
            .count();
        assert_eq!(cancelled, 4);
    }
}
