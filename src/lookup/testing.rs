use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::lookup::resolver::{ResolveError, ReverseResolver};

#[derive(Clone, Debug)]
pub enum Behavior {
    Resolve(&'static str),
    Fail(ResolveError),
    Delay(Duration, &'static str),
    Hang,
    /// Blocks a thread of the blocking pool, like `getnameinfo`.
    Block(Duration),
    Panic,
}

/// Deterministic resolver for tests. Unknown addresses are `NotFound`.
pub struct MockResolver {
    behaviors: HashMap<IpAddr, Behavior>,
    default: Option<Behavior>,
    call_count: AtomicU64,
}

impl MockResolver {
    pub fn new() -> Self {
        Self {
            behaviors: HashMap::new(),
            default: None,
            call_count: AtomicU64::new(0),
        }
    }

    pub fn with(mut self, ip: &str, behavior: Behavior) -> Self {
        self.behaviors.insert(ip.parse().unwrap(), behavior);
        self
    }

    /// Behavior for every address without its own entry.
    pub fn with_default(mut self, behavior: Behavior) -> Self {
        self.default = Some(behavior);
        self
    }

    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ReverseResolver for MockResolver {
    async fn reverse(&self, ip: IpAddr) -> Result<String, ResolveError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);

        let behavior = self.behaviors.get(&ip).or(self.default.as_ref()).cloned();
        match behavior {
            Some(Behavior::Resolve(name)) => Ok(name.to_owned()),
            Some(Behavior::Fail(e)) => Err(e),
            Some(Behavior::Delay(delay, name)) => {
                tokio::time::sleep(delay).await;
                Ok(name.to_owned())
            }
            Some(Behavior::Hang) => std::future::pending().await,
            Some(Behavior::Block(delay)) => {
                tokio::task::spawn_blocking(move || std::thread::sleep(delay))
                    .await
                    .map_err(|e| ResolveError::Failed(e.to_string()))?;
                Err(ResolveError::NotFound)
            }
            Some(Behavior::Panic) => panic!("resolver blew up on {ip}"),
            None => Err(ResolveError::NotFound),
        }
    }
}
