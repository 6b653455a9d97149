use std::future::Future;

use anyhow::Result;
use tokio::runtime::{Builder, Runtime};

pub fn build_runtime() -> Result<Runtime> {
    Ok(Builder::new_multi_thread().enable_all().build()?)
}

/// Drive `future` to completion, then shut the runtime down without waiting
/// on blocking tasks. A timed out `getnameinfo` call keeps its blocking
/// thread until it returns, which must not hold the process open.
pub fn block_on_detached<F: Future>(runtime: Runtime, future: F) -> F::Output {
    let output = runtime.block_on(future);
    runtime.shutdown_background();
    output
}
