//! Ordered fan-out
//!
//! Issues one future per item with at most `limit` in flight and hands the
//! results back in input order, whatever order they complete in.

use futures::stream::{self, StreamExt, TryStreamExt};
use std::future::Future;
use tracing::warn;

use crate::config::FanOutPolicy;
use crate::error::Result;

/// Run `task` over `items` concurrently, reassembling results in input order
///
/// Under [`FanOutPolicy::Strict`] the first failure (in input order) is
/// returned and nothing else. Under [`FanOutPolicy::Partial`] failing items
/// are logged and dropped.
pub async fn fan_out<I, T, F, Fut>(
    label: &str,
    items: Vec<I>,
    limit: usize,
    policy: FanOutPolicy,
    task: F,
) -> Result<Vec<T>>
where
    F: FnMut(I) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let tasks = stream::iter(items.into_iter().map(task)).buffered(limit.max(1));

    match policy {
        FanOutPolicy::Strict => tasks.try_collect().await,
        FanOutPolicy::Partial => {
            let results: Vec<Result<T>> = tasks.collect().await;
            let total = results.len();
            let mut kept = Vec::with_capacity(total);
            for (index, result) in results.into_iter().enumerate() {
                match result {
                    Ok(value) => kept.push(value),
                    Err(e) => warn!("{}: skipping item {} of {}: {}", label, index, total, e),
                }
            }
            Ok(kept)
        }
    }
}
