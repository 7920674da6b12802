//! Run selected items concurrently with a bounded worker pool.
//!
//! Keeps up to `max_concurrency` workers in flight at once; when one
//! finishes, the next selected index is dispatched until the selection is
//! exhausted, then the call drains remaining workers before returning.

use std::collections::HashMap;
use std::future::Future;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::error::DownloadError;
use crate::item::{ItemOutcome, WorkItem};

use super::progress::BatchEvent;
use super::range::RangeSpec;
use super::report::{BatchReport, ItemReport};

/// Runs `worker` over the selected indices of `items` with at most
/// `max_concurrency` workers alive at any point.
///
/// Guarantees:
/// - the range is validated before any worker is spawned;
/// - indices are dispatched in selection order (completion order races);
/// - every selected item is attempted exactly once, never retried;
/// - a worker's failure or panic is contained to its own report entry;
/// - the call returns only after every dispatched worker is terminal.
pub async fn run_batch<W, Fut>(
    items: &[WorkItem],
    range: RangeSpec,
    max_concurrency: usize,
    events: Option<mpsc::Sender<BatchEvent>>,
    worker: W,
) -> Result<BatchReport, DownloadError>
where
    W: Fn(usize, WorkItem) -> Fut,
    Fut: Future<Output = ItemOutcome> + Send + 'static,
{
    let resolved = range.resolve(items.len())?;
    let max_concurrency = max_concurrency.max(1);

    let mut pending = resolved.indices();
    let mut join_set: JoinSet<(usize, ItemOutcome)> = JoinSet::new();
    let mut task_index: HashMap<tokio::task::Id, usize> = HashMap::new();
    let mut report = BatchReport::default();

    loop {
        // Fill free slots in selection order.
        while join_set.len() < max_concurrency {
            let Some(index) = pending.next() else {
                break;
            };
            let item = items[index].clone();
            if let Some(tx) = &events {
                let _ = tx
                    .send(BatchEvent::Dispatched {
                        index,
                        url: item.url.clone(),
                    })
                    .await;
            }
            tracing::debug!(index, url = %item.url, "dispatching item");
            let fut = worker(index, item);
            let handle = join_set.spawn(async move { (index, fut.await) });
            task_index.insert(handle.id(), index);
        }

        if join_set.is_empty() {
            break;
        }

        let Some(joined) = join_set.join_next_with_id().await else {
            break;
        };
        let (index, outcome) = match joined {
            Ok((id, (index, outcome))) => {
                task_index.remove(&id);
                (index, outcome)
            }
            Err(join_err) => {
                // A panicking worker must not take the batch down.
                let Some(index) = task_index.remove(&join_err.id()) else {
                    tracing::error!("worker task {} not tracked: {}", join_err.id(), join_err);
                    continue;
                };
                tracing::error!("worker for item {} panicked: {}", index, join_err);
                (index, ItemOutcome::Failed(join_err.to_string()))
            }
        };

        if let Some(tx) = &events {
            let _ = tx
                .send(BatchEvent::Finished {
                    index,
                    outcome: outcome.clone(),
                })
                .await;
        }
        report.items.push(ItemReport { index, outcome });
    }

    report.items.sort_by_key(|r| r.index);
    Ok(report)
}
