//! Scheduler contract tests with synthetic workers.
//!
//! Workers here are plain futures instrumented with atomics; no network,
//! subprocess, or filesystem involvement. They exercise the dispatch-set,
//! concurrency-ceiling, and failure-containment guarantees.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ytgrab_core::error::{DownloadError, UnavailableReason};
use ytgrab_core::item::{DownloadMode, ItemOutcome, WorkItem};
use ytgrab_core::scheduler::{self, RangeSpec};

fn items(n: usize) -> Vec<WorkItem> {
    (0..n)
        .map(|i| WorkItem {
            url: format!("https://example.com/watch?v={i}"),
            mode: DownloadMode::Progressive,
        })
        .collect()
}

fn full_range() -> RangeSpec {
    RangeSpec::default()
}

#[tokio::test]
async fn dispatches_exactly_the_arithmetic_slice() {
    let dispatched = Arc::new(Mutex::new(Vec::new()));
    let range = RangeSpec {
        start: 0,
        stop: Some(7),
        step: 2,
    };

    let report = scheduler::run_batch(&items(7), range, 2, None, {
        let dispatched = Arc::clone(&dispatched);
        move |index, _item| {
            let dispatched = Arc::clone(&dispatched);
            async move {
                dispatched.lock().unwrap().push(index);
                ItemOutcome::Completed(format!("{index}.mp4").into())
            }
        }
    })
    .await
    .unwrap();

    let mut seen = dispatched.lock().unwrap().clone();
    seen.sort_unstable();
    assert_eq!(seen, vec![0, 2, 4, 6]);
    assert_eq!(report.items.len(), 4);
    assert_eq!(report.completed(), 4);
    // The report comes back in index order regardless of completion order.
    let indices: Vec<usize> = report.items.iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![0, 2, 4, 6]);
}

#[tokio::test]
async fn concurrency_never_exceeds_the_limit() {
    for cap in [1usize, 5, 50] {
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let report = scheduler::run_batch(&items(60), full_range(), cap, None, {
            let active = Arc::clone(&active);
            let peak = Arc::clone(&peak);
            move |index, _item| {
                let active = Arc::clone(&active);
                let peak = Arc::clone(&peak);
                async move {
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(2)).await;
                    active.fetch_sub(1, Ordering::SeqCst);
                    ItemOutcome::Completed(format!("{index}.mp4").into())
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(report.completed(), 60, "cap {cap}: all items complete");
        assert!(
            peak.load(Ordering::SeqCst) <= cap,
            "cap {cap}: peak concurrency {} exceeded the limit",
            peak.load(Ordering::SeqCst)
        );
        assert_eq!(active.load(Ordering::SeqCst), 0, "cap {cap}: no dangling workers");
    }
}

#[tokio::test]
async fn returns_only_after_every_worker_is_terminal() {
    let finished = Arc::new(AtomicUsize::new(0));

    let report = scheduler::run_batch(&items(20), full_range(), 4, None, {
        let finished = Arc::clone(&finished);
        move |index, _item| {
            let finished = Arc::clone(&finished);
            async move {
                tokio::time::sleep(Duration::from_millis(1)).await;
                finished.fetch_add(1, Ordering::SeqCst);
                ItemOutcome::Completed(format!("{index}.mp4").into())
            }
        }
    })
    .await
    .unwrap();

    // Every worker reached its terminal state before run_batch returned.
    assert_eq!(finished.load(Ordering::SeqCst), 20);
    assert_eq!(report.items.len(), 20);
}

#[tokio::test]
async fn unavailable_item_is_skipped_once_and_batch_continues() {
    let attempts = Arc::new(Mutex::new(HashMap::<usize, usize>::new()));

    let report = scheduler::run_batch(&items(6), full_range(), 3, None, {
        let attempts = Arc::clone(&attempts);
        move |index, _item| {
            let attempts = Arc::clone(&attempts);
            async move {
                *attempts.lock().unwrap().entry(index).or_insert(0) += 1;
                if index == 3 {
                    ItemOutcome::Skipped(UnavailableReason::Private)
                } else {
                    ItemOutcome::Completed(format!("{index}.mp4").into())
                }
            }
        }
    })
    .await
    .unwrap();

    assert_eq!(report.completed(), 5);
    assert_eq!(report.skipped(), 1);
    assert_eq!(report.failed(), 0);
    let attempts = attempts.lock().unwrap();
    assert_eq!(attempts.len(), 6);
    assert!(attempts.values().all(|&n| n == 1), "no item is retried");
}

#[tokio::test]
async fn panicking_worker_is_contained() {
    let report = scheduler::run_batch(&items(5), full_range(), 2, None, |index, _item| async move {
        if index == 2 {
            panic!("worker blew up");
        }
        ItemOutcome::Completed(format!("{index}.mp4").into())
    })
    .await
    .unwrap();

    assert_eq!(report.completed(), 4);
    assert_eq!(report.failed(), 1);
    let failed = report
        .items
        .iter()
        .find(|r| matches!(r.outcome, ItemOutcome::Failed(_)))
        .unwrap();
    assert_eq!(failed.index, 2);
}

#[tokio::test]
async fn invalid_range_fails_before_any_dispatch() {
    let dispatched = Arc::new(AtomicUsize::new(0));

    for range in [
        RangeSpec {
            start: 0,
            stop: None,
            step: 0,
        },
        RangeSpec {
            start: 0,
            stop: Some(99),
            step: 1,
        },
    ] {
        let err = scheduler::run_batch(&items(10), range, 4, None, {
            let dispatched = Arc::clone(&dispatched);
            move |index, _item| {
                let dispatched = Arc::clone(&dispatched);
                async move {
                    dispatched.fetch_add(1, Ordering::SeqCst);
                    ItemOutcome::Completed(format!("{index}.mp4").into())
                }
            }
        })
        .await
        .unwrap_err();
        assert!(matches!(err, DownloadError::InvalidRange(_)));
    }

    assert_eq!(dispatched.load(Ordering::SeqCst), 0, "nothing was started");
}

#[tokio::test]
async fn events_arrive_for_every_item() {
    let (tx, mut rx) = tokio::sync::mpsc::channel(16);

    let collector = tokio::spawn(async move {
        let mut dispatched = Vec::new();
        let mut finished = Vec::new();
        while let Some(ev) = rx.recv().await {
            match ev {
                scheduler::BatchEvent::Dispatched { index, .. } => dispatched.push(index),
                scheduler::BatchEvent::Finished { index, .. } => finished.push(index),
            }
        }
        (dispatched, finished)
    });

    let report = scheduler::run_batch(&items(8), full_range(), 3, Some(tx), |index, _item| {
        async move { ItemOutcome::Completed(format!("{index}.mp4").into()) }
    })
    .await
    .unwrap();
    assert_eq!(report.items.len(), 8);

    let (dispatched, mut finished) = collector.await.unwrap();
    // Dispatch order is the selection order.
    assert_eq!(dispatched, (0..8).collect::<Vec<_>>());
    finished.sort_unstable();
    assert_eq!(finished, (0..8).collect::<Vec<_>>());
}
