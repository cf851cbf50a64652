use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use poolwatch_core::{ClassifiedSnapshot, CoreError, QueueSnapshot};

use crate::events::PollEvent;
use crate::fetch::{Fetch, FetchQueues};

/// Poll the work pool on a fixed interval until `stop` flips true.
///
/// Each tick scans the table, classifies every item in the resulting
/// snapshot, and publishes exactly one event for the whole batch. A failed
/// tick publishes a `Failed` event and the loop simply tries again after the
/// same interval -- no backoff, no give-up.
pub async fn run_work_pool<F: Fetch>(
    interval: Duration,
    fetcher: F,
    updates: mpsc::Sender<PollEvent<ClassifiedSnapshot>>,
    stop: watch::Receiver<bool>,
) {
    let fetcher = &fetcher;
    poll_loop(
        interval,
        fetcher.source(),
        move || async move { fetcher.fetch().await.map(|snapshot| snapshot.classify()) },
        updates,
        stop,
    )
    .await;
}

/// Poll queue metrics on a fixed interval until `stop` flips true.
pub async fn run_queues<F: FetchQueues>(
    interval: Duration,
    fetcher: F,
    updates: mpsc::Sender<PollEvent<QueueSnapshot>>,
    stop: watch::Receiver<bool>,
) {
    let fetcher = &fetcher;
    poll_loop(
        interval,
        fetcher.source(),
        move || async move { fetcher.fetch().await },
        updates,
        stop,
    )
    .await;
}

/// The shared tick-sleep-tick driver.
///
/// Cancellation is cooperative: the stop signal is checked between ticks,
/// so an in-flight fetch always runs to completion and its result is still
/// delivered before the loop exits.
async fn poll_loop<T, F, Fut>(
    interval: Duration,
    source: &str,
    mut fetch: F,
    updates: mpsc::Sender<PollEvent<T>>,
    mut stop: watch::Receiver<bool>,
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CoreError>>,
{
    loop {
        if *stop.borrow() {
            break;
        }

        let event = match fetch().await {
            Ok(batch) => {
                debug!(source, "poll tick ok");
                PollEvent::Update(batch)
            }
            Err(error) => {
                warn!(source, error = %error, "poll tick failed, retrying next tick");
                PollEvent::Failed {
                    observed_at: Utc::now(),
                    error,
                }
            }
        };

        // Consumer gone means there is nobody left to render for.
        if updates.send(event).await.is_err() {
            break;
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            changed = stop.changed() => {
                if changed.is_err() || *stop.borrow() {
                    break;
                }
            }
        }
    }

    debug!(source, "poll loop stopped");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::Utc;
    use poolwatch_core::{Snapshot, WorkItem};

    use super::*;

    /// Fake fetcher: fails on the ticks listed in `fail_on`, otherwise
    /// returns a one-item snapshot whose uid carries the tick number.
    struct ScriptedFetcher {
        ticks: Arc<AtomicUsize>,
        fail_on: Vec<usize>,
    }

    impl ScriptedFetcher {
        fn new(fail_on: Vec<usize>) -> (Self, Arc<AtomicUsize>) {
            let ticks = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    ticks: ticks.clone(),
                    fail_on,
                },
                ticks,
            )
        }
    }

    #[async_trait]
    impl Fetch for ScriptedFetcher {
        async fn fetch(&self) -> Result<Snapshot, CoreError> {
            let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
            if self.fail_on.contains(&tick) {
                return Err(CoreError::Unavailable(format!("tick {tick} down")));
            }
            Ok(Snapshot::new(
                Utc::now(),
                vec![WorkItem {
                    entity_name: "converter".into(),
                    uid: format!("tick-{tick}"),
                    expires: Utc::now().timestamp() + 60,
                }],
                Vec::new(),
            ))
        }

        fn source(&self) -> &str {
            "scripted"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn failed_tick_reports_and_loop_keeps_polling() {
        let (fetcher, ticks) = ScriptedFetcher::new(vec![0]);
        let (tx, mut rx) = mpsc::channel(16);
        let (stop_tx, stop_rx) = watch::channel(false);

        let handle = tokio::spawn(run_work_pool(
            Duration::from_secs(5),
            fetcher,
            tx,
            stop_rx,
        ));

        // Tick 0 fails but is reported, not fatal.
        match rx.recv().await.unwrap() {
            PollEvent::Failed { error, .. } => {
                assert!(matches!(error, CoreError::Unavailable(_)));
            }
            PollEvent::Update(_) => panic!("expected a failed tick first"),
        }

        // Tick 1 happens after the interval and succeeds.
        match rx.recv().await.unwrap() {
            PollEvent::Update(snapshot) => {
                assert_eq!(snapshot.rows[0].item.uid, "tick-1");
            }
            PollEvent::Failed { .. } => panic!("expected tick 1 to succeed"),
        }

        assert!(ticks.load(Ordering::SeqCst) >= 2);

        stop_tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn events_arrive_in_tick_order() {
        let (fetcher, _) = ScriptedFetcher::new(Vec::new());
        let (tx, mut rx) = mpsc::channel(16);
        let (stop_tx, stop_rx) = watch::channel(false);

        let handle = tokio::spawn(run_work_pool(
            Duration::from_secs(1),
            fetcher,
            tx,
            stop_rx,
        ));

        for expected in 0..4 {
            match rx.recv().await.unwrap() {
                PollEvent::Update(snapshot) => {
                    assert_eq!(snapshot.rows[0].item.uid, format!("tick-{expected}"));
                }
                PollEvent::Failed { .. } => panic!("no failures scripted"),
            }
        }

        stop_tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn stop_ends_loop_after_inflight_tick() {
        let (fetcher, _) = ScriptedFetcher::new(Vec::new());
        let (tx, mut rx) = mpsc::channel(16);
        let (stop_tx, stop_rx) = watch::channel(false);

        let handle = tokio::spawn(run_work_pool(
            Duration::from_secs(60),
            fetcher,
            tx,
            stop_rx,
        ));

        // The first tick completes and is delivered even though we stop
        // right away.
        let first = rx.recv().await.unwrap();
        assert!(matches!(first, PollEvent::Update(_)));

        stop_tx.send(true).unwrap();
        handle.await.unwrap();

        // No further events after the loop exits.
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_consumer_ends_loop() {
        let (fetcher, _) = ScriptedFetcher::new(Vec::new());
        let (tx, rx) = mpsc::channel(1);
        let (_stop_tx, stop_rx) = watch::channel(false);

        drop(rx);

        let handle = tokio::spawn(run_work_pool(
            Duration::from_secs(1),
            fetcher,
            tx,
            stop_rx,
        ));

        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn classification_runs_once_per_batch() {
        let (fetcher, _) = ScriptedFetcher::new(Vec::new());
        let (tx, mut rx) = mpsc::channel(16);
        let (stop_tx, stop_rx) = watch::channel(false);

        let handle = tokio::spawn(run_work_pool(
            Duration::from_secs(5),
            fetcher,
            tx,
            stop_rx,
        ));

        match rx.recv().await.unwrap() {
            PollEvent::Update(snapshot) => {
                // The scripted item expires a minute out, so it classifies
                // fresh with a clamped elapsed time.
                assert_eq!(snapshot.rows.len(), 1);
                assert_eq!(snapshot.rows[0].elapsed, "00:00:00");
            }
            PollEvent::Failed { .. } => panic!("no failures scripted"),
        }

        stop_tx.send(true).unwrap();
        handle.await.unwrap();
    }
}
