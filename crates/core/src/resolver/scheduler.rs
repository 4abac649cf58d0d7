//! Bounded-concurrency batch scheduling with early termination.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::debug;

/// Settled results of a scheduler run.
///
/// `resolved` follows batch order, then within-batch completion order;
/// callers must not assume anything stronger.
#[derive(Debug)]
pub struct BatchOutcome<T, E> {
    pub resolved: Vec<T>,
    pub failures: Vec<E>,
    pub attempted: usize,
}

impl<T, E> BatchOutcome<T, E> {
    pub fn empty() -> Self {
        Self {
            resolved: Vec::new(),
            failures: Vec::new(),
            attempted: 0,
        }
    }
}

/// Runs work items in fixed-size concurrent batches.
///
/// The semaphore is the concurrency cap as a first-class value: at most
/// `max_concurrency` items are in flight, and a whole batch settles
/// (successes and failures both) before the next batch starts. This
/// bounds outbound load on the provider to one batch at a time. Once
/// `max_streams` successes have accumulated, no further batches are
/// issued; slow leftover candidates never hold up a request that already
/// has enough options.
pub struct BatchScheduler {
    max_concurrency: usize,
    max_streams: usize,
    permits: Arc<Semaphore>,
}

impl BatchScheduler {
    pub fn new(max_concurrency: usize, max_streams: usize) -> Self {
        let max_concurrency = max_concurrency.max(1);
        Self {
            max_concurrency,
            max_streams: max_streams.max(1),
            permits: Arc::new(Semaphore::new(max_concurrency)),
        }
    }

    /// Process `items` through `resolve`, batch by batch.
    pub async fn run<I, F, Fut, T, E>(&self, items: Vec<I>, resolve: F) -> BatchOutcome<T, E>
    where
        F: Fn(I) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut outcome = BatchOutcome::empty();
        let mut remaining = items;

        while !remaining.is_empty() {
            if outcome.resolved.len() >= self.max_streams {
                debug!(
                    resolved = outcome.resolved.len(),
                    skipped = remaining.len(),
                    "Stream target reached, stopping early"
                );
                break;
            }

            let take = self.max_concurrency.min(remaining.len());
            let batch: Vec<I> = remaining.drain(..take).collect();
            outcome.attempted += batch.len();

            let jobs: Vec<_> = batch
                .into_iter()
                .map(|item| {
                    let permits = Arc::clone(&self.permits);
                    let fut = resolve(item);
                    async move {
                        let _permit = permits.acquire_owned().await.ok();
                        fut.await
                    }
                })
                .collect();

            for result in futures::future::join_all(jobs).await {
                match result {
                    Ok(value) => outcome.resolved.push(value),
                    Err(e) => outcome.failures.push(e),
                }
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_early_termination_after_enough_streams() {
        // Candidates 1 and 3 succeed (one success per batch of two):
        // batch {1,2} then batch {3,4} reach the target; 5 is never tried.
        let scheduler = BatchScheduler::new(2, 2);
        let items: Vec<usize> = (1..=5).collect();

        let outcome = scheduler
            .run(items, |i| async move {
                if i == 1 || i == 3 {
                    Ok(i)
                } else {
                    Err(i)
                }
            })
            .await;

        assert_eq!(outcome.resolved, vec![1, 3]);
        assert_eq!(outcome.attempted, 4);
        assert_eq!(outcome.failures, vec![2, 4]);
    }

    #[tokio::test]
    async fn test_stops_after_first_batch_when_target_met() {
        let scheduler = BatchScheduler::new(2, 2);
        let items: Vec<usize> = (1..=6).collect();

        let outcome = scheduler
            .run(items, |i| async move { Ok::<_, usize>(i) })
            .await;

        assert_eq!(outcome.attempted, 2);
        assert_eq!(outcome.resolved, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_all_failures_attempts_everything() {
        let scheduler = BatchScheduler::new(3, 2);
        let items: Vec<usize> = (1..=7).collect();

        let outcome = scheduler.run(items, |i| async move { Err::<usize, _>(i) }).await;

        assert_eq!(outcome.attempted, 7);
        assert!(outcome.resolved.is_empty());
        assert_eq!(outcome.failures.len(), 7);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let scheduler = BatchScheduler::new(2, 2);
        let outcome = scheduler
            .run(Vec::<usize>::new(), |i| async move { Ok::<_, usize>(i) })
            .await;

        assert_eq!(outcome.attempted, 0);
        assert!(outcome.resolved.is_empty());
    }

    #[tokio::test]
    async fn test_concurrency_never_exceeds_cap() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let scheduler = BatchScheduler::new(2, 100);
        let items: Vec<usize> = (1..=8).collect();

        let outcome = scheduler
            .run(items, |i| {
                let in_flight = Arc::clone(&in_flight);
                let peak = Arc::clone(&peak);
                async move {
                    let current = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(current, Ordering::SeqCst);
                    tokio::task::yield_now().await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    Ok::<_, usize>(i)
                }
            })
            .await;

        assert_eq!(outcome.resolved.len(), 8);
        assert!(peak.load(Ordering::SeqCst) <= 2, "cap exceeded");
    }

    #[tokio::test]
    async fn test_batch_settles_before_next_starts() {
        // Track the order items begin; with a batch size of 2 the third
        // item must not start before both first-batch items finished.
        let started = Arc::new(std::sync::Mutex::new(Vec::new()));
        let finished = Arc::new(std::sync::Mutex::new(Vec::new()));
        let scheduler = BatchScheduler::new(2, 100);

        scheduler
            .run(vec![1usize, 2, 3], |i| {
                let started = Arc::clone(&started);
                let finished = Arc::clone(&finished);
                async move {
                    started.lock().unwrap().push(i);
                    tokio::task::yield_now().await;
                    finished.lock().unwrap().push(i);
                    Err::<usize, _>(i)
                }
            })
            .await;

        let started = started.lock().unwrap().clone();
        let finished = finished.lock().unwrap().clone();
        let third_started = started.iter().position(|&i| i == 3).unwrap();
        assert!(finished.contains(&1) && finished.contains(&2));
        assert_eq!(third_started, 2, "item 3 starts only in the second batch");
    }
}
