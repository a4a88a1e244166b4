//! Bounded fan-out with a global dispatch spacing.
//!
//! Every item gets its own task. A task first waits for one of the
//! `concurrency` admission permits, then for the shared [`RateGate`], and only
//! then starts its unit of work. Dispatch instants across the whole run are
//! at least `spacing` apart, independent of how many permits exist.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

use crate::config::{DEFAULT_CONCURRENCY_LIMIT, DEFAULT_DISPATCH_INTERVAL_MS};

/// Serializes dispatches so that consecutive ones are `spacing` apart.
#[derive(Debug)]
pub struct RateGate {
    spacing: Duration,
    next: Mutex<Option<Instant>>,
}

impl RateGate {
    pub fn new(spacing: Duration) -> Self {
        Self {
            spacing,
            next: Mutex::new(None),
        }
    }

    /// Waits for the next free slot and returns the dispatch instant.
    /// The first call never waits.
    pub async fn ready(&self) -> Instant {
        let mut next = self.next.lock().await;
        if let Some(at) = *next {
            if at > Instant::now() {
                sleep_until(at).await;
            }
        }
        let now = Instant::now();
        *next = Some(now + self.spacing);
        now
    }
}

/// Results of a run bounded by a deadline.
#[derive(Debug)]
pub struct FanOutOutcome<R> {
    pub results: Vec<R>,
    /// Items whose workers were aborted when the deadline expired.
    pub abandoned: usize,
}

impl<R> FanOutOutcome<R> {
    pub fn is_complete(&self) -> bool {
        self.abandoned == 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FanOut {
    concurrency: usize,
    spacing: Duration,
}

impl Default for FanOut {
    fn default() -> Self {
        Self::new(
            DEFAULT_CONCURRENCY_LIMIT,
            Duration::from_millis(DEFAULT_DISPATCH_INTERVAL_MS),
        )
    }
}

impl FanOut {
    pub fn new(concurrency: usize, spacing: Duration) -> Self {
        Self {
            concurrency: concurrency.max(1),
            spacing,
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn spacing(&self) -> Duration {
        self.spacing
    }

    /// Runs `work` once per item and waits for all of them. Output order is
    /// completion order.
    pub async fn run<T, R, F, Fut>(&self, items: Vec<T>, work: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
    {
        if items.is_empty() {
            return Vec::new();
        }

        let total = items.len();
        let mut workers = self.spawn(items, work);
        let mut results = Vec::with_capacity(total);
        collect(&mut workers, &mut results).await;

        debug!("Fan-out finished: {}/{} items", results.len(), total);
        results
    }

    /// Like [`FanOut::run`], but aborts every outstanding worker once
    /// `deadline` elapses and returns what completed before that.
    pub async fn run_with_deadline<T, R, F, Fut>(
        &self,
        items: Vec<T>,
        work: F,
        deadline: Duration,
    ) -> FanOutOutcome<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
    {
        if items.is_empty() {
            return FanOutOutcome {
                results: Vec::new(),
                abandoned: 0,
            };
        }

        let total = items.len();
        let mut workers = self.spawn(items, work);
        let mut results = Vec::with_capacity(total);

        let expired = tokio::time::timeout(deadline, collect(&mut workers, &mut results))
            .await
            .is_err();

        if expired {
            warn!(
                "Deadline of {:?} expired with {} workers outstanding",
                deadline,
                workers.len()
            );
            workers.abort_all();
            collect(&mut workers, &mut results).await;
        }

        FanOutOutcome {
            abandoned: total - results.len(),
            results,
        }
    }

    fn spawn<T, R, F, Fut>(&self, items: Vec<T>, work: F) -> JoinSet<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
    {
        let permits = Arc::new(Semaphore::new(self.concurrency));
        let gate = Arc::new(RateGate::new(self.spacing));
        let work = Arc::new(work);

        let mut workers = JoinSet::new();
        for item in items {
            let permits = Arc::clone(&permits);
            let gate = Arc::clone(&gate);
            let work = Arc::clone(&work);

            workers.spawn(async move {
                // The semaphore is never closed, so acquisition only waits.
                let _permit = permits.acquire_owned().await;
                gate.ready().await;
                work(item).await
            });
        }
        workers
    }
}

async fn collect<R: Send + 'static>(workers: &mut JoinSet<R>, results: &mut Vec<R>) {
    while let Some(joined) = workers.join_next().await {
        match joined {
            Ok(result) => results.push(result),
            Err(e) if e.is_cancelled() => {}
            Err(e) => warn!("Fan-out worker panicked: {}", e),
        }
    }
}
