//! Owned periodic job scheduler.
//!
//! Each entry is a job, its interval and its next fire time. The scheduler
//! sleeps until the earliest entry is due, runs it, logs any failure and
//! reschedules it. A failing job never stops the loop.

use crate::error::AppResult;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// A unit of periodic work.
#[async_trait]
pub trait Job: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    async fn run(&self) -> AppResult<()>;
}

struct ScheduledJob {
    job: Box<dyn Job>,
    interval: Duration,
    next_fire: Instant,
}

/// Periodic job scheduler.
#[derive(Default)]
pub struct Scheduler {
    jobs: Vec<ScheduledJob>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job. With `run_immediately` the first run happens as soon
    /// as [`Scheduler::run`] starts, otherwise after one interval.
    pub fn add_job(&mut self, job: impl Job + 'static, interval: Duration, run_immediately: bool) {
        let now = Instant::now();
        let next_fire = if run_immediately { now } else { now + interval };
        info!(job = job.name(), ?interval, run_immediately, "Job scheduled");
        self.jobs.push(ScheduledJob {
            job: Box::new(job),
            interval,
            next_fire,
        });
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Run until `cancel` fires.
    ///
    /// A job already running when cancellation arrives is abandoned.
    pub async fn run(mut self, cancel: CancellationToken) {
        loop {
            let Some(idx) = self.next_due() else {
                cancel.cancelled().await;
                return;
            };
            let scheduled = self.jobs[idx].next_fire;

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("Scheduler stopped");
                    return;
                }
                _ = sleep_until(scheduled) => {}
            }

            let entry = &mut self.jobs[idx];
            debug!(job = entry.job.name(), "Job starting");

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!(job = entry.job.name(), "Scheduler stopped during job");
                    return;
                }
                result = entry.job.run() => {
                    if let Err(e) = result {
                        error!(
                            job = entry.job.name(),
                            error = %e,
                            "Job failed, retrying next interval"
                        );
                    }
                }
            }

            entry.next_fire = next_slot(scheduled, entry.interval, Instant::now());
            debug!(
                job = entry.job.name(),
                next_in = ?entry.next_fire.saturating_duration_since(Instant::now()),
                "Job rescheduled"
            );
        }
    }

    fn next_due(&self) -> Option<usize> {
        self.jobs
            .iter()
            .enumerate()
            .min_by_key(|(_, entry)| entry.next_fire)
            .map(|(idx, _)| idx)
    }
}

/// First slot after `now` on the grid `scheduled + k * interval`, k >= 1.
///
/// Slots missed while the job ran are skipped rather than run back to back.
fn next_slot(scheduled: Instant, interval: Duration, now: Instant) -> Instant {
    let mut next = scheduled + interval;
    if interval.is_zero() {
        return next.max(now);
    }
    while next <= now {
        next += interval;
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const TEN_HOURS: Duration = Duration::from_secs(36_000);

    struct CountingJob {
        runs: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl Job for CountingJob {
        fn name(&self) -> &str {
            "counting"
        }

        async fn run(&self) -> AppResult<()> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AppError::Task("boom".to_string()));
            }
            Ok(())
        }
    }

    fn counting(fail: bool) -> (CountingJob, Arc<AtomicUsize>) {
        let runs = Arc::new(AtomicUsize::new(0));
        (
            CountingJob {
                runs: runs.clone(),
                fail,
            },
            runs,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_immediately_then_on_interval() {
        let (job, runs) = counting(false);
        let mut scheduler = Scheduler::new();
        scheduler.add_job(job, TEN_HOURS, true);

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(scheduler.run(cancel.clone()));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        tokio::time::sleep(TEN_HOURS).await;
        assert_eq!(runs.load(Ordering::SeqCst), 2);

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_deferred_first_run() {
        let (job, runs) = counting(false);
        let mut scheduler = Scheduler::new();
        scheduler.add_job(job, Duration::from_secs(60), false);

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(scheduler.run(cancel.clone()));

        tokio::time::sleep(Duration::from_secs(59)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_do_not_stop_loop() {
        let (job, runs) = counting(true);
        let mut scheduler = Scheduler::new();
        scheduler.add_job(job, Duration::from_secs(10), true);

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(scheduler.run(cancel.clone()));

        tokio::time::sleep(Duration::from_secs(35)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 4);

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_jobs_keep_their_own_intervals() {
        let (fast, fast_runs) = counting(false);
        let (slow, slow_runs) = counting(false);
        let mut scheduler = Scheduler::new();
        scheduler.add_job(fast, Duration::from_secs(10), true);
        scheduler.add_job(slow, Duration::from_secs(25), true);
        assert_eq!(scheduler.len(), 2);

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(scheduler.run(cancel.clone()));

        tokio::time::sleep(Duration::from_secs(51)).await;
        assert_eq!(fast_runs.load(Ordering::SeqCst), 6);
        assert_eq!(slow_runs.load(Ordering::SeqCst), 3);

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_scheduler_waits_for_cancel() {
        let scheduler = Scheduler::new();
        assert!(scheduler.is_empty());

        let cancel = CancellationToken::new();
        cancel.cancel();
        scheduler.run(cancel).await;
    }

    #[test]
    fn test_next_slot_skips_missed() {
        let start = Instant::now();
        let interval = Duration::from_secs(10);

        assert_eq!(next_slot(start, interval, start), start + interval);
        assert_eq!(
            next_slot(start, interval, start + Duration::from_secs(25)),
            start + Duration::from_secs(30)
        );
    }
}
