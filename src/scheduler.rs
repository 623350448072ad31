use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;
use tracing::debug;

/// Progress callback: `(completed, total)`, fired once per task completion.
pub type ProgressFn = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// Runs `tasks` with at most `limit` in flight at any moment.
///
/// The returned vector is index-aligned with the input list regardless of
/// completion order. As soon as one in-flight task finishes, the next queued
/// task takes its slot, so the window stays full until the queue drains.
///
/// `on_progress` is invoked after each task's result is recorded, in
/// completion order, with the running completed count and the fixed total.
///
/// A `limit` of 0 is treated as 1 (serial execution). An empty task list
/// returns immediately without invoking the callback. Task "failure" is not
/// a concept at this level: whatever value a task resolves to is recorded,
/// so a conversion that produced a failed result schedules exactly like a
/// successful one.
pub async fn run_bounded<T, Fut>(
    tasks: Vec<Fut>,
    limit: usize,
    on_progress: Option<ProgressFn>,
) -> Vec<T>
where
    Fut: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let total = tasks.len();
    if total == 0 {
        return Vec::new();
    }

    let limit = limit.max(1);
    debug!("Dispatching {} tasks with concurrency limit {}", total, limit);

    let semaphore = Arc::new(Semaphore::new(limit));
    // Guards the completed counter so near-simultaneous completions report
    // strictly increasing counts.
    let completed = Arc::new(Mutex::new(0_usize));

    let mut handles = Vec::with_capacity(total);
    for task in tasks {
        let semaphore = Arc::clone(&semaphore);
        let completed = Arc::clone(&completed);
        let on_progress = on_progress.clone();

        handles.push(tokio::spawn(async move {
            // The semaphore is never closed, so acquire only fails on a
            // poisoned runtime shutdown.
            let _permit = semaphore
                .acquire_owned()
                .await
                .expect("scheduler semaphore closed");

            let result = task.await;

            if let Some(callback) = on_progress.as_deref() {
                let done = {
                    let mut count = completed.lock().unwrap();
                    *count += 1;
                    *count
                };
                callback(done, total);
            }

            result
        }));
    }

    // Awaiting handles in spawn order keeps results index-aligned.
    let mut results = Vec::with_capacity(total);
    for handle in handles {
        results.push(handle.await.expect("scheduled task panicked"));
    }

    debug!("All {} tasks completed", total);
    results
}
