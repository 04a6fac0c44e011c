//! Thread spawning and bounded joins shared by both worker pools.

use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::bounded;
use tracing::{debug, warn};

use crate::core::SchedulerError;

/// How long `shutdown` waits for a pool's workers before detaching them.
pub(crate) const JOIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Spawn a named worker thread.
pub(crate) fn spawn_worker<F>(
    name: String,
    stack_size: Option<usize>,
    body: F,
) -> Result<JoinHandle<()>, SchedulerError>
where
    F: FnOnce() + Send + 'static,
{
    let mut builder = thread::Builder::new().name(name);
    if let Some(size) = stack_size {
        builder = builder.stack_size(size);
    }
    builder
        .spawn(body)
        .map_err(|e| SchedulerError::Spawn(e.to_string()))
}

/// Join workers against one shared [`JOIN_TIMEOUT`] deadline. Workers still
/// stuck in a task body when it passes are detached rather than blocking
/// shutdown.
pub(crate) fn join_workers(pool: &str, workers: Vec<JoinHandle<()>>) {
    let deadline = Instant::now() + JOIN_TIMEOUT;
    for (idx, worker) in workers.into_iter().enumerate() {
        if worker.is_finished() {
            log_join(pool, idx, worker.join().is_ok());
            continue;
        }

        let (tx, rx) = bounded(1);
        let joiner = thread::Builder::new()
            .name(format!("{pool}-joiner-{idx}"))
            .spawn(move || {
                let _ = tx.send(worker.join().is_ok());
            });
        let joiner = match joiner {
            Ok(joiner) => joiner,
            Err(e) => {
                warn!(pool, worker_id = idx, error = %e, "Failed to spawn joiner - detaching worker");
                continue;
            }
        };

        match rx.recv_deadline(deadline) {
            Ok(joined) => {
                log_join(pool, idx, joined);
                let _ = joiner.join();
            }
            Err(_) => {
                warn!(pool, worker_id = idx, "Worker did not exit within timeout - detaching");
            }
        }
    }
}

fn log_join(pool: &str, worker_id: usize, joined: bool) {
    if joined {
        debug!(pool, worker_id, "Worker joined");
    } else {
        warn!(pool, worker_id, "Worker panicked");
    }
}
