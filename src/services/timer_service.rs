use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

/// Countdown for the question currently awaiting an answer. Ticks down
/// once per second while running, clamps at zero, and drives `on_expire`
/// exactly once when it gets there. The handle's owner cancels it on
/// submit, pause is a freeze rather than a cancel.
pub struct TimerHandle {
    question_code: String,
    remaining: Arc<AtomicU32>,
    running: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl TimerHandle {
    pub fn question_code(&self) -> &str {
        &self.question_code
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining.load(Ordering::Relaxed)
    }

    /// Freeze the countdown at its current value.
    pub fn pause(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    /// Continue counting down from the frozen value.
    pub fn resume(&self) {
        self.running.store(true, Ordering::Relaxed);
    }

    /// Stop the timer for good. Synchronous; the tick task never runs
    /// again after this returns.
    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Arm a countdown for a delivered question. `on_expire` runs inside the
/// timer task when the countdown reaches zero; the task exits afterwards,
/// so expiry fires at most once per armed timer.
pub fn arm<F>(question_code: String, limit_seconds: u32, on_expire: F) -> TimerHandle
where
    F: Future<Output = ()> + Send + 'static,
{
    let remaining = Arc::new(AtomicU32::new(limit_seconds));
    let running = Arc::new(AtomicBool::new(true));

    let task = {
        let remaining = Arc::clone(&remaining);
        let running = Arc::clone(&running);
        let code = question_code.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(1)).await;
                if !running.load(Ordering::Relaxed) {
                    continue;
                }
                let left = remaining.load(Ordering::Relaxed).saturating_sub(1);
                remaining.store(left, Ordering::Relaxed);
                if left == 0 {
                    debug!(question_code = %code, "answer timer expired");
                    on_expire.await;
                    return;
                }
            }
        })
    };

    TimerHandle {
        question_code,
        remaining,
        running,
        task,
    }
}
