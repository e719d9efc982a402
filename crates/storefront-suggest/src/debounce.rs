//! Collapse bursts of calls into one delayed call.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::task::JoinHandle;

type Action<A> = Arc<dyn Fn(A) -> BoxFuture<'static, ()> + Send + Sync>;

/// Wraps an async action so that rapid calls collapse into a single
/// invocation `wait` after the last one, using the last call's arguments.
///
/// Each call cancels the previously *scheduled* invocation. An invocation
/// that has already started runs to completion; callers that care about
/// ordering must check results against their own current state.
///
/// Must be used from within a tokio runtime.
pub struct Debouncer<A> {
    action: Action<A>,
    wait: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<A: Send + 'static> Debouncer<A> {
    /// Create a debounced wrapper around `action`.
    pub fn new<F, Fut>(wait: Duration, action: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            action: Arc::new(move |args| -> BoxFuture<'static, ()> { Box::pin(action(args)) }),
            wait,
            pending: Mutex::new(None),
        }
    }

    /// Schedule `args`, replacing whatever was scheduled before.
    pub fn call(&self, args: A) {
        let action = Arc::clone(&self.action);
        let wait = self.wait;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            // Detached so that a later cancel cannot abort a running action.
            tokio::spawn(action(args));
        });

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.replace(timer) {
            previous.abort();
        }
    }
}

impl<A> Debouncer<A> {
    /// Drop the scheduled invocation, if any. Returns whether one was waiting.
    pub fn cancel(&self) -> bool {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        match pending.take() {
            Some(timer) if !timer.is_finished() => {
                timer.abort();
                true
            }
            _ => false,
        }
    }

    /// Whether an invocation is scheduled but has not fired yet.
    pub fn is_pending(&self) -> bool {
        let pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.as_ref().is_some_and(|timer| !timer.is_finished())
    }

    /// The quiet period.
    pub fn wait(&self) -> Duration {
        self.wait
    }
}

impl<A> Drop for Debouncer<A> {
    fn drop(&mut self) {
        let pending = self.pending.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(timer) = pending.take() {
            timer.abort();
        }
    }
}

impl<A> std::fmt::Debug for Debouncer<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("wait", &self.wait)
            .field("pending", &self.is_pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;
    use tokio::time::{sleep, Instant};

    fn recording(wait_ms: u64) -> (Debouncer<u32>, mpsc::UnboundedReceiver<(u32, Instant)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Debouncer::new(Duration::from_millis(wait_ms), move |n: u32| {
            let tx = tx.clone();
            async move {
                let _ = tx.send((n, Instant::now()));
            }
        });
        (debouncer, rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_to_last_call() {
        let (debouncer, mut rx) = recording(300);
        let start = Instant::now();

        debouncer.call(1);
        sleep(Duration::from_millis(10)).await;
        debouncer.call(2);
        sleep(Duration::from_millis(10)).await;
        debouncer.call(3);

        sleep(Duration::from_secs(1)).await;

        let (value, at) = rx.try_recv().expect("one invocation");
        assert_eq!(value, 3);
        assert_eq!(at - start, Duration::from_millis(320));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_calls_outside_window_each_fire() {
        let (debouncer, mut rx) = recording(100);

        debouncer.call(1);
        sleep(Duration::from_millis(150)).await;
        debouncer.call(2);
        sleep(Duration::from_millis(150)).await;

        assert_eq!(rx.try_recv().unwrap().0, 1);
        assert_eq!(rx.try_recv().unwrap().0, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_scheduled_call() {
        let (debouncer, mut rx) = recording(100);

        debouncer.call(1);
        assert!(debouncer.is_pending());
        assert!(debouncer.cancel());
        assert!(!debouncer.is_pending());
        sleep(Duration::from_millis(500)).await;

        assert!(rx.try_recv().is_err());
        assert!(!debouncer.cancel());
    }

    #[tokio::test(start_paused = true)]
    async fn test_instances_do_not_share_timers() {
        let (first, mut first_rx) = recording(100);
        let (second, mut second_rx) = recording(100);

        first.call(1);
        second.call(2);
        sleep(Duration::from_millis(200)).await;

        assert_eq!(first_rx.try_recv().unwrap().0, 1);
        assert_eq!(second_rx.try_recv().unwrap().0, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_started_action_survives_later_call() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let debouncer = Debouncer::new(Duration::from_millis(50), move |n: u32| {
            let tx = tx.clone();
            async move {
                sleep(Duration::from_millis(500)).await;
                let _ = tx.send(n);
            }
        });

        debouncer.call(1);
        sleep(Duration::from_millis(60)).await;
        debouncer.call(2);
        sleep(Duration::from_secs(2)).await;

        assert_eq!(rx.try_recv().unwrap(), 1);
        assert_eq!(rx.try_recv().unwrap(), 2);
    }
}
