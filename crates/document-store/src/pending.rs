//! One-shot result handles for repository calls.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;
use tokio::task::AbortHandle;

use crate::{Result, StoreError};

/// Handle to a store operation running as its own task.
///
/// Resolves to exactly one `Result<T>`. A producer that finishes without
/// delivering a value (for example because it panicked) resolves the handle
/// to [`StoreError::ResultDropped`] instead of leaving the caller waiting.
///
/// Dropping the handle before it resolves aborts the operation, so a
/// cancelled request stops its pending database work as well.
#[must_use = "a Pending does nothing useful unless awaited"]
pub struct Pending<T> {
    receiver: oneshot::Receiver<Result<T>>,
    task: Option<AbortHandle>,
}

impl<T: Send + 'static> Pending<T> {
    /// Schedules `operation` on the runtime and returns its handle.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F>(operation: F) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let (sender, receiver) = oneshot::channel();
        let handle = tokio::spawn(async move {
            // The receiver is gone when the caller stopped waiting.
            let _ = sender.send(operation.await);
        });

        Self {
            receiver,
            task: Some(handle.abort_handle()),
        }
    }
}

impl<T> Pending<T> {
    /// Returns a handle that is already resolved.
    pub fn ready(result: Result<T>) -> Self {
        let (sender, receiver) = oneshot::channel();
        let _ = sender.send(result);
        Self {
            receiver,
            task: None,
        }
    }

    /// Transforms the delivered value once it arrives.
    pub async fn map<U>(self, f: impl FnOnce(T) -> U) -> Result<U> {
        self.await.map(f)
    }
}

impl<T> Future for Pending<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let outcome = match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => result,
            Poll::Ready(Err(_)) => Err(StoreError::ResultDropped),
            Poll::Pending => return Poll::Pending,
        };
        self.task = None;
        Poll::Ready(outcome)
    }
}

impl<T> Drop for Pending<T> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl<T> std::fmt::Debug for Pending<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pending")
            .field("running", &self.task.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn spawned_operation_delivers_its_value() {
        let pending = Pending::spawn(async { Ok(21 * 2) });
        assert_eq!(pending.await.unwrap(), 42);
    }

    #[tokio::test]
    async fn spawned_operation_delivers_its_error() {
        let pending: Pending<()> =
            Pending::spawn(async { Err(StoreError::Backend("down".to_string())) });
        assert!(matches!(pending.await, Err(StoreError::Backend(msg)) if msg == "down"));
    }

    #[tokio::test]
    async fn ready_handle_resolves_immediately() {
        let pending = Pending::ready(Ok(Some("found")));
        assert_eq!(pending.await.unwrap(), Some("found"));
    }

    #[tokio::test]
    async fn producer_without_value_resolves_to_result_dropped() {
        let pending: Pending<u8> = Pending::spawn(async { panic!("producer crashed") });
        assert!(matches!(pending.await, Err(StoreError::ResultDropped)));
    }

    #[tokio::test]
    async fn map_transforms_value() {
        let pending = Pending::spawn(async { Ok(vec![1, 2, 3]) });
        assert_eq!(pending.map(|v| v.len()).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn dropping_handle_aborts_operation() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();

        let pending = Pending::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            flag.store(true, Ordering::SeqCst);
            Ok(())
        });
        drop(pending);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(!finished.load(Ordering::SeqCst));
    }
}
