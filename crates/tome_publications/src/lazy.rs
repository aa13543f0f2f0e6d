//! Memoized async values
//!
//! [`Lazy`] wraps a zero-argument async resolver so that it runs at
//! most once, with every caller observing the same eventual result.

use std::future::Future;

use futures_util::future::{BoxFuture, FutureExt, Shared};

/// A lazily resolved, memoized async value
///
/// The resolver is not polled until the first [`get`](Lazy::get).
/// Concurrent `get` calls share a single execution, and the output is
/// cached for every later caller - including failures, when `T` is a
/// `Result`. There is no retry and no cancellation; re-resolution
/// means constructing a new `Lazy`.
pub struct Lazy<T: Clone> {
    shared: Shared<BoxFuture<'static, T>>,
}

impl<T> Lazy<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Wrap a resolver future
    pub fn new<F>(resolver: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            shared: resolver.boxed().shared(),
        }
    }

    /// Resolve (first call) or fetch the cached result (later calls)
    pub async fn get(&self) -> T {
        self.shared.clone().await
    }

    /// The cached result, if resolution already completed
    pub fn peek(&self) -> Option<T> {
        self.shared.peek().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn resolver_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = calls.clone();
        let lazy = Lazy::new(async move {
            counted.fetch_add(1, Ordering::SeqCst);
            42u32
        });

        assert_eq!(lazy.peek(), None);
        assert_eq!(lazy.get().await, 42);
        assert_eq!(lazy.get().await, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(lazy.peek(), Some(42));
    }

    #[tokio::test]
    async fn concurrent_getters_share_one_execution() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = calls.clone();
        let lazy = Arc::new(Lazy::new(async move {
            // Yield so both getters are in flight before completion
            tokio::task::yield_now().await;
            counted.fetch_add(1, Ordering::SeqCst);
            "done"
        }));

        let (a, b) = tokio::join!(lazy.get(), lazy.get());
        assert_eq!(a, "done");
        assert_eq!(b, "done");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failures_are_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = calls.clone();
        let lazy: Lazy<Result<u32, String>> = Lazy::new(async move {
            counted.fetch_add(1, Ordering::SeqCst);
            Err("nope".to_string())
        });

        assert!(lazy.get().await.is_err());
        assert!(lazy.get().await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
