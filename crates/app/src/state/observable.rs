//! Publish-on-write state container.

use std::sync::Arc;

use tokio::sync::watch;

/// Holds a state snapshot and notifies subscribers on every write.
///
/// Clones share the same state. Writes never fail, even with no
/// subscribers.
#[derive(Debug)]
pub struct Observable<S> {
    sender: Arc<watch::Sender<S>>,
}

impl<S> Clone for Observable<S> {
    fn clone(&self) -> Self {
        Self {
            sender: Arc::clone(&self.sender),
        }
    }
}

impl<S: Default> Default for Observable<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S> Observable<S> {
    /// Create a container holding `initial`.
    #[must_use]
    pub fn new(initial: S) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Returns a receiver that sees the current snapshot and every later
    /// write.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.sender.subscribe()
    }

    /// Replace the snapshot, returning the previous one.
    pub fn replace(&self, state: S) -> S {
        self.sender.send_replace(state)
    }

    /// Modify the snapshot in place and notify subscribers.
    pub fn update(&self, f: impl FnOnce(&mut S)) {
        self.sender.send_modify(f);
    }

    /// Read a value derived from the snapshot without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.sender.borrow())
    }
}

impl<S: Clone> Observable<S> {
    /// Returns a copy of the current snapshot.
    #[must_use]
    pub fn get(&self) -> S {
        self.sender.borrow().clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_without_subscribers() {
        let state = Observable::new(1);
        assert_eq!(state.replace(2), 1);
        state.update(|n| *n += 1);
        assert_eq!(state.get(), 3);
    }

    #[tokio::test]
    async fn test_subscribers_are_notified() {
        let state = Observable::new(Vec::<u32>::new());
        let mut first = state.subscribe();
        let mut second = state.clone().subscribe();

        state.update(|v| v.push(7));

        first.changed().await.unwrap();
        second.changed().await.unwrap();
        assert_eq!(*first.borrow_and_update(), vec![7]);
        assert_eq!(*second.borrow_and_update(), vec![7]);
    }

    #[test]
    fn test_with_reads_in_place() {
        let state = Observable::new(vec![1, 2, 3]);
        assert_eq!(state.with(Vec::len), 3);
    }
}
