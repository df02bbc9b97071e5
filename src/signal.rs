use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;

pub struct Signal<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

struct Inner<T> {
    value: T,
    observers: Vec<mpsc::UnboundedSender<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone> Signal<T> {
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                value: initial,
                observers: Vec::new(),
            })),
        }
    }

    pub fn get(&self) -> T {
        self.lock().value.clone()
    }

    pub fn publish(&self, value: T) {
        let mut inner = self.lock();
        inner.observers.retain(|tx| tx.send(value.clone()).is_ok());
        inner.value = value;
    }

    /// Publishes the value returned by `f`, if any. `f` sees the current value.
    pub fn publish_with<F>(&self, f: F) -> Option<T>
    where
        F: FnOnce(&T) -> Option<T>,
    {
        let mut inner = self.lock();
        let next = f(&inner.value)?;
        inner.observers.retain(|tx| tx.send(next.clone()).is_ok());
        inner.value = next.clone();
        Some(next)
    }

    pub fn subscribe(&self) -> Subscription<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.lock();
        // The receiver is still alive here, so this cannot fail.
        let _ = tx.send(inner.value.clone());
        inner.observers.push(tx);
        Subscription { rx }
    }

    pub fn observer_count(&self) -> usize {
        let mut inner = self.lock();
        inner.observers.retain(|tx| !tx.is_closed());
        inner.observers.len()
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone + Default> Default for Signal<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + std::fmt::Debug> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal").field("value", &self.get()).finish()
    }
}

/// One observer's view of a [`Signal`]. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription<T> {
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T> Subscription<T> {
    /// Waits for the next value. `None` once every handle to the signal is gone.
    pub async fn next(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    pub fn try_next(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }
}
