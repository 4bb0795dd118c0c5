//! Observable state cells published by the engines
//!
//! Models the reactive presentation boundary: each engine exposes its
//! state through [`Published`] values that a rendering layer can read
//! and subscribe to. Subscribers are notified synchronously, in
//! registration order, on every state transition.

use std::sync::Mutex;

/// Handle returned by [`Published::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber<T> = (SubscriptionId, Box<dyn FnMut(&T) + Send>);

/// A single observable state field
///
/// The value and the subscriber list live behind separate locks so a
/// callback may read any `Published` value. Callbacks must not
/// subscribe or unsubscribe from within a notification.
pub struct Published<T> {
    value: Mutex<T>,
    subscribers: Mutex<Vec<Subscriber<T>>>,
    next_id: Mutex<u64>,
}

impl<T> Published<T> {
    /// Creates a cell holding `initial`
    pub fn new(initial: T) -> Self {
        Self {
            value: Mutex::new(initial),
            subscribers: Mutex::new(Vec::new()),
            next_id: Mutex::new(0),
        }
    }

    /// Reads the current value through a closure without cloning
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let value = self.value.lock().unwrap();
        f(&value)
    }

    /// Registers a callback invoked on every subsequent transition
    pub fn subscribe(&self, f: impl FnMut(&T) + Send + 'static) -> SubscriptionId {
        let mut next_id = self.next_id.lock().unwrap();
        let id = SubscriptionId(*next_id);
        *next_id += 1;
        self.subscribers.lock().unwrap().push((id, Box::new(f)));
        id
    }

    /// Removes a previously registered callback
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.lock().unwrap().retain(|(sid, _)| *sid != id);
    }

    fn notify(&self, value: &T) {
        let mut subscribers = self.subscribers.lock().unwrap();
        for (_, f) in subscribers.iter_mut() {
            f(value);
        }
    }
}

impl<T: Clone> Published<T> {
    /// Returns a clone of the current value
    pub fn get(&self) -> T {
        self.value.lock().unwrap().clone()
    }

    /// Replaces the value and notifies all subscribers
    pub fn set(&self, new_value: T) {
        {
            let mut value = self.value.lock().unwrap();
            *value = new_value.clone();
        }
        self.notify(&new_value);
    }
}

impl<T: Default> Default for Published<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
