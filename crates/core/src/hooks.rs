//! Filter hooks for overriding computed values.
//!
//! A [`Filter`] is an ordered list of callbacks. Each callback receives the
//! value produced so far plus a context argument and returns the value to use
//! instead. An empty filter passes the value through unchanged.

use std::fmt;

type Callback<T, C> = Box<dyn Fn(T, &C) -> T + Send + Sync>;

/// Ordered chain of override callbacks for one extension point.
pub struct Filter<T, C: ?Sized = ()> {
    callbacks: Vec<Callback<T, C>>,
}

impl<T, C: ?Sized> Filter<T, C> {
    /// Create an empty (pass-through) filter.
    pub fn new() -> Self {
        Self { callbacks: Vec::new() }
    }

    /// Register a callback. Callbacks run in registration order.
    pub fn add<F>(&mut self, callback: F)
    where
        F: Fn(T, &C) -> T + Send + Sync + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Builder form of [`Filter::add`].
    pub fn with<F>(mut self, callback: F) -> Self
    where
        F: Fn(T, &C) -> T + Send + Sync + 'static,
    {
        self.add(callback);
        self
    }

    /// Run `value` through every callback.
    pub fn apply(&self, value: T, context: &C) -> T {
        self.callbacks.iter().fold(value, |acc, callback| callback(acc, context))
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }
}

impl<T, C: ?Sized> Default for Filter<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C: ?Sized> fmt::Debug for Filter<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter").field("callbacks", &self.callbacks.len()).finish()
    }
}
