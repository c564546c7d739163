//! Lazily built, invalidatable caches.
//!
//! Query results (simplex lists, alpha classifications, surface integrals)
//! are computed on first access through `&self` and dropped when the owner
//! is mutated. [`LazyCache`] wraps an [`ArcSwapOption`] so the read path is a
//! lock-free load and readers keep their `Arc` snapshot alive even if the
//! cache is cleared behind them.

use arc_swap::ArcSwapOption;
use std::fmt;
use std::sync::Arc;

/// A value computed on demand and cleared on invalidation.
pub struct LazyCache<T> {
    slot: ArcSwapOption<T>,
}

impl<T> LazyCache<T> {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: ArcSwapOption::empty(),
        }
    }

    /// Returns the cached value, if present.
    #[must_use]
    pub fn get(&self) -> Option<Arc<T>> {
        self.slot.load_full()
    }

    /// Returns the cached value, building and storing it first if absent.
    pub fn get_or_build(&self, build: impl FnOnce() -> T) -> Arc<T> {
        if let Some(value) = self.slot.load_full() {
            return value;
        }
        let value = Arc::new(build());
        self.slot.store(Some(Arc::clone(&value)));
        value
    }

    /// Fallible form of [`get_or_build`](Self::get_or_build); nothing is
    /// stored when `build` fails.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `build`.
    pub fn get_or_try_build<E>(
        &self,
        build: impl FnOnce() -> Result<T, E>,
    ) -> Result<Arc<T>, E> {
        if let Some(value) = self.slot.load_full() {
            return Ok(value);
        }
        let value = Arc::new(build()?);
        self.slot.store(Some(Arc::clone(&value)));
        Ok(value)
    }

    /// Drops the cached value.
    pub fn invalidate(&self) {
        self.slot.store(None);
    }

    /// Returns `true` if a value is cached.
    #[must_use]
    pub fn is_cached(&self) -> bool {
        self.slot.load().is_some()
    }
}

impl<T> Default for LazyCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for LazyCache<T> {
    fn clone(&self) -> Self {
        Self {
            slot: ArcSwapOption::new(self.slot.load_full()),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for LazyCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LazyCache").field(&self.slot.load_full()).finish()
    }
}
