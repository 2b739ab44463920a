//! Value Store
//!
//! The store maps each declared name to either a producer that has not run
//! yet or the value it produced. An entry moves from
//! [`ValueEntry::Unprepared`] to [`ValueEntry::Prepared`] once, and only the
//! owning [`Scope`](crate::Scope) can make that move.

use std::fmt;
use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt};
use indexmap::IndexMap;

use super::inject::Inject;
use crate::error::{BoxError, Result, ScopeError};
use crate::name::Name;
use crate::value::Value;

/// A producer that finishes without suspending.
pub type SyncProducer<R> =
    Arc<dyn for<'a> Fn(&'a R, Inject<'a, R>) -> Result<Value, BoxError> + Send + Sync>;

/// A producer that may suspend while computing its value.
pub type AsyncProducer<R> = Arc<
    dyn for<'a> Fn(&'a R, Inject<'a, R>) -> BoxFuture<'a, Result<Value, BoxError>> + Send + Sync,
>;

/// How an unprepared value will be computed.
pub enum Producer<R> {
    Sync(SyncProducer<R>),
    Async(AsyncProducer<R>),
}

impl<R> Producer<R> {
    /// Wrap a producer that finishes without suspending.
    pub fn sync<F>(produce: F) -> Self
    where
        F: for<'a> Fn(&'a R, Inject<'a, R>) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        Self::Sync(Arc::new(produce))
    }

    /// Wrap a producer that returns a future.
    pub fn future<F>(produce: F) -> Self
    where
        F: for<'a> Fn(&'a R, Inject<'a, R>) -> BoxFuture<'a, Result<Value, BoxError>>
            + Send
            + Sync
            + 'static,
    {
        Self::Async(Arc::new(produce))
    }

    /// Run the producer as a future, whichever flavour it is.
    pub fn call<'a>(
        &self,
        resource: &'a R,
        inject: Inject<'a, R>,
    ) -> BoxFuture<'a, Result<Value, BoxError>> {
        match self {
            Self::Sync(produce) => futures_util::future::ready(produce(resource, inject)).boxed(),
            Self::Async(produce) => produce(resource, inject),
        }
    }

    /// Check whether the producer returns a future.
    pub fn is_async(&self) -> bool {
        matches!(self, Self::Async(_))
    }
}

impl<R> Clone for Producer<R> {
    fn clone(&self) -> Self {
        match self {
            Self::Sync(produce) => Self::Sync(Arc::clone(produce)),
            Self::Async(produce) => Self::Async(Arc::clone(produce)),
        }
    }
}

impl<R> fmt::Debug for Producer<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sync(_) => f.write_str("Producer::Sync(..)"),
            Self::Async(_) => f.write_str("Producer::Async(..)"),
        }
    }
}

/// A declared value.
pub enum ValueEntry<R> {
    /// Not evaluated yet.
    Unprepared(Producer<R>),

    /// Evaluated, and never evaluated again.
    Prepared(Value),
}

impl<R> ValueEntry<R> {
    /// Check whether the entry holds a cached value.
    pub fn is_prepared(&self) -> bool {
        matches!(self, Self::Prepared(_))
    }

    /// The cached value, if prepared.
    pub fn cached(&self) -> Option<&Value> {
        match self {
            Self::Prepared(value) => Some(value),
            Self::Unprepared(_) => None,
        }
    }
}

impl<R> Clone for ValueEntry<R> {
    fn clone(&self) -> Self {
        match self {
            Self::Unprepared(producer) => Self::Unprepared(producer.clone()),
            Self::Prepared(value) => Self::Prepared(value.clone()),
        }
    }
}

impl<R> fmt::Debug for ValueEntry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unprepared(producer) => f.debug_tuple("Unprepared").field(producer).finish(),
            Self::Prepared(value) => f.debug_tuple("Prepared").field(value).finish(),
        }
    }
}

/// Declared values, in declaration order.
pub struct ValueStore<R> {
    entries: IndexMap<Name, ValueEntry<R>>,
}

impl<R> Default for ValueStore<R> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<R> ValueStore<R> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a declared entry.
    ///
    /// # Errors
    ///
    /// [`ScopeError::UnknownName`] if `name` was never declared.
    pub fn entry(&self, name: &Name) -> Result<&ValueEntry<R>> {
        self.entries
            .get(name)
            .ok_or_else(|| ScopeError::UnknownName(name.clone()))
    }

    /// Look up the cached value of a prepared entry.
    ///
    /// # Errors
    ///
    /// [`ScopeError::UnknownName`] if `name` was never declared, and
    /// [`ScopeError::Unprepared`] if it has not been prepared.
    pub fn prepared(&self, name: &Name) -> Result<&Value> {
        self.entry(name)?
            .cached()
            .ok_or_else(|| ScopeError::Unprepared(name.clone()))
    }

    /// Add a new entry.
    ///
    /// # Errors
    ///
    /// [`ScopeError::Duplicate`] if `name` is already declared. The existing
    /// entry is left as it was.
    pub fn insert(&mut self, name: Name, entry: ValueEntry<R>) -> Result<()> {
        if self.entries.contains_key(&name) {
            return Err(ScopeError::Duplicate(name));
        }
        self.entries.insert(name, entry);
        Ok(())
    }

    /// Swap the entry of an existing name, keeping its position.
    pub(crate) fn replace(&mut self, name: &Name, entry: ValueEntry<R>) -> Result<ValueEntry<R>> {
        let slot = self
            .entries
            .get_mut(name)
            .ok_or_else(|| ScopeError::UnknownName(name.clone()))?;
        Ok(std::mem::replace(slot, entry))
    }

    /// Cache the value produced for `name`.
    pub(crate) fn fulfil(&mut self, name: &Name, value: Value) -> Result<()> {
        self.replace(name, ValueEntry::Prepared(value)).map(drop)
    }

    /// Check whether `name` is declared.
    pub fn contains(&self, name: &Name) -> bool {
        self.entries.contains_key(name)
    }

    /// Names of all entries, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &Name> {
        self.entries.keys()
    }

    /// Get the number of declared values.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether no values are declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<R> fmt::Debug for ValueStore<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}
