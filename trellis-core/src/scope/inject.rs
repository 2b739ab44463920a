//! Injectors
//!
//! There are two ways to turn a [`Name`] into an [`Injection`]:
//!
//! - [`Inject`] is handed to producers. It only reads values that are
//!   already prepared and never prepares anything itself, so a producer
//!   that reaches for a dependency it did not declare fails with
//!   [`ScopeError::Unprepared`](crate::ScopeError::Unprepared).
//! - [`LazyInjector`] is handed to outside callers. It prepares whatever it
//!   is asked for, then injects it.

use std::fmt;

use super::injection::{Injection, Required};
use super::store::ValueStore;
use super::Scope;
use crate::error::Result;
use crate::name::Name;

/// Read-only access to prepared values.
pub struct Inject<'a, R> {
    store: &'a ValueStore<R>,
}

impl<'a, R> Inject<'a, R> {
    /// Create an injector over `store`.
    pub(crate) fn new(store: &'a ValueStore<R>) -> Self {
        Self { store }
    }

    /// Inject a prepared value.
    ///
    /// # Errors
    ///
    /// [`ScopeError::UnknownName`](crate::ScopeError::UnknownName) if `name`
    /// was never declared, and
    /// [`ScopeError::Unprepared`](crate::ScopeError::Unprepared) if it is not
    /// prepared yet.
    pub fn inject(&self, name: impl Into<Name>) -> Result<Injection<Required>> {
        let name = name.into();
        let value = self.store.prepared(&name)?.clone();
        Ok(Injection::new(name, value))
    }
}

impl<R> Clone for Inject<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Inject<'_, R> {}

impl<R> fmt::Debug for Inject<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inject")
            .field("values", &self.store.len())
            .finish()
    }
}

/// Prepares values on demand against one resource.
///
/// Created by [`Scope::prepare_injector`].
pub struct LazyInjector<'s, R> {
    scope: &'s mut Scope<R>,
    resource: &'s R,
}

impl<'s, R> LazyInjector<'s, R>
where
    R: Sync + 'static,
{
    /// Create an injector that prepares values of `scope` against `resource`.
    pub(crate) fn new(scope: &'s mut Scope<R>, resource: &'s R) -> Self {
        Self { scope, resource }
    }

    /// Prepare `name` if needed, then inject it.
    ///
    /// # Errors
    ///
    /// Anything [`Scope::prepare`] can fail with.
    pub async fn inject(&mut self, name: impl Into<Name>) -> Result<Injection<Required>> {
        let name = name.into();
        let value = self.scope.prepare(name.clone(), self.resource).await?;
        Ok(Injection::new(name, value))
    }

    /// The scope behind this injector.
    pub fn scope(&self) -> &Scope<R> {
        &*self.scope
    }
}

impl<R> fmt::Debug for LazyInjector<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyInjector")
            .field("values", &self.scope.len())
            .finish()
    }
}
