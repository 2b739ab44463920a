//! Error Types
//!
//! All failures are plain control-flow signals: the scope never retries and
//! never repairs a declaration in place.

use thiserror::Error;

use crate::name::Name;
use crate::value::Kind;

/// Boxed error returned by producers.
///
/// Producers return this rather than [`ScopeError`] so that `?` works on
/// their own errors as well as on injector failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for scope operations.
pub type Result<T, E = ScopeError> = std::result::Result<T, E>;

/// Errors raised while declaring or preparing values.
#[derive(Debug, Error)]
pub enum ScopeError {
    /// Computing a load order reached a node that is still being visited.
    /// `from -> to` is the edge that closes the cycle.
    #[error("dependency cycle detected from {from} to {to}")]
    DependencyCycle { from: Name, to: Name },

    /// A declaration reused a name that is already in the scope.
    #[error("scope value {0} was already declared")]
    Duplicate(Name),

    /// A name was referenced that was never declared.
    #[error("scope value {0} was referenced before it was declared")]
    UnknownName(Name),

    /// An injector was asked for a declared name that is not prepared yet.
    #[error("scope value {0} is not prepared yet")]
    Unprepared(Name),

    #[error(transparent)]
    TypeInject(#[from] TypeInjectError),

    /// A producer failed with an error of its own.
    #[error("producer for {name} failed: {source}")]
    Producer {
        name: Name,
        #[source]
        source: BoxError,
    },

    /// No unused name could be minted.
    #[error("failed to mint a unique name in {attempts} attempts")]
    NameExhausted { attempts: usize },
}

impl ScopeError {
    /// Attribute a producer failure to `name`.
    ///
    /// Scope errors raised inside the producer (for example by its injector)
    /// are passed through unchanged.
    pub(crate) fn from_producer(name: &Name, error: BoxError) -> Self {
        match error.downcast::<ScopeError>() {
            Ok(scope_error) => *scope_error,
            Err(error) => match error.downcast::<TypeInjectError>() {
                Ok(type_error) => Self::TypeInject(*type_error),
                Err(source) => Self::Producer {
                    name: name.clone(),
                    source,
                },
            },
        }
    }

    /// The name the error is about, if it concerns a single value.
    pub fn name(&self) -> Option<&Name> {
        match self {
            Self::Duplicate(name)
            | Self::UnknownName(name)
            | Self::Unprepared(name)
            | Self::Producer { name, .. } => Some(name),
            Self::DependencyCycle { from, .. } => Some(from),
            Self::TypeInject(error) => Some(&error.name),
            Self::NameExhausted { .. } => None,
        }
    }
}

/// A resolved value failed the narrowing requested of it.
#[derive(Debug, Clone, Error)]
#[error("tried to get value {name} as {expected}, but a {found} does not meet that criteria")]
pub struct TypeInjectError {
    pub name: Name,
    pub expected: String,
    pub found: Kind,
}
