//! Injections
//!
//! An [`Injection`] wraps one resolved [`Value`] and narrows it back to a
//! concrete type. There are three ways to narrow, captured by [`Narrowing`]:
//!
//! - a caller-supplied predicate
//! - a downcast to a concrete object type
//! - a primitive [`Kind`] tag
//!
//! An injection is either [`Required`] or [`Optional`]. A required injection
//! returns `T` and fails on any mismatch. An optional one returns
//! `Option<T>`, and an undefined value that fails the check comes back as
//! `None` instead of an error.

use std::any::{self, Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::TypeInjectError;
use crate::name::Name;
use crate::value::{Kind, Value};

/// Whether an injection must hold a value.
///
/// Implemented by [`Required`] and [`Optional`].
pub trait Mode {
    /// What a successful narrowing to `T` returns.
    type Output<T>;

    const REQUIRED: bool;

    fn present<T>(value: T) -> Self::Output<T>;

    /// What an undefined value that failed its check returns, if anything.
    fn absent<T>() -> Option<Self::Output<T>>;
}

/// The value must be present and match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Required;

/// The value may be undefined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Optional;

impl Mode for Required {
    type Output<T> = T;

    const REQUIRED: bool = true;

    fn present<T>(value: T) -> T {
        value
    }

    fn absent<T>() -> Option<T> {
        None
    }
}

impl Mode for Optional {
    type Output<T> = Option<T>;

    const REQUIRED: bool = false;

    fn present<T>(value: T) -> Option<T> {
        Some(value)
    }

    fn absent<T>() -> Option<Option<T>> {
        Some(None)
    }
}

/// A strategy for narrowing a [`Value`].
#[derive(Clone, Copy)]
pub enum Narrowing<'p> {
    /// The value satisfies a predicate. `label` names it in errors.
    Predicate {
        label: &'p str,
        test: &'p dyn Fn(&Value) -> bool,
    },

    /// The value is an object of a given concrete type.
    InstanceOf {
        type_id: TypeId,
        type_name: &'static str,
    },

    /// The value has a given primitive kind.
    Primitive(Kind),
}

impl<'p> Narrowing<'p> {
    /// Narrow with a labelled predicate.
    pub fn predicate(label: &'p str, test: &'p dyn Fn(&Value) -> bool) -> Self {
        Self::Predicate { label, test }
    }

    /// Narrow to objects of type `T`.
    pub fn instance_of<T: Any>() -> Self {
        Self::InstanceOf {
            type_id: TypeId::of::<T>(),
            type_name: any::type_name::<T>(),
        }
    }

    /// Check whether `value` passes this narrowing.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::Predicate { test, .. } => test(value),
            Self::InstanceOf { type_id, .. } => value.object_type_id() == Some(*type_id),
            Self::Primitive(kind) => value.kind() == *kind,
        }
    }

    /// How the narrowing is described in a [`TypeInjectError`].
    pub fn expected(&self) -> String {
        match self {
            Self::Predicate { label, .. } => (*label).to_owned(),
            Self::InstanceOf { type_name, .. } => (*type_name).to_owned(),
            Self::Primitive(kind) => kind.as_str().to_owned(),
        }
    }
}

impl fmt::Debug for Narrowing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predicate { label, .. } => f.debug_tuple("Predicate").field(label).finish(),
            Self::InstanceOf { type_name, .. } => {
                f.debug_tuple("InstanceOf").field(type_name).finish()
            }
            Self::Primitive(kind) => f.debug_tuple("Primitive").field(kind).finish(),
        }
    }
}

/// One resolved value, ready to be narrowed.
pub struct Injection<M: Mode = Required> {
    name: Name,
    value: Value,
    mode: PhantomData<M>,
}

impl Injection<Required> {
    /// A required injection of `value`, resolved for `name`.
    pub fn new(name: impl Into<Name>, value: Value) -> Self {
        Self::with_mode(name.into(), value)
    }
}

impl<M: Mode> Injection<M> {
    fn with_mode(name: Name, value: Value) -> Self {
        Self {
            name,
            value,
            mode: PhantomData,
        }
    }

    /// Get the name the value was resolved for.
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// The raw value, without any check.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Take the raw value, without any check.
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Check whether this injection must hold a value.
    pub fn is_required(&self) -> bool {
        M::REQUIRED
    }

    /// The same value, allowed to be undefined.
    pub fn optional(&self) -> Injection<Optional> {
        Injection::with_mode(self.name.clone(), self.value.clone())
    }

    /// The same value, required to be present.
    pub fn required(&self) -> Injection<Required> {
        Injection::with_mode(self.name.clone(), self.value.clone())
    }

    /// Narrow with any strategy, returning the value itself.
    pub fn narrow(&self, narrowing: Narrowing<'_>) -> Result<M::Output<Value>, TypeInjectError> {
        self.extract(narrowing, |value| Some(value.clone()))
    }

    /// Narrow with a predicate. `label` describes the check in errors.
    pub fn check(
        &self,
        label: &str,
        test: impl Fn(&Value) -> bool,
    ) -> Result<M::Output<Value>, TypeInjectError> {
        self.narrow(Narrowing::predicate(label, &test))
    }

    /// Narrow to an object of type `T`.
    pub fn instance<T: Any + Send + Sync>(&self) -> Result<M::Output<Arc<T>>, TypeInjectError> {
        self.extract(Narrowing::instance_of::<T>(), Value::downcast::<T>)
    }

    /// Narrow to a primitive kind, the analogue of a `typeof` check.
    pub fn type_of(&self, kind: Kind) -> Result<M::Output<Value>, TypeInjectError> {
        self.narrow(Narrowing::Primitive(kind))
    }

    /// Get the value as a `boolean`.
    pub fn boolean(&self) -> Result<M::Output<bool>, TypeInjectError> {
        self.extract(Narrowing::Primitive(Kind::Boolean), Value::as_bool)
    }

    /// Get the value as a `number`.
    pub fn number(&self) -> Result<M::Output<f64>, TypeInjectError> {
        self.extract(Narrowing::Primitive(Kind::Number), Value::as_number)
    }

    /// Get the value as a `bigint`.
    pub fn bigint(&self) -> Result<M::Output<i128>, TypeInjectError> {
        self.extract(Narrowing::Primitive(Kind::BigInt), Value::as_bigint)
    }

    /// Get the value as a `string`.
    pub fn string(&self) -> Result<M::Output<Arc<str>>, TypeInjectError> {
        self.extract(Narrowing::Primitive(Kind::String), |value| match value {
            Value::String(s) => Some(Arc::clone(s)),
            _ => None,
        })
    }

    /// Get the value as an `object`, without narrowing its type.
    pub fn object(&self) -> Result<M::Output<Arc<dyn Any + Send + Sync>>, TypeInjectError> {
        self.extract(Narrowing::Primitive(Kind::Object), |value| {
            value.as_object().map(Arc::clone)
        })
    }

    /// Check that the value is `undefined`.
    pub fn undefined(&self) -> Result<M::Output<()>, TypeInjectError> {
        self.extract(Narrowing::Primitive(Kind::Undefined), |value| {
            value.is_undefined().then_some(())
        })
    }

    fn extract<T>(
        &self,
        narrowing: Narrowing<'_>,
        get: impl FnOnce(&Value) -> Option<T>,
    ) -> Result<M::Output<T>, TypeInjectError> {
        if narrowing.matches(&self.value) {
            if let Some(value) = get(&self.value) {
                return Ok(M::present(value));
            }
        }

        if self.value.is_undefined() {
            if let Some(absent) = M::absent() {
                return Ok(absent);
            }
        }

        Err(TypeInjectError {
            name: self.name.clone(),
            expected: narrowing.expected(),
            found: self.value.kind(),
        })
    }
}

impl<M: Mode> Clone for Injection<M> {
    fn clone(&self) -> Self {
        Self::with_mode(self.name.clone(), self.value.clone())
    }
}

impl<M: Mode> fmt::Debug for Injection<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injection")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("required", &M::REQUIRED)
            .finish()
    }
}
