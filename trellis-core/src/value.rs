//! Scope Values
//!
//! The scope and its graph never know the concrete type of what they hold.
//! A [`Value`] carries a runtime [`Kind`] tag for the primitive cases and a
//! type-erased `Arc` for everything else; narrowing back to a concrete type
//! is the job of [`Injection`](crate::scope::Injection).

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// A type-erased value held by a scope.
///
/// Cloning is cheap: strings and objects are reference counted.
#[derive(Clone, Default)]
pub enum Value {
    /// The absence of a value.
    #[default]
    Undefined,
    Boolean(bool),
    Number(f64),
    BigInt(i128),
    String(Arc<str>),

    /// Any other `Send + Sync` type, recovered with a downcast.
    Object(Arc<dyn Any + Send + Sync>),
}

/// The primitive tag of a [`Value`], the analogue of `typeof`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Undefined,
    Boolean,
    Number,
    BigInt,
    String,
    Object,
}

impl Kind {
    /// Get the name `typeof` would report.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::BigInt => "bigint",
            Self::String => "string",
            Self::Object => "object",
        }
    }

    /// Every kind, in a fixed order.
    pub const ALL: [Kind; 6] = [
        Self::Undefined,
        Self::Boolean,
        Self::Number,
        Self::BigInt,
        Self::String,
        Self::Object,
    ];
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    /// Wrap an arbitrary value as an object.
    pub fn object<T: Any + Send + Sync>(value: T) -> Self {
        Self::Object(Arc::new(value))
    }

    /// Wrap an already shared value as an object without re-allocating.
    pub fn shared<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self::Object(value)
    }

    /// Get the primitive kind of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Self::Undefined => Kind::Undefined,
            Self::Boolean(_) => Kind::Boolean,
            Self::Number(_) => Kind::Number,
            Self::BigInt(_) => Kind::BigInt,
            Self::String(_) => Kind::String,
            Self::Object(_) => Kind::Object,
        }
    }

    /// Check whether this is `Undefined`.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Get the value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the value as a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the value as a bigint.
    pub fn as_bigint(&self) -> Option<i128> {
        match self {
            Self::BigInt(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the value as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the shared object, if this is one.
    pub fn as_object(&self) -> Option<&Arc<dyn Any + Send + Sync>> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// The `TypeId` of an object's concrete type.
    pub fn object_type_id(&self) -> Option<TypeId> {
        self.as_object().map(|object| (**object).type_id())
    }

    /// Whether this is an object of type `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.object_type_id() == Some(TypeId::of::<T>())
    }

    /// Borrow an object as `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_object().and_then(|object| object.downcast_ref::<T>())
    }

    /// Share an object as `Arc<T>`.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.as_object()
            .and_then(|object| Arc::clone(object).downcast::<T>().ok())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("Undefined"),
            Self::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
            Self::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Self::BigInt(n) => f.debug_tuple("BigInt").field(n).finish(),
            Self::String(s) => f.debug_tuple("String").field(s).finish(),
            Self::Object(_) => f.write_str("Object(..)"),
        }
    }
}

/// Primitives compare by content; objects compare by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) => true,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::BigInt(a), Self::BigInt(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Self::Undefined
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<i128> for Value {
    fn from(n: i128) -> Self {
        Self::BigInt(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(Arc::from(s))
    }
}

impl From<Arc<str>> for Value {
    fn from(s: Arc<str>) -> Self {
        Self::String(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Undefined, Into::into)
    }
}
