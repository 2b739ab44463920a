//! Value Names
//!
//! Every declared value and every graph node is identified by a [`Name`].
//! Callers usually pick a label; the scope can also mint an opaque token
//! when a declaration does not care what it is called.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Identifier of a declared value or a dependency graph node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Name {
    /// A caller-chosen label.
    Label(Arc<str>),

    /// An opaque token, usually minted by the scope.
    Token(u64),
}

impl Name {
    /// Create a fresh token.
    ///
    /// Tokens come from a process-wide counter, so two calls never return
    /// the same token. A caller may still construct a colliding
    /// `Name::Token` by hand, which is why the scope re-checks its own
    /// declarations before using one.
    pub fn token() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self::Token(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// The label, if this name is one.
    pub fn as_label(&self) -> Option<&str> {
        match self {
            Self::Label(label) => Some(label),
            Self::Token(_) => None,
        }
    }

    /// Check whether this name is a token.
    pub fn is_token(&self) -> bool {
        matches!(self, Self::Token(_))
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label(label) => f.write_str(label),
            Self::Token(id) => write!(f, "#{id}"),
        }
    }
}

impl From<&str> for Name {
    fn from(label: &str) -> Self {
        Self::Label(Arc::from(label))
    }
}

impl From<String> for Name {
    fn from(label: String) -> Self {
        Self::Label(Arc::from(label))
    }
}

impl From<&String> for Name {
    fn from(label: &String) -> Self {
        Self::Label(Arc::from(label.as_str()))
    }
}

impl From<u64> for Name {
    fn from(id: u64) -> Self {
        Self::Token(id)
    }
}

impl From<&Name> for Name {
    fn from(name: &Name) -> Self {
        name.clone()
    }
}

/// Where a declaration should be stored.
///
/// Declaration primitives take `impl Into<Slot>`, so a label or a [`Name`]
/// can be passed directly, and [`Slot::Fresh`] asks the scope to mint a
/// unique name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    Named(Name),
    Fresh,
}

impl From<Name> for Slot {
    fn from(name: Name) -> Self {
        Self::Named(name)
    }
}

impl From<&Name> for Slot {
    fn from(name: &Name) -> Self {
        Self::Named(name.clone())
    }
}

impl From<&str> for Slot {
    fn from(label: &str) -> Self {
        Self::Named(label.into())
    }
}

impl From<String> for Slot {
    fn from(label: String) -> Self {
        Self::Named(label.into())
    }
}

impl From<u64> for Slot {
    fn from(id: u64) -> Self {
        Self::Named(id.into())
    }
}

impl From<Option<Name>> for Slot {
    fn from(name: Option<Name>) -> Self {
        name.map_or(Self::Fresh, Self::Named)
    }
}
