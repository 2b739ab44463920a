//! Trellis Core
//!
//! This crate provides a dependency-ordered, lazily prepared value scope.
//! Callers declare named values in terms of a resource that is not
//! available yet, say which values need which, and later prepare them in
//! dependency order once the resource exists.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `graph`: Named dependency graph with cycle-checked load orders
//! - `scope`: Value store, declarations, preparation and injection
//! - `value`: Type-erased values and their primitive kinds
//! - `name`: Value names and declaration slots
//! - `config`: Scope configuration
//! - `error`: Error taxonomy
//!
//! # Example
//!
//! ```rust
//! use trellis_core::{Scope, Value};
//!
//! # async fn run() -> trellis_core::Result<()> {
//! let mut scope = Scope::<()>::new();
//!
//! scope.set("a", |_| Ok(Value::from(2)))?;
//! scope.set_with("b", ["a"], |_, inject| {
//!     Ok(Value::from(inject.inject("a")?.number()? * 10.0))
//! })?;
//!
//! // Runs the producer of `a`, then the one of `b`.
//! let b = scope.prepare("b", &()).await?;
//! assert_eq!(b, Value::from(20));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod name;
pub mod scope;
pub mod value;

pub use config::ScopeConfig;
pub use error::{BoxError, Result, ScopeError, TypeInjectError};
pub use graph::DependencyGraph;
pub use name::{Name, Slot};
pub use scope::{Inject, Injection, LazyInjector, Narrowing, Optional, Required, Scope};
pub use value::{Kind, Value};
