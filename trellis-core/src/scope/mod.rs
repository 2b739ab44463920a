//! Scope
//!
//! A [`Scope`] lets callers declare named values in terms of a resource that
//! does not exist yet, then prepare them once it does.
//!
//! # How It Works
//!
//! 1. Declarations (`set`, `set_with`, `set_to`, ...) add an entry to the
//!    value store and, for values with dependencies, edges to the graph.
//!    Nothing runs yet.
//!
//! 2. `prepare(name, resource)` asks the graph for the load order of
//!    `name`, then walks it. Prepared entries are skipped; every other
//!    producer runs with the resource and an [`Inject`] that can only read
//!    values prepared earlier in the walk.
//!
//! 3. Each result is cached. A producer runs at most once per scope.
//!
//! If a producer fails, the walk stops. Values prepared before the failure
//! stay prepared; the failed value and everything after it do not.

mod inject;
mod injection;
mod store;

pub use inject::{Inject, LazyInjector};
pub use injection::{Injection, Mode, Narrowing, Optional, Required};
pub use store::{AsyncProducer, Producer, SyncProducer, ValueEntry, ValueStore};

use std::fmt;
use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt};
use indexmap::IndexSet;
use tracing::{debug, info_span, trace, warn, Instrument};

use crate::config::ScopeConfig;
use crate::error::{BoxError, Result, ScopeError};
use crate::graph::DependencyGraph;
use crate::name::{Name, Slot};
use crate::value::Value;

/// Named values prepared lazily against a resource of type `R`.
///
/// The scope exclusively owns its graph and its values. Producers only see
/// the resource and the values they were ordered after.
pub struct Scope<R> {
    config: ScopeConfig,

    /// Which values need which, by name.
    graph: DependencyGraph,

    /// Every declared value, prepared or not.
    values: ValueStore<R>,
}

impl<R> Default for Scope<R> {
    fn default() -> Self {
        Self::with_config(ScopeConfig::default())
    }
}

impl<R> Scope<R> {
    /// Create an empty scope with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty scope with the given configuration.
    pub fn with_config(config: ScopeConfig) -> Self {
        Self {
            config,
            graph: DependencyGraph::new(),
            values: ValueStore::new(),
        }
    }

    /// Get the configuration this scope was created with.
    pub fn config(&self) -> &ScopeConfig {
        &self.config
    }

    /// Names of all declared values, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &Name> {
        self.values.names()
    }

    /// The number of declared values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check whether no values are declared.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check whether `name` is declared.
    pub fn contains(&self, name: &Name) -> bool {
        self.values.contains(name)
    }

    /// Look up a declared value.
    ///
    /// # Errors
    ///
    /// [`ScopeError::UnknownName`] if `name` was never declared.
    pub fn get(&self, name: &Name) -> Result<&ValueEntry<R>> {
        self.values.entry(name)
    }

    /// Whether `name` has been prepared.
    ///
    /// # Errors
    ///
    /// [`ScopeError::UnknownName`] if `name` was never declared.
    pub fn is_prepared(&self, name: &Name) -> Result<bool> {
        self.values.entry(name).map(ValueEntry::is_prepared)
    }

    /// The direct dependencies declared for `name`.
    pub fn dependencies(&self, name: &Name) -> Option<&IndexSet<Name>> {
        self.graph.get(name)
    }

    /// Get the dependency graph between declared values.
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// An injector over the values prepared so far.
    pub fn injector(&self) -> Inject<'_, R> {
        Inject::new(&self.values)
    }

    /// Forget every declaration.
    pub fn clear(&mut self) {
        debug!(values = self.values.len(), "clearing scope");
        self.graph.clear();
        self.values.clear();
    }
}

impl<R> Scope<R>
where
    R: Sync + 'static,
{
    /// Declare a value computed from the resource alone.
    ///
    /// # Errors
    ///
    /// [`ScopeError::Duplicate`] if the name is taken, and
    /// [`ScopeError::NameExhausted`] if a fresh name could not be minted.
    pub fn set<F>(&mut self, slot: impl Into<Slot>, produce: F) -> Result<Name>
    where
        F: Fn(&R) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        let producer = Producer::sync(move |resource, _| produce(resource));
        self.declare(slot.into(), "set", Vec::new(), ValueEntry::Unprepared(producer))
    }

    /// Declare a value computed asynchronously from the resource alone.
    pub fn set_async<F>(&mut self, slot: impl Into<Slot>, produce: F) -> Result<Name>
    where
        F: for<'a> Fn(&'a R) -> BoxFuture<'a, Result<Value, BoxError>> + Send + Sync + 'static,
    {
        let producer = Producer::future(move |resource, _| produce(resource));
        self.declare(
            slot.into(),
            "set_async",
            Vec::new(),
            ValueEntry::Unprepared(producer),
        )
    }

    /// Declare a value computed from the resource and other values.
    ///
    /// The producer's [`Inject`] can read every name in `depends_on`, and
    /// anything those names depend on.
    pub fn set_with<I, N, F>(
        &mut self,
        slot: impl Into<Slot>,
        depends_on: I,
        produce: F,
    ) -> Result<Name>
    where
        I: IntoIterator<Item = N>,
        N: Into<Name>,
        F: for<'a> Fn(&'a R, Inject<'a, R>) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        let depends_on = depends_on.into_iter().map(Into::into).collect();
        self.declare(
            slot.into(),
            "set_with",
            depends_on,
            ValueEntry::Unprepared(Producer::sync(produce)),
        )
    }

    /// Declare a value computed asynchronously from the resource and other
    /// values.
    pub fn set_with_async<I, N, F>(
        &mut self,
        slot: impl Into<Slot>,
        depends_on: I,
        produce: F,
    ) -> Result<Name>
    where
        I: IntoIterator<Item = N>,
        N: Into<Name>,
        F: for<'a> Fn(&'a R, Inject<'a, R>) -> BoxFuture<'a, Result<Value, BoxError>>
            + Send
            + Sync
            + 'static,
    {
        let depends_on = depends_on.into_iter().map(Into::into).collect();
        self.declare(
            slot.into(),
            "set_with_async",
            depends_on,
            ValueEntry::Unprepared(Producer::future(produce)),
        )
    }

    /// Declare a value that is prepared already.
    pub fn set_to(&mut self, slot: impl Into<Slot>, value: impl Into<Value>) -> Result<Name> {
        self.declare(
            slot.into(),
            "set_to",
            Vec::new(),
            ValueEntry::Prepared(value.into()),
        )
    }

    /// Give `of` another name.
    ///
    /// The alias takes whatever value `of` has when the alias is prepared.
    /// Redefining `of` afterwards does not change it.
    pub fn set_alias(&mut self, slot: impl Into<Slot>, of: impl Into<Name>) -> Result<Name> {
        let of = of.into();
        let source = of.clone();
        let producer = Producer::sync(move |_, inject| {
            Ok(inject.inject(source.clone())?.into_value())
        });
        self.declare(slot.into(), "set_alias", vec![of], ValueEntry::Unprepared(producer))
    }

    /// Snapshot the current definition of `of` under a new name.
    ///
    /// A prepared `of` is copied as a constant. An unprepared one lends its
    /// producer and direct dependencies, and the copy runs that producer on
    /// its own when prepared.
    ///
    /// # Errors
    ///
    /// [`ScopeError::UnknownName`] if `of` was never declared.
    pub fn set_copy(&mut self, slot: impl Into<Slot>, of: impl Into<Name>) -> Result<Name> {
        let of = of.into();
        let entry = self.values.entry(&of)?.clone();
        let depends_on = match &entry {
            ValueEntry::Prepared(_) => Vec::new(),
            ValueEntry::Unprepared(_) => self
                .graph
                .get(&of)
                .map(|dependencies| dependencies.iter().cloned().collect())
                .unwrap_or_default(),
        };
        self.declare(slot.into(), "set_copy", depends_on, entry)
    }

    /// Redefine `name` on top of its current definition.
    ///
    /// When prepared, `name` first obtains its previous value (the cached
    /// one, or by running the previous producer) and hands it to `over`.
    /// Dependencies declared for `name` are kept. Values that already copied
    /// or aliased `name` and were prepared keep what they have.
    ///
    /// # Errors
    ///
    /// [`ScopeError::UnknownName`] if `name` was never declared.
    pub fn set_over<F>(&mut self, name: impl Into<Name>, over: F) -> Result<()>
    where
        F: Fn(&R, Injection<Required>) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        let name = name.into();
        let label = name.clone();

        let producer = match self.values.entry(&name)?.clone() {
            ValueEntry::Prepared(cached) => Producer::sync(move |resource, _| {
                over(resource, Injection::new(label.clone(), cached.clone()))
            }),
            ValueEntry::Unprepared(previous) => {
                let over = Arc::new(over);
                Producer::future(move |resource, inject| {
                    let previous = previous.clone();
                    let over = Arc::clone(&over);
                    let label = label.clone();
                    async move {
                        let value = previous.call(resource, inject).await?;
                        over(resource, Injection::new(label, value))
                    }
                    .boxed()
                })
            }
        };

        debug!(%name, "redefining value");
        self.values.replace(&name, ValueEntry::Unprepared(producer))?;
        Ok(())
    }

    fn declare(
        &mut self,
        slot: Slot,
        primitive: &'static str,
        depends_on: Vec<Name>,
        entry: ValueEntry<R>,
    ) -> Result<Name> {
        let name = match slot {
            Slot::Named(name) => name,
            Slot::Fresh => self.mint()?,
        };

        if self.values.contains(&name) {
            return Err(ScopeError::Duplicate(name));
        }

        debug!(
            %name,
            primitive,
            dependencies = depends_on.len(),
            "declaring value"
        );

        if !depends_on.is_empty() {
            self.graph.on(depends_on, name.clone());
        }
        self.values.insert(name.clone(), entry)?;
        Ok(name)
    }

    /// A name not used by any value or graph node.
    fn mint(&self) -> Result<Name> {
        let attempts = self.config.name_attempts();
        for _ in 0..attempts {
            let name = Name::token();
            if !self.values.contains(&name) && !self.graph.contains(&name) {
                return Ok(name);
            }
        }
        Err(ScopeError::NameExhausted { attempts })
    }

    /// Prepare `name` and everything it depends on, returning its value.
    ///
    /// Already prepared values are returned as they are.
    ///
    /// # Errors
    ///
    /// - [`ScopeError::UnknownName`] if `name` or one of its dependencies
    ///   was never declared
    /// - [`ScopeError::DependencyCycle`] if `name` depends on itself
    /// - [`ScopeError::Unprepared`] if a producer injected a value it did not
    ///   declare
    /// - [`ScopeError::Producer`] if a producer failed on its own
    pub async fn prepare(&mut self, name: impl Into<Name>, resource: &R) -> Result<Value> {
        let name = name.into();
        if let Some(cached) = self.values.entry(&name)?.cached() {
            trace!(%name, "already prepared");
            return Ok(cached.clone());
        }

        let span = info_span!("prepare", name = %name);
        self.prepare_order(&name, resource).instrument(span).await
    }

    async fn prepare_order(&mut self, name: &Name, resource: &R) -> Result<Value> {
        let order = self.graph.load_order(name)?;

        if self.config.check_references {
            for dependency in &order {
                self.values.entry(dependency)?;
            }
        }

        let total = order.len();
        for (position, dependency) in order.iter().enumerate() {
            let producer = match self.values.entry(dependency)? {
                ValueEntry::Prepared(_) => {
                    trace!(%dependency, "skipping prepared value");
                    continue;
                }
                ValueEntry::Unprepared(producer) => producer.clone(),
            };

            debug!(
                %dependency,
                position,
                total,
                is_async = producer.is_async(),
                "running producer"
            );

            let produced = producer.call(resource, Inject::new(&self.values)).await;
            let value = produced.map_err(|error| {
                let error = ScopeError::from_producer(dependency, error);
                warn!(%dependency, %error, "producer failed");
                error
            })?;

            self.values.fulfil(dependency, value)?;
        }

        self.values.prepared(name).cloned()
    }

    /// An injector that prepares values as they are requested.
    pub fn prepare_injector<'s>(&'s mut self, resource: &'s R) -> LazyInjector<'s, R> {
        LazyInjector::new(self, resource)
    }
}

impl<R> fmt::Debug for Scope<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("config", &self.config)
            .field("graph", &self.graph)
            .field("values", &self.values)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    fn name(label: &str) -> Name {
        Name::from(label)
    }

    #[tokio::test]
    async fn prepare_walks_load_order() {
        let mut scope = Scope::<()>::new();
        scope.set("a", |_| Ok(Value::from(2))).unwrap();
        scope
            .set_with("b", ["a"], |_, inject| {
                Ok(Value::from(inject.inject("a")?.number()? * 10.0))
            })
            .unwrap();
        scope
            .set_with("c", ["b", "a"], |_, inject| {
                let b = inject.inject("b")?.number()?;
                let a = inject.inject("a")?.number()?;
                Ok(Value::from(b + a))
            })
            .unwrap();

        let order: Vec<_> = scope
            .graph()
            .load_order(&name("c"))
            .unwrap()
            .iter()
            .map(Name::to_string)
            .collect();
        assert_eq!(order, ["a", "b", "c"]);

        assert_eq!(scope.prepare("c", &()).await.unwrap(), Value::from(22));
        assert_eq!(scope.injector().inject("a").unwrap().number().unwrap(), 2.0);
        assert_eq!(scope.injector().inject("b").unwrap().number().unwrap(), 20.0);
        assert_eq!(scope.prepare("a", &()).await.unwrap(), Value::from(2));
    }

    #[tokio::test]
    async fn producers_run_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut scope = Scope::<()>::new();
        scope
            .set("counted", move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Value::from(1))
            })
            .unwrap();
        scope.set_alias("again", "counted").unwrap();

        for _ in 0..3 {
            scope.prepare("counted", &()).await.unwrap();
            scope.prepare("again", &()).await.unwrap();
        }
        let mut injector = scope.prepare_injector(&());
        injector.inject("counted").await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn producers_receive_the_resource() {
        struct Client {
            registry: &'static str,
        }

        let mut scope = Scope::<Client>::new();
        scope
            .set("image", |client| {
                Ok(Value::from(format!("{}/rust:1", client.registry)))
            })
            .unwrap();

        let client = Client {
            registry: "docker.io",
        };
        let image = scope.prepare("image", &client).await.unwrap();
        assert_eq!(image.as_str(), Some("docker.io/rust:1"));
    }

    #[tokio::test]
    async fn async_producers_are_awaited() {
        let mut scope = Scope::<u32>::new();
        scope
            .set_async("base", |resource| {
                async move {
                    tokio::task::yield_now().await;
                    Ok::<_, BoxError>(Value::from(*resource))
                }
                .boxed()
            })
            .unwrap();
        scope
            .set_with_async("derived", ["base"], |_, inject| {
                async move {
                    let base = inject.inject("base")?.number()?;
                    Ok::<_, BoxError>(Value::from(base + 1.0))
                }
                .boxed()
            })
            .unwrap();

        assert_eq!(scope.prepare("derived", &41).await.unwrap(), Value::from(42));
    }

    #[tokio::test]
    async fn undeclared_dependency_is_unprepared() {
        let mut scope = Scope::<()>::new();
        scope.set("a", |_| Ok(Value::from(1))).unwrap();
        scope
            .set("sneaky", |_| Ok(Value::Undefined))
            .unwrap();
        scope
            .set_with("b", ["sneaky"], |_, inject| Ok(inject.inject("a")?.into_value()))
            .unwrap();

        let error = scope.prepare("b", &()).await.unwrap_err();
        assert!(matches!(error, ScopeError::Unprepared(missing) if missing == name("a")));
        assert!(!scope.is_prepared(&name("a")).unwrap());
        assert!(scope.is_prepared(&name("sneaky")).unwrap());
        assert!(!scope.is_prepared(&name("b")).unwrap());
    }

    #[tokio::test]
    async fn unknown_names_fail_before_running_producers() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut scope = Scope::<()>::new();
        scope
            .set("a", move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Value::from(1))
            })
            .unwrap();
        scope
            .set_with("b", ["a", "typo"], |_, _| Ok(Value::Undefined))
            .unwrap();

        let error = scope.prepare("b", &()).await.unwrap_err();
        assert!(matches!(error, ScopeError::UnknownName(missing) if missing == name("typo")));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let error = scope.prepare("nothing", &()).await.unwrap_err();
        assert!(matches!(error, ScopeError::UnknownName(_)));
    }

    #[tokio::test]
    async fn unchecked_references_fail_lazily() {
        let config = ScopeConfig::default().with_check_references(false);
        let mut scope = Scope::<()>::with_config(config);
        scope.set("a", |_| Ok(Value::from(1))).unwrap();
        scope
            .set_with("b", ["a", "typo"], |_, _| Ok(Value::Undefined))
            .unwrap();

        let error = scope.prepare("b", &()).await.unwrap_err();
        assert!(matches!(error, ScopeError::UnknownName(_)));
        assert!(scope.is_prepared(&name("a")).unwrap());
    }

    #[tokio::test]
    async fn cycles_fail_prepare() {
        let mut scope = Scope::<()>::new();
        scope.set_with("a", ["b"], |_, _| Ok(Value::Undefined)).unwrap();
        scope.set_with("b", ["a"], |_, _| Ok(Value::Undefined)).unwrap();

        let error = scope.prepare("a", &()).await.unwrap_err();
        assert!(matches!(error, ScopeError::DependencyCycle { .. }));
    }

    #[tokio::test]
    async fn failed_producers_stay_unprepared() {
        let mut scope = Scope::<()>::new();
        scope.set("a", |_| Ok(Value::from(1))).unwrap();
        scope
            .set_with("b", ["a"], |_, _| Err("registry unreachable".into()))
            .unwrap();

        let error = scope.prepare("b", &()).await.unwrap_err();
        match error {
            ScopeError::Producer { name: failed, source } => {
                assert_eq!(failed, name("b"));
                assert_eq!(source.to_string(), "registry unreachable");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(scope.is_prepared(&name("a")).unwrap());
        assert!(!scope.is_prepared(&name("b")).unwrap());
    }

    #[tokio::test]
    async fn type_errors_pass_through_producers() {
        let mut scope = Scope::<()>::new();
        scope.set_to("a", "not a number").unwrap();
        scope
            .set_with("b", ["a"], |_, inject| {
                Ok(Value::from(inject.inject("a")?.number()?))
            })
            .unwrap();

        let error = scope.prepare("b", &()).await.unwrap_err();
        assert!(matches!(error, ScopeError::TypeInject(ref e) if e.name == name("a")));
    }

    #[test]
    fn duplicates_are_rejected() {
        let mut scope = Scope::<()>::new();
        scope.set_to("a", 1).unwrap();

        assert!(matches!(scope.set_to("a", 2), Err(ScopeError::Duplicate(_))));
        assert!(matches!(
            scope.set("a", |_| Ok(Value::Undefined)),
            Err(ScopeError::Duplicate(_))
        ));
        assert!(matches!(
            scope.set_with("a", ["x"], |_, _| Ok(Value::Undefined)),
            Err(ScopeError::Duplicate(_))
        ));
        assert!(matches!(scope.set_alias("a", "x"), Err(ScopeError::Duplicate(_))));
        assert!(scope.graph().get(&name("a")).is_none());
        assert_eq!(scope.len(), 1);
    }

    #[test]
    fn fresh_names_are_unique() {
        let mut scope = Scope::<()>::new();
        let taken = Name::token();
        scope.set_to(taken.clone(), 0).unwrap();

        let a = scope.set_to(Slot::Fresh, 1).unwrap();
        let b = scope.set_to(Slot::Fresh, 2).unwrap();

        assert!(a.is_token());
        assert_ne!(a, b);
        assert_ne!(a, taken);
        assert_eq!(scope.len(), 3);
    }

    /// Declare the next `count` tokens by hand so minting keeps colliding.
    fn occupy_tokens(scope: &mut Scope<()>, count: u64) {
        let start = match Name::token() {
            Name::Token(start) => start,
            Name::Label(_) => unreachable!(),
        };
        for id in start + 1..=start + count {
            scope.set_to(Name::Token(id), 0).unwrap();
        }
    }

    #[test]
    fn minting_gives_up_after_max_attempts() {
        let config = ScopeConfig::default().with_max_name_attempts(3);
        let mut scope = Scope::<()>::with_config(config);
        occupy_tokens(&mut scope, 10_000);

        assert!(matches!(
            scope.set_to(Slot::Fresh, 1),
            Err(ScopeError::NameExhausted { attempts: 3 })
        ));
        assert_eq!(scope.len(), 10_000);
    }

    #[test]
    fn minting_with_zero_attempts_still_tries_once() {
        let config = ScopeConfig::default().with_max_name_attempts(0);
        let mut scope = Scope::<()>::with_config(config);
        occupy_tokens(&mut scope, 10_000);

        assert!(matches!(
            scope.set(Slot::Fresh, |_| Ok(Value::Undefined)),
            Err(ScopeError::NameExhausted { attempts: 1 })
        ));
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn scopes_are_send_and_sync() {
        struct Client;

        assert_send_sync::<Scope<()>>();
        assert_send_sync::<Scope<Client>>();
        assert_send_sync::<Value>();
        assert_send_sync::<ScopeError>();
    }

    #[tokio::test]
    async fn set_copy_snapshots_prepared_values() {
        let mut scope = Scope::<()>::new();
        scope.set("a", |_| Ok(Value::from(1))).unwrap();
        scope.prepare("a", &()).await.unwrap();

        scope.set_copy("b", "a").unwrap();
        assert!(scope.is_prepared(&name("b")).unwrap());
        assert_eq!(scope.prepare("b", &()).await.unwrap(), Value::from(1));
    }

    #[tokio::test]
    async fn set_copy_shares_unprepared_producers() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut scope = Scope::<()>::new();
        scope.set_to("base", 5).unwrap();
        scope
            .set_with("a", ["base"], move |_, inject| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Value::from(inject.inject("base")?.number()? * 2.0))
            })
            .unwrap();

        let copy = scope.set_copy(Slot::Fresh, "a").unwrap();
        assert_eq!(
            scope.dependencies(&copy).map(|deps| deps.len()),
            Some(1)
        );

        assert_eq!(scope.prepare(copy, &()).await.unwrap(), Value::from(10));
        assert!(!scope.is_prepared(&name("a")).unwrap());
        assert_eq!(scope.prepare("a", &()).await.unwrap(), Value::from(10));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn set_over_wraps_unprepared_values() {
        let mut scope = Scope::<()>::new();
        scope.set_to("tag", "1.80").unwrap();
        scope
            .set_with("image", ["tag"], |_, inject| {
                let tag = inject.inject("tag")?.string()?;
                Ok(Value::from(format!("rust:{tag}")))
            })
            .unwrap();

        scope
            .set_over("image", |_, previous| {
                Ok(Value::from(format!("{}-slim", previous.string()?)))
            })
            .unwrap();

        assert_eq!(
            scope.prepare("image", &()).await.unwrap().as_str(),
            Some("rust:1.80-slim")
        );
        assert_eq!(scope.dependencies(&name("image")).map(|d| d.len()), Some(1));
    }

    #[tokio::test]
    async fn set_over_wraps_prepared_values() {
        let mut scope = Scope::<()>::new();
        scope.set_to("n", 3).unwrap();
        scope.set_alias("m", "n").unwrap();
        scope.prepare("m", &()).await.unwrap();

        scope
            .set_over("n", |_, previous| Ok(Value::from(previous.number()? + 1.0)))
            .unwrap();

        assert!(!scope.is_prepared(&name("n")).unwrap());
        assert_eq!(scope.prepare("n", &()).await.unwrap(), Value::from(4));
        assert_eq!(scope.prepare("m", &()).await.unwrap(), Value::from(3));
    }

    #[test]
    fn set_over_requires_a_declaration() {
        let mut scope = Scope::<()>::new();
        let result = scope.set_over("missing", |_, previous| Ok(previous.into_value()));
        assert!(matches!(result, Err(ScopeError::UnknownName(_))));
    }

    #[tokio::test]
    async fn clear_forgets_everything() {
        let mut scope = Scope::<()>::new();
        scope.set_to("a", 1).unwrap();
        scope.set_alias("b", "a").unwrap();
        scope.prepare("b", &()).await.unwrap();

        scope.clear();

        assert!(scope.is_empty());
        assert!(scope.graph().is_empty());
        assert!(matches!(
            scope.prepare("b", &()).await,
            Err(ScopeError::UnknownName(_))
        ));
    }

    #[test]
    fn names_keep_declaration_order() {
        let mut scope = Scope::<()>::new();
        scope.set_to("z", 1).unwrap();
        scope.set_alias("y", "z").unwrap();
        scope.set("x", |_| Ok(Value::Undefined)).unwrap();

        let names: Vec<_> = scope.names().map(Name::to_string).collect();
        assert_eq!(names, ["z", "y", "x"]);
        assert!(scope.contains(&name("y")));
        assert!(matches!(scope.get(&name("w")), Err(ScopeError::UnknownName(_))));
    }
}
