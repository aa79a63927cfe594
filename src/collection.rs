//! Service collection module for dependency injection.
//!
//! This module contains the [`ServiceCollection`] builder used to register
//! services and seal them into an immutable [`Registry`].

use std::collections::HashMap;
use std::sync::Arc;

use crate::key::{key_of_trait, key_of_type, Key};
use crate::lifetime::Lifetime;
use crate::provider::ResolverContext;
use crate::registration::{AnyArc, ConvertFn, FactoryFn, OpaqueInstance, Registry, ServiceDescriptor};
use crate::ServiceProvider;

/// Factory closure as produced by a [`BindingResolver`].
pub type BoundFactory =
    Arc<dyn for<'a> Fn(&ResolverContext<'a>) -> OpaqueInstance + Send + Sync>;

/// External collaborator that derives a factory for a service type.
///
/// How the resolver knows a type's dependency list (an explicit manifest, a
/// registration-time builder, code generation) is opaque to the container:
/// the collection calls [`resolve_factory`](Self::resolve_factory) exactly
/// once per registration, at registration time, and only ever invokes the
/// returned closure afterwards.
pub trait BindingResolver {
    /// Produces the factory for the given service key.
    fn resolve_factory(&self, key: &Key) -> BoundFactory;
}

/// A builder for a service provider.
///
/// Collects descriptions of how to create services and which lifetime each
/// one has. [`seal`](Self::seal) freezes them into a [`Registry`];
/// [`build`](Self::build) is the one-shot convenience that seals and creates
/// a [`ServiceProvider`] directly.
///
/// Registering the same service type again does not replace the earlier
/// entry: descriptors for one key accumulate in order, the last one wins
/// single-value lookup, and [`get_all`](crate::Resolver::get_all) returns
/// every one.
///
/// # Examples
///
/// ```rust
/// use cobalt_di::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct Database { connection_string: String }
/// struct UserService { db: Arc<Database> }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Database {
///     connection_string: "postgres://localhost".to_string(),
/// });
/// services.add_transient_factory::<UserService, _>(|resolver| {
///     UserService { db: resolver.get_required::<Database>().unwrap() }
/// });
///
/// let provider = services.build();
/// let user_service = provider.get_required::<UserService>().unwrap();
/// assert_eq!(user_service.db.connection_string, "postgres://localhost");
/// ```
pub struct ServiceCollection {
    services: HashMap<Key, Vec<ServiceDescriptor>>,
}

fn identity_convert() -> ConvertFn {
    Arc::new(|any: AnyArc| any)
}

impl ServiceCollection {
    /// Creates a new empty service collection.
    pub fn new() -> Self {
        Self {
            services: HashMap::new(),
        }
    }

    fn append(&mut self, key: Key, descriptor: ServiceDescriptor) -> &mut Self {
        self.services.entry(key).or_default().push(descriptor);
        self
    }

    // ----- Untyped Registration Surface -----

    /// Registers a descriptor from raw factory and conversion closures.
    ///
    /// This is the lowest-level registration surface; the typed `add_*`
    /// helpers all reduce to it. The factory produces the opaque instance
    /// that gets cached (for Singleton/Scoped lifetimes); the conversion
    /// turns that instance into the handle shape lookups downcast. The
    /// caller is responsible for keeping factory output, conversion, and key
    /// consistent; a mismatch surfaces as
    /// [`DiError::TypeMismatch`](crate::DiError::TypeMismatch) at lookup
    /// time.
    pub fn register<F, C>(
        &mut self,
        key: Key,
        lifetime: Lifetime,
        factory: F,
        convert: C,
    ) -> &mut Self
    where
        F: for<'a> Fn(&ResolverContext<'a>) -> OpaqueInstance + Send + Sync + 'static,
        C: Fn(OpaqueInstance) -> OpaqueInstance + Send + Sync + 'static,
    {
        self.append(
            key,
            ServiceDescriptor::new(lifetime, Arc::new(factory), Arc::new(convert)),
        )
    }

    /// Registers a service whose factory comes from a [`BindingResolver`].
    ///
    /// The resolver is consulted once, here; lookups only ever run the
    /// closure it returned.
    pub fn register_with(
        &mut self,
        key: Key,
        lifetime: Lifetime,
        resolver: &dyn BindingResolver,
    ) -> &mut Self {
        let factory: FactoryFn = resolver.resolve_factory(&key);
        self.append(
            key,
            ServiceDescriptor::new(lifetime, factory, identity_convert()),
        )
    }

    // ----- Concrete Type Registrations -----

    /// Registers an existing value as a singleton.
    ///
    /// The value is wrapped in an `Arc` immediately; every lookup returns
    /// that same instance.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use cobalt_di::ServiceCollection;
    /// struct Config { database_url: String }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton(Config {
    ///     database_url: "postgres://localhost".to_string(),
    /// });
    /// ```
    pub fn add_singleton<T: 'static + Send + Sync>(&mut self, value: T) -> &mut Self {
        self.add_singleton_arc(Arc::new(value))
    }

    /// Registers an already-shared instance as a singleton.
    ///
    /// The collection and every provider built from it keep the `Arc`
    /// alive; the instance must therefore outlive all of them, which the
    /// shared ownership guarantees by itself.
    pub fn add_singleton_arc<T: 'static + Send + Sync>(&mut self, value: Arc<T>) -> &mut Self {
        self.add_existing_arc(value, Lifetime::Singleton)
    }

    /// Registers an already-shared instance under an arbitrary lifetime.
    ///
    /// With Singleton this is [`add_singleton_arc`](Self::add_singleton_arc).
    /// With Scoped or Transient the same shared instance is handed out to
    /// every owner; only the caching bookkeeping differs. Useful when a
    /// lifetime is picked by configuration rather than at the call site.
    pub fn add_existing_arc<T: 'static + Send + Sync>(
        &mut self,
        value: Arc<T>,
        lifetime: Lifetime,
    ) -> &mut Self {
        let factory = move |_: &ResolverContext| -> AnyArc { value.clone() };
        self.register(key_of_type::<T>(), lifetime, factory, |any| any)
    }

    /// Registers a singleton factory that creates the instance on first
    /// request.
    ///
    /// The factory runs at most once per provider; all later and concurrent
    /// requests observe the same instance. It receives a
    /// [`ResolverContext`] to resolve dependencies.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use cobalt_di::{ServiceCollection, Resolver};
    /// # use std::sync::Arc;
    /// struct Database { url: String }
    /// struct UserService { db: Arc<Database> }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton(Database { url: "postgres://localhost".to_string() });
    /// services.add_singleton_factory::<UserService, _>(|resolver| {
    ///     UserService { db: resolver.get_required::<Database>().unwrap() }
    /// });
    /// ```
    pub fn add_singleton_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: for<'a> Fn(&ResolverContext<'a>) -> T + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Singleton, factory)
    }

    /// Registers a scoped factory that creates one instance per scope.
    ///
    /// Within a scope the same instance is reused; different scopes get
    /// different instances. Requested directly on the root provider, the
    /// instance is cached in the provider's own table instead (see
    /// [`ServiceProvider`](crate::ServiceProvider)).
    pub fn add_scoped_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: for<'a> Fn(&ResolverContext<'a>) -> T + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Scoped, factory)
    }

    /// Registers a transient factory that creates a new instance on every
    /// request. No caching is performed.
    pub fn add_transient_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: for<'a> Fn(&ResolverContext<'a>) -> T + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Transient, factory)
    }

    fn add_factory<T, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: for<'a> Fn(&ResolverContext<'a>) -> T + Send + Sync + 'static,
    {
        let wrapped = move |r: &ResolverContext| -> AnyArc { Arc::new(factory(r)) };
        self.register(key_of_type::<T>(), lifetime, wrapped, |any| any)
    }

    // ----- Trait Registrations -----

    /// Registers an existing trait object as a singleton.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use cobalt_di::{ServiceCollection, Resolver};
    /// # use std::sync::Arc;
    /// trait Logger: Send + Sync {
    ///     fn log(&self, message: &str);
    /// }
    ///
    /// struct FileLogger;
    /// impl Logger for FileLogger {
    ///     fn log(&self, _message: &str) {}
    /// }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton_trait::<dyn Logger>(Arc::new(FileLogger));
    /// ```
    pub fn add_singleton_trait<T>(&mut self, value: Arc<T>) -> &mut Self
    where
        T: ?Sized + 'static + Send + Sync,
    {
        self.add_trait_implementation(value, Lifetime::Singleton)
    }

    /// Registers an existing trait object under an arbitrary lifetime.
    ///
    /// The same underlying implementation is handed to every consumer; the
    /// lifetime only decides which owner's table the handle is cached in.
    /// This is mainly useful for multi-binding setups where implementations
    /// are collected up front and registered in a loop.
    pub fn add_trait_implementation<T>(&mut self, value: Arc<T>, lifetime: Lifetime) -> &mut Self
    where
        T: ?Sized + 'static + Send + Sync,
    {
        // Trait handles are stored as Arc<Arc<dyn Trait>> inside the Any.
        let any_arc: AnyArc = Arc::new(value);
        let factory = move |_: &ResolverContext| -> AnyArc { any_arc.clone() };
        self.register(key_of_trait::<T>(), lifetime, factory, |any| any)
    }

    /// Registers a singleton trait factory. The factory must return an
    /// `Arc<Trait>`.
    pub fn add_singleton_trait_factory<Trait, F>(&mut self, factory: F) -> &mut Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: for<'a> Fn(&ResolverContext<'a>) -> Arc<Trait> + Send + Sync + 'static,
    {
        self.add_trait_factory_impl(Lifetime::Singleton, factory)
    }

    /// Registers a scoped trait factory: one implementation instance per
    /// scope.
    pub fn add_scoped_trait_factory<Trait, F>(&mut self, factory: F) -> &mut Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: for<'a> Fn(&ResolverContext<'a>) -> Arc<Trait> + Send + Sync + 'static,
    {
        self.add_trait_factory_impl(Lifetime::Scoped, factory)
    }

    /// Registers a transient trait factory: a fresh implementation on every
    /// request.
    pub fn add_transient_trait_factory<Trait, F>(&mut self, factory: F) -> &mut Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: for<'a> Fn(&ResolverContext<'a>) -> Arc<Trait> + Send + Sync + 'static,
    {
        self.add_trait_factory_impl(Lifetime::Transient, factory)
    }

    fn add_trait_factory_impl<Trait, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: for<'a> Fn(&ResolverContext<'a>) -> Arc<Trait> + Send + Sync + 'static,
    {
        let wrapped = move |r: &ResolverContext| -> AnyArc { Arc::new(factory(r)) };
        self.register(key_of_trait::<Trait>(), lifetime, wrapped, |any| any)
    }

    /// Registers a concrete implementation under a trait key.
    ///
    /// The cached instance is the concrete `Arc<TImpl>`; the `upcast`
    /// closure narrows it to the trait handle on every lookup, usually a
    /// plain unsized coercion. This keeps one shared concrete instance while
    /// callers only ever see the interface.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use cobalt_di::{ServiceCollection, Lifetime, Resolver};
    /// # use std::sync::Arc;
    /// trait Greeter: Send + Sync {
    ///     fn greet(&self) -> String;
    /// }
    ///
    /// struct EnglishGreeter;
    /// impl Greeter for EnglishGreeter {
    ///     fn greet(&self) -> String { "hello".to_string() }
    /// }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_trait_impl_factory::<dyn Greeter, EnglishGreeter, _, _>(
    ///     Lifetime::Singleton,
    ///     |_| EnglishGreeter,
    ///     |concrete| concrete as Arc<dyn Greeter>,
    /// );
    ///
    /// let provider = services.build();
    /// let greeter = provider.get_required_trait::<dyn Greeter>().unwrap();
    /// assert_eq!(greeter.greet(), "hello");
    /// ```
    pub fn add_trait_impl_factory<Trait, TImpl, F, C>(
        &mut self,
        lifetime: Lifetime,
        factory: F,
        upcast: C,
    ) -> &mut Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        TImpl: 'static + Send + Sync,
        F: for<'a> Fn(&ResolverContext<'a>) -> TImpl + Send + Sync + 'static,
        C: Fn(Arc<TImpl>) -> Arc<Trait> + Send + Sync + 'static,
    {
        let wrapped = move |r: &ResolverContext| -> AnyArc { Arc::new(factory(r)) };
        let convert = move |any: AnyArc| -> AnyArc {
            let concrete = any
                .downcast::<TImpl>()
                .expect("trait-bound registration always caches its concrete implementation");
            Arc::new(upcast(concrete))
        };
        self.register(key_of_trait::<Trait>(), lifetime, wrapped, convert)
    }

    // ----- Introspection and Sealing -----

    /// Whether any descriptor is registered for the key.
    pub fn contains(&self, key: &Key) -> bool {
        self.services.contains_key(key)
    }

    /// Number of keys with at least one registration.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether the collection holds no registrations.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Seals the current registrations into an immutable [`Registry`].
    ///
    /// The collection stays usable afterwards; further registrations affect
    /// only registries sealed later. One registry can back several
    /// independent providers.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cobalt_di::{ServiceCollection, ServiceProvider, Resolver};
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton_factory::<u32, _>(|_| 7);
    ///
    /// let registry = services.seal();
    /// let provider_a = ServiceProvider::new(registry.clone());
    /// let provider_b = ServiceProvider::new(registry);
    ///
    /// // Independent providers, independent singleton caches.
    /// let a = provider_a.get_required::<u32>().unwrap();
    /// let b = provider_b.get_required::<u32>().unwrap();
    /// assert!(!std::sync::Arc::ptr_eq(&a, &b));
    /// ```
    pub fn seal(&self) -> Registry {
        Registry::new(self.services.clone())
    }

    /// Seals the collection and builds a [`ServiceProvider`] from it.
    pub fn build(self) -> ServiceProvider {
        ServiceProvider::new(Registry::new(self.services))
    }
}

impl Default for ServiceCollection {
    fn default() -> Self {
        Self::new()
    }
}
