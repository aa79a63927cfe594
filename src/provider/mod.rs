//! Service provider module for dependency injection.
//!
//! This module contains the root [`ServiceProvider`] and the shared slot
//! resolution routine used by both the provider and its scopes.

use std::sync::Arc;

use crate::internal::InstanceTable;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::registration::{AnyArc, Registry, ServiceDescriptor};
use crate::traits::{Resolver, ResolverCore};

pub mod context;
pub mod scope;
pub use context::ResolverContext;
pub use scope::Scope;

/// Root service provider for resolving dependencies from the container.
///
/// The provider owns the sealed [`Registry`], the singleton instance table,
/// and the completion-order log for its own instances. It resolves Singleton
/// and Transient requests against itself and creates [`Scope`]s for
/// scope-isolated resolution.
///
/// A Scoped service requested directly on the provider (no active scope) is
/// cached in the provider's own table, behaving like a singleton there. This
/// keeps direct lookups infallible rather than making "scoped outside a
/// scope" a usage error.
///
/// # Thread safety
///
/// The provider is `Send + Sync` and cheap to clone (`Arc` internally). Any
/// number of threads may resolve concurrently; for each cached registration
/// the factory runs exactly once and every caller observes the same
/// instance.
///
/// # Teardown
///
/// Dropping the last handle to a provider tears down its cached instances in
/// exact reverse completion order, then releases the registry.
///
/// # Examples
///
/// ```rust
/// use cobalt_di::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// let mut collection = ServiceCollection::new();
/// collection.add_singleton(Database { url: "postgres://localhost".to_string() });
/// collection.add_transient_factory::<UserService, _>(|resolver| {
///     UserService { db: resolver.get_required::<Database>().unwrap() }
/// });
///
/// let provider = collection.build();
/// let user_service = provider.get_required::<UserService>().unwrap();
/// assert_eq!(user_service.db.url, "postgres://localhost");
/// ```
pub struct ServiceProvider {
    inner: Arc<ProviderInner>,
}

pub(crate) struct ProviderInner {
    // Declared before the registry so instances tear down while the
    // descriptors that built them (and any resources captured in their
    // factories) are still alive.
    pub(crate) table: InstanceTable,
    pub(crate) registry: Registry,
}

impl ServiceProvider {
    /// Creates a provider from a sealed registry.
    ///
    /// A registry can back any number of independent providers; each gets
    /// its own instance caches.
    pub fn new(registry: Registry) -> Self {
        Self {
            inner: Arc::new(ProviderInner {
                table: InstanceTable::new(),
                registry,
            }),
        }
    }

    #[inline]
    pub(crate) fn inner(&self) -> &ProviderInner {
        &self.inner
    }

    /// The sealed registry this provider resolves against.
    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    /// Creates a new scope for resolving scoped services.
    ///
    /// The scope shares this provider's singletons but caches Scoped
    /// registrations in its own table, torn down independently when the
    /// scope drops. The scope keeps the provider alive for as long as it
    /// exists.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cobalt_di::{ServiceCollection, Resolver};
    /// use std::sync::{Arc, Mutex};
    ///
    /// struct RequestId(u32);
    ///
    /// let mut collection = ServiceCollection::new();
    /// let counter = Arc::new(Mutex::new(0));
    /// let counter_clone = counter.clone();
    /// collection.add_scoped_factory::<RequestId, _>(move |_| {
    ///     let mut c = counter_clone.lock().unwrap();
    ///     *c += 1;
    ///     RequestId(*c)
    /// });
    ///
    /// let provider = collection.build();
    /// let scope1 = provider.create_scope();
    /// let scope2 = provider.create_scope();
    ///
    /// let req1a = scope1.get_required::<RequestId>().unwrap();
    /// let req1b = scope1.get_required::<RequestId>().unwrap();
    /// let req2 = scope2.get_required::<RequestId>().unwrap();
    ///
    /// assert!(Arc::ptr_eq(&req1a, &req1b)); // same scope, same instance
    /// assert!(!Arc::ptr_eq(&req1a, &req2)); // different scopes differ
    /// ```
    pub fn create_scope(&self) -> Scope {
        Scope::new(self.clone())
    }
}

impl Clone for ServiceProvider {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl ResolverCore for ServiceProvider {
    fn resolve_any(&self, key: &Key) -> Option<AnyArc> {
        let descriptors = self.inner.registry.descriptors(key)?;
        let ctx = ResolverContext::new(self);
        // The provider is its own owner for every cacheable lifetime.
        Some(resolve_descriptor(
            key,
            descriptors,
            descriptors.len() - 1,
            &self.inner.table,
            &ctx,
        ))
    }

    fn resolve_all(&self, key: &Key) -> Vec<AnyArc> {
        let Some(descriptors) = self.inner.registry.descriptors(key) else {
            return Vec::new();
        };
        let ctx = ResolverContext::new(self);
        (0..descriptors.len())
            .map(|i| resolve_descriptor(key, descriptors, i, &self.inner.table, &ctx))
            .collect()
    }
}

impl Resolver for ServiceProvider {}

/// Resolves one descriptor against an owner table, materializing through the
/// owner's instance slot for cacheable lifetimes.
///
/// `owner` is the table the instance is cached in (root for Singleton, the
/// current scope for Scoped); `ctx` is the resolution context dependencies
/// are looked up against, which is always the resolver the outermost request
/// arrived at. The factory runs with no table lock held, so it may resolve
/// further services freely; a dependency cycle therefore deadlocks or
/// recurses rather than being detected.
pub(crate) fn resolve_descriptor(
    key: &Key,
    descriptors: &[ServiceDescriptor],
    index: usize,
    owner: &InstanceTable,
    ctx: &ResolverContext<'_>,
) -> AnyArc {
    let descriptor = &descriptors[index];
    if descriptor.lifetime == Lifetime::Transient {
        // No slot involved: construct, convert, hand out.
        return (descriptor.convert)((descriptor.factory)(ctx));
    }

    let slots = owner.slots_for(key, descriptors.len());
    let instance = match slots[index].get() {
        Some(ready) => ready.clone(),
        None => {
            let (instance, won) = slots[index].materialize(|| (descriptor.factory)(ctx));
            if won {
                owner.record_completion(instance.clone());
            }
            instance
        }
    };
    (descriptor.convert)(instance)
}
