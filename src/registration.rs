//! Service registration types: descriptors and the sealed registry.

use std::collections::HashMap;
use std::sync::Arc;

use crate::key::Key;
use crate::lifetime::Lifetime;

// ResolverContext is defined in the provider module.
pub(crate) use crate::provider::ResolverContext;

/// Type-erased handle to a constructed service instance.
///
/// Factories produce these and conversions reshape them; consumers get them
/// back out through the typed downcasts on [`Resolver`](crate::Resolver).
pub type OpaqueInstance = Arc<dyn std::any::Any + Send + Sync>;

// Short internal alias for the same thing.
pub(crate) type AnyArc = OpaqueInstance;

pub(crate) type FactoryFn =
    Arc<dyn for<'a> Fn(&ResolverContext<'a>) -> AnyArc + Send + Sync>;
pub(crate) type ConvertFn = Arc<dyn Fn(AnyArc) -> AnyArc + Send + Sync>;

/// One registration entry: a factory, a handle conversion, and a lifetime.
///
/// The factory produces the opaque instance that gets cached (for Singleton
/// and Scoped lifetimes); the conversion narrows that instance to the handle
/// shape the caller downcasts. For plain concrete registrations the
/// conversion is the identity; registering a concrete implementation under a
/// trait key installs an upcasting conversion instead.
///
/// Descriptors are immutable once registered and cheap to clone.
#[derive(Clone)]
pub struct ServiceDescriptor {
    pub(crate) factory: FactoryFn,
    pub(crate) convert: ConvertFn,
    pub(crate) lifetime: Lifetime,
}

impl ServiceDescriptor {
    pub(crate) fn new(lifetime: Lifetime, factory: FactoryFn, convert: ConvertFn) -> Self {
        Self {
            factory,
            convert,
            lifetime,
        }
    }

    /// The lifetime this descriptor was registered with.
    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }
}

impl std::fmt::Debug for ServiceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceDescriptor")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

/// Immutable mapping from a service key to its ordered descriptor list.
///
/// Produced by [`ServiceCollection::seal`](crate::ServiceCollection::seal)
/// and shared read-only by every provider built from it; after sealing no
/// registration can be added, removed, or replaced. Registration order per
/// key is preserved: the last descriptor wins for single-value lookup, and
/// multi-value lookup returns all descriptors in order.
///
/// `Registry` is `Clone` (descriptor closures are `Arc`-shared), so one
/// sealed collection can back several independent providers.
#[derive(Clone)]
pub struct Registry {
    services: HashMap<Key, Vec<ServiceDescriptor>>,
}

impl Registry {
    pub(crate) fn new(services: HashMap<Key, Vec<ServiceDescriptor>>) -> Self {
        Self { services }
    }

    /// All descriptors registered for a key, in registration order.
    pub fn descriptors(&self, key: &Key) -> Option<&[ServiceDescriptor]> {
        self.services.get(key).map(Vec::as_slice)
    }

    /// Whether any descriptor is registered for the key.
    pub fn contains_key(&self, key: &Key) -> bool {
        self.services.contains_key(key)
    }

    /// Number of keys with at least one registration.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether the registry holds no registrations at all.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Iterator over all key/descriptor-list pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &[ServiceDescriptor])> {
        self.services.iter().map(|(k, v)| (k, v.as_slice()))
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (key, descriptors) in self.iter() {
            map.entry(&key.display_name(), &descriptors.len());
        }
        map.finish()
    }
}
