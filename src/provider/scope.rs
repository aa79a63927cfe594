//! Scoped service resolution.
//!
//! A scope is a child resolution context with its own cache for Scoped
//! registrations, layered over the root provider's singleton cache.

use crate::internal::InstanceTable;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::registration::AnyArc;
use crate::traits::{Resolver, ResolverCore};

use super::{resolve_descriptor, ResolverContext, ServiceProvider};

/// Scoped service container for isolated dependency resolution.
///
/// A `Scope` exposes the same lookup surface as its provider. Lifetimes
/// route as follows:
///
/// - **Singleton**: owned and cached by the root provider, shared across
///   all scopes.
/// - **Scoped**: owned and cached by this scope.
/// - **Transient**: constructed fresh on every request.
///
/// In every case the scope itself is the resolution context, so the
/// dependencies of a singleton or transient constructed from within this
/// scope still bind here when they are themselves Scoped.
///
/// Dropping a scope tears down only the instances it owns, in reverse
/// completion order; provider-owned singletons are untouched. The scope
/// holds a handle to its provider, so the provider outlives all of its
/// scopes.
///
/// # Examples
///
/// ```rust
/// use cobalt_di::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct DbConnection(&'static str);
/// struct UserService { db: Arc<DbConnection> }
///
/// let mut collection = ServiceCollection::new();
/// collection.add_scoped_factory::<DbConnection, _>(|_| DbConnection("conn-123"));
/// collection.add_transient_factory::<UserService, _>(|resolver| {
///     UserService { db: resolver.get_required::<DbConnection>().unwrap() }
/// });
///
/// let provider = collection.build();
/// let scope = provider.create_scope();
///
/// // Transient services resolved in one scope share its connection.
/// let user1 = scope.get_required::<UserService>().unwrap();
/// let user2 = scope.get_required::<UserService>().unwrap();
/// assert!(Arc::ptr_eq(&user1.db, &user2.db));
/// ```
pub struct Scope {
    // Declared before the provider handle: if this scope holds the last
    // handle, its own instances must tear down before the root's singletons
    // they may depend on.
    table: InstanceTable,
    root: ServiceProvider,
}

impl Scope {
    pub(crate) fn new(root: ServiceProvider) -> Self {
        Self {
            table: InstanceTable::new(),
            root,
        }
    }

    /// The root provider this scope was created from.
    pub fn provider(&self) -> &ServiceProvider {
        &self.root
    }

    /// Picks the owner table for a descriptor resolved through this scope:
    /// Scoped instances live here, everything cacheable lives at the root.
    fn owner_for(&self, lifetime: Lifetime) -> &InstanceTable {
        if lifetime == Lifetime::Scoped {
            &self.table
        } else {
            &self.root.inner().table
        }
    }
}

impl ResolverCore for Scope {
    fn resolve_any(&self, key: &Key) -> Option<AnyArc> {
        let descriptors = self.root.inner().registry.descriptors(key)?;
        let ctx = ResolverContext::new(self);
        // Routing for single lookup follows the first registered
        // descriptor's lifetime; the last descriptor still wins the lookup.
        let owner = self.owner_for(descriptors[0].lifetime());
        Some(resolve_descriptor(
            key,
            descriptors,
            descriptors.len() - 1,
            owner,
            &ctx,
        ))
    }

    fn resolve_all(&self, key: &Key) -> Vec<AnyArc> {
        let Some(descriptors) = self.root.inner().registry.descriptors(key) else {
            return Vec::new();
        };
        let ctx = ResolverContext::new(self);
        descriptors
            .iter()
            .enumerate()
            .map(|(i, descriptor)| {
                let owner = self.owner_for(descriptor.lifetime());
                resolve_descriptor(key, descriptors, i, owner, &ctx)
            })
            .collect()
    }
}

impl Resolver for Scope {}
