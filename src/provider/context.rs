//! Resolver context passed to factory functions.

use crate::key::Key;
use crate::traits::{Resolver, ResolverCore};

/// Context handed to factory functions for resolving their dependencies.
///
/// The context wraps whichever resolver initiated the outermost request (the
/// root provider or a scope) and forwards every lookup to it. This is what
/// keeps nested dependencies bound to the correct lifetime scope: a factory
/// invoked for a singleton that was first requested from inside a scope still
/// resolves its own scoped dependencies against that scope.
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
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Database { url: "postgres://localhost".to_string() });
/// services.add_transient_factory::<UserService, _>(|resolver| {
///     UserService { db: resolver.get_required::<Database>().unwrap() }
/// });
/// ```
pub struct ResolverContext<'a> {
    resolver: &'a dyn ResolverCore,
}

impl<'a> ResolverContext<'a> {
    pub(crate) fn new<T>(resolver: &'a T) -> Self
    where
        T: ResolverCore,
    {
        Self { resolver }
    }
}

impl<'a> ResolverCore for ResolverContext<'a> {
    fn resolve_any(&self, key: &Key) -> Option<std::sync::Arc<dyn std::any::Any + Send + Sync>> {
        self.resolver.resolve_any(key)
    }

    fn resolve_all(&self, key: &Key) -> Vec<std::sync::Arc<dyn std::any::Any + Send + Sync>> {
        self.resolver.resolve_all(key)
    }
}

impl<'a> Resolver for ResolverContext<'a> {}
