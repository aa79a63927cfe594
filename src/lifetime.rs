//! Service lifetime definitions.

/// Service lifetimes controlling instance caching behavior.
///
/// The lifetime decides which owner caches a materialized instance, or
/// whether one is cached at all.
///
/// # Examples
///
/// ```rust
/// use cobalt_di::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct Session { id: u32 }
///
/// let mut services = ServiceCollection::new();
///
/// // Singleton: one instance per root provider
/// services.add_singleton(Database { url: "postgres://localhost".to_string() });
///
/// // Scoped: one instance per scope
/// services.add_scoped_factory::<Session, _>(|_| Session { id: 7 });
///
/// let provider = services.build();
/// let scope1 = provider.create_scope();
/// let scope2 = provider.create_scope();
///
/// let db1 = scope1.get_required::<Database>().unwrap();
/// let db2 = scope2.get_required::<Database>().unwrap();
/// assert!(Arc::ptr_eq(&db1, &db2)); // shared across scopes
///
/// let s1 = scope1.get_required::<Session>().unwrap();
/// let s2 = scope2.get_required::<Session>().unwrap();
/// assert!(!Arc::ptr_eq(&s1, &s2)); // one per scope
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// Single instance per root provider, cached until the provider drops.
    ///
    /// Always cached in the root provider's table, no matter whether the
    /// request arrived at the provider or through a scope.
    Singleton,
    /// Single instance per scope, cached until the scope drops.
    ///
    /// Requested directly on the root provider (outside any scope) a scoped
    /// service degrades to singleton-like caching in the provider's own
    /// table; see [`ServiceProvider`](crate::ServiceProvider).
    Scoped,
    /// New instance per resolution, never cached.
    Transient,
}
