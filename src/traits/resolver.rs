//! Resolver traits for service resolution.

use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::{key_of_trait, key_of_type, Key};

/// Core resolver trait for object-safe service resolution.
///
/// This is the low-level, type-erased lookup surface shared by
/// [`ServiceProvider`](crate::ServiceProvider), [`Scope`](crate::Scope), and
/// the [`ResolverContext`](crate::ResolverContext) handed to factories.
/// Absence is reported as `None` or an empty vector, never as an error.
///
/// Most users should use the [`Resolver`] trait instead, which provides
/// type-safe generic methods built on top of this one.
pub trait ResolverCore: Send + Sync {
    /// Resolves the last-registered descriptor for a key.
    ///
    /// Returns `None` when no descriptor is registered for the key. A
    /// panicking factory propagates the panic to the caller unmodified.
    fn resolve_any(&self, key: &Key) -> Option<Arc<dyn std::any::Any + Send + Sync>>;

    /// Resolves every descriptor registered for a key, in registration order.
    ///
    /// Returns an empty vector for an unregistered key.
    fn resolve_all(&self, key: &Key) -> Vec<Arc<dyn std::any::Any + Send + Sync>>;
}

/// High-level resolver interface with generic methods for type-safe lookup.
///
/// Both `ServiceProvider` and `Scope` implement this trait, so consumer code
/// and factory closures can resolve dependencies the same way in either
/// context.
///
/// # Examples
///
/// ```rust
/// use cobalt_di::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// trait Logger: Send + Sync {
///     fn log(&self, msg: &str);
/// }
///
/// struct ConsoleLogger;
/// impl Logger for ConsoleLogger {
///     fn log(&self, msg: &str) {
///         println!("LOG: {}", msg);
///     }
/// }
///
/// let mut collection = ServiceCollection::new();
/// collection.add_singleton(42usize);
/// collection.add_singleton_trait_factory::<dyn Logger, _>(|_| {
///     Arc::new(ConsoleLogger) as Arc<dyn Logger>
/// });
///
/// let provider = collection.build();
///
/// let number = provider.get::<usize>().unwrap();
/// assert_eq!(*number, 42);
///
/// let logger = provider.get_required_trait::<dyn Logger>().unwrap();
/// logger.log("resolved");
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves a concrete service type.
    ///
    /// Returns `None` when the type was never registered. When several
    /// descriptors exist for the type, the last-registered one is used.
    fn get<T: 'static + Send + Sync>(&self) -> Option<Arc<T>> {
        let any = self.resolve_any(&key_of_type::<T>())?;
        any.downcast::<T>().ok()
    }

    /// Resolves a concrete service type, reporting absence as an error.
    ///
    /// # Errors
    ///
    /// [`DiError::NotRegistered`] when no descriptor exists for `T`;
    /// [`DiError::TypeMismatch`] when a raw registration produced a value of
    /// the wrong shape for this key.
    fn get_required<T: 'static + Send + Sync>(&self) -> DiResult<Arc<T>> {
        let name = std::any::type_name::<T>();
        let any = self
            .resolve_any(&key_of_type::<T>())
            .ok_or(DiError::NotRegistered(name))?;
        any.downcast::<T>().map_err(|_| DiError::TypeMismatch(name))
    }

    /// Resolves all registered implementations for a concrete service type,
    /// in registration order. An unregistered type yields an empty vector.
    fn get_all<T: 'static + Send + Sync>(&self) -> DiResult<Vec<Arc<T>>> {
        let name = std::any::type_name::<T>();
        let anys = self.resolve_all(&key_of_type::<T>());
        let mut results = Vec::with_capacity(anys.len());
        for any in anys {
            results.push(any.downcast::<T>().map_err(|_| DiError::TypeMismatch(name))?);
        }
        Ok(results)
    }

    /// Resolves a single trait implementation.
    ///
    /// Returns the most recently registered implementation for the trait, or
    /// `None` when the trait was never registered.
    fn get_trait<T: ?Sized + 'static + Send + Sync>(&self) -> Option<Arc<T>>
    where
        Arc<T>: 'static,
    {
        let any = self.resolve_any(&key_of_trait::<T>())?;
        // Trait handles are stored as Arc<Arc<dyn Trait>> inside the Any.
        any.downcast::<Arc<T>>().ok().map(|boxed| (*boxed).clone())
    }

    /// Resolves a single trait implementation, reporting absence as an error.
    fn get_required_trait<T: ?Sized + 'static + Send + Sync>(&self) -> DiResult<Arc<T>>
    where
        Arc<T>: 'static,
    {
        let name = std::any::type_name::<T>();
        let any = self
            .resolve_any(&key_of_trait::<T>())
            .ok_or(DiError::NotRegistered(name))?;
        any.downcast::<Arc<T>>()
            .map(|boxed| (*boxed).clone())
            .map_err(|_| DiError::TypeMismatch(name))
    }

    /// Resolves all registered implementations of a trait, in registration
    /// order. An unregistered trait yields an empty vector.
    fn get_all_trait<T: ?Sized + 'static + Send + Sync>(&self) -> DiResult<Vec<Arc<T>>>
    where
        Arc<T>: 'static,
    {
        let name = std::any::type_name::<T>();
        let anys = self.resolve_all(&key_of_trait::<T>());
        let mut results = Vec::with_capacity(anys.len());
        for any in anys {
            let arc = any
                .downcast::<Arc<T>>()
                .map(|boxed| (*boxed).clone())
                .map_err(|_| DiError::TypeMismatch(name))?;
            results.push(arc);
        }
        Ok(results)
    }
}
