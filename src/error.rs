//! Error types for the dependency injection container.

use std::fmt;

/// Dependency injection errors.
///
/// Optional lookups (`get`, `get_trait`, `get_all`) signal absence with
/// `None` or an empty vector and never produce `NotRegistered`; only the
/// `*_required` variants convert absence into an error.
///
/// # Examples
///
/// ```rust
/// use cobalt_di::{DiError, ServiceCollection, Resolver};
///
/// let provider = ServiceCollection::new().build();
/// match provider.get_required::<String>() {
///     Err(DiError::NotRegistered(name)) => {
///         assert_eq!(name, "alloc::string::String");
///     }
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiError {
    /// Required lookup on a key with no registration; carries the display name.
    NotRegistered(&'static str),
    /// A resolved instance could not be downcast to the requested type.
    ///
    /// Unreachable through the typed `add_*` registration helpers; can only
    /// arise when a factory handed to the untyped
    /// [`register`](crate::ServiceCollection::register) surface produces a
    /// value of the wrong shape for its key.
    TypeMismatch(&'static str),
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::NotRegistered(name) => write!(f, "Service not registered: {}", name),
            DiError::TypeMismatch(name) => write!(f, "Type mismatch for: {}", name),
        }
    }
}

impl std::error::Error for DiError {}

/// Result type for DI operations.
pub type DiResult<T> = Result<T, DiError>;
