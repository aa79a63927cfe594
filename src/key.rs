//! Service key types for the dependency injection container.

use std::any::TypeId;

/// Key for service storage and lookup.
///
/// Keys uniquely identify a requested abstraction in the registry. Distinct
/// keys never alias: concrete types compare by `TypeId`, trait objects by
/// their fully qualified name (trait objects have no `TypeId` of their own).
///
/// A single key may own an ordered list of registrations (an interface with
/// several implementations); the key itself carries no index.
///
/// # Examples
///
/// ```rust
/// use cobalt_di::{Key, key_of_type};
/// use std::any::TypeId;
///
/// let key = key_of_type::<String>();
/// assert_eq!(key, Key::Type(TypeId::of::<String>(), "alloc::string::String"));
/// assert_eq!(key.display_name(), "alloc::string::String");
/// ```
#[derive(Debug, Clone)]
pub enum Key {
    /// Concrete type key with TypeId and name for diagnostics.
    ///
    /// The TypeId provides the identity; the name is only carried into
    /// error messages.
    Type(TypeId, &'static str),
    /// Trait object key, identified by the trait's type name.
    Trait(&'static str),
}

impl Key {
    /// Get the type or trait name for display.
    ///
    /// This is the `std::any::type_name` result recorded at registration,
    /// used in `DiError::NotRegistered` messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Key::Type(_, name) => name,
            Key::Trait(name) => name,
        }
    }
}

// Equality ignores the display string for concrete types: TypeId is the
// identity, the name exists for diagnostics only.
impl PartialEq for Key {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Key::Type(a, _), Key::Type(b, _)) => a == b,
            (Key::Trait(a), Key::Trait(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Key {}

impl std::hash::Hash for Key {
    #[inline]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Key::Type(id, _) => {
                0u8.hash(state);
                id.hash(state);
            }
            Key::Trait(name) => {
                1u8.hash(state);
                name.hash(state);
            }
        }
    }
}

/// Builds the key for a concrete service type.
#[inline]
pub fn key_of_type<T: 'static>() -> Key {
    Key::Type(TypeId::of::<T>(), std::any::type_name::<T>())
}

/// Builds the key for a trait object service.
#[inline]
pub fn key_of_trait<T: ?Sized + 'static>() -> Key {
    Key::Trait(std::any::type_name::<T>())
}
