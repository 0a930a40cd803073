//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different collections.

/// Generate a fresh opaque identifier.
///
/// IDs are UUID v4 strings. They are only ever compared for equality, so
/// callers must not rely on their format.
#[doc(hidden)]
#[must_use]
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Constructors: `generate()` for new entities, `new()` for known IDs
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use pantry_core::define_id;
/// define_id!(PantryId);
/// define_id!(ShelfId);
///
/// let pantry_id = PantryId::new("1");
/// let shelf_id = ShelfId::new("1");
///
/// // These are different types, so this won't compile:
/// // let _: PantryId = shelf_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a new unique ID.
            #[must_use]
            pub fn generate() -> Self {
                Self($crate::types::id::generate_id())
            }

            /// Wrap an existing ID value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Convert into the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(InventoryItemId);
define_id!(ShoppingListItemId);
define_id!(RecipeId);

/// An entity stored in a keyed collection.
///
/// Repositories use this to find entries by ID when removing or updating
/// them. IDs are unique within a collection.
pub trait Entity {
    /// The ID type for this entity.
    type Id: PartialEq + Clone + ::core::fmt::Debug + ::core::fmt::Display + Send + Sync;

    /// Returns the entity's ID.
    fn id(&self) -> &Self::Id;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_generate_is_unique() {
        let ids: HashSet<_> = (0..100).map(|_| RecipeId::generate()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_display_and_as_str() {
        let id = InventoryItemId::new("abc");
        assert_eq!(id.as_str(), "abc");
        assert_eq!(id.to_string(), "abc");
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = ShoppingListItemId::new("1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"1\"");

        let parsed: ShoppingListItemId = serde_json::from_str("\"1\"").unwrap();
        assert_eq!(parsed, id);
    }
}
