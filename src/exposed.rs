use rustc_hash::FxHashMap;

use crate::error::{RegistryError, Result};
use crate::type_identity::TypeIdentity;

/// Maps a type identity to the object that exposes that type to callers.
///
/// Each identity appears at most once. This map does no locking of its own;
/// [`TypeRegistry`](crate::TypeRegistry) wraps it.
#[derive(Debug, Clone)]
pub struct ExposedTypeMap<V> {
    entries: FxHashMap<TypeIdentity, V>,
}

impl<V> ExposedTypeMap<V> {
    /// Creates a new, empty map
    pub fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }

    /// Stores the exposed object for `identity`
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateRegistration` if the identity is already
    /// present. The existing entry is left untouched.
    pub fn register(&mut self, identity: TypeIdentity, value: V) -> Result<()> {
        if self.entries.contains_key(&identity) {
            return Err(RegistryError::DuplicateRegistration {
                type_name: identity.display_name().to_string(),
            });
        }
        self.entries.insert(identity, value);
        Ok(())
    }

    /// Looks up the exposed object for `identity`
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnknownType` if the identity was never registered.
    pub fn resolve(&self, identity: &TypeIdentity) -> Result<&V> {
        self.entries
            .get(identity)
            .ok_or_else(|| RegistryError::UnknownType {
                type_name: identity.display_name().to_string(),
            })
    }

    pub fn contains(&self, identity: &TypeIdentity) -> bool {
        self.entries.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All registered identities, in no particular order
    pub fn identities(&self) -> Vec<TypeIdentity> {
        self.entries.keys().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<V> Default for ExposedTypeMap<V> {
    fn default() -> Self {
        Self::new()
    }
}
