use indexmap::IndexMap;

use crate::key::Key;
use crate::types::ObjectType;

/// Slot of a key that generated code cannot spell as a class literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryKey {
    /// A qualified key; the slot holds type plus qualifier.
    QualifiedType { field: String },
    /// An unqualified generic or array type.
    Type { field: String },
}

impl RegistryKey {
    pub fn field(&self) -> &str {
        match self {
            RegistryKey::QualifiedType { field } | RegistryKey::Type { field } => field,
        }
    }
}

/// Table of every key that needs materializing at run time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRegistry {
    pub ty: ObjectType,
    /// Keyed by the boxed key.
    pub keys: IndexMap<Key, RegistryKey>,
}

impl KeyRegistry {
    pub(crate) const BASE_NAME: &'static str = "io/ferrous/inject/KeyRegistry";

    pub fn find(&self, key: &Key) -> Option<&RegistryKey> {
        self.keys.get(&key.boxed())
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Registry slot kind for `key`, or `None` when a plain class reference
/// identifies it.
pub(crate) fn registry_key(key: &Key, index: usize) -> Option<RegistryKey> {
    let field = format!("key{index}");
    if key.qualifier.is_some() {
        Some(RegistryKey::QualifiedType { field })
    } else if key.boxed().raw_object().is_none() {
        Some(RegistryKey::Type { field })
    } else {
        None
    }
}
