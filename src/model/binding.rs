use std::fmt;

use crate::key::Key;

/// `@ProvidedAs`: the implementation type also satisfies `ancestor`.
///
/// Requests for `ancestor` are delegated to whatever provides
/// `implementation`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Binding {
    pub implementation: Key,
    pub ancestor: Key,
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.ancestor, self.implementation)
    }
}
