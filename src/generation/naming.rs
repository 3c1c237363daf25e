//! Collision-free generated type names.

use std::collections::HashSet;

use crate::error::{CompilerError, CompilerResult};
use crate::metadata::CompiledTypes;
use crate::types::ObjectType;

/// `{prefix}{index}{suffix}` candidate names for one kind of generated
/// type, e.g. `com/example/Foo$ConstructorProvider` + `0` + `$main`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePattern {
    prefix: String,
    suffix: String,
}

impl NamePattern {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    pub fn candidate(&self, index: u32) -> ObjectType {
        ObjectType::new(format!("{}{index}{}", self.prefix, self.suffix))
    }
}

impl std::fmt::Display for NamePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{{}}{}", self.prefix, self.suffix)
    }
}

/// Names handed out during one invocation.
///
/// A name is free if it was neither generated earlier in this run nor
/// exists among previously compiled artifacts. Accepted names are
/// registered before they are returned.
pub struct NameRegistry<'c> {
    generated: HashSet<ObjectType>,
    compiled: &'c dyn CompiledTypes,
}

impl<'c> NameRegistry<'c> {
    pub fn new(compiled: &'c dyn CompiledTypes) -> Self {
        Self {
            generated: HashSet::new(),
            compiled,
        }
    }

    pub fn is_free(&self, ty: &ObjectType) -> bool {
        !self.generated.contains(ty) && !self.compiled.contains(ty)
    }

    /// First free candidate of `pattern`, counting from zero.
    pub fn unique_type(&mut self, pattern: &NamePattern) -> CompilerResult<ObjectType> {
        (0..=u32::MAX)
            .map(|index| pattern.candidate(index))
            .find(|candidate| self.is_free(candidate))
            .map(|ty| self.register(ty))
            .ok_or_else(|| CompilerError::NameExhausted {
                pattern: pattern.to_string(),
            })
    }

    /// `base` itself when free, otherwise the first free `{base}{index}`.
    pub fn unique_type_or_indexed(&mut self, base: &str) -> CompilerResult<ObjectType> {
        let ty = ObjectType::new(base);
        if self.is_free(&ty) {
            return Ok(self.register(ty));
        }
        self.unique_type(&NamePattern::new(base, ""))
    }

    fn register(&mut self, ty: ObjectType) -> ObjectType {
        self.generated.insert(ty.clone());
        ty
    }

    pub fn generated_count(&self) -> usize {
        self.generated.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepted_names_are_registered() {
        let compiled = HashSet::new();
        let mut names = NameRegistry::new(&compiled);
        let pattern = NamePattern::new("a/Foo$MethodProvider", "$main");

        let first = names.unique_type(&pattern).unwrap();
        let second = names.unique_type(&pattern).unwrap();

        assert_eq!(first, ObjectType::new("a/Foo$MethodProvider0$main"));
        assert_eq!(second, ObjectType::new("a/Foo$MethodProvider1$main"));
        assert_eq!(names.generated_count(), 2);
    }

    #[test]
    fn bare_name_is_preferred_over_indexed_names() {
        let compiled = HashSet::from([ObjectType::new("a/Ferrous$PackageInvader$main")]);
        let mut names = NameRegistry::new(&compiled);

        let ty = names.unique_type_or_indexed("a/Ferrous$PackageInvader$main").unwrap();
        assert_eq!(ty, ObjectType::new("a/Ferrous$PackageInvader$main0"));
        let other = names.unique_type_or_indexed("b/Ferrous$PackageInvader$main").unwrap();
        assert_eq!(other, ObjectType::new("b/Ferrous$PackageInvader$main"));
    }
}
