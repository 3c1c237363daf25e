//! Dependency identity: a declared type plus an optional qualifier.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::types::{GenericType, ObjectType, Type};

/// A literal annotation argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnnotationValue {
    Bool(bool),
    Int(i64),
    Char(char),
    Str(String),
    /// A class literal such as `Foo.class` or `int.class`.
    Type(Type),
    Enum { ty: ObjectType, value: String },
    Array(Vec<AnnotationValue>),
    Annotation(AnnotationMirror),
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationValue::Bool(value) => write!(f, "{value}"),
            AnnotationValue::Int(value) => write!(f, "{value}"),
            AnnotationValue::Char(value) => write!(f, "'{value}'"),
            AnnotationValue::Str(value) => write!(f, "{value:?}"),
            AnnotationValue::Type(ty) => write!(f, "{ty}.class"),
            AnnotationValue::Enum { ty, value } => write!(f, "{ty}.{value}"),
            AnnotationValue::Array(values) => {
                f.write_str("{")?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("}")
            }
            AnnotationValue::Annotation(annotation) => write!(f, "{annotation}"),
        }
    }
}

/// An annotation instance: its type plus literal argument values.
///
/// Argument values are kept sorted by name so that two mirrors written with
/// arguments in a different order still compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnnotationMirror {
    pub ty: ObjectType,
    pub values: BTreeMap<String, AnnotationValue>,
}

impl AnnotationMirror {
    pub fn new(ty: impl Into<ObjectType>) -> Self {
        Self {
            ty: ty.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, name: impl Into<String>, value: AnnotationValue) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    pub fn value(&self, name: &str) -> Option<&AnnotationValue> {
        self.values.get(name)
    }
}

impl fmt::Display for AnnotationMirror {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.ty)?;
        if self.values.is_empty() {
            return Ok(());
        }
        f.write_str("(")?;
        for (index, (name, value)) in self.values.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str(")")
    }
}

/// Canonical identity of a dependency.
///
/// Two keys are equal iff their types and qualifiers are equal. A
/// qualifier's identity is its annotation type plus its literal argument
/// values, so `@Named("a")` and `@Named("b")` are different keys.
///
/// Keys are compared in boxed form whenever providers are matched against
/// requirements; see [`Key::boxed`].
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{Key, GenericType, Primitive};
///
/// let int = Key::of(GenericType::primitive(Primitive::Int));
/// let integer = Key::of(GenericType::raw("java/lang/Integer"));
/// assert_ne!(int, integer);
/// assert_eq!(int.boxed(), integer.boxed());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key {
    pub ty: GenericType,
    pub qualifier: Option<AnnotationMirror>,
}

impl Key {
    pub fn new(ty: GenericType, qualifier: Option<AnnotationMirror>) -> Self {
        Self { ty, qualifier }
    }

    /// Unqualified key.
    pub fn of(ty: GenericType) -> Self {
        Self { ty, qualifier: None }
    }

    /// Unqualified key of a raw class.
    pub fn of_class(ty: &ObjectType) -> Self {
        Self::of(GenericType::Raw(Type::Object(ty.clone())))
    }

    pub fn qualified(mut self, qualifier: AnnotationMirror) -> Self {
        self.qualifier = Some(qualifier);
        self
    }

    /// Same key with a primitive type replaced by its boxed counterpart.
    pub fn boxed(&self) -> Key {
        Key {
            ty: self.ty.boxed(),
            qualifier: self.qualifier.clone(),
        }
    }

    /// Raw class of this key, if it is a plain class reference.
    pub fn raw_object(&self) -> Option<&ObjectType> {
        self.ty.as_raw_object()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(qualifier) = &self.qualifier {
            write!(f, "{qualifier} ")?;
        }
        write!(f, "{}", self.ty)
    }
}

/// How a dependency site wants its value delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    /// The instance itself, created eagerly at the injection site.
    Instance,
    /// `Lazy<T>`: created on first access and then cached.
    Lazy,
    /// `Provider<T>`: a factory handle, one lookup per call.
    Provider,
}

impl DependencyKind {
    /// Lazy and provider wrappers defer creation and so break eager cycles.
    pub fn is_deferred(self) -> bool {
        !matches!(self, DependencyKind::Instance)
    }
}

/// A dependency site: the key it needs and how it wants it delivered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Dependency {
    pub key: Key,
    pub kind: DependencyKind,
}

impl Dependency {
    pub fn new(key: Key, kind: DependencyKind) -> Self {
        Self { key, kind }
    }

    pub fn instance(key: Key) -> Self {
        Self::new(key, DependencyKind::Instance)
    }

    pub fn boxed(&self) -> Dependency {
        Dependency {
            key: self.key.boxed(),
            kind: self.kind,
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DependencyKind::Instance => write!(f, "{}", self.key),
            DependencyKind::Lazy => write!(f, "Lazy<{}>", self.key),
            DependencyKind::Provider => write!(f, "Provider<{}>", self.key),
        }
    }
}
