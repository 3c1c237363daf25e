use std::fmt;

use crate::key::{Dependency, Key};
use crate::metadata::{FieldMirror, MethodMirror};
use crate::types::ObjectType;

/// Instance caching policy of a provision point.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// A new instance per request.
    None,
    /// Cached according to the scope annotation.
    Class {
        annotation: ObjectType,
        /// `@Eager`: instantiated as soon as the container is created.
        eager: bool,
    },
}

/// A single source of instances for one key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProvisionPoint {
    /// The `@Inject` constructor of the provided type itself.
    Constructor {
        container: ObjectType,
        key: Key,
        scope: Scope,
        injectees: Vec<Dependency>,
    },
    /// A `@Provide` method of a module.
    Method {
        container: ObjectType,
        key: Key,
        scope: Scope,
        method: String,
        injectees: Vec<Dependency>,
    },
    /// A `@Provide` field of a module.
    Field {
        container: ObjectType,
        key: Key,
        scope: Scope,
        field: String,
    },
}

impl ProvisionPoint {
    /// Type that declares the provision point. For constructors this is the
    /// provided type.
    pub fn container(&self) -> &ObjectType {
        match self {
            ProvisionPoint::Constructor { container, .. }
            | ProvisionPoint::Method { container, .. }
            | ProvisionPoint::Field { container, .. } => container,
        }
    }

    pub fn key(&self) -> &Key {
        match self {
            ProvisionPoint::Constructor { key, .. }
            | ProvisionPoint::Method { key, .. }
            | ProvisionPoint::Field { key, .. } => key,
        }
    }

    pub fn scope(&self) -> &Scope {
        match self {
            ProvisionPoint::Constructor { scope, .. }
            | ProvisionPoint::Method { scope, .. }
            | ProvisionPoint::Field { scope, .. } => scope,
        }
    }

    /// Dependencies needed to produce an instance.
    pub fn injectees(&self) -> &[Dependency] {
        match self {
            ProvisionPoint::Constructor { injectees, .. }
            | ProvisionPoint::Method { injectees, .. } => injectees,
            ProvisionPoint::Field { .. } => &[],
        }
    }
}

impl fmt::Display for ProvisionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProvisionPoint::Constructor { container, .. } => write!(f, "{container}()"),
            ProvisionPoint::Method {
                container, method, ..
            } => write!(f, "{container}.{method}"),
            ProvisionPoint::Field {
                container, field, ..
            } => write!(f, "{container}.{field}"),
        }
    }
}

/// An injectable member of an injection target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InjectionPoint {
    Field {
        container: ObjectType,
        field: FieldMirror,
        injectee: Dependency,
    },
    /// A constructor or a setter-like method.
    Method {
        container: ObjectType,
        method: MethodMirror,
        injectees: Vec<Dependency>,
    },
}

impl InjectionPoint {
    pub fn is_static(&self) -> bool {
        match self {
            InjectionPoint::Field { field, .. } => field.is_static,
            InjectionPoint::Method { method, .. } => method.is_static,
        }
    }

    pub fn injectees(&self) -> Vec<&Dependency> {
        match self {
            InjectionPoint::Field { injectee, .. } => vec![injectee],
            InjectionPoint::Method { injectees, .. } => injectees.iter().collect(),
        }
    }
}

impl fmt::Display for InjectionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InjectionPoint::Field {
                container, field, ..
            } => write!(f, "{container}.{}", field.name),
            InjectionPoint::Method {
                container, method, ..
            } => write!(f, "{container}.{}", method.name),
        }
    }
}

/// A type with `@Inject` members.
///
/// Providable targets have exactly one constructor injection point, stored
/// first. Injectable targets carry field and method injection points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectionTarget {
    pub ty: ObjectType,
    pub injection_points: Vec<InjectionPoint>,
}

impl InjectionTarget {
    /// Dependencies of the `@Inject` constructor, for providable targets.
    pub fn constructor_injectees(&self) -> Vec<Dependency> {
        match self.injection_points.first() {
            Some(InjectionPoint::Method {
                method, injectees, ..
            }) if method.is_constructor() => injectees.clone(),
            _ => Vec::new(),
        }
    }
}
