use crate::key::{Dependency, Key};
use crate::types::ObjectType;

/// An interface whose methods assemble implementation types from injected
/// dependencies plus caller-supplied arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Factory {
    pub ty: ObjectType,
    pub implementation_type: ObjectType,
    pub key: Key,
    pub provision_points: Vec<FactoryProvisionPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FactoryProvisionPoint {
    /// Interface declaring the method; may be an ancestor of the factory.
    pub container: ObjectType,
    pub method: String,
    /// Declared return type of the method.
    pub return_type: ObjectType,
    /// Class actually constructed, `@Factory.Return` when present.
    pub implementation: ObjectType,
    /// Constructor arguments in declaration order.
    pub injectees: Vec<FactoryInjectee>,
}

/// Where a `@Factory.Inject` constructor argument comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FactoryInjectee {
    FromInjector(Dependency),
    /// A `@Factory.Parameter` supplied by the factory method argument at
    /// `argument_index`.
    FromMethod {
        dependency: Dependency,
        argument_index: usize,
    },
}

impl FactoryInjectee {
    pub fn dependency(&self) -> &Dependency {
        match self {
            FactoryInjectee::FromInjector(dependency) => dependency,
            FactoryInjectee::FromMethod { dependency, .. } => dependency,
        }
    }
}
