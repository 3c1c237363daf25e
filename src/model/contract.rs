use crate::key::{Dependency, Key};
use crate::types::ObjectType;

/// An interface of parameterless getters exposed to external consumers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Contract {
    pub ty: ObjectType,
    /// Type of the generated implementation class.
    pub implementation_type: ObjectType,
    pub key: Key,
    /// Own and inherited getters, merged by name.
    pub provision_points: Vec<ContractProvisionPoint>,
}

/// One getter of a contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContractProvisionPoint {
    /// Interface that declares the getter.
    pub container: ObjectType,
    pub method: String,
    pub injectee: Dependency,
}
