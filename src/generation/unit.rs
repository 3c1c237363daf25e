//! Generated units handed to the emission backend.
//!
//! Every cross reference is already resolved: a unit names classes,
//! invader slots and key-registry slots, never model ids.

use serde::Serialize;

use crate::key::DependencyKind;
use crate::types::ObjectType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeneratedUnit {
    Provider(ProviderUnit),
    Factory(FactoryUnit),
    Contract(ContractUnit),
    PackageInvader(PackageInvaderUnit),
    KeyRegistry(KeyRegistryUnit),
}

impl GeneratedUnit {
    /// Identity of the generated type.
    pub fn ty(&self) -> &ObjectType {
        match self {
            GeneratedUnit::Provider(unit) => &unit.ty,
            GeneratedUnit::Factory(unit) => &unit.ty,
            GeneratedUnit::Contract(unit) => &unit.ty,
            GeneratedUnit::PackageInvader(unit) => &unit.ty,
            GeneratedUnit::KeyRegistry(unit) => &unit.ty,
        }
    }
}

/// How generated code obtains a key at run time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "via", rename_all = "snake_case")]
pub enum KeyReference {
    /// A class literal, loaded through a package invader when the class
    /// is not public.
    Class {
        ty: ObjectType,
        #[serde(skip_serializing_if = "Option::is_none")]
        invader: Option<FieldReference>,
    },
    Registry(FieldReference),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldReference {
    pub owner: ObjectType,
    pub field: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyReference {
    pub key: KeyReference,
    pub kind: DependencyKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderUnit {
    pub ty: ObjectType,
    pub key: KeyReference,
    /// Scope annotation when instances are cached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<ObjectType>,
    pub eager: bool,
    pub source: ProviderSource,
    pub dependencies: Vec<DependencyReference>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderSource {
    Constructor { target: ObjectType },
    Method { module: ObjectType, method: String },
    Field { module: ObjectType, field: String },
    Binding { implementation: KeyReference },
    Factory { implementation: ObjectType },
    Contract { implementation: ObjectType },
    ContractMethod {
        contract: KeyReference,
        method: String,
        lazy: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactoryUnit {
    pub ty: ObjectType,
    pub factory: ObjectType,
    pub methods: Vec<FactoryMethodUnit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactoryMethodUnit {
    pub name: String,
    pub implementation: ObjectType,
    pub arguments: Vec<FactoryArgument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "from", rename_all = "snake_case")]
pub enum FactoryArgument {
    Injector(DependencyReference),
    Parameter { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractUnit {
    pub ty: ObjectType,
    pub contract: ObjectType,
    pub methods: Vec<ContractMethodUnit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractMethodUnit {
    pub name: String,
    pub dependency: DependencyReference,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageInvaderUnit {
    pub ty: ObjectType,
    pub package: String,
    pub classes: Vec<InvaderClass>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvaderClass {
    pub field: String,
    pub ty: ObjectType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyRegistryUnit {
    pub ty: ObjectType,
    pub entries: Vec<KeyRegistryEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyRegistryEntry {
    pub field: String,
    /// Rendered key, e.g. `@javax.inject.Named(value="a") java.lang.String`.
    pub key: String,
    pub qualified: bool,
}
