use std::fmt;

use crate::arena::Id;
use crate::model::{Binding, Contract, Factory, ProvisionPoint};
use crate::types::ObjectType;

/// A provisioning unit. Components and contract configurations are parsed
/// as modules too; their own module carries the root's provision points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub ty: ObjectType,
    pub imports: Vec<Import>,
    pub provision_points: Vec<ProvisionPoint>,
    pub bindings: Vec<Binding>,
    pub factories: Vec<Id<Factory>>,
    pub contracts: Vec<Id<Contract>>,
}

impl Module {
    pub fn empty(ty: ObjectType) -> Self {
        Self {
            ty,
            imports: Vec::new(),
            provision_points: Vec::new(),
            bindings: Vec::new(),
            factories: Vec::new(),
            contracts: Vec::new(),
        }
    }

    /// Directly imported modules, in declaration order.
    pub fn modules(&self) -> impl Iterator<Item = Id<Module>> + '_ {
        self.imports.iter().filter_map(|import| match import {
            Import::Module { module, .. } => Some(*module),
            Import::Contract { .. } => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Import {
    Module {
        module: Id<Module>,
        point: ImportPoint,
    },
    Contract {
        contract: Id<Contract>,
        point: ImportPoint,
        /// Imported as `Lazy<C>`: the contract is created on first access.
        lazy: bool,
    },
}

impl Import {
    pub fn point(&self) -> &ImportPoint {
        match self {
            Import::Module { point, .. } | Import::Contract { point, .. } => point,
        }
    }
}

/// Where an import is declared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImportPoint {
    Method { container: ObjectType, name: String },
    Field { container: ObjectType, name: String },
    /// `@ImportedBy` on the importee.
    Annotation {
        importer: ObjectType,
        importee: ObjectType,
    },
}

impl fmt::Display for ImportPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportPoint::Method { container, name } => write!(f, "{container}.{name}()"),
            ImportPoint::Field { container, name } => write!(f, "{container}.{name}"),
            ImportPoint::Annotation { importer, importee } => {
                write!(f, "@ImportedBy({importer}) on {importee}")
            }
        }
    }
}

/// Root container for member injection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub ty: ObjectType,
    pub module: Id<Module>,
}

/// Root container bound to exactly one contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractConfiguration {
    pub ty: ObjectType,
    pub contract: Id<Contract>,
    pub module: Id<Module>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Component,
    ContractConfiguration,
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerKind::Component => f.write_str("component"),
            ContainerKind::ContractConfiguration => f.write_str("contract"),
        }
    }
}

/// Uniform view over both root kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub ty: ObjectType,
    pub kind: ContainerKind,
    pub module: Id<Module>,
}
