use std::fmt;

use crate::arena::Id;
use crate::key::Key;
use crate::model::{Binding, Contract, ContractProvisionPoint, Factory, InjectionContext, ProvisionPoint};
use crate::types::ObjectType;

/// A generated provider class bound to exactly one source of instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provider {
    pub ty: ObjectType,
    pub medium: ProviderMedium,
}

/// Where a provider gets its instances from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderMedium {
    ProvisionPoint(ProvisionPoint),
    /// Delegates to whatever provides the binding's implementation.
    Binding(Binding),
    /// Creates the generated factory implementation.
    Factory(Id<Factory>),
    /// Creates the generated contract implementation.
    Contract(Id<Contract>),
    /// One getter of an imported contract.
    ContractProvisionPoint {
        contract: Id<Contract>,
        lazy: bool,
        point: ContractProvisionPoint,
    },
}

impl Provider {
    /// Key this provider is registered under in its container.
    pub fn key(&self, context: &InjectionContext) -> Key {
        match &self.medium {
            ProviderMedium::ProvisionPoint(point) => point.key().clone(),
            ProviderMedium::Binding(binding) => binding.ancestor.clone(),
            ProviderMedium::Factory(id) => context.factory(*id).key.clone(),
            ProviderMedium::Contract(id) => context.contract(*id).key.clone(),
            ProviderMedium::ContractProvisionPoint { point, .. } => point.injectee.key.clone(),
        }
    }
}

impl fmt::Display for ProviderMedium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderMedium::ProvisionPoint(point) => write!(f, "provision point {point}"),
            ProviderMedium::Binding(binding) => write!(f, "binding {binding}"),
            ProviderMedium::Factory(id) => write!(f, "factory {id:?}"),
            ProviderMedium::Contract(id) => write!(f, "contract {id:?}"),
            ProviderMedium::ContractProvisionPoint { point, lazy, .. } => {
                let wrapper = if *lazy { "lazy " } else { "" };
                write!(f, "{wrapper}contract method {}.{}", point.container, point.method)
            }
        }
    }
}
