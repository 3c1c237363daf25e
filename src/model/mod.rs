//! The injection model: the validated dependency graph of one invocation.

mod binding;
mod contract;
mod factory;
mod module;
mod provision;

pub use binding::Binding;
pub use contract::{Contract, ContractProvisionPoint};
pub use factory::{Factory, FactoryInjectee, FactoryProvisionPoint};
pub use module::{
    Component, Container, ContainerKind, ContractConfiguration, Import, ImportPoint, Module,
};
pub use provision::{InjectionPoint, InjectionTarget, ProvisionPoint, Scope};

use std::collections::VecDeque;

use indexmap::IndexSet;

use crate::arena::{Arena, Id};
use crate::types::ObjectType;

/// Everything analysis produced for one invocation.
///
/// Modules, contracts and factories live in arenas keyed by their declared
/// type, so a module reached through several import paths is stored once.
#[derive(Debug, Clone, Default)]
pub struct InjectionContext {
    pub modules: Arena<Module>,
    pub contracts: Arena<Contract>,
    pub factories: Arena<Factory>,
    pub components: Vec<Component>,
    pub contract_configurations: Vec<ContractConfiguration>,
    pub injectable_targets: Vec<InjectionTarget>,
    pub providable_targets: Vec<InjectionTarget>,
    pub bindings: Vec<Binding>,
}

impl InjectionContext {
    pub fn module(&self, id: Id<Module>) -> &Module {
        &self.modules[id]
    }

    pub fn contract(&self, id: Id<Contract>) -> &Contract {
        &self.contracts[id]
    }

    pub fn factory(&self, id: Id<Factory>) -> &Factory {
        &self.factories[id]
    }

    pub fn find_module(&self, ty: &ObjectType) -> Option<&Module> {
        self.modules.get_by_type(ty)
    }

    pub fn find_providable_target(&self, ty: &ObjectType) -> Option<&InjectionTarget> {
        self.providable_targets.iter().find(|target| &target.ty == ty)
    }

    /// Components first, then contract configurations.
    pub fn containers(&self) -> Vec<Container> {
        let components = self.components.iter().map(|component| Container {
            ty: component.ty.clone(),
            kind: ContainerKind::Component,
            module: component.module,
        });
        let configurations = self
            .contract_configurations
            .iter()
            .map(|configuration| Container {
                ty: configuration.ty.clone(),
                kind: ContainerKind::ContractConfiguration,
                module: configuration.module,
            });
        components.chain(configurations).collect()
    }

    /// The effective module graph of `root`: `root` followed by every module
    /// it imports transitively, breadth first, each exactly once.
    pub fn modules_with_descendants(&self, root: Id<Module>) -> Vec<Id<Module>> {
        let mut visited = IndexSet::from([root]);
        let mut queue = VecDeque::from([root]);
        while let Some(id) = queue.pop_front() {
            for imported in self.modules[id].modules() {
                if visited.insert(imported) {
                    queue.push_back(imported);
                }
            }
        }
        visited.into_iter().collect()
    }
}
