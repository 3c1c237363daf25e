//! Assigns generated provider identities to provision sources.

use std::collections::HashMap;

use tracing::debug;

use crate::arena::Id;
use crate::error::CompilerResult;
use crate::generation::naming::{NamePattern, NameRegistry};
use crate::generation::provider::{Provider, ProviderMedium};
use crate::metadata::CompiledTypes;
use crate::model::{Binding, Contract, Factory, InjectionContext, Module, ProvisionPoint};
use crate::types::{boxed_or_element_type, ObjectType};

/// One provider per distinct provision source.
///
/// All caches and the name registry live for a single invocation. Asking
/// twice for the same source returns the same provider.
pub struct ProviderFactory<'c> {
    names: NameRegistry<'c>,
    project_name: String,
    module_providers: HashMap<ObjectType, Vec<Provider>>,
    constructor_providers: HashMap<ObjectType, Provider>,
    binding_providers: HashMap<Binding, Provider>,
    factory_providers: HashMap<ObjectType, Provider>,
    contract_providers: HashMap<ObjectType, Provider>,
    contract_point_providers: HashMap<(ObjectType, bool), Vec<Provider>>,
}

impl<'c> ProviderFactory<'c> {
    pub fn new(compiled: &'c dyn CompiledTypes, project_name: impl Into<String>) -> Self {
        Self {
            names: NameRegistry::new(compiled),
            project_name: project_name.into(),
            module_providers: HashMap::new(),
            constructor_providers: HashMap::new(),
            binding_providers: HashMap::new(),
            factory_providers: HashMap::new(),
            contract_providers: HashMap::new(),
            contract_point_providers: HashMap::new(),
        }
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub(crate) fn names_mut(&mut self) -> &mut NameRegistry<'c> {
        &mut self.names
    }

    /// Providers of a module's own provision points, bindings, factories
    /// and contracts, in that order. Computed once per module type.
    pub fn create_providers_for_module(
        &mut self,
        context: &InjectionContext,
        id: Id<Module>,
    ) -> CompilerResult<&[Provider]> {
        let module = context.module(id);
        if !self.module_providers.contains_key(&module.ty) {
            let mut providers = Vec::new();
            for point in &module.provision_points {
                providers.push(self.provision_point_provider(module, point)?);
            }
            for binding in &module.bindings {
                providers.push(self.binding_provider(binding)?);
            }
            for factory in &module.factories {
                providers.push(self.factory_provider(context, *factory)?);
            }
            for contract in &module.contracts {
                providers.push(self.contract_provider(context, *contract)?);
            }
            debug!("Created {} providers for module {}", providers.len(), module.ty);
            self.module_providers.insert(module.ty.clone(), providers);
        }
        Ok(self
            .module_providers
            .get(&module.ty)
            .map(Vec::as_slice)
            .unwrap_or_default())
    }

    /// One provider per getter of an imported contract. Computed once per
    /// contract type and laziness.
    pub fn create_providers_for_contract(
        &mut self,
        context: &InjectionContext,
        id: Id<Contract>,
        lazy: bool,
    ) -> CompilerResult<&[Provider]> {
        let contract = context.contract(id);
        let cache_key = (contract.ty.clone(), lazy);
        if !self.contract_point_providers.contains_key(&cache_key) {
            let pattern = self.pattern(&contract.ty, "MethodProvider");
            let mut providers = Vec::with_capacity(contract.provision_points.len());
            for point in &contract.provision_points {
                providers.push(Provider {
                    ty: self.names.unique_type(&pattern)?,
                    medium: ProviderMedium::ContractProvisionPoint {
                        contract: id,
                        lazy,
                        point: point.clone(),
                    },
                });
            }
            self.contract_point_providers.insert(cache_key.clone(), providers);
        }
        Ok(self
            .contract_point_providers
            .get(&cache_key)
            .map(Vec::as_slice)
            .unwrap_or_default())
    }

    fn provision_point_provider(
        &mut self,
        module: &Module,
        point: &ProvisionPoint,
    ) -> CompilerResult<Provider> {
        match point {
            ProvisionPoint::Constructor { container, .. } => {
                if let Some(provider) = self.constructor_providers.get(container) {
                    return Ok(provider.clone());
                }
                let provider = self.new_provider(container, "ConstructorProvider", point)?;
                self.constructor_providers.insert(container.clone(), provider.clone());
                Ok(provider)
            }
            ProvisionPoint::Method { .. } => self.new_provider(&module.ty, "MethodProvider", point),
            ProvisionPoint::Field { .. } => self.new_provider(&module.ty, "FieldProvider", point),
        }
    }

    fn new_provider(
        &mut self,
        owner: &ObjectType,
        kind: &str,
        point: &ProvisionPoint,
    ) -> CompilerResult<Provider> {
        let pattern = self.pattern(owner, kind);
        Ok(Provider {
            ty: self.names.unique_type(&pattern)?,
            medium: ProviderMedium::ProvisionPoint(point.clone()),
        })
    }

    fn binding_provider(&mut self, binding: &Binding) -> CompilerResult<Provider> {
        if let Some(provider) = self.binding_providers.get(binding) {
            return Ok(provider.clone());
        }
        let owner = boxed_or_element_type(&binding.implementation.ty.raw_type())?;
        let pattern = self.pattern(&owner, "BindingProvider");
        let provider = Provider {
            ty: self.names.unique_type(&pattern)?,
            medium: ProviderMedium::Binding(binding.clone()),
        };
        self.binding_providers.insert(binding.clone(), provider.clone());
        Ok(provider)
    }

    fn factory_provider(&mut self, context: &InjectionContext, id: Id<Factory>) -> CompilerResult<Provider> {
        let factory = context.factory(id);
        if let Some(provider) = self.factory_providers.get(&factory.ty) {
            return Ok(provider.clone());
        }
        let pattern = self.pattern(&factory.ty, "FactoryProvider");
        let provider = Provider {
            ty: self.names.unique_type(&pattern)?,
            medium: ProviderMedium::Factory(id),
        };
        self.factory_providers.insert(factory.ty.clone(), provider.clone());
        Ok(provider)
    }

    fn contract_provider(&mut self, context: &InjectionContext, id: Id<Contract>) -> CompilerResult<Provider> {
        let contract = context.contract(id);
        if let Some(provider) = self.contract_providers.get(&contract.ty) {
            return Ok(provider.clone());
        }
        let pattern = self.pattern(&contract.ty, "ContractProvider");
        let provider = Provider {
            ty: self.names.unique_type(&pattern)?,
            medium: ProviderMedium::Contract(id),
        };
        self.contract_providers.insert(contract.ty.clone(), provider.clone());
        Ok(provider)
    }

    fn pattern(&self, owner: &ObjectType, kind: &str) -> NamePattern {
        NamePattern::new(
            format!("{}${kind}", owner.internal_name()),
            format!("${}", self.project_name),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::key::Key;
    use crate::model::Scope;

    fn context_with_constructor(ty: &str) -> (InjectionContext, Id<Module>) {
        let mut context = InjectionContext::default();
        let target = ObjectType::new(ty);
        let mut module = Module::empty(ObjectType::new("app/M"));
        module.provision_points.push(ProvisionPoint::Constructor {
            container: target.clone(),
            key: Key::of_class(&target),
            scope: Scope::None,
            injectees: Vec::new(),
        });
        let id = context.modules.insert(module.ty.clone(), module);
        (context, id)
    }

    #[test]
    fn module_providers_are_memoized() {
        let (context, id) = context_with_constructor("app/X");
        let compiled = HashSet::new();
        let mut factory = ProviderFactory::new(&compiled, "main");

        let first = factory.create_providers_for_module(&context, id).unwrap().to_vec();
        let second = factory.create_providers_for_module(&context, id).unwrap().to_vec();

        assert_eq!(first, second);
        assert_eq!(first[0].ty, ObjectType::new("app/X$ConstructorProvider0$main"));
        assert_eq!(factory.names_mut().generated_count(), 1);
    }

    #[test]
    fn compiled_candidates_are_skipped() {
        let (context, id) = context_with_constructor("app/X");
        let compiled = HashSet::from([
            ObjectType::new("app/X$ConstructorProvider0$main"),
            ObjectType::new("app/X$ConstructorProvider1$main"),
        ]);
        let mut factory = ProviderFactory::new(&compiled, "main");

        let providers = factory.create_providers_for_module(&context, id).unwrap();
        assert_eq!(providers[0].ty, ObjectType::new("app/X$ConstructorProvider2$main"));
        let name = providers[0].ty.clone();
        assert!(!factory.names_mut().is_free(&name));
    }
}
