//! Assembly of everything the generator needs from one analysed graph.

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, info};

use crate::arena::Id;
use crate::error::CompilerResult;
use crate::generation::invader::{invader_name, PackageInvader};
use crate::generation::key_registry::{registry_key, KeyRegistry};
use crate::generation::provider::{Provider, ProviderMedium};
use crate::generation::provider_factory::ProviderFactory;
use crate::key::Key;
use crate::metadata::MetadataSource;
use crate::model::{Contract, Factory, FactoryInjectee, Import, InjectionContext, Module};
use crate::types::{ObjectType, Type};

/// Providers and helper descriptors of one invocation.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    pub providers_by_module: IndexMap<ObjectType, Vec<Provider>>,
    pub providers_by_contract: IndexMap<ObjectType, Vec<Provider>>,
    /// Every provider exactly once, module providers first. When two
    /// entries share a generated type the first one wins.
    pub providers: Vec<Provider>,
    pub package_invaders: Vec<PackageInvader>,
    pub contracts: Vec<Id<Contract>>,
    pub factories: Vec<Id<Factory>>,
    pub key_registry: KeyRegistry,
}

impl GenerationContext {
    pub fn find_providers_by_module(&self, ty: &ObjectType) -> Option<&[Provider]> {
        self.providers_by_module.get(ty).map(Vec::as_slice)
    }

    pub fn find_providers_by_contract(&self, ty: &ObjectType) -> Option<&[Provider]> {
        self.providers_by_contract.get(ty).map(Vec::as_slice)
    }

    pub fn find_package_invader(&self, package_name: &str) -> Option<&PackageInvader> {
        self.package_invaders
            .iter()
            .find(|invader| invader.package_name == package_name)
    }

    /// Invader slot holding a reference to `ty`, if `ty` needs one.
    pub fn find_invader_field(&self, ty: &ObjectType) -> Option<(&PackageInvader, &str)> {
        let invader = self.find_package_invader(ty.package_name())?;
        invader.field(ty).map(|field| (invader, field))
    }
}

/// Builds the [`GenerationContext`] for types of the current input.
///
/// Modules, contracts and factories from previously compiled inputs were
/// generated when they were compiled and are only referenced here.
pub struct GenerationContextFactory<'a> {
    source: &'a dyn MetadataSource,
}

impl<'a> GenerationContextFactory<'a> {
    pub fn new(source: &'a dyn MetadataSource) -> Self {
        Self { source }
    }

    pub fn create(
        &self,
        injection: &InjectionContext,
        provider_factory: &mut ProviderFactory<'_>,
    ) -> CompilerResult<GenerationContext> {
        let modules: Vec<Id<Module>> = injection
            .modules
            .iter()
            .filter(|(_, module)| self.source.belongs_to_current_input(&module.ty))
            .map(|(id, _)| id)
            .collect();

        let mut providers_by_module = IndexMap::new();
        for id in &modules {
            let providers = provider_factory.create_providers_for_module(injection, *id)?;
            providers_by_module.insert(injection.module(*id).ty.clone(), providers.to_vec());
        }

        let mut contract_imports: IndexMap<Id<Contract>, bool> = IndexMap::new();
        for id in &modules {
            for import in &injection.module(*id).imports {
                if let Import::Contract { contract, lazy, .. } = import {
                    contract_imports.entry(*contract).or_insert(*lazy);
                }
            }
        }
        let mut providers_by_contract = IndexMap::new();
        for (contract, lazy) in contract_imports {
            let providers = provider_factory.create_providers_for_contract(injection, contract, lazy)?;
            providers_by_contract.insert(injection.contract(contract).ty.clone(), providers.to_vec());
        }

        let contracts: Vec<Id<Contract>> = modules
            .iter()
            .flat_map(|id| injection.module(*id).contracts.iter().copied())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect();
        let factories: Vec<Id<Factory>> = injection
            .factories
            .iter()
            .filter(|(_, factory)| self.source.belongs_to_current_input(&factory.ty))
            .map(|(id, _)| id)
            .collect();

        let providers = flatten_providers(&providers_by_module, &providers_by_contract);
        let keys = collect_keys(injection, &providers, &contracts, &factories);
        let package_invaders = self.compose_package_invaders(&keys, provider_factory)?;
        let key_registry = compose_key_registry(&keys, provider_factory)?;

        debug!(
            invaders = package_invaders.len(),
            registry_keys = key_registry.keys.len(),
            "Composed generation helpers"
        );
        info!(
            "Assembled {} providers, {} contracts and {} factories",
            providers.len(),
            contracts.len(),
            factories.len()
        );
        Ok(GenerationContext {
            providers_by_module,
            providers_by_contract,
            providers,
            package_invaders,
            contracts,
            factories,
            key_registry,
        })
    }

    /// One invader per package among the non-public types referenced by any
    /// key. Types missing from the source are taken as public.
    fn compose_package_invaders(
        &self,
        keys: &IndexSet<Key>,
        provider_factory: &mut ProviderFactory<'_>,
    ) -> CompilerResult<Vec<PackageInvader>> {
        let mut types_by_package: IndexMap<String, IndexSet<ObjectType>> = IndexMap::new();
        for key in keys {
            for ty in key.ty.object_types() {
                let Type::Object(ty) = ty else {
                    continue;
                };
                let is_public = self
                    .source
                    .find_class(&ty)
                    .map_or(true, |mirror| mirror.is_public);
                if !is_public {
                    types_by_package
                        .entry(ty.package_name().to_string())
                        .or_default()
                        .insert(ty);
                }
            }
        }

        let project_name = provider_factory.project_name().to_string();
        types_by_package
            .into_iter()
            .map(|(package_name, types)| {
                let ty = provider_factory
                    .names_mut()
                    .unique_type_or_indexed(&invader_name(&package_name, &project_name))?;
                let fields = types
                    .into_iter()
                    .enumerate()
                    .map(|(index, ty)| (ty, format!("class{index}")))
                    .collect();
                Ok(PackageInvader {
                    ty,
                    package_name,
                    fields,
                })
            })
            .collect()
    }
}

/// Module providers then contract providers, deduplicated by generated
/// type with the first occurrence winning.
fn flatten_providers(
    providers_by_module: &IndexMap<ObjectType, Vec<Provider>>,
    providers_by_contract: &IndexMap<ObjectType, Vec<Provider>>,
) -> Vec<Provider> {
    let mut seen = IndexSet::new();
    providers_by_module
        .values()
        .chain(providers_by_contract.values())
        .flatten()
        .filter(|provider| seen.insert(provider.ty.clone()))
        .cloned()
        .collect()
}

/// Every key generated code refers to, boxed, in first-reference order.
fn collect_keys(
    injection: &InjectionContext,
    providers: &[Provider],
    contracts: &[Id<Contract>],
    factories: &[Id<Factory>],
) -> IndexSet<Key> {
    let mut keys = IndexSet::new();
    for provider in providers {
        keys.insert(provider.key(injection).boxed());
        match &provider.medium {
            ProviderMedium::ProvisionPoint(point) => {
                keys.extend(point.injectees().iter().map(|dependency| dependency.key.boxed()));
            }
            ProviderMedium::Binding(binding) => {
                keys.insert(binding.implementation.boxed());
            }
            ProviderMedium::ContractProvisionPoint { contract, .. } => {
                keys.insert(injection.contract(*contract).key.boxed());
            }
            ProviderMedium::Factory(_) | ProviderMedium::Contract(_) => {}
        }
    }
    for contract in contracts.iter().map(|id| injection.contract(*id)) {
        keys.insert(contract.key.boxed());
        keys.extend(contract.provision_points.iter().map(|point| point.injectee.key.boxed()));
    }
    for factory in factories.iter().map(|id| injection.factory(*id)) {
        keys.insert(factory.key.boxed());
        for point in &factory.provision_points {
            keys.extend(point.injectees.iter().filter_map(|injectee| match injectee {
                FactoryInjectee::FromInjector(dependency) => Some(dependency.key.boxed()),
                FactoryInjectee::FromMethod { .. } => None,
            }));
        }
    }
    keys
}

fn compose_key_registry(
    keys: &IndexSet<Key>,
    provider_factory: &mut ProviderFactory<'_>,
) -> CompilerResult<KeyRegistry> {
    let name = format!("{}${}", KeyRegistry::BASE_NAME, provider_factory.project_name());
    let ty = provider_factory.names_mut().unique_type_or_indexed(&name)?;
    let keys = keys
        .iter()
        .enumerate()
        .filter_map(|(index, key)| registry_key(key, index).map(|slot| (key.clone(), slot)))
        .collect();
    Ok(KeyRegistry { ty, keys })
}
