use std::error::Error;

use tracing::{debug, info};

use crate::error::CompilerResult;
use crate::generation::context::GenerationContext;
use crate::generation::emit::{ArtifactSink, EmissionBackend};
use crate::generation::key_registry::RegistryKey;
use crate::generation::provider::{Provider, ProviderMedium};
use crate::generation::unit::{
    ContractMethodUnit, ContractUnit, DependencyReference, FactoryArgument, FactoryMethodUnit,
    FactoryUnit, FieldReference, GeneratedUnit, InvaderClass, KeyReference, KeyRegistryEntry,
    KeyRegistryUnit, PackageInvaderUnit, ProviderSource, ProviderUnit,
};
use crate::key::{Dependency, DependencyKind, Key};
use crate::model::{Contract, Factory, FactoryInjectee, InjectionContext, ProvisionPoint, Scope};
use crate::reporter::ErrorReporter;
use crate::types::{boxed_or_element_type, ObjectType};

/// Emits every generated unit of one invocation.
///
/// Units are emitted in a fixed order: providers, factories, contracts,
/// package invaders, then the key registry. A unit that fails to build,
/// serialize or write is reported and the remaining units are still
/// emitted. The sink is flushed once at the end; a failing flush aborts.
pub struct Generator<'g> {
    backend: &'g dyn EmissionBackend,
    sink: &'g mut dyn ArtifactSink,
    reporter: &'g mut dyn ErrorReporter,
    emitted: usize,
}

impl<'g> Generator<'g> {
    pub fn new(
        backend: &'g dyn EmissionBackend,
        sink: &'g mut dyn ArtifactSink,
        reporter: &'g mut dyn ErrorReporter,
    ) -> Self {
        Self {
            backend,
            sink,
            reporter,
            emitted: 0,
        }
    }

    pub fn generate(mut self, injection: &InjectionContext, generation: &GenerationContext) -> CompilerResult<()> {
        let resolver = KeyResolver { generation };

        for provider in &generation.providers {
            self.emit(&provider.ty, provider_unit(injection, &resolver, provider));
        }
        for factory in generation.factories.iter().map(|id| injection.factory(*id)) {
            self.emit(&factory.implementation_type, factory_unit(&resolver, factory));
        }
        for contract in generation.contracts.iter().map(|id| injection.contract(*id)) {
            self.emit(&contract.implementation_type, contract_unit(&resolver, contract));
        }
        for invader in &generation.package_invaders {
            let unit = GeneratedUnit::PackageInvader(PackageInvaderUnit {
                ty: invader.ty.clone(),
                package: invader.package_name.clone(),
                classes: invader
                    .fields
                    .iter()
                    .map(|(ty, field)| InvaderClass {
                        field: field.clone(),
                        ty: ty.clone(),
                    })
                    .collect(),
            });
            self.emit(&invader.ty, Ok(unit));
        }
        let registry = &generation.key_registry;
        let unit = GeneratedUnit::KeyRegistry(KeyRegistryUnit {
            ty: registry.ty.clone(),
            entries: registry
                .keys
                .iter()
                .map(|(key, slot)| KeyRegistryEntry {
                    field: slot.field().to_string(),
                    key: key.to_string(),
                    qualified: matches!(slot, RegistryKey::QualifiedType { .. }),
                })
                .collect(),
        });
        self.emit(&registry.ty, Ok(unit));

        self.sink.flush()?;
        info!("Generated {} artifacts", self.emitted);
        Ok(())
    }

    fn emit(&mut self, ty: &ObjectType, unit: CompilerResult<GeneratedUnit>) {
        let result = unit
            .and_then(|unit| self.backend.emit(&unit))
            .and_then(|content| self.sink.write(ty, content).map_err(Into::into));
        match result {
            Ok(()) => {
                debug!("Emitted {ty}");
                self.emitted += 1;
            }
            Err(error) => self
                .reporter
                .report_error(format!("Failed to generate {ty}"), Some(&error as &dyn Error)),
        }
    }
}

/// Resolves keys to the form generated code refers to them by.
struct KeyResolver<'g> {
    generation: &'g GenerationContext,
}

impl KeyResolver<'_> {
    fn key(&self, key: &Key) -> CompilerResult<KeyReference> {
        let registry = &self.generation.key_registry;
        if let Some(slot) = registry.find(key) {
            return Ok(KeyReference::Registry(FieldReference {
                owner: registry.ty.clone(),
                field: slot.field().to_string(),
            }));
        }
        let ty = boxed_or_element_type(&key.boxed().ty.raw_type())?;
        let invader = self
            .generation
            .find_invader_field(&ty)
            .map(|(invader, field)| FieldReference {
                owner: invader.ty.clone(),
                field: field.to_string(),
            });
        Ok(KeyReference::Class { ty, invader })
    }

    fn dependency(&self, dependency: &Dependency) -> CompilerResult<DependencyReference> {
        Ok(DependencyReference {
            key: self.key(&dependency.key)?,
            kind: dependency.kind,
        })
    }

    fn dependencies(&self, dependencies: &[Dependency]) -> CompilerResult<Vec<DependencyReference>> {
        dependencies.iter().map(|dependency| self.dependency(dependency)).collect()
    }
}

fn provider_unit(
    injection: &InjectionContext,
    resolver: &KeyResolver<'_>,
    provider: &Provider,
) -> CompilerResult<GeneratedUnit> {
    let mut scope = None;
    let mut eager = false;
    let (source, dependencies) = match &provider.medium {
        ProviderMedium::ProvisionPoint(point) => {
            if let Scope::Class {
                annotation,
                eager: is_eager,
            } = point.scope()
            {
                scope = Some(annotation.clone());
                eager = *is_eager;
            }
            let source = match point {
                ProvisionPoint::Constructor { container, .. } => ProviderSource::Constructor {
                    target: container.clone(),
                },
                ProvisionPoint::Method {
                    container, method, ..
                } => ProviderSource::Method {
                    module: container.clone(),
                    method: method.clone(),
                },
                ProvisionPoint::Field {
                    container, field, ..
                } => ProviderSource::Field {
                    module: container.clone(),
                    field: field.clone(),
                },
            };
            (source, resolver.dependencies(point.injectees())?)
        }
        ProviderMedium::Binding(binding) => {
            let implementation = Dependency::instance(binding.implementation.clone());
            let source = ProviderSource::Binding {
                implementation: resolver.key(&implementation.key)?,
            };
            (source, vec![resolver.dependency(&implementation)?])
        }
        ProviderMedium::Factory(id) => {
            let source = ProviderSource::Factory {
                implementation: injection.factory(*id).implementation_type.clone(),
            };
            (source, Vec::new())
        }
        ProviderMedium::Contract(id) => {
            let source = ProviderSource::Contract {
                implementation: injection.contract(*id).implementation_type.clone(),
            };
            (source, Vec::new())
        }
        ProviderMedium::ContractProvisionPoint {
            contract,
            lazy,
            point,
        } => {
            let kind = if *lazy {
                DependencyKind::Lazy
            } else {
                DependencyKind::Instance
            };
            let contract = Dependency::new(injection.contract(*contract).key.clone(), kind);
            let source = ProviderSource::ContractMethod {
                contract: resolver.key(&contract.key)?,
                method: point.method.clone(),
                lazy: *lazy,
            };
            (source, vec![resolver.dependency(&contract)?])
        }
    };

    Ok(GeneratedUnit::Provider(ProviderUnit {
        ty: provider.ty.clone(),
        key: resolver.key(&provider.key(injection))?,
        scope,
        eager,
        source,
        dependencies,
    }))
}

fn factory_unit(resolver: &KeyResolver<'_>, factory: &Factory) -> CompilerResult<GeneratedUnit> {
    let methods = factory
        .provision_points
        .iter()
        .map(|point| -> CompilerResult<FactoryMethodUnit> {
            let arguments = point
                .injectees
                .iter()
                .map(|injectee| match injectee {
                    FactoryInjectee::FromInjector(dependency) => {
                        resolver.dependency(dependency).map(FactoryArgument::Injector)
                    }
                    FactoryInjectee::FromMethod { argument_index, .. } => Ok(FactoryArgument::Parameter {
                        index: *argument_index,
                    }),
                })
                .collect::<CompilerResult<Vec<_>>>()?;
            Ok(FactoryMethodUnit {
                name: point.method.clone(),
                implementation: point.implementation.clone(),
                arguments,
            })
        })
        .collect::<CompilerResult<Vec<_>>>()?;

    Ok(GeneratedUnit::Factory(FactoryUnit {
        ty: factory.implementation_type.clone(),
        factory: factory.ty.clone(),
        methods,
    }))
}

fn contract_unit(resolver: &KeyResolver<'_>, contract: &Contract) -> CompilerResult<GeneratedUnit> {
    let methods = contract
        .provision_points
        .iter()
        .map(|point| -> CompilerResult<ContractMethodUnit> {
            Ok(ContractMethodUnit {
                name: point.method.clone(),
                dependency: resolver.dependency(&point.injectee)?,
            })
        })
        .collect::<CompilerResult<Vec<_>>>()?;

    Ok(GeneratedUnit::Contract(ContractUnit {
        ty: contract.implementation_type.clone(),
        contract: contract.ty.clone(),
        methods,
    }))
}
