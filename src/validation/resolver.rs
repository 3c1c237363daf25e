use std::collections::HashSet;

use indexmap::IndexMap;

use crate::arena::Id;
use crate::key::{Dependency, Key};
use crate::metadata::annotations;
use crate::model::{FactoryInjectee, Import, InjectionContext, Module};
use crate::types::ObjectType;
use crate::validation::cycles::DependencyGraph;

/// What one container provides and requires across its effective module
/// graph. All keys are stored boxed.
#[derive(Debug, Default)]
pub(crate) struct DependencyResolver {
    provided: IndexMap<Key, Vec<String>>,
    required: IndexMap<Key, Vec<String>>,
    graph: DependencyGraph,
}

impl DependencyResolver {
    pub(crate) fn new(context: &InjectionContext, root: Id<Module>) -> Self {
        let mut resolver = Self::default();
        resolver.provide(
            &Key::of_class(&ObjectType::new(annotations::INJECTOR)),
            "built-in injector".to_string(),
        );

        let mut imported_contracts = HashSet::new();
        let mut bindings = HashSet::new();
        for id in context.modules_with_descendants(root) {
            let module = context.module(id);
            for point in &module.provision_points {
                resolver.provide(point.key(), format!("{point} in module {}", module.ty));
                for injectee in point.injectees() {
                    resolver.require(injectee, point.to_string());
                    resolver.add_edge(point.key(), injectee);
                }
            }

            // A binding follows its implementation into every hosting module;
            // it provides its ancestor once per container.
            for binding in module.bindings.iter().filter(|binding| bindings.insert(*binding)) {
                let implementation = Dependency::instance(binding.implementation.clone());
                resolver.provide(&binding.ancestor, format!("binding {binding} in module {}", module.ty));
                resolver.require(&implementation, format!("binding {binding}"));
                resolver.add_edge(&binding.ancestor, &implementation);
            }

            for factory in module.factories.iter().map(|id| context.factory(*id)) {
                resolver.provide(&factory.key, format!("factory {} in module {}", factory.ty, module.ty));
                for point in &factory.provision_points {
                    for injectee in &point.injectees {
                        if let FactoryInjectee::FromInjector(dependency) = injectee {
                            resolver.require(dependency, format!("{}.{}", factory.ty, point.method));
                        }
                    }
                }
            }

            for contract in module.contracts.iter().map(|id| context.contract(*id)) {
                resolver.provide(&contract.key, format!("contract {} in module {}", contract.ty, module.ty));
                for point in &contract.provision_points {
                    let requester = format!("{}.{}", point.container, point.method);
                    resolver.require(&point.injectee, requester);
                    resolver.add_edge(&contract.key, &point.injectee);
                }
            }

            for import in &module.imports {
                let Import::Contract { contract, point, .. } = import else {
                    continue;
                };
                if !imported_contracts.insert(*contract) {
                    continue;
                }
                let contract = context.contract(*contract);
                resolver.provide(&contract.key, format!("contract {} imported by {point}", contract.ty));
                for provision_point in &contract.provision_points {
                    resolver.provide(
                        &provision_point.injectee.key,
                        format!("{}.{} imported by {point}", provision_point.container, provision_point.method),
                    );
                }
            }
        }
        resolver
    }

    fn provide(&mut self, key: &Key, source: String) {
        self.provided.entry(key.boxed()).or_default().push(source);
    }

    fn require(&mut self, dependency: &Dependency, requester: String) {
        self.required.entry(dependency.key.boxed()).or_default().push(requester);
    }

    /// Only eager dependencies order construction; `Lazy` and `Provider`
    /// break the chain.
    fn add_edge(&mut self, dependent: &Key, dependency: &Dependency) {
        if !dependency.kind.is_deferred() {
            self.graph.add_edge(&dependent.boxed(), &dependency.key.boxed());
        }
    }

    pub(crate) fn is_resolved(&self, key: &Key) -> bool {
        self.provided.contains_key(&key.boxed())
    }

    /// Keys with more than one provider, with every provider's description.
    pub(crate) fn duplicates(&self) -> impl Iterator<Item = (&Key, &[String])> {
        self.provided
            .iter()
            .filter(|(_, sources)| sources.len() > 1)
            .map(|(key, sources)| (key, sources.as_slice()))
    }

    /// Required keys nobody provides, with their requesters.
    pub(crate) fn unresolved(&self) -> impl Iterator<Item = (&Key, &[String])> {
        self.required
            .iter()
            .filter(|(key, _)| !self.provided.contains_key(*key))
            .map(|(key, requesters)| (key, requesters.as_slice()))
    }

    pub(crate) fn find_cycles(&self) -> Vec<Vec<Key>> {
        self.graph.find_cycles()
    }
}
