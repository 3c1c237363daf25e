use std::collections::{HashMap, VecDeque};

use tracing::debug;

use crate::analysis::bindings::BindingRegistry;
use crate::analysis::contracts::ContractParser;
use crate::analysis::external::ExternalSetup;
use crate::analysis::helper::{member_name, AnalyzerHelper};
use crate::analysis::targets::parameter_injectees;
use crate::arena::{Arena, Id};
use crate::error::CompilerResult;
use crate::key::Key;
use crate::metadata::{annotations, Annotated, ClassMirror};
use crate::model::{
    Binding, Contract, Factory, Import, ImportPoint, InjectionTarget, Module, ProvisionPoint,
};
use crate::reporter::{report, ErrorReporter};
use crate::types::{GenericType, ObjectType, Type};

/// Everything a module parse reads but never changes.
pub(crate) struct ModuleInputs<'p> {
    pub(crate) setup: &'p ExternalSetup,
    pub(crate) bindings: &'p BindingRegistry,
    pub(crate) providable_targets: &'p [InjectionTarget],
    pub(crate) factories: &'p Arena<Factory>,
    /// Contract bound by each contract configuration.
    pub(crate) configuration_contracts: &'p HashMap<ObjectType, Id<Contract>>,
}

/// An import whose module has not been given an id yet.
enum PendingImport {
    Module { ty: ObjectType, point: ImportPoint },
    Resolved(Import),
}

/// Builds the module arena breadth first over the import graph.
///
/// Every module type is parsed once no matter how many paths reach it, so
/// import cycles end the walk instead of recursing. Module imports are
/// linked in a second pass, once every reachable module has an id.
pub(crate) struct ModuleParser<'a, 'p> {
    helper: AnalyzerHelper<'a>,
    inputs: ModuleInputs<'p>,
    contracts: &'p mut ContractParser<'a>,
    modules: Arena<Module>,
    pending: Vec<(Id<Module>, Vec<PendingImport>)>,
}

impl<'a, 'p> ModuleParser<'a, 'p> {
    pub(crate) fn new(
        helper: AnalyzerHelper<'a>,
        inputs: ModuleInputs<'p>,
        contracts: &'p mut ContractParser<'a>,
    ) -> Self {
        Self {
            helper,
            inputs,
            contracts,
            modules: Arena::new(),
            pending: Vec::new(),
        }
    }

    /// Parses `roots` and every module they import, transitively.
    pub(crate) fn parse_modules(
        mut self,
        roots: impl IntoIterator<Item = ObjectType>,
        reporter: &mut dyn ErrorReporter,
    ) -> CompilerResult<Arena<Module>> {
        let mut queue: VecDeque<ObjectType> = roots.into_iter().collect();
        while let Some(ty) = queue.pop_front() {
            if self.modules.find(&ty).is_some() {
                continue;
            }

            let (module, imports) = self.parse_module(&ty, reporter)?;
            for import in &imports {
                if let PendingImport::Module { ty, .. } = import {
                    queue.push_back(ty.clone());
                }
            }
            let id = self.modules.insert(ty, module);
            self.pending.push((id, imports));
        }

        self.link_imports();
        Ok(self.modules)
    }

    fn link_imports(&mut self) {
        for (id, imports) in std::mem::take(&mut self.pending) {
            let resolved: Vec<Import> = imports
                .into_iter()
                .filter_map(|import| match import {
                    PendingImport::Module { ty, point } => self
                        .modules
                        .find(&ty)
                        .map(|module| Import::Module { module, point }),
                    PendingImport::Resolved(import) => Some(import),
                })
                .collect();
            if let Some(module) = self.modules.get_mut(id) {
                module.imports = resolved;
            }
        }
    }

    fn parse_module(
        &mut self,
        ty: &ObjectType,
        reporter: &mut dyn ErrorReporter,
    ) -> CompilerResult<(Module, Vec<PendingImport>)> {
        let mirror = self.helper.source().class(ty)?;
        if !mirror.type_parameters.is_empty() {
            report(reporter, format!("Module cannot have a type parameters: {ty}"));
            return Ok((Module::empty(ty.clone()), Vec::new()));
        }

        debug!("Module: {ty}");
        let imports = self.parse_imports(mirror, reporter)?;
        let provision_points = self.provision_points(mirror, reporter);

        let factories = self
            .inputs
            .setup
            .factories_by_module
            .get(ty)
            .cloned()
            .unwrap_or_default();
        let mut contracts = self
            .inputs
            .setup
            .contracts_by_module
            .get(ty)
            .cloned()
            .unwrap_or_default();
        if let Some(contract) = self.inputs.configuration_contracts.get(ty) {
            contracts.push(*contract);
        }

        let keys = provision_points
            .iter()
            .map(ProvisionPoint::key)
            .chain(factories.iter().map(|id| &self.inputs.factories[*id].key))
            .cloned()
            .chain(contracts.iter().filter_map(|id| self.contract_key(*id)))
            .collect::<Vec<Key>>();
        let mut bindings: Vec<Binding> = Vec::new();
        for key in &keys {
            for binding in self.inputs.bindings.find_by_implementation(key) {
                if !bindings.contains(binding) {
                    bindings.push(binding.clone());
                }
            }
        }

        let module = Module {
            ty: ty.clone(),
            imports: Vec::new(),
            provision_points,
            bindings,
            factories,
            contracts,
        };
        Ok((module, imports))
    }

    fn contract_key(&self, id: Id<Contract>) -> Option<Key> {
        self.contracts.contract(id).map(|contract| contract.key.clone())
    }

    fn provision_points(&self, mirror: &ClassMirror, reporter: &mut dyn ErrorReporter) -> Vec<ProvisionPoint> {
        let mut points = Vec::new();

        let targets = self
            .inputs
            .setup
            .providable_targets_by_module
            .get(&mirror.ty)
            .map(Vec::as_slice)
            .unwrap_or_default();
        for target_type in targets {
            let Some(target) = self
                .inputs
                .providable_targets
                .iter()
                .find(|target| &target.ty == target_type)
            else {
                continue;
            };
            let Some(target_mirror) = self.helper.source().find_class(&target.ty) else {
                continue;
            };
            let element = target.ty.to_string();
            debug!("  Constructor: {element}");
            points.push(ProvisionPoint::Constructor {
                container: target.ty.clone(),
                key: Key {
                    qualifier: self.helper.find_qualifier(target_mirror, &element, reporter),
                    ..Key::of_class(&target.ty)
                },
                scope: self.helper.find_scope(target_mirror, &element, reporter),
                injectees: target.constructor_injectees(),
            });
        }

        for method in mirror
            .plain_methods()
            .filter(|method| !method.is_static && method.has_annotation(annotations::PROVIDE))
        {
            let element = member_name(&mirror.ty, &method.name);
            if method.return_type.raw_type().is_void() {
                report(reporter, format!("Provider returns void: {element}"));
                continue;
            }
            debug!("  Method: {element}");
            points.push(ProvisionPoint::Method {
                container: mirror.ty.clone(),
                key: Key::new(
                    method.return_type.clone(),
                    self.helper.find_qualifier(method, &element, reporter),
                ),
                scope: self.helper.find_scope(method, &element, reporter),
                method: method.name.clone(),
                injectees: parameter_injectees(self.helper, &mirror.ty, method, reporter),
            });
        }

        for field in mirror
            .fields
            .iter()
            .filter(|field| !field.is_static && field.has_annotation(annotations::PROVIDE))
        {
            let element = member_name(&mirror.ty, &field.name);
            debug!("  Field: {element}");
            points.push(ProvisionPoint::Field {
                container: mirror.ty.clone(),
                key: Key::new(field.ty.clone(), self.helper.find_qualifier(field, &element, reporter)),
                scope: self.helper.find_scope(field, &element, reporter),
                field: field.name.clone(),
            });
        }

        points
    }

    fn parse_imports(
        &mut self,
        mirror: &ClassMirror,
        reporter: &mut dyn ErrorReporter,
    ) -> CompilerResult<Vec<PendingImport>> {
        let mut imports = Vec::new();

        for method in mirror
            .plain_methods()
            .filter(|method| method.has_annotation(annotations::IMPORT))
        {
            let source = member_name(&mirror.ty, &method.name);
            if method.return_type.raw_type().is_void() {
                report(
                    reporter,
                    format!("Import must be a class: {} from {source}", method.return_type),
                );
                continue;
            }
            if !method.parameters.is_empty() {
                report(reporter, format!("Import method cannot have parameters: {source}"));
                continue;
            }
            debug!("  Import method: {source}");
            let point = ImportPoint::Method {
                container: mirror.ty.clone(),
                name: method.name.clone(),
            };
            if let Some(import) = self.parse_import(method, &method.return_type, &source, point, reporter)? {
                imports.push(import);
            }
        }

        for field in mirror
            .fields
            .iter()
            .filter(|field| field.has_annotation(annotations::IMPORT))
        {
            let source = member_name(&mirror.ty, &field.name);
            debug!("  Import field: {source}");
            let point = ImportPoint::Field {
                container: mirror.ty.clone(),
                name: field.name.clone(),
            };
            if let Some(import) = self.parse_import(field, &field.ty, &source, point, reporter)? {
                imports.push(import);
            }
        }

        let annotation_points = self
            .inputs
            .setup
            .import_points_by_importer
            .get(&mirror.ty)
            .map(Vec::as_slice)
            .unwrap_or_default();
        for point in annotation_points {
            if let ImportPoint::Annotation { importee, .. } = point {
                debug!("  Import annotation: {point}");
                imports.push(PendingImport::Module {
                    ty: importee.clone(),
                    point: point.clone(),
                });
            }
        }

        Ok(imports)
    }

    fn parse_import(
        &mut self,
        element: &dyn Annotated,
        declared: &GenericType,
        source: &str,
        point: ImportPoint,
        reporter: &mut dyn ErrorReporter,
    ) -> CompilerResult<Option<PendingImport>> {
        let Some((ty, lazy)) = import_type(declared, source, reporter) else {
            return Ok(None);
        };

        if element.has_annotation(annotations::CONTRACT) {
            let contract = self.contracts.parse_contract(&ty, reporter)?;
            return Ok(Some(PendingImport::Resolved(Import::Contract {
                contract,
                point,
                lazy,
            })));
        }

        if lazy {
            report(
                reporter,
                format!(
                    "Imported module with type: {ty} cannot be wrapped in: {}",
                    ObjectType::new(annotations::LAZY)
                ),
            );
        }
        if !self.helper.source().class(&ty)?.has_annotation(annotations::MODULE) {
            report(reporter, format!("Imported module {ty} isn't annotated with @Module"));
            return Ok(None);
        }
        Ok(Some(PendingImport::Module { ty, point }))
    }
}

/// Class named by an import declaration and whether it is `Lazy`-wrapped.
fn import_type(
    declared: &GenericType,
    source: &str,
    reporter: &mut dyn ErrorReporter,
) -> Option<(ObjectType, bool)> {
    let lazy = matches!(declared, GenericType::Parameterized { raw, .. } if raw.is(annotations::LAZY));
    let ty = match declared {
        GenericType::Parameterized { arguments, .. } if lazy => arguments.first(),
        GenericType::Raw(_) => Some(declared),
        _ => {
            report(reporter, format!("Import cannot have a generic type: {declared} from {source}"));
            return None;
        }
    };

    match ty {
        Some(GenericType::Raw(Type::Object(ty))) => Some((ty.clone(), lazy)),
        _ => {
            report(reporter, format!("Import must be a class: {declared} from {source}"));
            None
        }
    }
}
