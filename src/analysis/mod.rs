//! Turns class metadata into an [`InjectionContext`].
//!
//! Analysis never stops at the first structural problem. Every violation is
//! reported and parsing continues where it is safe; only a missing class
//! descriptor aborts the run.

mod bindings;
mod containers;
mod contracts;
mod external;
mod factories;
mod helper;
mod modules;
mod targets;

use tracing::{debug, info};

use crate::error::CompilerResult;
use crate::metadata::{annotations, Annotated, MetadataSource};
use crate::model::{Component, ContractConfiguration, InjectionContext};
use crate::reporter::ErrorReporter;

use self::bindings::BindingRegistry;
use self::containers::analyze_containers;
use self::contracts::ContractParser;
use self::external::ExternalSetup;
use self::factories::FactoryParser;
use self::helper::AnalyzerHelper;
use self::modules::{ModuleInputs, ModuleParser};
use self::targets::analyze_injection_targets;

pub(crate) use self::factories::factory_methods;

/// Entry point of analysis.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{Analyzer, ClassMirror, ClassRegistry, CollectingReporter, ErrorReporter};
/// use ferrous_inject::metadata::annotations;
/// use ferrous_inject::key::AnnotationMirror;
///
/// let source = ClassRegistry::new()
///     .input(ClassMirror::class("app/AppComponent").annotated(AnnotationMirror::new(annotations::COMPONENT)));
/// let mut reporter = CollectingReporter::new();
/// let context = Analyzer::new(&source, "main").analyze(&mut reporter).unwrap();
///
/// assert!(!reporter.has_errors());
/// assert_eq!(context.components.len(), 1);
/// ```
pub struct Analyzer<'a> {
    source: &'a dyn MetadataSource,
    project_name: String,
}

impl<'a> Analyzer<'a> {
    pub fn new(source: &'a dyn MetadataSource, project_name: impl Into<String>) -> Self {
        Self {
            source,
            project_name: project_name.into(),
        }
    }

    pub fn analyze(&self, reporter: &mut dyn ErrorReporter) -> CompilerResult<InjectionContext> {
        let helper = AnalyzerHelper::new(self.source);
        let types = self.source.types();
        info!("Analyzing {} types", types.len());

        let targets = analyze_injection_targets(helper, &types, reporter)?;
        let bindings = BindingRegistry::analyze(helper, &types, reporter)?;

        let mut factory_parser = FactoryParser::new(helper);
        let mut contract_parser = ContractParser::new(helper, self.project_name.clone());
        let mut module_types = Vec::new();
        for ty in &types {
            let mirror = self.source.class(ty)?;
            if mirror.has_annotation(annotations::FACTORY) {
                factory_parser.parse_factory(ty, reporter)?;
            }
            if mirror.has_annotation(annotations::CONTRACT) {
                contract_parser.parse_contract(ty, reporter)?;
            }
            if mirror.has_annotation(annotations::MODULE) {
                module_types.push(ty.clone());
            }
        }
        let factories = factory_parser.into_arena();

        let setup = ExternalSetup::analyze(
            helper,
            &types,
            &targets.providable,
            &factories,
            contract_parser.contracts(),
            reporter,
        )?;
        let containers = analyze_containers(helper, &types, &mut contract_parser, reporter)?;

        let roots = containers
            .components
            .iter()
            .chain(&containers.configurations)
            .chain(&module_types)
            .cloned()
            .collect::<Vec<_>>();
        let inputs = ModuleInputs {
            setup: &setup,
            bindings: &bindings,
            providable_targets: &targets.providable,
            factories: &factories,
            configuration_contracts: &containers.configuration_contracts,
        };
        let modules = ModuleParser::new(helper, inputs, &mut contract_parser).parse_modules(roots, reporter)?;

        let components = containers
            .components
            .iter()
            .filter_map(|ty| {
                modules.find(ty).map(|module| Component {
                    ty: ty.clone(),
                    module,
                })
            })
            .collect::<Vec<_>>();
        let contract_configurations = containers
            .configurations
            .iter()
            .filter_map(|ty| {
                let contract = *containers.configuration_contracts.get(ty)?;
                let module = modules.find(ty)?;
                Some(ContractConfiguration {
                    ty: ty.clone(),
                    contract,
                    module,
                })
            })
            .collect::<Vec<_>>();

        let context = InjectionContext {
            modules,
            contracts: contract_parser.into_arena(),
            factories,
            components,
            contract_configurations,
            injectable_targets: targets.injectable,
            providable_targets: targets.providable,
            bindings: bindings.into_bindings(),
        };
        debug!(
            modules = context.modules.len(),
            contracts = context.contracts.len(),
            factories = context.factories.len(),
            "Analysis finished"
        );
        info!(
            "Found {} components and {} contract configurations",
            context.components.len(),
            context.contract_configurations.len()
        );
        Ok(context)
    }
}
