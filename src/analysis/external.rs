use indexmap::IndexMap;

use crate::analysis::helper::AnalyzerHelper;
use crate::arena::{Arena, Id};
use crate::error::CompilerResult;
use crate::key::AnnotationValue;
use crate::metadata::{annotations, Annotated};
use crate::model::{Contract, Factory, ImportPoint, InjectionTarget};
use crate::reporter::{report, ErrorReporter};
use crate::types::{ObjectType, Type};

/// Wiring declared on the importee side: `@ImportedBy` on modules and
/// `@ProvidedBy` on providable targets, factories and contracts.
#[derive(Debug, Default)]
pub(crate) struct ExternalSetup {
    pub(crate) import_points_by_importer: IndexMap<ObjectType, Vec<ImportPoint>>,
    pub(crate) providable_targets_by_module: IndexMap<ObjectType, Vec<ObjectType>>,
    pub(crate) factories_by_module: IndexMap<ObjectType, Vec<Id<Factory>>>,
    pub(crate) contracts_by_module: IndexMap<ObjectType, Vec<Id<Contract>>>,
}

impl ExternalSetup {
    pub(crate) fn analyze(
        helper: AnalyzerHelper<'_>,
        types: &[ObjectType],
        providable_targets: &[InjectionTarget],
        factories: &Arena<Factory>,
        contracts: &Arena<Contract>,
        reporter: &mut dyn ErrorReporter,
    ) -> CompilerResult<Self> {
        let mut setup = Self::default();

        for ty in types {
            let mirror = helper.source().class(ty)?;
            if !mirror.has_annotation(annotations::MODULE) {
                continue;
            }
            for point in imported_by(helper, ty, mirror.annotation_types(annotations::IMPORTED_BY), reporter) {
                if let ImportPoint::Annotation { importer, .. } = &point {
                    setup
                        .import_points_by_importer
                        .entry(importer.clone())
                        .or_default()
                        .push(point);
                }
            }
        }

        for target in providable_targets {
            for module in provided_by(helper, &target.ty, reporter)? {
                setup
                    .providable_targets_by_module
                    .entry(module)
                    .or_default()
                    .push(target.ty.clone());
            }
        }
        for (id, factory) in factories.iter() {
            for module in provided_by(helper, &factory.ty, reporter)? {
                setup.factories_by_module.entry(module).or_default().push(id);
            }
        }
        for (id, contract) in contracts.iter() {
            for module in provided_by(helper, &contract.ty, reporter)? {
                setup.contracts_by_module.entry(module).or_default().push(id);
            }
        }

        Ok(setup)
    }
}

fn imported_by(
    helper: AnalyzerHelper<'_>,
    module: &ObjectType,
    values: Option<Vec<AnnotationValue>>,
    reporter: &mut dyn ErrorReporter,
) -> Vec<ImportPoint> {
    let Some(values) = values else {
        return Vec::new();
    };
    if values.is_empty() {
        report(reporter, format!("Module {module} should be imported by at least one container"));
        return Vec::new();
    }

    values
        .iter()
        .filter_map(|value| {
            let AnnotationValue::Type(Type::Object(importer)) = value else {
                report(
                    reporter,
                    format!("A non-class type is specified in @ImportedBy annotation for {module}"),
                );
                return None;
            };
            if !is_container(helper, importer) {
                report(
                    reporter,
                    format!("Module {module} is imported by {importer}, which isn't a container"),
                );
                return None;
            }
            if is_bound_to_foreign_container(helper, module, importer) {
                report(
                    reporter,
                    format!("Module {module} is imported by {importer}, which doesn't belong to current inputs"),
                );
                return None;
            }
            Some(ImportPoint::Annotation {
                importer: importer.clone(),
                importee: module.clone(),
            })
        })
        .collect()
}

/// Containers listed in the `@ProvidedBy` annotation of `ty`.
fn provided_by(
    helper: AnalyzerHelper<'_>,
    ty: &ObjectType,
    reporter: &mut dyn ErrorReporter,
) -> CompilerResult<Vec<ObjectType>> {
    let mirror = helper.source().class(ty)?;
    let Some(values) = mirror.annotation_types(annotations::PROVIDED_BY) else {
        return Ok(Vec::new());
    };
    if values.is_empty() {
        report(reporter, format!("@ProvidedBy should contain at least one container: {ty}"));
        return Ok(Vec::new());
    }

    let mut modules = Vec::with_capacity(values.len());
    for value in &values {
        match value {
            AnnotationValue::Type(Type::Object(module)) if !is_container(helper, module) => report(
                reporter,
                format!("{ty} is provided by {module}, which isn't a container"),
            ),
            AnnotationValue::Type(Type::Object(module)) if is_bound_to_foreign_container(helper, ty, module) => {
                report(
                    reporter,
                    format!("{ty} is provided by {module}, which doesn't belong to current inputs"),
                )
            }
            AnnotationValue::Type(Type::Object(module)) => modules.push(module.clone()),
            _ => report(
                reporter,
                format!("A non-class type is specified in @ProvidedBy annotation for {ty}"),
            ),
        }
    }
    Ok(modules)
}

fn is_container(helper: AnalyzerHelper<'_>, ty: &ObjectType) -> bool {
    helper
        .source()
        .find_class(ty)
        .is_some_and(|mirror| helper.is_container(mirror))
}

/// Current-input entities may only be hosted by current-input containers.
fn is_bound_to_foreign_container(helper: AnalyzerHelper<'_>, entity: &ObjectType, container: &ObjectType) -> bool {
    let source = helper.source();
    source.belongs_to_current_input(entity) && !source.belongs_to_current_input(container)
}
