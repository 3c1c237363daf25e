use crate::analysis::factory_methods;
use crate::metadata::{annotations, Annotated, MetadataSource};
use crate::model::{Binding, InjectionContext, InjectionPoint, InjectionTarget, Module};
use crate::reporter::{report, ErrorReporter};
use crate::types::{ObjectType, OBJECT_TYPE};

/// Structural checks that need the whole analysed context.
pub(crate) fn perform_sanity_checks(
    source: &dyn MetadataSource,
    context: &InjectionContext,
    reporter: &mut dyn ErrorReporter,
) {
    for module in context.modules.values() {
        check_module(source, module, reporter);
    }
    for target in &context.injectable_targets {
        check_static_injection_points(target, reporter);
    }
    for target in &context.providable_targets {
        check_static_injection_points(target, reporter);
        check_providable_target_is_concrete(source, &target.ty, reporter);
    }
    for factory in context.factories.values() {
        check_factory(source, &factory.ty, reporter);
        for point in &factory.provision_points {
            if point.return_type != point.implementation
                && !source.ancestors(&point.implementation).contains(&point.return_type)
            {
                report(
                    reporter,
                    format!(
                        "Method {}.{} returns {} which isn't an ancestor of {} from the @Factory.Return annotation",
                        factory.ty, point.method, point.return_type, point.implementation
                    ),
                );
            }
        }
    }
    for binding in &context.bindings {
        check_binding(source, binding, reporter);
    }
    for configuration in &context.contract_configurations {
        let is_concrete = source
            .find_class(&configuration.ty)
            .is_some_and(|mirror| !mirror.is_interface && !mirror.is_abstract);
        if !is_concrete {
            report(
                reporter,
                format!("Contract configuration {} should be a concrete class", configuration.ty),
            );
        }
    }
}

fn check_module(source: &dyn MetadataSource, module: &Module, reporter: &mut dyn ErrorReporter) {
    let Some(mirror) = source.find_class(&module.ty) else {
        return;
    };

    if let Some(super_type) = &mirror.super_type {
        if !super_type.is(OBJECT_TYPE) && !super_type.is(annotations::CONTRACT_CONFIGURATION) {
            report(
                reporter,
                format!(
                    "{} has a super type of {super_type} instead of {} or {}",
                    module.ty,
                    ObjectType::new(OBJECT_TYPE),
                    ObjectType::new(annotations::CONTRACT_CONFIGURATION)
                ),
            );
        }
    }

    if mirror.has_annotation(annotations::IMPORTED_BY) && !mirror.has_default_constructor() {
        report(
            reporter,
            format!(
                "Module {} with @ImportedBy annotation must have a default constructor",
                module.ty
            ),
        );
    }
}

fn check_static_injection_points(target: &InjectionTarget, reporter: &mut dyn ErrorReporter) {
    for point in target.injection_points.iter().filter(|point| point.is_static()) {
        match point {
            InjectionPoint::Field { .. } => {
                report(reporter, format!("Static field injection is not supported yet: {point}"))
            }
            InjectionPoint::Method { .. } => {
                report(reporter, format!("Static method injection is not supported yet: {point}"))
            }
        }
    }
}

fn check_providable_target_is_concrete(
    source: &dyn MetadataSource,
    ty: &ObjectType,
    reporter: &mut dyn ErrorReporter,
) {
    if let Some(mirror) = source.find_class(ty) {
        if mirror.is_interface || mirror.is_abstract {
            report(reporter, format!("Providable class cannot be interface/abstract: {ty}"));
        }
    }
}

fn check_factory(source: &dyn MetadataSource, ty: &ObjectType, reporter: &mut dyn ErrorReporter) {
    let Some(mirror) = source.find_class(ty) else {
        return;
    };
    if !mirror.is_interface {
        report(reporter, format!("Factory {ty} must be an interface"));
    }
    if !mirror.type_parameters.is_empty() {
        report(reporter, format!("Factory {ty} mustn't contain generic parameters"));
    }
    if factory_methods(source, mirror).is_empty() {
        report(reporter, format!("Factory {ty} must contain at least one method"));
    }
}

fn check_binding(source: &dyn MetadataSource, binding: &Binding, reporter: &mut dyn ErrorReporter) {
    let (Some(host), Some(ancestor)) = (binding.implementation.raw_object(), binding.ancestor.raw_object()) else {
        return;
    };

    if host == ancestor {
        report(
            reporter,
            format!("@ProvidedAs bindings cannot have a host class {host} as an argument"),
        );
        return;
    }

    let host_mirror = source.find_class(host);
    let ancestor_mirror = source.find_class(ancestor);
    if host_mirror.is_some_and(|mirror| !mirror.type_parameters.is_empty()) {
        report(
            reporter,
            format!("@ProvidedAs bindings aren't supported for a generic type {host}"),
        );
        return;
    }
    if ancestor_mirror.is_some_and(|mirror| !mirror.type_parameters.is_empty()) {
        report(
            reporter,
            format!("@ProvidedAs bindings cannot have a generic type {ancestor} as an argument"),
        );
        return;
    }

    let has_inject_constructor = ancestor_mirror.is_some_and(|mirror| {
        mirror
            .constructors()
            .any(|constructor| constructor.has_annotation(annotations::INJECT))
    });
    if has_inject_constructor {
        report(
            reporter,
            format!("@ProvidedAs binding's argument {ancestor} cannot have an @Inject constructor"),
        );
    }

    if !source.ancestors(host).contains(ancestor) {
        report(
            reporter,
            format!("@ProvidedAs binding's argument {ancestor} isn't a super type of the host class {host}"),
        );
    }
}
