use tracing::debug;

use crate::analysis::helper::{member_name, AnalyzerHelper};
use crate::error::CompilerResult;
use crate::key::Dependency;
use crate::metadata::{annotations, Annotated, ClassMirror, MethodMirror};
use crate::model::{InjectionPoint, InjectionTarget};
use crate::reporter::{report, ErrorReporter};
use crate::types::ObjectType;

/// Injection targets found among all known types.
#[derive(Debug, Default)]
pub(crate) struct InjectionTargets {
    /// Types with `@Inject` fields or methods.
    pub(crate) injectable: Vec<InjectionTarget>,
    /// Types with an `@Inject` constructor.
    pub(crate) providable: Vec<InjectionTarget>,
}

pub(crate) fn analyze_injection_targets(
    helper: AnalyzerHelper<'_>,
    types: &[ObjectType],
    reporter: &mut dyn ErrorReporter,
) -> CompilerResult<InjectionTargets> {
    let mut targets = InjectionTargets::default();
    for ty in types {
        let mirror = helper.source().class(ty)?;
        let members = member_injection_points(helper, mirror, reporter);

        let constructors: Vec<&MethodMirror> = mirror
            .constructors()
            .filter(|constructor| constructor.has_annotation(annotations::INJECT))
            .collect();
        match constructors.as_slice() {
            [] => {}
            [constructor] => {
                debug!("Providable target: {}", mirror.ty);
                let mut injection_points = vec![method_injection_point(helper, mirror, constructor, reporter)];
                injection_points.extend(members.iter().cloned());
                targets.providable.push(InjectionTarget {
                    ty: mirror.ty.clone(),
                    injection_points,
                });
            }
            _ => report(
                reporter,
                format!("Class {} has multiple @Inject constructors", mirror.ty),
            ),
        }

        if !members.is_empty() {
            debug!("Injectable target: {}", mirror.ty);
            targets.injectable.push(InjectionTarget {
                ty: mirror.ty.clone(),
                injection_points: members,
            });
        }
    }
    Ok(targets)
}

fn member_injection_points(
    helper: AnalyzerHelper<'_>,
    mirror: &ClassMirror,
    reporter: &mut dyn ErrorReporter,
) -> Vec<InjectionPoint> {
    let fields = mirror
        .fields
        .iter()
        .filter(|field| field.has_annotation(annotations::INJECT))
        .map(|field| {
            let element = member_name(&mirror.ty, &field.name);
            InjectionPoint::Field {
                container: mirror.ty.clone(),
                field: field.clone(),
                injectee: helper.injectee(&field.ty, field, &element, reporter),
            }
        })
        .collect::<Vec<_>>();

    let methods = mirror
        .plain_methods()
        .filter(|method| method.has_annotation(annotations::INJECT))
        .map(|method| method_injection_point(helper, mirror, method, reporter))
        .collect::<Vec<_>>();

    fields.into_iter().chain(methods).collect()
}

pub(crate) fn method_injection_point(
    helper: AnalyzerHelper<'_>,
    mirror: &ClassMirror,
    method: &MethodMirror,
    reporter: &mut dyn ErrorReporter,
) -> InjectionPoint {
    InjectionPoint::Method {
        container: mirror.ty.clone(),
        method: method.clone(),
        injectees: parameter_injectees(helper, &mirror.ty, method, reporter),
    }
}

pub(crate) fn parameter_injectees(
    helper: AnalyzerHelper<'_>,
    owner: &ObjectType,
    method: &MethodMirror,
    reporter: &mut dyn ErrorReporter,
) -> Vec<Dependency> {
    method
        .parameters
        .iter()
        .enumerate()
        .map(|(index, parameter)| {
            let element = format!("{}#{index}", member_name(owner, &method.name));
            helper.injectee(&parameter.ty, parameter, &element, reporter)
        })
        .collect()
}
