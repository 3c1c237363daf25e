use std::collections::HashSet;

use tracing::debug;

use crate::analysis::helper::{member_name, AnalyzerHelper};
use crate::analysis::targets::parameter_injectees;
use crate::arena::{Arena, Id};
use crate::error::CompilerResult;
use crate::key::{AnnotationValue, Key};
use crate::metadata::{annotations, Annotated, ClassMirror, MetadataSource, MethodMirror, VALUE};
use crate::model::{Factory, FactoryInjectee, FactoryProvisionPoint};
use crate::reporter::{report, ErrorReporter};
use crate::types::{ObjectType, Type};

/// Parses `@Factory` interfaces, each exactly once.
pub(crate) struct FactoryParser<'a> {
    helper: AnalyzerHelper<'a>,
    factories: Arena<Factory>,
}

impl<'a> FactoryParser<'a> {
    pub(crate) fn new(helper: AnalyzerHelper<'a>) -> Self {
        Self {
            helper,
            factories: Arena::new(),
        }
    }

    pub(crate) fn parse_factory(
        &mut self,
        ty: &ObjectType,
        reporter: &mut dyn ErrorReporter,
    ) -> CompilerResult<Id<Factory>> {
        if let Some(id) = self.factories.find(ty) {
            return Ok(id);
        }

        let mirror = self.helper.source().class(ty)?;
        debug!("Factory: {ty}");
        let qualifier = self.helper.find_qualifier(mirror, &ty.to_string(), reporter);
        let mut provision_points = Vec::new();
        for (container, method) in factory_methods(self.helper.source(), mirror) {
            if let Some(provision_point) = self.provision_point(mirror, &container, method, reporter)? {
                provision_points.push(provision_point);
            }
        }

        let factory = Factory {
            ty: ty.clone(),
            implementation_type: ObjectType::new(format!("{}$Ferrous$Factory", ty.internal_name())),
            key: Key {
                qualifier,
                ..Key::of_class(ty)
            },
            provision_points,
        };
        Ok(self.factories.insert(ty.clone(), factory))
    }

    pub(crate) fn into_arena(self) -> Arena<Factory> {
        self.factories
    }

    fn provision_point(
        &self,
        factory: &ClassMirror,
        container: &ObjectType,
        method: &MethodMirror,
        reporter: &mut dyn ErrorReporter,
    ) -> CompilerResult<Option<FactoryProvisionPoint>> {
        let method_name = member_name(&factory.ty, &method.name);
        // Problems in methods inherited from another interface are
        // attributed to the inheriting factory.
        let context = if container != &factory.ty {
            format!("Method {method_name} inherited from {container} is misconfigured: ")
        } else if let Some(ancestor) = overridden_return_declaration(self.helper.source(), factory, method) {
            format!(
                "Method {method_name} is misconfigured, @Factory.Return of {ancestor}.{} is not inherited: ",
                method.name
            )
        } else {
            String::new()
        };

        if !method.type_parameters.is_empty() {
            report(reporter, format!("{context}Method {method_name} mustn't contain generic parameters"));
            return Ok(None);
        }

        let Some(implementation) = return_type(factory, method, &context, reporter) else {
            return Ok(None);
        };
        let declared_return = match method.return_type.raw_type() {
            Type::Object(ty) => ty,
            _ => implementation.clone(),
        };

        let target = self.helper.source().class(&implementation)?;
        let constructors: Vec<&MethodMirror> = target
            .constructors()
            .filter(|constructor| constructor.has_annotation(annotations::FACTORY_INJECT))
            .collect();
        let constructor = match constructors.as_slice() {
            [constructor] => *constructor,
            [] => {
                report(
                    reporter,
                    format!("{context}Class {implementation} must have a constructor annotated with @Factory.Inject"),
                );
                return Ok(None);
            }
            _ => {
                report(
                    reporter,
                    format!(
                        "{context}Class {implementation} must have a single constructor annotated with @Factory.Inject"
                    ),
                );
                return Ok(None);
            }
        };

        let arguments = parameter_injectees(self.helper, &factory.ty, method, reporter);
        let mut seen = HashSet::new();
        for argument in &arguments {
            if !seen.insert(argument.boxed()) {
                report(reporter, format!("Method {method_name} accepts {argument} multiple times"));
            }
        }

        let parameters = parameter_injectees(self.helper, &implementation, constructor, reporter);
        let mut injectees = Vec::with_capacity(parameters.len());
        for (parameter, dependency) in constructor.parameters.iter().zip(parameters) {
            if !parameter.has_annotation(annotations::FACTORY_PARAMETER) {
                injectees.push(FactoryInjectee::FromInjector(dependency));
                continue;
            }
            let boxed = dependency.boxed();
            match arguments.iter().position(|argument| argument.boxed() == boxed) {
                Some(argument_index) => injectees.push(FactoryInjectee::FromMethod {
                    dependency,
                    argument_index,
                }),
                None => report(
                    reporter,
                    format!(
                        "Class {implementation} contains a @Factory.Parameter not provided by factory {}: {dependency}",
                        factory.ty
                    ),
                ),
            }
        }

        debug!("  Method: {method_name} -> {implementation}");
        Ok(Some(FactoryProvisionPoint {
            container: container.clone(),
            method: method.name.clone(),
            return_type: declared_return,
            implementation,
            injectees,
        }))
    }
}

/// Own methods followed by inherited ones not overridden by name.
pub(crate) fn factory_methods<'m>(
    source: &'m dyn MetadataSource,
    mirror: &'m ClassMirror,
) -> Vec<(ObjectType, &'m MethodMirror)> {
    let mut names = HashSet::new();
    let mut methods = Vec::new();
    let own = std::iter::once(mirror);
    let inherited = source
        .ancestors(&mirror.ty)
        .into_iter()
        .filter_map(|ancestor| source.find_class(&ancestor))
        .filter(|ancestor| ancestor.is_interface);
    for declaring in own.chain(inherited) {
        for method in declaring.plain_methods().filter(|method| !method.is_static) {
            if names.insert(method.name.clone()) {
                methods.push((declaring.ty.clone(), method));
            }
        }
    }
    methods
}

/// Ancestor interface whose same-named method carries `@Factory.Return`
/// when `method` overrides it without repeating the annotation.
fn overridden_return_declaration(
    source: &dyn MetadataSource,
    factory: &ClassMirror,
    method: &MethodMirror,
) -> Option<ObjectType> {
    if method.has_annotation(annotations::FACTORY_RETURN) {
        return None;
    }
    source
        .ancestors(&factory.ty)
        .into_iter()
        .filter_map(|ancestor| source.find_class(&ancestor))
        .find(|ancestor| {
            ancestor.plain_methods().any(|candidate| {
                candidate.name == method.name && candidate.has_annotation(annotations::FACTORY_RETURN)
            })
        })
        .map(|ancestor| ancestor.ty.clone())
}

fn return_type(
    factory: &ClassMirror,
    method: &MethodMirror,
    context: &str,
    reporter: &mut dyn ErrorReporter,
) -> Option<ObjectType> {
    let method_name = member_name(&factory.ty, &method.name);
    if let Some(annotation) = method.annotation(annotations::FACTORY_RETURN) {
        return match annotation.value(VALUE) {
            Some(AnnotationValue::Type(Type::Object(ty))) => Some(ty.clone()),
            Some(AnnotationValue::Type(other)) => {
                report(
                    reporter,
                    format!(
                        "{context}Method {method_name} is annotated with @Factory.Return with {other} value, but its value must be a class"
                    ),
                );
                None
            }
            other => {
                let value = other.map(ToString::to_string).unwrap_or_default();
                report(
                    reporter,
                    format!(
                        "{context}Method {method_name} is annotated with @Factory.Return that has a wrong parameter {value}"
                    ),
                );
                None
            }
        };
    }

    match method.return_type.raw_type() {
        Type::Object(ty) => Some(ty),
        other => {
            report(
                reporter,
                format!("{context}Method {method_name} returns {other}, but must return a class"),
            );
            None
        }
    }
}
