use crate::key::{AnnotationMirror, Dependency, DependencyKind, Key};
use crate::metadata::{annotations, Annotated, ClassMirror, MetadataSource};
use crate::model::Scope;
use crate::reporter::{report, ErrorReporter};
use crate::types::{GenericType, ObjectType, Type};

/// Annotation and signature interpretation shared by every analyzer.
#[derive(Clone, Copy)]
pub(crate) struct AnalyzerHelper<'a> {
    source: &'a dyn MetadataSource,
}

impl<'a> AnalyzerHelper<'a> {
    pub(crate) fn new(source: &'a dyn MetadataSource) -> Self {
        Self { source }
    }

    pub(crate) fn source(&self) -> &'a dyn MetadataSource {
        self.source
    }

    // Annotation classes missing from the source are ignored, as the
    // platform does at run time.
    fn is_qualifier(&self, ty: &ObjectType) -> bool {
        ty.is(annotations::NAMED)
            || self
                .source
                .find_class(ty)
                .is_some_and(|mirror| mirror.has_annotation(annotations::QUALIFIER))
    }

    fn is_scope(&self, ty: &ObjectType) -> bool {
        ty.is(annotations::SINGLETON)
            || self
                .source
                .find_class(ty)
                .is_some_and(|mirror| mirror.has_annotation(annotations::SCOPE))
    }

    pub(crate) fn find_qualifier(
        &self,
        annotated: &dyn Annotated,
        element: &str,
        reporter: &mut dyn ErrorReporter,
    ) -> Option<AnnotationMirror> {
        let mut qualifiers = annotated
            .annotations()
            .iter()
            .filter(|annotation| self.is_qualifier(&annotation.ty));
        let first = qualifiers.next()?;
        if qualifiers.next().is_some() {
            report(reporter, format!("Element {element} has multiple qualifiers"));
        }
        Some(first.clone())
    }

    pub(crate) fn find_scope(
        &self,
        annotated: &dyn Annotated,
        element: &str,
        reporter: &mut dyn ErrorReporter,
    ) -> Scope {
        let scopes: Vec<&ObjectType> = annotated
            .annotations()
            .iter()
            .map(|annotation| &annotation.ty)
            .filter(|ty| self.is_scope(ty))
            .collect();

        let eager = annotated.has_annotation(annotations::EAGER);
        if eager && scopes.is_empty() {
            report(
                reporter,
                format!("Element {element} is annotated with @Eager but doesn't have a scope"),
            );
        }

        match scopes.as_slice() {
            [] => Scope::None,
            [annotation] => Scope::Class {
                annotation: (*annotation).clone(),
                eager,
            },
            _ => {
                let names: Vec<String> = scopes.iter().map(|ty| ty.to_string()).collect();
                report(
                    reporter,
                    format!("Element {element} has multiple scopes: {}", names.join(", ")),
                );
                Scope::None
            }
        }
    }

    /// Dependency of a declared injection type; `Lazy<T>` and
    /// `Provider<T>` wrappers are peeled off into the dependency kind.
    pub(crate) fn dependency(
        &self,
        ty: &GenericType,
        qualifier: Option<AnnotationMirror>,
        element: &str,
        reporter: &mut dyn ErrorReporter,
    ) -> Dependency {
        let kind = match ty.raw_type().as_object() {
            Some(raw) if raw.is(annotations::LAZY) => Some(DependencyKind::Lazy),
            Some(raw) if raw.is(annotations::PROVIDER) => Some(DependencyKind::Provider),
            _ => None,
        };

        match (kind, ty) {
            (None, _) => Dependency::new(Key::new(ty.clone(), qualifier), DependencyKind::Instance),
            (Some(kind), GenericType::Parameterized { arguments, .. }) if arguments.len() == 1 => {
                Dependency::new(Key::new(arguments[0].clone(), qualifier), kind)
            }
            (Some(_), _) => {
                report(reporter, format!("Type {ty} of {element} must be parameterized"));
                Dependency::new(Key::new(ty.clone(), qualifier), DependencyKind::Instance)
            }
        }
    }

    /// Dependency of an annotated element such as a parameter or field.
    pub(crate) fn injectee(
        &self,
        ty: &GenericType,
        annotated: &dyn Annotated,
        element: &str,
        reporter: &mut dyn ErrorReporter,
    ) -> Dependency {
        let qualifier = self.find_qualifier(annotated, element, reporter);
        self.dependency(ty, qualifier, element, reporter)
    }

    /// Modules, components and contract configurations can all host
    /// provision points and imports.
    pub(crate) fn is_container(&self, mirror: &ClassMirror) -> bool {
        mirror.has_annotation(annotations::MODULE)
            || mirror.has_annotation(annotations::COMPONENT)
            || is_contract_configuration(mirror)
    }

    /// Contract bound by a `ContractConfiguration<C>` subclass.
    pub(crate) fn configuration_contract_type(
        &self,
        mirror: &ClassMirror,
        reporter: &mut dyn ErrorReporter,
    ) -> Option<ObjectType> {
        if !is_contract_configuration(mirror) {
            return None;
        }

        let arguments = match &mirror.generic_super_type {
            Some(GenericType::Parameterized { raw, arguments })
                if raw.is(annotations::CONTRACT_CONFIGURATION) && arguments.len() == 1 =>
            {
                arguments
            }
            other => {
                let super_type = other
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| annotations::CONTRACT_CONFIGURATION.replace('/', "."));
                report(
                    reporter,
                    format!("Invalid base class of {}: {super_type}", mirror.ty),
                );
                return None;
            }
        };

        match &arguments[0] {
            GenericType::Raw(Type::Object(contract)) => Some(contract.clone()),
            GenericType::Raw(other) => {
                report(
                    reporter,
                    format!("ContractConfiguration {} contains a non-class type: {other}", mirror.ty),
                );
                None
            }
            other => {
                report(
                    reporter,
                    format!("ContractConfiguration {} contains a generic type: {other}", mirror.ty),
                );
                None
            }
        }
    }
}

pub(crate) fn is_contract_configuration(mirror: &ClassMirror) -> bool {
    mirror
        .super_type
        .as_ref()
        .is_some_and(|super_type| super_type.is(annotations::CONTRACT_CONFIGURATION))
}

/// `com.example.Foo.bar` style element name for diagnostics.
pub(crate) fn member_name(owner: &ObjectType, member: &str) -> String {
    format!("{owner}.{member}")
}
