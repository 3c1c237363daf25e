//! Class metadata consumed by the analyzer.
//!
//! The front end that reads compiled classes is not part of this crate. It
//! hands the compiler [`ClassMirror`] descriptors through the
//! [`MetadataSource`] trait; [`ClassRegistry`] is the in-memory
//! implementation used by tests and tools.

use std::collections::{HashSet, VecDeque};

use indexmap::IndexMap;

use crate::error::{CompilerError, CompilerResult};
use crate::key::{AnnotationMirror, AnnotationValue};
use crate::types::{GenericType, ObjectType, Primitive, Type, OBJECT_TYPE};

/// Internal names of the annotations and runtime types the compiler knows.
pub mod annotations {
    pub const INJECT: &str = "javax/inject/Inject";
    pub const QUALIFIER: &str = "javax/inject/Qualifier";
    pub const SCOPE: &str = "javax/inject/Scope";
    pub const SINGLETON: &str = "javax/inject/Singleton";
    pub const NAMED: &str = "javax/inject/Named";
    pub const PROVIDER: &str = "javax/inject/Provider";

    pub const COMPONENT: &str = "io/ferrous/inject/Component";
    pub const MODULE: &str = "io/ferrous/inject/Module";
    pub const IMPORT: &str = "io/ferrous/inject/Import";
    pub const IMPORTED_BY: &str = "io/ferrous/inject/ImportedBy";
    pub const PROVIDE: &str = "io/ferrous/inject/Provide";
    pub const PROVIDED_BY: &str = "io/ferrous/inject/ProvidedBy";
    pub const PROVIDED_AS: &str = "io/ferrous/inject/ProvidedAs";
    pub const CONTRACT: &str = "io/ferrous/inject/Contract";
    pub const EAGER: &str = "io/ferrous/inject/Eager";
    pub const FACTORY: &str = "io/ferrous/inject/Factory";
    pub const FACTORY_INJECT: &str = "io/ferrous/inject/Factory$Inject";
    pub const FACTORY_PARAMETER: &str = "io/ferrous/inject/Factory$Parameter";
    pub const FACTORY_RETURN: &str = "io/ferrous/inject/Factory$Return";

    /// Base class every contract configuration extends.
    pub const CONTRACT_CONFIGURATION: &str = "io/ferrous/inject/ContractConfiguration";
    pub const INJECTOR: &str = "io/ferrous/inject/Injector";
    pub const LAZY: &str = "io/ferrous/inject/Lazy";
}

/// Name of the implicit annotation argument, as in `@Named("x")`.
pub const VALUE: &str = "value";

/// Anything that carries annotations.
pub trait Annotated {
    fn annotations(&self) -> &[AnnotationMirror];

    fn annotation(&self, ty: &str) -> Option<&AnnotationMirror> {
        self.annotations().iter().find(|annotation| annotation.ty.is(ty))
    }

    fn has_annotation(&self, ty: &str) -> bool {
        self.annotation(ty).is_some()
    }

    /// Class-literal list argument of an annotation such as `@ProvidedBy`.
    ///
    /// Returns `None` when the annotation is absent.
    fn annotation_types(&self, ty: &str) -> Option<Vec<AnnotationValue>> {
        let annotation = self.annotation(ty)?;
        Some(match annotation.value(VALUE) {
            Some(AnnotationValue::Array(values)) => values.clone(),
            Some(value) => vec![value.clone()],
            None => Vec::new(),
        })
    }
}

/// A method or constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterMirror {
    pub ty: GenericType,
    pub annotations: Vec<AnnotationMirror>,
}

impl ParameterMirror {
    pub fn new(ty: GenericType) -> Self {
        Self {
            ty,
            annotations: Vec::new(),
        }
    }

    pub fn annotated(mut self, annotation: AnnotationMirror) -> Self {
        self.annotations.push(annotation);
        self
    }
}

impl Annotated for ParameterMirror {
    fn annotations(&self) -> &[AnnotationMirror] {
        &self.annotations
    }
}

/// Constructor name as it appears in class files.
pub const CONSTRUCTOR_NAME: &str = "<init>";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodMirror {
    pub name: String,
    pub is_static: bool,
    pub type_parameters: Vec<String>,
    pub parameters: Vec<ParameterMirror>,
    pub return_type: GenericType,
    pub annotations: Vec<AnnotationMirror>,
}

impl MethodMirror {
    pub fn new(name: impl Into<String>, return_type: GenericType) -> Self {
        Self {
            name: name.into(),
            is_static: false,
            type_parameters: Vec::new(),
            parameters: Vec::new(),
            return_type,
            annotations: Vec::new(),
        }
    }

    pub fn constructor() -> Self {
        Self::new(CONSTRUCTOR_NAME, GenericType::primitive(Primitive::Void))
    }

    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR_NAME
    }

    pub fn parameter(mut self, parameter: ParameterMirror) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn annotated(mut self, annotation: AnnotationMirror) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn type_parameter(mut self, name: impl Into<String>) -> Self {
        self.type_parameters.push(name.into());
        self
    }

    pub fn static_method(mut self) -> Self {
        self.is_static = true;
        self
    }
}

impl Annotated for MethodMirror {
    fn annotations(&self) -> &[AnnotationMirror] {
        &self.annotations
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldMirror {
    pub name: String,
    pub ty: GenericType,
    pub is_static: bool,
    pub annotations: Vec<AnnotationMirror>,
}

impl FieldMirror {
    pub fn new(name: impl Into<String>, ty: GenericType) -> Self {
        Self {
            name: name.into(),
            ty,
            is_static: false,
            annotations: Vec::new(),
        }
    }

    pub fn annotated(mut self, annotation: AnnotationMirror) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn static_field(mut self) -> Self {
        self.is_static = true;
        self
    }
}

impl Annotated for FieldMirror {
    fn annotations(&self) -> &[AnnotationMirror] {
        &self.annotations
    }
}

/// Structural descriptor of a class, interface or annotation type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMirror {
    pub ty: ObjectType,
    pub is_interface: bool,
    pub is_abstract: bool,
    pub is_public: bool,
    pub super_type: Option<ObjectType>,
    /// Generic signature of the super class, when it has one.
    pub generic_super_type: Option<GenericType>,
    pub interfaces: Vec<ObjectType>,
    pub type_parameters: Vec<String>,
    pub annotations: Vec<AnnotationMirror>,
    pub methods: Vec<MethodMirror>,
    pub fields: Vec<FieldMirror>,
}

impl ClassMirror {
    /// A public concrete class extending `java.lang.Object`.
    pub fn class(ty: impl Into<ObjectType>) -> Self {
        Self {
            ty: ty.into(),
            is_interface: false,
            is_abstract: false,
            is_public: true,
            super_type: Some(ObjectType::new(OBJECT_TYPE)),
            generic_super_type: None,
            interfaces: Vec::new(),
            type_parameters: Vec::new(),
            annotations: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn interface(ty: impl Into<ObjectType>) -> Self {
        Self {
            is_interface: true,
            is_abstract: true,
            ..Self::class(ty)
        }
    }

    pub fn annotated(mut self, annotation: AnnotationMirror) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn method(mut self, method: MethodMirror) -> Self {
        self.methods.push(method);
        self
    }

    pub fn field(mut self, field: FieldMirror) -> Self {
        self.fields.push(field);
        self
    }

    pub fn extends(mut self, super_type: impl Into<ObjectType>) -> Self {
        self.super_type = Some(super_type.into());
        self.generic_super_type = None;
        self
    }

    /// Extends a parameterized super class, e.g. `ContractConfiguration<C>`.
    pub fn extends_generic(mut self, super_type: GenericType) -> Self {
        self.super_type = match super_type.raw_type() {
            Type::Object(ty) => Some(ty),
            _ => None,
        };
        self.generic_super_type = Some(super_type);
        self
    }

    pub fn implements(mut self, interface: impl Into<ObjectType>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn abstract_class(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn non_public(mut self) -> Self {
        self.is_public = false;
        self
    }

    pub fn type_parameter(mut self, name: impl Into<String>) -> Self {
        self.type_parameters.push(name.into());
        self
    }

    pub fn constructors(&self) -> impl Iterator<Item = &MethodMirror> {
        self.methods.iter().filter(|method| method.is_constructor())
    }

    /// A class declaring no constructor has the implicit no-argument one.
    pub fn has_default_constructor(&self) -> bool {
        self.constructors().next().is_none()
            || self.constructors().any(|constructor| constructor.parameters.is_empty())
    }

    /// Non-constructor methods.
    pub fn plain_methods(&self) -> impl Iterator<Item = &MethodMirror> {
        self.methods.iter().filter(|method| !method.is_constructor())
    }
}

impl Annotated for ClassMirror {
    fn annotations(&self) -> &[AnnotationMirror] {
        &self.annotations
    }
}

/// Front-end collaborator: structural descriptors of every known type.
pub trait MetadataSource {
    fn find_class(&self, ty: &ObjectType) -> Option<&ClassMirror>;

    /// Every known type, current input first, in a stable order.
    fn types(&self) -> Vec<ObjectType>;

    /// Whether the type is compiled in this invocation, as opposed to a
    /// previously compiled library on the class path.
    fn belongs_to_current_input(&self, ty: &ObjectType) -> bool;

    fn class(&self, ty: &ObjectType) -> CompilerResult<&ClassMirror> {
        self.find_class(ty)
            .ok_or_else(|| CompilerError::ClassNotFound(ty.clone()))
    }

    /// Super classes and interfaces of `ty`, transitively, without `ty`
    /// itself. Types missing from the source end the walk along their
    /// branch.
    fn ancestors(&self, ty: &ObjectType) -> Vec<ObjectType> {
        let mut visited = HashSet::new();
        let mut ancestors = Vec::new();
        let mut queue = VecDeque::from([ty.clone()]);
        while let Some(current) = queue.pop_front() {
            let Some(mirror) = self.find_class(&current) else {
                continue;
            };
            for parent in mirror.super_type.iter().chain(mirror.interfaces.iter()) {
                if visited.insert(parent.clone()) {
                    ancestors.push(parent.clone());
                    queue.push_back(parent.clone());
                }
            }
        }
        ancestors
    }
}

/// Read-only view of artifacts that already exist outside this invocation.
///
/// Generated identities must never collide with anything in here.
pub trait CompiledTypes {
    fn contains(&self, ty: &ObjectType) -> bool;
}

impl CompiledTypes for HashSet<ObjectType> {
    fn contains(&self, ty: &ObjectType) -> bool {
        HashSet::contains(self, ty)
    }
}

/// In-memory [`MetadataSource`].
///
/// Types added with [`input`](ClassRegistry::input) belong to the current
/// input; those added with [`compiled`](ClassRegistry::compiled) stand for
/// previously compiled libraries.
#[derive(Debug, Default, Clone)]
pub struct ClassRegistry {
    classes: IndexMap<ObjectType, ClassMirror>,
    inputs: HashSet<ObjectType>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(mut self, mirror: ClassMirror) -> Self {
        self.add_input(mirror);
        self
    }

    pub fn compiled(mut self, mirror: ClassMirror) -> Self {
        self.add_compiled(mirror);
        self
    }

    pub fn add_input(&mut self, mirror: ClassMirror) {
        self.inputs.insert(mirror.ty.clone());
        self.classes.insert(mirror.ty.clone(), mirror);
    }

    pub fn add_compiled(&mut self, mirror: ClassMirror) {
        self.inputs.remove(&mirror.ty);
        self.classes.insert(mirror.ty.clone(), mirror);
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl MetadataSource for ClassRegistry {
    fn find_class(&self, ty: &ObjectType) -> Option<&ClassMirror> {
        self.classes.get(ty)
    }

    fn types(&self) -> Vec<ObjectType> {
        let (mut inputs, compiled): (Vec<_>, Vec<_>) = self
            .classes
            .keys()
            .cloned()
            .partition(|ty| self.inputs.contains(ty));
        inputs.extend(compiled);
        inputs
    }

    fn belongs_to_current_input(&self, ty: &ObjectType) -> bool {
        self.inputs.contains(ty)
    }
}

impl CompiledTypes for ClassRegistry {
    fn contains(&self, ty: &ObjectType) -> bool {
        self.classes.contains_key(ty)
    }
}
