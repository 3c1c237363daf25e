//! Type identities and the primitive/boxed equivalence used for every
//! dependency comparison.

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::error::{CompilerError, CompilerResult};

/// Internal name of `java.lang.Object`, the implicit root of every class.
pub const OBJECT_TYPE: &str = "java/lang/Object";

/// A class, interface or annotation type identified by its internal name
/// (`com/example/Foo$Inner`).
///
/// Cloning is cheap: the name is shared.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectType(Arc<str>);

impl ObjectType {
    pub fn new(internal_name: impl AsRef<str>) -> Self {
        Self(Arc::from(internal_name.as_ref()))
    }

    /// Internal (slash separated) name.
    pub fn internal_name(&self) -> &str {
        &self.0
    }

    /// Dotted, human readable name used in diagnostics.
    pub fn class_name(&self) -> String {
        self.0.replace('/', ".")
    }

    /// Internal name of the enclosing package, empty for the default package.
    pub fn package_name(&self) -> &str {
        match self.0.rfind('/') {
            Some(index) => &self.0[..index],
            None => "",
        }
    }

    pub fn descriptor(&self) -> String {
        format!("L{};", self.0)
    }

    pub fn is(&self, internal_name: &str) -> bool {
        &*self.0 == internal_name
    }
}

impl fmt::Debug for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectType({})", self.0)
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.class_name())
    }
}

/// Serialized as its internal name.
impl Serialize for ObjectType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl From<&str> for ObjectType {
    fn from(internal_name: &str) -> Self {
        Self::new(internal_name)
    }
}

/// Primitive types of the target platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Primitive {
    Void,
    Boolean,
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
}

impl Primitive {
    pub const ALL: [Primitive; 9] = [
        Primitive::Void,
        Primitive::Boolean,
        Primitive::Byte,
        Primitive::Char,
        Primitive::Double,
        Primitive::Float,
        Primitive::Int,
        Primitive::Long,
        Primitive::Short,
    ];

    /// Internal name of the boxed counterpart.
    pub fn boxed_name(self) -> &'static str {
        match self {
            Primitive::Void => "java/lang/Void",
            Primitive::Boolean => "java/lang/Boolean",
            Primitive::Byte => "java/lang/Byte",
            Primitive::Char => "java/lang/Character",
            Primitive::Double => "java/lang/Double",
            Primitive::Float => "java/lang/Float",
            Primitive::Int => "java/lang/Integer",
            Primitive::Long => "java/lang/Long",
            Primitive::Short => "java/lang/Short",
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Primitive::Void => "void",
            Primitive::Boolean => "boolean",
            Primitive::Byte => "byte",
            Primitive::Char => "char",
            Primitive::Double => "double",
            Primitive::Float => "float",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Short => "short",
        }
    }

    fn from_boxed_name(internal_name: &str) -> Option<Primitive> {
        Primitive::ALL
            .into_iter()
            .find(|primitive| primitive.boxed_name() == internal_name)
    }
}

/// An erased type as it appears in a member descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Type {
    Primitive(Primitive),
    Object(ObjectType),
    Array(Box<Type>),
    /// A method signature; never a valid dependency type.
    Method(String),
}

impl Type {
    pub fn object(internal_name: &str) -> Self {
        Type::Object(ObjectType::new(internal_name))
    }

    pub fn as_object(&self) -> Option<&ObjectType> {
        match self {
            Type::Object(ty) => Some(ty),
            _ => None,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Primitive(Primitive::Void))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(primitive) => f.write_str(primitive.keyword()),
            Type::Object(ty) => write!(f, "{ty}"),
            Type::Array(element) => write!(f, "{element}[]"),
            Type::Method(descriptor) => f.write_str(descriptor),
        }
    }
}

/// Boxed object type of a primitive.
pub fn box_primitive(primitive: Primitive) -> ObjectType {
    ObjectType::new(primitive.boxed_name())
}

/// Maps a primitive to its boxed type; every other type maps to itself.
pub fn box_type(ty: &Type) -> Type {
    match ty {
        Type::Primitive(primitive) => Type::Object(box_primitive(*primitive)),
        other => other.clone(),
    }
}

/// Inverse of [`box_type`]: boxed primitives map back to the primitive.
pub fn unbox(ty: &Type) -> Type {
    match ty {
        Type::Object(object) => match Primitive::from_boxed_name(object.internal_name()) {
            Some(primitive) => Type::Primitive(primitive),
            None => ty.clone(),
        },
        other => other.clone(),
    }
}

/// Unwraps arrays down to their ultimate element and boxes it.
pub fn boxed_or_element_type(ty: &Type) -> CompilerResult<ObjectType> {
    match ty {
        Type::Primitive(primitive) => Ok(box_primitive(*primitive)),
        Type::Object(object) => Ok(object.clone()),
        Type::Array(element) => boxed_or_element_type(element),
        Type::Method(descriptor) => Err(CompilerError::InvalidType(format!(
            "Cannot extract an object type from {descriptor}"
        ))),
    }
}

/// A type as it appears in a generic signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GenericType {
    Raw(Type),
    Parameterized {
        raw: ObjectType,
        arguments: Vec<GenericType>,
    },
    Array(Box<GenericType>),
    TypeVariable(String),
    /// `? extends T`
    UpperBounded(Box<GenericType>),
    /// `? super T`
    LowerBounded(Box<GenericType>),
}

impl GenericType {
    pub fn raw(internal_name: &str) -> Self {
        GenericType::Raw(Type::object(internal_name))
    }

    pub fn primitive(primitive: Primitive) -> Self {
        GenericType::Raw(Type::Primitive(primitive))
    }

    pub fn parameterized(raw: &str, arguments: Vec<GenericType>) -> Self {
        GenericType::Parameterized {
            raw: ObjectType::new(raw),
            arguments,
        }
    }

    /// Erasure of this type.
    pub fn raw_type(&self) -> Type {
        match self {
            GenericType::Raw(ty) => ty.clone(),
            GenericType::Parameterized { raw, .. } => Type::Object(raw.clone()),
            GenericType::Array(element) => Type::Array(Box::new(element.raw_type())),
            GenericType::TypeVariable(_) => Type::object(OBJECT_TYPE),
            GenericType::UpperBounded(bound) => bound.raw_type(),
            GenericType::LowerBounded(_) => Type::object(OBJECT_TYPE),
        }
    }

    /// The raw object type when this is a plain class reference.
    pub fn as_raw_object(&self) -> Option<&ObjectType> {
        match self {
            GenericType::Raw(Type::Object(ty)) => Some(ty),
            _ => None,
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, GenericType::Raw(_))
    }

    /// True when the type mentions a wildcard or a type variable anywhere,
    /// so it cannot be materialized at contract-creation time.
    pub fn is_open(&self) -> bool {
        match self {
            GenericType::Raw(_) => false,
            GenericType::Parameterized { arguments, .. } => arguments.iter().any(GenericType::is_open),
            GenericType::Array(element) => element.is_open(),
            GenericType::TypeVariable(_)
            | GenericType::UpperBounded(_)
            | GenericType::LowerBounded(_) => true,
        }
    }

    pub fn boxed(&self) -> GenericType {
        match self {
            GenericType::Raw(ty) => GenericType::Raw(box_type(ty)),
            other => other.clone(),
        }
    }

    /// Every object type mentioned by this signature, primitives excluded.
    pub fn object_types(&self) -> Vec<Type> {
        let mut types = Vec::new();
        self.collect_object_types(&mut types);
        types
    }

    fn collect_object_types(&self, types: &mut Vec<Type>) {
        match self {
            GenericType::Raw(Type::Primitive(_)) => {}
            GenericType::Raw(ty) => types.push(ty.clone()),
            GenericType::Parameterized { raw, arguments } => {
                types.push(Type::Object(raw.clone()));
                for argument in arguments {
                    argument.collect_object_types(types);
                }
            }
            GenericType::Array(element) => element.collect_object_types(types),
            GenericType::TypeVariable(_) => {}
            GenericType::UpperBounded(bound) | GenericType::LowerBounded(bound) => {
                bound.collect_object_types(types)
            }
        }
    }
}

impl fmt::Display for GenericType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenericType::Raw(ty) => write!(f, "{ty}"),
            GenericType::Parameterized { raw, arguments } => {
                write!(f, "{raw}<")?;
                for (index, argument) in arguments.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{argument}")?;
                }
                f.write_str(">")
            }
            GenericType::Array(element) => write!(f, "{element}[]"),
            GenericType::TypeVariable(name) => f.write_str(name),
            GenericType::UpperBounded(bound) => write!(f, "? extends {bound}"),
            GenericType::LowerBounded(bound) => write!(f, "? super {bound}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_and_unbox_are_inverse_for_every_primitive() {
        for primitive in Primitive::ALL {
            let boxed = box_type(&Type::Primitive(primitive));
            assert_eq!(unbox(&boxed), Type::Primitive(primitive));
        }
    }

    #[test]
    fn package_name_of_default_package_is_empty() {
        assert_eq!(ObjectType::new("Foo").package_name(), "");
        assert_eq!(ObjectType::new("com/example/Foo").package_name(), "com/example");
    }
}
