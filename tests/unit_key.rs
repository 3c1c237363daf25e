/// Unit tests for key identity, boxing and display.

use ferrous_inject::{
    box_primitive, boxed_or_element_type, AnnotationMirror, AnnotationValue, CompilerError, Dependency,
    DependencyKind, GenericType, Key, ObjectType, Primitive, Type,
};

fn named(value: &str) -> AnnotationMirror {
    AnnotationMirror::new("javax/inject/Named").with_value("value", AnnotationValue::Str(value.to_string()))
}

#[test]
fn test_key_display_plain_class() {
    let key = Key::of(GenericType::raw("com/example/Service"));
    assert_eq!(key.to_string(), "com.example.Service");
}

#[test]
fn test_key_display_qualified() {
    let key = Key::of(GenericType::raw("java/lang/String")).qualified(named("api"));
    assert_eq!(key.to_string(), "@javax.inject.Named(value=\"api\") java.lang.String");
}

#[test]
fn test_key_display_parameterized() {
    let key = Key::of(GenericType::parameterized(
        "java/util/List",
        vec![GenericType::raw("com/example/Plugin")],
    ));
    assert_eq!(key.to_string(), "java.util.List<com.example.Plugin>");
}

#[test]
fn test_dependency_display_wrappers() {
    let key = Key::of(GenericType::raw("com/example/Service"));
    assert_eq!(Dependency::instance(key.clone()).to_string(), "com.example.Service");
    assert_eq!(
        Dependency::new(key.clone(), DependencyKind::Lazy).to_string(),
        "Lazy<com.example.Service>"
    );
    assert_eq!(
        Dependency::new(key, DependencyKind::Provider).to_string(),
        "Provider<com.example.Service>"
    );
}

#[test]
fn test_key_boxing_keeps_qualifier() {
    let key = Key::of(GenericType::primitive(Primitive::Long)).qualified(named("timeout"));
    let boxed = key.boxed();

    assert_eq!(boxed.raw_object(), Some(&ObjectType::new("java/lang/Long")));
    assert_eq!(boxed.qualifier, Some(named("timeout")));
    assert_ne!(key, boxed);
}

#[test]
fn test_key_boxing_leaves_arrays_alone() {
    let key = Key::of(GenericType::Raw(Type::Array(Box::new(Type::Primitive(Primitive::Int)))));
    assert_eq!(key.boxed(), key);
    assert!(key.raw_object().is_none());
}

#[test]
fn test_qualifier_argument_order_is_irrelevant() {
    let first = AnnotationMirror::new("com/example/Tagged")
        .with_value("a", AnnotationValue::Int(1))
        .with_value("b", AnnotationValue::Bool(true));
    let second = AnnotationMirror::new("com/example/Tagged")
        .with_value("b", AnnotationValue::Bool(true))
        .with_value("a", AnnotationValue::Int(1));
    assert_eq!(first, second);
}

#[test]
fn test_boxed_or_element_type() {
    let matrix = Type::Array(Box::new(Type::Array(Box::new(Type::Primitive(Primitive::Double)))));
    assert_eq!(boxed_or_element_type(&matrix).unwrap(), box_primitive(Primitive::Double));
    assert_eq!(
        boxed_or_element_type(&Type::object("com/example/Service")).unwrap(),
        ObjectType::new("com/example/Service")
    );
    assert!(matches!(
        boxed_or_element_type(&Type::Method("()V".to_string())),
        Err(CompilerError::InvalidType(_))
    ));
}

#[test]
fn test_object_type_names() {
    let ty = ObjectType::new("com/example/inner/Service");
    assert_eq!(ty.class_name(), "com.example.inner.Service");
    assert_eq!(ty.package_name(), "com/example/inner");
    assert_eq!(ObjectType::new("Service").package_name(), "");
}
