mod common;

use common::*;
use ferrous_inject::metadata::annotations;
use ferrous_inject::{
    AnnotationMirror, AnnotationValue, ClassMirror, ClassRegistry, FieldMirror, GenericType, Import,
    MethodMirror, ParameterMirror, Primitive, Scope, Type,
};

// ===== Contracts =====

#[test]
fn test_contract_must_be_an_interface() {
    let source = ClassRegistry::new()
        .input(contract_configuration("app/AppConfiguration", "app/AppContract"))
        .input(ClassMirror::class("app/AppContract").annotated(annotation(annotations::CONTRACT)));

    let (_, errors) = analyze(&source);
    assert_eq!(errors, vec!["Contract must be an interface: app.AppContract".to_string()]);
}

#[test]
fn test_contract_method_with_parameters_is_rejected() {
    let getter = MethodMirror::new("service", GenericType::raw("app/Service"))
        .parameter(ParameterMirror::new(GenericType::raw("java/lang/String")));
    let source = ClassRegistry::new()
        .input(contract_configuration("app/AppConfiguration", "app/AppContract"))
        .input(ClassMirror::interface("app/AppContract").method(getter));

    let (_, errors) = analyze(&source);
    assert_eq!(
        errors,
        vec!["Contract's method cannot have parameters: app.AppContract.service".to_string()]
    );
}

#[test]
fn test_contract_shape_errors_are_distinct() {
    let getter = MethodMirror::new("service", GenericType::raw("app/Service"))
        .parameter(ParameterMirror::new(GenericType::raw("java/lang/String")));
    let source = ClassRegistry::new()
        .input(contract_configuration("app/FirstConfiguration", "app/ClassContract"))
        .input(contract_configuration("app/SecondConfiguration", "app/ParameterContract"))
        .input(ClassMirror::class("app/ClassContract"))
        .input(ClassMirror::interface("app/ParameterContract").method(getter));

    let (_, errors) = analyze(&source);
    assert_eq!(errors.len(), 2);
    assert_eq!(errors_containing(&errors, "app.ClassContract").len(), 1);
    assert_eq!(errors_containing(&errors, "app.ParameterContract.service").len(), 1);
}

#[test]
fn test_inherited_contract_methods_are_merged() {
    let source = ClassRegistry::new()
        .input(contract_configuration("app/AppConfiguration", "app/AppContract"))
        .input(ClassMirror::interface("app/BaseContract").method(MethodMirror::new("service", GenericType::raw("app/Service"))))
        .input(
            ClassMirror::interface("app/AppContract")
                .implements("app/BaseContract")
                .method(MethodMirror::new("service", GenericType::raw("app/Service")))
                .method(MethodMirror::new("other", GenericType::raw("app/Other"))),
        );

    let (context, errors) = analyze(&source);
    assert!(errors.is_empty(), "{errors:?}");
    let contract = context.contracts.get_by_type(&ty("app/AppContract")).unwrap();
    let names: Vec<&str> = contract.provision_points.iter().map(|point| point.method.as_str()).collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"service"));
    assert!(names.contains(&"other"));
    assert_eq!(
        contract.implementation_type,
        ty("app/AppContract$Ferrous$Contract$main")
    );
}

#[test]
fn test_contract_method_returning_open_generic_type_is_rejected() {
    let getter = MethodMirror::new(
        "items",
        GenericType::parameterized("java/util/List", vec![GenericType::TypeVariable("T".to_string())]),
    );
    let source = ClassRegistry::new()
        .input(contract_configuration("app/AppConfiguration", "app/AppContract"))
        .input(ClassMirror::interface("app/AppContract").annotated(annotation(annotations::CONTRACT)).method(getter));

    let (_, errors) = analyze(&source);
    assert_eq!(
        errors,
        vec!["Contract's method app.AppContract.items returns an open generic type java.util.List<T>".to_string()]
    );
}

// ===== Provision points =====

#[test]
fn test_eager_provide_method_without_scope_is_rejected() {
    let source = ClassRegistry::new()
        .input(component("app/AppComponent"))
        .input(
            module("app/AppModule", &["app/AppComponent"])
                .method(provide_method("service", "app/Service").annotated(annotation(annotations::EAGER))),
        );

    let (_, errors) = analyze(&source);
    assert_eq!(
        errors,
        vec!["Element app.AppModule.service is annotated with @Eager but doesn't have a scope".to_string()]
    );
}

#[test]
fn test_eager_with_scope_is_accepted() {
    let source = ClassRegistry::new()
        .input(component("app/AppComponent"))
        .input(
            module("app/AppModule", &["app/AppComponent"]).method(
                provide_method("service", "app/Service")
                    .annotated(annotation(annotations::EAGER))
                    .annotated(annotation(annotations::SINGLETON)),
            ),
        );

    let (context, errors) = analyze(&source);
    assert!(errors.is_empty(), "{errors:?}");
    let module = context.find_module(&ty("app/AppModule")).unwrap();
    assert_eq!(
        module.provision_points[0].scope(),
        &Scope::Class {
            annotation: ty(annotations::SINGLETON),
            eager: true
        }
    );
}

#[test]
fn test_multiple_qualifiers_are_rejected() {
    let method = provide_method("name", "java/lang/String")
        .annotated(named("a"))
        .annotated(named("b"));
    let source = ClassRegistry::new()
        .input(component("app/AppComponent"))
        .input(module("app/AppModule", &["app/AppComponent"]).method(method));

    let (_, errors) = analyze(&source);
    assert_eq!(
        errors,
        vec!["Element app.AppModule.name has multiple qualifiers".to_string()]
    );
}

#[test]
fn test_void_provider_method_is_rejected() {
    let method = MethodMirror::new("nothing", GenericType::primitive(ferrous_inject::Primitive::Void))
        .annotated(annotation(annotations::PROVIDE));
    let source = ClassRegistry::new()
        .input(component("app/AppComponent"))
        .input(module("app/AppModule", &["app/AppComponent"]).method(method));

    let (context, errors) = analyze(&source);
    assert_eq!(errors, vec!["Provider returns void: app.AppModule.nothing".to_string()]);
    assert!(context.find_module(&ty("app/AppModule")).unwrap().provision_points.is_empty());
}

// ===== Modules and imports =====

#[test]
fn test_module_with_type_parameters_is_rejected() {
    let source = ClassRegistry::new()
        .input(component("app/AppComponent"))
        .input(module("app/AppModule", &["app/AppComponent"]).type_parameter("T"));

    let (_, errors) = analyze(&source);
    assert_eq!(errors, vec!["Module cannot have a type parameters: app.AppModule".to_string()]);
}

#[test]
fn test_empty_imported_by_is_rejected() {
    let source = ClassRegistry::new()
        .input(component("app/AppComponent"))
        .input(
            ClassMirror::class("app/Orphan")
                .annotated(annotation(annotations::MODULE))
                .annotated(class_list(annotations::IMPORTED_BY, &[])),
        );

    let (_, errors) = analyze(&source);
    assert_eq!(
        errors,
        vec!["Module app.Orphan should be imported by at least one container".to_string()]
    );
}

#[test]
fn test_importer_must_be_a_container() {
    let source = ClassRegistry::new()
        .input(ClassMirror::class("app/Plain"))
        .input(module("app/AppModule", &["app/Plain"]));

    let (_, errors) = analyze(&source);
    assert_eq!(
        errors,
        vec!["Module app.AppModule is imported by app.Plain, which isn't a container".to_string()]
    );
}

#[test]
fn test_empty_provided_by_is_rejected() {
    let source = ClassRegistry::new()
        .input(component("app/AppComponent"))
        .input(providable("app/Service", &[], &[]));

    let (_, errors) = analyze(&source);
    assert_eq!(
        errors,
        vec!["@ProvidedBy should contain at least one container: app.Service".to_string()]
    );
}

#[test]
fn test_lazy_module_import_is_rejected() {
    let field = FieldMirror::new(
        "module",
        GenericType::parameterized(annotations::LAZY, vec![GenericType::raw("app/AppModule")]),
    )
    .annotated(annotation(annotations::IMPORT));
    let source = ClassRegistry::new()
        .input(component("app/AppComponent").field(field))
        .input(module("app/AppModule", &[]));

    let (_, errors) = analyze(&source);
    assert_eq!(
        errors,
        vec!["Imported module with type: app.AppModule cannot be wrapped in: io.ferrous.inject.Lazy".to_string()]
    );
}

#[test]
fn test_import_of_non_module_is_rejected() {
    let method = MethodMirror::new("helper", GenericType::raw("app/Helper")).annotated(annotation(annotations::IMPORT));
    let source = ClassRegistry::new()
        .input(component("app/AppComponent").method(method))
        .input(ClassMirror::class("app/Helper"));

    let (_, errors) = analyze(&source);
    assert_eq!(
        errors,
        vec!["Imported module app.Helper isn't annotated with @Module".to_string()]
    );
}

#[test]
fn test_lazy_contract_import_is_accepted() {
    let field = FieldMirror::new(
        "contract",
        GenericType::parameterized(annotations::LAZY, vec![GenericType::raw("lib/LibContract")]),
    )
    .annotated(annotation(annotations::IMPORT))
    .annotated(annotation(annotations::CONTRACT));
    let source = ClassRegistry::new()
        .input(component("app/AppComponent").field(field))
        .compiled(contract("lib/LibContract", &[("service", "lib/Service")]));

    let (context, errors) = analyze(&source);
    assert!(errors.is_empty(), "{errors:?}");
    let component = context.find_module(&ty("app/AppComponent")).unwrap();
    assert!(matches!(component.imports.as_slice(), [Import::Contract { lazy: true, .. }]));
}

#[test]
fn test_import_cycle_terminates_without_errors() {
    let source = ClassRegistry::new()
        .input(component("app/AppComponent"))
        .input(module("app/First", &["app/AppComponent", "app/Second"]))
        .input(module("app/Second", &["app/First"]));

    let (context, errors) = analyze(&source);
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(context.modules.len(), 3);
    let root = context.components[0].module;
    assert_eq!(context.modules_with_descendants(root).len(), 3);
}

#[test]
fn test_module_reached_twice_is_stored_once() {
    let source = ClassRegistry::new()
        .input(component("app/AppComponent"))
        .input(module("app/Shared", &["app/AppComponent", "app/Feature"]))
        .input(module("app/Feature", &["app/AppComponent"]))
        .input(providable("app/Service", &["app/Shared"], &[]));

    let (context, errors) = analyze(&source);
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(context.modules.len(), 3);
    let shared = context.find_module(&ty("app/Shared")).unwrap();
    assert_eq!(shared.provision_points.len(), 1);
}

#[test]
fn test_void_import_method_is_rejected() {
    let method = MethodMirror::new("nothing", GenericType::primitive(Primitive::Void))
        .annotated(annotation(annotations::IMPORT));
    let source = ClassRegistry::new().input(component("app/AppComponent").method(method));

    let (context, errors) = analyze(&source);
    assert_eq!(errors, vec!["Import must be a class: void from app.AppComponent.nothing".to_string()]);
    assert!(context.find_module(&ty("app/AppComponent")).unwrap().imports.is_empty());
}

// ===== Bindings and factories =====

#[test]
fn test_binding_is_attached_to_the_module_providing_its_implementation() {
    let source = ClassRegistry::new()
        .input(component("app/AppComponent"))
        .input(module("app/AppModule", &["app/AppComponent"]))
        .input(ClassMirror::interface("app/Api"))
        .input(
            providable("app/ApiImpl", &["app/AppModule"], &[])
                .implements("app/Api")
                .annotated(class_list(annotations::PROVIDED_AS, &["app/Api"])),
        );

    let (context, errors) = analyze(&source);
    assert!(errors.is_empty(), "{errors:?}");
    let module = context.find_module(&ty("app/AppModule")).unwrap();
    assert_eq!(module.bindings.len(), 1);
    assert_eq!(module.bindings[0].ancestor.raw_object(), Some(&ty("app/Api")));
}

#[test]
fn test_factory_parameters_are_matched_to_method_arguments() {
    let factory = ClassMirror::interface("app/WidgetFactory")
        .annotated(annotation(annotations::FACTORY))
        .annotated(class_list(annotations::PROVIDED_BY, &["app/AppModule"]))
        .method(
            MethodMirror::new("create", GenericType::raw("app/Widget"))
                .parameter(ParameterMirror::new(GenericType::raw("java/lang/String"))),
        );
    let widget = ClassMirror::class("app/Widget").method(
        MethodMirror::constructor()
            .annotated(annotation(annotations::FACTORY_INJECT))
            .parameter(ParameterMirror::new(GenericType::raw("app/Service")))
            .parameter(
                ParameterMirror::new(GenericType::raw("java/lang/String"))
                    .annotated(annotation(annotations::FACTORY_PARAMETER)),
            ),
    );
    let source = ClassRegistry::new()
        .input(component("app/AppComponent"))
        .input(module("app/AppModule", &["app/AppComponent"]))
        .input(factory)
        .input(widget);

    let (context, errors) = analyze(&source);
    assert!(errors.is_empty(), "{errors:?}");
    let factory = context.factories.get_by_type(&ty("app/WidgetFactory")).unwrap();
    let point = &factory.provision_points[0];
    assert_eq!(point.implementation, ty("app/Widget"));
    assert!(matches!(
        point.injectees.as_slice(),
        [
            ferrous_inject::FactoryInjectee::FromInjector(_),
            ferrous_inject::FactoryInjectee::FromMethod { argument_index: 0, .. }
        ]
    ));
}

#[test]
fn test_primitive_provided_as_argument_is_rejected() {
    let provided_as = AnnotationMirror::new(annotations::PROVIDED_AS).with_value(
        "value",
        AnnotationValue::Array(vec![AnnotationValue::Type(Type::Primitive(Primitive::Int))]),
    );
    let source = ClassRegistry::new()
        .input(component("app/AppComponent"))
        .input(module("app/AppModule", &["app/AppComponent"]))
        .input(providable("app/Service", &["app/AppModule"], &[]).annotated(provided_as));

    let (context, errors) = analyze(&source);
    assert_eq!(
        errors,
        vec!["Class app.Service has a non-class type in its @ProvidedAs annotation: int".to_string()]
    );
    assert!(context.bindings.is_empty());
}

fn widget_factory(method: MethodMirror) -> ClassMirror {
    ClassMirror::interface("app/WidgetFactory")
        .annotated(annotation(annotations::FACTORY))
        .annotated(class_list(annotations::PROVIDED_BY, &["app/AppModule"]))
        .method(method)
}

fn widget_with_string_parameter() -> ClassMirror {
    ClassMirror::class("app/Widget").method(
        MethodMirror::constructor()
            .annotated(annotation(annotations::FACTORY_INJECT))
            .parameter(
                ParameterMirror::new(GenericType::raw("java/lang/String"))
                    .annotated(annotation(annotations::FACTORY_PARAMETER)),
            ),
    )
}

fn factory_source(factory: ClassMirror, widget: ClassMirror) -> ClassRegistry {
    ClassRegistry::new()
        .input(component("app/AppComponent"))
        .input(module("app/AppModule", &["app/AppComponent"]))
        .input(factory)
        .input(widget)
}

#[test]
fn test_unmatched_factory_parameter_is_rejected() {
    let factory = widget_factory(MethodMirror::new("create", GenericType::raw("app/Widget")));

    let (_, errors) = analyze(&factory_source(factory, widget_with_string_parameter()));
    assert_eq!(
        errors,
        vec![
            "Class app.Widget contains a @Factory.Parameter not provided by factory app.WidgetFactory: java.lang.String"
                .to_string()
        ]
    );
}

#[test]
fn test_factory_method_accepting_a_dependency_twice_is_rejected() {
    let factory = widget_factory(
        MethodMirror::new("create", GenericType::raw("app/Widget"))
            .parameter(ParameterMirror::new(GenericType::raw("java/lang/String")))
            .parameter(ParameterMirror::new(GenericType::raw("java/lang/String"))),
    );

    let (_, errors) = analyze(&factory_source(factory, widget_with_string_parameter()));
    assert_eq!(
        errors,
        vec!["Method app.WidgetFactory.create accepts java.lang.String multiple times".to_string()]
    );
}

#[test]
fn test_factory_with_misconfigured_inheritance_is_rejected() {
    let factory_return = AnnotationMirror::new(annotations::FACTORY_RETURN)
        .with_value("value", AnnotationValue::Type(Type::object("app/WidgetImpl")));
    let base = ClassMirror::interface("app/BaseFactory")
        .method(MethodMirror::new("create", GenericType::raw("app/Widget")).annotated(factory_return));
    let child = ClassMirror::interface("app/ChildFactory")
        .implements("app/BaseFactory")
        .annotated(annotation(annotations::FACTORY))
        .method(MethodMirror::new("create", GenericType::raw("app/Widget")));
    let source = ClassRegistry::new()
        .input(base)
        .input(child)
        .input(ClassMirror::interface("app/Widget"));

    let (_, errors) = analyze(&source);
    assert_eq!(
        errors,
        vec![
            "Method app.ChildFactory.create is misconfigured, @Factory.Return of app.BaseFactory.create is not inherited: Class app.Widget must have a constructor annotated with @Factory.Inject"
                .to_string()
        ]
    );
}

// ===== Scopes and constructors =====

#[test]
fn test_eager_class_without_scope_is_rejected() {
    let source = ClassRegistry::new()
        .input(component("app/AppComponent"))
        .input(module("app/AppModule", &["app/AppComponent"]))
        .input(providable("app/Service", &["app/AppModule"], &[]).annotated(annotation(annotations::EAGER)));

    let (_, errors) = analyze(&source);
    assert_eq!(
        errors,
        vec!["Element app.Service is annotated with @Eager but doesn't have a scope".to_string()]
    );
}

#[test]
fn test_multiple_scopes_are_rejected() {
    let method = provide_method("service", "app/Service")
        .annotated(annotation(annotations::SINGLETON))
        .annotated(annotation("app/ActivityScope"));
    let source = ClassRegistry::new()
        .input(ClassMirror::class("app/ActivityScope").annotated(annotation(annotations::SCOPE)))
        .input(component("app/AppComponent"))
        .input(module("app/AppModule", &["app/AppComponent"]).method(method));

    let (context, errors) = analyze(&source);
    assert_eq!(
        errors,
        vec!["Element app.AppModule.service has multiple scopes: javax.inject.Singleton, app.ActivityScope".to_string()]
    );
    let module = context.find_module(&ty("app/AppModule")).unwrap();
    assert_eq!(module.provision_points[0].scope(), &Scope::None);
}

#[test]
fn test_multiple_inject_constructors_are_rejected() {
    let service = ClassMirror::class("app/Service")
        .method(MethodMirror::constructor().annotated(annotation(annotations::INJECT)))
        .method(
            MethodMirror::constructor()
                .annotated(annotation(annotations::INJECT))
                .parameter(ParameterMirror::new(GenericType::raw("app/Repository"))),
        );
    let source = ClassRegistry::new().input(service);

    let (context, errors) = analyze(&source);
    assert_eq!(errors, vec!["Class app.Service has multiple @Inject constructors".to_string()]);
    assert!(context.providable_targets.is_empty());
}
