#![cfg(feature = "debug-report")]

mod common;

use std::collections::HashSet;

use common::*;
use ferrous_inject::{DebugReport, GenerationContextFactory, ProviderFactory};

fn source() -> ferrous_inject::ClassRegistry {
    ferrous_inject::ClassRegistry::new()
        .input(component("app/AppComponent"))
        .input(module("app/AppModule", &["app/AppComponent"]).method(provide_method("config", "app/Config")))
        .input(providable("app/Service", &["app/AppModule"], &["app/Config"]))
}

// ===== Debug report =====

#[test]
fn test_report_before_naming_has_no_providers() {
    let (injection, errors) = analyze(&source());
    assert!(errors.is_empty(), "{errors:?}");

    let report = DebugReport::new("main", &injection, None);

    assert_eq!(report.containers.len(), 1);
    assert_eq!(report.containers[0].kind, "component");
    assert_eq!(report.containers[0].modules, vec![ty("app/AppComponent"), ty("app/AppModule")]);
    assert!(report.providers.is_empty());
}

#[test]
fn test_report_lists_named_providers() {
    let source = source();
    let (injection, _) = analyze(&source);
    let compiled = HashSet::new();
    let mut provider_factory = ProviderFactory::new(&compiled, "main");
    let generation = GenerationContextFactory::new(&source)
        .create(&injection, &mut provider_factory)
        .unwrap();

    let report = DebugReport::new("main", &injection, Some(&generation));

    let names: Vec<&str> = report.providers.iter().map(|provider| provider.ty.internal_name()).collect();
    assert_eq!(
        names,
        vec!["app/Service$ConstructorProvider0$main", "app/AppModule$MethodProvider0$main"]
    );
    assert_eq!(report.providers[1].key, "app.Config");
}

#[test]
fn test_report_exports_json_and_yaml() {
    let (injection, _) = analyze(&source());
    let report = DebugReport::new("main", &injection, None);

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["project_name"], "main");
    assert_eq!(json["modules"][1]["ty"], "app/AppModule");

    let yaml = report.to_yaml().unwrap();
    assert!(yaml.contains("project_name: main"));
    assert!(yaml.contains("app/AppModule"));
}
