//! Shared metadata fixtures for integration tests.

#![allow(dead_code)]

use std::collections::HashSet;

use ferrous_inject::key::{AnnotationMirror, AnnotationValue};
use ferrous_inject::metadata::annotations;
use ferrous_inject::types::Type;
use ferrous_inject::{
    Analyzer, ClassMirror, ClassRegistry, CollectingReporter, CompilerResult, ErrorReporter,
    GenericType, InjectionContext, JsonBackend, MemorySink, MethodMirror, ObjectType,
    ParameterMirror, ProcessOutcome, Processor, ProcessorConfig,
};

pub fn annotation(ty: &str) -> AnnotationMirror {
    AnnotationMirror::new(ty)
}

/// `@A({X.class, Y.class})`
pub fn class_list(ty: &str, classes: &[&str]) -> AnnotationMirror {
    AnnotationMirror::new(ty).with_value(
        "value",
        AnnotationValue::Array(
            classes
                .iter()
                .map(|class| AnnotationValue::Type(Type::object(class)))
                .collect(),
        ),
    )
}

pub fn named(value: &str) -> AnnotationMirror {
    AnnotationMirror::new(annotations::NAMED).with_value("value", AnnotationValue::Str(value.to_string()))
}

pub fn component(ty: &str) -> ClassMirror {
    ClassMirror::class(ty).annotated(annotation(annotations::COMPONENT))
}

/// `@Module @ImportedBy(importers)`
pub fn module(ty: &str, importers: &[&str]) -> ClassMirror {
    let mirror = ClassMirror::class(ty).annotated(annotation(annotations::MODULE));
    if importers.is_empty() {
        mirror
    } else {
        mirror.annotated(class_list(annotations::IMPORTED_BY, importers))
    }
}

/// A class with an `@Inject` constructor taking `dependencies`, hosted by
/// `provided_by`.
pub fn providable(ty: &str, provided_by: &[&str], dependencies: &[&str]) -> ClassMirror {
    let constructor = dependencies.iter().fold(
        MethodMirror::constructor().annotated(annotation(annotations::INJECT)),
        |constructor, dependency| constructor.parameter(ParameterMirror::new(GenericType::raw(dependency))),
    );
    ClassMirror::class(ty)
        .annotated(class_list(annotations::PROVIDED_BY, provided_by))
        .method(constructor)
}

pub fn provide_method(name: &str, returns: &str) -> MethodMirror {
    MethodMirror::new(name, GenericType::raw(returns)).annotated(annotation(annotations::PROVIDE))
}

/// `class ty extends ContractConfiguration<contract>`
pub fn contract_configuration(ty: &str, contract: &str) -> ClassMirror {
    ClassMirror::class(ty).extends_generic(GenericType::parameterized(
        annotations::CONTRACT_CONFIGURATION,
        vec![GenericType::raw(contract)],
    ))
}

/// A contract interface with one getter per `(name, type)` pair.
pub fn contract(ty: &str, getters: &[(&str, &str)]) -> ClassMirror {
    getters.iter().fold(
        ClassMirror::interface(ty).annotated(annotation(annotations::CONTRACT)),
        |mirror, (name, returns)| mirror.method(MethodMirror::new(*name, GenericType::raw(returns))),
    )
}

pub fn analyze(source: &ClassRegistry) -> (InjectionContext, Vec<String>) {
    let mut reporter = CollectingReporter::new();
    let context = Analyzer::new(source, "main")
        .analyze(&mut reporter)
        .expect("analysis should not fail fatally");
    (context, reporter.into_errors())
}

pub struct Run {
    pub outcome: CompilerResult<ProcessOutcome>,
    pub errors: Vec<String>,
    pub sink: MemorySink,
}

pub fn run(source: &ClassRegistry) -> Run {
    run_with(source, &HashSet::new(), ProcessorConfig::default())
}

pub fn run_with(source: &ClassRegistry, compiled: &HashSet<ObjectType>, config: ProcessorConfig) -> Run {
    let mut reporter = CollectingReporter::new();
    let mut sink = MemorySink::new();
    let outcome = Processor::new(source, compiled, config).process(&JsonBackend::new(), &mut sink, &mut reporter);
    let errors = reporter.errors().to_vec();
    Run { outcome, errors, sink }
}

pub fn ty(name: &str) -> ObjectType {
    ObjectType::new(name)
}

/// Errors containing `fragment`.
pub fn errors_containing<'e>(errors: &'e [String], fragment: &str) -> Vec<&'e String> {
    errors.iter().filter(|error| error.contains(fragment)).collect()
}
