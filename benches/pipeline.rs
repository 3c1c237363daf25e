use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ferrous_inject::key::{AnnotationMirror, AnnotationValue};
use ferrous_inject::metadata::annotations;
use ferrous_inject::*;
use std::collections::HashSet;

/// A component importing `modules` modules, each hosting `services` chained
/// constructor-injected classes.
fn synthetic_graph(modules: usize, services: usize) -> ClassRegistry {
    let component = "app/AppComponent";
    let mut registry = ClassRegistry::new();
    registry.add_input(ClassMirror::class(component).annotated(AnnotationMirror::new(annotations::COMPONENT)));

    for m in 0..modules {
        let module = format!("app/m{m}/Module{m}");
        registry.add_input(
            ClassMirror::class(module.as_str())
                .annotated(AnnotationMirror::new(annotations::MODULE))
                .annotated(class_list(annotations::IMPORTED_BY, &[component])),
        );
        for s in 0..services {
            let mut constructor = MethodMirror::constructor().annotated(AnnotationMirror::new(annotations::INJECT));
            if s > 0 {
                let previous = format!("app/m{m}/Service{}", s - 1);
                constructor = constructor.parameter(ParameterMirror::new(GenericType::raw(&previous)));
            }
            registry.add_input(
                ClassMirror::class(format!("app/m{m}/Service{s}").as_str())
                    .annotated(class_list(annotations::PROVIDED_BY, &[module.as_str()]))
                    .method(constructor),
            );
        }
    }
    registry
}

fn class_list(ty: &str, classes: &[&str]) -> AnnotationMirror {
    AnnotationMirror::new(ty).with_value(
        "value",
        AnnotationValue::Array(classes.iter().map(|class| AnnotationValue::Type(Type::object(class))).collect()),
    )
}

// ===== Stages =====

fn bench_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis");
    for modules in [4, 16, 64] {
        let source = synthetic_graph(modules, 8);
        group.bench_with_input(BenchmarkId::from_parameter(modules), &source, |b, source| {
            b.iter(|| {
                let mut reporter = CollectingReporter::new();
                let context = Analyzer::new(source, "main").analyze(&mut reporter).unwrap();
                black_box(context.modules.len());
            })
        });
    }
    group.finish();
}

fn bench_validation(c: &mut Criterion) {
    let source = synthetic_graph(32, 8);
    let mut reporter = CollectingReporter::new();
    let context = Analyzer::new(&source, "main").analyze(&mut reporter).unwrap();

    c.bench_function("validation_32_modules", |b| {
        b.iter(|| {
            let mut reporter = CollectingReporter::new();
            Validator::new(&source, &context).validate(&mut reporter);
            black_box(reporter.has_errors());
        })
    });
}

fn bench_naming_with_collisions(c: &mut Criterion) {
    let pattern = NamePattern::new("app/Service$ConstructorProvider", "$main");
    let compiled: HashSet<ObjectType> = (0..256).map(|index| pattern.candidate(index)).collect();

    c.bench_function("unique_name_past_256_compiled", |b| {
        b.iter(|| {
            let mut names = NameRegistry::new(&compiled);
            black_box(names.unique_type(&pattern).unwrap());
        })
    });
}

// ===== End to end =====

fn bench_process(c: &mut Criterion) {
    let mut group = c.benchmark_group("process");
    for modules in [4, 16, 64] {
        let source = synthetic_graph(modules, 8);
        let compiled = HashSet::new();
        group.bench_with_input(BenchmarkId::from_parameter(modules), &source, |b, source| {
            b.iter(|| {
                let mut sink = MemorySink::new();
                let mut reporter = CollectingReporter::new();
                let outcome = Processor::new(source, &compiled, ProcessorConfig::default())
                    .process(&JsonBackend::new(), &mut sink, &mut reporter)
                    .unwrap();
                black_box(outcome);
            })
        });
    }
    group.finish();
}

criterion_group!(stage_benches, bench_analysis, bench_validation, bench_naming_with_collisions);

criterion_group!(macro_benches, bench_process);

criterion_main!(stage_benches, macro_benches);
