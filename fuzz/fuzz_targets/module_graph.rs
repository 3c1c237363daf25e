#![no_main]

use std::collections::HashSet;

use libfuzzer_sys::fuzz_target;
use ferrous_inject::key::{AnnotationMirror, AnnotationValue};
use ferrous_inject::metadata::annotations;
use ferrous_inject::{
    ClassMirror, ClassRegistry, CollectingReporter, ErrorReporter, GenericType, JsonBackend, MemorySink,
    MethodMirror, ObjectType, ParameterMirror, ProcessOutcome, Processor, ProcessorConfig, Type,
};

const MODULES: usize = 4;
const SERVICES: usize = 8;

fn class_list(ty: &str, classes: &[String]) -> AnnotationMirror {
    AnnotationMirror::new(ty).with_value(
        "value",
        AnnotationValue::Array(classes.iter().map(|class| AnnotationValue::Type(Type::object(class))).collect()),
    )
}

fuzz_target!(|data: &[u8]| {
    if data.len() < MODULES + SERVICES * 2 {
        return;
    }
    let (module_bytes, service_bytes) = data.split_at(MODULES);

    // Each module byte picks its importers: bit 0 the component, bits 1.. other modules
    let mut registry = ClassRegistry::new();
    registry.add_input(ClassMirror::class("app/AppComponent").annotated(AnnotationMirror::new(annotations::COMPONENT)));
    for (index, byte) in module_bytes.iter().enumerate() {
        let mut importers = Vec::new();
        if byte & 1 == 1 {
            importers.push("app/AppComponent".to_string());
        }
        for other in 0..MODULES {
            if other != index && byte & (2 << other) != 0 {
                importers.push(format!("app/Module{other}"));
            }
        }
        let mut module = ClassMirror::class(ObjectType::new(format!("app/Module{index}")))
            .annotated(AnnotationMirror::new(annotations::MODULE));
        if !importers.is_empty() {
            module = module.annotated(class_list(annotations::IMPORTED_BY, &importers));
        }
        registry.add_input(module);
    }

    // Each service takes a host module and one optional dependency, possibly forming cycles
    for (index, pair) in service_bytes.chunks(2).take(SERVICES).enumerate() {
        let host = format!("app/Module{}", pair[0] as usize % MODULES);
        let mut constructor = MethodMirror::constructor().annotated(AnnotationMirror::new(annotations::INJECT));
        if pair[1] & 0x80 != 0 {
            let dependency = format!("app/Service{}", pair[1] as usize % SERVICES);
            constructor = constructor.parameter(ParameterMirror::new(GenericType::raw(&dependency)));
        }
        registry.add_input(
            ClassMirror::class(ObjectType::new(format!("app/Service{index}")))
                .annotated(class_list(annotations::PROVIDED_BY, &[host]))
                .method(constructor),
        );
    }

    let compiled = HashSet::new();
    let mut sink = MemorySink::new();
    let mut reporter = CollectingReporter::new();
    let outcome = Processor::new(&registry, &compiled, ProcessorConfig::default())
        .process(&JsonBackend::new(), &mut sink, &mut reporter);

    match outcome {
        Ok(ProcessOutcome::Generated { .. }) => assert_eq!(sink.flushes(), 1),
        Ok(ProcessOutcome::Skipped { errors }) => {
            assert_eq!(errors, reporter.errors().len());
            assert_eq!(sink.flushes(), 0);
        }
        Err(_) => {}
    }
});
