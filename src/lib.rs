//! # ferrous-inject
//!
//! Compile-time dependency injection compiler core.
//!
//! Takes class metadata describing components, modules, contracts and
//! factories, builds the whole-program dependency graph, validates it and
//! emits one generated unit per distinct provision source. Generated code
//! wires object graphs without run-time reflection.
//!
//! ## Pipeline
//!
//! 1. [`Analyzer`] turns a [`MetadataSource`] into an [`InjectionContext`],
//!    reporting every structural problem to an [`ErrorReporter`].
//! 2. [`Validator`] checks each container's effective module graph for
//!    duplicate, missing and cyclic dependencies.
//! 3. [`ProviderFactory`] assigns collision-free generated names and
//!    [`GenerationContextFactory`] assembles providers, package invaders and
//!    the key registry.
//! 4. [`Generator`] emits units through an [`EmissionBackend`] into an
//!    [`ArtifactSink`] and flushes it once.
//!
//! [`Processor`] runs all four steps and skips generation when anything was
//! reported.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::collections::HashSet;
//! use ferrous_inject::{
//!     ClassMirror, ClassRegistry, CollectingReporter, ErrorReporter, JsonBackend, MemorySink,
//!     MethodMirror, ObjectType, Processor, ProcessorConfig,
//! };
//! use ferrous_inject::key::{AnnotationMirror, AnnotationValue};
//! use ferrous_inject::metadata::annotations;
//! use ferrous_inject::types::Type;
//!
//! let module = ClassMirror::class("app/AppModule")
//!     .annotated(AnnotationMirror::new(annotations::MODULE))
//!     .annotated(AnnotationMirror::new(annotations::IMPORTED_BY).with_value(
//!         "value",
//!         AnnotationValue::Array(vec![AnnotationValue::Type(Type::object("app/AppComponent"))]),
//!     ));
//! let component = ClassMirror::class("app/AppComponent")
//!     .annotated(AnnotationMirror::new(annotations::COMPONENT));
//! let service = ClassMirror::class("app/Service")
//!     .annotated(AnnotationMirror::new(annotations::PROVIDED_BY).with_value(
//!         "value",
//!         AnnotationValue::Array(vec![AnnotationValue::Type(Type::object("app/AppModule"))]),
//!     ))
//!     .method(MethodMirror::constructor().annotated(AnnotationMirror::new(annotations::INJECT)));
//!
//! let source = ClassRegistry::new().input(component).input(module).input(service);
//! let mut reporter = CollectingReporter::new();
//! let mut sink = MemorySink::new();
//! let compiled: HashSet<ObjectType> = HashSet::new();
//! Processor::new(&source, &compiled, ProcessorConfig::default())
//!     .process(&JsonBackend::new(), &mut sink, &mut reporter)
//!     .unwrap();
//!
//! assert!(!reporter.has_errors());
//! assert!(sink
//!     .artifact(&ObjectType::new("app/Service$ConstructorProvider0$main"))
//!     .is_some());
//! ```

pub mod analysis;
pub mod arena;
pub mod config;
pub mod error;
pub mod generation;
pub mod key;
pub mod metadata;
pub mod model;
pub mod processor;
pub mod reporter;
pub mod types;
pub mod validation;

#[cfg(feature = "debug-report")]
pub mod report;

pub use analysis::Analyzer;
pub use arena::{Arena, Id};
pub use config::{ConfigSource, ConfigValue, EnvironmentConfigSource, ProcessorConfig};
pub use error::{CompilerError, CompilerResult};
pub use generation::{
    ArtifactSink, DirectorySink, EmissionBackend, GeneratedUnit, GenerationContext,
    GenerationContextFactory, Generator, JsonBackend, KeyRegistry, MemorySink, NamePattern,
    NameRegistry, PackageInvader, Provider, ProviderFactory, ProviderMedium, RegistryKey,
};
pub use key::{AnnotationMirror, AnnotationValue, Dependency, DependencyKind, Key};
pub use metadata::{
    Annotated, ClassMirror, ClassRegistry, CompiledTypes, FieldMirror, MetadataSource, MethodMirror,
    ParameterMirror,
};
pub use model::{
    Binding, Component, Contract, ContractConfiguration, ContractProvisionPoint, Factory,
    FactoryInjectee, FactoryProvisionPoint, Import, ImportPoint, InjectionContext, InjectionPoint,
    InjectionTarget, Module, ProvisionPoint, Scope,
};
pub use processor::{ProcessOutcome, Processor};
pub use reporter::{CollectingReporter, ErrorReporter};
pub use types::{
    box_primitive, box_type, boxed_or_element_type, unbox, GenericType, ObjectType, Primitive, Type,
};
pub use validation::Validator;

#[cfg(feature = "debug-report")]
pub use report::DebugReport;
