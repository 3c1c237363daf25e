//! The one-shot compilation pipeline.

use tracing::{info, warn};

use crate::analysis::Analyzer;
use crate::config::ProcessorConfig;
use crate::error::CompilerResult;
use crate::generation::{ArtifactSink, EmissionBackend, GenerationContextFactory, Generator, ProviderFactory};
use crate::metadata::{CompiledTypes, MetadataSource};
use crate::reporter::ErrorReporter;
use crate::validation::Validator;

/// How a run ended when no fatal error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Generation ran. Artifacts that failed individually are in the
    /// reporter, so callers still check it.
    Generated { providers: usize },
    /// Analysis or validation reported errors; nothing was emitted.
    Skipped { errors: usize },
}

impl ProcessOutcome {
    pub fn is_generated(&self) -> bool {
        matches!(self, ProcessOutcome::Generated { .. })
    }
}

/// Analyzes, validates and generates for one set of inputs.
///
/// # Examples
///
/// ```rust
/// use std::collections::HashSet;
/// use ferrous_inject::{
///     ClassMirror, ClassRegistry, CollectingReporter, JsonBackend, MemorySink, ObjectType,
///     ProcessOutcome, Processor, ProcessorConfig,
/// };
/// use ferrous_inject::key::AnnotationMirror;
/// use ferrous_inject::metadata::annotations;
///
/// let source = ClassRegistry::new()
///     .input(ClassMirror::class("app/AppComponent").annotated(AnnotationMirror::new(annotations::COMPONENT)));
/// let compiled: HashSet<ObjectType> = HashSet::new();
/// let mut sink = MemorySink::new();
/// let mut reporter = CollectingReporter::new();
///
/// let outcome = Processor::new(&source, &compiled, ProcessorConfig::default())
///     .process(&JsonBackend::new(), &mut sink, &mut reporter)
///     .unwrap();
///
/// assert_eq!(outcome, ProcessOutcome::Generated { providers: 0 });
/// assert_eq!(sink.flushes(), 1);
/// ```
pub struct Processor<'a> {
    source: &'a dyn MetadataSource,
    compiled: &'a dyn CompiledTypes,
    config: ProcessorConfig,
}

impl<'a> Processor<'a> {
    pub fn new(source: &'a dyn MetadataSource, compiled: &'a dyn CompiledTypes, config: ProcessorConfig) -> Self {
        Self {
            source,
            compiled,
            config,
        }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    pub fn process(
        &self,
        backend: &dyn EmissionBackend,
        sink: &mut dyn ArtifactSink,
        reporter: &mut dyn ErrorReporter,
    ) -> CompilerResult<ProcessOutcome> {
        self.config.validate()?;
        let project_name = self.config.project_name.as_str();
        info!(project = project_name, "Processing injection graph");

        let injection = Analyzer::new(self.source, project_name).analyze(reporter)?;
        Validator::new(self.source, &injection)
            .check_dependency_cycles(self.config.check_dependency_cycles)
            .validate(reporter);

        if reporter.has_errors() {
            self.log_debug_report(&injection, None);
            let errors = reporter.errors().len();
            warn!("Skipping generation: {errors} errors reported");
            return Ok(ProcessOutcome::Skipped { errors });
        }

        let mut provider_factory = ProviderFactory::new(self.compiled, project_name);
        let generation = GenerationContextFactory::new(self.source).create(&injection, &mut provider_factory)?;
        self.log_debug_report(&injection, Some(&generation));

        Generator::new(backend, sink, reporter).generate(&injection, &generation)?;
        Ok(ProcessOutcome::Generated {
            providers: generation.providers.len(),
        })
    }

    #[cfg(feature = "debug-report")]
    fn log_debug_report(
        &self,
        injection: &crate::model::InjectionContext,
        generation: Option<&crate::generation::GenerationContext>,
    ) {
        if !self.config.debug_report {
            return;
        }
        let report = crate::report::DebugReport::new(self.config.project_name.clone(), injection, generation);
        match report.to_json() {
            Ok(json) => tracing::debug!("Injection graph:\n{json}"),
            Err(error) => warn!("Cannot render debug report: {error}"),
        }
    }

    #[cfg(not(feature = "debug-report"))]
    fn log_debug_report(
        &self,
        _injection: &crate::model::InjectionContext,
        _generation: Option<&crate::generation::GenerationContext>,
    ) {
        if self.config.debug_report {
            warn!("debug_report is set but the debug-report feature is disabled");
        }
    }
}
