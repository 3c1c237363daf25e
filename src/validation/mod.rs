//! Whole-graph validation of an analysed [`InjectionContext`].
//!
//! Runs after analysis and before any provider is named. Like analysis it
//! only reports; the caller decides whether to continue.

mod cycles;
mod resolver;
mod sanity;

use tracing::{debug, info};

use crate::key::Dependency;
use crate::metadata::MetadataSource;
use crate::model::{Container, InjectionContext, InjectionTarget};
use crate::reporter::{report, ErrorReporter};

use self::resolver::DependencyResolver;
use self::sanity::perform_sanity_checks;

/// Validates the dependency graph of every container.
///
/// For each component and contract configuration the effective module
/// graph is checked for keys provided more than once, required keys that
/// nothing provides, and (optionally) cycles through eager dependencies.
pub struct Validator<'a> {
    source: &'a dyn MetadataSource,
    context: &'a InjectionContext,
    check_dependency_cycles: bool,
}

impl<'a> Validator<'a> {
    pub fn new(source: &'a dyn MetadataSource, context: &'a InjectionContext) -> Self {
        Self {
            source,
            context,
            check_dependency_cycles: true,
        }
    }

    pub fn check_dependency_cycles(mut self, enabled: bool) -> Self {
        self.check_dependency_cycles = enabled;
        self
    }

    pub fn validate(&self, reporter: &mut dyn ErrorReporter) {
        let errors_before = reporter.errors().len();
        perform_sanity_checks(self.source, self.context, reporter);

        let containers = self.context.containers();
        let resolvers: Vec<(&Container, DependencyResolver)> = containers
            .iter()
            .map(|container| (container, DependencyResolver::new(self.context, container.module)))
            .collect();

        for (container, resolver) in &resolvers {
            debug!("Validating {} {}", container.kind, container.ty);
            self.validate_container(container, resolver, reporter);
        }

        self.validate_bindings(reporter);
        self.validate_injection_targets(&resolvers, reporter);

        info!(
            containers = containers.len(),
            errors = reporter.errors().len() - errors_before,
            "Validation finished"
        );
    }

    fn validate_container(
        &self,
        container: &Container,
        resolver: &DependencyResolver,
        reporter: &mut dyn ErrorReporter,
    ) {
        for (key, sources) in resolver.duplicates() {
            let sources: Vec<String> = sources
                .iter()
                .enumerate()
                .map(|(index, source)| format!("{}. {source}", index + 1))
                .collect();
            report(
                reporter,
                format!(
                    "Dependency {key} provided multiple times in a single {} hierarchy {}:\n{}",
                    container.kind,
                    container.ty,
                    sources.join("\n")
                ),
            );
        }

        for (key, requesters) in resolver.unresolved() {
            report(
                reporter,
                format!(
                    "Missing dependency {key} in {} {}, required by:\n  {}",
                    container.kind,
                    container.ty,
                    requesters.join("\n  ")
                ),
            );
        }

        if self.check_dependency_cycles {
            for cycle in resolver.find_cycles() {
                let keys: Vec<String> = cycle.iter().map(ToString::to_string).collect();
                report(
                    reporter,
                    format!(
                        "Dependency cycle in {} {}:\n  {}",
                        container.kind,
                        container.ty,
                        keys.join("\n  ")
                    ),
                );
            }
        }
    }

    /// A binding only takes effect in modules that provide its
    /// implementation.
    fn validate_bindings(&self, reporter: &mut dyn ErrorReporter) {
        for binding in &self.context.bindings {
            let is_attached = self
                .context
                .modules
                .values()
                .any(|module| module.bindings.contains(binding));
            if !is_attached {
                report(
                    reporter,
                    format!(
                        "Invalid configuration for dependency: {}. {} isn't provided by any module",
                        binding.ancestor, binding.implementation
                    ),
                );
            }
        }
    }

    /// Member injection targets that are not providable are injected by a
    /// component, so at least one component must resolve all their
    /// dependencies.
    fn validate_injection_targets(
        &self,
        resolvers: &[(&Container, DependencyResolver)],
        reporter: &mut dyn ErrorReporter,
    ) {
        let components: Vec<&(&Container, DependencyResolver)> = resolvers
            .iter()
            .filter(|(container, _)| {
                self.context
                    .components
                    .iter()
                    .any(|component| component.ty == container.ty)
            })
            .collect();

        for target in &self.context.injectable_targets {
            if self.context.find_providable_target(&target.ty).is_some() {
                continue;
            }
            let dependencies = target_dependencies(target);
            if dependencies.is_empty() {
                continue;
            }

            let mut candidates: Vec<(&Container, Vec<&Dependency>)> = Vec::new();
            let mut resolved = false;
            for entry in &components {
                let (container, resolver) = (entry.0, &entry.1);
                let unresolved: Vec<&Dependency> = dependencies
                    .iter()
                    .copied()
                    .filter(|dependency| !resolver.is_resolved(&dependency.key))
                    .collect();
                if unresolved.is_empty() {
                    resolved = true;
                    break;
                }
                let best = candidates.first().map(|(_, best)| best.len());
                match best {
                    Some(best) if best < unresolved.len() => {}
                    Some(best) if best > unresolved.len() => {
                        candidates.clear();
                        candidates.push((container, unresolved));
                    }
                    _ => candidates.push((container, unresolved)),
                }
            }

            if resolved || candidates.is_empty() {
                continue;
            }
            let mut message = format!(
                "Dependencies of {} cannot be fully resolved by any component\nBest candidates and unresolved dependencies:",
                target.ty
            );
            for (container, unresolved) in &candidates {
                message.push_str(&format!("\n  {}", container.ty));
                for dependency in unresolved {
                    message.push_str(&format!("\n    {dependency}"));
                }
            }
            report(reporter, message);
        }
    }
}

fn target_dependencies(target: &InjectionTarget) -> Vec<&Dependency> {
    target
        .injection_points
        .iter()
        .flat_map(|point| point.injectees())
        .collect()
}
