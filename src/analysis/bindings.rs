use indexmap::IndexMap;
use tracing::debug;

use crate::analysis::helper::AnalyzerHelper;
use crate::error::CompilerResult;
use crate::key::{AnnotationValue, Key};
use crate::metadata::{annotations, Annotated, ClassMirror};
use crate::model::Binding;
use crate::reporter::{report, ErrorReporter};
use crate::types::{ObjectType, Type};

/// Every `@ProvidedAs` binding, indexed by implementation key.
#[derive(Debug, Default)]
pub(crate) struct BindingRegistry {
    bindings: IndexMap<Key, Vec<Binding>>,
}

impl BindingRegistry {
    pub(crate) fn analyze(
        helper: AnalyzerHelper<'_>,
        types: &[ObjectType],
        reporter: &mut dyn ErrorReporter,
    ) -> CompilerResult<Self> {
        let mut registry = Self::default();
        for ty in types {
            let mirror = helper.source().class(ty)?;
            let Some(values) = mirror.annotation_types(annotations::PROVIDED_AS) else {
                continue;
            };
            for binding in bindings_for_class(helper, mirror, &values, reporter) {
                debug!("Binding: {binding}");
                registry.register(binding);
            }
        }
        Ok(registry)
    }

    fn register(&mut self, binding: Binding) {
        let bindings = self.bindings.entry(binding.implementation.boxed()).or_default();
        if !bindings.contains(&binding) {
            bindings.push(binding);
        }
    }

    pub(crate) fn find_by_implementation(&self, key: &Key) -> &[Binding] {
        self.bindings
            .get(&key.boxed())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub(crate) fn into_bindings(self) -> Vec<Binding> {
        self.bindings.into_values().flatten().collect()
    }
}

fn bindings_for_class(
    helper: AnalyzerHelper<'_>,
    mirror: &ClassMirror,
    values: &[AnnotationValue],
    reporter: &mut dyn ErrorReporter,
) -> Vec<Binding> {
    let qualifier = helper.find_qualifier(mirror, &mirror.ty.to_string(), reporter);
    values
        .iter()
        .filter_map(|value| match value {
            AnnotationValue::Type(Type::Object(ancestor)) => Some(Binding {
                implementation: Key::of_class(&mirror.ty),
                ancestor: Key {
                    qualifier: qualifier.clone(),
                    ..Key::of_class(ancestor)
                },
            }),
            AnnotationValue::Type(other) => {
                report(
                    reporter,
                    format!(
                        "Class {} has a non-class type in its @ProvidedAs annotation: {other}",
                        mirror.ty
                    ),
                );
                None
            }
            other => {
                report(
                    reporter,
                    format!(
                        "Class {} has invalid type in its @ProvidedAs annotation: {other}",
                        mirror.ty
                    ),
                );
                None
            }
        })
        .collect()
}
