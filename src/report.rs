//! Serializable snapshot of an analysed injection graph.
//!
//! Built after analysis (and, when available, after provider naming) for
//! debugging configuration problems. Exports as JSON or YAML.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{CompilerError, CompilerResult};
use crate::generation::GenerationContext;
use crate::model::{Import, InjectionContext};
use crate::types::ObjectType;

#[derive(Debug, Clone, Serialize)]
pub struct DebugReport {
    pub project_name: String,
    pub generated_at: DateTime<Utc>,
    pub containers: Vec<ContainerReport>,
    pub modules: Vec<ModuleReport>,
    /// Empty when the report was taken before providers were named.
    pub providers: Vec<ProviderReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContainerReport {
    pub ty: ObjectType,
    pub kind: String,
    /// The effective module graph, root first.
    pub modules: Vec<ObjectType>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleReport {
    pub ty: ObjectType,
    pub provision_points: Vec<String>,
    pub bindings: Vec<String>,
    pub imports: Vec<String>,
    pub factories: Vec<ObjectType>,
    pub contracts: Vec<ObjectType>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProviderReport {
    pub ty: ObjectType,
    pub key: String,
    pub medium: String,
}

impl DebugReport {
    pub fn new(
        project_name: impl Into<String>,
        injection: &InjectionContext,
        generation: Option<&GenerationContext>,
    ) -> Self {
        let containers = injection
            .containers()
            .into_iter()
            .map(|container| ContainerReport {
                modules: injection
                    .modules_with_descendants(container.module)
                    .into_iter()
                    .map(|id| injection.module(id).ty.clone())
                    .collect(),
                ty: container.ty,
                kind: container.kind.to_string(),
            })
            .collect();

        let modules = injection
            .modules
            .values()
            .map(|module| ModuleReport {
                ty: module.ty.clone(),
                provision_points: module
                    .provision_points
                    .iter()
                    .map(|point| format!("{} provides {}", point, point.key()))
                    .collect(),
                bindings: module.bindings.iter().map(ToString::to_string).collect(),
                imports: module
                    .imports
                    .iter()
                    .map(|import| match import {
                        Import::Module { module, point } => {
                            format!("module {} via {point}", injection.module(*module).ty)
                        }
                        Import::Contract {
                            contract,
                            point,
                            lazy,
                        } => {
                            let wrapper = if *lazy { "lazy " } else { "" };
                            format!("{wrapper}contract {} via {point}", injection.contract(*contract).ty)
                        }
                    })
                    .collect(),
                factories: module
                    .factories
                    .iter()
                    .map(|id| injection.factory(*id).ty.clone())
                    .collect(),
                contracts: module
                    .contracts
                    .iter()
                    .map(|id| injection.contract(*id).ty.clone())
                    .collect(),
            })
            .collect();

        let providers = generation
            .map(|generation| {
                generation
                    .providers
                    .iter()
                    .map(|provider| ProviderReport {
                        ty: provider.ty.clone(),
                        key: provider.key(injection).to_string(),
                        medium: provider.medium.to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            project_name: project_name.into(),
            generated_at: Utc::now(),
            containers,
            modules,
            providers,
        }
    }

    pub fn to_json(&self) -> CompilerResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|error| CompilerError::Serialization(error.to_string()))
    }

    pub fn to_yaml(&self) -> CompilerResult<String> {
        serde_yaml::to_string(self)
            .map_err(|error| CompilerError::Serialization(error.to_string()))
    }
}
