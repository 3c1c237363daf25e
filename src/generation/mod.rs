//! Provider naming, generation-context assembly and unit emission.

mod context;
mod emit;
mod generator;
mod invader;
mod key_registry;
mod naming;
mod provider;
mod provider_factory;
pub mod unit;

pub use context::{GenerationContext, GenerationContextFactory};
pub use emit::{ArtifactSink, DirectorySink, EmissionBackend, JsonBackend, MemorySink};
pub use generator::Generator;
pub use invader::PackageInvader;
pub use key_registry::{KeyRegistry, RegistryKey};
pub use naming::{NamePattern, NameRegistry};
pub use provider::{Provider, ProviderMedium};
pub use provider_factory::ProviderFactory;
pub use unit::GeneratedUnit;
