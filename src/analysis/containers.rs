use std::collections::HashMap;

use tracing::debug;

use crate::analysis::contracts::ContractParser;
use crate::analysis::helper::{is_contract_configuration, AnalyzerHelper};
use crate::arena::Id;
use crate::error::CompilerResult;
use crate::metadata::{annotations, Annotated};
use crate::model::Contract;
use crate::reporter::{report, ErrorReporter};
use crate::types::ObjectType;

/// Root containers found among all known types, before their modules are
/// parsed.
#[derive(Debug, Default)]
pub(crate) struct ContainerTypes {
    pub(crate) components: Vec<ObjectType>,
    pub(crate) configurations: Vec<ObjectType>,
    pub(crate) configuration_contracts: HashMap<ObjectType, Id<Contract>>,
}

pub(crate) fn analyze_containers(
    helper: AnalyzerHelper<'_>,
    types: &[ObjectType],
    contracts: &mut ContractParser<'_>,
    reporter: &mut dyn ErrorReporter,
) -> CompilerResult<ContainerTypes> {
    let mut containers = ContainerTypes::default();
    for ty in types {
        let mirror = helper.source().class(ty)?;

        if mirror.has_annotation(annotations::COMPONENT) {
            if mirror.type_parameters.is_empty() {
                debug!("Component: {ty}");
                containers.components.push(ty.clone());
            } else {
                report(reporter, format!("Component cannot have a type parameters: {ty}"));
            }
        }

        if is_contract_configuration(mirror) {
            if !mirror.type_parameters.is_empty() {
                report(reporter, format!("Contract configuration cannot have type parameters: {ty}"));
                continue;
            }
            let Some(contract_type) = helper.configuration_contract_type(mirror, reporter) else {
                continue;
            };
            debug!("Contract configuration: {ty} -> {contract_type}");
            let contract = contracts.parse_contract(&contract_type, reporter)?;
            containers.configurations.push(ty.clone());
            containers.configuration_contracts.insert(ty.clone(), contract);
        }
    }
    Ok(containers)
}
