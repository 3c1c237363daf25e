use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use tracing::debug;

use crate::analysis::helper::{member_name, AnalyzerHelper};
use crate::arena::{Arena, Id};
use crate::error::CompilerResult;
use crate::key::Key;
use crate::metadata::{ClassMirror, MethodMirror};
use crate::model::{Contract, ContractProvisionPoint};
use crate::reporter::{report, ErrorReporter};
use crate::types::ObjectType;

/// Parses contract interfaces, each exactly once.
///
/// Super interfaces of a contract are walked for their getters but only the
/// contracts that were asked for end up in the arena.
pub(crate) struct ContractParser<'a> {
    helper: AnalyzerHelper<'a>,
    project_name: String,
    contracts: Arena<Contract>,
    provision_points: HashMap<ObjectType, Vec<ContractProvisionPoint>>,
    in_progress: HashSet<ObjectType>,
}

impl<'a> ContractParser<'a> {
    pub(crate) fn new(helper: AnalyzerHelper<'a>, project_name: impl Into<String>) -> Self {
        Self {
            helper,
            project_name: project_name.into(),
            contracts: Arena::new(),
            provision_points: HashMap::new(),
            in_progress: HashSet::new(),
        }
    }

    pub(crate) fn parse_contract(
        &mut self,
        ty: &ObjectType,
        reporter: &mut dyn ErrorReporter,
    ) -> CompilerResult<Id<Contract>> {
        if let Some(id) = self.contracts.find(ty) {
            return Ok(id);
        }

        let mirror = self.helper.source().class(ty)?;
        debug!("Contract: {ty}");
        let qualifier = self.helper.find_qualifier(mirror, &ty.to_string(), reporter);
        let provision_points = self.provision_points(mirror, reporter)?;
        let contract = Contract {
            ty: ty.clone(),
            implementation_type: ObjectType::new(format!(
                "{}$Ferrous$Contract${}",
                ty.internal_name(),
                self.project_name
            )),
            key: Key {
                qualifier,
                ..Key::of_class(ty)
            },
            provision_points,
        };
        Ok(self.contracts.insert(ty.clone(), contract))
    }

    pub(crate) fn contract(&self, id: Id<Contract>) -> Option<&Contract> {
        self.contracts.get(id)
    }

    pub(crate) fn contracts(&self) -> &Arena<Contract> {
        &self.contracts
    }

    pub(crate) fn into_arena(self) -> Arena<Contract> {
        self.contracts
    }

    fn provision_points(
        &mut self,
        mirror: &ClassMirror,
        reporter: &mut dyn ErrorReporter,
    ) -> CompilerResult<Vec<ContractProvisionPoint>> {
        if let Some(points) = self.provision_points.get(&mirror.ty) {
            return Ok(points.clone());
        }
        // Interfaces cannot inherit from themselves in valid input; a
        // malformed hierarchy simply stops contributing getters.
        if !self.in_progress.insert(mirror.ty.clone()) {
            return Ok(Vec::new());
        }

        let points = if is_valid_contract(mirror, reporter) {
            let mut inherited = Vec::new();
            for interface in &mirror.interfaces {
                let parent = self.helper.source().class(interface)?;
                inherited.push(self.provision_points(parent, reporter)?);
            }
            let own = mirror
                .plain_methods()
                .filter(|method| !method.is_static)
                .filter_map(|method| self.provision_point(mirror, method, reporter))
                .collect::<Vec<_>>();
            merge_provision_points(&mirror.ty, own, inherited, reporter)
        } else {
            Vec::new()
        };

        self.in_progress.remove(&mirror.ty);
        self.provision_points.insert(mirror.ty.clone(), points.clone());
        Ok(points)
    }

    fn provision_point(
        &self,
        mirror: &ClassMirror,
        method: &MethodMirror,
        reporter: &mut dyn ErrorReporter,
    ) -> Option<ContractProvisionPoint> {
        let method_name = member_name(&mirror.ty, &method.name);
        if !method.type_parameters.is_empty() {
            report(reporter, format!("Contract's method cannot have type parameters: {method_name}"));
            return None;
        }
        if !method.parameters.is_empty() {
            report(reporter, format!("Contract's method cannot have parameters: {method_name}"));
            return None;
        }

        let injectee = self.helper.injectee(&method.return_type, method, &method_name, reporter);
        if injectee.key.ty.is_open() {
            report(
                reporter,
                format!("Contract's method {method_name} returns an open generic type {}", injectee.key.ty),
            );
            return None;
        }

        debug!("  Method: {method_name} -> {injectee}");
        Some(ContractProvisionPoint {
            container: mirror.ty.clone(),
            method: method.name.clone(),
            injectee,
        })
    }
}

fn is_valid_contract(mirror: &ClassMirror, reporter: &mut dyn ErrorReporter) -> bool {
    if !mirror.is_interface {
        report(reporter, format!("Contract must be an interface: {}", mirror.ty));
        return false;
    }
    if !mirror.type_parameters.is_empty() {
        report(reporter, format!("Contract cannot have type parameters: {}", mirror.ty));
        return false;
    }
    true
}

/// Inherited getters first, then own ones. An own getter hides every
/// inherited getter with the same name.
fn merge_provision_points(
    ty: &ObjectType,
    own: Vec<ContractProvisionPoint>,
    inherited: Vec<Vec<ContractProvisionPoint>>,
    reporter: &mut dyn ErrorReporter,
) -> Vec<ContractProvisionPoint> {
    let own = group_by_name(own);
    for (name, points) in &own {
        if points.len() > 1 {
            let lines: Vec<String> = points
                .iter()
                .map(|point| format!("  {} {name}()", point.injectee))
                .collect();
            report(
                reporter,
                format!("Interface {ty} contains conflicting methods:\n{}", lines.join("\n")),
            );
        }
    }

    let inherited = group_by_name(
        inherited
            .into_iter()
            .flatten()
            .filter(|point| !own.contains_key(&point.method)),
    );
    for (name, points) in &inherited {
        let first = &points[0];
        if points.iter().any(|point| point.injectee != first.injectee) {
            let lines: Vec<String> = points
                .iter()
                .map(|point| format!("  {} {name}() from {}", point.injectee, point.container))
                .collect();
            report(
                reporter,
                format!("Interface {ty} inherits conflicting methods:\n{}", lines.join("\n")),
            );
        }
    }

    inherited
        .into_values()
        .chain(own.into_values())
        .filter_map(|points| points.into_iter().next())
        .collect()
}

fn group_by_name(
    points: impl IntoIterator<Item = ContractProvisionPoint>,
) -> IndexMap<String, Vec<ContractProvisionPoint>> {
    let mut groups: IndexMap<String, Vec<ContractProvisionPoint>> = IndexMap::new();
    for point in points {
        groups.entry(point.method.clone()).or_default().push(point);
    }
    groups
}
