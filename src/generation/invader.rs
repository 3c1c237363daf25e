use indexmap::IndexMap;

use crate::types::ObjectType;

/// Per-package helper that holds class references to non-public types,
/// so generated code in other packages can reach them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInvader {
    pub ty: ObjectType,
    /// Internal name of the package, empty for the default package.
    pub package_name: String,
    /// Referenced type to the field that caches its class.
    pub fields: IndexMap<ObjectType, String>,
}

impl PackageInvader {
    pub fn field(&self, ty: &ObjectType) -> Option<&str> {
        self.fields.get(ty).map(String::as_str)
    }
}

/// Unique name base of the invader for `package_name`.
pub(crate) fn invader_name(package_name: &str, project_name: &str) -> String {
    if package_name.is_empty() {
        format!("Ferrous$PackageInvader${project_name}")
    } else {
        format!("{package_name}/Ferrous$PackageInvader${project_name}")
    }
}
