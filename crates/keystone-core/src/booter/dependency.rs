use std::collections::HashSet;

use crate::booter::error::BooterError;

/// Dependency of one boot component on another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootDependency {
    /// Key of the component depended on
    pub key: String,
    /// Whether a missing dependency is an error or silently skipped
    pub required: bool,
}

impl BootDependency {
    /// A dependency that must be defined
    pub fn required(key: &str) -> Self {
        Self {
            key: key.to_string(),
            required: true,
        }
    }

    /// A dependency started only when it is defined
    pub fn optional(key: &str) -> Self {
        Self {
            key: key.to_string(),
            required: false,
        }
    }
}

/// Start order for `root`: every transitive dependency before its dependents,
/// `root` last.
///
/// `dependencies_of` returns the declared dependencies of a component, or
/// `None` when the component is not defined. The walk is depth first in
/// declaration order, so the result is deterministic. A cycle fails before any
/// caller acts on the plan.
pub fn resolve_order<F>(root: &str, mut dependencies_of: F) -> Result<Vec<String>, BooterError>
where
    F: FnMut(&str) -> Result<Option<Vec<BootDependency>>, BooterError>,
{
    let mut order = Vec::new();
    let mut visited = HashSet::new();
    let mut path = Vec::new();
    visit(root, &mut dependencies_of, &mut visited, &mut path, &mut order)?;
    Ok(order)
}

fn visit<F>(
    key: &str,
    dependencies_of: &mut F,
    visited: &mut HashSet<String>,
    path: &mut Vec<String>,
    order: &mut Vec<String>,
) -> Result<(), BooterError>
where
    F: FnMut(&str) -> Result<Option<Vec<BootDependency>>, BooterError>,
{
    if visited.contains(key) {
        return Ok(());
    }
    if let Some(position) = path.iter().position(|entry| entry == key) {
        let mut cycle = path[position..].to_vec();
        cycle.push(key.to_string());
        return Err(BooterError::CyclicDependency(cycle));
    }

    let dependencies = dependencies_of(key)?.ok_or_else(|| BooterError::InvalidComponent {
        key: key.to_string(),
        reason: "no boot definition found".to_string(),
    })?;

    path.push(key.to_string());
    for dependency in dependencies {
        if dependencies_of(&dependency.key)?.is_none() {
            if dependency.required {
                return Err(BooterError::MissingDependency {
                    component: key.to_string(),
                    dependency: dependency.key,
                });
            }
            log::debug!(
                "Skipping optional dependency '{}' of '{}': not defined",
                dependency.key,
                key
            );
            continue;
        }
        visit(&dependency.key, dependencies_of, visited, path, order)?;
    }
    path.pop();

    visited.insert(key.to_string());
    order.push(key.to_string());
    Ok(())
}
