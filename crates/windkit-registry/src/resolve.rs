#![forbid(unsafe_code)]

//! Dependency resolution over a [`Registry`].
//!
//! # Invariants
//!
//! 1. **Prerequisites first**: each dependency is preceded by its own
//!    transitive dependencies (post-order walk of the declared lists).
//!
//! 2. **No duplicates**: a name reached along several paths is listed once,
//!    at its first completed visit.
//!
//! 3. **Terminates**: a visited set guards re-expansion, so cyclic catalogs
//!    resolve to a finite (possibly incomplete) list instead of looping. Use
//!    [`Registry::find_cycle`] to diagnose such data.
//!
//! 4. **Deterministic**: output depends only on the declared dependency
//!    lists, never on hash iteration order.

use ahash::AHashSet;

use crate::error::RegistryError;
use crate::registry::Registry;

/// Everything `name` needs installed first, prerequisites before dependents.
///
/// Excludes `name` itself and the `utils` pseudo-dependency. An unknown
/// `name` resolves to an empty list; validating requested names is up to the
/// caller (see [`resolve_install_set`]).
///
/// # Example
///
/// ```
/// use windkit_registry::{Registry, resolve_dependencies};
///
/// let deps = resolve_dependencies(Registry::builtin(), "date-picker");
/// assert_eq!(deps, ["button", "calendar", "popover", "input"]);
/// ```
pub fn resolve_dependencies(registry: &Registry, name: &str) -> Vec<String> {
    let name = name.to_lowercase();
    let mut resolved = AHashSet::new();
    let mut order = Vec::new();
    collect(registry, &name, &mut resolved, &mut order);

    tracing::debug!(component = %name, count = order.len(), "resolved dependencies");
    order
}

fn collect(
    registry: &Registry,
    name: &str,
    resolved: &mut AHashSet<String>,
    order: &mut Vec<String>,
) {
    let Some(entry) = registry.get(name) else {
        return;
    };
    if !resolved.insert(name.to_owned()) {
        return;
    }

    for dep in entry.prerequisites() {
        if resolved.contains(dep) {
            continue;
        }
        collect(registry, dep, resolved, order);
        // Unknown names are listed too, but only once.
        resolved.insert(dep.to_owned());
        tracing::trace!(component = name, dependency = dep, "dependency ordered");
        order.push(dep.to_owned());
    }
}

/// The full, ordered set of components to install for a request.
///
/// Each requested name (lowercased) contributes its dependencies followed by
/// itself; repeats keep their first position. Fails with
/// [`RegistryError::UnknownComponents`] naming every requested component
/// that is not in the catalog, before anything is resolved.
///
/// ```
/// use windkit_registry::{Registry, resolve_install_set};
///
/// let set = resolve_install_set(Registry::builtin(), &["Calendar", "button"]).unwrap();
/// assert_eq!(set, ["button", "calendar"]);
/// ```
pub fn resolve_install_set<S: AsRef<str>>(
    registry: &Registry,
    requested: &[S],
) -> Result<Vec<String>, RegistryError> {
    let names: Vec<String> = requested
        .iter()
        .map(|name| name.as_ref().to_lowercase())
        .collect();

    let unknown: Vec<String> = names
        .iter()
        .filter(|name| !registry.contains(name))
        .cloned()
        .collect();
    if !unknown.is_empty() {
        return Err(RegistryError::UnknownComponents(unknown));
    }

    let mut seen = AHashSet::new();
    let mut install = Vec::new();
    for name in names {
        let deps = resolve_dependencies(registry, &name);
        for component in deps.into_iter().chain(std::iter::once(name)) {
            if seen.insert(component.clone()) {
                install.push(component);
            }
        }
    }

    tracing::debug!(count = install.len(), "install set resolved");
    Ok(install)
}
