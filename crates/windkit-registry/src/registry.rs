#![forbid(unsafe_code)]

//! Component catalog keyed by slug.
//!
//! # Invariants
//!
//! 1. **Lowercase keys**: slugs and dependency names are lowercased on load,
//!    and every lookup lowercases its argument, so `"Button"` and `"button"`
//!    name the same component.
//!
//! 2. **Declaration order**: [`Registry::names`] yields slugs in the order
//!    the catalog declared them, for both the builtin table and JSON input.
//!
//! 3. **Immutable**: a `Registry` never changes after construction; the
//!    builtin one is built once per process and shared.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Unknown name | Not in catalog | `get()` returns `None` |
//! | Malformed JSON | Bad syntax or schema | `RegistryError::Json` |
//! | Duplicate slug | Keys equal after lowercasing | `RegistryError::DuplicateComponent` |
//! | Dangling dependency | Dependency names no entry | Reported by `dangling_dependencies()` |
//! | Cyclic dependencies | Catalog data loops | Reported by `find_cycle()` |

use std::sync::OnceLock;

use ahash::AHashMap;

use crate::builtin::BUILTIN_COMPONENTS;
use crate::entry::ComponentEntry;
use crate::error::RegistryError;

static BUILTIN: OnceLock<Registry> = OnceLock::new();

/// A catalog of components.
///
/// # Example
///
/// ```
/// use windkit_registry::Registry;
///
/// let registry = Registry::builtin();
/// let picker = registry.get("Date-Picker").unwrap();
/// assert_eq!(picker.name, "DatePicker");
/// assert_eq!(registry.names().next(), Some("accordion"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Registry {
    slugs: Vec<String>,
    entries: AHashMap<String, ComponentEntry>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    InProgress,
    Done,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog of components shipped with windkit.
    pub fn builtin() -> &'static Registry {
        BUILTIN.get_or_init(|| {
            let mut registry = Registry::new();
            for component in BUILTIN_COMPONENTS {
                let entry = ComponentEntry::new(component.name)
                    .files(component.files.iter().copied())
                    .dependencies(component.dependencies.iter().copied())
                    .dev_dependencies(component.dev_dependencies.iter().copied());
                if registry.insert(component.slug, entry).is_err() {
                    tracing::warn!(slug = component.slug, "duplicate builtin component ignored");
                }
            }
            tracing::debug!(components = registry.len(), "builtin registry initialized");
            registry
        })
    }

    /// Parse a catalog: a JSON object mapping slug to entry.
    ///
    /// ```
    /// use windkit_registry::Registry;
    ///
    /// let registry = Registry::from_json(r#"{
    ///     "button":   {"name": "Button",   "files": ["button.ts"],   "dependencies": ["utils"]},
    ///     "calendar": {"name": "Calendar", "files": ["calendar.ts"], "dependencies": ["utils", "button"]}
    /// }"#).unwrap();
    /// assert_eq!(registry.names().collect::<Vec<_>>(), ["button", "calendar"]);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let raw: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(json).map_err(|e| RegistryError::json("registry", e))?;

        let mut registry = Registry::new();
        for (slug, value) in raw {
            let entry: ComponentEntry = serde_json::from_value(value)
                .map_err(|e| RegistryError::json("registry entry", e))?;
            registry.insert(&slug, entry)?;
        }

        tracing::debug!(components = registry.len(), "registry loaded from json");
        Ok(registry)
    }

    /// Add `entry` under `slug`, normalizing names to lowercase.
    pub fn insert(&mut self, slug: &str, mut entry: ComponentEntry) -> Result<(), RegistryError> {
        let slug = slug.to_lowercase();
        if self.entries.contains_key(&slug) {
            return Err(RegistryError::DuplicateComponent(slug));
        }
        for dep in &mut entry.dependencies {
            *dep = dep.to_lowercase();
        }
        self.slugs.push(slug.clone());
        self.entries.insert(slug, entry);
        Ok(())
    }

    /// Look up a component, ignoring case.
    pub fn get(&self, name: &str) -> Option<&ComponentEntry> {
        self.entries.get(name.to_lowercase().as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Slugs in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slugs.iter().map(String::as_str)
    }

    /// `(slug, entry)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ComponentEntry)> {
        self.slugs
            .iter()
            .filter_map(|slug| self.entries.get(slug).map(|entry| (slug.as_str(), entry)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slugs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slugs.is_empty()
    }

    // --- Diagnostics ---

    /// `(component, dependency)` pairs whose dependency is not in the catalog.
    pub fn dangling_dependencies(&self) -> Vec<(String, String)> {
        let entries = &self.entries;
        self.iter()
            .flat_map(|(slug, entry)| {
                entry
                    .prerequisites()
                    .filter(move |dep| !entries.contains_key(*dep))
                    .map(move |dep| (slug.to_owned(), dep.to_owned()))
            })
            .collect()
    }

    /// The first dependency cycle found, walking components in declaration
    /// order; the path starts and ends with the same slug.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let mut state: AHashMap<&str, Visit> = AHashMap::new();
        let mut path: Vec<&str> = Vec::new();
        self.names()
            .find_map(|slug| self.visit(slug, &mut state, &mut path))
    }

    fn visit<'a>(
        &'a self,
        slug: &'a str,
        state: &mut AHashMap<&'a str, Visit>,
        path: &mut Vec<&'a str>,
    ) -> Option<Vec<String>> {
        match state.get(slug) {
            Some(Visit::Done) => return None,
            Some(Visit::InProgress) => {
                let start = path.iter().position(|s| *s == slug)?;
                let mut cycle: Vec<String> =
                    path[start..].iter().map(|s| (*s).to_owned()).collect();
                cycle.push(slug.to_owned());
                return Some(cycle);
            }
            None => {}
        }

        let entry = self.entries.get(slug)?;
        state.insert(slug, Visit::InProgress);
        path.push(slug);
        for dep in entry.prerequisites() {
            if let Some(cycle) = self.visit(dep, state, path) {
                return Some(cycle);
            }
        }
        path.pop();
        state.insert(slug, Visit::Done);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::UTILS;

    fn small() -> Registry {
        let mut registry = Registry::new();
        registry
            .insert("button", ComponentEntry::new("Button").dependencies([UTILS]))
            .unwrap();
        registry
            .insert(
                "calendar",
                ComponentEntry::new("Calendar").dependencies([UTILS, "Button"]),
            )
            .unwrap();
        registry
    }

    #[test]
    fn builtin_has_every_component() {
        let registry = Registry::builtin();
        assert_eq!(registry.len(), 77);
        assert_eq!(registry.len(), BUILTIN_COMPONENTS.len());
        assert!(registry.contains("button"));
        assert!(registry.contains("sonner"));
    }

    #[test]
    fn builtin_is_shared() {
        assert!(std::ptr::eq(Registry::builtin(), Registry::builtin()));
    }

    #[test]
    fn builtin_is_consistent() {
        let registry = Registry::builtin();
        assert!(registry.dangling_dependencies().is_empty());
        assert_eq!(registry.find_cycle(), None);
        for (slug, entry) in registry.iter() {
            assert_eq!(entry.files, [format!("{slug}.ts")], "{slug}");
            assert_eq!(entry.dependencies.first().map(String::as_str), Some(UTILS));
        }
    }

    #[test]
    fn builtin_dev_dependencies() {
        let registry = Registry::builtin();
        assert_eq!(registry.get("chart").unwrap().dev_dependencies, ["chart.js"]);
        assert_eq!(registry.get("sonner").unwrap().dev_dependencies, ["sonner"]);
        assert!(registry.get("button").unwrap().dev_dependencies.is_empty());
    }

    #[test]
    fn lookup_ignores_case() {
        let registry = small();
        assert_eq!(registry.get("BUTTON").unwrap().name, "Button");
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn dependencies_are_lowercased() {
        let registry = small();
        assert_eq!(registry.get("calendar").unwrap().dependencies, [UTILS, "button"]);
    }

    #[test]
    fn duplicate_slug_rejected() {
        let mut registry = small();
        let err = registry
            .insert("Button", ComponentEntry::new("Other"))
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateComponent(ref s) if s == "button"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn from_json_keeps_declaration_order() {
        let registry = Registry::from_json(
            r#"{
                "zeta": {"name": "Zeta", "dependencies": ["utils"]},
                "alpha": {"name": "Alpha", "dependencies": ["utils", "zeta"]},
                "mid": {"name": "Mid"}
            }"#,
        )
        .unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn from_json_rejects_bad_input() {
        assert!(matches!(
            Registry::from_json("[1, 2]"),
            Err(RegistryError::Json { what: "registry", .. })
        ));
        assert!(matches!(
            Registry::from_json(r#"{"a": {"files": []}}"#),
            Err(RegistryError::Json {
                what: "registry entry",
                ..
            })
        ));
        assert!(matches!(
            Registry::from_json(r#"{"a": {"name": "A"}, "A": {"name": "B"}}"#),
            Err(RegistryError::DuplicateComponent(_))
        ));
    }

    #[test]
    fn dangling_dependencies_reported() {
        let registry = Registry::from_json(
            r#"{"form": {"name": "Form", "dependencies": ["utils", "field", "button"]},
                "button": {"name": "Button", "dependencies": ["utils"]}}"#,
        )
        .unwrap();
        assert_eq!(
            registry.dangling_dependencies(),
            [("form".to_owned(), "field".to_owned())]
        );
    }

    #[test]
    fn cycle_found() {
        let registry = Registry::from_json(
            r#"{"a": {"name": "A", "dependencies": ["b"]},
                "b": {"name": "B", "dependencies": ["c"]},
                "c": {"name": "C", "dependencies": ["a"]},
                "d": {"name": "D"}}"#,
        )
        .unwrap();
        assert_eq!(
            registry.find_cycle(),
            Some(vec!["a".into(), "b".into(), "c".into(), "a".into()])
        );
    }

    #[test]
    fn self_cycle_found() {
        let registry =
            Registry::from_json(r#"{"loop": {"name": "Loop", "dependencies": ["loop"]}}"#)
                .unwrap();
        assert_eq!(
            registry.find_cycle(),
            Some(vec!["loop".to_owned(), "loop".to_owned()])
        );
    }

    #[test]
    fn shared_dependency_is_not_a_cycle() {
        let registry = Registry::from_json(
            r#"{"picker": {"name": "Picker", "dependencies": ["calendar", "button"]},
                "calendar": {"name": "Calendar", "dependencies": ["button"]},
                "button": {"name": "Button"}}"#,
        )
        .unwrap();
        assert_eq!(registry.find_cycle(), None);
    }
}
