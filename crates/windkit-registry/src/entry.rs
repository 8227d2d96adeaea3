#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

/// Pseudo-dependency every component carries; installed by `init`, never resolved.
pub const UTILS: &str = "utils";

/// One distributable component: its display name, source files, and the
/// other components it needs.
///
/// Serialized with the catalog's camelCase field names:
///
/// ```
/// use windkit_registry::ComponentEntry;
///
/// let entry: ComponentEntry = serde_json::from_str(
///     r#"{"name": "Chart", "files": ["chart.ts"], "dependencies": ["utils"],
///        "devDependencies": ["chart.js"]}"#,
/// ).unwrap();
/// assert_eq!(entry.dev_dependencies, ["chart.js"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentEntry {
    pub name: String,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dev_dependencies: Vec<String>,
}

impl ComponentEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn dev_dependencies<I, S>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dev_dependencies = packages.into_iter().map(Into::into).collect();
        self
    }

    /// Dependencies that name other components (everything but [`UTILS`]).
    pub fn prerequisites(&self) -> impl Iterator<Item = &str> {
        self.dependencies
            .iter()
            .map(String::as_str)
            .filter(|dep| *dep != UTILS)
    }
}
