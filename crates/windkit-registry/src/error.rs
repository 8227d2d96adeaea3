#![forbid(unsafe_code)]

use std::path::PathBuf;

/// Errors from loading catalogs and project configuration, or from
/// validating an install request.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// One or more requested components are not in the catalog.
    #[error("unknown components: {}", .0.join(", "))]
    UnknownComponents(Vec<String>),

    /// Two catalog keys collide after lowercasing.
    #[error("duplicate component '{0}'")]
    DuplicateComponent(String),

    /// A catalog or config document is not valid JSON for its schema.
    #[error("invalid {what}: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// `components.json` does not exist where it was looked for.
    #[error("{} not found; initialize the project first", .0.display())]
    NotInitialized(PathBuf),

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RegistryError {
    pub(crate) fn json(what: &'static str, source: serde_json::Error) -> Self {
        Self::Json { what, source }
    }
}
