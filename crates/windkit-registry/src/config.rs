#![forbid(unsafe_code)]

//! Project configuration stored in `components.json`.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::RegistryError;

/// File name of the project configuration, at the project root.
pub const CONFIG_FILE_NAME: &str = "components.json";

pub const DEFAULT_COMPONENT_DIR: &str = "src/components/ui";
pub const DEFAULT_UTILS_DIR: &str = "src/lib";
pub const DEFAULT_CSS_FILE: &str = "src/styles/globals.css";

/// Where a project keeps its components and which language it uses.
///
/// Missing fields take their defaults; an empty `tailwindConfig` means none.
///
/// ```
/// use windkit_registry::ProjectConfig;
///
/// let config = ProjectConfig::from_json(r#"{"typescript": false}"#).unwrap();
/// assert_eq!(config.extension(), "js");
/// assert_eq!(config.component_dir, "src/components/ui");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectConfig {
    pub typescript: bool,
    pub component_dir: String,
    pub utils_dir: String,
    pub css_file: String,
    #[serde(
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub tailwind_config: Option<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            typescript: true,
            component_dir: DEFAULT_COMPONENT_DIR.to_owned(),
            utils_dir: DEFAULT_UTILS_DIR.to_owned(),
            css_file: DEFAULT_CSS_FILE.to_owned(),
            tailwind_config: None,
        }
    }
}

impl ProjectConfig {
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        serde_json::from_str(json).map_err(|e| RegistryError::json(CONFIG_FILE_NAME, e))
    }

    /// Read `components.json` from `project_root`.
    ///
    /// A missing file is [`RegistryError::NotInitialized`].
    pub fn load(project_root: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = project_root.as_ref().join(CONFIG_FILE_NAME);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(RegistryError::NotInitialized(path));
            }
            Err(source) => return Err(RegistryError::Io { path, source }),
        };

        let config = Self::from_json(&text)?;
        tracing::debug!(
            path = %path.display(),
            typescript = config.typescript,
            component_dir = %config.component_dir,
            "project config loaded"
        );
        Ok(config)
    }

    /// Pretty JSON as written by `init`.
    pub fn to_json_pretty(&self) -> Result<String, RegistryError> {
        serde_json::to_string_pretty(self).map_err(|e| RegistryError::json(CONFIG_FILE_NAME, e))
    }

    /// Source file extension for this project: `"ts"` or `"js"`.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        if self.typescript { "ts" } else { "js" }
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
