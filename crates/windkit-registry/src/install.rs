#![forbid(unsafe_code)]

//! Planning and applying component installs into a project.
//!
//! [`InstallPlan::build`] is pure: it decides, per component file, where the
//! source comes from, where it goes, and whether an existing destination is
//! kept. [`InstallPlan::apply`] performs the writes.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Component not in catalog | Dangling dependency in install set | Skipped with a warning |
//! | Destination exists | File already installed | `FileAction::Skip` unless `overwrite` |
//! | Package source missing | Component not built for this language | Placeholder written, warning logged |
//! | Write fails | Permissions, disk | `RegistryError::Io`, earlier writes kept |

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use ahash::AHashSet;
use regex_lite::{NoExpand, Regex};

use crate::config::ProjectConfig;
use crate::error::RegistryError;
use crate::registry::Registry;

/// What happens to one planned file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    /// Destination does not exist yet.
    Create,
    /// Destination exists and will be replaced.
    Overwrite,
    /// Destination exists and is kept.
    Skip,
}

/// One component file in an install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub component: String,
    /// Relative to the windkit package root.
    pub source: PathBuf,
    /// Relative to the project root.
    pub destination: PathBuf,
    pub action: FileAction,
}

/// Ordered file operations for an install set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallPlan {
    typescript: bool,
    files: Vec<PlannedFile>,
    dev_dependencies: Vec<String>,
}

impl InstallPlan {
    /// Plan an install of `install_set` (as from
    /// [`resolve_install_set`](crate::resolve_install_set)).
    ///
    /// `exists` is asked about each destination, relative to the project root.
    ///
    /// ```
    /// use std::path::Path;
    /// use windkit_registry::{FileAction, InstallPlan, ProjectConfig, Registry};
    ///
    /// let config = ProjectConfig::default();
    /// let set = vec!["button".to_owned(), "calendar".to_owned()];
    /// let installed = Path::new("src/components/ui/button.ts");
    ///
    /// let plan = InstallPlan::build(Registry::builtin(), &config, &set, false, |p| p == installed);
    /// assert_eq!(plan.files()[0].action, FileAction::Skip);
    /// assert_eq!(plan.files()[1].action, FileAction::Create);
    /// ```
    pub fn build(
        registry: &Registry,
        config: &ProjectConfig,
        install_set: &[String],
        overwrite: bool,
        exists: impl Fn(&Path) -> bool,
    ) -> Self {
        let ext = config.extension();
        let component_dir = Path::new(&config.component_dir);
        let mut files = Vec::new();
        let mut dev_dependencies = AHashSet::new();

        for name in install_set {
            let Some(entry) = registry.get(name) else {
                tracing::warn!(component = %name, "component not in registry; skipped");
                continue;
            };
            dev_dependencies.extend(entry.dev_dependencies.iter().cloned());

            for file in &entry.files {
                let destination = component_dir.join(with_extension(file, ext));
                let action = match (exists(&destination), overwrite) {
                    (false, _) => FileAction::Create,
                    (true, true) => FileAction::Overwrite,
                    (true, false) => FileAction::Skip,
                };
                files.push(PlannedFile {
                    component: name.clone(),
                    source: package_source(name, config.typescript),
                    destination,
                    action,
                });
            }
        }

        let mut dev_dependencies: Vec<String> = dev_dependencies.into_iter().collect();
        dev_dependencies.sort();

        tracing::debug!(
            files = files.len(),
            dev_dependencies = dev_dependencies.len(),
            overwrite,
            "install planned"
        );
        Self {
            typescript: config.typescript,
            files,
            dev_dependencies,
        }
    }

    pub fn files(&self) -> &[PlannedFile] {
        &self.files
    }

    /// Files that will be written.
    pub fn writes(&self) -> impl Iterator<Item = &PlannedFile> {
        self.files.iter().filter(|f| f.action != FileAction::Skip)
    }

    /// Files kept as they are.
    pub fn skipped(&self) -> impl Iterator<Item = &PlannedFile> {
        self.files.iter().filter(|f| f.action == FileAction::Skip)
    }

    /// Components with at least one file written, in install order.
    pub fn installed_components(&self) -> Vec<&str> {
        unique_components(self.writes())
    }

    /// Components with at least one file kept, in install order.
    pub fn skipped_components(&self) -> Vec<&str> {
        unique_components(self.skipped())
    }

    /// External packages the installed components need, sorted.
    pub fn dev_dependencies(&self) -> &[String] {
        &self.dev_dependencies
    }

    /// Copy every non-skipped file from `package_root` into `project_root`,
    /// rewriting the utils import for the project layout.
    ///
    /// Returns the number of files written.
    pub fn apply(&self, package_root: &Path, project_root: &Path) -> Result<usize, RegistryError> {
        let mut written = 0;
        for file in self.writes() {
            let source = package_root.join(&file.source);
            let content = match std::fs::read_to_string(&source) {
                Ok(content) => rewrite_utils_import(&content, self.typescript),
                Err(err) => {
                    tracing::warn!(
                        component = %file.component,
                        source = %source.display(),
                        error = %err,
                        "component source unreadable; writing placeholder"
                    );
                    missing_component_placeholder(&file.component)
                }
            };

            let destination = project_root.join(&file.destination);
            if let Some(parent) = destination.parent() {
                std::fs::create_dir_all(parent).map_err(|source| RegistryError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            std::fs::write(&destination, content).map_err(|source| RegistryError::Io {
                path: destination.clone(),
                source,
            })?;

            tracing::debug!(
                component = %file.component,
                destination = %destination.display(),
                "component written"
            );
            written += 1;
        }
        Ok(written)
    }
}

/// Point a component's utils import at the project's `lib` directory.
///
/// Components ship importing `'../lib/utils'`; installed one level deeper
/// they need `'../../lib/utils'`, with an explicit `.js` in JavaScript
/// projects.
///
/// ```
/// use windkit_registry::rewrite_utils_import;
///
/// let src = "import { cn } from \"../lib/utils\";";
/// assert_eq!(rewrite_utils_import(src, true), "import { cn } from '../../lib/utils';");
/// assert_eq!(rewrite_utils_import(src, false), "import { cn } from '../../lib/utils.js';");
/// ```
pub fn rewrite_utils_import(content: &str, typescript: bool) -> String {
    let replacement = if typescript {
        "from '../../lib/utils'"
    } else {
        "from '../../lib/utils.js'"
    };
    match utils_import() {
        Some(re) => re.replace_all(content, NoExpand(replacement)).into_owned(),
        None => content.to_owned(),
    }
}

/// `from '../lib/utils'` with either quote style.
fn utils_import() -> Option<&'static Regex> {
    static UTILS_IMPORT: OnceLock<Option<Regex>> = OnceLock::new();
    UTILS_IMPORT
        .get_or_init(|| Regex::new(r#"from ['"]\.\./lib/utils['"]"#).ok())
        .as_ref()
}

fn with_extension(file: &str, ext: &str) -> String {
    match file.strip_suffix(".ts") {
        Some(stem) => format!("{stem}.{ext}"),
        None => file.to_owned(),
    }
}

fn package_source(name: &str, typescript: bool) -> PathBuf {
    if typescript {
        Path::new("src").join("components").join(format!("{name}.ts"))
    } else {
        Path::new("dist").join("components").join(format!("{name}.js"))
    }
}

fn missing_component_placeholder(name: &str) -> String {
    format!("// Component {name} not found\n// Please check the component name and try again\n")
}

fn unique_components<'a>(files: impl Iterator<Item = &'a PlannedFile>) -> Vec<&'a str> {
    let mut seen = AHashSet::new();
    files
        .map(|f| f.component.as_str())
        .filter(|name| seen.insert(*name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_owned()).collect()
    }

    #[test]
    fn typescript_paths() {
        let config = ProjectConfig::default();
        let install = set(&["calendar"]);
        let plan = InstallPlan::build(Registry::builtin(), &config, &install, false, |_| false);

        let file = &plan.files()[0];
        assert_eq!(file.component, "calendar");
        assert_eq!(file.destination, Path::new("src/components/ui/calendar.ts"));
        assert_eq!(file.source, Path::new("src/components/calendar.ts"));
        assert_eq!(file.action, FileAction::Create);
    }

    #[test]
    fn javascript_paths() {
        let config = ProjectConfig {
            typescript: false,
            component_dir: "components".into(),
            ..ProjectConfig::default()
        };
        let install = set(&["button"]);
        let plan = InstallPlan::build(Registry::builtin(), &config, &install, false, |_| false);

        let file = &plan.files()[0];
        assert_eq!(file.destination, Path::new("components/button.js"));
        assert_eq!(file.source, Path::new("dist/components/button.js"));
    }

    #[test]
    fn existing_files_skipped_unless_overwrite() {
        let config = ProjectConfig::default();
        let install = set(&["button", "calendar"]);
        let exists = |p: &Path| p.ends_with("button.ts");

        let plan = InstallPlan::build(Registry::builtin(), &config, &install, false, exists);
        assert_eq!(plan.installed_components(), ["calendar"]);
        assert_eq!(plan.skipped_components(), ["button"]);

        let plan = InstallPlan::build(Registry::builtin(), &config, &install, true, exists);
        assert_eq!(plan.files()[0].action, FileAction::Overwrite);
        assert_eq!(plan.installed_components(), ["button", "calendar"]);
        assert!(plan.skipped_components().is_empty());
    }

    #[test]
    fn dev_dependencies_sorted_and_unique() {
        let config = ProjectConfig::default();
        let plan = InstallPlan::build(
            Registry::builtin(),
            &config,
            &set(&["sonner", "chart", "button"]),
            false,
            |_| false,
        );
        assert_eq!(plan.dev_dependencies(), ["chart.js", "sonner"]);
    }

    #[test]
    fn unknown_component_is_skipped() {
        let config = ProjectConfig::default();
        let install = set(&["ghost", "badge"]);
        let plan = InstallPlan::build(Registry::builtin(), &config, &install, false, |_| false);
        assert_eq!(plan.files().len(), 1);
        assert_eq!(plan.files()[0].component, "badge");
    }

    #[test]
    fn utils_import_pattern_compiles() {
        let re = utils_import().unwrap();
        assert!(re.is_match("from \"../lib/utils\""));
        assert!(!re.is_match("from '../lib/utilities'"));
    }

    #[test]
    fn rewrite_handles_both_quote_styles() {
        let src = "import { cn } from '../lib/utils';\nimport { Portal } from \"../lib/utils\";\n";
        assert_eq!(
            rewrite_utils_import(src, true),
            "import { cn } from '../../lib/utils';\nimport { Portal } from '../../lib/utils';\n"
        );
    }

    #[test]
    fn rewrite_leaves_other_imports() {
        let src = "import x from './button';\nimport y from '../lib/utilities';\nconst from = 1;";
        assert_eq!(rewrite_utils_import(src, false), src);
    }

    #[test]
    fn rewrite_javascript_adds_extension() {
        assert_eq!(
            rewrite_utils_import("export { cn } from '../lib/utils'", false),
            "export { cn } from '../../lib/utils.js'"
        );
    }

    #[test]
    fn extension_swap_only_touches_suffix() {
        assert_eq!(with_extension("date.tsx.ts", "js"), "date.tsx.js");
        assert_eq!(with_extension("styles.css", "js"), "styles.css");
    }
}
