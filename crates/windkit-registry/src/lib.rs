#![forbid(unsafe_code)]

//! Component catalog and install planning for windkit.
//!
//! - [`Registry`]: the static catalog of distributable components
//! - [`resolve_dependencies`] / [`resolve_install_set`]: prerequisite ordering
//! - [`ProjectConfig`]: the project's `components.json`
//! - [`InstallPlan`]: which files to copy where, and which to leave alone

mod builtin;
pub mod config;
pub mod entry;
pub mod error;
pub mod install;
pub mod registry;
pub mod resolve;

pub use config::{CONFIG_FILE_NAME, ProjectConfig};
pub use entry::{ComponentEntry, UTILS};
pub use error::RegistryError;
pub use install::{FileAction, InstallPlan, PlannedFile, rewrite_utils_import};
pub use registry::Registry;
pub use resolve::{resolve_dependencies, resolve_install_set};
