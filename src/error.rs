use std::path::PathBuf;

use thiserror::Error;

/// Conditions that stop a scaffolding run before or while touching the disk.
///
/// These travel inside [`anyhow::Error`]; callers that need to tell them
/// apart use [`anyhow::Error::downcast_ref`].
#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("Directory '{}' already exists!", .0.display())]
    DirectoryExists(PathBuf),

    #[error("'{}' already exists!", .0.display())]
    FileExists(PathBuf),

    #[error("Template file '{}' does not exist", .0.display())]
    TemplateFileMissing(PathBuf),

    #[error("Failed to read configuration file '{}': {reason}", .path.display())]
    ConfigFileUnreadable { path: PathBuf, reason: String },

    #[error("{}", section_missing(.section, .path.as_ref()))]
    ConfigSectionMissing {
        section: String,
        path: Option<PathBuf>,
    },
}

fn section_missing(section: &str, path: Option<&PathBuf>) -> String {
    match path {
        Some(path) => format!(
            "No section [{section}] in configuration file '{}'",
            path.display()
        ),
        None => format!(
            "Template section [{section}] requested but no configuration file was found"
        ),
    }
}
