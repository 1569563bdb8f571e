//! Scaffolding for LaTeX articles: writes `main.tex`, `preamble.tex` and
//! optionally an empty `bibliography.bib`, either from the built-in layout or
//! copied from a template directory.
//!
//! A run is [`resolve_settings`] followed by [`run`], which checks for
//! conflicts ([`guard`]), builds both documents in memory ([`compose`]) and
//! only then touches the disk ([`writer`]).

pub mod args;
pub mod compose;
pub mod config;
pub mod error;
pub mod guard;
pub mod log;
pub mod settings;
pub mod writer;

use anyhow::Result;
use std::path::{Path, PathBuf};

use args::Args;
use config::ConfigSearch;
use settings::Settings;

pub const MAIN_FILE: &str = "main.tex";
pub const PREAMBLE_FILE: &str = "preamble.tex";
pub const BIBLIOGRAPHY_FILE: &str = "bibliography.bib";

/// Looks for a configuration file next to the target, in `cwd` and in the
/// user's home, then merges it with `args`.
///
/// # Errors
///
/// Returns an error if a configuration file exists but is malformed, or if
/// the section selected with `--template` does not exist.
pub fn resolve_settings(args: &Args, cwd: &Path) -> Result<Settings> {
    let search = ConfigSearch::default_paths(&cwd.join(&args.directory), cwd);
    let config = search.load()?;

    Settings::resolve(args, config.as_ref())
}

/// Generates the project described by `settings` relative to `cwd` and
/// returns the created files.
///
/// # Errors
///
/// Fails without writing anything if a target already exists or a template
/// file is missing. IO errors while writing are returned as they happen.
pub fn run(settings: &Settings, cwd: &Path) -> Result<Vec<PathBuf>> {
    guard::check(settings, cwd)?;
    let composed = compose::compose(settings, cwd)?;

    writer::write(settings, cwd, &composed)
}
