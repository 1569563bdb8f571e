use std::path::Path;

use crate::{
    error::ScaffoldError, settings::Settings, trace, BIBLIOGRAPHY_FILE, MAIN_FILE, PREAMBLE_FILE,
};

/// Refuses to run if generating the project would clobber anything.
///
/// Only reads the filesystem. Every check runs before the first write.
///
/// # Errors
///
/// - [`ScaffoldError::DirectoryExists`] if the target directory already exists.
/// - [`ScaffoldError::FileExists`] if the target directory name is taken by a
///   file, or, when writing into `cwd`, if one of the files to generate is
///   already there.
pub fn check(settings: &Settings, cwd: &Path) -> Result<(), ScaffoldError> {
    let out = settings.output_dir(cwd);

    if !settings.use_current_directory() {
        trace!("Checking target directory {}", out.display());

        return if out.is_dir() {
            Err(ScaffoldError::DirectoryExists(out))
        } else if out.exists() {
            Err(ScaffoldError::FileExists(out))
        } else {
            Ok(())
        };
    }

    let bibliography = settings
        .include_bibliography()
        .then_some(BIBLIOGRAPHY_FILE);

    for name in [Some(MAIN_FILE), Some(PREAMBLE_FILE), bibliography]
        .into_iter()
        .flatten()
    {
        let path = out.join(name);
        trace!("Checking {}", path.display());

        if path.exists() {
            return Err(ScaffoldError::FileExists(path));
        }
    }

    Ok(())
}
