use anyhow::{Context, Result};
use std::{
    fs::{self, File},
    io::{BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
};

use crate::{
    compose::{Composed, Document},
    error::ScaffoldError,
    settings::Settings,
    trace, BIBLIOGRAPHY_FILE, MAIN_FILE, PREAMBLE_FILE,
};

/// Persists `composed` and returns the paths written, in order.
///
/// Writes happen one after the other; nothing is rolled back if a later
/// one fails.
///
/// # Errors
///
/// Returns [`ScaffoldError::DirectoryExists`] if the target directory
/// appeared after the guard ran, or any IO error with the path as context.
pub fn write(settings: &Settings, cwd: &Path, composed: &Composed) -> Result<Vec<PathBuf>> {
    let out = settings.output_dir(cwd);

    if !settings.use_current_directory() {
        trace!("Creating directory {}", out.display());

        match fs::create_dir(&out) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(ScaffoldError::DirectoryExists(out).into())
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to create {}", out.display()))
            }
        }
    }

    let mut written = Vec::with_capacity(3);

    for (name, doc) in [(MAIN_FILE, &composed.main), (PREAMBLE_FILE, &composed.preamble)] {
        let path = out.join(name);
        write_document(&path, doc)?;
        written.push(path);
    }

    if settings.include_bibliography() {
        let path = out.join(BIBLIOGRAPHY_FILE);
        trace!("Creating empty {}", path.display());

        File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
        written.push(path);
    }

    Ok(written)
}

fn write_document(path: &Path, doc: &Document) -> Result<()> {
    trace!("Writing {} lines to {}", doc.len(), path.display());

    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut target = BufWriter::new(file);

    doc.write_to(&mut target)
        .and_then(|()| target.flush().map_err(Into::into))
        .with_context(|| format!("Failed to write {}", path.display()))
}
