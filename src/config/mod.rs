mod parser;
pub mod token;

use anyhow::Result;
use derive_builder::Builder;
use directories::UserDirs;
use std::path::{Path, PathBuf};

pub use parser::Section;

use crate::{error::ScaffoldError, trace};

/// Name of the configuration file looked up by [`ConfigSearch`].
pub const CONFIG_FILE_NAME: &str = "scripts_config.cfg";

/// Section whose entries act as fallbacks for every other section.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// A parsed INI configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    origin: PathBuf,
    sections: Vec<Section>,
}

impl ConfigFile {
    /// Reads and parses the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::ConfigFileUnreadable`] if the file can not be
    /// read or is not valid INI.
    pub fn read(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ScaffoldError::ConfigFileUnreadable {
                path: path.to_owned(),
                reason: e.to_string(),
            })?;

        Self::parse(&contents, path)
    }

    /// Parses `s` as INI. `origin` is only used for error locations and to
    /// resolve relative paths stored in the file.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::ConfigFileUnreadable`] with the offending line
    /// if `s` is malformed.
    pub fn parse(s: &str, origin: &Path) -> Result<Self> {
        let read = || -> Result<Vec<Section>> {
            let mut lines = parser::lex(s, &format!("{}", origin.display()))?;
            parser::parse_sections(&mut lines)
        };

        let sections = read().map_err(|e| ScaffoldError::ConfigFileUnreadable {
            path: origin.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(ConfigFile {
            origin: origin.to_owned(),
            sections,
        })
    }

    #[must_use]
    pub fn origin(&self) -> &Path {
        &self.origin
    }

    /// Directory holding the file, used as base for relative paths.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        self.origin.parent().unwrap_or(Path::new(""))
    }

    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    #[must_use]
    pub fn has_section(&self, name: &str) -> bool {
        self.section(name).is_some()
    }

    fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Looks `key` up in `section`, falling back to [`DEFAULT_SECTION`].
    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        let key = key.to_lowercase();

        [section, DEFAULT_SECTION]
            .into_iter()
            .filter_map(|name| self.section(name))
            .find_map(|s| s.entries.get(&key))
            .map(String::as_str)
    }

    /// Boolean lookup accepting the same spellings as Python's `configparser`.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::ConfigFileUnreadable`] if the value is set but
    /// is not a recognised boolean.
    pub fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>> {
        let Some(value) = self.get(section, key) else {
            return Ok(None);
        };

        match value.to_lowercase().as_str() {
            "1" | "yes" | "true" | "on" => Ok(Some(true)),
            "0" | "no" | "false" | "off" => Ok(Some(false)),
            _ => Err(ScaffoldError::ConfigFileUnreadable {
                path: self.origin.clone(),
                reason: format!("`{key} = {value}` in [{section}] is not a boolean"),
            }
            .into()),
        }
    }

    /// Every key visible from `section`, including inherited defaults.
    #[must_use]
    pub fn keys(&self, section: &str) -> Vec<&str> {
        let mut keys = [section, DEFAULT_SECTION]
            .into_iter()
            .filter_map(|name| self.section(name))
            .flat_map(|s| s.entries.keys().map(String::as_str))
            .collect::<Vec<_>>();

        keys.sort_unstable();
        keys.dedup();
        keys
    }
}

/// Ordered list of directories searched for [`CONFIG_FILE_NAME`].
#[derive(Builder, Debug, Clone)]
#[builder(setter(into))]
pub struct ConfigSearch {
    target_dir: PathBuf,
    current_dir: PathBuf,
    #[builder(default, setter(into, strip_option))]
    user_home: Option<PathBuf>,
    #[builder(default = "CONFIG_FILE_NAME.to_string()")]
    file_name: String,
}

impl ConfigSearch {
    /// Create a new [`ConfigSearch`] builder
    #[must_use]
    pub fn builder() -> ConfigSearchBuilder {
        ConfigSearchBuilder::default()
    }

    /// Search roots for a project generated into `target_dir` from `cwd`:
    /// the target directory, the working directory and the user's home.
    #[must_use]
    pub fn default_paths(target_dir: &Path, cwd: &Path) -> Self {
        ConfigSearch {
            target_dir: target_dir.to_owned(),
            current_dir: cwd.to_owned(),
            user_home: Self::get_user_home(),
            file_name: CONFIG_FILE_NAME.to_string(),
        }
    }

    /// Returns the path for the user home `~/`, if one can be determined
    #[must_use]
    pub fn get_user_home() -> Option<PathBuf> {
        UserDirs::new().map(|dirs| dirs.home_dir().to_owned())
    }

    /// Candidate file paths in priority order.
    #[must_use]
    pub fn candidates(&self) -> Vec<PathBuf> {
        [
            Some(&self.target_dir),
            Some(&self.current_dir),
            self.user_home.as_ref(),
        ]
        .into_iter()
        .flatten()
        .map(|dir| dir.join(&self.file_name))
        .collect()
    }

    /// First existing configuration file, if any.
    #[must_use]
    pub fn locate(&self) -> Option<PathBuf> {
        self.candidates().into_iter().find(|candidate| {
            let found = candidate.is_file();
            trace!(
                "Config candidate {}: {}",
                candidate.display(),
                if found { "found" } else { "absent" }
            );
            found
        })
    }

    /// Locates and parses the configuration file. Not finding one is not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::ConfigFileUnreadable`] if a file was found
    /// but could not be read or parsed.
    pub fn load(&self) -> Result<Option<ConfigFile>> {
        self.locate()
            .map(|path| ConfigFile::read(&path))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigFile, ConfigSearch, CONFIG_FILE_NAME};
    use crate::error::ScaffoldError;
    use std::path::Path;

    const SAMPLE: &str = "\
[DEFAULT]
author = Ada Lovelace
bib = no

[thesis]
title = On Engines
bib = Yes
template_path = templates/thesis
";

    fn sample() -> ConfigFile {
        ConfigFile::parse(SAMPLE, Path::new("/home/ada/scripts_config.cfg")).unwrap()
    }

    #[test]
    fn section_falls_back_to_default() {
        let config = sample();

        assert_eq!(config.get("thesis", "author"), Some("Ada Lovelace"));
        assert_eq!(config.get("thesis", "title"), Some("On Engines"));
        assert_eq!(config.get("DEFAULT", "title"), None);
        assert_eq!(config.get("missing", "author"), Some("Ada Lovelace"));
    }

    #[test]
    fn booleans() {
        let config = sample();

        assert_eq!(config.get_bool("DEFAULT", "bib").unwrap(), Some(false));
        assert_eq!(config.get_bool("thesis", "bib").unwrap(), Some(true));
        assert_eq!(config.get_bool("thesis", "no_toc").unwrap(), None);
    }

    #[test]
    fn invalid_boolean_is_reported() {
        let config = sample();
        let err = config.get_bool("thesis", "title").unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ScaffoldError>(),
            Some(ScaffoldError::ConfigFileUnreadable { .. })
        ));
    }

    #[test]
    fn keys_include_defaults() {
        assert_eq!(
            sample().keys("thesis"),
            vec!["author", "bib", "template_path", "title"]
        );
    }

    #[test]
    fn base_dir_is_parent_of_origin() {
        assert_eq!(sample().base_dir(), Path::new("/home/ada"));
    }

    #[test]
    fn malformed_file_is_unreadable() {
        let err = ConfigFile::parse("author = nobody", Path::new("x.cfg")).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ScaffoldError>(),
            Some(ScaffoldError::ConfigFileUnreadable { .. })
        ));
    }

    #[test]
    fn search_order_and_first_match() {
        let target = tempfile::tempdir().unwrap();
        let cwd = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();

        let search = ConfigSearch::builder()
            .target_dir(target.path())
            .current_dir(cwd.path())
            .user_home(home.path())
            .build()
            .unwrap();

        assert_eq!(
            search.candidates(),
            vec![
                target.path().join(CONFIG_FILE_NAME),
                cwd.path().join(CONFIG_FILE_NAME),
                home.path().join(CONFIG_FILE_NAME),
            ]
        );
        assert_eq!(search.locate(), None);
        assert_eq!(search.load().unwrap(), None);

        std::fs::write(home.path().join(CONFIG_FILE_NAME), "[DEFAULT]\ntitle = Home\n").unwrap();
        std::fs::write(cwd.path().join(CONFIG_FILE_NAME), "[DEFAULT]\ntitle = Here\n").unwrap();

        let config = search.load().unwrap().unwrap();
        assert_eq!(config.origin(), cwd.path().join(CONFIG_FILE_NAME));
        assert_eq!(config.get("DEFAULT", "title"), Some("Here"));
    }

    #[test]
    fn search_without_home() {
        let search = ConfigSearch::builder()
            .target_dir("a")
            .current_dir("b")
            .build()
            .unwrap();

        assert_eq!(search.candidates().len(), 2);
    }
}
