use anyhow::Result;
use derive_builder::Builder;
use std::path::{Path, PathBuf};

use crate::{
    args::Args,
    config::{ConfigFile, DEFAULT_SECTION},
    error::ScaffoldError,
    trace, warn,
};

pub const DEFAULT_AUTHOR: &str = "Max Schalz";
pub const DEFAULT_TITLE: &str = "Document";

/// Configuration keys understood by [`Settings::resolve`].
pub const KNOWN_KEYS: [&str; 5] = ["author", "title", "bib", "no_toc", "template_path"];

/// Every user facing option of one run, resolved from the command line, the
/// configuration file and the built-in defaults, in that order of priority.
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct Settings {
    directory_name: PathBuf,
    #[builder(default)]
    use_current_directory: bool,
    #[builder(default = "DEFAULT_AUTHOR.to_string()")]
    author: String,
    #[builder(default = "DEFAULT_TITLE.to_string()")]
    title: String,
    #[builder(default)]
    include_bibliography: bool,
    #[builder(default = "true")]
    include_table_of_contents: bool,
    #[builder(default, setter(into, strip_option))]
    template_path: Option<PathBuf>,
}

impl SettingsBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.directory_name {
            Some(ref dir) if dir.as_os_str().is_empty() => {
                Err("Directory name can not be empty".to_string())
            }
            _ => Ok(()),
        }
    }
}

impl Settings {
    /// Create a new [`Settings`] builder
    #[must_use]
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::default()
    }

    /// Merges `args` with `config`. Values given on the command line always
    /// win; the configuration file only fills options that were not given.
    /// With `--template <section>` values are read from that section,
    /// otherwise from `[DEFAULT]`.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::ConfigSectionMissing`] if the requested
    /// section does not exist, or [`ScaffoldError::ConfigFileUnreadable`] if a
    /// boolean key holds something else.
    pub fn resolve(args: &Args, config: Option<&ConfigFile>) -> Result<Settings> {
        let section = match (args.template.as_deref(), config) {
            (Some(name), Some(cfg)) if cfg.has_section(name) => name,
            (Some(name), cfg) => {
                return Err(ScaffoldError::ConfigSectionMissing {
                    section: name.to_string(),
                    path: cfg.map(|c| c.origin().to_owned()),
                }
                .into())
            }
            (None, _) => DEFAULT_SECTION,
        };

        if let Some(cfg) = config {
            trace!(
                "Reading [{section}] from {} (sections: {})",
                cfg.origin().display(),
                cfg.sections().collect::<Vec<_>>().join(", ")
            );

            for key in cfg.keys(section) {
                if !KNOWN_KEYS.contains(&key) {
                    warn!(
                        "Ignoring unknown key `{key}` in {}",
                        cfg.origin().display()
                    );
                }
            }
        }

        let value = |key: &str| config.and_then(|cfg| cfg.get(section, key));
        let flag = |key: &str| -> Result<bool> {
            Ok(config
                .map(|cfg| cfg.get_bool(section, key))
                .transpose()?
                .flatten()
                .unwrap_or(false))
        };

        // Both keys are validated even when the matching flag is given.
        let bib = flag("bib")?;
        let no_toc = flag("no_toc")?;

        let mut builder = Settings::builder();
        builder
            .directory_name(&args.directory)
            .use_current_directory(args.current_dir)
            .include_bibliography(args.bib || bib)
            .include_table_of_contents(!(args.no_toc || no_toc));

        if let Some(author) = args.author.as_deref().or_else(|| value("author")) {
            builder.author(author);
        }

        if let Some(title) = args.title.as_deref().or_else(|| value("title")) {
            builder.title(title);
        }

        let template_path = args.template_path.clone().or_else(|| {
            config.and_then(|cfg| {
                cfg.get(section, "template_path")
                    .map(|p| cfg.base_dir().join(p))
            })
        });

        if let Some(path) = template_path {
            builder.template_path(path);
        }

        Ok(builder.build()?)
    }

    #[must_use]
    pub fn directory_name(&self) -> &Path {
        &self.directory_name
    }

    #[must_use]
    pub fn use_current_directory(&self) -> bool {
        self.use_current_directory
    }

    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn include_bibliography(&self) -> bool {
        self.include_bibliography
    }

    #[must_use]
    pub fn include_table_of_contents(&self) -> bool {
        self.include_table_of_contents
    }

    #[must_use]
    pub fn template_path(&self) -> Option<&Path> {
        self.template_path.as_deref()
    }

    /// Where the files end up: `cwd` itself or `cwd/directory_name`.
    #[must_use]
    pub fn output_dir(&self, cwd: &Path) -> PathBuf {
        if self.use_current_directory {
            cwd.to_owned()
        } else {
            cwd.join(&self.directory_name)
        }
    }

    #[must_use]
    pub fn template_dir(&self, cwd: &Path) -> Option<PathBuf> {
        self.template_path.as_ref().map(|p| cwd.join(p))
    }
}
