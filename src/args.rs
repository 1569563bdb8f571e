use std::path::PathBuf;

pub use clap::Parser;

/// Initialise the main files needed in a LaTeX article.
#[derive(Parser, Debug, Default)]
#[clap(version)]
pub struct Args {
    /// Name of the directory in which the LaTeX files will be generated into
    #[clap(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// Generate the files into the current working directory instead
    #[clap(long, alias = "current_dir")]
    pub current_dir: bool,

    /// Author of the LaTeX article
    #[clap(long)]
    pub author: Option<String>,

    /// Title of the LaTeX article
    #[clap(long)]
    pub title: Option<String>,

    /// Add a biblatex bibliography and create an empty bibliography.bib
    #[clap(long)]
    pub bib: bool,

    /// Do not include a table of contents
    #[clap(long, alias = "no_toc")]
    pub no_toc: bool,

    /// Directory containing main.tex and preamble.tex to copy instead of the defaults
    #[clap(long, alias = "template_path", value_name = "PATH")]
    pub template_path: Option<PathBuf>,

    /// Section of scripts_config.cfg to read option values from [default: DEFAULT]
    #[clap(long, short, value_name = "SECTION")]
    pub template: Option<String>,

    /// Do not print error messages, only set the exit code
    #[clap(long)]
    pub no_errors: bool,
}

impl Args {
    #[must_use]
    pub fn no_errors(&self) -> bool {
        self.no_errors
    }
}
