use anyhow::{Context, Result};
use std::{
    fmt::{Display, Formatter},
    io::ErrorKind,
    path::Path,
};

use crate::{
    error::ScaffoldError, settings::Settings, trace, BIBLIOGRAPHY_FILE, MAIN_FILE, PREAMBLE_FILE,
};

/// The full text of one generated file, line by line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document(Vec<String>);

impl Document {
    /// Reads `path` verbatim, one entry per line.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::TemplateFileMissing`] if `path` does not exist
    /// and an IO error with context for any other read failure.
    pub fn from_template(path: &Path) -> Result<Self> {
        trace!("Reading template {}", path.display());

        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(contents.lines().map(str::to_owned).collect()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(ScaffoldError::TemplateFileMissing(path.to_owned()).into())
            }
            Err(e) => {
                Err(e).with_context(|| format!("Failed to read template {}", path.display()))
            }
        }
    }

    fn push(&mut self, line: impl Into<String>) -> &mut Self {
        self.0.push(line.into());
        self
    }

    fn blank(&mut self) -> &mut Self {
        self.push("")
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains_line(&self, line: &str) -> bool {
        self.0.iter().any(|l| l == line)
    }

    /// Writes every line followed by `\n`.
    pub fn write_to(&self, mut target: impl std::io::Write) -> Result<()> {
        for line in &self.0 {
            writeln!(target, "{line}")?;
        }

        Ok(())
    }
}

impl FromIterator<String> for Document {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Document(iter.into_iter().collect())
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for line in &self.0 {
            writeln!(f, "{line}")?;
        }

        Ok(())
    }
}

/// Both documents of a project, fully built before anything is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composed {
    pub main: Document,
    pub preamble: Document,
}

/// # Errors
///
/// Fails if a template directory is set and one of its files can not be read.
pub fn compose(settings: &Settings, cwd: &Path) -> Result<Composed> {
    Ok(Composed {
        main: compose_main(settings, cwd)?,
        preamble: compose_preamble(settings, cwd)?,
    })
}

/// Builds `main.tex`, either copied from the template directory or from the
/// built-in layout.
///
/// # Errors
///
/// Returns [`ScaffoldError::TemplateFileMissing`] if the template directory
/// lacks `main.tex`.
pub fn compose_main(settings: &Settings, cwd: &Path) -> Result<Document> {
    if let Some(dir) = settings.template_dir(cwd) {
        return Document::from_template(&dir.join(MAIN_FILE));
    }

    let mut doc = Document::default();

    doc.push(r"\documentclass[a4paper]{article}")
        .blank()
        .push(format!(r"\input{{{}}}", stem(PREAMBLE_FILE)))
        .blank()
        .push(format!(r"\title{{{}}}", settings.title()))
        .push(format!(r"\author{{{}}}", settings.author()))
        .push(r"\date{\today}")
        .blank()
        .push(r"\begin{document}")
        .blank()
        .push(r"  \maketitle");

    if settings.include_table_of_contents() {
        doc.push(r"  \tableofcontents");
    }
    doc.blank();

    if settings.include_bibliography() {
        doc.push(r"  \appendix")
            .push(r"  \input{appendix}")
            .push(r"  \printbibliography[heading=bibintoc]")
            .blank();
    }

    doc.push(r"\end{document}");

    Ok(doc)
}

/// Builds `preamble.tex`, either copied from the template directory or from
/// the built-in package list.
///
/// # Errors
///
/// Returns [`ScaffoldError::TemplateFileMissing`] if the template directory
/// lacks `preamble.tex`.
pub fn compose_preamble(settings: &Settings, cwd: &Path) -> Result<Document> {
    if let Some(dir) = settings.template_dir(cwd) {
        return Document::from_template(&dir.join(PREAMBLE_FILE));
    }

    let mut doc = Document::default();

    doc.push(r"\usepackage[utf8]{inputenc}")
        .push(r"\usepackage[british]{babel}")
        .blank();

    if settings.include_bibliography() {
        doc.push(r"\usepackage{biblatex}")
            .push(format!(r"\addbibresource{{{BIBLIOGRAPHY_FILE}}}"))
            .blank();
    }

    doc.push(r"\usepackage[dvipsnames]{xcolor}")
        .push(r"\newcommand{\red}[1]{{\color{red}#1}}")
        .push(r"\newcommand{\todo}[1]{\red{\textbf{#1}}}")
        .blank()
        .push(r"\usepackage[colorlinks=true]{hyperref}")
        .push(r"\usepackage[nameinlink,capitalize]{cleveref}")
        .blank();

    Ok(doc)
}

// `\input` takes the file name without extension.
fn stem(file: &str) -> &str {
    file.strip_suffix(".tex").unwrap_or(file)
}

#[cfg(test)]
mod tests {
    use super::{compose, compose_main, compose_preamble, Document};
    use crate::{error::ScaffoldError, settings::Settings};
    use std::path::Path;

    fn settings(bib: bool, toc: bool) -> Settings {
        Settings::builder()
            .directory_name("mydoc")
            .author("A. Turing")
            .title("Notes")
            .include_bibliography(bib)
            .include_table_of_contents(toc)
            .build()
            .unwrap()
    }

    const CWD: &str = "/nonexistent";

    #[test]
    fn default_main_layout() {
        let main = compose_main(&settings(false, true), Path::new(CWD)).unwrap();

        assert_eq!(
            main.to_string(),
            r"\documentclass[a4paper]{article}

\input{preamble}

\title{Notes}
\author{A. Turing}
\date{\today}

\begin{document}

  \maketitle
  \tableofcontents

\end{document}
"
        );
    }

    #[test]
    fn main_with_bibliography_and_no_toc() {
        let main = compose_main(&settings(true, false), Path::new(CWD)).unwrap();

        assert!(!main.contains_line(r"  \tableofcontents"));
        assert_eq!(
            &main.lines()[10..],
            &[
                r"  \maketitle",
                "",
                r"  \appendix",
                r"  \input{appendix}",
                r"  \printbibliography[heading=bibintoc]",
                "",
                r"\end{document}",
            ]
        );
    }

    #[test]
    fn toc_follows_maketitle() {
        let main = compose_main(&settings(true, true), Path::new(CWD)).unwrap();
        let title = main
            .lines()
            .iter()
            .position(|l| l == r"  \maketitle")
            .unwrap();

        assert_eq!(main.lines()[title + 1], r"  \tableofcontents");
    }

    #[test]
    fn default_preamble_layout() {
        let preamble = compose_preamble(&settings(false, true), Path::new(CWD)).unwrap();

        assert_eq!(
            preamble.to_string(),
            r"\usepackage[utf8]{inputenc}
\usepackage[british]{babel}

\usepackage[dvipsnames]{xcolor}
\newcommand{\red}[1]{{\color{red}#1}}
\newcommand{\todo}[1]{\red{\textbf{#1}}}

\usepackage[colorlinks=true]{hyperref}
\usepackage[nameinlink,capitalize]{cleveref}

"
        );
    }

    #[test]
    fn preamble_with_bibliography() {
        let preamble = compose_preamble(&settings(true, true), Path::new(CWD)).unwrap();

        assert_eq!(
            &preamble.lines()[2..6],
            &[
                "",
                r"\usepackage{biblatex}",
                r"\addbibresource{bibliography.bib}",
                "",
            ]
        );
    }

    #[test]
    fn no_bibliography_lines_without_flag() {
        let composed = compose(&settings(false, true), Path::new(CWD)).unwrap();
        let all = format!("{}{}", composed.main, composed.preamble);

        for needle in ["bib", "appendix"] {
            assert!(!all.contains(needle), "found {needle}");
        }
    }

    #[test]
    fn template_is_copied_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let main = "% custom\n\\documentclass{report}\n\n  \\begin{document}\t\n\\end{document}\n";
        std::fs::write(dir.path().join("main.tex"), main).unwrap();
        std::fs::write(dir.path().join("preamble.tex"), "\\usepackage{amsmath}\n").unwrap();

        let settings = Settings::builder()
            .directory_name("doc")
            .template_path(dir.path())
            .include_bibliography(true)
            .build()
            .unwrap();

        let composed = compose(&settings, Path::new(CWD)).unwrap();

        assert_eq!(composed.main.to_string(), main);
        assert_eq!(composed.preamble.lines(), &["\\usepackage{amsmath}"]);
    }

    #[test]
    fn missing_template_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("main.tex"), "x\n").unwrap();

        let settings = Settings::builder()
            .directory_name("doc")
            .template_path(dir.path())
            .build()
            .unwrap();

        let err = compose(&settings, Path::new(CWD)).unwrap_err();

        match err.downcast_ref::<ScaffoldError>() {
            Some(ScaffoldError::TemplateFileMissing(path)) => {
                assert_eq!(path, &dir.path().join("preamble.tex"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn write_to_terminates_every_line() {
        let doc: Document = ["a", "", "b"].into_iter().map(String::from).collect();
        let mut out = Vec::new();

        doc.write_to(&mut out).unwrap();

        assert_eq!(out, b"a\n\nb\n");
        assert_eq!(doc.len(), 3);
        assert!(!doc.is_empty());
    }
}
