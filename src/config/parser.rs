use std::collections::HashMap;

use anyhow::{anyhow, bail, ensure, Result};

use super::token::{Line, Lines, Logos};
use crate::{trace, warn};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub entries: HashMap<String, String>,
}

pub fn lex<'i>(inp: &'i str, path: &str) -> Result<Lines<'i>> {
    let mut lines = Lines::new(inp, path);
    let mut lexer = Line::lexer(inp);

    while let Some(token) = lexer.next() {
        let Ok(token) = token else {
            bail!(lines.error_at(
                lexer.span(),
                "Expected a [section] header, a `key = value` entry or a comment"
            ));
        };

        if let Line::Comment(text) = token {
            trace!("Skipping comment '{text}'");
            continue;
        }

        lines.push(token, lexer.span());
    }

    Ok(lines)
}

pub fn parse_sections(lines: &mut Lines<'_>) -> Result<Vec<Section>> {
    let mut sections: Vec<Section> = Vec::new();
    let mut current: Option<usize> = None;

    while let Some((line, span)) = lines.peek() {
        ensure!(
            lines.starts_line(),
            anyhow!(lines.error_current("Headers and entries must each start a new line"))
        );

        match line {
            Line::Section(name) => {
                ensure!(
                    !name.is_empty(),
                    anyhow!(lines.error_current("Section name can not be empty"))
                );

                current = match sections.iter().position(|s| s.name == name) {
                    Some(i) => {
                        warn!(lines.error_at(
                            span,
                            format!("Section [{name}] is declared more than once, merging")
                        ));
                        Some(i)
                    }
                    None => {
                        sections.push(Section {
                            name: name.to_string(),
                            entries: HashMap::new(),
                        });
                        Some(sections.len() - 1)
                    }
                };
            }
            Line::Entry((key, value)) => {
                let Some(section) = current.and_then(|i| sections.get_mut(i)) else {
                    bail!(lines.error_current(
                        "Entry found before any section header, add e.g. [DEFAULT] above it"
                    ))
                };

                let key = key.to_lowercase();
                if section
                    .entries
                    .insert(key.clone(), value.to_string())
                    .is_some()
                {
                    warn!(lines.error_at(
                        span,
                        format!(
                            "Key `{key}` is already defined in [{}], overriding",
                            section.name
                        )
                    ));
                }
            }
            Line::Comment(_) => {}
        }

        lines.step();
    }

    Ok(sections)
}
