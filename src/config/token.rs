pub use logos::Logos;
use logos::Span;

/// One meaningful line of an INI file. Whitespace, including newlines, is
/// skipped; the parser checks that every token starts its own line.
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Line<'i> {
    #[regex(r"\[[^\]\n]*\]", |lex| { let s = lex.slice(); s[1..s.len() - 1].trim() })]
    Section(&'i str),

    #[regex(r"[#;][^\n]*", |lex| lex.slice())]
    Comment(&'i str),

    #[regex(r"[^ \t\r\n\f\[\]#;=:][^=:\n]*[=:][^\n]*", entry)]
    Entry((&'i str, &'i str)),
}

fn entry<'i>(lex: &mut logos::Lexer<'i, Line<'i>>) -> Option<(&'i str, &'i str)> {
    lex.slice()
        .split_once(['=', ':'])
        .map(|(key, value)| (key.trim(), value.trim()))
}

/// Lexed lines of a config file together with their spans, consumed front
/// to back by the parser.
#[derive(Debug, Default)]
pub struct Lines<'i> {
    pub inp: &'i str,
    pub path: String,
    pub span: Vec<Span>,
    pub line: Vec<Line<'i>>,
    pub cursor: usize,
}

impl<'i> Lines<'i> {
    pub fn new(inp: &'i str, path: impl Into<String>) -> Self {
        Lines {
            inp,
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn push(&mut self, line: Line<'i>, span: Span) {
        self.line.push(line);
        self.span.push(span);
    }

    pub fn step(&mut self) {
        self.cursor += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.cursor == self.line.len()
    }

    pub fn peek(&self) -> Option<(Line<'i>, Span)> {
        (!self.is_empty()).then(|| (self.line[self.cursor], self.span[self.cursor].clone()))
    }

    /// Whether the current token is the first thing on its line.
    pub fn starts_line(&self) -> bool {
        match self.cursor {
            0 => true,
            i => self.inp[self.span[i - 1].end..self.span[i].start].contains('\n'),
        }
    }

    pub fn error_at(&self, span: Span, msg: impl Into<String>) -> String {
        let (line, col) = line_col(self.inp, span.start);
        format!(
            "{msg}\n    {path}:{line}:{col} {contents}",
            msg = msg.into(),
            path = self.path,
            contents = get_line(self.inp, line).trim_end(),
        )
    }

    pub fn error_current(&self, msg: impl Into<String>) -> String {
        match self.peek() {
            Some((_, span)) => self.error_at(span, msg),
            None => msg.into(),
        }
    }
}

/// 1-based line and column of the byte at `offset`.
#[must_use]
pub fn line_col(inp: &str, offset: usize) -> (usize, usize) {
    let before = &inp[..offset.min(inp.len())];
    let line = before.matches('\n').count() + 1;
    let col = before
        .rfind('\n')
        .map_or(before.chars().count(), |nl| before[nl + 1..].chars().count())
        + 1;

    (line, col)
}

#[must_use]
pub fn get_line(inp: &str, line: usize) -> &str {
    inp.lines().nth(line - 1).unwrap_or_default()
}
