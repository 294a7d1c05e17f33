/*!
Parser and validator for the Condorcet Election Format (CEF), a line-oriented
text encoding of ranked ballots.

Each input line describes one ballot expression:

```text
tag1,tag2 || Alice = Bob > Carol * 3 ^ 2
```

Candidates before `>` are strictly preferred over candidates after it, `=`
ties candidates at one position, `*n` repeats the ballot n times, `^n` gives
it a weight, and the `/EMPTY_RANKING/` literal marks a ballot with no
preference at all.

The crate runs a fixed pipeline per line (tokenize, parse, validate, build)
and exposes it at three levels:

* [`parse_lines`] for a whole stream of lines, yielding one
  `Result<Ballot, LineError>` per meaningful line and never aborting on a bad
  one;
* [`parse_ballot_line`] for a single line;
* the individual stages [`tokenize`], [`parse_line`], [`validate`] and
  [`build_ballot`] for callers that need the intermediate forms.

Lines are fully independent: nothing is shared between two calls of the
pipeline, so callers are free to partition a large file between threads as
long as they keep the original line numbers for diagnostics.
*/

mod ballot;
mod lexer;
pub mod manual;
mod parser;
mod validate;

use std::error::Error;
use std::fmt::Display;

use log::debug;

pub use crate::ballot::{build_ballot, Ballot};
pub use crate::lexer::{tokenize, LexError, Token, EMPTY_RANKING_MARKER};
pub use crate::parser::{parse_line, Line, Multiplier, ParseError, Ranking, TieGroup};
pub use crate::validate::{validate, ValidationError};

/// Lines starting with this character are skipped by the stream driver.
/// Comment handling is a convention of the surrounding tooling, not part of
/// the grammar itself.
pub const COMMENT_MARKER: char = '#';

/// Any failure of the per-line pipeline. The three kinds are strictly
/// layered: a line produces at most one of them.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum CefError {
    Lex(LexError),
    Parse(ParseError),
    Validation(ValidationError),
}

impl Error for CefError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CefError::Lex(e) => Some(e),
            CefError::Parse(e) => Some(e),
            CefError::Validation(e) => Some(e),
        }
    }
}

impl Display for CefError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CefError::Lex(e) => write!(f, "lexical error: {}", e),
            CefError::Parse(e) => write!(f, "syntax error: {}", e),
            CefError::Validation(e) => write!(f, "invalid ballot: {}", e),
        }
    }
}

/// A pipeline failure with the provenance of the line that caused it.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct LineError {
    /// 1-based line number in the source, counting skipped lines too.
    pub lineno: usize,
    /// The offending line, verbatim.
    pub line: String,
    pub cause: CefError,
}

impl Error for LineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.cause)
    }
}

impl Display for LineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}: {:?}", self.lineno, self.cause, self.line)
    }
}

/// Runs the whole pipeline on a single line.
pub fn parse_ballot_line(line: &str) -> Result<Ballot, CefError> {
    let tokens = tokenize(line).map_err(CefError::Lex)?;
    let parsed = parse_line(&tokens).map_err(CefError::Parse)?;
    validate(&parsed).map_err(CefError::Validation)?;
    Ok(build_ballot(&parsed))
}

/// Lazy per-line driver over any source of lines. See [`parse_lines`].
pub struct CefReader<I> {
    lines: I,
    lineno: usize,
}

impl<I> CefReader<I> {
    /// The 1-based number of the line behind the most recent item, or 0
    /// before the first call. This is the only state the driver keeps.
    pub fn lineno(&self) -> usize {
        self.lineno
    }
}

impl<I: Iterator<Item = String>> Iterator for CefReader<I> {
    type Item = Result<Ballot, LineError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            self.lineno += 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with(COMMENT_MARKER) {
                debug!("skipping line {}: {:?}", self.lineno, line);
                continue;
            }
            let lineno = self.lineno;
            // Parse the line as-is (the tokenizer skips whitespace), so that
            // error columns match the text recorded in the LineError.
            return Some(parse_ballot_line(&line).map_err(|cause| LineError {
                lineno,
                line,
                cause,
            }));
        }
    }
}

/// Drives the pipeline over a stream of text lines.
///
/// Blank lines and `#` comments are skipped before tokenization but still
/// counted, so the line numbers attached to errors match the source. One
/// result is produced per remaining line, in input order; a failing line
/// yields its [`LineError`] and the stream continues. The driver itself keeps
/// no state besides the line counter, and the returned iterator is as lazy as
/// the underlying source.
pub fn parse_lines<I>(lines: I) -> CefReader<I::IntoIter>
where
    I: IntoIterator<Item = String>,
{
    CefReader {
        lines: lines.into_iter(),
        lineno: 0,
    }
}
