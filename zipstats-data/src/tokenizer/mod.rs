//! Streaming tokenizer for comma-delimited rows.
//!
//! [`RowTokenizer`] pulls characters from a [`CharacterSource`] and yields one
//! row at a time. Fields are separated by `,` and rows by `\n` or `\r\n`.
//! A field that begins with `"` is quoted: inside it commas, line breaks,
//! and doubled quotes (`""`) are literal. A quote may only open a field, and a
//! closing quote must be followed by a separator, a line break, or the end of
//! input.
//!
//! The tokenizer is deliberately strict. Once it reports a
//! [`FormatError`], it remains in the error state and every later call
//! returns the same error.

use std::io;
use std::mem;

use thiserror::Error;

use crate::source::CharacterSource;


/// Kinds of malformed input recognised by the tokenizer.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum FormatErrorKind {
    /// A quote appeared after other characters of an unquoted field.
    #[error("quote inside an unquoted field")]
    StrayQuote,
    /// A closing quote was followed by something other than a separator.
    #[error("unexpected {found:?} after a closing quote")]
    InvalidAfterQuote {
        /// The offending character.
        found: char,
    },
    /// A carriage return was not immediately followed by a line feed.
    #[error("carriage return not followed by a line feed")]
    BareCarriageReturn,
    /// Input ended inside a quoted field.
    #[error("input ended inside a quoted field")]
    UnterminatedQuote,
}

/// Malformed delimited text, with the 1-based position where it was found.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("malformed delimited text at line {line}, column {column}: {kind}")]
pub struct FormatError {
    /// What went wrong.
    pub kind: FormatErrorKind,
    /// Line of the last character read.
    pub line: usize,
    /// Column of the last character read.
    pub column: usize,
}

/// Errors produced while tokenizing.
#[derive(Debug, Error)]
pub enum TokenizeError {
    /// The input is not well-formed delimited text.
    #[error(transparent)]
    Format(#[from] FormatError),
    /// The underlying source failed.
    #[error("failed to read delimited text")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    FieldStart,
    Unquoted,
    Quoted,
}

/// Pull-based row tokenizer over a [`CharacterSource`].
///
/// # Examples
/// ```
/// use zipstats_data::{ByteSource, RowTokenizer};
///
/// let input = "zip,name\r\n19104,\"Powelton, West\"\n";
/// let mut tokenizer = RowTokenizer::new(ByteSource::new(input.as_bytes()));
/// assert_eq!(tokenizer.next_row()?, Some(vec!["zip".to_owned(), "name".to_owned()]));
/// assert_eq!(
///     tokenizer.next_row()?,
///     Some(vec!["19104".to_owned(), "Powelton, West".to_owned()])
/// );
/// assert_eq!(tokenizer.next_row()?, None);
/// # Ok::<(), zipstats_data::TokenizeError>(())
/// ```
#[derive(Debug)]
pub struct RowTokenizer<S> {
    source: S,
    mode: Mode,
    failure: Option<FormatError>,
    line: usize,
    column: usize,
}

impl<S: CharacterSource> RowTokenizer<S> {
    /// Create a tokenizer positioned at the start of the input.
    pub const fn new(source: S) -> Self {
        Self {
            source,
            mode: Mode::FieldStart,
            failure: None,
            line: 1,
            column: 0,
        }
    }

    /// Read the next row.
    ///
    /// Returns `Ok(None)` only when the input is exhausted before any
    /// character of a new row. A trailing line break therefore does not
    /// produce an empty final row, while an empty line in the middle of the
    /// input yields a row holding one empty field.
    ///
    /// # Errors
    ///
    /// Returns [`TokenizeError::Format`] for malformed input and
    /// [`TokenizeError::Io`] when the source fails. Format errors are sticky.
    pub fn next_row(&mut self) -> Result<Option<Vec<String>>, TokenizeError> {
        if let Some(failure) = self.failure {
            return Err(failure.into());
        }
        self.mode = Mode::FieldStart;
        let mut row = Vec::new();
        let mut field = String::new();
        let mut started = false;

        loop {
            let Some(ch) = self.read()? else {
                return match self.mode {
                    Mode::Quoted => Err(self.fail(FormatErrorKind::UnterminatedQuote).into()),
                    _ if !started => Ok(None),
                    _ => {
                        row.push(field);
                        Ok(Some(row))
                    }
                };
            };
            started = true;

            match (self.mode, ch) {
                (Mode::Quoted, '"') => match self.read()? {
                    Some('"') => field.push('"'),
                    Some(',') => {
                        row.push(mem::take(&mut field));
                        self.mode = Mode::FieldStart;
                    }
                    Some('\r') => {
                        self.expect_line_feed()?;
                        row.push(field);
                        return Ok(Some(row));
                    }
                    Some('\n') | None => {
                        row.push(field);
                        return Ok(Some(row));
                    }
                    Some(found) => {
                        return Err(self.fail(FormatErrorKind::InvalidAfterQuote { found }).into());
                    }
                },
                (Mode::Quoted, other) => field.push(other),
                (Mode::FieldStart, '"') => self.mode = Mode::Quoted,
                (Mode::Unquoted, '"') => return Err(self.fail(FormatErrorKind::StrayQuote).into()),
                (_, ',') => {
                    row.push(mem::take(&mut field));
                    self.mode = Mode::FieldStart;
                }
                (_, '\r') => {
                    self.expect_line_feed()?;
                    row.push(field);
                    return Ok(Some(row));
                }
                (_, '\n') => {
                    row.push(field);
                    return Ok(Some(row));
                }
                (_, other) => {
                    field.push(other);
                    self.mode = Mode::Unquoted;
                }
            }
        }
    }

    /// Line and column of the last character read (column 0 before any).
    #[must_use]
    pub const fn position(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    fn read(&mut self) -> Result<Option<char>, TokenizeError> {
        let next = self.source.next_char()?;
        match next {
            Some('\n') => {
                self.line += 1;
                self.column = 0;
            }
            Some(_) => self.column += 1,
            None => {}
        }
        Ok(next)
    }

    fn expect_line_feed(&mut self) -> Result<(), TokenizeError> {
        match self.read()? {
            Some('\n') => Ok(()),
            _ => Err(self.fail(FormatErrorKind::BareCarriageReturn).into()),
        }
    }

    fn fail(&mut self, kind: FormatErrorKind) -> FormatError {
        let failure = FormatError {
            kind,
            line: self.line,
            column: self.column,
        };
        self.failure = Some(failure);
        failure
    }
}
