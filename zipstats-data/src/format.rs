//! Source format detection from file extensions.

use std::fmt;

use camino::Utf8Path;

/// On-disk encodings understood by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    /// Comma-delimited text with a header row (`.csv`).
    DelimitedText,
    /// A JSON array of objects (`.json`).
    StructuredDocument,
}

impl SourceFormat {
    /// Infer the format from a path's extension, ignoring ASCII case.
    ///
    /// # Examples
    /// ```
    /// use camino::Utf8Path;
    /// use zipstats_data::SourceFormat;
    ///
    /// assert_eq!(
    ///     SourceFormat::from_path(Utf8Path::new("covid.JSON")),
    ///     Some(SourceFormat::StructuredDocument)
    /// );
    /// assert_eq!(SourceFormat::from_path(Utf8Path::new("notes.txt")), None);
    /// ```
    #[must_use]
    pub fn from_path(path: &Utf8Path) -> Option<Self> {
        let extension = path.extension()?;
        if extension.eq_ignore_ascii_case("csv") {
            Some(Self::DelimitedText)
        } else if extension.eq_ignore_ascii_case("json") {
            Some(Self::StructuredDocument)
        } else {
            None
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DelimitedText => f.write_str("csv"),
            Self::StructuredDocument => f.write_str("json"),
        }
    }
}
