//! Property-based tests for the row tokenizer.
//!
//! # Invariants tested
//!
//! - **Quoting:** any grid of fields, quoted where needed, tokenizes back to
//!   the same fields regardless of line terminator.
//! - **Totality:** arbitrary input either yields rows or a format error; it
//!   never panics, and a format error repeats on every later call.

use proptest::prelude::*;
use zipstats_data::{ByteSource, RowTokenizer, TokenizeError};

fn field_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z0-9 ,\"\r\n.-]{0,12}")
        .unwrap_or_else(|err| panic!("field pattern must compile: {err}"))
}

fn grid_strategy() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(prop::collection::vec(field_strategy(), 1..6), 0..8)
}

fn encode_field(field: &str) -> String {
    if field.is_empty() || field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}

fn encode(grid: &[Vec<String>], terminator: &str, trailing: bool) -> String {
    let mut text = grid
        .iter()
        .map(|row| {
            row.iter()
                .map(|field| encode_field(field))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join(terminator);
    if trailing && !grid.is_empty() {
        text.push_str(terminator);
    }
    text
}

fn tokenize(input: &str) -> Result<Vec<Vec<String>>, TokenizeError> {
    let mut tokenizer = RowTokenizer::new(ByteSource::new(input.as_bytes()));
    let mut rows = Vec::new();
    while let Some(row) = tokenizer.next_row()? {
        rows.push(row);
    }
    Ok(rows)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: quoted fields survive commas, quotes, and line breaks.
    #[test]
    fn quoted_grids_tokenize_to_their_fields(
        grid in grid_strategy(),
        crlf in any::<bool>(),
        trailing in any::<bool>(),
    ) {
        let terminator = if crlf { "\r\n" } else { "\n" };
        let input = encode(&grid, terminator, trailing);
        let rows = tokenize(&input).unwrap_or_else(|err| panic!("{input:?}: {err}"));
        prop_assert_eq!(rows, grid);
    }

    /// Property: malformed input fails cleanly and the failure is sticky.
    #[test]
    fn arbitrary_input_never_panics(input in "[a,\"\r\n]{0,24}") {
        let mut tokenizer = RowTokenizer::new(ByteSource::new(input.as_bytes()));
        loop {
            match tokenizer.next_row() {
                Ok(Some(row)) => prop_assert!(!row.is_empty()),
                Ok(None) => break,
                Err(TokenizeError::Format(first)) => {
                    match tokenizer.next_row() {
                        Err(TokenizeError::Format(again)) => prop_assert_eq!(first, again),
                        other => prop_assert!(false, "error not sticky: {other:?}"),
                    }
                    break;
                }
                Err(TokenizeError::Io(err)) => prop_assert!(false, "unexpected io error: {err}"),
            }
        }
    }
}
