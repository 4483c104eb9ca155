//! Character-at-a-time access to an input stream.

use std::io::{self, BufReader, Bytes, Read};

/// Supplies one character at a time until the stream is exhausted.
///
/// `Ok(None)` is the end-of-stream sentinel. Implementations should keep
/// returning it once reached.
pub trait CharacterSource {
    /// Read the next character.
    fn next_char(&mut self) -> io::Result<Option<char>>;
}

/// A [`CharacterSource`] over a byte stream.
///
/// Each byte maps to the character with the same code point, so ASCII input
/// reads unchanged and other bytes map onto Latin-1.
///
/// # Examples
/// ```
/// use zipstats_data::{ByteSource, CharacterSource};
///
/// let mut source = ByteSource::new("a,b".as_bytes());
/// assert_eq!(source.next_char()?, Some('a'));
/// assert_eq!(source.next_char()?, Some(','));
/// assert_eq!(source.next_char()?, Some('b'));
/// assert_eq!(source.next_char()?, None);
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct ByteSource<R> {
    bytes: Bytes<BufReader<R>>,
}

impl<R: Read> ByteSource<R> {
    /// Wrap a reader, buffering it internally.
    pub fn new(reader: R) -> Self {
        Self {
            bytes: BufReader::new(reader).bytes(),
        }
    }
}

impl<R: Read> CharacterSource for ByteSource<R> {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        self.bytes
            .next()
            .transpose()
            .map(|byte| byte.map(char::from))
    }
}
