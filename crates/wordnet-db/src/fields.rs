//! Cursor-based field splitting shared by the line decoders.
//!
//! Every WordNet line grammar is positional: the meaning of a token depends
//! on how many tokens came before it, and the radix of numeric fields is
//! fixed by the grammar rather than by the token's shape. [`Fields`] walks a
//! line left to right with plain substring search and reports the field name
//! and byte position whenever a required separator is missing.

use std::str::FromStr;

use crate::error::{Error, Result};

/// Something [`Fields`] can split on: a single `char` or a literal `&str`.
pub trait Separator: Copy {
    fn find_in(self, haystack: &str) -> Option<usize>;
    fn width(self) -> usize;
}

impl Separator for char {
    fn find_in(self, haystack: &str) -> Option<usize> {
        haystack.find(self)
    }

    fn width(self) -> usize {
        self.len_utf8()
    }
}

impl Separator for &str {
    fn find_in(self, haystack: &str) -> Option<usize> {
        haystack.find(self)
    }

    fn width(self) -> usize {
        self.len()
    }
}

/// A cursor over one line.
#[derive(Clone, Debug)]
pub struct Fields<'a> {
    line: &'a str,
    cursor: usize,
}

impl<'a> Fields<'a> {
    pub fn new(line: &'a str) -> Self {
        Self { line, cursor: 0 }
    }

    /// The full line, independent of the cursor.
    pub fn line(&self) -> &'a str {
        self.line
    }

    /// Byte position of the cursor.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Text from the cursor up to the next `sep`; the cursor moves past `sep`.
    pub fn next<S: Separator>(&mut self, sep: S, field: &'static str) -> Result<&'a str> {
        let rest = self.rest();
        let Some(idx) = sep.find_in(rest) else {
            return Err(self.malformed(field));
        };
        self.cursor += idx + sep.width();
        Ok(&rest[..idx])
    }

    /// Offset of the next `sep`, relative to the cursor.
    pub fn find<S: Separator>(&self, sep: S) -> Option<usize> {
        sep.find_in(self.rest())
    }

    pub fn has_next<S: Separator>(&self, sep: S) -> bool {
        self.find(sep).is_some()
    }

    /// Everything after the cursor.
    pub fn rest(&self) -> &'a str {
        &self.line[self.cursor..]
    }

    /// Next field parsed as a decimal number.
    pub fn next_dec<T: FromStr, S: Separator>(&mut self, sep: S, field: &'static str) -> Result<T> {
        let start = self.cursor;
        let text = self.next(sep, field)?;
        text.parse()
            .map_err(|_| Error::malformed(field, start, self.line))
    }

    /// Next field parsed as a hexadecimal number.
    pub fn next_hex<T: TryFrom<u32>, S: Separator>(
        &mut self,
        sep: S,
        field: &'static str,
    ) -> Result<T> {
        let start = self.cursor;
        let text = self.next(sep, field)?;
        parse_hex(text).ok_or_else(|| Error::malformed(field, start, self.line))
    }

    /// Next field, which must be exactly one character.
    pub fn next_char<S: Separator>(&mut self, sep: S, field: &'static str) -> Result<char> {
        let start = self.cursor;
        let text = self.next(sep, field)?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(Error::malformed(field, start, self.line)),
        }
    }

    /// Skip `sep` if the cursor sits directly on it.
    pub fn skip<S: Separator>(&mut self, sep: S) -> bool {
        if self.find(sep) == Some(0) {
            self.cursor += sep.width();
            true
        } else {
            false
        }
    }

    pub fn malformed(&self, field: &'static str) -> Error {
        Error::malformed(field, self.cursor, self.line)
    }
}

pub(crate) fn parse_hex<T: TryFrom<u32>>(text: &str) -> Option<T> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(text, 16)
        .ok()
        .and_then(|v| T::try_from(v).ok())
}

/// On-disk lemmas use `_` for spaces.
pub(crate) fn decode_lemma(raw: &str) -> String {
    raw.replace('_', " ")
}

pub(crate) fn encode_lemma(lemma: &str) -> String {
    lemma.replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_chars_and_strings() {
        let mut fields = Fields::new("02 + 08 00 + 11 00 | gloss");
        assert_eq!(fields.next(" + ", "count").unwrap(), "02");
        assert_eq!(fields.next(' ', "frame").unwrap(), "08");
        assert_eq!(fields.next(" + ", "word").unwrap(), "00");
        assert!(fields.has_next(" | "));
        assert_eq!(fields.find(" | "), Some(5));
        fields.next(" | ", "gloss").unwrap();
        assert_eq!(fields.rest(), "gloss");
    }

    #[test]
    fn missing_separator_reports_field_and_position() {
        let mut fields = Fields::new("abc def");
        fields.next(' ', "first").unwrap();
        let err = fields.next(' ', "second").unwrap_err();
        match err {
            Error::MalformedRecord {
                field, position, ..
            } => {
                assert_eq!(field, "second");
                assert_eq!(position, 4);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn radix_follows_the_caller() {
        let mut fields = Fields::new("10 10 0a n ");
        assert_eq!(fields.next_dec::<u32, _>(' ', "dec").unwrap(), 10);
        assert_eq!(fields.next_hex::<u8, _>(' ', "hex").unwrap(), 16);
        assert_eq!(fields.next_hex::<u8, _>(' ', "hex").unwrap(), 10);
        assert_eq!(fields.next_char(' ', "type").unwrap(), 'n');
    }

    #[test]
    fn rejects_bad_numbers() {
        assert!(Fields::new("x1 ").next_dec::<u32, _>(' ', "n").is_err());
        assert!(Fields::new("1ff ").next_hex::<u8, _>(' ', "n").is_err());
        assert!(Fields::new("nn ").next_char(' ', "c").is_err());
    }

    #[test]
    fn skip_only_at_cursor() {
        let mut fields = Fields::new("| gloss");
        assert!(!fields.skip(" | "));
        assert!(fields.skip("| "));
        assert_eq!(fields.rest(), "gloss");
    }
}
