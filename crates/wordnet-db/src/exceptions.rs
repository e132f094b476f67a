//! Morphological exception lists (`noun.exc`, `verb.exc`, `adj.exc`, `adv.exc`).
//!
//! Each line maps an irregular inflected form to one or more base forms:
//! `geese goose`, `axes ax axis`.

use std::collections::HashMap;
use std::io::{BufRead, BufReader};

use tracing::info;
use wordnet_types::Pos;

use crate::error::{Location, Result};
use crate::fields::Fields;
use crate::reader::Lines;
use crate::source::{FileSource, exception_file_name};

#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ExceptionListEntry {
    pub pos: Pos,
    pub inflected: String,
    /// Everything after the inflected form; may list several base forms.
    pub base: String,
}

impl ExceptionListEntry {
    pub fn parse(line: &str, pos: Pos) -> Result<Self> {
        let mut fields = Fields::new(line.trim_end());
        let inflected = fields.next(' ', "inflected_form")?;
        let base = fields.rest().trim();
        if inflected.is_empty() || base.is_empty() {
            return Err(fields.malformed("base_form"));
        }
        Ok(Self {
            pos,
            inflected: inflected.to_owned(),
            base: base.to_owned(),
        })
    }

    pub fn base_forms(&self) -> impl Iterator<Item = &str> {
        self.base.split_whitespace()
    }
}

/// One loaded exception file.
#[derive(Debug)]
pub struct ExceptionList {
    pos: Pos,
    entries: Vec<ExceptionListEntry>,
    by_inflected: HashMap<String, Vec<usize>>,
}

impl ExceptionList {
    pub fn load<S: FileSource>(source: &S, pos: Pos) -> Result<Self> {
        let name = exception_file_name(pos);
        let reader = BufReader::new(source.open(&name)?);
        Self::from_reader(reader, pos, &name)
    }

    pub fn from_reader<B: BufRead>(reader: B, pos: Pos, file: &str) -> Result<Self> {
        let mut entries = Vec::new();
        let mut by_inflected: HashMap<String, Vec<usize>> = HashMap::new();
        for line in Lines::new(reader) {
            let (number, line) = line?;
            if line.trim().is_empty() {
                continue;
            }
            let entry = ExceptionListEntry::parse(&line, pos)
                .map_err(|e| e.in_file(file, Location::Line(number), &line))?;
            by_inflected
                .entry(entry.inflected.clone())
                .or_default()
                .push(entries.len());
            entries.push(entry);
        }
        info!(file, entries = entries.len(), "loaded exception list");
        Ok(Self {
            pos,
            entries,
            by_inflected,
        })
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn entries(&self) -> &[ExceptionListEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every base form listed for `inflected`, in file order.
    pub fn base_forms<'a>(&'a self, inflected: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        self.by_inflected
            .get(inflected)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .flat_map(|&i| self.entries[i].base_forms())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::Error;

    #[test]
    fn splits_at_first_space() {
        let entry = ExceptionListEntry::parse("axes ax axis", Pos::Noun).unwrap();
        assert_eq!(entry.inflected, "axes");
        assert_eq!(entry.base, "ax axis");
        assert_eq!(entry.base_forms().collect::<Vec<_>>(), vec!["ax", "axis"]);
        assert!(ExceptionListEntry::parse("lonely", Pos::Noun).is_err());
        assert!(ExceptionListEntry::parse("trailing ", Pos::Noun).is_err());
    }

    #[test]
    fn loads_and_looks_up() {
        let text = "geese goose\n\naxes ax\naxes axis\r\n";
        let list = ExceptionList::from_reader(Cursor::new(text), Pos::Noun, "noun.exc").unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list.pos(), Pos::Noun);
        assert_eq!(list.base_forms("axes").collect::<Vec<_>>(), vec!["ax", "axis"]);
        assert_eq!(list.base_forms("geese").collect::<Vec<_>>(), vec!["goose"]);
        assert_eq!(list.base_forms("dogs").count(), 0);
    }

    #[test]
    fn malformed_line_names_file_and_line() {
        let err = ExceptionList::from_reader(Cursor::new("ran run\nbroken\n"), Pos::Verb, "verb.exc")
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InFile { ref file, location: Location::Line(2), .. } if file == "verb.exc"
        ));
    }
}
