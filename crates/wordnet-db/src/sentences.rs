//! Verb example sentences (`sents.vrb` + `sentidx.vrb`).
//!
//! `sents.vrb` holds numbered templates with `%s` where the verb goes;
//! `sentidx.vrb` lists, per verb sense key, which templates illustrate it.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::io::{BufRead, BufReader};

use tracing::info;
use wordnet_types::{LEMMA_PLACEHOLDER, render_template};

use crate::error::{Error, Location, Result};
use crate::fields::Fields;
use crate::reader::Lines;
use crate::sense_key::SenseKey;
use crate::source::{FileSource, SENTENCE_INDEX, SENTENCES};

/// Sentence numbers recorded for one verb sense.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VerbExampleSentenceEntry {
    pub key: SenseKey,
    pub sentence_numbers: Vec<u16>,
}

impl VerbExampleSentenceEntry {
    /// `sense_key n,n,...`; empty list items are skipped.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim_end();
        let mut fields = Fields::new(line);
        let has_list = fields.has_next(' ');
        let key = if has_list {
            fields.next(' ', "sense_key")?
        } else {
            line
        };
        let key = SenseKey::parse(key)?;

        let mut sentence_numbers = Vec::new();
        while has_list {
            let start = fields.position();
            let (item, last) = if fields.has_next(',') {
                (fields.next(',', "sentence_number")?, false)
            } else {
                (fields.rest(), true)
            };
            let item = item.trim();
            if !item.is_empty() {
                let number = item
                    .parse()
                    .map_err(|_| Error::malformed("sentence_number", start, line))?;
                sentence_numbers.push(number);
            }
            if last {
                break;
            }
        }
        Ok(Self {
            key,
            sentence_numbers,
        })
    }
}

/// Parse one `sents.vrb` line into its number and placeholder template.
pub fn parse_template(line: &str) -> Result<(u16, String)> {
    let mut fields = Fields::new(line);
    let number = fields.next_dec(' ', "sentence_number")?;
    let template = fields.rest().trim().replace("%s", LEMMA_PLACEHOLDER);
    Ok((number, template))
}

/// Loaded sentence templates and the per-sense index.
#[derive(Debug, Default)]
pub struct VerbExampleSentences {
    templates: HashMap<u16, String>,
    entries: Vec<VerbExampleSentenceEntry>,
    first_by_lemma: HashMap<String, usize>,
}

impl VerbExampleSentences {
    pub fn load<S: FileSource>(source: &S) -> Result<Self> {
        let sents = BufReader::new(source.open(SENTENCES)?);
        let index = BufReader::new(source.open(SENTENCE_INDEX)?);
        Self::from_readers(sents, index)
    }

    pub fn from_readers<A: BufRead, B: BufRead>(sents: A, index: B) -> Result<Self> {
        let mut templates = HashMap::new();
        for line in Lines::new(sents) {
            let (number, line) = line?;
            if line.trim().is_empty() {
                continue;
            }
            let wrap = |e: Error| e.in_file(SENTENCES, Location::Line(number), &line);
            let (n, template) = parse_template(&line).map_err(wrap)?;
            match templates.entry(n) {
                Entry::Vacant(slot) => {
                    slot.insert(template);
                }
                Entry::Occupied(_) => {
                    return Err(wrap(Error::malformed("duplicate sentence_number", 0, &line)));
                }
            }
        }

        let mut entries = Vec::new();
        let mut first_by_lemma = HashMap::new();
        for line in Lines::new(index) {
            let (number, line) = line?;
            if line.trim().is_empty() {
                continue;
            }
            let wrap = |e: Error| e.in_file(SENTENCE_INDEX, Location::Line(number), &line);
            let entry = VerbExampleSentenceEntry::parse(&line).map_err(wrap)?;
            if entry
                .sentence_numbers
                .iter()
                .any(|n| !templates.contains_key(n))
            {
                return Err(wrap(Error::malformed("sentence_number", 0, &line)));
            }
            first_by_lemma
                .entry(entry.key.lemma.clone())
                .or_insert(entries.len());
            entries.push(entry);
        }

        info!(
            templates = templates.len(),
            senses = entries.len(),
            "loaded verb example sentences"
        );
        Ok(Self {
            templates,
            entries,
            first_by_lemma,
        })
    }

    /// Template `number` with the `{lemma}` placeholder.
    pub fn template(&self, number: u16) -> Option<&str> {
        self.templates.get(&number).map(String::as_str)
    }

    pub fn entries(&self) -> &[VerbExampleSentenceEntry] {
        &self.entries
    }

    /// First entry whose sense key has this lemma.
    pub fn find(&self, lemma: &str) -> Option<&VerbExampleSentenceEntry> {
        self.first_by_lemma.get(lemma).map(|&i| &self.entries[i])
    }

    /// Sentences for `entry`, rendered on demand in list order.
    pub fn sentences<'a>(
        &'a self,
        entry: &'a VerbExampleSentenceEntry,
    ) -> impl Iterator<Item = String> + 'a {
        entry
            .sentence_numbers
            .iter()
            .filter_map(|n| self.templates.get(n))
            .map(|template| render_template(template, &entry.key.lemma))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    const SENTS: &str = "1 The children %s to the playground\n15 Sam and Sue %s the movie\n16 The performance is likely to %s Sue\n17 Sam cannot %s Sue\n";
    const INDEX: &str = "bankroll%2:40:00:: 15\nembarrass%2:37:00:: 16,17\npet%2:35:00:: \nrattle%2:37:00:: 17,,1,\n";

    fn load() -> VerbExampleSentences {
        VerbExampleSentences::from_readers(Cursor::new(SENTS), Cursor::new(INDEX)).unwrap()
    }

    #[test]
    fn templates_use_the_lemma_placeholder() {
        let (n, template) = parse_template("1 The children %s to the playground").unwrap();
        assert_eq!(n, 1);
        assert_eq!(template, "The children {lemma} to the playground");
    }

    #[test]
    fn entries_skip_empty_items() {
        let entry = VerbExampleSentenceEntry::parse("rattle%2:37:00:: 17,,1,").unwrap();
        assert_eq!(entry.sentence_numbers, vec![17, 1]);
        let bare = VerbExampleSentenceEntry::parse("pet%2:35:00::").unwrap();
        assert!(bare.sentence_numbers.is_empty());
        assert!(VerbExampleSentenceEntry::parse("pet%2:35:00:: x").is_err());
    }

    #[test]
    fn renders_sentences_in_list_order() {
        let sentences = load();
        assert_eq!(sentences.entries().len(), 4);

        let bankroll = sentences.find("bankroll").unwrap();
        assert_eq!(
            sentences.sentences(bankroll).collect::<Vec<_>>(),
            vec!["Sam and Sue bankroll the movie"]
        );
        let pet = sentences.find("pet").unwrap();
        assert_eq!(sentences.sentences(pet).count(), 0);
        let embarrass = sentences.find("embarrass").unwrap();
        assert_eq!(
            sentences.sentences(embarrass).collect::<Vec<_>>(),
            vec![
                "The performance is likely to embarrass Sue",
                "Sam cannot embarrass Sue"
            ]
        );
        assert!(sentences.find("walk").is_none());
    }

    #[test]
    fn unknown_template_fails_load() {
        let err = VerbExampleSentences::from_readers(
            Cursor::new(SENTS),
            Cursor::new("walk%2:38:00:: 99\n"),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::InFile { location: Location::Line(1), .. }
        ));
    }
}
