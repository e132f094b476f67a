use std::collections::HashMap;
use std::io::{BufRead, BufReader};

use tracing::info;

use crate::error::{Error, Location, Result};
use crate::fields::Fields;
use crate::reader::Lines;
use crate::sense_key::SenseKey;
use crate::source::{FileSource, SENSE_INDEX};

/// One `index.sense` line: `sense_key synset_offset sense_number tag_cnt`.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SenseIndexEntry {
    pub key: SenseKey,
    /// Byte offset of the synset in `data.<pos>`.
    pub offset: u32,
    pub sense_number: u32,
    pub tag_count: u32,
}

impl SenseIndexEntry {
    pub fn parse(line: &str) -> Result<Self> {
        let mut fields = Fields::new(line);
        let key = SenseKey::parse(fields.next(' ', "sense_key")?)?;
        let offset = fields.next_dec(' ', "synset_offset")?;
        let sense_number = fields.next_dec(' ', "sense_number")?;
        let start = fields.position();
        let tag_count = fields
            .rest()
            .trim_end()
            .parse()
            .map_err(|_| Error::malformed("tag_cnt", start, line))?;
        Ok(Self {
            key,
            offset,
            sense_number,
            tag_count,
        })
    }
}

/// All sense entries, grouped by lemma.
///
/// Entries keep file order; the grouping preserves that order per lemma.
#[derive(Debug, Default)]
pub struct SenseIndex {
    entries: Vec<SenseIndexEntry>,
    by_lemma: HashMap<String, Vec<usize>>,
}

impl SenseIndex {
    /// Load `index.sense` from `source`.
    pub fn load<S: FileSource>(source: &S) -> Result<Self> {
        let reader = BufReader::new(source.open(SENSE_INDEX)?);
        Self::from_reader(reader, SENSE_INDEX)
    }

    /// Decode an `index.sense` stream; `file` names it in errors.
    pub fn from_reader<B: BufRead>(reader: B, file: &str) -> Result<Self> {
        let mut entries = Vec::new();
        for line in Lines::new(reader) {
            let (number, line) = line?;
            if line.trim().is_empty() {
                continue;
            }
            let entry = SenseIndexEntry::parse(&line)
                .map_err(|e| e.in_file(file, Location::Line(number), &line))?;
            entries.push(entry);
        }
        let index = Self::from_entries(entries);
        info!(
            entries = index.len(),
            lemmas = index.lemma_count(),
            "loaded sense index"
        );
        Ok(index)
    }

    pub fn from_entries(entries: Vec<SenseIndexEntry>) -> Self {
        let mut by_lemma: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, entry) in entries.iter().enumerate() {
            by_lemma.entry(entry.key.lemma.clone()).or_default().push(i);
        }
        Self { entries, by_lemma }
    }

    /// Entries for a decoded lemma (spaces, not underscores), in file order.
    pub fn entries_for<'a>(
        &'a self,
        lemma: &str,
    ) -> impl ExactSizeIterator<Item = &'a SenseIndexEntry> + use<'a> {
        let indices = self.by_lemma.get(lemma).map(Vec::as_slice).unwrap_or(&[]);
        indices.iter().map(|&i| &self.entries[i])
    }

    pub fn entries(&self) -> &[SenseIndexEntry] {
        &self.entries
    }

    pub fn get(&self, key: &SenseKey) -> Option<&SenseIndexEntry> {
        self.entries_for(&key.lemma).find(|e| &e.key == key)
    }

    pub fn contains_lemma(&self, lemma: &str) -> bool {
        self.by_lemma.contains_key(lemma)
    }

    pub fn lemma_count(&self) -> usize {
        self.by_lemma.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
