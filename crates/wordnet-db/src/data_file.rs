//! `data.noun` / `data.verb` / `data.adj` / `data.adv` records.
//!
//! Each record is one line addressed by its byte offset:
//!
//! ```text
//! offset lex_filenum ss_type w_cnt (word lex_id)+ p_cnt (ptr offset pos src_tgt)* [frames] | gloss
//! ```
//!
//! Counts and lex-ids are hexadecimal for words, decimal everywhere else.
//! The file opens with license lines that start with two spaces.

use std::io::{Read, Seek};

use tracing::debug;
use wordnet_types::{
    AdjMarker, LexFile, PointerSymbol, Pos, SynsetType, VERB_FRAME_COUNT, decode_source_target,
    render_template, verb_frame_template,
};

use crate::error::{Error, Location, Result};
use crate::fields::{Fields, decode_lemma};
use crate::reader::LineReader;
use crate::sense_key::MAX_LEX_ID;
use crate::source::{FileSource, data_file_name};

#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DataWord {
    pub lemma: String,
    pub lex_id: u8,
    /// Adjective position marker, when the word carried one.
    pub marker: Option<AdjMarker>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DataPointer {
    pub symbol: PointerSymbol,
    pub offset: u32,
    pub target_type: SynsetType,
    /// 1-based word in this synset, 0 for the whole synset.
    pub source_word: u8,
    /// 1-based word in the target synset, 0 for the whole synset.
    pub target_word: u8,
}

impl DataPointer {
    /// Data file holding the target.
    pub fn target_pos(&self) -> Pos {
        self.target_type.pos()
    }

    /// Lexical pointers relate individual words; semantic ones whole synsets.
    pub fn is_lexical(&self) -> bool {
        self.source_word != 0 || self.target_word != 0
    }

    pub fn is_semantic(&self) -> bool {
        !self.is_lexical()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FramePair {
    /// Generic frame, 1-35.
    pub frame_number: u8,
    /// 1-based word the frame applies to, 0 for every word.
    pub word_number: u8,
}

/// One decoded data-file line.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SynsetRecord {
    pub offset: u32,
    pub lex_file: LexFile,
    pub synset_type: SynsetType,
    pub words: Vec<DataWord>,
    pub pointers: Vec<DataPointer>,
    pub frames: Vec<FramePair>,
    pub gloss: String,
}

/// Gloss split into its definition and quoted examples.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Gloss<'a> {
    pub raw: &'a str,
    pub definition: &'a str,
    pub examples: Vec<&'a str>,
}

impl<'a> Gloss<'a> {
    pub fn parse(raw: &'a str) -> Self {
        let trimmed = raw.trim();
        let mut examples = Vec::new();
        let mut quote_start: Option<usize> = None;
        let mut def_end = trimmed.len();
        for (idx, ch) in trimmed.char_indices() {
            match ch {
                '"' => match quote_start.take() {
                    Some(start) if idx > start + 1 => examples.push(&trimmed[start + 1..idx]),
                    Some(_) => {}
                    None => quote_start = Some(idx),
                },
                ';' if quote_start.is_none() && def_end == trimmed.len() => def_end = idx,
                _ => {}
            }
        }
        Gloss {
            raw: trimmed,
            definition: trimmed[..def_end].trim(),
            examples,
        }
    }
}

impl SynsetRecord {
    pub fn parse(line: &str) -> Result<Self> {
        let mut f = Fields::new(line);

        let offset = f.next_dec(' ', "synset_offset")?;
        let lex_filenum: u8 = f.next_dec(' ', "lex_filenum")?;
        let lex_file = LexFile::from_number(lex_filenum)
            .ok_or_else(|| Error::UnknownLexicographerFile(lex_filenum.to_string()))?;
        let synset_type = next_synset_type(&mut f, "ss_type")?;

        let w_cnt: usize = f.next_hex(' ', "w_cnt")?;
        let mut words = Vec::with_capacity(w_cnt);
        for _ in 0..w_cnt {
            let raw = f.next(' ', "word")?;
            let start = f.position();
            let lex_id: u8 = f.next_hex(' ', "lex_id")?;
            if lex_id > MAX_LEX_ID {
                return Err(Error::malformed("lex_id", start, line));
            }
            let (lemma, marker) = AdjMarker::split(raw);
            words.push(DataWord {
                lemma: decode_lemma(lemma),
                lex_id,
                marker,
            });
        }

        let p_cnt: usize = f.next_dec(' ', "p_cnt")?;
        let mut pointers = Vec::with_capacity(p_cnt);
        for _ in 0..p_cnt {
            let token = f.next(' ', "pointer_symbol")?;
            let symbol = PointerSymbol::from_symbol_in(token, synset_type.pos())
                .ok_or_else(|| Error::UnknownPointerSymbol(token.to_owned()))?;
            let offset = f.next_dec(' ', "pointer_offset")?;
            let target_type = next_synset_type(&mut f, "pointer_pos")?;
            let start = f.position();
            let (source_word, target_word) = decode_source_target(f.next(' ', "source_target")?)
                .ok_or_else(|| Error::malformed("source_target", start, line))?;
            pointers.push(DataPointer {
                symbol,
                offset,
                target_type,
                source_word,
                target_word,
            });
        }

        let mut frames = Vec::new();
        if f.skip("| ") {
            // gloss follows the pointers directly
        } else if synset_type == SynsetType::Verb {
            match (f.find(" + "), f.find(" | ")) {
                (Some(plus), Some(bar)) if plus < bar => frames = parse_frames(&mut f)?,
                _ => {
                    f.next(" | ", "gloss")?;
                }
            }
        } else {
            f.next("| ", "gloss")?;
        }

        Ok(Self {
            offset,
            lex_file,
            synset_type,
            words,
            pointers,
            frames,
            gloss: f.rest().trim().to_owned(),
        })
    }

    pub fn pos(&self) -> Pos {
        self.synset_type.pos()
    }

    pub fn gloss_parts(&self) -> Gloss<'_> {
        Gloss::parse(&self.gloss)
    }

    /// Generic frame sentences for every (frame, word) pair, in frame order.
    pub fn frame_sentences(&self) -> Vec<String> {
        let mut sentences = Vec::new();
        for frame in &self.frames {
            let Some(template) = verb_frame_template(frame.frame_number) else {
                continue;
            };
            match frame.word_number {
                0 => sentences.extend(
                    self.words
                        .iter()
                        .map(|w| render_template(template, &w.lemma)),
                ),
                n => {
                    if let Some(word) = self.words.get(n as usize - 1) {
                        sentences.push(render_template(template, &word.lemma));
                    }
                }
            }
        }
        sentences
    }
}

fn next_synset_type(f: &mut Fields<'_>, field: &'static str) -> Result<SynsetType> {
    let start = f.position();
    let c = f.next_char(' ', field)?;
    SynsetType::from_char(c).ok_or_else(|| Error::malformed(field, start, f.line()))
}

/// `f_cnt + f_num w_num [+ f_num w_num]* | `
fn parse_frames(f: &mut Fields<'_>) -> Result<Vec<FramePair>> {
    let count: usize = f.next_dec(" + ", "f_cnt")?;
    if count == 0 {
        f.next(" | ", "gloss")?;
        return Ok(Vec::new());
    }
    let mut frames = Vec::with_capacity(count);
    for i in 0..count {
        let start = f.position();
        let frame_number: u8 = f.next_dec(' ', "frame_number")?;
        if !(1..=VERB_FRAME_COUNT).contains(&frame_number) {
            return Err(Error::malformed("frame_number", start, f.line()));
        }
        let word_number = if i + 1 == count {
            f.next_hex(" | ", "frame_word")?
        } else {
            f.next_hex(" + ", "frame_word")?
        };
        frames.push(FramePair {
            frame_number,
            word_number,
        });
    }
    Ok(frames)
}

fn is_license_line(line: &str) -> bool {
    line.starts_with("  ")
}

/// Random access to one `data.<pos>` file.
pub struct DataFile<R> {
    pos: Pos,
    name: String,
    reader: LineReader<R>,
}

impl<R: Read + Seek> DataFile<R> {
    pub fn open<S>(source: &S, pos: Pos) -> Result<Self>
    where
        S: FileSource<Reader = R>,
    {
        let name = data_file_name(pos);
        let stream = source.open(&name)?;
        Self::new(stream, pos, name)
    }

    pub fn new(stream: R, pos: Pos, name: impl Into<String>) -> Result<Self> {
        Ok(Self {
            pos,
            name: name.into(),
            reader: LineReader::new(stream)?,
        })
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The record starting at `offset`.
    pub fn entry_at(&mut self, offset: u32) -> Result<SynsetRecord> {
        let at = Location::Offset(offset.into());
        let line = self
            .reader
            .read_record_at(offset.into(), is_license_line)
            .map_err(|e| e.in_file(&self.name, at, ""))?;
        let record = SynsetRecord::parse(&line).map_err(|e| e.in_file(&self.name, at, &line))?;
        if record.offset != offset {
            return Err(Error::InvalidOffset {
                offset: offset.into(),
            }
            .in_file(&self.name, at, &line));
        }
        Ok(record)
    }

    /// Records for every offset, in ascending offset order.
    ///
    /// Offsets are visited sorted so the reader only ever seeks forward. The
    /// first bad offset fails the whole batch.
    pub fn entries_at<I>(&mut self, offsets: I) -> Result<Vec<SynsetRecord>>
    where
        I: IntoIterator<Item = u32>,
    {
        let mut offsets: Vec<u32> = offsets.into_iter().collect();
        offsets.sort_unstable();
        debug!(file = %self.name, count = offsets.len(), "reading record batch");
        offsets.into_iter().map(|o| self.entry_at(o)).collect()
    }

    /// Every record in file order, license header skipped.
    pub fn records(&mut self) -> Result<Records<'_, R>> {
        self.reader.seek_to(0)?;
        Ok(Records { file: self })
    }
}

/// Iterator returned by [`DataFile::records`].
pub struct Records<'a, R> {
    file: &'a mut DataFile<R>,
}

impl<R: Read + Seek> Iterator for Records<'_, R> {
    type Item = Result<SynsetRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let offset = self.file.reader.position();
            let line = match self.file.reader.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => return None,
                Err(e) => return Some(Err(e)),
            };
            if line.trim().is_empty() || is_license_line(&line) {
                continue;
            }
            return Some(
                SynsetRecord::parse(&line)
                    .map_err(|e| e.in_file(&self.file.name, Location::Offset(offset), &line)),
            );
        }
    }
}

/// Open `data.<pos>` and read the record at `offset`.
pub fn get_entry<S: FileSource>(source: &S, pos: Pos, offset: u32) -> Result<SynsetRecord> {
    DataFile::open(source, pos)?.entry_at(offset)
}

/// Open `data.<pos>` once and read every offset, ascending.
pub fn get_entries<S, I>(source: &S, pos: Pos, offsets: I) -> Result<Vec<SynsetRecord>>
where
    S: FileSource,
    I: IntoIterator<Item = u32>,
{
    DataFile::open(source, pos)?.entries_at(offsets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    const IRON_VERB: &str = "01393487 35 v 03 iron 0 iron_out 0 press 3 006 @ 01393270 v 0000 * 00371917 v 0000 + 03589998 n 0101 + 03591044 n 0101 + 00582127 n 0101 ~ 01393140 v 0000 02 + 08 00 + 11 00 | press and smooth with a heated iron; \"press your shirts\"; \"she stood there ironing\"  ";

    #[test]
    fn decodes_verb_with_frames() {
        let rec = SynsetRecord::parse(IRON_VERB).unwrap();
        assert_eq!(rec.offset, 1393487);
        assert_eq!(rec.lex_file, LexFile::VerbContact);
        assert_eq!(rec.synset_type, SynsetType::Verb);
        let words: Vec<_> = rec.words.iter().map(|w| (w.lemma.as_str(), w.lex_id)).collect();
        assert_eq!(words, vec![("iron", 0), ("iron out", 0), ("press", 3)]);
        assert_eq!(rec.pointers.len(), 6);
        assert_eq!(rec.pointers[1].symbol, PointerSymbol::Entailment);
        let derived = &rec.pointers[2];
        assert_eq!(derived.symbol, PointerSymbol::DerivationallyRelatedForm);
        assert_eq!(derived.offset, 3589998);
        assert_eq!(derived.target_pos(), Pos::Noun);
        assert_eq!((derived.source_word, derived.target_word), (1, 1));
        assert!(derived.is_lexical());
        assert!(rec.pointers[0].is_semantic());
        assert_eq!(
            rec.frames,
            vec![
                FramePair { frame_number: 8, word_number: 0 },
                FramePair { frame_number: 11, word_number: 0 },
            ]
        );
        assert_eq!(
            rec.gloss,
            "press and smooth with a heated iron; \"press your shirts\"; \"she stood there ironing\""
        );
    }

    #[test]
    fn splits_gloss_and_renders_frames() {
        let rec = SynsetRecord::parse(IRON_VERB).unwrap();
        let gloss = rec.gloss_parts();
        assert_eq!(gloss.definition, "press and smooth with a heated iron");
        assert_eq!(gloss.examples, vec!["press your shirts", "she stood there ironing"]);

        let sentences = rec.frame_sentences();
        assert_eq!(sentences.len(), 6);
        assert_eq!(sentences[0], "Somebody irons something");
        assert_eq!(sentences[5], "Something presss something");
    }

    #[test]
    fn plus_inside_gloss_is_not_a_frame() {
        let line = "00637259 31 v 01 add 0 000 00 | do sums; \"2 + 2\"  ";
        let rec = SynsetRecord::parse(line).unwrap();
        assert!(rec.frames.is_empty());
        assert_eq!(rec.gloss, "do sums; \"2 + 2\"");
    }

    #[test]
    fn frame_for_one_word() {
        let line = "02756558 43 v 02 rain 0 rain_down 0 000 01 + 02 02 | precipitate as rain  ";
        let rec = SynsetRecord::parse(line).unwrap();
        assert_eq!(rec.frames, vec![FramePair { frame_number: 2, word_number: 2 }]);
        assert_eq!(rec.frame_sentences(), vec!["Somebody rain downs"]);
    }

    #[test]
    fn decodes_adjective_markers_and_adverb_pertainyms() {
        let adj = "01383650 00 s 01 galore(ip) 0 001 & 01382086 a 0000 | in great numbers  ";
        let rec = SynsetRecord::parse(adj).unwrap();
        assert_eq!(rec.synset_type, SynsetType::AdjSatellite);
        assert_eq!(rec.words[0].lemma, "galore");
        assert_eq!(rec.words[0].marker, Some(AdjMarker::Postnominal));

        let adv = "00004722 02 r 01 abnormally 0 001 \\ 00013887 a 0101 | in an abnormal manner  ";
        let rec = SynsetRecord::parse(adv).unwrap();
        assert_eq!(rec.pointers[0].symbol, PointerSymbol::DerivedFromAdjective);
    }

    #[test]
    fn rejects_unknown_symbols_and_bad_fields() {
        let line = "00001740 03 n 01 entity 0 001 ?? 00001930 n 0000 | thing  ";
        assert!(matches!(
            SynsetRecord::parse(line),
            Err(Error::UnknownPointerSymbol(s)) if s == "??"
        ));
        let bad_frame = "00000001 35 v 01 go 0 000 01 + 36 00 | move  ";
        assert!(matches!(
            SynsetRecord::parse(bad_frame),
            Err(Error::MalformedRecord { field: "frame_number", .. })
        ));
        assert!(matches!(
            SynsetRecord::parse("00000001 03 n 01 entity 0 000 no gloss"),
            Err(Error::MalformedRecord { field: "gloss", .. })
        ));
        assert!(matches!(
            SynsetRecord::parse("00000001 99 n 00 000 | x"),
            Err(Error::UnknownLexicographerFile(_))
        ));
    }

    /// A two-record noun file and the offsets of both records.
    fn source() -> (MemorySource, u32, u32) {
        let header = "  1 license text  \n";
        let first_offset = header.len();
        let first = format!("{first_offset:08} 03 n 01 entity 0 000 | that which exists  ");
        let second_offset = first_offset + first.len() + 1;
        let second = format!(
            "{second_offset:08} 03 n 01 thing 0 001 @ {first_offset:08} n 0000 | an entity  "
        );
        let source = MemorySource::new().with("data.noun", format!("{header}{first}\n{second}\n"));
        (source, first_offset as u32, second_offset as u32)
    }

    #[test]
    fn reads_records_by_offset_and_in_batches() {
        let (source, first_offset, second_offset) = source();
        let mut file = DataFile::open(&source, Pos::Noun).unwrap();
        let second = file.entry_at(second_offset).unwrap();
        assert_eq!(second.words[0].lemma, "thing");
        let first = file.entry_at(second.pointers[0].offset).unwrap();
        assert_eq!(first.words[0].lemma, "entity");
        assert_eq!(first.offset, first_offset);

        let batch = get_entries(&source, Pos::Noun, [second_offset, first_offset]).unwrap();
        let offsets: Vec<_> = batch.iter().map(|r| r.offset).collect();
        assert_eq!(offsets, vec![first_offset, second_offset]);

        let all: Vec<_> = file.records().unwrap().collect::<Result<_>>().unwrap();
        assert_eq!(all, batch);
    }

    #[test]
    fn header_and_misaligned_offsets_are_invalid() {
        let (source, first_offset, _) = source();
        for offset in [0, first_offset + 1, 10_000] {
            let err = get_entry(&source, Pos::Noun, offset).unwrap_err();
            assert!(
                matches!(err.root(), Error::InvalidOffset { .. }),
                "{offset}: {err}"
            );
        }
        assert!(matches!(
            get_entries(&source, Pos::Noun, [first_offset, 0]).unwrap_err().root(),
            Error::InvalidOffset { offset: 0 }
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_records() {
        let rec = SynsetRecord::parse(IRON_VERB).unwrap();
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["words"][1]["lemma"], "iron out");
        assert_eq!(json["synset_type"], "Verb");
    }
}
