//! Lexicographer source files (`dbfiles/noun.artifact`, `dbfiles/adj.all`, ...).
//!
//! These are the hand-written sources the data files were compiled from. A
//! synset is one line:
//!
//! ```text
//! { [ driver, verb.contact:drive3,+ ] number_one_wood, wood2,@ frames: 8 (gloss) }
//! ```
//!
//! Words end in a comma and may carry a lex-id suffix; pointers are
//! `[lexfile:]word[lexid][^satellite[lexid]],symbol`; a bracketed set binds
//! pointers and frames to one word. `adj.all` wraps synsets in multi-line
//! `[ ... ]` clusters.

use std::borrow::Cow;
use std::io::{BufRead, BufReader, Read, Seek};
use std::sync::LazyLock;

use regex::Regex;
use tracing::info;
use wordnet_types::{AdjMarker, LexFile, PointerSymbol, VERB_FRAME_COUNT};

use crate::error::{Error, Location, Result};
use crate::reader::{LineReader, Lines};
use crate::sense_key::MAX_LEX_ID;
use crate::source::FileSource;

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\(.*\)",
        r"|\[.*?\]",
        r"|frames:\s*[\d,\s]*",
        r"|[^\s,()\[\]{}]+(?:\((?:a|p|ip)\))?,\S{1,2}",
        r"|[^\s,()\[\]{}]+(?:\((?:a|p|ip)\))?,",
    ))
    .unwrap()
});

static COLON_SPACING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*:\s*").unwrap());

const FRAMES_TAG: &str = "frames:";

#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LexWord {
    pub lemma: String,
    pub lex_id: u8,
    pub marker: Option<AdjMarker>,
    /// Pointers scoped to this word by a `[ ... ]` set.
    pub pointers: Vec<LexPointer>,
    /// Frames scoped to this word by a `[ ... ]` set.
    pub frames: Vec<u8>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LexPointer {
    /// Target file when it differs from the file being read.
    pub lex_file: Option<LexFile>,
    pub lemma: String,
    pub lex_id: u8,
    /// Satellite word after `^`, binding the pointer to one word of a cluster.
    pub satellite: Option<String>,
    pub satellite_lex_id: u8,
    pub symbol: PointerSymbol,
}

/// One `{ ... }` synset of a lexicographer file.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LexSynset {
    pub words: Vec<LexWord>,
    pub pointers: Vec<LexPointer>,
    pub frames: Vec<u8>,
    pub gloss: String,
}

/// Error context for one regex token.
struct Token<'a> {
    text: &'a str,
    line: &'a str,
    at: usize,
}

impl Token<'_> {
    fn malformed(&self, field: &'static str) -> Error {
        Error::malformed(field, self.at, self.line)
    }
}

impl LexSynset {
    pub fn parse(line: &str) -> Result<Self> {
        let line = separate_frames_tag(line);
        let mut synset = LexSynset::default();
        for m in TOKEN.find_iter(&line) {
            let token = Token {
                text: m.as_str(),
                line: &line,
                at: m.start(),
            };
            let text = token.text;
            if let Some(inner) = text.strip_prefix('(') {
                synset.gloss = inner.strip_suffix(')').unwrap_or(inner).trim().to_owned();
            } else if text.starts_with('[') {
                synset.words.push(parse_word_set(&token)?);
            } else if text.starts_with(FRAMES_TAG) {
                synset.frames = parse_frames(text, &token)?;
            } else if text.ends_with(',') {
                synset.words.push(parse_word(text, &token)?);
            } else {
                synset.pointers.push(parse_pointer(text, &token)?);
            }
        }
        Ok(synset)
    }
}

/// Put a space in front of a `frames:` tag glued to the previous token.
fn separate_frames_tag(line: &str) -> Cow<'_, str> {
    let glued = |i: usize| {
        line[..i]
            .chars()
            .next_back()
            .is_some_and(|c| !c.is_whitespace())
    };
    if !line.match_indices(FRAMES_TAG).any(|(i, _)| glued(i)) {
        return Cow::Borrowed(line);
    }
    let mut out = String::with_capacity(line.len() + 2);
    let mut last = 0;
    for (i, _) in line.match_indices(FRAMES_TAG) {
        out.push_str(&line[last..i]);
        if glued(i) {
            out.push(' ');
        }
        last = i;
    }
    out.push_str(&line[last..]);
    Cow::Owned(out)
}

/// `[ word, ptr ptr ... frames: n,n ]`
fn parse_word_set(token: &Token<'_>) -> Result<LexWord> {
    let inner = token
        .text
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .ok_or_else(|| token.malformed("word_set"))?;
    let inner = COLON_SPACING.replace_all(inner.trim(), ":");
    let (items, frames) = match inner.find(FRAMES_TAG) {
        Some(i) => (&inner[..i], parse_frames(&inner[i..], token)?),
        None => (&inner[..], Vec::new()),
    };
    let mut items = items.split_whitespace();
    let head = items.next().ok_or_else(|| token.malformed("word"))?;
    let mut word = parse_word(head, token)?;
    for item in items {
        word.pointers.push(parse_pointer(item, token)?);
    }
    word.frames = frames;
    Ok(word)
}

/// `lemma[lexid][(marker)],`
fn parse_word(text: &str, token: &Token<'_>) -> Result<LexWord> {
    let body = text
        .strip_suffix(',')
        .ok_or_else(|| token.malformed("word"))?;
    let (body, marker) = AdjMarker::split(body);
    let (lemma, lex_id) = split_lex_id(body, token)?;
    Ok(LexWord {
        lemma,
        lex_id,
        marker,
        ..LexWord::default()
    })
}

/// `[lexfile:]lemma[lexid][^satellite[lexid]],symbol`
fn parse_pointer(text: &str, token: &Token<'_>) -> Result<LexPointer> {
    let (lex_file, rest) = match text.split_once(':') {
        Some((name, rest)) => {
            let file = LexFile::from_name(name)
                .ok_or_else(|| Error::UnknownLexicographerFile(name.to_owned()))?;
            (Some(file), rest)
        }
        None => (None, text),
    };
    let (target, symbol) = rest
        .split_once(',')
        .ok_or_else(|| token.malformed("pointer"))?;
    let symbol = PointerSymbol::from_symbol(symbol)
        .ok_or_else(|| Error::UnknownPointerSymbol(symbol.to_owned()))?;
    let (head, satellite) = match target.split_once('^') {
        Some((head, sat)) => (head, Some(split_lex_id(sat, token)?)),
        None => (target, None),
    };
    let (lemma, lex_id) = split_lex_id(head, token)?;
    let (satellite, satellite_lex_id) = match satellite {
        Some((lemma, id)) => (Some(lemma), id),
        None => (None, 0),
    };
    Ok(LexPointer {
        lex_file,
        lemma,
        lex_id,
        satellite,
        satellite_lex_id,
        symbol,
    })
}

/// Split the lex-id suffix off a raw word.
///
/// A trailing `"` means lex-id 0 and lets a word end in digits
/// (`number_1"`). Otherwise up to two trailing digits are the lex-id. Stray
/// quotes are dropped from the lemma.
fn split_lex_id(raw: &str, token: &Token<'_>) -> Result<(String, u8)> {
    let (stem, lex_id) = match raw.strip_suffix('"') {
        Some(stem) => (stem, 0),
        None => {
            let digits = raw
                .bytes()
                .rev()
                .take(2)
                .take_while(u8::is_ascii_digit)
                .count();
            let (stem, id) = raw.split_at(raw.len() - digits);
            let lex_id = if id.is_empty() {
                0
            } else {
                id.parse().map_err(|_| token.malformed("lex_id"))?
            };
            (stem, lex_id)
        }
    };
    if lex_id > MAX_LEX_ID {
        return Err(token.malformed("lex_id"));
    }
    let lemma = stem.replace('"', "").replace('_', " ");
    if lemma.trim().is_empty() {
        return Err(token.malformed("lemma"));
    }
    Ok((lemma, lex_id))
}

fn parse_frames(text: &str, token: &Token<'_>) -> Result<Vec<u8>> {
    let list = text
        .trim()
        .strip_prefix(FRAMES_TAG)
        .ok_or_else(|| token.malformed("frames"))?;
    list.split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(|n| match n.parse::<u8>() {
            Ok(frame) if (1..=VERB_FRAME_COUNT).contains(&frame) => Ok(frame),
            _ => Err(token.malformed("frame_number")),
        })
        .collect()
}

/// A head synset and its satellites.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ClusterGroup {
    pub head: LexSynset,
    pub satellites: Vec<LexSynset>,
}

/// One `adj.all` cluster: a head group followed by any number of additional
/// groups separated by `-` lines.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SynsetCluster {
    pub head: LexSynset,
    pub satellites: Vec<LexSynset>,
    pub additional: Vec<ClusterGroup>,
}

impl ClusterGroup {
    fn parse(lines: &[&str]) -> Result<Self> {
        let (head, satellites) = lines
            .split_first()
            .ok_or_else(|| Error::malformed("cluster_group", 0, ""))?;
        Ok(Self {
            head: LexSynset::parse(head)?,
            satellites: satellites
                .iter()
                .map(|line| LexSynset::parse(line))
                .collect::<Result<_>>()?,
        })
    }
}

impl SynsetCluster {
    /// Decode an accumulated cluster, or a lone `{ ... }` head.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let Some(body) = text.strip_prefix('[') else {
            return Ok(Self {
                head: LexSynset::parse(text)?,
                satellites: Vec::new(),
                additional: Vec::new(),
            });
        };
        let body = body
            .trim_end()
            .strip_suffix(']')
            .ok_or_else(|| Error::malformed("cluster", text.len(), text))?;

        let mut groups: Vec<Vec<&str>> = vec![Vec::new()];
        for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if line.starts_with('-') {
                groups.push(Vec::new());
            } else if let Some(group) = groups.last_mut() {
                group.push(line);
            }
        }

        let mut groups = groups
            .iter()
            .filter(|g| !g.is_empty())
            .map(|g| ClusterGroup::parse(g));
        let first = groups
            .next()
            .ok_or_else(|| Error::malformed("cluster", 0, text))??;
        Ok(Self {
            head: first.head,
            satellites: first.satellites,
            additional: groups.collect::<Result<_>>()?,
        })
    }
}

/// Joins physical lines into logical entries.
///
/// Lines that do not open a `[` block pass straight through. A `[` block
/// collects lines until its brackets balance.
#[derive(Debug, Default)]
pub struct ClusterAccumulator {
    text: String,
    depth: i64,
}

impl ClusterAccumulator {
    pub fn push(&mut self, line: &str) -> Option<String> {
        if self.text.is_empty() && !line.starts_with('[') {
            return Some(line.to_owned());
        }
        if !self.text.is_empty() {
            self.text.push('\n');
        }
        self.text.push_str(line);
        self.depth += bracket_delta(line);
        if self.depth > 0 {
            return None;
        }
        self.depth = 0;
        Some(std::mem::take(&mut self.text))
    }

    pub fn is_pending(&self) -> bool {
        !self.text.is_empty()
    }

    /// Text collected so far for an unclosed block.
    pub fn pending(&self) -> &str {
        &self.text
    }
}

fn bracket_delta(line: &str) -> i64 {
    line.bytes().fold(0, |acc, b| match b {
        b'[' => acc + 1,
        b']' => acc - 1,
        _ => acc,
    })
}

fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('(')
}

/// Run `decode` over every logical entry of a lexicographer file.
fn for_each_entry<B: BufRead>(
    reader: B,
    file: &str,
    mut decode: impl FnMut(&str) -> Result<()>,
) -> Result<()> {
    let mut acc = ClusterAccumulator::default();
    let mut start = 0;
    for line in Lines::new(reader) {
        let (number, line) = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !acc.is_pending() {
            if is_comment(line) {
                continue;
            }
            start = number;
        }
        if let Some(text) = acc.push(line) {
            decode(&text).map_err(|e| e.in_file(file, Location::Line(start), &text))?;
        }
    }
    if acc.is_pending() {
        return Err(Error::malformed("cluster", acc.pending().len(), acc.pending()).in_file(
            file,
            Location::Line(start),
            acc.pending(),
        ));
    }
    Ok(())
}

/// Reader over one lexicographer file.
pub struct LexFileReader<R> {
    file: LexFile,
    stream: R,
}

impl<R: Read + Seek> LexFileReader<R> {
    pub fn open<S>(source: &S, file: LexFile) -> Result<Self>
    where
        S: FileSource<Reader = R>,
    {
        Ok(Self::new(source.open(file.file_name())?, file))
    }

    pub fn new(stream: R, file: LexFile) -> Self {
        Self { file, stream }
    }

    pub fn lex_file(&self) -> LexFile {
        self.file
    }

    /// Every synset in the file. Not available for `adj.all`.
    pub fn entries(&mut self) -> Result<Vec<LexSynset>> {
        self.expect_clusters(false, "entries")?;
        self.stream.rewind()?;
        let mut synsets = Vec::new();
        for_each_entry(
            BufReader::new(&mut self.stream),
            self.file.file_name(),
            |text| {
                synsets.push(LexSynset::parse(&text.replace('\n', " "))?);
                Ok(())
            },
        )?;
        info!(file = %self.file, synsets = synsets.len(), "decoded lexicographer file");
        Ok(synsets)
    }

    /// Every cluster of `adj.all`.
    pub fn clusters(&mut self) -> Result<Vec<SynsetCluster>> {
        self.expect_clusters(true, "clusters")?;
        self.stream.rewind()?;
        let mut clusters = Vec::new();
        for_each_entry(
            BufReader::new(&mut self.stream),
            self.file.file_name(),
            |text| {
                clusters.push(SynsetCluster::parse(text)?);
                Ok(())
            },
        )?;
        info!(file = %self.file, clusters = clusters.len(), "decoded adjective clusters");
        Ok(clusters)
    }

    /// The synset starting at byte `offset`. Not available for `adj.all`.
    pub fn entry_at(&mut self, offset: u64) -> Result<LexSynset> {
        self.expect_clusters(false, "entry_at")?;
        let name = self.file.file_name();
        let at = Location::Offset(offset);
        let mut reader = LineReader::new(&mut self.stream)?;
        let mut line = reader
            .read_record_at(offset, is_comment)
            .map_err(|e| e.in_file(name, at, ""))?;

        let mut acc = ClusterAccumulator::default();
        let text = loop {
            let trimmed = line.trim();
            if !trimmed.is_empty()
                && let Some(text) = acc.push(trimmed)
            {
                break text;
            }
            line = match reader.next_line()? {
                Some(next) => next,
                None => {
                    return Err(Error::malformed("entry", acc.pending().len(), acc.pending())
                        .in_file(name, at, acc.pending()));
                }
            };
        };
        LexSynset::parse(&text.replace('\n', " ")).map_err(|e| e.in_file(name, at, &text))
    }

    fn expect_clusters(&self, clusters: bool, op: &str) -> Result<()> {
        let is_adj_all = self.file == LexFile::AdjAll;
        if is_adj_all == clusters {
            return Ok(());
        }
        let hint = if is_adj_all {
            "adj.all is organised in clusters; use clusters()"
        } else {
            "only adj.all has clusters"
        };
        Err(Error::UnsupportedConstruct(format!(
            "{op}() on {}: {hint}",
            self.file
        )))
    }
}
