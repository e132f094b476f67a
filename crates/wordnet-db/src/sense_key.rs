use std::fmt;
use std::str::FromStr;

use wordnet_types::{LexFile, SynsetType};

use crate::error::{Error, Result};
use crate::fields::{Fields, decode_lemma, encode_lemma};

/// Highest lex-id the lexicographer format can express.
pub const MAX_LEX_ID: u8 = 15;

/// `lemma%ss_type:lex_filenum:lex_id:head_word:head_id`
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SenseKey {
    /// Lemma with spaces restored.
    pub lemma: String,
    pub synset_type: SynsetType,
    pub lex_file: LexFile,
    pub lex_id: u8,
    /// Head word of the cluster; empty unless the sense is a satellite.
    pub head_word: String,
    pub head_id: u8,
}

impl SenseKey {
    pub fn parse(key: &str) -> Result<Self> {
        let malformed = |reason| Error::MalformedSenseKey {
            key: key.to_owned(),
            reason,
        };
        let mut fields = Fields::new(key);

        let lemma = fields
            .next('%', "lemma")
            .map_err(|_| malformed("missing '%' after lemma"))?;
        if lemma.is_empty() {
            return Err(malformed("empty lemma"));
        }

        let ss_type = fields
            .next(':', "ss_type")
            .map_err(|_| malformed("missing ss_type"))?;
        let synset_type = ss_type
            .parse::<u8>()
            .ok()
            .and_then(SynsetType::from_digit)
            .ok_or_else(|| malformed("ss_type is not a digit from 1 to 5"))?;

        let lex_filenum = fields
            .next(':', "lex_filenum")
            .map_err(|_| malformed("missing lex_filenum"))?;
        let number: u8 = lex_filenum
            .parse()
            .map_err(|_| malformed("lex_filenum is not numeric"))?;
        let lex_file = LexFile::from_number(number)
            .ok_or_else(|| Error::UnknownLexicographerFile(lex_filenum.to_owned()))?;

        let lex_id = fields
            .next(':', "lex_id")
            .map_err(|_| malformed("missing lex_id"))?
            .parse::<u8>()
            .map_err(|_| malformed("lex_id is not numeric"))?;
        if lex_id > MAX_LEX_ID {
            return Err(malformed("lex_id above 15"));
        }

        let head_word = fields
            .next(':', "head_word")
            .map_err(|_| malformed("missing head_word"))?;
        let head_id = match fields.rest() {
            "" => 0,
            raw => raw
                .parse()
                .map_err(|_| malformed("head_id is not numeric"))?,
        };

        Ok(Self {
            lemma: decode_lemma(lemma),
            synset_type,
            lex_file,
            lex_id,
            head_word: head_word.to_owned(),
            head_id,
        })
    }

    pub fn is_satellite(&self) -> bool {
        self.synset_type == SynsetType::AdjSatellite
    }
}

impl FromStr for SenseKey {
    type Err = Error;

    fn from_str(key: &str) -> Result<Self> {
        Self::parse(key)
    }
}

impl fmt::Display for SenseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}%{}:{:02}:{:02}:{}:",
            encode_lemma(&self.lemma),
            self.synset_type.to_digit(),
            self.lex_file.number(),
            self.lex_id,
            self.head_word,
        )?;
        if !self.head_word.is_empty() {
            write!(f, "{:02}", self.head_id)?;
        }
        Ok(())
    }
}
