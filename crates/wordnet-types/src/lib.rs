//! Closed vocabularies shared by every WordNet flat-file decoder.
//!
//! WordNet encodes parts of speech, lexicographer files and pointer types as
//! short tokens (`n`, `05`, `@i`, ...). Each vocabulary here is a plain enum
//! plus a lookup from its on-disk token. Lookups return `None` for tokens
//! outside the vocabulary; nothing defaults silently.
//!
//! ```rust
//! use wordnet_types::{LexFile, PointerSymbol, Pos, SynsetType, decode_source_target};
//!
//! assert_eq!(SynsetType::from_digit(5), Some(SynsetType::AdjSatellite));
//! assert_eq!(SynsetType::AdjSatellite.pos(), Pos::Adj);
//! assert_eq!(LexFile::from_name("noun.Tops"), Some(LexFile::NounTops));
//! assert_eq!(PointerSymbol::from_symbol("@i"), Some(PointerSymbol::InstanceHypernym));
//! assert_eq!(decode_source_target("0a0b"), Some((10, 11)));
//! ```

use std::fmt;

/// Syntactic category, one per `data.*`/`index.*`/`*.exc` file family.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Pos {
    Noun,
    Verb,
    Adj,
    Adv,
}

impl Pos {
    pub const ALL: [Pos; 4] = [Pos::Noun, Pos::Verb, Pos::Adj, Pos::Adv];

    /// Parse a WordNet POS character into an enum.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'n' => Some(Pos::Noun),
            'v' => Some(Pos::Verb),
            'a' | 's' => Some(Pos::Adj),
            'r' => Some(Pos::Adv),
            _ => None,
        }
    }

    /// Emit the POS character used in `index.*`/`data.*`.
    pub fn to_char(self) -> char {
        match self {
            Pos::Noun => 'n',
            Pos::Verb => 'v',
            Pos::Adj => 'a',
            Pos::Adv => 'r',
        }
    }

    /// Suffix/prefix used in file names (`data.noun`, `adj.exc`).
    pub fn file_stem(self) -> &'static str {
        match self {
            Pos::Noun => "noun",
            Pos::Verb => "verb",
            Pos::Adj => "adj",
            Pos::Adv => "adv",
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

/// Raw `ss_type` marker, including adjective satellites.
///
/// Sense keys spell it as a digit (`1`..`5`), data files as a character.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SynsetType {
    Noun,
    Verb,
    Adj,
    Adv,
    AdjSatellite,
}

impl SynsetType {
    /// Parse the `ss_type` character from a data line.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'n' => Some(SynsetType::Noun),
            'v' => Some(SynsetType::Verb),
            'a' => Some(SynsetType::Adj),
            's' => Some(SynsetType::AdjSatellite),
            'r' => Some(SynsetType::Adv),
            _ => None,
        }
    }

    /// Parse the `ss_type` digit from a sense key.
    pub fn from_digit(d: u8) -> Option<Self> {
        match d {
            1 => Some(SynsetType::Noun),
            2 => Some(SynsetType::Verb),
            3 => Some(SynsetType::Adj),
            4 => Some(SynsetType::Adv),
            5 => Some(SynsetType::AdjSatellite),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            SynsetType::Noun => 'n',
            SynsetType::Verb => 'v',
            SynsetType::Adj => 'a',
            SynsetType::AdjSatellite => 's',
            SynsetType::Adv => 'r',
        }
    }

    pub fn to_digit(self) -> u8 {
        match self {
            SynsetType::Noun => 1,
            SynsetType::Verb => 2,
            SynsetType::Adj => 3,
            SynsetType::Adv => 4,
            SynsetType::AdjSatellite => 5,
        }
    }

    /// Syntactic category whose files hold synsets of this type.
    pub fn pos(self) -> Pos {
        match self {
            SynsetType::Noun => Pos::Noun,
            SynsetType::Verb => Pos::Verb,
            SynsetType::Adj | SynsetType::AdjSatellite => Pos::Adj,
            SynsetType::Adv => Pos::Adv,
        }
    }
}

/// Syntactic position marker written directly after an adjective, e.g.
/// `galore(ip)`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum AdjMarker {
    /// `(a)`: prenominal only.
    Attributive,
    /// `(p)`: predicate position only.
    Predicative,
    /// `(ip)`: immediately after the noun.
    Postnominal,
}

impl AdjMarker {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "a" => Some(AdjMarker::Attributive),
            "p" => Some(AdjMarker::Predicative),
            "ip" => Some(AdjMarker::Postnominal),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            AdjMarker::Attributive => "a",
            AdjMarker::Predicative => "p",
            AdjMarker::Postnominal => "ip",
        }
    }

    /// Split a trailing marker off `word`; words without one come back whole.
    pub fn split(word: &str) -> (&str, Option<Self>) {
        if let Some(body) = word.strip_suffix(')')
            && let Some(open) = body.rfind('(')
            && let Some(marker) = Self::from_tag(&body[open + 1..])
        {
            return (&body[..open], Some(marker));
        }
        (word, None)
    }
}

/// One of the 45 lexicographer source files.
///
/// Discriminants are the `lex_filenum` values found in data files and sense
/// keys.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum LexFile {
    AdjAll = 0,
    AdjPert = 1,
    AdvAll = 2,
    NounTops = 3,
    NounAct = 4,
    NounAnimal = 5,
    NounArtifact = 6,
    NounAttribute = 7,
    NounBody = 8,
    NounCognition = 9,
    NounCommunication = 10,
    NounEvent = 11,
    NounFeeling = 12,
    NounFood = 13,
    NounGroup = 14,
    NounLocation = 15,
    NounMotive = 16,
    NounObject = 17,
    NounPerson = 18,
    NounPhenomenon = 19,
    NounPlant = 20,
    NounPossession = 21,
    NounProcess = 22,
    NounQuantity = 23,
    NounRelation = 24,
    NounShape = 25,
    NounState = 26,
    NounSubstance = 27,
    NounTime = 28,
    VerbBody = 29,
    VerbChange = 30,
    VerbCognition = 31,
    VerbCommunication = 32,
    VerbCompetition = 33,
    VerbConsumption = 34,
    VerbContact = 35,
    VerbCreation = 36,
    VerbEmotion = 37,
    VerbMotion = 38,
    VerbPerception = 39,
    VerbPossession = 40,
    VerbSocial = 41,
    VerbStative = 42,
    VerbWeather = 43,
    AdjPpl = 44,
}

const LEX_FILES: [(LexFile, &str); 45] = [
    (LexFile::AdjAll, "adj.all"),
    (LexFile::AdjPert, "adj.pert"),
    (LexFile::AdvAll, "adv.all"),
    (LexFile::NounTops, "noun.tops"),
    (LexFile::NounAct, "noun.act"),
    (LexFile::NounAnimal, "noun.animal"),
    (LexFile::NounArtifact, "noun.artifact"),
    (LexFile::NounAttribute, "noun.attribute"),
    (LexFile::NounBody, "noun.body"),
    (LexFile::NounCognition, "noun.cognition"),
    (LexFile::NounCommunication, "noun.communication"),
    (LexFile::NounEvent, "noun.event"),
    (LexFile::NounFeeling, "noun.feeling"),
    (LexFile::NounFood, "noun.food"),
    (LexFile::NounGroup, "noun.group"),
    (LexFile::NounLocation, "noun.location"),
    (LexFile::NounMotive, "noun.motive"),
    (LexFile::NounObject, "noun.object"),
    (LexFile::NounPerson, "noun.person"),
    (LexFile::NounPhenomenon, "noun.phenomenon"),
    (LexFile::NounPlant, "noun.plant"),
    (LexFile::NounPossession, "noun.possession"),
    (LexFile::NounProcess, "noun.process"),
    (LexFile::NounQuantity, "noun.quantity"),
    (LexFile::NounRelation, "noun.relation"),
    (LexFile::NounShape, "noun.shape"),
    (LexFile::NounState, "noun.state"),
    (LexFile::NounSubstance, "noun.substance"),
    (LexFile::NounTime, "noun.time"),
    (LexFile::VerbBody, "verb.body"),
    (LexFile::VerbChange, "verb.change"),
    (LexFile::VerbCognition, "verb.cognition"),
    (LexFile::VerbCommunication, "verb.communication"),
    (LexFile::VerbCompetition, "verb.competition"),
    (LexFile::VerbConsumption, "verb.consumption"),
    (LexFile::VerbContact, "verb.contact"),
    (LexFile::VerbCreation, "verb.creation"),
    (LexFile::VerbEmotion, "verb.emotion"),
    (LexFile::VerbMotion, "verb.motion"),
    (LexFile::VerbPerception, "verb.perception"),
    (LexFile::VerbPossession, "verb.possession"),
    (LexFile::VerbSocial, "verb.social"),
    (LexFile::VerbStative, "verb.stative"),
    (LexFile::VerbWeather, "verb.weather"),
    (LexFile::AdjPpl, "adj.ppl"),
];

impl LexFile {
    /// Every lexicographer file in `lex_filenum` order.
    pub fn all() -> impl Iterator<Item = LexFile> {
        LEX_FILES.iter().map(|(file, _)| *file)
    }

    /// Look up a file by its `lex_filenum`.
    pub fn from_number(n: u8) -> Option<Self> {
        LEX_FILES.get(n as usize).map(|(file, _)| *file)
    }

    /// Look up a file by name as written in pointer qualifiers.
    ///
    /// Matching ignores ASCII case and accepts `_` in place of `.`, so
    /// `noun.Tops`, `NOUN_TOPS` and `noun.tops` all resolve.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        LEX_FILES.iter().find_map(|(file, canonical)| {
            let same = name.len() == canonical.len()
                && name
                    .bytes()
                    .zip(canonical.bytes())
                    .all(|(a, b)| a.to_ascii_lowercase() == b || (a == b'_' && b == b'.'));
            same.then_some(*file)
        })
    }

    pub fn number(self) -> u8 {
        self as u8
    }

    /// Logical file name, e.g. `noun.animal`.
    pub fn file_name(self) -> &'static str {
        LEX_FILES[self as usize].1
    }

    pub fn pos(self) -> Pos {
        match self {
            LexFile::AdjAll | LexFile::AdjPert | LexFile::AdjPpl => Pos::Adj,
            LexFile::AdvAll => Pos::Adv,
            f if (f as u8) <= LexFile::NounTime as u8 => Pos::Noun,
            _ => Pos::Verb,
        }
    }
}

impl fmt::Display for LexFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Relation type carried by a pointer.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PointerSymbol {
    Antonym,
    Hypernym,
    InstanceHypernym,
    Hyponym,
    InstanceHyponym,
    MemberHolonym,
    SubstanceHolonym,
    PartHolonym,
    MemberMeronym,
    SubstanceMeronym,
    PartMeronym,
    Attribute,
    DerivationallyRelatedForm,
    DomainOfSynsetTopic,
    MemberOfThisDomainTopic,
    DomainOfSynsetRegion,
    MemberOfThisDomainRegion,
    DomainOfSynsetUsage,
    MemberOfThisDomainUsage,
    Entailment,
    Cause,
    AlsoSee,
    VerbGroup,
    SimilarTo,
    ParticipleOfVerb,
    Pertainym,
    DerivedFromAdjective,
}

impl PointerSymbol {
    /// Look up a pointer symbol token.
    ///
    /// `\` is ambiguous on disk: it is a pertainym for adjectives and
    /// "derived from adjective" for adverbs. This returns [`Pertainym`];
    /// use [`from_symbol_in`] when the source category is known.
    ///
    /// [`Pertainym`]: PointerSymbol::Pertainym
    /// [`from_symbol_in`]: PointerSymbol::from_symbol_in
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        use PointerSymbol::*;
        Some(match symbol {
            "!" => Antonym,
            "@" => Hypernym,
            "@i" => InstanceHypernym,
            "~" => Hyponym,
            "~i" => InstanceHyponym,
            "#m" => MemberHolonym,
            "#s" => SubstanceHolonym,
            "#p" => PartHolonym,
            "%m" => MemberMeronym,
            "%s" => SubstanceMeronym,
            "%p" => PartMeronym,
            "=" => Attribute,
            "+" => DerivationallyRelatedForm,
            ";c" => DomainOfSynsetTopic,
            "-c" => MemberOfThisDomainTopic,
            ";r" => DomainOfSynsetRegion,
            "-r" => MemberOfThisDomainRegion,
            ";u" => DomainOfSynsetUsage,
            "-u" => MemberOfThisDomainUsage,
            "*" => Entailment,
            ">" => Cause,
            "^" => AlsoSee,
            "$" => VerbGroup,
            "&" => SimilarTo,
            "<" => ParticipleOfVerb,
            "\\" => Pertainym,
            _ => return None,
        })
    }

    /// Look up a pointer symbol found in a synset of category `pos`.
    pub fn from_symbol_in(symbol: &str, pos: Pos) -> Option<Self> {
        match (Self::from_symbol(symbol)?, pos) {
            (PointerSymbol::Pertainym, Pos::Adv) => Some(PointerSymbol::DerivedFromAdjective),
            (found, _) => Some(found),
        }
    }

    /// On-disk token for this symbol.
    pub fn symbol(self) -> &'static str {
        use PointerSymbol::*;
        match self {
            Antonym => "!",
            Hypernym => "@",
            InstanceHypernym => "@i",
            Hyponym => "~",
            InstanceHyponym => "~i",
            MemberHolonym => "#m",
            SubstanceHolonym => "#s",
            PartHolonym => "#p",
            MemberMeronym => "%m",
            SubstanceMeronym => "%s",
            PartMeronym => "%p",
            Attribute => "=",
            DerivationallyRelatedForm => "+",
            DomainOfSynsetTopic => ";c",
            MemberOfThisDomainTopic => "-c",
            DomainOfSynsetRegion => ";r",
            MemberOfThisDomainRegion => "-r",
            DomainOfSynsetUsage => ";u",
            MemberOfThisDomainUsage => "-u",
            Entailment => "*",
            Cause => ">",
            AlsoSee => "^",
            VerbGroup => "$",
            SimilarTo => "&",
            ParticipleOfVerb => "<",
            Pertainym | DerivedFromAdjective => "\\",
        }
    }
}

/// Token substituted by the lemma when a sentence template is rendered.
pub const LEMMA_PLACEHOLDER: &str = "{lemma}";

/// Number of generic verb frames.
pub const VERB_FRAME_COUNT: u8 = 35;

const VERB_FRAME_TEMPLATES: [&str; VERB_FRAME_COUNT as usize] = [
    "Something {lemma}s",
    "Somebody {lemma}s",
    "It is {lemma}ing",
    "Something is {lemma}ing PP",
    "Something {lemma}s something Adjective/Noun",
    "Something {lemma}s Adjective/Noun",
    "Somebody {lemma}s Adjective",
    "Somebody {lemma}s something",
    "Somebody {lemma}s somebody",
    "Something {lemma}s somebody",
    "Something {lemma}s something",
    "Something {lemma}s to somebody",
    "Somebody {lemma}s on something",
    "Somebody {lemma}s somebody something",
    "Somebody {lemma}s something to somebody",
    "Somebody {lemma}s something from somebody",
    "Somebody {lemma}s somebody with something",
    "Somebody {lemma}s somebody of something",
    "Somebody {lemma}s something on somebody",
    "Somebody {lemma}s somebody PP",
    "Somebody {lemma}s something PP",
    "Somebody {lemma}s PP",
    "Somebody's (body part) {lemma}s",
    "Somebody {lemma}s somebody to INFINITIVE",
    "Somebody {lemma}s somebody INFINITIVE",
    "Somebody {lemma}s that CLAUSE",
    "Somebody {lemma}s to somebody",
    "Somebody {lemma}s to INFINITIVE",
    "Somebody {lemma}s whether INFINITIVE",
    "Somebody {lemma}s somebody into V-ing something",
    "Somebody {lemma}s something with something",
    "Somebody {lemma}s INFINITIVE",
    "Somebody {lemma}s VERB-ing",
    "It {lemma}s that CLAUSE",
    "Something {lemma}s INFINITIVE",
];

/// Generic sentence frame `frame_number` (1-based), if it exists.
pub fn verb_frame_template(frame_number: u8) -> Option<&'static str> {
    let idx = (frame_number as usize).checked_sub(1)?;
    VERB_FRAME_TEMPLATES.get(idx).copied()
}

/// Substitute `lemma` for every [`LEMMA_PLACEHOLDER`] in `template`.
pub fn render_template(template: &str, lemma: &str) -> String {
    template.replace(LEMMA_PLACEHOLDER, lemma)
}

/// Decode the four-hex source/target field used in pointer blocks.
///
/// High byte is the source word number, low byte is the target word number.
/// Zero means the pointer applies to the whole synset. Returns `None` unless
/// the field is exactly four hex digits.
pub fn decode_source_target(hex4: &str) -> Option<(u8, u8)> {
    if hex4.len() != 4 || !hex4.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let val = u16::from_str_radix(hex4, 16).ok()?;
    Some(((val >> 8) as u8, (val & 0x00FF) as u8))
}
