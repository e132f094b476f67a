use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while opening or decoding WordNet files.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("malformed {field} at position {position} in {line:?}")]
    MalformedRecord {
        field: &'static str,
        position: usize,
        line: String,
    },

    #[error("malformed sense key {key:?}: {reason}")]
    MalformedSenseKey { key: String, reason: &'static str },

    #[error("unknown pointer symbol {0:?}")]
    UnknownPointerSymbol(String),

    #[error("unknown lexicographer file {0:?}")]
    UnknownLexicographerFile(String),

    #[error("no record starts at offset {offset}")]
    InvalidOffset { offset: u64 },

    #[error("unsupported construct: {0}")]
    UnsupportedConstruct(String),

    #[error("{file} ({location}): {source}")]
    InFile {
        file: String,
        location: Location,
        line: String,
        source: Box<Error>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Where inside a file a wrapped error happened.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Location {
    /// 1-based line number.
    Line(usize),
    /// Byte offset of the record.
    Offset(u64),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Line(n) => write!(f, "line {n}"),
            Location::Offset(o) => write!(f, "offset {o}"),
        }
    }
}

impl Error {
    pub(crate) fn malformed(field: &'static str, position: usize, line: &str) -> Self {
        Error::MalformedRecord {
            field,
            position,
            line: line.to_owned(),
        }
    }

    /// Attach file name, location and the raw line to a decode error.
    pub fn in_file(self, file: &str, location: Location, line: &str) -> Self {
        Error::InFile {
            file: file.to_owned(),
            location,
            line: line.to_owned(),
            source: Box::new(self),
        }
    }

    /// The innermost error, looking through any [`Error::InFile`] wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Error::InFile { source, .. } => source.root(),
            other => other,
        }
    }
}
