//! Where logical WordNet files come from.
//!
//! Decoders never touch paths directly: they ask a [`FileSource`] for a
//! logical file name (`"data.noun"`, `"index.sense"`, `"noun.artifact"`)
//! and get back a seekable stream.

use std::collections::HashMap;
use std::env;
use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use memmap2::Mmap;
use tracing::{debug, warn};
use wordnet_types::Pos;

use crate::error::{Error, Result};

pub const SENSE_INDEX: &str = "index.sense";
pub const SENTENCES: &str = "sents.vrb";
pub const SENTENCE_INDEX: &str = "sentidx.vrb";

/// Lexicographer files live here when the dictionary ships them.
const LEX_SUBDIR: &str = "dbfiles";

pub fn data_file_name(pos: Pos) -> String {
    format!("data.{}", pos.file_stem())
}

pub fn exception_file_name(pos: Pos) -> String {
    format!("{}.exc", pos.file_stem())
}

/// Opens logical WordNet files by name.
pub trait FileSource {
    type Reader: Read + Seek;

    fn open(&self, name: &str) -> Result<Self::Reader>;
}

impl<T: FileSource + ?Sized> FileSource for &T {
    type Reader = T::Reader;

    fn open(&self, name: &str) -> Result<Self::Reader> {
        (**self).open(name)
    }
}

/// Strategy for loading dictionary files.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LoadMode {
    /// Memory-map each file.
    #[default]
    Mmap,
    /// Read each file into an owned buffer.
    Owned,
    /// Read straight from the open file handle.
    Stream,
}

impl FromStr for LoadMode {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "mmap" => Ok(LoadMode::Mmap),
            "owned" => Ok(LoadMode::Owned),
            "stream" => Ok(LoadMode::Stream),
            other => Err(format!(
                "invalid load mode '{other}', expected 'mmap', 'owned' or 'stream'"
            )),
        }
    }
}

enum Buffer {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl AsRef<[u8]> for Buffer {
    fn as_ref(&self) -> &[u8] {
        match self {
            Buffer::Mmap(m) => m.as_ref(),
            Buffer::Owned(v) => v.as_slice(),
        }
    }
}

/// An open dictionary file.
pub struct DictFile(Backing);

enum Backing {
    Buffered(Cursor<Buffer>),
    Stream(File),
}

impl Read for DictFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.0 {
            Backing::Buffered(c) => c.read(buf),
            Backing::Stream(f) => f.read(buf),
        }
    }
}

impl Seek for DictFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match &mut self.0 {
            Backing::Buffered(c) => c.seek(pos),
            Backing::Stream(f) => f.seek(pos),
        }
    }
}

/// A WordNet dictionary directory (`data.*`, `index.sense`, `*.exc`, ...),
/// optionally with lexicographer sources under `dbfiles/`.
#[derive(Clone, Debug)]
pub struct DictDir {
    root: PathBuf,
    mode: LoadMode,
}

impl DictDir {
    pub fn new(root: impl Into<PathBuf>, mode: LoadMode) -> Self {
        let root = root.into();
        if !root.join(LEX_SUBDIR).is_dir() {
            warn!(dir = %root.display(), "dictionary has no {LEX_SUBDIR}/ directory");
        }
        Self { root, mode }
    }

    /// Dictionary named by `WORDNET_DIR`, loaded per `WORDNET_LOAD_MODE`.
    ///
    /// Returns `None` when `WORDNET_DIR` is unset. An unrecognised load mode
    /// falls back to [`LoadMode::Mmap`].
    pub fn from_env() -> Option<Self> {
        let root = env::var_os("WORDNET_DIR")?;
        let mode = match env::var("WORDNET_LOAD_MODE") {
            Ok(raw) => raw.parse().unwrap_or_else(|err: String| {
                warn!(error = %err, "falling back to mmap");
                LoadMode::Mmap
            }),
            Err(_) => LoadMode::default(),
        };
        Some(Self::new(root, mode))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn mode(&self) -> LoadMode {
        self.mode
    }

    /// Path a logical name resolves to: the root first, then `dbfiles/`.
    pub fn path_for(&self, name: &str) -> PathBuf {
        let direct = self.root.join(name);
        if direct.exists() {
            return direct;
        }
        let nested = self.root.join(LEX_SUBDIR).join(name);
        if nested.exists() { nested } else { direct }
    }
}

impl FileSource for DictDir {
    type Reader = DictFile;

    fn open(&self, name: &str) -> Result<DictFile> {
        load_file(self.path_for(name), self.mode)
    }
}

fn load_file(path: PathBuf, mode: LoadMode) -> Result<DictFile> {
    let file = match File::open(&path) {
        Ok(file) => file,
        Err(source) => return Err(Error::Open { path, source }),
    };
    debug!(path = %path.display(), ?mode, "opened wordnet file");
    let backing = match mode {
        LoadMode::Mmap => {
            // SAFETY: dictionary files are treated as read-only for the life of the map.
            let map = unsafe { Mmap::map(&file) }.map_err(|source| Error::Open {
                path: path.clone(),
                source,
            })?;
            Backing::Buffered(Cursor::new(Buffer::Mmap(map)))
        }
        LoadMode::Owned => {
            let mut file = file;
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)
                .map_err(|source| Error::Open { path, source })?;
            Backing::Buffered(Cursor::new(Buffer::Owned(buf)))
        }
        LoadMode::Stream => Backing::Stream(file),
    };
    Ok(DictFile(backing))
}

/// Named in-memory files.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    files: HashMap<String, Arc<[u8]>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, contents: impl Into<Vec<u8>>) {
        self.files.insert(name.into(), contents.into().into());
    }

    pub fn with(mut self, name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(name, contents);
        self
    }
}

impl FileSource for MemorySource {
    type Reader = Cursor<Arc<[u8]>>;

    fn open(&self, name: &str) -> Result<Self::Reader> {
        match self.files.get(name) {
            Some(bytes) => Ok(Cursor::new(Arc::clone(bytes))),
            None => Err(Error::Open {
                path: PathBuf::from(name),
                source: io::Error::from(io::ErrorKind::NotFound),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Write;

    use super::*;

    #[test]
    fn parses_load_mode() {
        assert_eq!("mmap".parse::<LoadMode>().unwrap(), LoadMode::Mmap);
        assert_eq!("OWNED".parse::<LoadMode>().unwrap(), LoadMode::Owned);
        assert_eq!("Stream".parse::<LoadMode>().unwrap(), LoadMode::Stream);
        assert!("bogus".parse::<LoadMode>().is_err());
    }

    #[test]
    fn file_names_follow_category() {
        assert_eq!(data_file_name(Pos::Adj), "data.adj");
        assert_eq!(exception_file_name(Pos::Verb), "verb.exc");
    }

    #[test]
    fn every_mode_reads_the_same_bytes() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("dbfiles")).unwrap();
        fs::File::create(dir.path().join("data.noun"))
            .unwrap()
            .write_all(b"hello\nworld\n")
            .unwrap();
        fs::write(dir.path().join("dbfiles").join("noun.tops"), "{ entity }\n").unwrap();

        for mode in [LoadMode::Mmap, LoadMode::Owned, LoadMode::Stream] {
            let source = DictDir::new(dir.path(), mode);
            let mut file = source.open("data.noun").unwrap();
            file.seek(SeekFrom::Start(6)).unwrap();
            let mut text = String::new();
            file.read_to_string(&mut text).unwrap();
            assert_eq!(text, "world\n", "{mode:?}");

            let mut lex = String::new();
            source.open("noun.tops").unwrap().read_to_string(&mut lex).unwrap();
            assert_eq!(lex, "{ entity }\n");
        }
    }

    #[test]
    fn missing_files_name_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = DictDir::new(dir.path(), LoadMode::Owned)
            .open("data.adv")
            .err()
            .unwrap();
        assert!(matches!(err, Error::Open { ref path, .. } if path.ends_with("data.adv")));

        let err = MemorySource::new().open("index.sense").err().unwrap();
        assert!(err.to_string().contains("index.sense"));
    }
}
