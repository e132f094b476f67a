//! Random-access decoders for the WordNet flat-file database.
//!
//! WordNet ships as cross-referencing text files: `index.sense` maps sense
//! keys to byte offsets in `data.<pos>`, data records point at other records
//! by offset, and the lexicographer sources, exception lists and verb
//! sentence files fill in the rest. This crate decodes each file family into
//! typed records and reads data records straight from their byte offsets, so
//! resolving a sense never loads a whole data file.
//!
//! Files come from a [`FileSource`]: a [`DictDir`] on disk (memory-mapped,
//! owned or streamed, see [`LoadMode`]) or an in-memory [`MemorySource`].
//!
//! # Example
//! ```no_run
//! use wordnet_db::{DictDir, LoadMode, SenseIndex, data_file};
//!
//! # fn main() -> wordnet_db::Result<()> {
//! let dict = DictDir::new("/path/to/wordnet/dict", LoadMode::Mmap);
//! let index = SenseIndex::load(&dict)?;
//! for entry in index.entries_for("iron") {
//!     let pos = entry.key.synset_type.pos();
//!     let synset = data_file::get_entry(&dict, pos, entry.offset)?;
//!     println!("{} {}: {}", entry.key, synset.words.len(), synset.gloss);
//! }
//! # Ok(()) }
//! ```
//!
//! For a runnable demo, see `cargo run -p wordnet-db --example dump -- <dict> <lemma>`.

pub mod data_file;
mod error;
pub mod exceptions;
pub mod fields;
pub mod lexfile;
pub mod reader;
pub mod sense_index;
pub mod sense_key;
pub mod sentences;
pub mod source;

pub use data_file::{DataFile, DataPointer, DataWord, FramePair, Gloss, SynsetRecord};
pub use error::{Error, Location, Result};
pub use exceptions::{ExceptionList, ExceptionListEntry};
pub use lexfile::{
    ClusterAccumulator, ClusterGroup, LexFileReader, LexPointer, LexSynset, LexWord,
    SynsetCluster,
};
pub use reader::LineReader;
pub use sense_index::{SenseIndex, SenseIndexEntry};
pub use sense_key::SenseKey;
pub use sentences::{VerbExampleSentenceEntry, VerbExampleSentences};
pub use source::{DictDir, DictFile, FileSource, LoadMode, MemorySource};
