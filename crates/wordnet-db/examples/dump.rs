use std::env;

use anyhow::{Context, Result, bail};
use tracing::info;
use tracing_subscriber::EnvFilter;
use wordnet_db::source::exception_file_name;
use wordnet_db::{DictDir, ExceptionList, LoadMode, SenseIndex, VerbExampleSentences, data_file};
use wordnet_types::Pos;

const USAGE: &str = "usage: cargo run -p wordnet-db --example dump -- [<dict-dir>] <lemma>";

fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    let (dict, lemma) = match args.as_slice() {
        [dir, lemma] => (DictDir::new(dir, LoadMode::default()), lemma.clone()),
        [lemma] => (
            DictDir::from_env().context("WORDNET_DIR not set and no dictionary given")?,
            lemma.clone(),
        ),
        _ => bail!(USAGE),
    };
    let lemma = lemma.replace('_', " ").to_lowercase();

    let index = SenseIndex::load(&dict)
        .with_context(|| format!("loading sense index from {}", dict.root().display()))?;
    if !index.contains_lemma(&lemma) {
        println!("{lemma}: no senses");
        return Ok(());
    }
    info!(lemma = %lemma, senses = index.entries_for(&lemma).len(), "resolved");

    for pos in Pos::ALL {
        let offsets: Vec<u32> = index
            .entries_for(&lemma)
            .filter(|e| e.key.synset_type.pos() == pos)
            .map(|e| e.offset)
            .collect();
        if offsets.is_empty() {
            continue;
        }
        let records = data_file::get_entries(&dict, pos, offsets)
            .with_context(|| format!("reading {pos} records"))?;

        println!("== {pos} ({} synsets)", records.len());
        for record in &records {
            let words: Vec<&str> = record.words.iter().map(|w| w.lemma.as_str()).collect();
            let gloss = record.gloss_parts();
            println!(
                "{:08} [{}] {}: {}",
                record.offset,
                record.lex_file,
                words.join(", "),
                gloss.definition
            );
            for example in &gloss.examples {
                println!("    e.g. {example}");
            }
            if !record.pointers.is_empty() {
                println!("    {} pointers", record.pointers.len());
            }
            for sentence in record.frame_sentences() {
                println!("    frame: {sentence}");
            }
        }
    }

    for pos in Pos::ALL {
        if !dict.path_for(&exception_file_name(pos)).is_file() {
            continue;
        }
        let exceptions = ExceptionList::load(&dict, pos)?;
        let bases: Vec<&str> = exceptions.base_forms(&lemma).collect();
        if !bases.is_empty() {
            println!("{pos} base forms: {}", bases.join(", "));
        }
    }

    let sentences = VerbExampleSentences::load(&dict).context("loading verb sentences")?;
    if let Some(entry) = sentences.find(&lemma) {
        for sentence in sentences.sentences(entry) {
            println!("verb example: {sentence}");
        }
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
