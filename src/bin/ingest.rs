//! Ingest one transcript file and print the resulting record plus tags
//! as JSON. Dictionary locations come from `MEETCORE_DICT_DIR` or the
//! default `~/.meetcore/dictionaries`.

use std::collections::HashSet;
use std::fs;
use std::process::ExitCode;

use meetcore::tags::{classify, TagRuleSource};
use meetcore::types::TagMeta;
use meetcore::{ingest, load_stopwords, DictionaryPaths, JsonCandidateStore, PersonDirectory};

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("Usage: meetcore-ingest <transcript-file> [threshold]");
        return ExitCode::from(2);
    };
    let threshold: u32 = match args.next() {
        Some(raw) => match raw.parse() {
            Ok(t) => t,
            Err(_) => {
                eprintln!("threshold must be a non-negative integer, got '{raw}'");
                return ExitCode::from(2);
            }
        },
        None => 1,
    };

    let text = match fs::read_to_string(&path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Failed to read {path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let paths = DictionaryPaths::resolve();
    let directory = PersonDirectory::load(&paths.people);
    let stopwords: HashSet<String> = load_stopwords(&paths.stopwords);
    let index = TagRuleSource::load(&paths.tags, &paths.legacy_synonyms).into_index();
    let mut store = JsonCandidateStore::new(&paths.candidates);

    let record = match ingest::run(&text, &path, &directory, &stopwords, &mut store) {
        Ok(record) => record,
        Err(e) => {
            eprintln!("Ingestion failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    let meta = TagMeta {
        title: record.title.clone(),
        attendees: record.attendees.clone(),
    };
    let tags = classify(&record.text, &meta, threshold, &index);

    let out = serde_json::json!({ "record": record, "tags": tags });
    match serde_json::to_string_pretty(&out) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Failed to serialize output: {e}");
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
