//! Reflow pipeline example.
//!
//! Reads OCR fragment records from JSON files, reconstructs reading order and
//! writes one formatted text file per document.
//!
//! Each input file holds an array of records:
//!
//! ```json
//! [{"page_number": 1, "left": 120, "top": 300, "right": 1250, "bottom": 900,
//!   "text": "The cat sat on the mat."}]
//! ```
//!
//! Records without a `document_id` take the file stem.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example reflow_pipeline -- \
//!     --word-frequencies data/words.txt \
//!     --names data/authors.txt \
//!     --output-dir out \
//!     issue-1901-03.json issue-1901-04.json
//! ```

use clap::Parser;
use periodical_reflow::core::init_tracing;
use periodical_reflow::domain::{Fragment, FragmentRecord};
use periodical_reflow::pipeline::{ConfigLoader, ReflowBuilder, ReflowConfig};
use periodical_reflow::processors::BylineRecognizer;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Command-line arguments for the reflow example.
#[derive(Parser)]
#[command(name = "reflow_pipeline")]
#[command(about = "Reflow Pipeline Example - reading order for OCR'd periodicals")]
struct Args {
    /// JSON files of fragment records.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Pipeline configuration (.toml or .json). Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Reference author names, one per line. Overrides the configured path.
    #[arg(long)]
    names: Option<PathBuf>,

    /// Word frequency table (`word count` per line). Overrides the configured path.
    #[arg(long)]
    word_frequencies: Option<PathBuf>,

    /// Directory for the output text files.
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Also write the plain reading-order text as `<document>.plain.txt`.
    #[arg(long)]
    plain: bool,
}

/// Loads one input file, numbering records per page in file order.
fn load_fragments(path: &Path) -> Result<Vec<Fragment>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    let records: Vec<FragmentRecord> = serde_json::from_str(&content)?;
    let fallback_id = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document")
        .to_string();

    let mut next_sequence = std::collections::HashMap::new();
    let mut fragments = Vec::with_capacity(records.len());
    for record in records {
        let sequence = next_sequence.entry(record.page_number).or_insert(0usize);
        fragments.push(Fragment::from_record(record, *sequence, &fallback_id)?);
        *sequence += 1;
    }
    Ok(fragments)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let args = Args::parse();

    info!("Reflow Pipeline Example");

    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ReflowConfig::default(),
    };
    if let Some(path) = args.word_frequencies {
        config.text.word_frequencies_path = Some(path);
    }
    if let Some(path) = args.names {
        config.names.author_names_path = Some(path);
    }

    let reflow = ReflowBuilder::from_config(config)
        .name_recognizer(Arc::new(BylineRecognizer))
        .build()?;

    let mut fragments = Vec::new();
    for input in &args.inputs {
        match load_fragments(input) {
            Ok(loaded) => {
                info!("{}: {} fragments", input.display(), loaded.len());
                fragments.extend(loaded);
            }
            Err(e) => error!("Skipping {}: {}", input.display(), e),
        }
    }
    if fragments.is_empty() {
        error!("No fragments loaded");
        return Err("No fragments loaded".into());
    }

    let outcome = reflow.process_batch(fragments);

    std::fs::create_dir_all(&args.output_dir)?;
    for document in &outcome.documents {
        let path = args.output_dir.join(format!("{}.txt", document.id));
        std::fs::write(&path, document.to_formatted_text())?;
        info!("Wrote {}", path.display());
        if args.plain {
            let path = args.output_dir.join(format!("{}.plain.txt", document.id));
            std::fs::write(&path, document.to_plain_text())?;
        }
    }
    for failure in &outcome.failures {
        warn!("{} not written: {}", failure.document_id, failure.error);
    }

    info!("{}", reflow.stats());
    Ok(())
}
