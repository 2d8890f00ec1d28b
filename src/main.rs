// src/main.rs
mod corpus;
mod extractors;
mod markup;
mod source;
mod storage;
mod utils;

use std::io::Write;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use corpus::{CorpusEntry, CorpusMerger};
use extractors::SectionSegmenter;
use source::{DirectorySource, DocumentSource};
use storage::CacheStore;
use utils::AppError;

/// Command Line Interface for the section corpus extractor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory containing the markup documents to process
    #[arg(short, long)]
    input_dir: String,

    /// Maximum number of documents to process
    #[arg(long, default_value = "2000")]
    max_articles: usize,

    /// Path of the JSON corpus cache
    #[arg(short, long, default_value = "./proofwiki_data.json")]
    cache_file: String,

    /// Reparse the corpus even if a cache file exists
    #[arg(short, long)]
    force: bool,

    /// Print every exported entry to stdout as a JSON line
    #[arg(short, long)]
    print: bool,
}

/// Outcome counters for one extraction run.
#[derive(Debug, Default)]
struct RunStats {
    documents_processed: usize,
    documents_failed: usize,
}

/// Processes documents from `source` until it is exhausted or
/// `max_documents` documents have been segmented and merged. The bound is
/// checked before a document is started, never mid-document. A document that
/// fails to read is logged and skipped without counting against the bound;
/// the corpus keeps whatever was accumulated so far.
fn run_extraction(
    source: &mut dyn DocumentSource,
    segmenter: &SectionSegmenter,
    merger: &mut CorpusMerger,
    max_documents: usize,
    progress: Option<&ProgressBar>,
) -> RunStats {
    let mut stats = RunStats::default();

    while stats.documents_processed < max_documents {
        let document = match source.next_document() {
            Some(Ok(document)) => document,
            Some(Err(e)) => {
                tracing::error!("Error reading document: {}", e);
                stats.documents_failed += 1;
                continue;
            }
            None => break,
        };

        let nodes = markup::parse_nodes(&document.markup);
        let records = segmenter.segment(&nodes);
        tracing::debug!(
            "{}: {} nodes, {} section records",
            document.name,
            nodes.len(),
            records.len()
        );
        merger.merge(records);

        stats.documents_processed += 1;
        if let Some(pb) = progress {
            pb.inc(1);
        }
    }

    stats
}

fn print_entries(entries: &[CorpusEntry]) -> Result<(), AppError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for entry in entries {
        let line =
            serde_json::to_string(entry).map_err(|e| AppError::Processing(e.to_string()))?;
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting extraction for args: {:?}", args);

    let cache = CacheStore::new(&args.cache_file);

    // 3. A cache hit short-circuits parsing entirely
    if !args.force {
        if let Some(entries) = cache.load()? {
            tracing::info!("Cache hit: {} entries, skipping extraction", entries.len());
            if args.print {
                print_entries(&entries)?;
            }
            return Ok(());
        }
    }

    // 4. Walk the corpus
    let mut source = DirectorySource::new(&args.input_dir)?;
    let segmenter = SectionSegmenter::new();
    let mut merger = CorpusMerger::new();

    let progress = ProgressBar::new(args.max_articles as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")
            .map_err(|e| AppError::Config(format!("Invalid progress template: {}", e)))?
            .progress_chars("=> "),
    );

    let stats = run_extraction(
        &mut source,
        &segmenter,
        &mut merger,
        args.max_articles,
        Some(&progress),
    );
    progress.finish_and_clear();

    tracing::info!(
        "Extraction finished. Documents: {}, failures: {}, distinct titles: {}",
        stats.documents_processed,
        stats.documents_failed,
        merger.len()
    );

    if merger.is_empty() && stats.documents_failed > 0 {
        return Err(AppError::Processing(format!(
            "No sections extracted; {} documents failed to read",
            stats.documents_failed
        )));
    }

    // 5. Export and persist
    let entries = merger.export();
    cache.save(&entries, stats.documents_processed)?;

    if args.print {
        print_entries(&entries)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::RawDocument;
    use crate::utils::error::SourceError;

    /// In-memory source for driving the run loop in tests.
    struct VecSource {
        documents: std::vec::IntoIter<Result<RawDocument, SourceError>>,
    }

    impl VecSource {
        fn new(documents: Vec<Result<RawDocument, SourceError>>) -> Self {
            Self {
                documents: documents.into_iter(),
            }
        }
    }

    impl DocumentSource for VecSource {
        fn next_document(&mut self) -> Option<Result<RawDocument, SourceError>> {
            self.documents.next()
        }
    }

    fn doc(name: &str, markup: &str) -> Result<RawDocument, SourceError> {
        Ok(RawDocument {
            name: name.to_string(),
            markup: markup.to_string(),
        })
    }

    fn read_failure() -> Result<RawDocument, SourceError> {
        Err(SourceError::Read {
            path: "broken.html".into(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "truncated"),
        })
    }

    #[test]
    fn stops_before_starting_document_past_the_bound() {
        let mut source = VecSource::new(vec![
            doc("one", "<h2>A</h2><p>a1</p>"),
            doc("two", "<h2>B</h2><p>b1</p>"),
            doc("three", "<h2>C</h2><p>c1</p>"),
        ]);
        let mut merger = CorpusMerger::new();

        let stats = run_extraction(&mut source, &SectionSegmenter::new(), &mut merger, 2, None);

        assert_eq!(stats.documents_processed, 2);
        let titles: Vec<String> = merger.export().into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["A", "B"]);
        // The third document was never started.
        assert!(source.next_document().is_some());
    }

    #[test]
    fn failed_documents_are_skipped_and_not_counted() {
        let mut source = VecSource::new(vec![
            doc("one", "<h2>A</h2><p>a1</p>"),
            read_failure(),
            doc("two", "<h2>A</h2><p>a2</p>"),
        ]);
        let mut merger = CorpusMerger::new();

        let stats = run_extraction(&mut source, &SectionSegmenter::new(), &mut merger, 2, None);

        assert_eq!(stats.documents_processed, 2);
        assert_eq!(stats.documents_failed, 1);

        let entries = merger.export();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].content.len(), 2);
    }

    #[test]
    fn same_title_across_documents_lands_in_one_entry() {
        let mut source = VecSource::new(vec![
            doc("one", "<h2>Group</h2><p>p1</p>"),
            doc("two", "<h2>Group</h2><p>p2</p>"),
        ]);
        let mut merger = CorpusMerger::new();

        run_extraction(&mut source, &SectionSegmenter::new(), &mut merger, 10, None);

        let entries = merger.export();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Group");
        assert_eq!(entries[0].content.len(), 2);
    }
}
