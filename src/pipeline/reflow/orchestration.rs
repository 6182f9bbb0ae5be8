//! Running documents through the stages.
//!
//! Per document:
//! 1. per page, independently: merge decorative initials and repair text,
//!    drop page furniture, choose a column layout and assign columns
//! 2. document-wide: font statistics, then role classification
//! 3. per page: reading order and author
//!
//! Step 1 runs on the rayon pool when a document has more pages than
//! `parallel.page_threshold`. Step 2 is the barrier between them.

use super::builder::ReflowContext;
use super::result::{BatchOutcome, DocumentFailure};
use crate::core::{Component, ProcessingStage, ReflowError, ReflowResult};
use crate::domain::{AssembledDocument, Document, DocumentIndex, Fragment, Page};
use crate::pipeline::stats::{DocumentMetrics, PipelineStats, StatsManager};
use crate::processors::{
    LayoutInference, NameCanonicalizer, ReadingOrderAssembler, StructureClassifier,
    TextNormalizer,
};
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, error, info};

/// The reflow pipeline. Build it with [`super::ReflowBuilder`].
#[derive(Debug)]
pub struct Reflow {
    context: ReflowContext,
    normalizer: Component<TextNormalizer>,
    layout: LayoutInference,
    classifier: StructureClassifier,
    assembler: ReadingOrderAssembler,
    stats: StatsManager,
}

impl Reflow {
    pub(super) fn new(context: ReflowContext) -> ReflowResult<Self> {
        let normalizer = match (context.segmenter.get(), context.corrector.get()) {
            (Ok(segmenter), Ok(corrector)) => Component::Ready(TextNormalizer::new(
                context.config.text.clone(),
                segmenter.clone(),
                corrector.clone(),
            )?),
            (Err(e), _) | (_, Err(e)) => Component::unavailable("text normalizer", e.to_string()),
        };
        let config = &context.config;
        Ok(Self {
            normalizer,
            layout: LayoutInference::new(config.layouts.clone()),
            classifier: StructureClassifier::new(config.structure.clone()),
            assembler: ReadingOrderAssembler::new(NameCanonicalizer::new(
                config.names.score_cutoff,
            )),
            stats: StatsManager::new(),
            context,
        })
    }

    pub fn context(&self) -> &ReflowContext {
        &self.context
    }

    /// Statistics accumulated over every document processed so far.
    pub fn stats(&self) -> PipelineStats {
        self.stats.get_stats()
    }

    pub fn reset_stats(&self) {
        self.stats.reset_stats();
    }

    /// Runs the per-page stage on one page.
    fn prepare_page(&self, normalizer: &TextNormalizer, mut page: Page) -> ReflowResult<Page> {
        let page_number = page.page_number;
        let fragments = normalizer
            .normalize(std::mem::take(&mut page.fragments))
            .map_err(|e| {
                ReflowError::processing_error(
                    ProcessingStage::Normalization,
                    &format!("page {page_number}"),
                    e,
                )
            })?;
        let mut fragments = self.classifier.remove_page_furniture(fragments);
        page.layout = self.layout.assign_columns(&mut fragments);
        if let Some(layout) = &page.layout {
            debug!(
                "{} page {}: {} layout, error {:.1}",
                page.document_id, page_number, layout.name, layout.error
            );
        }
        page.fragments = fragments;
        Ok(page)
    }

    /// Reflows one document into reading order.
    pub fn process_document(&self, document: Document) -> ReflowResult<AssembledDocument> {
        let start = Instant::now();
        let pages = document.pages.len();
        let fragments_in = document.fragment_count();
        let result = self.run_document(document);
        self.stats.record_document(DocumentMetrics {
            succeeded: result.is_ok(),
            pages,
            fragments_in,
            fragments_out: result.as_ref().map_or(0, AssembledDocument::fragment_count),
            elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
        });
        result
    }

    fn run_document(&self, document: Document) -> ReflowResult<AssembledDocument> {
        let normalizer = self.normalizer.get()?;
        let Document { id, pages, .. } = document;

        let pages = if pages.len() > self.context.config.parallel.page_threshold {
            pages
                .into_par_iter()
                .map(|page| self.prepare_page(normalizer, page))
                .collect::<ReflowResult<Vec<_>>>()?
        } else {
            pages
                .into_iter()
                .map(|page| self.prepare_page(normalizer, page))
                .collect::<ReflowResult<Vec<_>>>()?
        };

        let mut document = Document::new(id, pages);
        self.classifier.classify(&mut document);
        self.assembler
            .assemble(document, &self.context.recognizer, &self.context.directory)
    }

    /// Groups fragments into documents and reflows each.
    ///
    /// Documents are processed one after another in id order. A failing
    /// document is logged and recorded in the outcome; the rest still run.
    pub fn process_batch(&self, fragments: Vec<Fragment>) -> BatchOutcome {
        let documents = DocumentIndex::from_fragments(fragments).into_documents();
        info!("Reflowing {} documents", documents.len());

        let mut outcome = BatchOutcome::default();
        for document in documents {
            let id = document.id.clone();
            match self.process_document(document) {
                Ok(assembled) => outcome.documents.push(assembled),
                Err(e) => {
                    error!("document {} failed: {}", id, e);
                    outcome.failures.push(DocumentFailure {
                        error: ReflowError::for_document(&id, e),
                        document_id: id,
                    });
                }
            }
        }
        info!(
            "Batch finished: {} succeeded, {} failed",
            outcome.documents.len(),
            outcome.failures.len()
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{NameRecognizer, SpellCorrector, WordSegmenter};
    use crate::domain::{ReferenceNameDirectory, Role};
    use crate::pipeline::{ReflowBuilder, ReflowConfig};
    use crate::processors::{BylineRecognizer, ColumnLayout, PixelRect, UnigramSegmenter};
    use std::sync::Arc;

    fn segmenter() -> Arc<dyn WordSegmenter> {
        Arc::new(UnigramSegmenter::from_counts([
            ("the", 5000),
            ("cat", 400),
            ("sat", 300),
            ("on", 3000),
            ("mat", 200),
            ("a", 4000),
            ("long", 300),
            ("road", 250),
            ("home", 280),
            ("by", 1000),
            ("jane", 50),
            ("doe", 40),
            ("left", 200),
            ("right", 200),
            ("column", 90),
            ("page", 300),
            ("number", 200),
            ("and", 3500),
            ("went", 150),
            ("to", 3200),
            ("sleep", 90),
        ]))
    }

    /// Corrector double that always fails.
    #[derive(Debug)]
    struct FailingCorrector;

    impl SpellCorrector for FailingCorrector {
        fn correct(&self, _text: &str) -> ReflowResult<String> {
            Err(ReflowError::collaborator("spell corrector", "model crashed"))
        }
    }

    fn config() -> ReflowConfig {
        let mut config = ReflowConfig::default();
        config.layouts = vec![
            ColumnLayout::new("double_col", 0.0, 200.0, vec![100.0, 300.0]),
            ColumnLayout::new("triple_col", 0.0, 160.0, vec![80.0, 240.0, 400.0]),
        ];
        config.structure.header_cutoff = 950;
        config.structure.footer_cutoff = 50;
        config.structure.title_font_size_cutoff = 1000.0;
        config.parallel.page_threshold = 1;
        config
    }

    fn reflow() -> Reflow {
        ReflowBuilder::from_config(config())
            .word_segmenter(segmenter())
            .name_recognizer(Arc::new(BylineRecognizer) as Arc<dyn NameRecognizer>)
            .reference_names(ReferenceNameDirectory::from_names(["Jane Doe"]))
            .build()
            .unwrap()
    }

    fn fragment(doc: &str, page: u32, seq: usize, rect: (i32, i32, i32, i32), text: &str) -> Fragment {
        let rect = PixelRect::new(rect.0, rect.1, rect.2, rect.3).unwrap();
        Fragment::new(doc, page, seq, rect, text)
    }

    /// A two-column article page: a big title, a decorative initial, text in
    /// both columns and a page number in the footer band.
    fn article_page(doc: &str) -> Vec<Fragment> {
        vec![
            fragment(doc, 1, 0, (0, 700, 180, 730), "Left column"),
            fragment(doc, 1, 1, (220, 200, 380, 260), "right column and went to sleep."),
            fragment(doc, 1, 2, (20, 60, 380, 190), "The Long Road Home by jane doe"),
            fragment(doc, 1, 3, (20, 200, 180, 260), "he cat saton\nthe mat."),
            fragment(doc, 1, 4, (30, 210, 60, 240), "T"),
            fragment(doc, 1, 5, (150, 10, 250, 40), "17"),
        ]
    }

    #[test]
    fn test_end_to_end_article_page() {
        let outcome = reflow().process_batch(article_page("issue-1"));
        assert!(outcome.is_complete_success());
        let document = outcome.document("issue-1").unwrap();
        let page = &document.pages[0];

        assert_eq!(page.layout.as_ref().map(|l| l.name.as_str()), Some("double_col"));
        assert_eq!(page.author, "Jane Doe");

        let order: Vec<(Role, &str)> = page
            .fragments
            .iter()
            .map(|f| (f.effective_role(), f.text.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                (Role::Title, "The Long Road Home by jane doe"),
                (Role::Body, "The cat sat on the mat."),
                (Role::Body, "Left column"),
                (Role::Body, "right column and went to sleep."),
            ]
        );

        let text = document.to_formatted_text();
        assert!(text.contains("Article title: The Long Road Home by jane doe"));
        assert!(text.contains("Author: Jane Doe"));
        assert!(!text.contains("17"));
    }

    #[test]
    fn test_pages_are_independent_and_ordered() {
        let mut fragments = article_page("issue-2");
        fragments.push(fragment("issue-2", 3, 0, (0, 300, 180, 330), "page three"));
        fragments.push(fragment("issue-2", 2, 0, (0, 300, 180, 330), "page two"));
        let reflow = reflow();
        let outcome = reflow.process_batch(fragments);
        let document = outcome.document("issue-2").unwrap();
        let numbers: Vec<u32> = document.pages.iter().map(|p| p.page_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(document.pages[1].author, "");

        let stats = reflow.stats();
        assert_eq!(stats.documents_succeeded, 1);
        assert_eq!(stats.pages_processed, 3);
        assert_eq!(stats.fragments_in, 8);
        assert_eq!(stats.fragments_dropped, 2);
    }

    #[test]
    fn test_failing_document_does_not_stop_batch() {
        let reflow = ReflowBuilder::from_config(config())
            .word_segmenter(segmenter())
            .reference_names(ReferenceNameDirectory::from_names(["Jane Doe"]))
            .build()
            .unwrap();
        let mut fragments = article_page("a-titled");
        fragments.push(fragment("b-untitled", 1, 0, (0, 300, 180, 360), "the cat sat"));

        let outcome = reflow.process_batch(fragments);
        assert_eq!(outcome.total(), 2);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].document_id, "a-titled");
        assert!(outcome.failures[0].error.is_unavailable());
        assert_eq!(outcome.documents[0].id, "b-untitled");
        assert_eq!(outcome.documents[0].to_plain_text(), "the cat sat");

        let stats = reflow.stats();
        assert_eq!(stats.documents_failed, 1);
        assert_eq!(stats.documents_succeeded, 1);
    }

    #[test]
    fn test_missing_segmenter_fails_fast() {
        let reflow = ReflowBuilder::from_config(config()).build().unwrap();
        let outcome = reflow.process_batch(vec![fragment("doc", 1, 0, (0, 300, 100, 400), "text")]);
        assert_eq!(outcome.failures.len(), 1);
        assert!(outcome.failures[0].error.is_unavailable());
    }

    #[test]
    fn test_collaborator_error_is_reported_per_document() {
        let reflow = ReflowBuilder::from_config(config())
            .word_segmenter(segmenter())
            .spell_corrector(Arc::new(FailingCorrector))
            .build()
            .unwrap();
        let outcome = reflow.process_batch(vec![fragment("doc", 1, 0, (0, 300, 100, 400), "text")]);
        assert_eq!(outcome.failures.len(), 1);
        assert!(!outcome.failures[0].error.is_unavailable());
        assert!(outcome.failures[0].error.to_string().contains("doc"));
    }
}
