//! Pipeline-wide statistics helpers.
//!
//! `PipelineStats` holds counters for reflow runs; `StatsManager` coordinates
//! thread-safe updates to them.

use std::fmt;
use std::sync::{Mutex, MutexGuard};

/// Statistics for the reflow pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineStats {
    /// The total number of documents processed.
    pub documents_processed: usize,
    /// Documents that produced an assembled result.
    pub documents_succeeded: usize,
    /// Documents that failed.
    pub documents_failed: usize,
    /// Pages of successful documents.
    pub pages_processed: usize,
    /// Fragments received by successful documents.
    pub fragments_in: usize,
    /// Fragments removed as page furniture or merged decorative initials.
    pub fragments_dropped: usize,
    /// The average processing time per document in milliseconds.
    pub average_document_time_ms: f64,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the success rate as a percentage (0.0 to 100.0).
    pub fn success_rate(&self) -> f64 {
        if self.documents_processed == 0 {
            0.0
        } else {
            (self.documents_succeeded as f64 / self.documents_processed as f64) * 100.0
        }
    }

    /// Returns the failure rate as a percentage (0.0 to 100.0).
    pub fn failure_rate(&self) -> f64 {
        if self.documents_processed == 0 {
            0.0
        } else {
            (self.documents_failed as f64 / self.documents_processed as f64) * 100.0
        }
    }
}

impl fmt::Display for PipelineStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Reflow Statistics:")?;
        writeln!(f, "  Documents processed: {}", self.documents_processed)?;
        writeln!(
            f,
            "  Succeeded: {} ({:.1}%)",
            self.documents_succeeded,
            self.success_rate()
        )?;
        writeln!(
            f,
            "  Failed: {} ({:.1}%)",
            self.documents_failed,
            self.failure_rate()
        )?;
        writeln!(f, "  Pages: {}", self.pages_processed)?;
        writeln!(
            f,
            "  Fragments: {} in, {} dropped",
            self.fragments_in, self.fragments_dropped
        )?;
        writeln!(
            f,
            "  Average document time: {:.2} ms",
            self.average_document_time_ms
        )?;
        Ok(())
    }
}

/// Outcome of one document, as recorded by [`StatsManager::record_document`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DocumentMetrics {
    pub succeeded: bool,
    pub pages: usize,
    pub fragments_in: usize,
    pub fragments_out: usize,
    pub elapsed_ms: f64,
}

/// Thread-safe manager for updating pipeline statistics.
#[derive(Debug, Default)]
pub struct StatsManager {
    stats: Mutex<PipelineStats>,
}

impl StatsManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, PipelineStats> {
        // Counters stay meaningful even if an updater panicked.
        self.stats.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns a copy of the current statistics snapshot.
    pub fn get_stats(&self) -> PipelineStats {
        self.lock().clone()
    }

    /// Folds one document's outcome into the running totals.
    pub fn record_document(&self, metrics: DocumentMetrics) {
        let mut stats = self.lock();

        let previous_total = stats.documents_processed;
        let previous_average = stats.average_document_time_ms;
        let new_total = previous_total + 1;

        stats.documents_processed = new_total;
        if metrics.succeeded {
            stats.documents_succeeded += 1;
            stats.pages_processed += metrics.pages;
            stats.fragments_in += metrics.fragments_in;
            stats.fragments_dropped += metrics.fragments_in.saturating_sub(metrics.fragments_out);
        } else {
            stats.documents_failed += 1;
        }

        let accumulated_time = previous_average * previous_total as f64;
        stats.average_document_time_ms = (accumulated_time + metrics.elapsed_ms) / new_total as f64;
    }

    /// Resets the tracked statistics to their default state.
    pub fn reset_stats(&self) {
        *self.lock() = PipelineStats::default();
    }
}
