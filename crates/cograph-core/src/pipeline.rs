//! Extraction → aggregation → filtering, as one explicitly configured run.
//!
//! Each stage is also callable on its own ([`crate::recognize`],
//! [`crate::aggregate`], [`crate::filter`]); [`Pipeline`] only wires them
//! together with a validated [`PipelineConfig`]. Nothing is retained
//! between calls to [`Pipeline::run`].

use tracing::{info, instrument};

use crate::aggregate::{aggregate, aggregate_parallel};
use crate::config::PipelineConfig;
use crate::document::{Document, RawDocument};
use crate::edge::EdgeMultiset;
use crate::error::Result;
use crate::filter::{FilteredEdgeList, Threshold, filter_edges};
use crate::recognize::{EntityLabel, EntityRecognizer, extract_documents};

/// Everything a run produced, for reporting and persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineOutput {
    /// Text records turned into documents.
    pub documents: usize,
    /// Records skipped because they were not text.
    pub skipped: usize,
    /// Entity mentions found across all documents.
    pub mentions: usize,
    /// Full weighted pair multiset before filtering.
    pub multiset: EdgeMultiset,
    /// Edges whose weight exceeds the threshold.
    pub edges: FilteredEdgeList,
}

/// A configured edgelist pipeline bound to one recognizer.
#[derive(Debug)]
pub struct Pipeline<R> {
    config: PipelineConfig,
    label: EntityLabel,
    threshold: Threshold,
    recognizer: R,
}

impl<R: EntityRecognizer> Pipeline<R> {
    /// # Errors
    ///
    /// Returns the first validation failure of `config`.
    pub fn new(config: PipelineConfig, recognizer: R) -> Result<Self> {
        config.validate()?;
        let label = config.label()?;
        let threshold = config.threshold()?;
        Ok(Self {
            config,
            label,
            threshold,
            recognizer,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    #[must_use]
    pub const fn recognizer(&self) -> &R {
        &self.recognizer
    }

    #[must_use]
    pub const fn label(&self) -> &EntityLabel {
        &self.label
    }

    #[must_use]
    pub const fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Run recognition, aggregation and filtering over `raw`.
    ///
    /// Non-text records are skipped with a warning. Zero records, or zero
    /// edges above the threshold, produce an empty but successful output.
    ///
    /// # Errors
    ///
    /// Propagates recognizer failures.
    #[instrument(skip_all, fields(records = raw.len()))]
    pub fn run(&self, raw: &[RawDocument]) -> Result<PipelineOutput> {
        let extraction = extract_documents(raw, &self.recognizer, &self.label)?;
        let mentions = extraction.documents.iter().map(Document::len).sum();

        let multiset = if self.config.parallel {
            aggregate_parallel(&extraction.documents)
        } else {
            aggregate(&extraction.documents)
        };
        let edges = filter_edges(&multiset, self.threshold);

        info!(
            documents = extraction.documents.len(),
            skipped = extraction.skipped,
            distinct_pairs = multiset.len(),
            kept = edges.len(),
            label = %self.label,
            threshold = %self.threshold,
            "edgelist pipeline finished"
        );

        Ok(PipelineOutput {
            documents: extraction.documents.len(),
            skipped: extraction.skipped,
            mentions,
            multiset,
            edges,
        })
    }
}
