#![forbid(unsafe_code)]
//! cograph-core library.
//!
//! Turns a corpus of text records into a weighted co-occurrence edgelist:
//! recognize entity mentions per document, count every pair of mention
//! positions, keep pairs whose count exceeds a threshold.
//!
//! # Conventions
//!
//! - **Errors**: Stage functions return [`error::Result`] with the typed
//!   [`error::Error`]; file-level helpers such as [`config::load_config`]
//!   use `anyhow::Result` with context.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod aggregate;
pub mod config;
pub mod document;
pub mod edge;
pub mod error;
pub mod filter;
pub mod ingest;
pub mod pipeline;
pub mod recognize;
pub mod timing;

pub use aggregate::{aggregate, aggregate_parallel};
pub use config::{PipelineConfig, load_config};
pub use document::{Document, RawDocument};
pub use edge::{EdgeKey, EdgeMultiset, EdgeRecord};
pub use error::{Error, ErrorCode};
pub use filter::{FilteredEdgeList, Threshold, filter_edges, filter_records};
pub use pipeline::{Pipeline, PipelineOutput};
pub use recognize::{EntityLabel, EntityRecognizer, Gazetteer, extract_documents};
