//! # docparse-pipeline
//!
//! Resource acquisition and parse orchestration for docparse.
//!
//! A parse runs the same steps for both entry paths:
//!
//! 1. Derive and decode the file name, then validate its extension
//! 2. Materialize the bytes as a [`ScopedResource`] (remote fetch or upload drain)
//! 3. Dispatch to the matching extractor
//! 4. Release the resource, reject whitespace-only text
//!
//! ## Usage
//!
//! ```rust,ignore
//! use docparse_pipeline::{AcquireConfig, DocumentPipeline};
//!
//! let pipeline = DocumentPipeline::with_config(&AcquireConfig::default())?;
//! let doc = pipeline.parse_remote("https://example.com/report.pdf").await?;
//! println!("{}: {} characters", doc.filename, doc.content_length());
//! ```

pub mod acquire;
pub mod pipeline;

pub use acquire::{
    decode_filename, drain_upload, filename_from_url, AcquireConfig, Acquired, RemoteFetcher,
    ScopedResource, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, FALLBACK_FILENAME,
};
pub use pipeline::DocumentPipeline;
