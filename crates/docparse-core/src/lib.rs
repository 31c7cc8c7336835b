//! # docparse-core
//!
//! Core types, traits and the format registry for docparse.
//!
//! docparse accepts a document by URL or upload, classifies it by extension,
//! extracts its text and returns it. This crate holds what every other crate
//! shares:
//!
//! - **Format Registry**: [`FormatRegistry`] validates names against the fixed
//!   [`SUPPORTED_FORMATS`] table
//! - **Extraction capability**: the [`ContentExtractor`] trait
//! - **Failure contract**: [`ParseError`], one error shape for the whole pipeline
//!
//! ## Architecture
//!
//! ```text
//! SourceDescriptor → FormatRegistry → ScopedResource → ContentExtractor → ParsedDocument
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`DocumentFormat`] | One variant per supported extension |
//! | [`SupportedFormat`] | Registry entry: extension and label |
//! | [`SourceDescriptor`] | Remote location or upload stream |
//! | [`ParsedDocument`] | Extracted text plus the name and format it came from |
//!
//! ## Related Crates
//!
//! - `docparse-extract`: extraction capabilities and dispatch
//! - `docparse-pipeline`: resource acquisition and orchestration

pub mod error;
pub mod formats;
pub mod traits;
pub mod types;

pub use error::{ExtractError, ParseError, Result};
pub use formats::{split_extension, supported_list, FormatRegistry, SupportedFormat, SUPPORTED_FORMATS};
pub use traits::*;
pub use types::*;
