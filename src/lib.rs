//! # gvk-scan
//!
//! Splits a stream of concatenated YAML documents and extracts the
//! group/version/kind identifier of every document.
//!
//! Two strategies find the document boundaries:
//!
//! - [`DocumentReader`](gvk::reader::DocumentReader) scans lines and yields the raw
//!   text of each document, skipping `---` lines that sit inside block or quoted scalars.
//! - [`DocumentDecoder`](gvk::decoding::DocumentDecoder) parses the whole stream in a
//!   single pass and yields one header per document.
//!
//! Both feed the [extractor](gvk::extract). See [`gvk::pipeline`] for the entry points
//! that drive a strategy to exhaustion.

pub mod gvk;
