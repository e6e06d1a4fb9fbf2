//! Invoice total extraction.
//!
//! This module owns the domain side of an extraction: the selected image
//! ([`ImagePayload`]), the immutable request built from it
//! ([`ExtractionRequest`]), the single [`ExtractionOutcome`] handed to a
//! presenter, and the [`InvoiceExtractor`] that ties them together.
//!
//! # Flow
//!
//! ```text
//! file -> ImagePayload -> ExtractionRequest -> InferenceBackend (retry) -> decode -> outcome
//! ```
//!
//! The remote call itself lives behind the [`InferenceBackend`] trait; the
//! Gemini implementation is in `crate::gemini`.

mod backend;
mod decoder;
mod encoding;
mod payload;
mod service;

pub use backend::InferenceBackend;
pub use decoder::decode_total;
pub use encoding::{detect_media_type, encode_base64, file_to_base64, read_to_base64};
pub use payload::{ExtractionOutcome, ExtractionRequest, ImagePayload, EXTRACTION_INSTRUCTION};
pub use service::InvoiceExtractor;
