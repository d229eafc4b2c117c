//! Receipt image processing: validation and size-tiered compression.
//!
//! The upload flow validates a user-chosen receipt photo, picks a
//! `CompressionEnvelope` from the original byte size, and shrinks the
//! image to fit the envelope before it is sent to the expense backend.

pub mod compressor;
pub mod envelope;
pub mod orientation;
pub mod validator;

pub use compressor::ReceiptCompressor;
pub use envelope::{dimension_cap_for, quality_cap_for, CompressionEnvelope};
pub use validator::{ReceiptValidator, ValidationError};
