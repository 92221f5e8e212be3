//! Error taxonomy for document building.
//!
//! Everything surfaces synchronously from [`crate::Document::build`]; the
//! process is deterministic, so no error is worth retrying with the same
//! input.

use thiserror::Error;

/// Errors produced while validating, composing or rendering a document.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A required field is absent or malformed. Detected before any layout
    /// work begins; nothing has been rendered when this is returned.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A logo payload could not be decoded. Fatal: the build aborts rather
    /// than rendering a partial document or a placeholder.
    #[error("logo image could not be decoded: {0}")]
    ImageDecode(String),

    /// A fixed-amount document discount reduced the discounted total to zero
    /// or below, so the implied discount percent has no defined value.
    #[error("document discount leaves a non-positive discounted total; implied discount percent is undefined")]
    DegenerateDiscount,

    /// The canvas backend failed to serialize the finished page set.
    #[error("render failed: {0}")]
    Render(String),
}
