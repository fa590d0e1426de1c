//! Error kinds for catalog generation.
//!
//! An empty product list is *not* an error — the engine still produces a
//! valid one-page document. Malformed optional fields are absorbed by the
//! documented fallbacks at deserialisation time and never surface here.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The underlying file/buffer write failed. The partial output is not a
    /// valid document; removing a partially written file is the caller's
    /// responsibility.
    #[error("write failed: {0}")]
    Write(#[from] std::io::Error),

    /// PDF assembly failed.
    #[error("PDF rendering failed: {0}")]
    Render(String),

    /// The generation was cancelled through its [`CancelToken`].
    ///
    /// [`CancelToken`]: crate::pipeline::CancelToken
    #[error("generation cancelled")]
    Cancelled,

    /// The generation ran past its time budget.
    #[error("generation deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),
}
