//! # pdf-catalog – paginated PDF product catalogs
//!
//! This crate turns an ordered sequence of product records into a
//! paginated PDF document in one of two presentations. The pipeline
//! stages are:
//!
//! 1. **Records** – product rows with fallback substitution ([`product`])
//! 2. **Layout** – cursor tracking, page breaks, separators ([`layout`])
//! 3. **Render** – emit PDF bytes via printpdf ([`render`])
//! 4. **Sink** – file path or in-memory attachment ([`sink`])
//!
//! The layout step produces a frozen [`document::DocumentLayout`]; the
//! same layout always renders to the same document, which keeps
//! pagination deterministic and testable.

pub mod document;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod product;
pub mod render;
pub mod sink;
pub mod text;

// Re-exports for convenience
pub use error::Error;
pub use pipeline::{generate, generate_pdf, CancelToken, GenerateOptions, RenderMode};
pub use product::Product;
pub use sink::PdfAttachment;
