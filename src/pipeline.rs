//! Pipeline – ties the layout engine and the renderer into a single call,
//! and owns the generation controls (mode selection, cooperative
//! cancellation, time budget).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;

use crate::document::DocumentLayout;
use crate::error::Error;
use crate::layout::{layout_detailed, layout_summary};
use crate::product::Product;
use crate::render::render_pdf;

/// Which presentation to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// One-row-per-product tabular catalog.
    Summary,
    /// One-page-per-product expanded layout.
    Detailed,
}

impl RenderMode {
    /// Prefix of file-target names (`<prefix>-<timestamp>.pdf`).
    pub fn file_prefix(self) -> &'static str {
        match self {
            RenderMode::Summary => "productos",
            RenderMode::Detailed => "productos-detallado",
        }
    }

    /// Label of buffer-target attachment names (`<label>_<date>.pdf`).
    pub fn attachment_label(self) -> &'static str {
        match self {
            RenderMode::Summary => "catalogo_productos",
            RenderMode::Detailed => "catalogo_detallado",
        }
    }
}

/// Cloneable cancellation flag. Cancelling aborts the generation at the
/// next per-row/per-product checkpoint; all resources are owned values, so
/// teardown is by drop.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Per-call generation guard checked at layout checkpoints.
#[derive(Debug, Clone)]
pub struct Control {
    cancel: CancelToken,
    deadline: Option<Instant>,
    budget: Duration,
}

impl Control {
    /// No deadline, never cancelled externally. Used by tests and by
    /// callers that manage their own timeouts.
    pub fn unbounded() -> Self {
        Self {
            cancel: CancelToken::new(),
            deadline: None,
            budget: Duration::ZERO,
        }
    }

    pub fn new(cancel: CancelToken, budget: Duration) -> Self {
        Self {
            cancel,
            deadline: Some(Instant::now() + budget),
            budget,
        }
    }

    /// Fails the generation when it has been cancelled or has run out of
    /// budget.
    pub fn checkpoint(&self) -> Result<(), Error> {
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(Error::DeadlineExceeded(self.budget));
            }
        }
        Ok(())
    }
}

/// Configuration for one generation call.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Fixed part of the time budget.
    pub base_deadline: Duration,
    /// Budget added per record, so large catalogs get proportionally more
    /// time instead of an unbounded run.
    pub per_record_budget: Duration,
    /// Cooperative cancellation flag; keep a clone to cancel from another
    /// thread.
    pub cancel: CancelToken,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            base_deadline: Duration::from_secs(5),
            per_record_budget: Duration::from_millis(2),
            cancel: CancelToken::new(),
        }
    }
}

impl GenerateOptions {
    fn control_for(&self, record_count: usize) -> Control {
        let budget = self.base_deadline + self.per_record_budget * record_count as u32;
        Control::new(self.cancel.clone(), budget)
    }
}

/// Full pipeline: product records → PDF bytes.
///
/// Returns `(pdf_bytes, document_layout)`; the layout is the frozen draw
/// plan and is handy for assertions and debugging.
pub fn generate(
    products: &[Product],
    mode: RenderMode,
    options: &GenerateOptions,
) -> Result<(Vec<u8>, DocumentLayout), Error> {
    let ctl = options.control_for(products.len());

    let layout = match mode {
        RenderMode::Summary => layout_summary(products, Utc::now(), &ctl)?,
        RenderMode::Detailed => layout_detailed(products, &ctl)?,
    };

    ctl.checkpoint()?;
    let bytes = render_pdf(&layout)?;
    Ok((bytes, layout))
}

/// Convenience: generate with default options.
pub fn generate_pdf(products: &[Product], mode: RenderMode) -> Result<Vec<u8>, Error> {
    let (bytes, _) = generate(products, mode, &GenerateOptions::default())?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn products(n: usize) -> Vec<Product> {
        (1..=n as i64)
            .map(|id| Product {
                id,
                name: Some(format!("Producto {id}")),
                description: None,
                price: None,
                image_url: None,
                created_at: None,
            })
            .collect()
    }

    #[test]
    fn pipeline_basic() {
        let (bytes, layout) = generate(
            &products(3),
            RenderMode::Summary,
            &GenerateOptions::default(),
        )
        .unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(layout.pages.len(), 1);
        assert_eq!(&bytes[0..5], b"%PDF-");
    }

    #[test]
    fn convenience_wrapper_uses_defaults() {
        let bytes = generate_pdf(&products(1), RenderMode::Detailed).unwrap();
        assert_eq!(&bytes[0..5], b"%PDF-");
    }

    #[test]
    fn cancelled_before_start() {
        let options = GenerateOptions::default();
        options.cancel.cancel();
        let err = generate(&products(10), RenderMode::Summary, &options).unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }

    #[test]
    fn zero_budget_exceeds_deadline() {
        let options = GenerateOptions {
            base_deadline: Duration::ZERO,
            per_record_budget: Duration::ZERO,
            ..Default::default()
        };
        // The deadline is already due at the first checkpoint.
        let err = generate(&products(10), RenderMode::Detailed, &options).unwrap_err();
        assert!(matches!(err, Error::DeadlineExceeded(_)));
    }
}
