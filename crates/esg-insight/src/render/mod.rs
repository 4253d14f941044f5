//! PDF rendering with a layered fallback: styled layout, then a minimal
//! page, then a hand-built blank document. [`ReportRenderer::render`] always
//! returns a well-formed PDF.

mod blank;
mod font;
mod layout;
mod pdf;
mod strategy;

pub use blank::blank_page;
pub use font::{FontFace, FontResolver, DEFAULT_FONT_CANDIDATES};
pub use layout::{style_for, wrap, PageGeometry, TextStyle};
pub use strategy::{MinimalLayout, RenderStrategy, StyledLayout};

use crate::report::{sanitize, Report};
use serde::Serialize;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("pdf serialization failed: {0}")]
    Pdf(String),
    #[error("layout produced no pages")]
    NoPages,
    #[error("layer produced an empty document")]
    EmptyOutput,
    #[error("layout panicked: {0}")]
    Panicked(String),
}

/// Which rung of the cascade produced a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderLayer {
    Styled,
    Minimal,
    Blank,
}

impl RenderLayer {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Styled => "styled",
            Self::Minimal => "minimal",
            Self::Blank => "blank",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginatedDocument {
    pub bytes: Vec<u8>,
    pub layer: RenderLayer,
    pub page_count: usize,
}

impl PaginatedDocument {
    pub fn blank() -> Self {
        Self {
            bytes: blank_page(),
            layer: RenderLayer::Blank,
            page_count: 1,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.layer != RenderLayer::Styled
    }
}

/// Owns the resolved font and the ordered strategy list. Cheap to share
/// behind an `Arc`; rendering takes `&self`.
pub struct ReportRenderer {
    face: FontFace,
    strategies: Vec<Box<dyn RenderStrategy>>,
}

impl ReportRenderer {
    pub fn new(face: FontFace) -> Self {
        Self::with_strategies(
            face,
            vec![Box::new(StyledLayout), Box::new(MinimalLayout)],
        )
    }

    /// Custom cascade. The blank page stays the implicit last layer.
    pub fn with_strategies(face: FontFace, strategies: Vec<Box<dyn RenderStrategy>>) -> Self {
        Self { face, strategies }
    }

    pub fn face(&self) -> &FontFace {
        &self.face
    }

    pub fn render(&self, report: &Report) -> PaginatedDocument {
        let report = report.clone().map_text(sanitize);

        for strategy in &self.strategies {
            let layer = strategy.layer();
            match run_isolated(strategy.as_ref(), &report, &self.face) {
                Ok(document) => {
                    debug!(
                        layer = layer.label(),
                        pages = document.page_count,
                        bytes = document.bytes.len(),
                        "report rendered"
                    );
                    return document;
                }
                Err(err) => warn!(layer = layer.label(), error = %err, "render layer failed"),
            }
        }

        warn!("all render layers failed; emitting blank page");
        PaginatedDocument::blank()
    }
}

impl std::fmt::Debug for ReportRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let layers: Vec<&str> = self
            .strategies
            .iter()
            .map(|strategy| strategy.layer().label())
            .collect();
        f.debug_struct("ReportRenderer")
            .field("face", &self.face)
            .field("layers", &layers)
            .finish()
    }
}

fn run_isolated(
    strategy: &dyn RenderStrategy,
    report: &Report,
    face: &FontFace,
) -> Result<PaginatedDocument, RenderError> {
    let document = panic::catch_unwind(AssertUnwindSafe(|| strategy.render(report, face)))
        .map_err(|payload| RenderError::Panicked(panic_message(payload.as_ref())))??;
    if document.bytes.is_empty() {
        return Err(RenderError::EmptyOutput);
    }
    Ok(document)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
