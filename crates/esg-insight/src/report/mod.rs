//! Narrative report synthesis. Analytics go in, a block-tagged [`Report`]
//! with sanitized text comes out; layout belongs to [`crate::render`].

mod document;
mod sanitize;
mod synthesis;
mod templates;

pub use document::{Block, BlockKind, Report};
pub use sanitize::{is_allowed, sanitize};
pub use synthesis::{
    report_title, synthesize, ASSESSMENT_SECTION, CONCLUSION_SECTION, PROFILE_SECTION,
    RISK_SECTION, STRATEGY_SECTION,
};
pub use templates::{template_for, TierTemplate, ADVISORY_LINES};
