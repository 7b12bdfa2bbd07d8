// src/extract/mod.rs

//! Per-board HTML extraction.
//!
//! Each board publishes the same material behind different markup; the
//! differences reduce to a handful of heuristics (container class, link
//! prefix, site origin) that drive the shared walkers in [`scan`]. Adding a
//! board means adding one [`BoardExtractor`] implementation, not editing a
//! dispatcher.

mod aqa;
mod edexcel;
mod ocr;
pub mod scan;

pub use aqa::AqaExtractor;
pub use edexcel::EdexcelExtractor;
pub use ocr::OcrExtractor;

use crate::models::Board;

/// Heuristics for the qualification list on a board's spec landing page.
#[derive(Debug, Clone, Copy)]
pub struct SpecRules {
    /// Class substring marking the qualification list container.
    pub list_class: &'static str,

    /// Href substring marking a qualification detail link.
    pub link_prefix: &'static str,

    /// Site origin used to resolve site-absolute detail links.
    pub base_url: &'static str,
}

/// A raw {title, link} group flushed from the qualification list.
///
/// The link points at the detail page holding the syllabus body; the
/// collection step fetches it before the record is normalised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecCandidate {
    pub title: String,
    pub link: String,
}

/// A raw past-paper table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperRow {
    pub year: String,
    pub subject: String,
    pub url: String,
}

/// Board-specific extraction heuristics over the shared walkers.
pub trait BoardExtractor: Send + Sync {
    fn board(&self) -> Board;

    fn spec_rules(&self) -> SpecRules;

    /// Candidates from the spec landing page.
    fn spec_candidates(&self, html: &str) -> Vec<SpecCandidate> {
        scan::qualification_list(html, &self.spec_rules())
    }

    /// Raw rows from the past-paper tables. The table shape is shared
    /// across boards.
    fn paper_rows(&self, html: &str) -> Vec<PaperRow> {
        scan::paper_table(html)
    }

    /// Raw cell groups from question/revision tables.
    fn topic_rows(&self, html: &str) -> Vec<Vec<String>> {
        scan::table_rows(html)
    }

    /// Syllabus body text from a spec detail page.
    fn spec_content(&self, html: &str) -> String {
        scan::content_text(html)
    }
}
