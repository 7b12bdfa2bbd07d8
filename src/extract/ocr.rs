// src/extract/ocr.rs

//! OCR extraction heuristics.

use crate::extract::{BoardExtractor, SpecRules};
use crate::models::Board;

/// Extractor for ocr.org.uk pages.
#[derive(Debug, Default, Clone, Copy)]
pub struct OcrExtractor;

impl BoardExtractor for OcrExtractor {
    fn board(&self) -> Board {
        Board::Ocr
    }

    fn spec_rules(&self) -> SpecRules {
        SpecRules {
            list_class: "qualifications-list",
            link_prefix: "/qualifications/gcse/",
            base_url: "https://www.ocr.org.uk",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_candidates_use_ocr_list_class() {
        let html = r#"
            <ul class="qualifications-list">
              <li><a href="/qualifications/gcse/chemistry-a">GCSE Chemistry A</a></li>
            </ul>
            <ul class="qual-list">
              <li><a href="/qualifications/gcse/physics-a">GCSE Physics A</a></li>
            </ul>"#;
        let candidates = OcrExtractor.spec_candidates(html);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "GCSE Chemistry A");
    }
}
