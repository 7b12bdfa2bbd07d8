// src/extract/aqa.rs

//! AQA extraction heuristics.

use crate::extract::{BoardExtractor, SpecRules};
use crate::models::Board;

/// Extractor for aqa.org.uk pages.
#[derive(Debug, Default, Clone, Copy)]
pub struct AqaExtractor;

impl BoardExtractor for AqaExtractor {
    fn board(&self) -> Board {
        Board::Aqa
    }

    fn spec_rules(&self) -> SpecRules {
        SpecRules {
            list_class: "qual-list",
            link_prefix: "/subjects/science/gcse/",
            base_url: "https://www.aqa.org.uk",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_candidates_resolve_against_aqa_origin() {
        let html = r#"
            <ul class="qual-list">
              <li><a href="/subjects/science/gcse/biology-8461">GCSE Biology</a></li>
            </ul>"#;
        let candidates = AqaExtractor.spec_candidates(html);
        assert_eq!(candidates.len(), 1);
        assert_eq!(
            candidates[0].link,
            "https://www.aqa.org.uk/subjects/science/gcse/biology-8461"
        );
    }
}
