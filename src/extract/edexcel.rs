// src/extract/edexcel.rs

//! Edexcel (Pearson) extraction heuristics.

use crate::extract::{BoardExtractor, SpecRules};
use crate::models::Board;

/// Extractor for qualifications.pearson.com pages.
#[derive(Debug, Default, Clone, Copy)]
pub struct EdexcelExtractor;

impl BoardExtractor for EdexcelExtractor {
    fn board(&self) -> Board {
        Board::Edexcel
    }

    fn spec_rules(&self) -> SpecRules {
        SpecRules {
            list_class: "qualifications-list",
            link_prefix: "/en/qualifications/edexcel-gcses/",
            base_url: "https://qualifications.pearson.com",
        }
    }
}
