// src/registry.rs

//! Board Registry: source URLs and extractor selection per board.
//!
//! Constructed explicitly at startup and passed into the pipeline — no
//! process-wide state. Several board/kind combinations legitimately lack a
//! public source (no board publishes a question bank or official revision
//! notes); lookup returns `None` for those and the pass records a no-op.

use std::collections::HashMap;

use crate::extract::{AqaExtractor, BoardExtractor, EdexcelExtractor, OcrExtractor};
use crate::models::{Board, ContentKind};

/// A single registered source page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub url: String,
}

/// Static mapping of (board, content kind) to source URL, plus the per-board
/// extractor implementations.
#[derive(Debug, Clone, Default)]
pub struct BoardRegistry {
    sources: HashMap<(Board, ContentKind), Source>,
}

impl BoardRegistry {
    /// An empty registry. Useful for tests and alternative source sets.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The GCSE science sources: spec and past-paper pages for each board.
    /// Question banks and official revision notes are not published by any
    /// of the three boards, so those entries are absent.
    pub fn gcse_defaults() -> Self {
        Self::empty()
            .with_source(
                Board::Aqa,
                ContentKind::Spec,
                "https://www.aqa.org.uk/subjects/science/gcse",
            )
            .with_source(
                Board::Aqa,
                ContentKind::Papers,
                "https://www.aqa.org.uk/find-past-papers-and-mark-schemes",
            )
            .with_source(
                Board::Ocr,
                ContentKind::Spec,
                "https://www.ocr.org.uk/qualifications/by-subject/science/",
            )
            .with_source(
                Board::Ocr,
                ContentKind::Papers,
                "https://www.ocr.org.uk/qualifications/past-papers/",
            )
            .with_source(
                Board::Edexcel,
                ContentKind::Spec,
                "https://qualifications.pearson.com/en/qualifications/edexcel-gcses/sciences-2016.html",
            )
            .with_source(
                Board::Edexcel,
                ContentKind::Papers,
                "https://qualifications.pearson.com/en/support/support-topics/exams/past-papers.html",
            )
    }

    /// Register (or replace) a source for a board/kind pair.
    pub fn with_source(
        mut self,
        board: Board,
        kind: ContentKind,
        url: impl Into<String>,
    ) -> Self {
        self.sources.insert((board, kind), Source { url: url.into() });
        self
    }

    /// Look up the source page for a board/kind pair, if one exists.
    pub fn source(&self, board: Board, kind: ContentKind) -> Option<&Source> {
        self.sources.get(&(board, kind))
    }

    /// The extractor implementation for a board.
    pub fn extractor(&self, board: Board) -> &'static dyn BoardExtractor {
        match board {
            Board::Aqa => &AqaExtractor,
            Board::Ocr => &OcrExtractor,
            Board::Edexcel => &EdexcelExtractor,
        }
    }
}
