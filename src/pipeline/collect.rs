// src/pipeline/collect.rs

//! Collection pass: fetch, extract, normalize and persist every
//! (board, kind) pair.
//!
//! Each (board, kind) runs behind its own error boundary: a transport
//! failure scraping one kind must not prevent the remaining kinds of the
//! same board from running, and a bad record must not block the records
//! after it. Outcomes are returned as data so callers and tests assert on
//! them instead of scraping logs.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::extract::BoardExtractor;
use crate::models::{Board, BoardLink, Config, ContentKind, Tier};
use crate::normalize::{Normalizer, classify_subject};
use crate::registry::BoardRegistry;
use crate::store::ExamStore;
use crate::utils::http;

/// How one (board, kind) stage ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageResult {
    /// The stage ran to completion (individual records may still have been
    /// skipped).
    Completed,
    /// No registered source for this board/kind; a documented no-op.
    NoSource,
    /// The whole stage failed, typically a transport error.
    Failed(String),
}

impl StageResult {
    pub fn is_failed(&self) -> bool {
        matches!(self, StageResult::Failed(_))
    }
}

/// Outcome of one (board, kind) stage.
#[derive(Debug, Clone)]
pub struct KindOutcome {
    pub board: Board,
    pub kind: ContentKind,
    /// Raw candidates the extractor produced.
    pub found: usize,
    /// Records written (inserted or updated).
    pub stored: usize,
    /// Records dropped by the subject filter, a secondary-fetch failure or
    /// a persistence error.
    pub skipped: usize,
    pub result: StageResult,
}

impl KindOutcome {
    fn new(board: Board, kind: ContentKind, result: StageResult) -> Self {
        Self {
            board,
            kind,
            found: 0,
            stored: 0,
            skipped: 0,
            result,
        }
    }
}

/// Summary of one full pass over all boards and kinds.
#[derive(Debug, Clone)]
pub struct PassStats {
    pub started: DateTime<Utc>,
    pub finished: DateTime<Utc>,
    pub outcomes: Vec<KindOutcome>,
}

impl PassStats {
    pub fn outcome(&self, board: Board, kind: ContentKind) -> Option<&KindOutcome> {
        self.outcomes
            .iter()
            .find(|o| o.board == board && o.kind == kind)
    }

    pub fn stored(&self) -> usize {
        self.outcomes.iter().map(|o| o.stored).sum()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.iter().map(|o| o.skipped).sum()
    }

    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_failed()).count()
    }
}

/// Running tallies for one stage.
#[derive(Debug, Default)]
struct Counts {
    found: usize,
    stored: usize,
    skipped: usize,
}

/// Drives collection passes against a registry and store.
pub struct Collector {
    registry: BoardRegistry,
    store: ExamStore,
    client: reqwest::Client,
    pass_tier: Tier,
    request_delay: Duration,
}

impl Collector {
    /// Build a collector from configuration.
    pub fn new(config: &Config, registry: BoardRegistry, store: ExamStore) -> Result<Self> {
        let client = http::create_client(&config.crawler)?;
        Ok(Self {
            registry,
            store,
            client,
            pass_tier: config.schedule.pass_tier,
            request_delay: Duration::from_millis(config.crawler.request_delay_ms),
        })
    }

    /// Run one full pass: every board in fixed order, every kind in fixed
    /// order, each behind its own error boundary. Never fails as a whole.
    pub async fn collect_all(&self) -> PassStats {
        let started = Utc::now();
        let mut outcomes = Vec::with_capacity(Board::ALL.len() * ContentKind::ALL.len());

        for board in Board::ALL {
            for kind in ContentKind::ALL {
                let outcome = self.collect_kind(board, kind).await;
                match &outcome.result {
                    StageResult::Completed => log::info!(
                        "collected {}/{}: {} found, {} stored, {} skipped",
                        board,
                        kind,
                        outcome.found,
                        outcome.stored,
                        outcome.skipped
                    ),
                    StageResult::NoSource => {
                        log::debug!("no source registered for {}/{}", board, kind)
                    }
                    StageResult::Failed(reason) => {
                        log::warn!("collection failed for {}/{}: {}", board, kind, reason)
                    }
                }
                outcomes.push(outcome);
            }
        }

        PassStats {
            started,
            finished: Utc::now(),
            outcomes,
        }
    }

    /// Collect one (board, kind) pair. Errors are captured in the outcome,
    /// never propagated.
    pub async fn collect_kind(&self, board: Board, kind: ContentKind) -> KindOutcome {
        let Some(source) = self.registry.source(board, kind) else {
            return KindOutcome::new(board, kind, StageResult::NoSource);
        };

        match self.ingest(board, kind, &source.url).await {
            Ok(counts) => KindOutcome {
                board,
                kind,
                found: counts.found,
                stored: counts.stored,
                skipped: counts.skipped,
                result: StageResult::Completed,
            },
            Err(e) => KindOutcome::new(board, kind, StageResult::Failed(e.to_string())),
        }
    }

    /// Lighter-weight harvest mode: record every absolute link on the
    /// registered page as a raw BoardLink.
    pub async fn harvest_links(&self, board: Board, kind: ContentKind) -> KindOutcome {
        let Some(source) = self.registry.source(board, kind) else {
            return KindOutcome::new(board, kind, StageResult::NoSource);
        };

        let html = match http::fetch_text(&self.client, &source.url).await {
            Ok(html) => html,
            Err(e) => return KindOutcome::new(board, kind, StageResult::Failed(e.to_string())),
        };

        let mut counts = Counts::default();
        for url in crate::extract::scan::anchors(&html) {
            counts.found += 1;
            let link = BoardLink { board, kind, url };
            match self.store.insert_board_link(&link) {
                Ok(true) => counts.stored += 1,
                Ok(false) => counts.skipped += 1,
                Err(e) => {
                    log::warn!("failed to store link for {}/{}: {}", board, kind, e);
                    counts.skipped += 1;
                }
            }
        }

        KindOutcome {
            board,
            kind,
            found: counts.found,
            stored: counts.stored,
            skipped: counts.skipped,
            result: StageResult::Completed,
        }
    }

    async fn ingest(&self, board: Board, kind: ContentKind, url: &str) -> Result<Counts> {
        let html = http::fetch_text(&self.client, url).await?;
        let extractor = self.registry.extractor(board);
        let normalizer = Normalizer::new(board, self.pass_tier);

        match kind {
            ContentKind::Spec => self.ingest_specs(extractor, &normalizer, &html).await,
            ContentKind::Papers => Ok(self.ingest_papers(extractor, &normalizer, &html)),
            ContentKind::Questions => Ok(self.ingest_questions(extractor, &normalizer, &html)),
            ContentKind::Revision => Ok(self.ingest_revision(extractor, &normalizer, &html)),
        }
    }

    async fn ingest_specs(
        &self,
        extractor: &dyn BoardExtractor,
        normalizer: &Normalizer,
        html: &str,
    ) -> Result<Counts> {
        let mut counts = Counts::default();

        for candidate in extractor.spec_candidates(html) {
            counts.found += 1;

            if classify_subject(&candidate.title).is_none() {
                counts.skipped += 1;
                continue;
            }

            self.polite_delay().await;

            // The syllabus body lives on a detail page; a failed secondary
            // fetch discards just this candidate.
            let content = match http::fetch_text(&self.client, &candidate.link).await {
                Ok(detail) => extractor.spec_content(&detail),
                Err(e) => {
                    log::warn!("spec detail fetch failed for {}: {}", candidate.link, e);
                    counts.skipped += 1;
                    continue;
                }
            };

            let Some(record) = normalizer.spec(&candidate, content) else {
                counts.skipped += 1;
                continue;
            };

            match self.store.upsert_spec(&record) {
                Ok(_) => counts.stored += 1,
                Err(e) => {
                    log::warn!("spec upsert failed for '{}': {}", record.title, e);
                    counts.skipped += 1;
                }
            }
        }

        Ok(counts)
    }

    fn ingest_papers(
        &self,
        extractor: &dyn BoardExtractor,
        normalizer: &Normalizer,
        html: &str,
    ) -> Counts {
        let mut counts = Counts::default();

        for row in extractor.paper_rows(html) {
            counts.found += 1;
            let Some(record) = normalizer.paper(&row) else {
                counts.skipped += 1;
                continue;
            };
            match self.store.upsert_paper(&record) {
                Ok(true) => counts.stored += 1,
                // Already present; papers are never updated.
                Ok(false) => counts.skipped += 1,
                Err(e) => {
                    log::warn!("paper upsert failed for {}: {}", record.url, e);
                    counts.skipped += 1;
                }
            }
        }

        counts
    }

    fn ingest_questions(
        &self,
        extractor: &dyn BoardExtractor,
        normalizer: &Normalizer,
        html: &str,
    ) -> Counts {
        let mut counts = Counts::default();

        for cells in extractor.topic_rows(html) {
            counts.found += 1;
            let Some(record) = normalizer.question(&cells) else {
                counts.skipped += 1;
                continue;
            };
            match self.store.upsert_question(&record) {
                Ok(_) => counts.stored += 1,
                Err(e) => {
                    log::warn!("question upsert failed for '{}': {}", record.question, e);
                    counts.skipped += 1;
                }
            }
        }

        counts
    }

    fn ingest_revision(
        &self,
        extractor: &dyn BoardExtractor,
        normalizer: &Normalizer,
        html: &str,
    ) -> Counts {
        let mut counts = Counts::default();

        for cells in extractor.topic_rows(html) {
            counts.found += 1;
            let Some(record) = normalizer.revision(&cells) else {
                counts.skipped += 1;
                continue;
            };
            match self.store.upsert_revision(&record) {
                Ok(_) => counts.stored += 1,
                Err(e) => {
                    log::warn!("revision upsert failed for '{}': {}", record.topic, e);
                    counts.skipped += 1;
                }
            }
        }

        counts
    }

    async fn polite_delay(&self) {
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }
    }
}
