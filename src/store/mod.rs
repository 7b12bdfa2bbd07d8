// src/store/mod.rs

//! Upsert store and query façade over SQLite.
//!
//! Every upsert is a single statement keyed on the entity's natural
//! composite identity, so each record commit stands alone: a failure in one
//! record never rolls back or blocks its neighbours, and concurrent readers
//! only ever observe fully committed rows.
//!
//! Merge policy per entity:
//! - Spec / Revision: insert, on conflict overwrite the content field
//!   (last-writer-wins; upstream content is canonical at fetch time).
//! - Question: insert, on conflict overwrite the answer only.
//! - Paper / BoardLink: insert, on conflict do nothing (first-seen wins;
//!   papers are immutable historical artifacts).

mod schema;

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, params};

use crate::error::Result;
use crate::models::{
    Board, BoardLink, ContentKind, Paper, Question, RecordSet, Revision, Spec, Subject, Tier,
};
use schema::SCHEMA;

/// SQLite-backed store for exam board records.
///
/// Cloning is cheap; clones share one connection.
#[derive(Clone)]
pub struct ExamStore {
    conn: Arc<Mutex<Connection>>,
}

impl ExamStore {
    /// Open (or create) a store at `path` and apply the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Open an in-memory store. Useful for testing.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        // A poisoned lock only means another thread panicked mid-statement;
        // the connection itself is still usable.
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Insert or update a spec. On key conflict the content is overwritten.
    pub fn upsert_spec(&self, s: &Spec) -> Result<bool> {
        let changed = self.conn().execute(
            "INSERT INTO specs (board, tier, subject, title, content) VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(board, tier, subject, title) DO UPDATE SET content = excluded.content",
            params![
                s.board.as_str(),
                s.tier.as_str(),
                s.subject.as_str(),
                s.title,
                s.content
            ],
        )?;
        Ok(changed > 0)
    }

    /// Insert a paper. Duplicate keys are silently ignored; returns whether
    /// a new row was written.
    pub fn upsert_paper(&self, p: &Paper) -> Result<bool> {
        let changed = self.conn().execute(
            "INSERT INTO papers (board, tier, year, subject, url) VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(board, tier, year, subject, url) DO NOTHING",
            params![
                p.board.as_str(),
                p.tier.as_str(),
                p.year,
                p.subject.as_str(),
                p.url
            ],
        )?;
        Ok(changed > 0)
    }

    /// Insert or update a question. On key conflict only the answer is
    /// overwritten.
    pub fn upsert_question(&self, q: &Question) -> Result<bool> {
        let changed = self.conn().execute(
            "INSERT INTO questions (board, tier, subject, topic, question, answer)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(board, tier, subject, topic, question) DO UPDATE SET answer = excluded.answer",
            params![
                q.board.as_str(),
                q.tier.as_str(),
                q.subject.as_str(),
                q.topic,
                q.question,
                q.answer
            ],
        )?;
        Ok(changed > 0)
    }

    /// Insert or update a revision note. On key conflict the content is
    /// overwritten.
    pub fn upsert_revision(&self, r: &Revision) -> Result<bool> {
        let changed = self.conn().execute(
            "INSERT INTO revision (board, tier, subject, topic, content) VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(board, tier, subject, topic) DO UPDATE SET content = excluded.content",
            params![
                r.board.as_str(),
                r.tier.as_str(),
                r.subject.as_str(),
                r.topic,
                r.content
            ],
        )?;
        Ok(changed > 0)
    }

    /// Record a harvested link. Duplicates are silently ignored.
    pub fn insert_board_link(&self, l: &BoardLink) -> Result<bool> {
        let changed = self.conn().execute(
            "INSERT INTO board_links (board, kind, url) VALUES (?1, ?2, ?3)
             ON CONFLICT(board, kind, url) DO NOTHING",
            params![l.board.as_str(), l.kind.as_str(), l.url],
        )?;
        Ok(changed > 0)
    }

    /// Specs for a board and tier.
    pub fn specs(&self, board: Board, tier: Tier) -> Result<Vec<Spec>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT board, tier, subject, title, content FROM specs
             WHERE board = ?1 AND tier = ?2 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![board.as_str(), tier.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut specs = Vec::new();
        for row in rows {
            let (board, tier, subject, title, content) = row?;
            match decode_tags(&board, &tier, &subject) {
                Some((board, tier, subject)) => specs.push(Spec {
                    board,
                    tier,
                    subject,
                    title,
                    content,
                }),
                None => log::warn!("skipping spec row with unrecognised tags"),
            }
        }
        Ok(specs)
    }

    /// Papers for a board and tier.
    pub fn papers(&self, board: Board, tier: Tier) -> Result<Vec<Paper>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT board, tier, year, subject, url FROM papers
             WHERE board = ?1 AND tier = ?2 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![board.as_str(), tier.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i32>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut papers = Vec::new();
        for row in rows {
            let (board, tier, year, subject, url) = row?;
            match decode_tags(&board, &tier, &subject) {
                Some((board, tier, subject)) => papers.push(Paper {
                    board,
                    tier,
                    year,
                    subject,
                    url,
                }),
                None => log::warn!("skipping paper row with unrecognised tags"),
            }
        }
        Ok(papers)
    }

    /// Papers for a board, tier and subject.
    pub fn papers_by_subject(
        &self,
        board: Board,
        tier: Tier,
        subject: Subject,
    ) -> Result<Vec<Paper>> {
        let papers = self.papers(board, tier)?;
        Ok(papers.into_iter().filter(|p| p.subject == subject).collect())
    }

    /// Questions for a board and tier.
    pub fn questions(&self, board: Board, tier: Tier) -> Result<Vec<Question>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT board, tier, subject, topic, question, answer FROM questions
             WHERE board = ?1 AND tier = ?2 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![board.as_str(), tier.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut questions = Vec::new();
        for row in rows {
            let (board, tier, subject, topic, question, answer) = row?;
            match decode_tags(&board, &tier, &subject) {
                Some((board, tier, subject)) => questions.push(Question {
                    board,
                    tier,
                    subject,
                    topic,
                    question,
                    answer,
                }),
                None => log::warn!("skipping question row with unrecognised tags"),
            }
        }
        Ok(questions)
    }

    /// Revision notes for a board and tier.
    pub fn revision(&self, board: Board, tier: Tier) -> Result<Vec<Revision>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT board, tier, subject, topic, content FROM revision
             WHERE board = ?1 AND tier = ?2 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![board.as_str(), tier.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut notes = Vec::new();
        for row in rows {
            let (board, tier, subject, topic, content) = row?;
            match decode_tags(&board, &tier, &subject) {
                Some((board, tier, subject)) => notes.push(Revision {
                    board,
                    tier,
                    subject,
                    topic,
                    content,
                }),
                None => log::warn!("skipping revision row with unrecognised tags"),
            }
        }
        Ok(notes)
    }

    /// Harvested links for a board and kind.
    pub fn board_links(&self, board: Board, kind: ContentKind) -> Result<Vec<BoardLink>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT url FROM board_links WHERE board = ?1 AND kind = ?2 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![board.as_str(), kind.as_str()], |row| {
            row.get::<_, String>(0)
        })?;

        let mut links = Vec::new();
        for url in rows {
            links.push(BoardLink {
                board,
                kind,
                url: url?,
            });
        }
        Ok(links)
    }

    /// Read façade: records of one kind filtered by board and tier. Zero
    /// rows is an empty list, never an error.
    pub fn query(&self, board: Board, tier: Tier, kind: ContentKind) -> Result<RecordSet> {
        Ok(match kind {
            ContentKind::Spec => RecordSet::Specs(self.specs(board, tier)?),
            ContentKind::Papers => RecordSet::Papers(self.papers(board, tier)?),
            ContentKind::Questions => RecordSet::Questions(self.questions(board, tier)?),
            ContentKind::Revision => RecordSet::Revision(self.revision(board, tier)?),
        })
    }

    /// Total row count per table, for pass summaries.
    pub fn counts(&self) -> Result<StoreCounts> {
        let conn = self.conn();
        let count = |table: &str| -> rusqlite::Result<i64> {
            conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
        };
        Ok(StoreCounts {
            specs: count("specs")?,
            papers: count("papers")?,
            questions: count("questions")?,
            revision: count("revision")?,
            board_links: count("board_links")?,
        })
    }
}

/// Row counts per table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreCounts {
    pub specs: i64,
    pub papers: i64,
    pub questions: i64,
    pub revision: i64,
    pub board_links: i64,
}

fn decode_tags(board: &str, tier: &str, subject: &str) -> Option<(Board, Tier, Subject)> {
    Some((
        board.parse().ok()?,
        tier.parse().ok()?,
        subject.parse().ok()?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_spec() -> Spec {
        Spec {
            board: Board::Aqa,
            tier: Tier::Higher,
            subject: Subject::Biology,
            title: "GCSE Biology".to_string(),
            content: "Cell biology, organisation, infection and response.".to_string(),
        }
    }

    fn sample_paper() -> Paper {
        Paper {
            board: Board::Aqa,
            tier: Tier::Higher,
            year: 2023,
            subject: Subject::Biology,
            url: "https://www.aqa.org.uk/papers/bio-2023.pdf".to_string(),
        }
    }

    #[test]
    fn spec_upsert_overwrites_content() {
        let store = ExamStore::open_in_memory().unwrap();
        let mut spec = sample_spec();
        assert!(store.upsert_spec(&spec).unwrap());

        spec.content = "Updated syllabus body.".to_string();
        assert!(store.upsert_spec(&spec).unwrap());

        let specs = store.specs(Board::Aqa, Tier::Higher).unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].content, "Updated syllabus body.");
    }

    #[test]
    fn paper_conflict_keeps_first_seen_row() {
        let store = ExamStore::open_in_memory().unwrap();
        let paper = sample_paper();
        assert!(store.upsert_paper(&paper).unwrap());
        // Identical key: silently ignored, no new row.
        assert!(!store.upsert_paper(&paper).unwrap());

        let papers = store.papers(Board::Aqa, Tier::Higher).unwrap();
        assert_eq!(papers.len(), 1);
        assert_eq!(papers[0].url, paper.url);
    }

    #[test]
    fn paper_with_different_url_is_a_new_row() {
        // The URL is part of the identity, so a different URL for the same
        // year/subject is a distinct paper, not an update.
        let store = ExamStore::open_in_memory().unwrap();
        let paper = sample_paper();
        let mut other = paper.clone();
        other.url = "https://www.aqa.org.uk/papers/bio-2023-v2.pdf".to_string();

        assert!(store.upsert_paper(&paper).unwrap());
        assert!(store.upsert_paper(&other).unwrap());
        assert_eq!(store.papers(Board::Aqa, Tier::Higher).unwrap().len(), 2);
    }

    #[test]
    fn question_conflict_updates_answer_only() {
        let store = ExamStore::open_in_memory().unwrap();
        let mut question = Question {
            board: Board::Ocr,
            tier: Tier::Foundation,
            subject: Subject::Chemistry,
            topic: "Atomic structure".to_string(),
            question: "What is a proton?".to_string(),
            answer: "A positive particle.".to_string(),
        };
        store.upsert_question(&question).unwrap();

        question.answer = "A positively charged subatomic particle.".to_string();
        store.upsert_question(&question).unwrap();

        let questions = store.questions(Board::Ocr, Tier::Foundation).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(
            questions[0].answer,
            "A positively charged subatomic particle."
        );
    }

    #[test]
    fn revision_conflict_updates_content() {
        let store = ExamStore::open_in_memory().unwrap();
        let mut note = Revision {
            board: Board::Edexcel,
            tier: Tier::SeparateHigher,
            subject: Subject::Physics,
            topic: "Forces".to_string(),
            content: "v1".to_string(),
        };
        store.upsert_revision(&note).unwrap();
        note.content = "v2".to_string();
        store.upsert_revision(&note).unwrap();

        let notes = store.revision(Board::Edexcel, Tier::SeparateHigher).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].content, "v2");
    }

    #[test]
    fn reingesting_a_batch_is_idempotent() {
        let store = ExamStore::open_in_memory().unwrap();
        let spec = sample_spec();
        let paper = sample_paper();

        for _ in 0..2 {
            store.upsert_spec(&spec).unwrap();
            store.upsert_paper(&paper).unwrap();
        }

        let counts = store.counts().unwrap();
        assert_eq!(counts.specs, 1);
        assert_eq!(counts.papers, 1);
        assert_eq!(store.specs(Board::Aqa, Tier::Higher).unwrap()[0], spec);
    }

    #[test]
    fn query_on_fresh_store_returns_empty_list() {
        let store = ExamStore::open_in_memory().unwrap();
        let result = store
            .query(Board::Edexcel, Tier::Higher, ContentKind::Questions)
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn query_filters_by_board_and_tier() {
        let store = ExamStore::open_in_memory().unwrap();
        let spec = sample_spec();
        store.upsert_spec(&spec).unwrap();

        let hit = store
            .query(Board::Aqa, Tier::Higher, ContentKind::Spec)
            .unwrap();
        assert_eq!(hit.len(), 1);

        let other_tier = store
            .query(Board::Aqa, Tier::Foundation, ContentKind::Spec)
            .unwrap();
        assert!(other_tier.is_empty());

        let other_board = store
            .query(Board::Ocr, Tier::Higher, ContentKind::Spec)
            .unwrap();
        assert!(other_board.is_empty());
    }

    #[test]
    fn board_links_are_insert_only() {
        let store = ExamStore::open_in_memory().unwrap();
        let link = BoardLink {
            board: Board::Aqa,
            kind: ContentKind::Papers,
            url: "https://www.aqa.org.uk/somewhere".to_string(),
        };
        assert!(store.insert_board_link(&link).unwrap());
        assert!(!store.insert_board_link(&link).unwrap());
        assert_eq!(
            store.board_links(Board::Aqa, ContentKind::Papers).unwrap().len(),
            1
        );
    }

    #[test]
    fn papers_by_subject_filters() {
        let store = ExamStore::open_in_memory().unwrap();
        let bio = sample_paper();
        let mut chem = sample_paper();
        chem.subject = Subject::Chemistry;
        chem.url = "https://www.aqa.org.uk/papers/chem-2023.pdf".to_string();
        store.upsert_paper(&bio).unwrap();
        store.upsert_paper(&chem).unwrap();

        let found = store
            .papers_by_subject(Board::Aqa, Tier::Higher, Subject::Chemistry)
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].subject, Subject::Chemistry);
    }

    #[test]
    fn file_backed_store_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exam.sqlite");

        {
            let store = ExamStore::open(&path).unwrap();
            store.upsert_spec(&sample_spec()).unwrap();
        }

        let reopened = ExamStore::open(&path).unwrap();
        assert_eq!(reopened.specs(Board::Aqa, Tier::Higher).unwrap().len(), 1);
    }
}
