// src/store/schema.rs

//! SQL schema for the exam board store.
//!
//! Natural composite keys carry the uniqueness constraints; the pipeline
//! never deletes rows, so there is no soft-delete machinery.

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS specs (
    id      INTEGER PRIMARY KEY,
    board   TEXT NOT NULL,
    tier    TEXT NOT NULL,
    subject TEXT NOT NULL,
    title   TEXT NOT NULL,
    content TEXT NOT NULL,
    UNIQUE(board, tier, subject, title)
);

CREATE TABLE IF NOT EXISTS papers (
    id      INTEGER PRIMARY KEY,
    board   TEXT NOT NULL,
    tier    TEXT NOT NULL,
    year    INTEGER NOT NULL DEFAULT 0,
    subject TEXT NOT NULL,
    url     TEXT NOT NULL,
    UNIQUE(board, tier, year, subject, url)
);
CREATE INDEX IF NOT EXISTS idx_papers_subject ON papers(board, tier, subject);

CREATE TABLE IF NOT EXISTS questions (
    id       INTEGER PRIMARY KEY,
    board    TEXT NOT NULL,
    tier     TEXT NOT NULL,
    subject  TEXT NOT NULL,
    topic    TEXT NOT NULL,
    question TEXT NOT NULL,
    answer   TEXT NOT NULL,
    UNIQUE(board, tier, subject, topic, question)
);

CREATE TABLE IF NOT EXISTS revision (
    id      INTEGER PRIMARY KEY,
    board   TEXT NOT NULL,
    tier    TEXT NOT NULL,
    subject TEXT NOT NULL,
    topic   TEXT NOT NULL,
    content TEXT NOT NULL,
    UNIQUE(board, tier, subject, topic)
);

CREATE TABLE IF NOT EXISTS board_links (
    id    INTEGER PRIMARY KEY,
    board TEXT NOT NULL,
    kind  TEXT NOT NULL,
    url   TEXT NOT NULL,
    UNIQUE(board, kind, url)
);
";
