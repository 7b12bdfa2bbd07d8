//! Record types and the fixed board/tier/kind enumerations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// An examinations body publishing its own syllabus and papers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Board {
    Aqa,
    Ocr,
    Edexcel,
}

impl Board {
    /// All boards, in the fixed order a pass iterates them.
    pub const ALL: [Board; 3] = [Board::Aqa, Board::Ocr, Board::Edexcel];

    pub fn as_str(&self) -> &'static str {
        match self {
            Board::Aqa => "aqa",
            Board::Ocr => "ocr",
            Board::Edexcel => "edexcel",
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Board {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "aqa" => Ok(Board::Aqa),
            "ocr" => Ok(Board::Ocr),
            "edexcel" => Ok(Board::Edexcel),
            other => Err(AppError::validation(format!("unknown board: {other}"))),
        }
    }
}

/// A difficulty/variant track of a qualification.
///
/// Canonical spellings use `separate_`; the drifted `separated_` spellings
/// found in older route registrations parse as aliases and are never emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Foundation,
    Higher,
    #[serde(alias = "separated_foundation")]
    SeparateFoundation,
    #[serde(alias = "separated_higher")]
    SeparateHigher,
}

impl Tier {
    pub const ALL: [Tier; 4] = [
        Tier::Foundation,
        Tier::Higher,
        Tier::SeparateFoundation,
        Tier::SeparateHigher,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Foundation => "foundation",
            Tier::Higher => "higher",
            Tier::SeparateFoundation => "separate_foundation",
            Tier::SeparateHigher => "separate_higher",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "foundation" => Ok(Tier::Foundation),
            "higher" => Ok(Tier::Higher),
            "separate_foundation" | "separated_foundation" => Ok(Tier::SeparateFoundation),
            "separate_higher" | "separated_higher" => Ok(Tier::SeparateHigher),
            other => Err(AppError::validation(format!("unknown tier: {other}"))),
        }
    }
}

/// The category of educational material being ingested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Spec,
    Papers,
    Questions,
    Revision,
}

impl ContentKind {
    /// All kinds, in the fixed order a pass runs them for each board.
    pub const ALL: [ContentKind; 4] = [
        ContentKind::Spec,
        ContentKind::Papers,
        ContentKind::Questions,
        ContentKind::Revision,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Spec => "spec",
            ContentKind::Papers => "papers",
            ContentKind::Questions => "questions",
            ContentKind::Revision => "revision",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "spec" => Ok(ContentKind::Spec),
            "papers" => Ok(ContentKind::Papers),
            "questions" => Ok(ContentKind::Questions),
            "revision" => Ok(ContentKind::Revision),
            other => Err(AppError::validation(format!("unknown content kind: {other}"))),
        }
    }
}

/// A science subject recognised by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subject {
    Biology,
    Chemistry,
    Physics,
}

impl Subject {
    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::Biology => "Biology",
            Subject::Chemistry => "Chemistry",
            Subject::Physics => "Physics",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subject {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "biology" => Ok(Subject::Biology),
            "chemistry" => Ok(Subject::Chemistry),
            "physics" => Ok(Subject::Physics),
            other => Err(AppError::validation(format!("unknown subject: {other}"))),
        }
    }
}

/// A syllabus document for one qualification.
///
/// Identity is (board, tier, subject, title); `content` is the mutable
/// free-text body and is overwritten on re-ingestion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Spec {
    pub board: Board,
    pub tier: Tier,
    pub subject: Subject,
    pub title: String,
    pub content: String,
}

/// A past exam paper.
///
/// Identity is the full tuple; papers are immutable historical artifacts,
/// so a duplicate key never updates the stored row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Paper {
    pub board: Board,
    pub tier: Tier,
    /// 4-digit year, or 0 when unknown. Never negative.
    pub year: i32,
    pub subject: Subject,
    pub url: String,
}

/// A practice question with its answer.
///
/// Identity is (board, tier, subject, topic, question); `answer` is
/// overwritten on re-ingestion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Question {
    pub board: Board,
    pub tier: Tier,
    pub subject: Subject,
    pub topic: String,
    pub question: String,
    pub answer: String,
}

/// A revision note for one topic.
///
/// Identity is (board, tier, subject, topic); `content` is overwritten on
/// re-ingestion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Revision {
    pub board: Board,
    pub tier: Tier,
    pub subject: Subject,
    pub topic: String,
    pub content: String,
}

/// A raw link discovered during the link-harvest mode. Insert-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardLink {
    pub board: Board,
    pub kind: ContentKind,
    pub url: String,
}

/// The typed result of a façade query for one content kind.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RecordSet {
    Specs(Vec<Spec>),
    Papers(Vec<Paper>),
    Questions(Vec<Question>),
    Revision(Vec<Revision>),
}

impl RecordSet {
    pub fn len(&self) -> usize {
        match self {
            RecordSet::Specs(v) => v.len(),
            RecordSet::Papers(v) => v.len(),
            RecordSet::Questions(v) => v.len(),
            RecordSet::Revision(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
