// src/normalize.rs

//! Record Normalizer: raw extracted text into typed records.
//!
//! Subject classification is a deliberate low-recall filter favoring
//! precision: anything that is not recognisably biology, chemistry or
//! physics is discarded silently.

use crate::extract::{PaperRow, SpecCandidate};
use crate::models::{Board, Paper, Question, Revision, Spec, Subject, Tier};

/// Classify free text against the recognised science subjects,
/// case-insensitively.
pub fn classify_subject(text: &str) -> Option<Subject> {
    let lower = text.to_lowercase();
    if lower.contains("biology") {
        Some(Subject::Biology)
    } else if lower.contains("chemistry") {
        Some(Subject::Chemistry)
    } else if lower.contains("physics") {
        Some(Subject::Physics)
    } else {
        None
    }
}

/// Permissive year parse: anything that is not a non-negative integer
/// becomes the "unknown" sentinel 0.
pub fn parse_year(text: &str) -> i32 {
    match text.trim().parse::<i32>() {
        Ok(year) if year >= 0 => year,
        _ => 0,
    }
}

/// Builds typed records for one (board, tier) pass.
///
/// The tier is fixed per pass rather than per row: the upstream
/// combined-science pages do not distinguish tiers.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    pub board: Board,
    pub tier: Tier,
}

impl Normalizer {
    pub fn new(board: Board, tier: Tier) -> Self {
        Self { board, tier }
    }

    /// A spec record from a qualification candidate and its fetched body.
    pub fn spec(&self, candidate: &SpecCandidate, content: String) -> Option<Spec> {
        let subject = classify_subject(&candidate.title)?;
        Some(Spec {
            board: self.board,
            tier: self.tier,
            subject,
            title: candidate.title.clone(),
            content,
        })
    }

    /// A paper record from a raw table row.
    pub fn paper(&self, row: &PaperRow) -> Option<Paper> {
        let subject = classify_subject(&row.subject)?;
        Some(Paper {
            board: self.board,
            tier: self.tier,
            year: parse_year(&row.year),
            subject,
            url: row.url.clone(),
        })
    }

    /// A question record from a 4-cell row: subject, topic, question, answer.
    pub fn question(&self, cells: &[String]) -> Option<Question> {
        let [subject_text, topic, question, answer] = cells else {
            return None;
        };
        let subject = classify_subject(subject_text)?;
        if topic.is_empty() || question.is_empty() {
            return None;
        }
        Some(Question {
            board: self.board,
            tier: self.tier,
            subject,
            topic: topic.clone(),
            question: question.clone(),
            answer: answer.clone(),
        })
    }

    /// A revision record from a 3-cell row: subject, topic, content.
    pub fn revision(&self, cells: &[String]) -> Option<Revision> {
        let [subject_text, topic, content] = cells else {
            return None;
        };
        let subject = classify_subject(subject_text)?;
        if topic.is_empty() {
            return None;
        }
        Some(Revision {
            board: self.board,
            tier: self.tier,
            subject,
            topic: topic.clone(),
            content: content.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> Normalizer {
        Normalizer::new(Board::Aqa, Tier::Higher)
    }

    #[test]
    fn classify_is_case_insensitive() {
        assert_eq!(
            classify_subject("Chemistry GCSE overview"),
            Some(Subject::Chemistry)
        );
        assert_eq!(classify_subject("gcse BIOLOGY"), Some(Subject::Biology));
        assert_eq!(classify_subject("Geography"), None);
        assert_eq!(classify_subject(""), None);
    }

    #[test]
    fn parse_year_is_permissive() {
        assert_eq!(parse_year("2023"), 2023);
        assert_eq!(parse_year(" 2019 "), 2019);
        assert_eq!(parse_year("20ab"), 0);
        assert_eq!(parse_year(""), 0);
        assert_eq!(parse_year("-5"), 0);
    }

    #[test]
    fn spec_filters_unrecognised_subjects() {
        let n = normalizer();
        let geography = SpecCandidate {
            title: "Geography".into(),
            link: "https://example.com/geo".into(),
        };
        assert!(n.spec(&geography, "body".into()).is_none());

        let chemistry = SpecCandidate {
            title: "Chemistry GCSE overview".into(),
            link: "https://example.com/chem".into(),
        };
        let spec = n.spec(&chemistry, "body".into()).unwrap();
        assert_eq!(spec.subject, Subject::Chemistry);
        assert_eq!(spec.title, "Chemistry GCSE overview");
        assert_eq!(spec.tier, Tier::Higher);
    }

    #[test]
    fn paper_normalises_year_and_subject() {
        let n = normalizer();
        let paper = n
            .paper(&PaperRow {
                year: "2022".into(),
                subject: "Biology Paper 1".into(),
                url: "/papers/b1.pdf".into(),
            })
            .unwrap();
        assert_eq!(paper.year, 2022);
        assert_eq!(paper.subject, Subject::Biology);
        assert_eq!(paper.url, "/papers/b1.pdf");
    }

    #[test]
    fn question_requires_four_cells() {
        let n = normalizer();
        let cells: Vec<String> = vec![
            "Biology".into(),
            "Cells".into(),
            "What is a cell?".into(),
            "The basic unit of life.".into(),
        ];
        let q = n.question(&cells).unwrap();
        assert_eq!(q.topic, "Cells");
        assert_eq!(q.answer, "The basic unit of life.");

        assert!(n.question(&cells[..3].to_vec()).is_none());
    }

    #[test]
    fn revision_requires_three_cells() {
        let n = normalizer();
        let cells: Vec<String> = vec![
            "Physics".into(),
            "Forces".into(),
            "A force is a push or pull.".into(),
        ];
        let r = n.revision(&cells).unwrap();
        assert_eq!(r.subject, Subject::Physics);
        assert_eq!(r.topic, "Forces");

        // Header rows classify as nothing and fall out.
        let header: Vec<String> = vec!["Subject".into(), "Topic".into(), "Notes".into()];
        assert!(n.revision(&header).is_none());
    }
}
