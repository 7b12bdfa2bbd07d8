// src/extract/scan.rs

//! Shared streaming walkers over HTML token events.
//!
//! Extraction runs on a tokenizer walk rather than a DOM build so memory
//! stays bounded on arbitrarily large pages. All walkers share one shape:
//! scan for a container marker, accumulate links and adjacent text while
//! inside it, flush the accumulated group when the container closes.
//!
//! A tokenizer error terminates the walk and yields whatever was already
//! accumulated; malformed markup loses at most the records after it.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, BytesText, Event};

use crate::extract::{PaperRow, SpecCandidate, SpecRules};
use crate::normalize::classify_subject;
use crate::utils::resolve;

fn reader(html: &str) -> Reader<&[u8]> {
    let mut reader = Reader::from_reader(html.as_bytes());
    let config = reader.config_mut();
    // Real-world HTML: unmatched and misnested close tags are routine.
    config.check_end_names = false;
    config.allow_unmatched_ends = true;
    reader
}

fn is_tag(name: &[u8], tag: &[u8]) -> bool {
    name.eq_ignore_ascii_case(tag)
}

fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref().eq_ignore_ascii_case(key))
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}

fn text(t: &BytesText<'_>) -> String {
    String::from_utf8_lossy(t).into_owned()
}

/// Scan the qualification list container for {title, link} candidates.
///
/// A `<ul>` whose class contains the board's list class opens the container;
/// inside it, an `<a href>` matching the board's link prefix arms a pending
/// link, and the next non-empty text node flushes the candidate.
pub fn qualification_list(html: &str, rules: &SpecRules) -> Vec<SpecCandidate> {
    let mut reader = reader(html);
    let mut buf = Vec::new();
    let mut candidates = Vec::new();
    let mut in_list = false;
    let mut pending_link: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = e.name();
                if is_tag(name.as_ref(), b"ul") {
                    if attr(&e, b"class").is_some_and(|c| c.contains(rules.list_class)) {
                        in_list = true;
                    }
                } else if in_list && is_tag(name.as_ref(), b"a") {
                    if let Some(href) = attr(&e, b"href") {
                        if href.contains(rules.link_prefix) {
                            pending_link = resolve(rules.base_url, &href);
                        }
                    }
                }
            }
            Ok(Event::Text(t)) if in_list && pending_link.is_some() => {
                let title = text(&t).trim().to_string();
                if !title.is_empty() {
                    if let Some(link) = pending_link.take() {
                        candidates.push(SpecCandidate { title, link });
                    }
                }
            }
            Ok(Event::End(e)) if in_list && is_tag(e.name().as_ref(), b"ul") => {
                in_list = false;
                pending_link = None;
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            Ok(_) => {}
        }
        buf.clear();
    }

    candidates
}

/// Scan the first-level past-paper tables for {year, subject, url} rows.
///
/// Inside a row, a `.pdf` link is the paper URL, the first 4-character text
/// token beginning with "20" is the year, and the first text containing a
/// recognised subject name is the subject. Incomplete rows are dropped.
pub fn paper_table(html: &str) -> Vec<PaperRow> {
    let mut reader = reader(html);
    let mut buf = Vec::new();
    let mut rows = Vec::new();
    let mut in_table = false;
    let mut in_row = false;
    let (mut year, mut subject, mut url) = (String::new(), String::new(), String::new());

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                let name = e.name();
                if is_tag(name.as_ref(), b"table") {
                    in_table = true;
                } else if in_table && is_tag(name.as_ref(), b"tr") {
                    in_row = true;
                    year.clear();
                    subject.clear();
                    url.clear();
                } else if in_row && is_tag(name.as_ref(), b"a") {
                    if let Some(href) = attr(&e, b"href") {
                        if href.contains(".pdf") {
                            url = href;
                        }
                    }
                }
            }
            Ok(Event::Text(t)) if in_row => {
                let trimmed = text(&t).trim().to_string();
                if year.is_empty() && trimmed.len() == 4 && trimmed.starts_with("20") {
                    year = trimmed;
                } else if subject.is_empty() && classify_subject(&trimmed).is_some() {
                    subject = trimmed;
                }
            }
            Ok(Event::End(e)) => {
                let name = e.name();
                if in_row && is_tag(name.as_ref(), b"tr") {
                    if !year.is_empty() && !subject.is_empty() && !url.is_empty() {
                        rows.push(PaperRow {
                            year: std::mem::take(&mut year),
                            subject: std::mem::take(&mut subject),
                            url: std::mem::take(&mut url),
                        });
                    }
                    in_row = false;
                } else if in_table && is_tag(name.as_ref(), b"table") {
                    in_table = false;
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            Ok(_) => {}
        }
        buf.clear();
    }

    rows
}

/// Accumulate the text of `<div>`s whose class contains "content".
///
/// Used on spec detail pages, where the syllabus body sits in a content
/// container surrounded by navigation chrome.
pub fn content_text(html: &str) -> String {
    let mut reader = reader(html);
    let mut buf = Vec::new();
    let mut body = String::new();
    let mut in_content = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if is_tag(e.name().as_ref(), b"div") => {
                if attr(&e, b"class").is_some_and(|c| c.contains("content")) {
                    in_content = true;
                }
            }
            Ok(Event::Text(t)) if in_content => {
                body.push_str(&text(&t));
            }
            Ok(Event::End(e)) if in_content && is_tag(e.name().as_ref(), b"div") => {
                in_content = false;
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            Ok(_) => {}
        }
        buf.clear();
    }

    body
}

/// Collect the trimmed cell texts of every table row.
///
/// Question and revision sources publish plain tables; the normalizer maps
/// each cell group onto the entity shape by arity.
pub fn table_rows(html: &str) -> Vec<Vec<String>> {
    let mut reader = reader(html);
    let mut buf = Vec::new();
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_row = false;
    let mut in_cell = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = e.name();
                if is_tag(name.as_ref(), b"tr") {
                    in_row = true;
                    row.clear();
                } else if in_row && (is_tag(name.as_ref(), b"td") || is_tag(name.as_ref(), b"th")) {
                    in_cell = true;
                    cell.clear();
                }
            }
            Ok(Event::Text(t)) if in_cell => {
                cell.push_str(&text(&t));
            }
            Ok(Event::End(e)) => {
                let name = e.name();
                if in_cell && (is_tag(name.as_ref(), b"td") || is_tag(name.as_ref(), b"th")) {
                    row.push(cell.trim().to_string());
                    in_cell = false;
                } else if in_row && is_tag(name.as_ref(), b"tr") {
                    if !row.is_empty() {
                        rows.push(std::mem::take(&mut row));
                    }
                    in_row = false;
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            Ok(_) => {}
        }
        buf.clear();
    }

    rows
}

/// Collect every absolute link target on the page.
pub fn anchors(html: &str) -> Vec<String> {
    let mut reader = reader(html);
    let mut buf = Vec::new();
    let mut links = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if is_tag(e.name().as_ref(), b"a") => {
                if let Some(href) = attr(&e, b"href") {
                    if href.starts_with("http") {
                        links.push(href);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            Ok(_) => {}
        }
        buf.clear();
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAL_LIST: &str = r#"
        <html><body>
        <ul class="nav-list"><li><a href="/about">About</a></li></ul>
        <ul class="qual-list">
            <li><a href="/subjects/science/gcse/biology-8461">GCSE Biology</a></li>
            <li><a href="/subjects/science/gcse/chemistry-8462">GCSE Chemistry</a></li>
            <li><a href="/subjects/maths/gcse/maths-8300">GCSE Maths</a></li>
        </ul>
        </body></html>"#;

    fn rules() -> SpecRules {
        SpecRules {
            list_class: "qual-list",
            link_prefix: "/subjects/science/gcse/",
            base_url: "https://www.aqa.org.uk",
        }
    }

    #[test]
    fn qualification_list_finds_matching_links() {
        let candidates = qualification_list(QUAL_LIST, &rules());
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].title, "GCSE Biology");
        assert_eq!(
            candidates[0].link,
            "https://www.aqa.org.uk/subjects/science/gcse/biology-8461"
        );
        assert_eq!(candidates[1].title, "GCSE Chemistry");
    }

    #[test]
    fn qualification_list_ignores_other_containers() {
        // The nav list matches no candidates; the maths link has the wrong prefix.
        let candidates = qualification_list(QUAL_LIST, &rules());
        assert!(candidates.iter().all(|c| !c.link.contains("maths")));
        assert!(candidates.iter().all(|c| !c.link.contains("about")));
    }

    #[test]
    fn qualification_list_stops_at_container_close() {
        let html = r#"
            <ul class="qual-list"></ul>
            <a href="/subjects/science/gcse/physics">GCSE Physics</a>"#;
        assert!(qualification_list(html, &rules()).is_empty());
    }

    #[test]
    fn paper_table_extracts_complete_rows() {
        let html = r#"
            <table>
              <tr><th>Year</th><th>Subject</th><th>Paper</th></tr>
              <tr><td>2023</td><td>Biology Paper 1</td>
                  <td><a href="/papers/bio-2023.pdf">Download</a></td></tr>
              <tr><td>2022</td><td>Chemistry Paper 2</td>
                  <td><a href="/papers/chem-2022.pdf">Download</a></td></tr>
            </table>"#;
        let rows = paper_table(html);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].year, "2023");
        assert_eq!(rows[0].subject, "Biology Paper 1");
        assert_eq!(rows[0].url, "/papers/bio-2023.pdf");
    }

    #[test]
    fn paper_table_first_year_token_wins() {
        let html = r#"
            <table><tr>
              <td>2021</td><td>2019</td><td>Physics</td>
              <td><a href="/p.pdf">x</a></td>
            </tr></table>"#;
        let rows = paper_table(html);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].year, "2021");
    }

    #[test]
    fn paper_table_drops_incomplete_rows() {
        let html = r#"
            <table>
              <tr><td>2023</td><td>Biology</td><td>no link here</td></tr>
              <tr><td>n/a</td><td>Chemistry</td>
                  <td><a href="/c.pdf">x</a></td></tr>
            </table>"#;
        assert!(paper_table(html).is_empty());
    }

    #[test]
    fn paper_table_ignores_non_pdf_links() {
        let html = r#"
            <table><tr>
              <td>2020</td><td>Biology</td>
              <td><a href="/papers/bio.html">view</a></td>
            </tr></table>"#;
        assert!(paper_table(html).is_empty());
    }

    #[test]
    fn content_text_accumulates_marked_divs() {
        let html = r#"
            <div class="header">chrome</div>
            <div class="page-content"><p>Cells are the building blocks.</p>
            <p>Osmosis moves water.</p></div>
            <div class="footer">chrome</div>"#;
        let body = content_text(html);
        assert!(body.contains("Cells are the building blocks."));
        assert!(body.contains("Osmosis moves water."));
        assert!(!body.contains("chrome"));
    }

    #[test]
    fn table_rows_collects_cells() {
        let html = r#"
            <table>
              <tr><td>Biology</td><td>Cells</td><td>What is a cell?</td><td>The basic unit.</td></tr>
              <tr><td>Physics</td><td>Forces</td><td>State Newton's first law.</td></tr>
            </table>"#;
        let rows = table_rows(html);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 4);
        assert_eq!(rows[0][2], "What is a cell?");
        assert_eq!(rows[1].len(), 3);
    }

    #[test]
    fn anchors_keeps_absolute_links_only() {
        let html = r#"
            <a href="https://www.aqa.org.uk/papers">papers</a>
            <a href="/relative/path">rel</a>
            <a href="http://example.com/x">x</a>
            <a>no href</a>"#;
        let links = anchors(html);
        assert_eq!(
            links,
            vec![
                "https://www.aqa.org.uk/papers".to_string(),
                "http://example.com/x".to_string(),
            ]
        );
    }

    #[test]
    fn walkers_survive_malformed_markup() {
        // Truncated/misnested markup ends the scan without panicking.
        let html = r#"<table><tr><td>2023</td><td>Biology</td><td><a href="/a.pdf">x</a></td></tr><tr><td"#;
        let rows = paper_table(html);
        assert_eq!(rows.len(), 1);
    }
}
