//! One-page A4 hiring report rendered with the builtin Helvetica faces.
//!
//! `printpdf` documents are not `Send`; callers render inside
//! `spawn_blocking` and move only the finished bytes across threads.

use chrono::NaiveDate;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use thiserror::Error;

use crate::models::candidate::CandidateDetails;
use crate::report::scoring::ScoreCard;
use crate::report::summary::sanitize;

pub const REPORT_TITLE: &str = "TalentFlow AI - Hiring Summary";
pub const EMPTY_SUMMARY: &str = "No detailed content available.";

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;
const TOP_MM: f32 = 280.0;
const BOTTOM_MM: f32 = 20.0;
const LINE_HEIGHT_MM: f32 = 6.0;
const WRAP_COLUMNS: usize = 95;

const TITLE_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 10.0;
const FOOTER_SIZE: f32 = 11.0;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Font error: {0}")]
    Font(String),

    #[error("Could not serialise PDF: {0}")]
    Write(String),
}

/// Everything printed on the report.
#[derive(Debug, Clone)]
pub struct ReportDocument {
    pub candidate_name: String,
    pub scores: ScoreCard,
    /// Already sanitized and truncated.
    pub summary: String,
    pub generated_on: NaiveDate,
}

/// Tracks the write position and breaks onto a new page when it runs out.
struct Cursor<'a> {
    doc: &'a printpdf::PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
    pages: usize,
}

impl Cursor<'_> {
    fn line(&mut self, text: &str, size: f32, font: &IndirectFontRef) {
        if self.y < BOTTOM_MM {
            let (page, layer) = self.doc.add_page(
                Mm(PAGE_WIDTH_MM),
                Mm(PAGE_HEIGHT_MM),
                format!("Layer {}", self.pages + 1),
            );
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = TOP_MM;
            self.pages += 1;
        }
        if !text.is_empty() {
            self.layer
                .use_text(text, size, Mm(MARGIN_MM), Mm(self.y), font);
        }
        self.y -= LINE_HEIGHT_MM;
    }
}

/// Renders the report and returns the PDF bytes.
pub fn render_report(report: &ReportDocument) -> Result<Vec<u8>, PdfError> {
    let (doc, page, layer) =
        PdfDocument::new(REPORT_TITLE, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| PdfError::Font(format!("{e:?}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| PdfError::Font(format!("{e:?}")))?;

    let mut cursor = Cursor {
        doc: &doc,
        layer: doc.get_page(page).get_layer(layer),
        y: TOP_MM,
        pages: 1,
    };

    cursor.line(REPORT_TITLE, TITLE_SIZE, &bold);
    cursor.line("", BODY_SIZE, &regular);
    for line in header_lines(report) {
        cursor.line(&line, BODY_SIZE, &regular);
    }
    cursor.line("", BODY_SIZE, &regular);

    let summary = report.summary.trim();
    if summary.is_empty() {
        cursor.line(EMPTY_SUMMARY, BODY_SIZE, &regular);
    } else {
        for line in summary.lines() {
            for wrapped in wrap_line(line, WRAP_COLUMNS) {
                cursor.line(&wrapped, BODY_SIZE, &regular);
            }
        }
    }

    cursor.line("", BODY_SIZE, &regular);
    cursor.line(
        &format!("Recommendation: {}", report.scores.recommendation.label()),
        FOOTER_SIZE,
        &bold,
    );

    drop(cursor);
    doc.save_to_bytes()
        .map_err(|e| PdfError::Write(format!("{e:?}")))
}

/// Name and score lines under the title. The name comes from model output,
/// so it is reduced to one printable line and wrapped like the summary.
fn header_lines(report: &ReportDocument) -> Vec<String> {
    let name = sanitize(&report.candidate_name, true)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let name = if name.is_empty() {
        CandidateDetails::DEFAULT_NAME
    } else {
        name.as_str()
    };

    let mut lines = wrap_line(
        &format!(
            "Candidate: {}    Resume Score: {}/100    Interview Score: {}/100",
            name, report.scores.resume_score, report.scores.interview_score
        ),
        WRAP_COLUMNS,
    );
    lines.push(format!(
        "Final Score: {}/100    Date: {}",
        report.scores.final_score,
        report.generated_on.format("%Y-%m-%d")
    ));
    lines
}

/// Greedy word wrap. Words longer than `width` are split mid-word. A blank
/// input line yields one empty line so paragraph breaks survive.
pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in line.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        if word.is_empty() {
            continue;
        }
        let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
        if needed > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(summary: &str) -> ReportDocument {
        ReportDocument {
            candidate_name: "Asha Rao".to_string(),
            scores: ScoreCard::compute(90, 5),
            summary: summary.to_string(),
            generated_on: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
        }
    }

    #[test]
    fn test_render_produces_pdf_bytes() {
        let bytes = render_report(&document("Strong systems engineer.\n\nHire.")).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn test_render_with_empty_summary() {
        let bytes = render_report(&document("   ")).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_long_summary_breaks_onto_more_pages() {
        let summary = "This paragraph repeats to fill the page.\n".repeat(120);
        let bytes = render_report(&document(&summary)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_wrap_respects_width() {
        let line = "word ".repeat(60);
        let wrapped = wrap_line(&line, 95);
        assert!(wrapped.len() > 1);
        assert!(wrapped.iter().all(|l| l.chars().count() <= 95));
        assert_eq!(wrapped.join(" "), line.trim());
    }

    #[test]
    fn test_wrap_splits_overlong_words() {
        let wrapped = wrap_line(&"x".repeat(25), 10);
        assert_eq!(wrapped, vec!["x".repeat(10), "x".repeat(10), "x".repeat(5)]);
    }

    #[test]
    fn test_wrap_blank_line_is_preserved() {
        assert_eq!(wrap_line("", 95), vec![String::new()]);
    }

    #[test]
    fn test_header_wraps_long_candidate_name() {
        let mut report = document("Fine.");
        report.candidate_name = "Bartholomew ".repeat(20);
        let lines = header_lines(&report);
        assert!(lines.len() > 2);
        assert!(lines.iter().all(|l| l.chars().count() <= WRAP_COLUMNS));
        assert!(lines.join(" ").contains("Interview Score: 85/100"));
    }

    #[test]
    fn test_header_strips_unprintable_name() {
        let mut report = document("Fine.");
        report.candidate_name = "李明\n王".to_string();
        assert!(header_lines(&report)[0].starts_with("Candidate: Candidate "));

        report.candidate_name = "Zoë\r\nMüller\u{7}".to_string();
        assert!(header_lines(&report)[0].starts_with("Candidate: Zoë Müller "));
        assert!(render_report(&report).unwrap().starts_with(b"%PDF"));
    }
}
