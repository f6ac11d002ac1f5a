//! Paragraph reconstruction for the paginated layout.
//!
//! Page files carry no paragraph markup. A new paragraph is signalled by a
//! blank line, including a blank first line on a page that starts one. The
//! output is still dialect markup with unclosed `<p>` tags; closing them is
//! left to the HTML parser in [`crate::normalize`].

use crate::archive::{decode_text, page_member, Archive};
use crate::config::ParagraphHeuristic;
use crate::error::{ConvertError, Result};
use std::borrow::Cow;
use tracing::{debug, trace};

/// What the pages of a book revealed about how paragraph starts are marked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoundaryEvidence {
    /// A per-book override inserted the boundaries itself.
    pub override_used: bool,
    /// Some page started with a blank line.
    pub blank_first_line_seen: bool,
}

impl BoundaryEvidence {
    pub fn unconfirmed(&self) -> bool {
        !self.override_used && !self.blank_first_line_seen
    }
}

fn is_lowercase_letter(c: char) -> bool {
    c.is_alphabetic() && c.is_lowercase()
}

/// Append one page (carriage returns already stripped) to a chapter body.
pub fn append_page(
    body: &mut String,
    page: &str,
    heuristic: ParagraphHeuristic,
    evidence: &mut BoundaryEvidence,
) {
    let first = page.chars().next();
    let mut boundary = false;

    match heuristic {
        ParagraphHeuristic::MissingBlankFirstLine => {
            if let Some(c) = first {
                if c != '\n' && !is_lowercase_letter(c) {
                    boundary = true;
                }
            }
            evidence.override_used = true;
        }
        ParagraphHeuristic::BlankFirstLine => {
            if first == Some('\n') {
                evidence.blank_first_line_seen = true;
            }
        }
    }

    // A table never continues the previous paragraph.
    if page.starts_with("<table") {
        boundary = true;
    }

    if boundary {
        body.push('\n');
    }
    body.push_str(page);
}

/// Read and join the pages of one chapter in order.
pub fn chapter_text(
    archive: &mut Archive<'_>,
    pages: &[String],
    heuristic: ParagraphHeuristic,
    evidence: &mut BoundaryEvidence,
) -> Result<String> {
    let mut body = String::new();
    for page in pages {
        let member = page_member(page);
        let data = archive.read(&member)?;
        if data.is_empty() {
            return Err(ConvertError::EmptyContent(format!(
                "page file {page} is empty"
            )));
        }
        let text = decode_text(&data, &member).replace('\r', "");
        trace!(page = %page, chars = text.len(), "Appending page");
        append_page(&mut body, &text, heuristic, evidence);
    }
    debug!(pages = pages.len(), chars = body.len(), "Joined chapter pages");
    Ok(body)
}

/// Insert unclosed `<p>` markers and the chapter heading into joined page text.
///
/// Relies on chapter and table tags sitting at the beginning of a line.
pub fn synthesize_paragraphs(text: &str) -> Result<String> {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    let mut between_paragraphs = false;
    let mut marker_seen = false;
    let mut heading_pending = false;

    for raw in text.lines() {
        let mut line = Cow::Borrowed(raw);

        if line.starts_with("<chapter") {
            if marker_seen {
                return Err(ConvertError::StructuralViolation(
                    "already has chapter tag".to_string(),
                ));
            }
            marker_seen = true;
            heading_pending = true;
            continue;
        }

        if heading_pending {
            // The title may already be wrapped in some hN tag.
            if !line.starts_with("<h") {
                line = Cow::Owned(format!("<h1>{line}</h1>"));
            }
            heading_pending = false;
            between_paragraphs = false;
        }

        if line.starts_with("</chapter") {
            continue;
        }

        if line.is_empty() {
            between_paragraphs = true;
            continue;
        }

        let is_table = line.starts_with("<table");
        if between_paragraphs && !is_table {
            out.push_str("\n<p>");
        }
        if is_table {
            // Close the open paragraph, otherwise the parser nests the table inside it.
            if between_paragraphs {
                out.push_str("</p>\n");
            }
            out.push('\n');
        }
        between_paragraphs = false;

        out.push_str(&line);
        out.push('\n');
    }

    Ok(out)
}
