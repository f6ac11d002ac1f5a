use crate::archive::{Archive, ARTICLES, PAGES};
use crate::error::{ConvertError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

lazy_static! {
    static ref SEQ_SINGLE: Regex = Regex::new(r"^[0-9]{4}$").unwrap();
    static ref SEQ_RANGE: Regex = Regex::new(r"^([0-9]{4})-([0-9]{4})$").unwrap();
    static ref FIRST_H1: Regex = Regex::new(r"<h1>([^<]+)</h1>").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `Pages.lst` present: chapters are built from `Pages/NNNN.txt`.
    Paginated,
    /// One pre-rendered `<name>.html` per article.
    PreRendered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChapterSource {
    Pages(Vec<String>),
    Document(String),
}

/// A chapter as listed in `Articles.lst`, before any normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterEntry {
    pub title: String,
    pub source: ChapterSource,
}

pub fn detect_layout(archive: &Archive<'_>) -> Layout {
    if archive.contains(PAGES) {
        Layout::Paginated
    } else {
        Layout::PreRendered
    }
}

/// Expand `NNNN` or `NNNN-MMMM` into zero-padded page ids.
pub fn expand_page_sequence(seq: &str) -> Result<Vec<String>> {
    if SEQ_SINGLE.is_match(seq) {
        return Ok(vec![seq.to_string()]);
    }

    let unsupported = || ConvertError::UnsupportedSequence(seq.to_string());
    let caps = SEQ_RANGE.captures(seq).ok_or_else(unsupported)?;
    let start: u32 = caps[1].parse().map_err(|_| unsupported())?;
    let end: u32 = caps[2].parse().map_err(|_| unsupported())?;
    if end <= start {
        return Err(unsupported());
    }
    Ok((start..=end).map(|page| format!("{page:04}")).collect())
}

/// Parse a paginated-layout `Articles.lst`, lines like `|titeln|0005-0013`.
pub fn parse_paginated_index(text: &str) -> Result<Vec<ChapterEntry>> {
    let mut chapters = Vec::new();
    for line in text.lines() {
        if line.starts_with("index|") || line.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = line.split('|').collect();
        if parts.len() != 3 {
            return Err(ConvertError::MalformedRecord(format!(
                "line does not have 3 fields: {line:?}"
            )));
        }
        let pages = expand_page_sequence(parts[2])?;
        debug!(title = parts[1], pages = pages.len(), "Indexed chapter");
        chapters.push(ChapterEntry {
            title: parts[1].to_string(),
            source: ChapterSource::Pages(pages),
        });
    }
    Ok(chapters)
}

/// Title of a pre-rendered article: the text of its first plain `<h1>`.
pub fn article_title(document: &str) -> Option<&str> {
    FIRST_H1
        .captures(document)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Parse a pre-rendered-layout `Articles.lst` (`htmlbasename|Titel|`) and load every article.
pub fn read_prerendered_index(archive: &mut Archive<'_>, text: &str) -> Result<Vec<ChapterEntry>> {
    let mut chapters = Vec::new();
    for line in text.lines() {
        let Some((name, _)) = line.split_once('|') else {
            continue;
        };
        if name == "index" || name.starts_with('#') {
            continue;
        }

        let member = format!("{name}.html");
        let document = archive.read_text(&member)?;
        let title = article_title(&document)
            .ok_or_else(|| ConvertError::StructuralViolation(format!("no title found in {member}")))?
            .to_string();
        debug!(%title, member = %member, "Indexed article");
        chapters.push(ChapterEntry {
            title,
            source: ChapterSource::Document(document),
        });
    }
    Ok(chapters)
}

pub fn read_index(archive: &mut Archive<'_>) -> Result<(Layout, Vec<ChapterEntry>)> {
    let layout = detect_layout(archive);
    let text = archive.read_text(ARTICLES)?;
    let chapters = match layout {
        Layout::Paginated => parse_paginated_index(&text)?,
        Layout::PreRendered => read_prerendered_index(archive, &text)?,
    };
    if chapters.is_empty() {
        return Err(ConvertError::EmptyContent(format!(
            "got no chapters from {ARTICLES}"
        )));
    }
    Ok((layout, chapters))
}
