use crate::archive::{Archive, FRONT_MATTER, METADATA};
use crate::config::Settings;
use crate::error::Result;
use crate::index::{read_index, ChapterSource, Layout};
use crate::lookup::LookupTables;
use crate::metadata::Metadata;
use crate::normalize::normalize_markup;
use crate::paragraphs::{chapter_text, synthesize_paragraphs, BoundaryEvidence};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub title: String,
    /// Markup fragment meant to be wrapped in a body tag by the packager.
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub title: String,
    pub title_key: String,
    pub author: String,
    pub language: String,
    pub url: String,
    pub year: Option<String>,
    /// Front matter first, then the articles in index order.
    pub chapters: Vec<Chapter>,
    /// No page started with a blank line and no override applied, so paragraph
    /// starts at page boundaries may have been missed.
    pub paragraph_heuristic_unconfirmed: bool,
}

impl Book {
    pub fn chapter_titles(&self) -> Vec<&str> {
        self.chapters.iter().map(|ch| ch.title.as_str()).collect()
    }

    /// `(section title, body fragment)` pairs in reading order.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.chapters
            .iter()
            .map(|ch| (ch.title.as_str(), ch.body.as_str()))
    }

    /// `Author - Title (Year) [runeberg-key]`
    pub fn long_name(&self) -> String {
        let mut name = format!("{} - {}", self.author, self.title);
        if let Some(year) = self.year.as_deref().filter(|y| !y.is_empty()) {
            name.push_str(&format!(" ({year})"));
        }
        name.push_str(&format!(" [runeberg-{}]", self.title_key));
        name
    }
}

/// Read-only conversion context: reference tables plus settings.
///
/// Build it once and share it; converting never mutates it.
#[derive(Debug, Clone)]
pub struct Converter {
    tables: LookupTables,
    settings: Settings,
}

impl Converter {
    /// Converter over the bundled reference tables.
    pub fn new(settings: Settings) -> Result<Self> {
        Ok(Self::with_tables(LookupTables::bundled()?, settings))
    }

    pub fn with_tables(tables: LookupTables, settings: Settings) -> Self {
        Self { tables, settings }
    }

    pub fn tables(&self) -> &LookupTables {
        &self.tables
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Convert the bytes of an archive zip. The first error aborts the conversion.
    pub fn convert(&self, zip_data: &[u8]) -> Result<Book> {
        let mut archive = Archive::open(zip_data)?;

        let meta = Metadata::parse(&archive.read(METADATA)?, &self.tables, &self.settings)?;
        info!(title_key = %meta.title_key, author = %meta.author, "Converting archive");

        let front_matter = self.front_matter(&mut archive, &meta.url)?;

        let (layout, entries) = read_index(&mut archive)?;
        let heuristic = self.settings.paragraph_heuristic(&meta.title_key);
        let mut evidence = BoundaryEvidence::default();

        let mut chapters = Vec::with_capacity(entries.len() + 1);
        chapters.push(front_matter);
        for entry in entries {
            let markup = match entry.source {
                ChapterSource::Pages(pages) => {
                    let text = chapter_text(&mut archive, &pages, heuristic, &mut evidence)?;
                    synthesize_paragraphs(&text)?
                }
                ChapterSource::Document(document) => document,
            };
            let body = normalize_markup(&markup, &self.settings.origin)?;
            debug!(title = %entry.title, chars = body.len(), "Normalized chapter");
            chapters.push(Chapter {
                title: entry.title,
                body,
            });
        }

        let paragraph_heuristic_unconfirmed =
            layout == Layout::Paginated && evidence.unconfirmed();
        if paragraph_heuristic_unconfirmed {
            warn!(
                title_key = %meta.title_key,
                "Book may be missing blank first lines for new paragraphs"
            );
        }

        info!(
            title_key = %meta.title_key,
            ?layout,
            chapters = chapters.len(),
            "Finished converting archive"
        );

        Ok(Book {
            title: meta.title,
            title_key: meta.title_key,
            author: meta.author,
            language: meta.language,
            url: meta.url,
            year: meta.year,
            chapters,
            paragraph_heuristic_unconfirmed,
        })
    }

    /// Cover document plus provenance note, normalized like any chapter.
    pub fn front_matter(&self, archive: &mut Archive<'_>, url: &str) -> Result<Chapter> {
        let mut body = archive.read_text(FRONT_MATTER)?;
        body.push_str(&self.settings.provenance_for(url));
        Ok(Chapter {
            title: self.settings.front_matter_title.clone(),
            body: normalize_markup(&body, &self.settings.origin)?,
        })
    }
}
