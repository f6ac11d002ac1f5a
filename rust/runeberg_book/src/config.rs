use crate::error::{ConvertError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;

pub const DEFAULT_ORIGIN: &str = "https://runeberg.org";

/// How page files of a given book mark the start of a new paragraph.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ParagraphHeuristic {
    /// A page beginning a new paragraph starts with a blank line.
    #[default]
    BlankFirstLine,
    /// The blank line is never there; any page not starting in lowercase opens a paragraph.
    MissingBlankFirstLine,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub origin: String,
    pub front_matter_title: String,
    /// `{url}` is replaced by the book's canonical URL.
    pub provenance_note: String,
    pub paragraph_overrides: BTreeMap<String, ParagraphHeuristic>,
}

impl Default for Settings {
    fn default() -> Self {
        let mut paragraph_overrides = BTreeMap::new();
        paragraph_overrides.insert(
            "korkarlen".to_string(),
            ParagraphHeuristic::MissingBlankFirstLine,
        );

        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            front_matter_title: "Titelsida".to_string(),
            provenance_note: concat!(
                r#"<hr/><p>Denna bok i EPUB-format har skapats från källfiler från Projekt Runeberg: "#,
                r#"<a href="{url}">{url}</a>."#
            )
            .to_string(),
            paragraph_overrides,
        }
    }
}

impl Settings {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| ConvertError::MalformedRecord(format!("settings: {e}")))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&contents)?;
        info!(path = %path.display(), "Loaded converter settings");
        Ok(settings)
    }

    pub fn paragraph_heuristic(&self, title_key: &str) -> ParagraphHeuristic {
        self.paragraph_overrides
            .get(title_key)
            .copied()
            .unwrap_or_default()
    }

    pub fn book_url(&self, title_key: &str) -> String {
        format!("{}/{}/", self.origin.trim_end_matches('/'), title_key)
    }

    pub fn provenance_for(&self, url: &str) -> String {
        self.provenance_note.replace("{url}", url)
    }
}
