use crate::archive::decode_latin1;
use crate::config::Settings;
use crate::error::{ConvertError, Result};
use crate::lookup::LookupTables;

/// Fields recovered from an archive's `Metadata` member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub title: String,
    pub title_key: String,
    pub author: String,
    pub language: String,
    pub url: String,
    pub year: Option<String>,
}

/// Checked in this order after the scan; the first empty one is reported.
pub const REQUIRED_FIELDS: [(&str, fn(&Metadata) -> &str); 4] = [
    ("Title", |m| m.title.as_str()),
    ("TitleKey", |m| m.title_key.as_str()),
    ("Author", |m| m.author.as_str()),
    ("Language", |m| m.language.as_str()),
];

impl Metadata {
    pub fn parse(data: &[u8], tables: &LookupTables, settings: &Settings) -> Result<Self> {
        let text = decode_latin1(data);
        let mut meta = Metadata::default();

        for line in text.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim_matches(|c| c == ' ' || c == '\t');
            match key {
                "TITLE" => meta.title = value.to_string(),
                "TITLEKEY" => {
                    meta.title_key = value.to_string();
                    meta.url = settings.book_url(value);
                    meta.year = tables.title(value).map(|t| t.year.clone());
                }
                "AUTHORKEY" => match tables.author(value) {
                    Some(author) => meta.author = author.full_name.clone(),
                    None => {
                        return Err(ConvertError::UnknownReference(format!(
                            "unknown AUTHORKEY: {value}"
                        )))
                    }
                },
                "LANGUAGE" => meta.language = value.to_string(),
                _ => {}
            }
        }

        for (name, field) in REQUIRED_FIELDS {
            if field(&meta).is_empty() {
                return Err(ConvertError::MissingResource(format!(
                    "{name} not found in metadata"
                )));
            }
        }

        Ok(meta)
    }
}
