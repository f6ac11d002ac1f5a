use crate::archive::decode_latin1;
use crate::error::{ConvertError, Result};
use std::collections::HashMap;

const AUTHORS_DATA: &[u8] = include_bytes!("../data/a.lst");
const TITLES_DATA: &[u8] = include_bytes!("../data/t.lst");

const AUTHOR_FIELDS: usize = 7;
const TITLE_FIELDS: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorRecord {
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleRecord {
    pub title: String,
    pub year: String,
}

/// Author and title registers. Built once, never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct LookupTables {
    authors: HashMap<String, AuthorRecord>,
    titles: HashMap<String, TitleRecord>,
}

impl LookupTables {
    /// Tables from the registers compiled into the crate.
    pub fn bundled() -> Result<Self> {
        Self::from_records(AUTHORS_DATA, TITLES_DATA)
    }

    /// Tables from ISO-8859-1 `|`-delimited register data.
    pub fn from_records(authors_data: &[u8], titles_data: &[u8]) -> Result<Self> {
        let mut authors = HashMap::new();
        for parts in records(authors_data, AUTHOR_FIELDS, "authors")? {
            authors.insert(
                parts[6].to_string(),
                AuthorRecord {
                    full_name: format!("{} {}", parts[3], parts[2]),
                },
            );
        }

        let mut titles = HashMap::new();
        for parts in records(titles_data, TITLE_FIELDS, "titles")? {
            titles.insert(
                parts[1].to_string(),
                TitleRecord {
                    title: parts[0].to_string(),
                    year: parts[4].to_string(),
                },
            );
        }

        Ok(Self { authors, titles })
    }

    pub fn author(&self, key: &str) -> Option<&AuthorRecord> {
        self.authors.get(key)
    }

    pub fn title(&self, key: &str) -> Option<&TitleRecord> {
        self.titles.get(key)
    }

    pub fn author_count(&self) -> usize {
        self.authors.len()
    }

    pub fn title_count(&self) -> usize {
        self.titles.len()
    }
}

fn records(data: &[u8], fields: usize, what: &str) -> Result<Vec<Vec<String>>> {
    let text = decode_latin1(data);
    let mut out = Vec::new();
    for line in text.lines() {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parts: Vec<String> = line.split('|').map(str::to_string).collect();
        if parts.len() != fields {
            return Err(ConvertError::MalformedRecord(format!(
                "bad line in {what} data: {line}"
            )));
        }
        out.push(parts);
    }
    Ok(out)
}
