use crate::error::{ConvertError, Result};
use std::io::{Cursor, Read};
use tracing::debug;
use zip::result::ZipError;
use zip::ZipArchive;

pub const METADATA: &str = "Metadata";
pub const FRONT_MATTER: &str = "index.html";
pub const ARTICLES: &str = "Articles.lst";
pub const PAGES: &str = "Pages.lst";

pub fn page_member(page_id: &str) -> String {
    format!("Pages/{page_id}.txt")
}

pub fn decode_latin1(bytes: &[u8]) -> String {
    encoding_rs::mem::decode_latin1(bytes).into_owned()
}

/// UTF-8 when the bytes are valid UTF-8, ISO-8859-1 otherwise.
pub fn decode_text(bytes: &[u8], member: &str) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            debug!(member, "Member is not UTF-8, decoding as ISO-8859-1");
            decode_latin1(bytes)
        }
    }
}

/// Read-only view over an in-memory archive zip.
/// Upper bound on the up-front reservation; the header's size is only a claim.
const MAX_RESERVE: u64 = 1 << 20;

fn reserve_hint(declared: u64) -> usize {
    declared.min(MAX_RESERVE) as usize
}

pub struct Archive<'a> {
    zip: ZipArchive<Cursor<&'a [u8]>>,
}

impl<'a> Archive<'a> {
    pub fn open(data: &'a [u8]) -> Result<Self> {
        let zip = ZipArchive::new(Cursor::new(data))
            .map_err(|e| ConvertError::MalformedRecord(format!("unreadable zip archive: {e}")))?;
        Ok(Self { zip })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.zip.file_names().any(|n| n == name)
    }

    pub fn read(&mut self, name: &str) -> Result<Vec<u8>> {
        let mut file = match self.zip.by_name(name) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => {
                return Err(ConvertError::MissingResource(format!(
                    "{name} not found in archive"
                )))
            }
            Err(e) => return Err(e.into()),
        };
        let mut buf = Vec::with_capacity(reserve_hint(file.size()));
        file.read_to_end(&mut buf)?;
        Ok(buf)
    }

    pub fn read_text(&mut self, name: &str) -> Result<String> {
        let bytes = self.read(name)?;
        Ok(decode_text(&bytes, name))
    }
}
