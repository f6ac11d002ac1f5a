//! Converts Project Runeberg digitized-book archives into a packager-ready [`Book`].
//!
//! An archive is a zip with a `Metadata` file, an `index.html` cover page, an
//! `Articles.lst` chapter index and either page files under `Pages/` or one
//! pre-rendered document per article. [`Converter::convert`] reads all of it
//! and returns the book's metadata plus normalized chapter bodies.

mod error;

pub mod archive;
pub mod book;
pub mod config;
pub mod index;
pub mod lookup;
pub mod metadata;
pub mod normalize;
pub mod paragraphs;
pub mod preprocess;
pub mod render;
pub mod stylesheet;

pub use book::{Book, Chapter, Converter};
pub use config::{ParagraphHeuristic, Settings, DEFAULT_ORIGIN};
pub use error::{ConvertError, ErrorKind, Result};
pub use lookup::{AuthorRecord, LookupTables, TitleRecord};
pub use metadata::Metadata;
pub use normalize::normalize_markup;
pub use stylesheet::STYLESHEET;
