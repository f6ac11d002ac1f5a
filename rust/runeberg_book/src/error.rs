use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("missing resource: {0}")]
    MissingResource(String),
    #[error("malformed record: {0}")]
    MalformedRecord(String),
    #[error("unknown reference: {0}")]
    UnknownReference(String),
    #[error("unsupported page sequence: {0:?}")]
    UnsupportedSequence(String),
    #[error("structural violation: {0}")]
    StructuralViolation(String),
    #[error("empty content: {0}")]
    EmptyContent(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Fieldless mirror of [`ConvertError`] for matching without caring about the detail text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingResource,
    MalformedRecord,
    UnknownReference,
    UnsupportedSequence,
    StructuralViolation,
    EmptyContent,
    Io,
}

impl ConvertError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::MissingResource(_) => ErrorKind::MissingResource,
            ConvertError::MalformedRecord(_) => ErrorKind::MalformedRecord,
            ConvertError::UnknownReference(_) => ErrorKind::UnknownReference,
            ConvertError::UnsupportedSequence(_) => ErrorKind::UnsupportedSequence,
            ConvertError::StructuralViolation(_) => ErrorKind::StructuralViolation,
            ConvertError::EmptyContent(_) => ErrorKind::EmptyContent,
            ConvertError::Io(_) | ConvertError::Zip(_) => ErrorKind::Io,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
