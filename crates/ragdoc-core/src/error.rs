use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("No document loaded; ingest a document before querying")]
    NoDocumentLoaded,

    #[error("Vector dimension mismatch: {left} != {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("Generation backend failed: {0}")]
    Generation(String),

    #[error("Document source failed: {0}")]
    Source(String),
}

/// Stable, machine-distinguishable failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    EmptyInput,
    NoDocumentLoaded,
    DimensionMismatch,
    Generation,
    Source,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Configuration => "configuration_error",
            Self::EmptyInput => "empty_input",
            Self::NoDocumentLoaded => "no_document_loaded",
            Self::DimensionMismatch => "dimension_mismatch",
            Self::Generation => "generation_backend_error",
            Self::Source => "document_source_error",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::EmptyInput(_) => ErrorKind::EmptyInput,
            Self::NoDocumentLoaded => ErrorKind::NoDocumentLoaded,
            Self::DimensionMismatch { .. } => ErrorKind::DimensionMismatch,
            Self::Generation(_) => ErrorKind::Generation,
            Self::Source(_) => ErrorKind::Source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
