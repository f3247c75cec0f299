use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Tsv { path: PathBuf, message: String },

    #[error("no recognizable sections in {path}")]
    NoSections { path: PathBuf },

    #[error("row before any section header in {path}: {label}")]
    OrphanRow { path: PathBuf, label: String },

    #[error("study-scoped section {section} before any STUDY section in {path}")]
    StudySectionWithoutStudy { section: String, path: PathBuf },
}

impl IngestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn tsv(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Tsv {
            path: path.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
