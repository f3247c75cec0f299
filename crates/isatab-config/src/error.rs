use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse XML {path}: {message}")]
    Xml { path: PathBuf, message: String },

    #[error("missing attribute '{attribute}' on <{element}> in {path}")]
    MissingAttribute {
        path: PathBuf,
        element: String,
        attribute: String,
    },

    #[error("no <isatab-configuration> element in {path}")]
    NoConfiguration { path: PathBuf },
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn xml(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Xml {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
