use std::path::PathBuf;

use rollout_core::ApplicationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("i/o failure while writing export pack: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not create output directory `{path}`: {source}")]
    CreateDir { path: PathBuf, source: std::io::Error },
    #[error("archive failure: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("csv failure: {0}")]
    Csv(#[from] csv::Error),
    #[error("json failure: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ExportError> for ApplicationError {
    fn from(value: ExportError) -> Self {
        Self::Export(value.to_string())
    }
}
