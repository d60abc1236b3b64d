use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EnvFileError>;

#[derive(Error, Debug)]
pub enum EnvFileError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EnvFileError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
