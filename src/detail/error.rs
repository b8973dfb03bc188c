use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetailError {
    #[error("no snippet is selected")]
    NoSnippet,

    #[error("no file at index {0}")]
    NoSuchFile(usize),

    #[error("The snippet must have at least 1 file")]
    LastFile,

    #[error("{0} is only available while editing")]
    RequiresEditing(&'static str),

    #[error("{0} is not available while editing")]
    RequiresViewing(&'static str),

    /// Store, clipboard or editor failure, passed through untouched
    #[error(transparent)]
    Collaborator(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, DetailError>;
