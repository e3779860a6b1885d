use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("document error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid data: {message}")]
    InvalidData { message: String },

    #[error("unsupported physical shape version {version} (newest known is {newest})")]
    UnsupportedVersion { version: u32, newest: u32 },

    #[error("physical shape chunk {chunk_id:#010x} not found")]
    ChunkNotFound { chunk_id: u32 },

    /// The document was written by a tool with a different field layout.
    #[error("document version {found:?} does not match converter version {expected:?}")]
    VersionMismatch { expected: String, found: Option<String> },

    #[error("base record has no surface node to merge into")]
    MissingSurface,

    /// A skeleton node can't be synthesized, so the base file must already carry one.
    #[error("base surface has no skeleton to merge into")]
    MissingSkeleton,

    #[error("too many rig parts: {count} (at most {max})")]
    TooManyParts { count: usize, max: usize },
}

impl Error {
    pub fn invalid_data(message: impl Into<String>) -> Error {
        Error::InvalidData {
            message: message.into(),
        }
    }
}
