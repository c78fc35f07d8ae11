//! Crate error type.
//!
//! Rendering itself never fails: malformed path or style text and degenerate
//! geometry are absorbed and simply produce fewer samples. Errors are only
//! raised where caller input is validated up front (buffer dimensions, mesh
//! index integrity, scene files).

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid buffer: {0}")]
    InvalidBuffer(String),

    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    #[error("scene error: {0}")]
    Scene(String),

    #[error("scene json: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn invalid_buffer(msg: impl Into<String>) -> Self {
        Self::InvalidBuffer(msg.into())
    }

    pub fn invalid_mesh(msg: impl Into<String>) -> Self {
        Self::InvalidMesh(msg.into())
    }

    pub fn scene(msg: impl Into<String>) -> Self {
        Self::Scene(msg.into())
    }
}
