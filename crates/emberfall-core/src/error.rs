use thiserror::Error;

/// Failures of the hand overlay. Each one disables only that layer.
#[derive(Debug, Error)]
pub enum FxError {
    #[error("no rendering context available: {0}")]
    Context(String),

    #[error("shader program failed to build: {0}")]
    Program(String),

    #[error("sprite could not be read from {path}: {source}")]
    SpriteLoad {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("sprite could not be decoded: {0}")]
    SpriteDecode(#[from] image::ImageError),
}

pub type FxResult<T> = Result<T, FxError>;
