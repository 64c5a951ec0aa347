use std::path::PathBuf;

/// Errors produced while fingerprinting, comparing or converting images.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("luminance grid must be square, got {width}x{height}")]
    NonSquareGrid { width: u32, height: u32 },

    #[error("luminance grid is empty")]
    EmptyGrid,

    #[error("side length must be positive, got {0}")]
    InvalidSide(u32),

    #[error("fingerprint length mismatch: expected {expected} bits, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("invalid fingerprint character {found:?} at index {index}")]
    InvalidBitChar { index: usize, found: char },

    #[error("failed to load image {path}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to encode image {path}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("I/O error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
