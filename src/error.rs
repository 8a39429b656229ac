//! Errors raised by the splitter and packer

use std::path::PathBuf;

/// Failure of a split, preview, or pack operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Row or column count below one
    #[error("invalid grid {rows}x{cols}: rows and columns must both be at least 1")]
    InvalidGrid { rows: u32, cols: u32 },

    /// Grid finer than the image, which would produce empty tiles
    #[error(
        "invalid grid {rows}x{cols} for a {width}x{height} image: every tile must be at least one pixel"
    )]
    GridExceedsImage {
        rows: u32,
        cols: u32,
        width: u32,
        height: u32,
    },

    /// Input the imaging backend cannot decode
    #[error("unsupported image format for {}: {reason}", path.display())]
    UnsupportedFormat { path: PathBuf, reason: String },

    /// Read or write failure on a specific path
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Encoder failure that is not an I/O error
    #[error("failed to encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Packer invoked without any channel image
    #[error("no channel images assigned: load at least one of red, green or blue")]
    NoChannels,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
