//! Rasterizer and image loading errors

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvasSize { width: f32, height: f32 },

    #[error("invalid scale factor {0}")]
    InvalidScale(f32),

    #[error("failed to encode PNG")]
    Encode(#[source] png::EncodingError),

    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode PNG")]
    Decode(#[source] png::DecodingError),

    #[error("unsupported PNG format: {color_type:?} at {bit_depth:?}")]
    UnsupportedFormat {
        color_type: png::ColorType,
        bit_depth: png::BitDepth,
    },

    #[error("decoded pixel buffer does not match {width}x{height}")]
    Malformed { width: u32, height: u32 },
}
