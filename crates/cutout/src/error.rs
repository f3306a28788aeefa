use thiserror::Error;

#[derive(Error, Debug)]
pub enum CutoutError {
    #[error("polygon needs at least 3 vertices, got {0}")]
    InvalidPolygon(usize),

    #[error("pixel ({x}, {y}) falls outside the {width}x{height} source image")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },

    #[error("failed to load image: {0}")]
    ImageLoad(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CutoutError>;
