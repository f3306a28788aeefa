use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("no annotated objects survived the scan")]
    EmptyDataset,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
