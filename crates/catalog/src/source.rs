use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::Result;
use crate::record::AnnotationRecord;

/// Supplies parsed annotation records to the index builder. The on-disk
/// format is the implementor's concern; the builder only ever sees parsed
/// (name, polygon) pairs per file.
pub trait AnnotationSource {
    fn records(&self) -> Result<Vec<AnnotationRecord>>;
}

/// Directory of `*.json` annotation files, one serialized
/// [`AnnotationRecord`] per file. Records that fail to parse are skipped
/// with a warning; a bad file never aborts the scan.
#[derive(Debug, Clone)]
pub struct JsonDirectorySource {
    directory: PathBuf,
}

impl JsonDirectorySource {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Loads a single record by its file identifier. Unlike the full scan,
    /// a parse failure here is an error: the caller asked for this exact
    /// file.
    pub fn load_record(&self, file: &str) -> Result<AnnotationRecord> {
        let path = self.directory.join(file);
        let content = fs::read_to_string(&path)?;
        let mut record: AnnotationRecord = serde_json::from_str(&content)?;
        if record.file.is_empty() {
            record.file = file.to_string();
        }
        Ok(record)
    }
}

impl AnnotationSource for JsonDirectorySource {
    fn records(&self) -> Result<Vec<AnnotationRecord>> {
        let mut paths: Vec<PathBuf> = fs::read_dir(&self.directory)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("json"))
            .collect();
        paths.sort();

        let mut records = Vec::new();
        for path in paths {
            let parsed = fs::read_to_string(&path)
                .map_err(crate::error::CatalogError::from)
                .and_then(|content| Ok(serde_json::from_str::<AnnotationRecord>(&content)?));

            match parsed {
                Ok(mut record) => {
                    if record.file.is_empty() {
                        record.file = path
                            .file_name()
                            .map(|name| name.to_string_lossy().into_owned())
                            .unwrap_or_default();
                    }
                    records.push(record);
                }
                Err(err) => {
                    warn!(file = %path.display(), %err, "skipping unreadable annotation record");
                }
            }
        }
        Ok(records)
    }
}
