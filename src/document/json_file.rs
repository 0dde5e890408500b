//! # JSON File Backend
//!
//! Saves write the whole document to `<file>.tmp`, fsync it, then rename it
//! over the target so readers never observe a partially written document.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::backend::DocumentBackend;
use super::document::Document;
use super::errors::{StoreError, StoreResult};

/// Document persisted as a single JSON file
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn display(&self) -> String {
        self.path.display().to_string()
    }
}

impl DocumentBackend for JsonFileBackend {
    fn load(&self) -> StoreResult<Document> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Document::new()),
            Err(e) => return Err(StoreError::io(self.display(), e)),
        };
        Document::from_json_str(&text, &self.display())
    }

    fn save(&self, document: &Document) -> StoreResult<()> {
        let text = document.to_json_string()?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| StoreError::io(parent.display().to_string(), e))?;
            }
        }

        let temp_path = self.temp_path();
        let temp_display = temp_path.display().to_string();
        {
            let mut file =
                File::create(&temp_path).map_err(|e| StoreError::io(&temp_display, e))?;
            file.write_all(text.as_bytes())
                .map_err(|e| StoreError::io(&temp_display, e))?;
            file.sync_all().map_err(|e| StoreError::io(&temp_display, e))?;
        }

        fs::rename(&temp_path, &self.path).map_err(|e| StoreError::io(self.display(), e))
    }

    fn location(&self) -> String {
        self.display()
    }
}
