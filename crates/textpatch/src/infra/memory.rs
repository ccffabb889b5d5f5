//! In-memory text resource.

use std::path::{Path, PathBuf};

use crate::domain::errors::PatchError;
use crate::domain::resource::TextResource;

/// Text held in memory under a nominal path. Counts writes so callers can
/// tell a skipped write from a rewrite with identical content.
#[derive(Debug, Clone, Default)]
pub struct MemoryResource {
    path: PathBuf,
    text: String,
    writes: usize,
}

impl MemoryResource {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            writes: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl TextResource for MemoryResource {
    fn location(&self) -> &Path {
        &self.path
    }

    fn read_text(&mut self) -> Result<String, PatchError> {
        Ok(self.text.clone())
    }

    fn write_text(&mut self, text: &str) -> Result<(), PatchError> {
        self.text.clear();
        self.text.push_str(text);
        self.writes += 1;
        Ok(())
    }
}
