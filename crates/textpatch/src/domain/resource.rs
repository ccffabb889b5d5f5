//! Abstraction over the text a patch reads and rewrites.

use std::path::Path;

use crate::domain::errors::PatchError;

/// A whole-text resource that can be read fully and overwritten fully.
pub trait TextResource {
    /// Location used in errors, logs, and outcomes.
    fn location(&self) -> &Path;

    /// Read the entire text. The same encoding is used by [`TextResource::write_text`].
    fn read_text(&mut self) -> Result<String, PatchError>;

    /// Replace the entire text.
    fn write_text(&mut self, text: &str) -> Result<(), PatchError>;

    /// Path of the copy taken before the last write, if any.
    fn backup_path(&self) -> Option<&Path> {
        None
    }
}
