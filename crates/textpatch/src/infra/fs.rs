//! UTF-8 files on disk as patchable text resources.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use time::OffsetDateTime;
use time::macros::format_description;

use crate::domain::errors::PatchError;
use crate::domain::resource::TextResource;

/// How a [`FileResource`] persists new content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Write to a sibling temporary file and rename it over the target.
    pub atomic: bool,
    /// Copy the original bytes aside before overwriting.
    pub backup: bool,
    /// Extension appended to backup copies.
    pub backup_suffix: String,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            atomic: true,
            backup: false,
            backup_suffix: "bak".into(),
        }
    }
}

/// A file read and written as strict UTF-8.
#[derive(Debug, Clone)]
pub struct FileResource {
    path: PathBuf,
    options: WriteOptions,
    backup: Option<PathBuf>,
}

impl FileResource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_options(path, WriteOptions::default())
    }

    pub fn with_options(path: impl Into<PathBuf>, options: WriteOptions) -> Self {
        Self {
            path: path.into(),
            options,
            backup: None,
        }
    }

    fn ensure_writable(&self, target: &Path) -> Result<fs::Permissions, PatchError> {
        let metadata = fs::metadata(target).map_err(|err| self.io_error(err))?;
        let permissions = metadata.permissions();
        if permissions.readonly() {
            return Err(PatchError::PermissionDenied {
                path: self.path.clone(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "file is read-only"),
            });
        }
        Ok(permissions)
    }

    /// Staging and rename happen next to `target`, the resolved file, so a
    /// symlinked path keeps pointing at the patched file.
    fn write_atomic(
        &self,
        target: &Path,
        text: &str,
        permissions: fs::Permissions,
    ) -> Result<(), PatchError> {
        let dir = target
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut staged = NamedTempFile::new_in(dir).map_err(|err| self.io_error(err))?;
        staged
            .write_all(text.as_bytes())
            .and_then(|_| staged.as_file().sync_all())
            .and_then(|_| staged.as_file().set_permissions(permissions))
            .map_err(|err| self.io_error(err))?;
        staged
            .persist(target)
            .map_err(|err| self.io_error(err.error))?;
        Ok(())
    }

    fn take_backup(&mut self, target: &Path) -> Result<(), PatchError> {
        let backup = backup_path_for(target, &self.options.backup_suffix);
        fs::copy(target, &backup).map_err(|err| PatchError::from_io(&backup, err))?;
        tracing::info!(
            path = %self.path.display(),
            backup = %backup.display(),
            "saved backup of original"
        );
        self.backup = Some(backup);
        Ok(())
    }

    fn io_error(&self, err: io::Error) -> PatchError {
        PatchError::from_io(&self.path, err)
    }
}

impl TextResource for FileResource {
    fn location(&self) -> &Path {
        &self.path
    }

    fn read_text(&mut self) -> Result<String, PatchError> {
        let bytes = fs::read(&self.path).map_err(|err| self.io_error(err))?;
        String::from_utf8(bytes).map_err(|err| PatchError::Encoding {
            path: self.path.clone(),
            offset: err.utf8_error().valid_up_to(),
        })
    }

    fn write_text(&mut self, text: &str) -> Result<(), PatchError> {
        let target = fs::canonicalize(&self.path).map_err(|err| self.io_error(err))?;
        let permissions = self.ensure_writable(&target)?;
        if self.options.backup {
            self.take_backup(&target)?;
        }
        if self.options.atomic {
            self.write_atomic(&target, text, permissions)
        } else {
            fs::write(&target, text).map_err(|err| self.io_error(err))
        }
    }

    fn backup_path(&self) -> Option<&Path> {
        self.backup.as_deref()
    }
}

/// Pick `<name>.<timestamp>.<suffix>` next to `path`, avoiding existing files.
fn backup_path_for(path: &Path, suffix: &str) -> PathBuf {
    let stamp = OffsetDateTime::now_utc()
        .format(format_description!(
            "[year][month][day]T[hour][minute][second]"
        ))
        .unwrap_or_else(|_| "backup".into());
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".into());

    let mut candidate = path.with_file_name(format!("{name}.{stamp}.{suffix}"));
    let mut counter = 1;
    while candidate.exists() {
        candidate = path.with_file_name(format!("{name}.{stamp}-{counter}.{suffix}"));
        counter += 1;
    }
    candidate
}
