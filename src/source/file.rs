//! File-based transport: a recorded message stream, read once.

use crate::model::error::InputError;
use std::path::{Path, PathBuf};

/// Lines of a message file, handed out on the first poll.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    lines: Option<Vec<String>>,
}

impl FileSource {
    /// Read the whole file.
    ///
    /// # Errors
    ///
    /// Returns `InputError::FileNotFound` if the file does not exist.
    /// Returns `InputError::Io` for other I/O errors.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(InputError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let contents = std::fs::read_to_string(path)?;
        let lines = contents.lines().map(str::to_string).collect();
        Ok(Self {
            path: path.to_path_buf(),
            lines: Some(lines),
        })
    }

    /// Path the messages were read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All lines on the first call, nothing afterwards.
    pub fn drain_lines(&mut self) -> Vec<String> {
        self.lines.take().unwrap_or_default()
    }
}
