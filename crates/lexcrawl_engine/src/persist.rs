use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("no free filename after {attempts} attempts, last tried {last}")]
    NameExhausted { attempts: u32, last: String },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    // Writability check: create and drop a temp file.
    NamedTempFile::new_in(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    Ok(())
}

/// Writes files into one directory through a temp file and a rename, so a
/// target either holds the full content or does not exist.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Write `{dir}/{filename}`, replacing any existing file.
    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        let tmp = self.staged(content)?;
        let target = self.dir.join(filename);
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }

    /// Write under the first free name `name_for(1)`, `name_for(2)`, ...
    ///
    /// Names are claimed with a no-clobber rename, so an existing file is
    /// never replaced, even by a concurrent writer.
    pub fn write_new<F>(
        &self,
        name_for: F,
        max_attempts: u32,
        content: &str,
    ) -> Result<PathBuf, PersistError>
    where
        F: Fn(u32) -> String,
    {
        let mut tmp = self.staged(content)?;
        let mut last = String::new();
        for sequence in 1..=max_attempts {
            last = name_for(sequence);
            let target = self.dir.join(&last);
            match tmp.persist_noclobber(&target) {
                Ok(_) => return Ok(target),
                Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => tmp = err.file,
                Err(err) => return Err(PersistError::Io(err.error)),
            }
        }
        Err(PersistError::NameExhausted {
            attempts: max_attempts,
            last,
        })
    }

    fn staged(&self, content: &str) -> Result<NamedTempFile, PersistError> {
        ensure_output_dir(&self.dir)?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        Ok(tmp)
    }
}
