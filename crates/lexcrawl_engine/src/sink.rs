use std::path::{Path, PathBuf};

use crate::filename::{document_filename, document_slug};
use crate::persist::{AtomicFileWriter, PersistError};
use crate::RenderedDocument;

/// Same-second documents with one slug get `-2`, `-3`, ... up to this many.
pub const DEFAULT_MAX_SEQUENCE: u32 = 1_000;

/// Writes rendered documents as `.md` files under a collision-free name.
#[derive(Debug, Clone)]
pub struct FileSink {
    max_sequence: u32,
}

impl Default for FileSink {
    fn default() -> Self {
        Self {
            max_sequence: DEFAULT_MAX_SEQUENCE,
        }
    }
}

impl FileSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates `output_dir` if needed and returns the path actually written.
    pub fn write(&self, doc: &RenderedDocument, output_dir: &Path) -> Result<PathBuf, PersistError> {
        let slug = document_slug(&doc.front_matter.title, &doc.front_matter.url);
        let writer = AtomicFileWriter::new(output_dir.to_path_buf());
        writer.write_new(
            |sequence| document_filename(&slug, doc.captured_at, sequence),
            self.max_sequence,
            &doc.to_markdown(),
        )
    }
}
