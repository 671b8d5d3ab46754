//! Upload validation
//!
//! Checks a candidate file's name and size before anything reads its
//! contents.

use super::error::ImportError;
use std::path::Path;

const MARKDOWN_EXTENSIONS: [&str; 2] = [".md", ".markdown"];

/// Anything that can be offered for import: a name and a byte size.
pub trait Candidate {
    fn name(&self) -> &str;
    fn size(&self) -> u64;
}

/// A plain candidate, e.g. built from an upload's metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportCandidate {
    pub name: String,
    pub size: u64,
}

impl ImportCandidate {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    /// Build a candidate from a file on disk. Only metadata is read.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, metadata.len()))
    }
}

impl Candidate for ImportCandidate {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }
}

fn has_markdown_extension(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    MARKDOWN_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Validate a candidate file. The extension is checked before the size, so a
/// file failing both reports [`ImportError::InvalidExtension`].
pub fn validate<C: Candidate + ?Sized>(file: &C) -> Result<(), ImportError> {
    if !has_markdown_extension(file.name()) {
        log::debug!("rejecting {}: not a markdown file name", file.name());
        return Err(ImportError::InvalidExtension);
    }
    if file.size() == 0 {
        log::debug!("rejecting {}: empty", file.name());
        return Err(ImportError::EmptyFile);
    }
    Ok(())
}
