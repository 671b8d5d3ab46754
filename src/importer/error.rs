//! Error classification for markdown import

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a candidate file could not be turned into a draft.
///
/// Every variant is terminal for the given input: the user has to fix the
/// file and try again. The variants are classification keys, not display
/// strings; callers localize them via [`ImportError::key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportError {
    #[error("file must have a .md or .markdown extension")]
    InvalidExtension,
    #[error("file is empty")]
    EmptyFile,
    #[error("document has no level-1 heading")]
    NoH1,
    #[error("document has more than one level-1 heading")]
    MultipleH1,
    #[error("title is too long")]
    TitleTooLong,
    #[error("body is too long")]
    BodyTooLong,
}

impl ImportError {
    /// Stable key for this error, suitable for i18n lookups.
    pub fn key(&self) -> &'static str {
        match self {
            ImportError::InvalidExtension => "invalid_extension",
            ImportError::EmptyFile => "empty_file",
            ImportError::NoH1 => "no_h1",
            ImportError::MultipleH1 => "multiple_h1",
            ImportError::TitleTooLong => "title_too_long",
            ImportError::BodyTooLong => "body_too_long",
        }
    }
}
