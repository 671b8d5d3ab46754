//! Markdown import for OpenYapper
//!
//! Validates an uploaded markdown file and parses it into a content draft:
//! - validator: extension and size checks on the candidate file
//! - parser: BOM and front-matter stripping, title, body and excerpt extraction
//! - slug: slugification and uniqueness suffixes

mod error;
mod options;
mod parser;
mod report;
mod slug;
mod validator;

pub use error::ImportError;
pub use options::{ImportOptions, Limits};
pub use parser::{parse_markdown, ImportOutcome, MarkdownParser, ParsedDraft};
pub use report::{ImportReport, ImportStatistics, ImportWarning, WarningKind};
pub use slug::{slugify, Clock, FixedClock, SlugSuffix, SystemClock, MAX_SLUG_LEN};
pub use validator::{validate, Candidate, ImportCandidate};
