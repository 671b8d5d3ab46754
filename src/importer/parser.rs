//! Markdown to draft parser
//!
//! Turns raw markdown into the fields of a content-creation form. The
//! document must carry exactly one level-1 heading, which becomes the title;
//! everything else becomes the body.

use super::error::ImportError;
use super::options::ImportOptions;
use super::report::{ImportReport, ImportWarning, WarningKind};
use super::slug::{slugify_with_limit, suffixed, Clock, SystemClock};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::time::Instant;

const BOM: char = '\u{feff}';
const FRONT_MATTER_DELIMITER: &str = "---";

/// `# Title` lines. CRLF mode keeps `\r` out of the captured text.
static H1_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?mR)^# (.+)$").unwrap());

/// A content draft ready to pre-fill the content-creation form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDraft {
    pub title: String,
    pub body: String,
    pub excerpt: String,
    /// Suggested slug; the content API still enforces uniqueness
    pub slug: String,
    pub meta_title: String,
}

/// Result of a successful import
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub draft: ParsedDraft,
    pub report: ImportReport,
}

enum FrontMatter<'a> {
    Absent,
    Stripped { rest: &'a str, lines: usize },
    Unterminated,
}

fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Remove one `---` delimited block anchored at the very start of `text`.
fn strip_front_matter(text: &str) -> FrontMatter<'_> {
    let mut lines = text.split_inclusive('\n');
    let first = match lines.next() {
        Some(first) if strip_line_ending(first) == FRONT_MATTER_DELIMITER => first,
        _ => return FrontMatter::Absent,
    };
    let mut offset = first.len();
    let mut count = 1;
    for line in lines {
        offset += line.len();
        count += 1;
        if strip_line_ending(line) == FRONT_MATTER_DELIMITER {
            return FrontMatter::Stripped {
                rest: &text[offset..],
                lines: count,
            };
        }
    }
    FrontMatter::Unterminated
}

/// Drop whitespace-only lines from the start of `text`. The first line with
/// content keeps its indentation.
fn skip_blank_lines(mut text: &str) -> &str {
    while let Some(pos) = text.find('\n') {
        if text[..pos].trim().is_empty() {
            text = &text[pos + 1..];
        } else {
            break;
        }
    }
    text
}

/// Cut `text` to at most `max` characters. Returns whether anything was cut.
fn truncate_chars(text: &str, max: usize) -> (&str, bool) {
    match text.char_indices().nth(max) {
        Some((idx, _)) => (&text[..idx], true),
        None => (text, false),
    }
}

/// Markdown to draft parser
pub struct MarkdownParser {
    options: ImportOptions,
    clock: Box<dyn Clock>,
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new(ImportOptions::default())
    }
}

impl MarkdownParser {
    /// Create a new parser with the given options
    pub fn new(options: ImportOptions) -> Self {
        Self {
            options,
            clock: Box::new(SystemClock),
        }
    }

    /// Use a different clock for timestamp suffixes
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Parse markdown into a draft.
    pub fn parse(&self, content: &str) -> Result<ParsedDraft, ImportError> {
        self.import(content, "input").map(|outcome| outcome.draft)
    }

    /// Parse markdown into a draft and report what happened along the way.
    /// `source` only labels the report.
    pub fn import(&self, content: &str, source: &str) -> Result<ImportOutcome, ImportError> {
        let start_time = Instant::now();
        let limits = &self.options.limits;
        let mut report = ImportReport::new(source);
        report.statistics.input_lines = content.lines().count();

        let text = match content.strip_prefix(BOM) {
            Some(rest) => {
                report.statistics.bom_stripped = true;
                rest
            }
            None => content,
        };

        let text = match strip_front_matter(text) {
            FrontMatter::Stripped { rest, lines } => {
                log::debug!("{}: stripped {} lines of front-matter", source, lines);
                report.statistics.front_matter_lines = lines;
                rest
            }
            FrontMatter::Unterminated => {
                report.add_warning(ImportWarning::new(
                    WarningKind::UnterminatedFrontMatter,
                    "document starts with --- but has no closing delimiter; kept as content",
                ));
                text
            }
            FrontMatter::Absent => text,
        };

        let mut headings = H1_LINE.captures_iter(text);
        let Some(heading) = headings.next() else {
            log::debug!("{}: no level-1 heading", source);
            return Err(ImportError::NoH1);
        };
        if headings.next().is_some() {
            log::debug!("{}: more than one level-1 heading", source);
            return Err(ImportError::MultipleH1);
        }

        let title = heading[1].trim();
        if title.is_empty() {
            log::debug!("{}: level-1 heading has no text", source);
            return Err(ImportError::NoH1);
        }
        if title.chars().count() > limits.max_title_len {
            return Err(ImportError::TitleTooLong);
        }

        let line = heading.get(0).map(|m| m.range()).unwrap_or_default();
        let after = &text[line.end..];
        let after = after
            .strip_prefix("\r\n")
            .or_else(|| after.strip_prefix('\n'))
            .unwrap_or(after);
        let mut joined = String::with_capacity(text.len());
        joined.push_str(&text[..line.start]);
        joined.push_str(skip_blank_lines(after));
        let body = skip_blank_lines(&joined).trim_end().to_string();

        let body_chars = body.chars().count();
        if body_chars > limits.max_body_len {
            return Err(ImportError::BodyTooLong);
        }
        report.statistics.body_chars = body_chars;
        report.statistics.body_lines = body.lines().count();
        if body.is_empty() {
            report.add_warning(ImportWarning::new(
                WarningKind::EmptyBody,
                "nothing follows the title",
            ));
        }

        let excerpt = match body
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty() && !l.starts_with('#'))
        {
            Some(first) => {
                let (excerpt, cut) = truncate_chars(first, limits.max_excerpt_len);
                if cut {
                    report.add_warning(ImportWarning::new(
                        WarningKind::ExcerptTruncated,
                        format!("excerpt cut to {} characters", limits.max_excerpt_len),
                    ));
                }
                excerpt.to_string()
            }
            None => String::new(),
        };

        let (meta_title, cut) = truncate_chars(title, limits.max_meta_title_len);
        if cut {
            report.add_warning(ImportWarning::new(
                WarningKind::MetaTitleTruncated,
                format!("meta title cut to {} characters", limits.max_meta_title_len),
            ));
        }

        let base = slugify_with_limit(title, limits.max_slug_len);
        if base.is_empty() {
            report.add_warning(ImportWarning::new(
                WarningKind::EmptySlugBase,
                "title has no characters usable in a slug",
            ));
        }
        let slug = suffixed(&base, &self.options.suffix.generate(self.clock.as_ref()));

        report.duration_ms = start_time.elapsed().as_millis() as u64;
        log::debug!("{}: parsed draft with slug {}", source, slug);

        Ok(ImportOutcome {
            draft: ParsedDraft {
                title: title.to_string(),
                body,
                excerpt,
                slug,
                meta_title: meta_title.to_string(),
            },
            report,
        })
    }
}

/// Parse markdown with default options and the wall clock.
pub fn parse_markdown(content: &str) -> Result<ParsedDraft, ImportError> {
    MarkdownParser::default().parse(content)
}
