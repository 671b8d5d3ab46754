//! Slug generation

use rand::distr::Alphanumeric;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Maximum length of a slug produced by [`slugify`], before any suffix.
pub const MAX_SLUG_LEN: usize = 80;

const RANDOM_SUFFIX_LEN: usize = 8;

static NON_SLUG_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\s-]").unwrap());
static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s_]+").unwrap());
static HYPHEN_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").unwrap());

fn is_combining_diacritic(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

/// Turn arbitrary text into a lowercase, hyphenated, URL-safe slug of at most
/// [`MAX_SLUG_LEN`] characters.
///
/// ```
/// use yapper_import::importer::slugify;
/// assert_eq!(slugify("Café du Monde!"), "cafe-du-monde");
/// ```
pub fn slugify(text: &str) -> String {
    slugify_with_limit(text, MAX_SLUG_LEN)
}

pub(crate) fn slugify_with_limit(text: &str, max_len: usize) -> String {
    let folded: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_diacritic(*c))
        .collect();
    let cleaned = NON_SLUG_CHARS.replace_all(&folded, "");
    let hyphenated = SEPARATORS.replace_all(&cleaned, "-");
    let collapsed = HYPHEN_RUNS.replace_all(&hyphenated, "-");
    let trimmed = collapsed.trim_matches('-');

    // output is ASCII at this point, byte slicing is safe
    let cut = &trimmed[..trimmed.len().min(max_len)];
    cut.trim_end_matches('-').to_string()
}

/// Source of the current time for timestamp suffixes.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

/// How the uniqueness suffix of a draft slug is generated.
///
/// Neither strategy guarantees uniqueness; the content API resolves
/// collisions when the draft is saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlugSuffix {
    /// Current epoch milliseconds
    #[default]
    Timestamp,
    /// Short random lowercase alphanumeric token
    Random,
}

impl std::fmt::Display for SlugSuffix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlugSuffix::Timestamp => write!(f, "timestamp"),
            SlugSuffix::Random => write!(f, "random"),
        }
    }
}

impl SlugSuffix {
    pub(crate) fn generate(&self, clock: &dyn Clock) -> String {
        match self {
            SlugSuffix::Timestamp => clock.now_millis().to_string(),
            SlugSuffix::Random => rand::rng()
                .sample_iter(&Alphanumeric)
                .take(RANDOM_SUFFIX_LEN)
                .map(|b| char::from(b).to_ascii_lowercase())
                .collect(),
        }
    }
}

/// Join a slug base and suffix. An empty base yields the suffix alone.
pub(crate) fn suffixed(base: &str, suffix: &str) -> String {
    if base.is_empty() {
        suffix.to_string()
    } else {
        format!("{}-{}", base, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_diacritics_and_punctuation() {
        assert_eq!(slugify("Café du Monde!"), "cafe-du-monde");
        assert_eq!(slugify("Ärger über Öl"), "arger-uber-ol");
    }

    #[test]
    fn test_collapses_separators() {
        assert_eq!(slugify("  Hello   World  "), "hello-world");
        assert_eq!(slugify("snake_case__name"), "snake-case-name");
        assert_eq!(slugify("a -- b"), "a-b");
        assert_eq!(slugify("--leading and trailing--"), "leading-and-trailing");
    }

    #[test]
    fn test_empty_results() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!! ??? ..."), "");
        assert_eq!(slugify("日本語"), "");
    }

    #[test]
    fn test_truncates_to_max_len() {
        let long = "word ".repeat(40);
        let slug = slugify(&long);
        assert!(slug.len() <= MAX_SLUG_LEN);
        assert!(slug.starts_with("word-word"));
        assert!(!slug.ends_with('-'));
    }

    #[test]
    fn test_truncation_may_cut_a_word() {
        let title = format!("{} abcdef", "a".repeat(76));
        assert_eq!(slugify(&title), format!("{}-abc", "a".repeat(76)));
    }

    #[test]
    fn test_cut_on_hyphen_drops_trailing_hyphen() {
        let title = format!("{} b", "a".repeat(80));
        assert_eq!(slugify(&title), "a".repeat(80));

        let title = format!("{} bcd", "a".repeat(79));
        assert_eq!(slugify(&title), "a".repeat(79));
    }

    #[test]
    fn test_idempotent() {
        let repeated = "x y_z ".repeat(30);
        let inputs = [
            "Café du Monde!",
            "  Rust & WebAssembly: a love story ",
            repeated.as_str(),
            "Ünïcödé—dashes – and   tabs\t",
        ];
        for input in inputs {
            let once = slugify(input);
            assert_eq!(slugify(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn test_timestamp_suffix_uses_clock() {
        let suffix = SlugSuffix::Timestamp.generate(&FixedClock(1_700_000_000_000));
        assert_eq!(suffix, "1700000000000");
    }

    #[test]
    fn test_random_suffix_shape() {
        let suffix = SlugSuffix::Random.generate(&SystemClock);
        assert_eq!(suffix.len(), RANDOM_SUFFIX_LEN);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_suffixed() {
        assert_eq!(suffixed("hello", "42"), "hello-42");
        assert_eq!(suffixed("", "42"), "42");
    }
}
