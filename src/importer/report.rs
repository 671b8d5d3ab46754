//! Import report types

use serde::{Deserialize, Serialize};

/// Type of warning during import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Title was longer than the meta title limit
    MetaTitleTruncated,
    /// First paragraph line was longer than the excerpt limit
    ExcerptTruncated,
    /// Title produced no slug characters, only the suffix remains
    EmptySlugBase,
    /// Nothing left after the heading
    EmptyBody,
    /// Document opens with `---` but never closes it
    UnterminatedFrontMatter,
}

impl std::fmt::Display for WarningKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WarningKind::MetaTitleTruncated => write!(f, "meta_title_truncated"),
            WarningKind::ExcerptTruncated => write!(f, "excerpt_truncated"),
            WarningKind::EmptySlugBase => write!(f, "empty_slug_base"),
            WarningKind::EmptyBody => write!(f, "empty_body"),
            WarningKind::UnterminatedFrontMatter => write!(f, "unterminated_front_matter"),
        }
    }
}

/// A warning generated during import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportWarning {
    pub kind: WarningKind,
    /// Human-readable message
    pub message: String,
}

impl ImportWarning {
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Facts about what the parser stripped and kept
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStatistics {
    /// Lines in the raw input
    pub input_lines: usize,
    /// A leading byte-order mark was removed
    pub bom_stripped: bool,
    /// Lines removed as front-matter, delimiters included
    pub front_matter_lines: usize,
    /// Lines in the resulting body
    pub body_lines: usize,
    /// Characters in the resulting body
    pub body_chars: usize,
}

/// Report for a single successful import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    /// Where the markdown came from (file path or "stdin")
    pub source: String,
    /// Timestamp of the import
    pub timestamp: String,
    /// Duration in milliseconds
    pub duration_ms: u64,
    pub statistics: ImportStatistics,
    pub warnings: Vec<ImportWarning>,
}

impl ImportReport {
    /// Create a new empty report
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            duration_ms: 0,
            statistics: ImportStatistics::default(),
            warnings: Vec::new(),
        }
    }

    pub fn add_warning(&mut self, warning: ImportWarning) {
        self.warnings.push(warning);
    }

    pub fn has_warning(&self, kind: WarningKind) -> bool {
        self.warnings.iter().any(|w| w.kind == kind)
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Convert to human-readable text format
    pub fn to_text(&self) -> String {
        let mut output = String::new();

        output.push_str("Markdown Import Report\n");
        output.push_str("======================\n");
        output.push_str(&format!("Source: {}\n", self.source));
        output.push_str(&format!("Date:   {}\n", self.timestamp));
        output.push_str(&format!("Time:   {}ms\n\n", self.duration_ms));

        let stats = &self.statistics;
        output.push_str("Statistics\n");
        output.push_str("----------\n");
        output.push_str(&format!("Input lines:       {}\n", stats.input_lines));
        output.push_str(&format!(
            "BOM stripped:      {}\n",
            if stats.bom_stripped { "yes" } else { "no" }
        ));
        output.push_str(&format!(
            "Front-matter:      {} lines\n",
            stats.front_matter_lines
        ));
        output.push_str(&format!("Body lines:        {}\n", stats.body_lines));
        output.push_str(&format!("Body characters:   {}\n\n", stats.body_chars));

        if !self.warnings.is_empty() {
            output.push_str("Warnings\n");
            output.push_str("--------\n");
            for warning in &self.warnings {
                output.push_str(&format!("⚠ {}\n", warning));
            }
            output.push('\n');
        }

        output.push_str("Result\n");
        output.push_str("------\n");
        if self.warnings.is_empty() {
            output.push_str("✓ Draft created\n");
        } else {
            output.push_str("✓ Draft created with warnings\n");
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display() {
        let warning = ImportWarning::new(WarningKind::ExcerptTruncated, "cut to 200 characters");
        assert_eq!(
            warning.to_string(),
            "excerpt_truncated: cut to 200 characters"
        );
    }

    #[test]
    fn test_has_warning() {
        let mut report = ImportReport::new("post.md");
        assert!(!report.has_warning(WarningKind::EmptyBody));
        report.add_warning(ImportWarning::new(WarningKind::EmptyBody, "no body"));
        assert!(report.has_warning(WarningKind::EmptyBody));
    }

    #[test]
    fn test_report_to_json() {
        let mut report = ImportReport::new("post.md");
        report.statistics.bom_stripped = true;
        let json = report.to_json().unwrap();
        assert!(json.contains("\"source\": \"post.md\""));
        assert!(json.contains("\"bom_stripped\": true"));
    }

    #[test]
    fn test_report_to_text() {
        let mut report = ImportReport::new("post.md");
        report.statistics.front_matter_lines = 3;
        report.add_warning(ImportWarning::new(WarningKind::EmptySlugBase, "no slug"));

        let text = report.to_text();
        assert!(text.contains("Source: post.md"));
        assert!(text.contains("Front-matter:      3 lines"));
        assert!(text.contains("⚠ empty_slug_base: no slug"));
        assert!(text.contains("Draft created with warnings"));
    }
}
