//! Integration tests for markdown import

use yapper_import::importer::{
    parse_markdown, slugify, validate, FixedClock, ImportCandidate, ImportError, ImportOptions,
    MarkdownParser, SlugSuffix, WarningKind,
};

const NOW: i64 = 1_734_000_000_123;

fn parser() -> MarkdownParser {
    MarkdownParser::new(ImportOptions::default()).with_clock(FixedClock(NOW))
}

#[test]
fn test_full_document_import() {
    let md = "\u{feff}---
title: ignored
tags: [rust, cms]
---

# Getting Started with OpenYapper

OpenYapper is a multi-tenant CMS. This guide walks through the first site.

## Installation

Run the installer.

```bash
# not a title, but still a level-1 line inside code
```
";
    // The fenced `# ` line counts as a heading too.
    assert_eq!(parser().parse(md), Err(ImportError::MultipleH1));

    let md = md.replace("# not a title", "echo not a title");
    let outcome = parser().import(&md, "getting-started.md").unwrap();
    let draft = &outcome.draft;

    assert_eq!(draft.title, "Getting Started with OpenYapper");
    assert_eq!(draft.meta_title, draft.title);
    assert_eq!(
        draft.excerpt,
        "OpenYapper is a multi-tenant CMS. This guide walks through the first site."
    );
    assert_eq!(
        draft.slug,
        format!("getting-started-with-openyapper-{}", NOW)
    );
    assert!(draft.body.starts_with("OpenYapper is a multi-tenant CMS."));
    assert!(draft.body.contains("## Installation"));
    assert!(draft.body.ends_with("```"));
    assert!(!draft.body.contains("title: ignored"));

    let stats = &outcome.report.statistics;
    assert!(stats.bom_stripped);
    assert_eq!(stats.front_matter_lines, 4);
    assert!(outcome.report.warnings.is_empty());
}

#[test]
fn test_validate_then_parse_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Release Notes.MD");
    std::fs::write(&path, "# Release Notes 2.0\n\nHighlights below.\n").unwrap();

    let candidate = ImportCandidate::from_path(&path).unwrap();
    assert_eq!(validate(&candidate), Ok(()));

    let content = std::fs::read_to_string(&path).unwrap();
    let draft = parser().parse(&content).unwrap();
    assert_eq!(draft.title, "Release Notes 2.0");
    assert_eq!(draft.slug, format!("release-notes-20-{}", NOW));
    assert_eq!(draft.excerpt, "Highlights below.");
}

#[test]
fn test_validation_errors() {
    assert_eq!(
        validate(&ImportCandidate::new("notes.txt", 12)),
        Err(ImportError::InvalidExtension)
    );
    assert_eq!(
        validate(&ImportCandidate::new("notes.MD", 0)),
        Err(ImportError::EmptyFile)
    );
    assert_eq!(
        validate(&ImportCandidate::new("notes.txt", 0)),
        Err(ImportError::InvalidExtension)
    );
}

#[test]
fn test_error_keys_for_ui() {
    let err = parse_markdown("no heading here").unwrap_err();
    assert_eq!(err.key(), "no_h1");
    let err = parse_markdown("# A\n# B").unwrap_err();
    assert_eq!(err.key(), "multiple_h1");
}

#[test]
fn test_hello_world_with_front_matter() {
    let draft = parse_markdown("---\ntitle: x\n---\n# Hello World\n\nFirst paragraph.").unwrap();
    assert_eq!(draft.title, "Hello World");
    assert!(draft.excerpt.starts_with("First paragraph."));
    assert!(draft.slug.starts_with("hello-world-"));
}

#[test]
fn test_title_boundaries() {
    let exact = format!("# {}\n", "t".repeat(500));
    assert!(parse_markdown(&exact).is_ok());

    let over = format!("# {}\n", "t".repeat(501));
    assert_eq!(parse_markdown(&over), Err(ImportError::TitleTooLong));
}

#[test]
fn test_excerpt_skips_subheading() {
    let draft = parse_markdown("# Title\n\n## Subheading\nFirst real line\nSecond line").unwrap();
    assert_eq!(draft.excerpt, "First real line");
}

#[test]
fn test_slug_prefix_property() {
    let titles = [
        "Hello World",
        "Crème Brûlée Recipes",
        "  Spaces   everywhere  ",
        "Rust_and_Go: a comparison!",
        "数字 2024 summary",
    ];
    for title in titles {
        let draft = parse_markdown(&format!("# {}\nbody", title)).unwrap();
        assert_eq!(draft.title, title.trim());
        let base = slugify(title);
        assert!(draft.slug.starts_with(&format!("{}-", base)), "{title:?}");
        assert_eq!(slugify(&base), base);
    }
}

#[test]
fn test_random_suffixes_differ() {
    let parser = MarkdownParser::new(ImportOptions::new().with_suffix(SlugSuffix::Random));
    let a = parser.parse("# Same Title\n").unwrap();
    let b = parser.parse("# Same Title\n").unwrap();
    assert!(a.slug.starts_with("same-title-"));
    assert!(b.slug.starts_with("same-title-"));
    assert_ne!(a.slug, b.slug);
}

#[test]
fn test_options_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("yapper.toml");
    std::fs::write(
        &path,
        "[import]\nsuffix = \"timestamp\"\n\n[import.limits]\nmax_meta_title_len = 10\n",
    )
    .unwrap();

    let options = ImportOptions::load(&path).unwrap();
    let outcome = MarkdownParser::new(options)
        .with_clock(FixedClock(NOW))
        .import("# A Rather Long Title\nbody", "config.md")
        .unwrap();
    assert_eq!(outcome.draft.meta_title, "A Rather L");
    assert!(outcome.report.has_warning(WarningKind::MetaTitleTruncated));
}

#[test]
fn test_draft_json_shape() {
    let draft = parser().parse("# JSON\nbody text").unwrap();
    let value = serde_json::to_value(&draft).unwrap();
    assert_eq!(value["title"], "JSON");
    assert_eq!(value["body"], "body text");
    assert_eq!(value["excerpt"], "body text");
    assert_eq!(value["slug"], format!("json-{}", NOW));
    assert_eq!(value["meta_title"], "JSON");
}
