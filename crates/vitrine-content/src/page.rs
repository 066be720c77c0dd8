//! Page parsing: frontmatter, body, fenced blocks, table of contents.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use serde::Deserialize;

use crate::fence::FencedBlock;

/// YAML frontmatter for a documentation page.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Frontmatter {
    /// Page title (required).
    pub title: String,

    /// Description used for SEO and the search index.
    #[serde(default)]
    pub description: Option<String>,

    /// Order in navigation (lower = first).
    #[serde(default)]
    pub order: Option<i32>,

    /// Whether to show in navigation.
    #[serde(default = "default_true")]
    pub nav: bool,

    /// Custom slug override.
    #[serde(default)]
    pub slug: Option<String>,
}

fn default_true() -> bool {
    true
}

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TocEntry {
    /// Heading text.
    pub title: String,
    /// Anchor ID.
    pub id: String,
    /// Heading level (1-6).
    pub level: u8,
}

/// A parsed documentation page.
#[derive(Debug, Clone)]
pub struct PageDoc {
    /// Parsed frontmatter, if the page had one.
    pub frontmatter: Option<Frontmatter>,

    /// Markdown body with the frontmatter stripped.
    pub content: String,

    /// Fenced code blocks, in document order.
    pub blocks: Vec<FencedBlock>,

    /// Table of contents from the page headings.
    pub toc: Vec<TocEntry>,
}

/// Errors from parsing a page.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Unclosed frontmatter block - missing closing ---")]
    UnclosedFrontmatter,

    #[error("Invalid YAML in frontmatter: {0}")]
    InvalidYaml(String),
}

/// Parse a documentation page.
pub fn parse_page(source: &str) -> Result<PageDoc, ContentError> {
    let (frontmatter, content) = split_frontmatter(source)?;

    // Fence line numbers are reported relative to the full file, so offset
    // by however many lines the frontmatter consumed.
    let body_offset = source.len() - content.len();
    let line_starts = line_starts(content);
    let leading_lines = source[..body_offset].lines().count();

    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    let mut blocks = Vec::new();
    let mut toc = Vec::new();
    let mut open_fence: Option<(String, usize, String)> = None; // (info, line, body)
    let mut open_heading: Option<(u8, String)> = None;

    for (event, range) in Parser::new_ext(content, options).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let info = match &kind {
                    CodeBlockKind::Fenced(info) => info.to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                let line = leading_lines + line_of(&line_starts, range.start);
                open_fence = Some((info, line, String::new()));
            }

            Event::End(TagEnd::CodeBlock) => {
                if let Some((info, line, body)) = open_fence.take() {
                    blocks.push(FencedBlock::new(&info, body, line));
                }
            }

            Event::Start(Tag::Heading { level, .. }) => {
                open_heading = Some((level as u8, String::new()));
            }

            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, title)) = open_heading.take() {
                    let id = slugify(&title);
                    toc.push(TocEntry { title, id, level });
                }
            }

            Event::Text(text) | Event::Code(text) => {
                if let Some((_, _, ref mut body)) = open_fence {
                    body.push_str(&text);
                } else if let Some((_, ref mut title)) = open_heading {
                    title.push_str(&text);
                }
            }

            _ => {}
        }
    }

    Ok(PageDoc {
        frontmatter,
        content: content.to_string(),
        blocks,
        toc,
    })
}

/// Split optional frontmatter off the top of a page.
fn split_frontmatter(source: &str) -> Result<(Option<Frontmatter>, &str), ContentError> {
    let trimmed = source.trim_start();
    if !trimmed.starts_with("---") {
        return Ok((None, source));
    }

    let after_open = &trimmed[3..];
    let Some(close) = after_open.find("\n---") else {
        return Err(ContentError::UnclosedFrontmatter);
    };

    let yaml = after_open[..close].trim();
    let rest = &after_open[close + 4..];

    let frontmatter: Frontmatter =
        serde_yaml::from_str(yaml).map_err(|e| ContentError::InvalidYaml(e.to_string()))?;

    Ok((Some(frontmatter), rest.trim_start()))
}

/// Byte offsets of every line start, for offset-to-line lookups.
fn line_starts(content: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for (i, b) in content.bytes().enumerate() {
        if b == b'\n' {
            starts.push(i + 1);
        }
    }
    starts
}

/// 1-indexed line containing the byte at `offset`.
fn line_of(starts: &[usize], offset: usize) -> usize {
    match starts.binary_search(&offset) {
        Ok(i) => i + 1,
        Err(i) => i,
    }
}

/// Convert a heading to a URL-safe slug.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_complete_page() {
        let source = r#"---
title: Quickstart
description: First request in five minutes
order: 1
---

# Quickstart

Request a key, then generate.

```bash
curl https://api.atrium.dev/v1/health
```

## Polling

```json
{"status": "complete"}
```
"#;

        let doc = parse_page(source).unwrap();

        let fm = doc.frontmatter.unwrap();
        assert_eq!(fm.title, "Quickstart");
        assert_eq!(fm.order, Some(1));
        assert!(fm.nav);

        assert_eq!(doc.blocks.len(), 2);
        assert_eq!(doc.blocks[0].tag, "bash");
        assert!(doc.blocks[0].source.contains("v1/health"));
        assert_eq!(doc.blocks[1].tag, "json");

        assert_eq!(doc.toc.len(), 2);
        assert_eq!(doc.toc[0].title, "Quickstart");
        assert_eq!(doc.toc[1].id, "polling");
    }

    #[test]
    fn parses_without_frontmatter() {
        let doc = parse_page("# Plain\n\nNo frontmatter.").unwrap();

        assert!(doc.frontmatter.is_none());
        assert_eq!(doc.toc.len(), 1);
        assert_eq!(doc.toc[0].title, "Plain");
    }

    #[test]
    fn errors_on_unclosed_frontmatter() {
        let result = parse_page("---\ntitle: Broken\n# never closed");

        assert!(matches!(result, Err(ContentError::UnclosedFrontmatter)));
    }

    #[test]
    fn errors_on_invalid_yaml() {
        let result = parse_page("---\ntitle: [oops\n---\nbody");

        assert!(matches!(result, Err(ContentError::InvalidYaml(_))));
    }

    #[test]
    fn fence_lines_account_for_frontmatter() {
        let source = "---\ntitle: T\n---\n\n```bash\necho hi\n```\n";

        let doc = parse_page(source).unwrap();

        assert_eq!(doc.blocks.len(), 1);
        // The fence opens on line 5 of the file (3 frontmatter lines + blank).
        assert_eq!(doc.blocks[0].line, 5);
    }

    #[test]
    fn slugify_flattens_punctuation() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("API Reference"), "api-reference");
        assert_eq!(slugify("Errors (4xx)"), "errors-4xx");
        assert_eq!(slugify("  Multiple   Spaces  "), "multiple-spaces");
    }
}
