//! Syntax highlighting boundary.
//!
//! Highlighting is an opaque text-to-markup step: given source text and a
//! language tag, an implementation returns span-wrapped HTML, or `None` when
//! it cannot handle the tag. Rendering always falls back to escaped
//! preformatted text, so a missing or failing highlighter can never take a
//! panel down.
//!
//! The bundled [`TokenHighlighter`] is a deliberately small stand-in: one
//! alternation pass per language over pre-escaped text. Overlapping token
//! patterns are resolved by rule order, not by a real lexer.

use regex::Regex;

/// Opaque text-to-markup boundary.
pub trait Highlighter: Send + Sync {
    /// Highlight `source` written in the language identified by `tag`.
    ///
    /// Returns `None` when the tag is not supported; callers fall back to
    /// plain escaped output.
    fn highlight(&self, source: &str, tag: &str) -> Option<String>;
}

/// Escape text for embedding in element content.
///
/// Apostrophes are left alone; the output is only ever used inside
/// `<pre><code>` bodies, never attributes.
pub fn escape_html(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    for c in source.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a code panel, highlighted when possible, escaped otherwise.
///
/// This never fails: any highlighter miss degrades to unstyled
/// preformatted text.
pub fn render_code(highlighter: Option<&dyn Highlighter>, source: &str, tag: &str) -> String {
    let body = highlighter
        .and_then(|h| h.highlight(source, tag))
        .unwrap_or_else(|| escape_html(source));

    format!(
        "<pre class=\"code-panel\" data-lang=\"{}\"><code>{}</code></pre>",
        escape_html(tag),
        body
    )
}

struct LanguageRules {
    tags: &'static [&'static str],
    pattern: Regex,
}

/// Regex-based stand-in highlighter.
pub struct TokenHighlighter {
    rules: Vec<LanguageRules>,
}

impl TokenHighlighter {
    pub fn new() -> Self {
        // Patterns run against escaped text, so double quotes appear as
        // `&quot;`. Alternation order decides overlaps: comments, then
        // strings, then keywords, then numbers.
        let rules = vec![
            LanguageRules {
                tags: &["bash", "sh", "shell", "curl"],
                pattern: build_pattern(
                    r"#[^\n]*",
                    r"(?:curl|export|echo|read)\b",
                ),
            },
            LanguageRules {
                tags: &["python", "py"],
                pattern: build_pattern(
                    r"#[^\n]*",
                    r"(?:import|from|def|return|print|for|in|if|else|elif|None|True|False)\b",
                ),
            },
            LanguageRules {
                tags: &["javascript", "js", "node", "typescript", "ts"],
                pattern: build_pattern(
                    r"//[^\n]*",
                    r"(?:const|let|var|function|return|await|async|new|import|export|if|else)\b",
                ),
            },
            LanguageRules {
                tags: &["json"],
                pattern: build_pattern(r"\x00", r"(?:true|false|null)\b"),
            },
        ];

        Self { rules }
    }

    fn rules_for(&self, tag: &str) -> Option<&LanguageRules> {
        let tag = tag.to_lowercase();
        self.rules
            .iter()
            .find(|r| r.tags.iter().any(|t| *t == tag))
    }
}

fn build_pattern(comment: &str, keyword: &str) -> Regex {
    let pattern = format!(
        "(?P<com>{comment})|(?P<str>&quot;.*?&quot;|'[^'\n]*')|(?P<kw>\\b{keyword})|(?P<num>\\b\\d+(?:\\.\\d+)?\\b)"
    );
    Regex::new(&pattern).expect("Failed to compile highlight pattern")
}

impl Default for TokenHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter for TokenHighlighter {
    fn highlight(&self, source: &str, tag: &str) -> Option<String> {
        let rules = self.rules_for(tag)?;
        let escaped = escape_html(source);

        let out = rules.pattern.replace_all(&escaped, |caps: &regex::Captures| {
            let (class, text) = if let Some(m) = caps.name("com") {
                ("tok-com", m.as_str())
            } else if let Some(m) = caps.name("str") {
                ("tok-str", m.as_str())
            } else if let Some(m) = caps.name("kw") {
                ("tok-kw", m.as_str())
            } else if let Some(m) = caps.name("num") {
                ("tok-num", m.as_str())
            } else {
                ("tok", caps.get(0).map(|m| m.as_str()).unwrap_or(""))
            };
            format!("<span class=\"{class}\">{text}</span>")
        });

        Some(out.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<a href="x">&</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;"
        );
    }

    #[test]
    fn wraps_tokens_in_spans() {
        let hl = TokenHighlighter::new();
        let html = hl.highlight("import requests", "python").unwrap();

        assert!(html.contains(r#"<span class="tok-kw">import</span>"#));
    }

    #[test]
    fn marks_strings() {
        let hl = TokenHighlighter::new();
        let html = hl.highlight(r#"name = "atrium""#, "python").unwrap();

        assert!(html.contains("tok-str"));
        assert!(html.contains("&quot;atrium&quot;"));
    }

    #[test]
    fn declines_unknown_tags() {
        let hl = TokenHighlighter::new();
        assert!(hl.highlight("puts 'hi'", "ruby").is_none());
    }

    #[test]
    fn render_falls_back_to_escaped_pre() {
        let html = render_code(None, "<script>alert(1)</script>", "ruby");

        assert!(html.starts_with("<pre"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn render_uses_highlighter_when_supported() {
        let hl = TokenHighlighter::new();
        let html = render_code(Some(&hl), "const x = 1;", "javascript");

        assert!(html.contains("tok-kw"));
        assert!(html.contains("tok-num"));
    }
}
