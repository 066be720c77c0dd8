//! Fenced code blocks extracted from documentation pages.

/// A fenced code block, kept verbatim for highlighting at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock {
    /// Language tag from the fence info string, lowercased ("python",
    /// "bash", ...). Empty when the fence carried no tag.
    pub tag: String,

    /// Verbatim block body.
    pub source: String,

    /// 1-indexed line the fence opens on, relative to the full file.
    pub line: usize,
}

impl FencedBlock {
    pub fn new(info: &str, source: String, line: usize) -> Self {
        Self {
            tag: tag_from_info(info),
            source,
            line,
        }
    }
}

/// Extract the language tag from a fence info string.
///
/// Trailing annotations after the tag (`python title="auth.py"`) are
/// ignored.
pub fn tag_from_info(info: &str) -> String {
    info.split_whitespace()
        .next()
        .unwrap_or("")
        .to_lowercase()
}
