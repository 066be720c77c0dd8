//! Supported snippet languages.

/// Language a documentation snippet is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    Curl,
    Python,
    JavaScript,
}

impl Language {
    /// All supported languages, in display order.
    pub const ALL: [Language; 3] = [Language::Curl, Language::Python, Language::JavaScript];

    /// Parse a language from its selector key.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "curl" | "shell" | "sh" => Some(Self::Curl),
            "python" | "py" => Some(Self::Python),
            "javascript" | "js" | "node" => Some(Self::JavaScript),
            _ => None,
        }
    }

    /// Stable key used in selector values and panel ids.
    pub fn key(self) -> &'static str {
        match self {
            Self::Curl => "curl",
            Self::Python => "python",
            Self::JavaScript => "javascript",
        }
    }

    /// Human-readable label for the current-language indicator.
    pub fn label(self) -> &'static str {
        match self {
            Self::Curl => "cURL",
            Self::Python => "Python",
            Self::JavaScript => "JavaScript",
        }
    }

    /// Tag handed to the highlighter for this language's snippets.
    pub fn fence_tag(self) -> &'static str {
        match self {
            Self::Curl => "bash",
            Self::Python => "python",
            Self::JavaScript => "javascript",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keys() {
        assert_eq!(Language::from_key("curl"), Some(Language::Curl));
        assert_eq!(Language::from_key("PYTHON"), Some(Language::Python));
        assert_eq!(Language::from_key("js"), Some(Language::JavaScript));
        assert_eq!(Language::from_key("ruby"), None);
    }

    #[test]
    fn keys_round_trip() {
        for lang in Language::ALL {
            assert_eq!(Language::from_key(lang.key()), Some(lang));
        }
    }
}
