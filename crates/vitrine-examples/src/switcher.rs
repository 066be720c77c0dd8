//! View-model for the language-switched example panels.

use crate::highlight::{render_code, Highlighter, TokenHighlighter};
use crate::language::Language;
use crate::operation::Operation;
use crate::store;

/// One rendered panel: an operation plus its snippet, highlighted if possible.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ExamplePanel {
    pub operation: Operation,
    pub title: &'static str,
    pub source: &'static str,
    pub html: String,
}

/// Switches the displayed snippets between languages.
///
/// Selecting a language replaces all three operation panels with that
/// language's fixtures and updates the current-language indicator. Rendering
/// never fails: when the highlighter is absent or declines a tag, panels
/// degrade to plain escaped preformatted text.
pub struct ExampleSwitcher {
    active: Language,
    highlighter: Option<Box<dyn Highlighter>>,
}

impl ExampleSwitcher {
    /// Create a switcher with the bundled highlighter.
    pub fn new() -> Self {
        Self {
            active: Language::default(),
            highlighter: Some(Box::new(TokenHighlighter::new())),
        }
    }

    /// Create a switcher that renders unhighlighted panels only.
    pub fn without_highlighter() -> Self {
        Self {
            active: Language::default(),
            highlighter: None,
        }
    }

    /// Make `language` the active selection.
    pub fn select(&mut self, language: Language) {
        self.active = language;
    }

    /// Select by selector key; returns false (leaving the selection alone)
    /// for unknown keys.
    pub fn select_key(&mut self, key: &str) -> bool {
        match Language::from_key(key) {
            Some(language) => {
                self.select(language);
                true
            }
            None => false,
        }
    }

    /// Currently selected language.
    pub fn active(&self) -> Language {
        self.active
    }

    /// Label for the visible current-language indicator.
    pub fn indicator(&self) -> &'static str {
        self.active.label()
    }

    /// The three panels for the active language, in operation order.
    pub fn panels(&self) -> Vec<ExamplePanel> {
        self.panels_for(self.active)
    }

    /// The three panels for an arbitrary language.
    ///
    /// The landing page pre-renders every language's panel set so the
    /// browser only toggles visibility.
    pub fn panels_for(&self, language: Language) -> Vec<ExamplePanel> {
        store::entries_for(language)
            .into_iter()
            .map(|entry| ExamplePanel {
                operation: entry.operation,
                title: entry.operation.title(),
                source: entry.source,
                html: render_code(
                    self.highlighter.as_deref(),
                    entry.source,
                    language.fence_tag(),
                ),
            })
            .collect()
    }
}

impl Default for ExampleSwitcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_to_curl() {
        let switcher = ExampleSwitcher::new();
        assert_eq!(switcher.active(), Language::Curl);
        assert_eq!(switcher.indicator(), "cURL");
    }

    #[test]
    fn selecting_replaces_all_three_panels() {
        let mut switcher = ExampleSwitcher::new();
        switcher.select(Language::Python);

        let panels = switcher.panels();
        assert_eq!(panels.len(), 3);
        assert_eq!(panels[0].operation, Operation::Authentication);
        assert_eq!(panels[1].operation, Operation::Generation);
        assert_eq!(panels[2].operation, Operation::StatusCheck);
        for panel in &panels {
            assert!(panel.source.contains("requests"));
        }
    }

    #[test]
    fn select_key_ignores_unknown_languages() {
        let mut switcher = ExampleSwitcher::new();
        switcher.select(Language::Python);

        assert!(!switcher.select_key("cobol"));
        assert_eq!(switcher.active(), Language::Python);

        assert!(switcher.select_key("js"));
        assert_eq!(switcher.active(), Language::JavaScript);
    }

    #[test]
    fn python_authentication_panel_carries_exact_fixture() {
        let mut switcher = ExampleSwitcher::new();
        switcher.select(Language::Python);

        let panels = switcher.panels();
        let auth = &panels[0];

        // What the copy affordance hands to the clipboard is the literal
        // bundled source, not the highlighted markup.
        assert_eq!(
            auth.source,
            store::source(Language::Python, Operation::Authentication)
        );
    }

    #[test]
    fn renders_without_highlighter() {
        let mut switcher = ExampleSwitcher::without_highlighter();
        switcher.select(Language::JavaScript);

        for panel in switcher.panels() {
            assert!(panel.html.starts_with("<pre"));
            assert!(!panel.html.contains("tok-kw"));
        }
    }

    #[test]
    fn highlighted_panels_wrap_tokens() {
        let switcher = ExampleSwitcher::new();

        let panels = switcher.panels_for(Language::Python);
        assert!(panels.iter().any(|p| p.html.contains("tok-kw")));
    }
}
