//! Static API code examples with language switching and highlighting.
//!
//! This crate holds the literal request snippets shown on the Atrium site,
//! the view-model that switches between per-language panels, and the opaque
//! highlighter boundary used to mark them up.

pub mod highlight;
pub mod language;
pub mod operation;
pub mod store;
pub mod switcher;

pub use highlight::{escape_html, render_code, Highlighter, TokenHighlighter};
pub use language::Language;
pub use operation::Operation;
pub use store::{entries_for, source, ExampleEntry};
pub use switcher::{ExamplePanel, ExampleSwitcher};
