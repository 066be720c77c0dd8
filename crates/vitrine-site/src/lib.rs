//! Static site generator for the Atrium marketing and docs site.
//!
//! Renders the landing page (hero, example switcher, playground, key-request
//! modal) and the markdown documentation set into a deployable directory.

pub mod assets;
pub mod builder;
pub mod templates;

pub use builder::{BuildConfig, BuildError, BuildResult, SiteBuilder};
