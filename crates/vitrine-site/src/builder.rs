//! Static site builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use rayon::prelude::*;
use walkdir::WalkDir;

use vitrine_content::fence::tag_from_info;
use vitrine_content::page::slugify;
use vitrine_content::{parse_page, Frontmatter, PageDoc};
use vitrine_examples::{render_code, ExampleSwitcher, Highlighter, Language, TokenHighlighter};

use crate::assets::AssetPipeline;
use crate::templates::{
    DocContext, ExampleSet, LandingContext, LanguageTab, NavItem, TemplateEngine,
};

/// Styles offered by the playground form; the wire values the demo endpoint
/// accepts.
pub const STYLE_OPTIONS: [&str; 4] = ["modern", "minimal", "classic", "bold"];

/// Optional pages offered as checkboxes. `home` is always sent and never
/// offered.
pub const PAGE_OPTIONS: [&str; 3] = ["about", "services", "contact"];

/// Configuration for building the site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Source docs directory.
    pub docs_dir: PathBuf,

    /// Output directory.
    pub output_dir: PathBuf,

    /// Minify CSS output.
    pub minify: bool,

    /// Base URL for the site.
    pub base_url: String,

    /// Site title.
    pub title: String,

    /// Include the dev-mode reload script tag in every page.
    pub reload: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from("docs"),
            output_dir: PathBuf::from("dist"),
            minify: true,
            base_url: "/".to_string(),
            title: "Atrium".to_string(),
            reload: false,
        }
    }
}

/// Result of a build.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages generated, landing included.
    pub pages: usize,

    /// Total build time in milliseconds.
    pub duration_ms: u64,

    /// Output directory.
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read docs: {0}")]
    Read(String),

    #[error("Failed to parse page: {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Failed to render template: {0}")]
    Template(String),

    #[error("Failed to write output: {0}")]
    Write(String),
}

/// A docs page queued for rendering.
#[derive(Debug)]
struct PageInfo {
    relative_path: PathBuf,
    output_path: PathBuf,
    doc: PageDoc,
}

/// Builds the full site: landing page, docs, assets, index files.
pub struct SiteBuilder {
    config: BuildConfig,
    templates: TemplateEngine,
    highlighter: TokenHighlighter,
}

impl SiteBuilder {
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            templates: TemplateEngine::new(),
            highlighter: TokenHighlighter::new(),
        }
    }

    /// Build the site into the output directory.
    pub fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::Write(e.to_string()))?;

        self.build_landing()?;

        let pages = self.discover_pages()?;
        let nav = self.build_navigation(&pages);

        let results: Vec<Result<(), BuildError>> = pages
            .par_iter()
            .map(|page| self.build_page(page, &nav))
            .collect();
        for result in results {
            result?;
        }

        self.write_assets()?;
        self.write_search_index(&pages)?;
        self.write_sitemap(&pages)?;

        Ok(BuildResult {
            pages: pages.len() + 1,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Render the landing page with every language's panel set pre-rendered.
    fn build_landing(&self) -> Result<(), BuildError> {
        let switcher = ExampleSwitcher::new();
        let active = switcher.active();

        let ctx = LandingContext {
            site_title: self.config.title.clone(),
            base_url: self.config.base_url.clone(),
            indicator: switcher.indicator(),
            tabs: Language::ALL
                .into_iter()
                .map(|lang| LanguageTab {
                    key: lang.key(),
                    label: lang.label(),
                    active: lang == active,
                })
                .collect(),
            example_sets: Language::ALL
                .into_iter()
                .map(|lang| ExampleSet {
                    key: lang.key(),
                    active: lang == active,
                    panels: switcher.panels_for(lang),
                })
                .collect(),
            style_options: STYLE_OPTIONS.to_vec(),
            page_options: PAGE_OPTIONS.to_vec(),
            reload: self.config.reload,
        };

        let html = self
            .templates
            .render_landing(&ctx)
            .map_err(|e| BuildError::Template(e.to_string()))?;

        fs::write(self.config.output_dir.join("index.html"), html)
            .map_err(|e| BuildError::Write(e.to_string()))
    }

    /// Discover all markdown pages in the docs directory.
    ///
    /// A missing docs directory is not an error; the landing page can ship
    /// alone.
    fn discover_pages(&self) -> Result<Vec<PageInfo>, BuildError> {
        let mut pages = Vec::new();

        if !self.config.docs_dir.exists() {
            tracing::warn!(
                "Docs directory not found: {}, building landing page only",
                self.config.docs_dir.display()
            );
            return Ok(pages);
        }

        for entry in WalkDir::new(&self.config.docs_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if ext != "md" && ext != "markdown" {
                continue;
            }

            let content = fs::read_to_string(path)
                .map_err(|e| BuildError::Read(format!("{}: {}", path.display(), e)))?;

            let doc = parse_page(&content).map_err(|e| BuildError::Parse {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

            let relative_path = path
                .strip_prefix(&self.config.docs_dir)
                .unwrap_or(path)
                .to_path_buf();

            let output_path = self.output_path_for(&relative_path, &doc.frontmatter);

            pages.push(PageInfo {
                relative_path,
                output_path,
                doc,
            });
        }

        pages.sort_by_key(|p| {
            p.doc
                .frontmatter
                .as_ref()
                .and_then(|f| f.order)
                .unwrap_or(999)
        });

        Ok(pages)
    }

    /// Docs land under `{output}/docs/`, one directory per page.
    fn output_path_for(&self, relative: &Path, frontmatter: &Option<Frontmatter>) -> PathBuf {
        let docs_out = self.config.output_dir.join("docs");

        if let Some(slug) = frontmatter.as_ref().and_then(|f| f.slug.as_deref()) {
            return docs_out.join(slug).join("index.html");
        }

        let stem = relative
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("index");
        let parent = relative.parent().unwrap_or(Path::new(""));

        if stem == "index" {
            docs_out.join(parent).join("index.html")
        } else {
            docs_out.join(parent).join(stem).join("index.html")
        }
    }

    fn build_navigation(&self, pages: &[PageInfo]) -> Vec<NavItem> {
        pages
            .iter()
            .filter(|page| page.doc.frontmatter.as_ref().map(|f| f.nav).unwrap_or(true))
            .map(|page| {
                let title = page
                    .doc
                    .frontmatter
                    .as_ref()
                    .map(|f| f.title.clone())
                    .unwrap_or_else(|| {
                        page.relative_path
                            .file_stem()
                            .and_then(|s| s.to_str())
                            .unwrap_or("Untitled")
                            .to_string()
                    });

                NavItem {
                    title,
                    path: self.url_for(&page.output_path),
                    active: false,
                }
            })
            .collect()
    }

    /// Convert an output path back to a site URL.
    fn url_for(&self, output_path: &Path) -> String {
        let relative = output_path
            .strip_prefix(&self.config.output_dir)
            .unwrap_or(output_path);

        let dir = relative
            .parent()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .unwrap_or_default();

        if dir.is_empty() {
            self.config.base_url.clone()
        } else {
            format!("{}{}/", self.config.base_url, dir)
        }
    }

    fn build_page(&self, page: &PageInfo, nav: &[NavItem]) -> Result<(), BuildError> {
        let content = self.render_markdown(&page.doc.content);

        let url = self.url_for(&page.output_path);
        let nav: Vec<NavItem> = nav
            .iter()
            .map(|item| NavItem {
                title: item.title.clone(),
                path: item.path.clone(),
                active: item.path == url,
            })
            .collect();

        let title = page
            .doc
            .frontmatter
            .as_ref()
            .map(|f| f.title.clone())
            .unwrap_or_else(|| "Untitled".to_string());

        let ctx = DocContext {
            title,
            site_title: self.config.title.clone(),
            content,
            nav,
            toc: page.doc.toc.clone(),
            base_url: self.config.base_url.clone(),
            reload: self.config.reload,
        };

        let html = self
            .templates
            .render_doc(&ctx)
            .map_err(|e| BuildError::Template(e.to_string()))?;

        if let Some(parent) = page.output_path.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::Write(e.to_string()))?;
        }
        fs::write(&page.output_path, html).map_err(|e| BuildError::Write(e.to_string()))
    }

    /// Render markdown to HTML.
    ///
    /// Fenced code blocks go through the highlighter (with the escaped-pre
    /// fallback), and headings get anchor ids matching the table of
    /// contents.
    fn render_markdown(&self, content: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS;

        let mut events: Vec<Event> = Vec::new();
        let mut fence: Option<(String, String)> = None; // (tag, body)
        let mut heading: Option<(Tag, Vec<Event>, String)> = None;

        for event in Parser::new_ext(content, options) {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let info = match &kind {
                        CodeBlockKind::Fenced(info) => info.to_string(),
                        CodeBlockKind::Indented => String::new(),
                    };
                    fence = Some((tag_from_info(&info), String::new()));
                }

                Event::End(TagEnd::CodeBlock) => {
                    if let Some((tag, body)) = fence.take() {
                        let highlighter: Option<&dyn Highlighter> = Some(&self.highlighter);
                        events.push(Event::Html(CowStr::from(render_code(
                            highlighter,
                            &body,
                            &tag,
                        ))));
                    }
                }

                Event::Start(tag @ Tag::Heading { .. }) => {
                    heading = Some((tag, Vec::new(), String::new()));
                }

                Event::End(TagEnd::Heading(level)) => {
                    if let Some((start, inner, text)) = heading.take() {
                        let id = slugify(&text);
                        let start = match start {
                            Tag::Heading {
                                level, classes, attrs, ..
                            } => Tag::Heading {
                                level,
                                id: Some(CowStr::from(id)),
                                classes,
                                attrs,
                            },
                            other => other,
                        };
                        events.push(Event::Start(start));
                        events.extend(inner);
                        events.push(Event::End(TagEnd::Heading(level)));
                    }
                }

                Event::Text(text) => {
                    if let Some((_, ref mut body)) = fence {
                        body.push_str(&text);
                    } else if let Some((_, ref mut inner, ref mut title)) = heading {
                        title.push_str(&text);
                        inner.push(Event::Text(text));
                    } else {
                        events.push(Event::Text(text));
                    }
                }

                Event::Code(text) => {
                    if let Some((_, ref mut inner, ref mut title)) = heading {
                        title.push_str(&text);
                        inner.push(Event::Code(text));
                    } else {
                        events.push(Event::Code(text));
                    }
                }

                other => {
                    if let Some((_, ref mut inner, _)) = heading {
                        inner.push(other);
                    } else {
                        events.push(other);
                    }
                }
            }
        }

        let mut html = String::new();
        pulldown_cmark::html::push_html(&mut html, events.into_iter());
        html
    }

    fn write_assets(&self) -> Result<(), BuildError> {
        let assets_dir = self.config.output_dir.join("assets");
        fs::create_dir_all(&assets_dir).map_err(|e| BuildError::Write(e.to_string()))?;

        let css = AssetPipeline::generate_css();
        let css = if self.config.minify {
            AssetPipeline::minify_css(&css).unwrap_or(css)
        } else {
            css
        };
        fs::write(assets_dir.join("main.css"), css)
            .map_err(|e| BuildError::Write(e.to_string()))?;

        fs::write(assets_dir.join("site.js"), AssetPipeline::generate_js())
            .map_err(|e| BuildError::Write(e.to_string()))
    }

    fn write_search_index(&self, pages: &[PageInfo]) -> Result<(), BuildError> {
        let index: Vec<serde_json::Value> = pages
            .iter()
            .map(|page| {
                let fm = page.doc.frontmatter.as_ref();
                let excerpt = page
                    .doc
                    .content
                    .lines()
                    .filter(|l| !l.starts_with('#') && !l.starts_with("```"))
                    .take(10)
                    .collect::<Vec<_>>()
                    .join(" ");

                serde_json::json!({
                    "title": fm.map(|f| f.title.clone()).unwrap_or_default(),
                    "description": fm.and_then(|f| f.description.clone()).unwrap_or_default(),
                    "url": self.url_for(&page.output_path),
                    "content": excerpt,
                })
            })
            .collect();

        let json =
            serde_json::to_string_pretty(&index).map_err(|e| BuildError::Write(e.to_string()))?;

        fs::write(self.config.output_dir.join("search-index.json"), json)
            .map_err(|e| BuildError::Write(e.to_string()))
    }

    fn write_sitemap(&self, pages: &[PageInfo]) -> Result<(), BuildError> {
        let base = self.config.base_url.trim_end_matches('/');

        let mut urls = vec![format!(
            "  <url>\n    <loc>{}/</loc>\n  </url>",
            base
        )];
        urls.extend(pages.iter().map(|page| {
            format!(
                "  <url>\n    <loc>{}{}</loc>\n  </url>",
                base,
                self.url_for(&page.output_path)
            )
        }));

        let sitemap = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}
</urlset>"#,
            urls.join("\n")
        );

        fs::write(self.config.output_dir.join("sitemap.xml"), sitemap)
            .map_err(|e| BuildError::Write(e.to_string()))?;

        let robots = format!(
            "User-agent: *\nAllow: /\nSitemap: {}sitemap.xml",
            self.config.base_url
        );
        fs::write(self.config.output_dir.join("robots.txt"), robots)
            .map_err(|e| BuildError::Write(e.to_string()))
    }
}
