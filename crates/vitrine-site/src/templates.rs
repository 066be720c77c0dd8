//! Template engine for the landing page and documentation pages.

use minijinja::{context, Environment};

use vitrine_examples::ExamplePanel;

/// A navigation item in the docs sidebar.
#[derive(Debug, Clone, serde::Serialize)]
pub struct NavItem {
    /// Display title.
    pub title: String,
    /// URL path.
    pub path: String,
    /// Whether this is the active page.
    pub active: bool,
}

/// One language tab on the landing page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LanguageTab {
    pub key: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// The pre-rendered panel set for one language.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ExampleSet {
    pub key: &'static str,
    pub active: bool,
    pub panels: Vec<ExamplePanel>,
}

/// Context for rendering the landing page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LandingContext {
    pub site_title: String,
    pub base_url: String,
    /// Current-language indicator text for the default selection.
    pub indicator: &'static str,
    pub tabs: Vec<LanguageTab>,
    pub example_sets: Vec<ExampleSet>,
    /// Choices for the playground style selector.
    pub style_options: Vec<&'static str>,
    /// Optional pages offered as checkboxes; `home` is fixed and not listed.
    pub page_options: Vec<&'static str>,
    /// Include the dev-mode reload script tag.
    pub reload: bool,
}

/// Context for rendering a documentation page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DocContext {
    pub title: String,
    pub site_title: String,
    pub content: String,
    pub nav: Vec<NavItem>,
    pub toc: Vec<vitrine_content::TocEntry>,
    pub base_url: String,
    /// Include the dev-mode reload script tag.
    pub reload: bool,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new engine with the compiled-in templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template_owned("base.html".to_string(), BASE_TEMPLATE.to_string())
            .expect("Failed to add base template");
        env.add_template_owned("landing.html".to_string(), LANDING_TEMPLATE.to_string())
            .expect("Failed to add landing template");
        env.add_template_owned("doc.html".to_string(), DOC_TEMPLATE.to_string())
            .expect("Failed to add doc template");
        env.add_template_owned("nav.html".to_string(), NAV_TEMPLATE.to_string())
            .expect("Failed to add nav template");

        Self { env }
    }

    /// Render the landing page.
    pub fn render_landing(&self, ctx: &LandingContext) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("landing.html")?;
        tmpl.render(context! {
            title => "Home",
            site_title => &ctx.site_title,
            base_url => &ctx.base_url,
            indicator => ctx.indicator,
            tabs => &ctx.tabs,
            example_sets => &ctx.example_sets,
            style_options => &ctx.style_options,
            page_options => &ctx.page_options,
            reload => ctx.reload,
            nav => Vec::<NavItem>::new(),
        })
    }

    /// Render a documentation page.
    pub fn render_doc(&self, ctx: &DocContext) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("doc.html")?;
        tmpl.render(context! {
            title => &ctx.title,
            site_title => &ctx.site_title,
            content => &ctx.content,
            nav => &ctx.nav,
            toc => &ctx.toc,
            base_url => &ctx.base_url,
            reload => ctx.reload,
        })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }} - {{ site_title }}</title>
  <link rel="stylesheet" href="{{ base_url }}assets/main.css">
</head>
<body>
  {% block body %}{% endblock %}
  <script src="{{ base_url }}assets/site.js" defer></script>
  {% if reload %}<script src="{{ base_url }}__reload.js" defer></script>
  {% endif %}</body>
</html>"##;

const LANDING_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block body %}
<header class="topbar">
  <a href="{{ base_url }}" class="brand">{{ site_title }}</a>
  <nav class="topbar-links">
    <a href="#examples">Examples</a>
    <a href="#playground">Playground</a>
    <a href="{{ base_url }}docs/">Docs</a>
  </nav>
</header>

<main class="landing" data-api-base="{{ base_url }}api">
  <section class="hero">
    <h1>Describe your website. We build it.</h1>
    <p class="tagline">One API call turns a plain-language brief into a deployed site.</p>
    <div class="hero-actions">
      <button type="button" class="btn primary" id="open-key-modal">Get an API key</button>
      <a class="btn" href="{{ base_url }}docs/">Read the docs</a>
    </div>
  </section>

  <section class="examples" id="examples">
    <div class="examples-header">
      <h2>Three calls, start to finish</h2>
      <div class="lang-tabs" role="tablist">
        {% for tab in tabs %}
        <button type="button" role="tab" class="lang-tab{% if tab.active %} active{% endif %}"
                data-lang="{{ tab.key }}" data-label="{{ tab.label }}">{{ tab.label }}</button>
        {% endfor %}
      </div>
      <span class="lang-indicator" id="lang-indicator">{{ indicator }}</span>
    </div>
    {% for set in example_sets %}
    <div class="example-set{% if set.active %} active{% endif %}" data-lang="{{ set.key }}">
      {% for panel in set.panels %}
      <article class="example-panel" data-operation="{{ panel.operation }}">
        <h3>{{ panel.title }}</h3>
        {{ panel.html | safe }}
      </article>
      {% endfor %}
    </div>
    {% endfor %}
  </section>

  <section class="playground" id="playground">
    <h2>Try it against the demo endpoint</h2>
    <form id="playground-form">
      <label for="pg-description">Describe your website</label>
      <textarea id="pg-description" name="description" rows="3"
                placeholder="A landing page for a neighborhood bakery with an order form"></textarea>

      <div class="playground-options">
        <label for="pg-style">Style</label>
        <select id="pg-style" name="style">
          {% for style in style_options %}
          <option value="{{ style }}">{{ style }}</option>
          {% endfor %}
        </select>

        <fieldset class="pg-pages">
          <legend>Pages <small>(home is always included)</small></legend>
          {% for page in page_options %}
          <label><input type="checkbox" name="pages" value="{{ page }}"> {{ page }}</label>
          {% endfor %}
        </fieldset>
      </div>

      <button type="submit" class="btn primary" id="pg-submit"
              data-busy-label="Generating...">Generate preview</button>
    </form>

    <div class="preview-pane" id="preview-pane" hidden>
      <pre id="preview-json" hidden></pre>
      <iframe id="preview-frame" title="Generated preview" hidden></iframe>
    </div>
  </section>
</main>

<dialog class="key-modal" id="key-modal">
  <form id="key-form" novalidate>
    <h2>Request a demo API key</h2>

    <label for="key-email">Work email</label>
    <input type="email" id="key-email" name="email" autocomplete="email">
    <p class="field-error" data-field="email" hidden></p>

    <label for="key-company">Company name</label>
    <input type="text" id="key-company" name="company_name" autocomplete="organization">
    <p class="field-error" data-field="company_name" hidden></p>

    <p class="form-error" id="key-form-error" hidden></p>

    <div class="modal-actions">
      <button type="button" class="btn" id="key-cancel">Cancel</button>
      <button type="submit" class="btn primary" id="key-submit"
              data-busy-label="Requesting...">Request key</button>
    </div>
  </form>

  <div class="key-result" id="key-result" hidden>
    <h2>Your API key</h2>
    <p>This key is shown once. Copy it now.</p>
    <code id="key-value"></code>
    <p class="key-meta" id="key-meta"></p>
    <div class="modal-actions">
      <button type="button" class="btn primary" id="key-copy">Copy key</button>
      <button type="button" class="btn" id="key-done">Done</button>
    </div>
  </div>
</dialog>
{% endblock %}"##;

const DOC_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block body %}
<div class="layout">
  <nav class="sidebar">
    {% include "nav.html" %}
  </nav>
  <main class="main">
    <article class="doc">
      <div class="content">
        {{ content | safe }}
      </div>
    </article>

    {% if toc %}
    <aside class="toc">
      <h2>On this page</h2>
      <ul>
      {% for entry in toc %}
        <li class="toc-level-{{ entry.level }}">
          <a href="#{{ entry.id }}">{{ entry.title }}</a>
        </li>
      {% endfor %}
      </ul>
    </aside>
    {% endif %}
  </main>
</div>
{% endblock %}"##;

const NAV_TEMPLATE: &str = r##"<div class="nav-header">
  <a href="{{ base_url }}" class="nav-logo">{{ site_title }}</a>
</div>
<ul class="nav-list">
{% for item in nav %}
  <li class="nav-item{% if item.active %} active{% endif %}">
    <a href="{{ item.path }}">{{ item.title }}</a>
  </li>
{% endfor %}
</ul>"##;
