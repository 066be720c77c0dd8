//! Asset pipeline: site stylesheet and browser glue script.
//!
//! The script is thin wiring only. Validation, the busy guard, and the
//! outbound demo-API calls are owned by the server controllers; the browser
//! mirrors just enough of them (field checks, disabled submit buttons) to
//! annotate forms without a round trip.

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Generate the site stylesheet.
    pub fn generate_css() -> String {
        SITE_CSS.to_string()
    }

    /// Generate the browser glue script.
    pub fn generate_js() -> String {
        SITE_JS.to_string()
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

const SITE_CSS: &str = r#"/* Atrium site theme */

:root {
  --bg: #0d1117;
  --surface: #161b22;
  --border: #2d333b;
  --text: #e6edf3;
  --text-dim: #8b949e;
  --accent: #5d5df7;
  --accent-hover: #7a7af9;
  --error: #f85149;
  --radius: 0.5rem;
  --content-max-width: 860px;
  --sidebar-width: 260px;
  --toc-width: 200px;
}

* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

body {
  font-family: system-ui, -apple-system, sans-serif;
  background: var(--bg);
  color: var(--text);
  line-height: 1.6;
}

a {
  color: var(--accent-hover);
}

.topbar {
  display: flex;
  align-items: center;
  justify-content: space-between;
  padding: 1rem 2rem;
  border-bottom: 1px solid var(--border);
}

.brand {
  font-weight: 700;
  font-size: 1.25rem;
  color: var(--text);
  text-decoration: none;
}

.topbar-links a {
  margin-left: 1.5rem;
  color: var(--text-dim);
  text-decoration: none;
}

.topbar-links a:hover {
  color: var(--text);
}

.landing {
  max-width: var(--content-max-width);
  margin: 0 auto;
  padding: 0 1.5rem 4rem;
}

.hero {
  text-align: center;
  padding: 5rem 0 3rem;
}

.hero h1 {
  font-size: 2.75rem;
  line-height: 1.15;
}

.tagline {
  color: var(--text-dim);
  font-size: 1.25rem;
  margin-top: 1rem;
}

.hero-actions {
  margin-top: 2rem;
  display: flex;
  gap: 1rem;
  justify-content: center;
}

.btn {
  display: inline-block;
  padding: 0.6rem 1.4rem;
  font-size: 1rem;
  color: var(--text);
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  cursor: pointer;
  text-decoration: none;
}

.btn.primary {
  background: var(--accent);
  border-color: var(--accent);
}

.btn.primary:hover {
  background: var(--accent-hover);
}

.btn:disabled {
  opacity: 0.6;
  cursor: wait;
}

/* Example switcher */
.examples {
  margin-top: 3rem;
}

.examples-header {
  display: flex;
  align-items: center;
  gap: 1rem;
  flex-wrap: wrap;
  margin-bottom: 1rem;
}

.lang-tabs {
  display: flex;
  gap: 0.25rem;
}

.lang-tab {
  padding: 0.35rem 0.9rem;
  background: none;
  color: var(--text-dim);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  cursor: pointer;
}

.lang-tab.active {
  background: var(--surface);
  color: var(--text);
  border-color: var(--accent);
}

.lang-indicator {
  margin-left: auto;
  color: var(--text-dim);
  font-size: 0.875rem;
}

.example-set {
  display: none;
}

.example-set.active {
  display: block;
}

.example-panel {
  margin-bottom: 1.5rem;
}

.example-panel h3 {
  font-size: 1rem;
  margin-bottom: 0.5rem;
}

.code-panel {
  position: relative;
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 1rem;
  overflow-x: auto;
  font-family: ui-monospace, monospace;
  font-size: 0.85rem;
}

.tok-kw { color: #ff7b72; }
.tok-str { color: #a5d6ff; }
.tok-com { color: #8b949e; font-style: italic; }
.tok-num { color: #79c0ff; }

.copy-btn {
  position: absolute;
  top: 0.5rem;
  right: 0.5rem;
  padding: 0.2rem 0.7rem;
  font-size: 0.75rem;
  background: var(--bg);
  color: var(--text-dim);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  cursor: pointer;
}

.copy-btn:hover {
  color: var(--text);
}

/* Playground */
.playground {
  margin-top: 4rem;
}

.playground form {
  display: flex;
  flex-direction: column;
  gap: 0.75rem;
  margin-top: 1rem;
}

.playground textarea,
.playground select,
.key-modal input {
  background: var(--surface);
  color: var(--text);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 0.5rem 0.75rem;
  font-size: 1rem;
}

.playground-options {
  display: flex;
  gap: 1rem;
  align-items: flex-start;
  flex-wrap: wrap;
}

.pg-pages {
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 0.5rem 1rem;
}

.pg-pages label {
  margin-right: 1rem;
}

.preview-pane {
  margin-top: 1.5rem;
  border: 1px solid var(--border);
  border-radius: var(--radius);
  background: var(--surface);
  min-height: 200px;
}

#preview-json {
  padding: 1rem;
  font-family: ui-monospace, monospace;
  font-size: 0.85rem;
  white-space: pre-wrap;
}

#preview-frame {
  width: 100%;
  height: 420px;
  border: 0;
  border-radius: var(--radius);
  background: #fff;
}

/* Key modal */
.key-modal {
  background: var(--surface);
  color: var(--text);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 2rem;
  max-width: 420px;
  width: 90%;
}

.key-modal::backdrop {
  background: rgba(0, 0, 0, 0.6);
}

.key-modal form,
.key-result {
  display: flex;
  flex-direction: column;
  gap: 0.5rem;
}

.field-error,
.form-error {
  color: var(--error);
  font-size: 0.85rem;
}

input.invalid {
  border-color: var(--error);
}

#key-value {
  display: block;
  background: var(--bg);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 0.75rem;
  font-family: ui-monospace, monospace;
  word-break: break-all;
}

.key-meta {
  color: var(--text-dim);
  font-size: 0.85rem;
}

.modal-actions {
  display: flex;
  gap: 0.5rem;
  justify-content: flex-end;
  margin-top: 1rem;
}

/* Docs layout */
.layout {
  display: grid;
  grid-template-columns: var(--sidebar-width) 1fr;
  min-height: 100vh;
}

.sidebar {
  border-right: 1px solid var(--border);
  padding: 1.5rem;
  position: sticky;
  top: 0;
  height: 100vh;
  overflow-y: auto;
}

.nav-logo {
  font-weight: 700;
  color: var(--text);
  text-decoration: none;
}

.nav-list {
  list-style: none;
  margin-top: 1.5rem;
}

.nav-item a {
  display: block;
  padding: 0.4rem 0.6rem;
  color: var(--text-dim);
  text-decoration: none;
  border-radius: var(--radius);
}

.nav-item a:hover {
  color: var(--text);
  background: var(--surface);
}

.nav-item.active > a {
  color: var(--text);
  background: var(--surface);
}

.main {
  display: grid;
  grid-template-columns: 1fr var(--toc-width);
  gap: 2rem;
  padding: 2rem;
  max-width: calc(var(--content-max-width) + var(--toc-width) + 4rem);
}

.doc {
  max-width: var(--content-max-width);
}

.content h1 {
  font-size: 2.25rem;
  margin-bottom: 1.5rem;
}

.content h2 {
  font-size: 1.5rem;
  margin: 2rem 0 1rem;
  padding-bottom: 0.5rem;
  border-bottom: 1px solid var(--border);
}

.content p {
  margin-bottom: 1rem;
}

.content code {
  font-family: ui-monospace, monospace;
  font-size: 0.875em;
  background: var(--surface);
  padding: 0.125rem 0.375rem;
  border-radius: 0.25rem;
}

.content pre code {
  background: none;
  padding: 0;
}

.toc {
  position: sticky;
  top: 2rem;
  align-self: start;
}

.toc h2 {
  font-size: 0.75rem;
  text-transform: uppercase;
  letter-spacing: 0.05em;
  color: var(--text-dim);
  margin-bottom: 0.75rem;
}

.toc ul {
  list-style: none;
}

.toc a {
  font-size: 0.875rem;
  color: var(--text-dim);
  text-decoration: none;
}

.toc a:hover {
  color: var(--text);
}

.toc-level-3 {
  padding-left: 1rem;
}

@media (max-width: 900px) {
  .layout,
  .main {
    grid-template-columns: 1fr;
  }

  .sidebar {
    position: static;
    height: auto;
    border-right: 0;
    border-bottom: 1px solid var(--border);
  }

  .toc {
    display: none;
  }
}
"#;

const SITE_JS: &str = r#"// Atrium site runtime
(function() {
  'use strict';

  var apiBase = (document.querySelector('[data-api-base]') || {}).dataset
    ? document.querySelector('[data-api-base]').dataset.apiBase
    : '/api';

  // --- Language switcher -------------------------------------------------
  var tabs = document.querySelectorAll('.lang-tab');
  var sets = document.querySelectorAll('.example-set');
  var indicator = document.getElementById('lang-indicator');

  tabs.forEach(function(tab) {
    tab.addEventListener('click', function() {
      tabs.forEach(function(t) { t.classList.toggle('active', t === tab); });
      sets.forEach(function(set) {
        set.classList.toggle('active', set.dataset.lang === tab.dataset.lang);
      });
      if (indicator) {
        indicator.textContent = tab.dataset.label || tab.textContent;
      }
    });
  });

  // --- Copy buttons on code panels ---------------------------------------
  document.querySelectorAll('.code-panel').forEach(function(pre) {
    if (pre.querySelector('.copy-btn')) return;

    var btn = document.createElement('button');
    btn.className = 'copy-btn';
    btn.type = 'button';
    btn.textContent = 'Copy';

    btn.addEventListener('click', function() {
      var code = pre.querySelector('code');
      var text = code ? code.textContent : pre.textContent;

      navigator.clipboard.writeText(text || '').then(function() {
        btn.textContent = 'Copied!';
        setTimeout(function() { btn.textContent = 'Copy'; }, 2000);
      }, function() {
        btn.textContent = 'Error';
        setTimeout(function() { btn.textContent = 'Copy'; }, 2000);
      });
    });

    pre.appendChild(btn);
  });

  // --- Busy-button helper ------------------------------------------------
  // One in-flight request per control: the trigger is disabled for the
  // duration, so duplicate submits are dropped, never queued.
  function whileBusy(button, work) {
    if (button.disabled) return Promise.resolve();
    var label = button.textContent;
    button.disabled = true;
    button.textContent = button.dataset.busyLabel || label;
    return work().finally(function() {
      button.disabled = false;
      button.textContent = label;
    });
  }

  // --- Playground --------------------------------------------------------
  var playground = document.getElementById('playground-form');
  if (playground) {
    var submit = document.getElementById('pg-submit');
    var pane = document.getElementById('preview-pane');
    var json = document.getElementById('preview-json');
    var frame = document.getElementById('preview-frame');

    var showJson = function(value) {
      pane.hidden = false;
      frame.hidden = true;
      json.hidden = false;
      json.textContent = JSON.stringify(value, null, 2);
    };

    playground.addEventListener('submit', function(event) {
      event.preventDefault();

      var pages = [];
      playground.querySelectorAll('input[name="pages"]:checked').forEach(function(box) {
        pages.push(box.value);
      });

      whileBusy(submit, function() {
        return fetch(apiBase + '/playground', {
          method: 'POST',
          headers: { 'Content-Type': 'application/json' },
          body: JSON.stringify({
            description: document.getElementById('pg-description').value,
            style: document.getElementById('pg-style').value,
            pages: pages,
          }),
        })
          .then(function(resp) { return resp.json(); })
          .then(function(body) {
            if (body && body.previewUrl) {
              pane.hidden = false;
              json.hidden = true;
              frame.hidden = false;
              frame.src = body.previewUrl;
            } else {
              showJson(body);
            }
          })
          .catch(function() {
            showJson({ error: true, message: 'Network error - please retry.' });
          });
      });
    });
  }

  // --- Key-request modal -------------------------------------------------
  var modal = document.getElementById('key-modal');
  if (modal) {
    var openBtn = document.getElementById('open-key-modal');
    var form = document.getElementById('key-form');
    var submitBtn = document.getElementById('key-submit');
    var formError = document.getElementById('key-form-error');
    var result = document.getElementById('key-result');

    var setFieldError = function(field, message) {
      var slot = modal.querySelector('.field-error[data-field="' + field + '"]');
      var input = form.elements[field];
      if (slot) {
        slot.hidden = !message;
        slot.textContent = message || '';
      }
      if (input) {
        input.classList.toggle('invalid', !!message);
      }
    };

    var clearErrors = function() {
      setFieldError('email', null);
      setFieldError('company_name', null);
      formError.hidden = true;
    };

    if (openBtn) {
      openBtn.addEventListener('click', function() { modal.showModal(); });
    }
    document.getElementById('key-cancel').addEventListener('click', function() {
      modal.close();
    });

    // Same rules the server enforces; checking here just avoids a round
    // trip before annotating the fields.
    var validate = function() {
      var ok = true;
      var email = form.elements.email.value.trim();
      var company = form.elements.company_name.value.trim();

      if (!/^[^\s@]+@[^\s@]+\.[^\s@]+$/.test(email)) {
        setFieldError('email', 'Enter a valid email address.');
        ok = false;
      }
      if (company.length < 3) {
        setFieldError('company_name', 'Company name must be at least 3 characters.');
        ok = false;
      }
      return ok;
    };

    form.addEventListener('submit', function(event) {
      event.preventDefault();
      clearErrors();
      if (!validate()) return;

      whileBusy(submitBtn, function() {
        return fetch(apiBase + '/keys', {
          method: 'POST',
          headers: { 'Content-Type': 'application/json' },
          body: JSON.stringify({
            email: form.elements.email.value.trim(),
            company_name: form.elements.company_name.value.trim(),
          }),
        })
          .then(function(resp) { return resp.json(); })
          .then(function(body) {
            if (body.fields) {
              body.fields.forEach(function(f) { setFieldError(f.field, f.message); });
              return;
            }
            if (body.error) {
              formError.hidden = false;
              formError.textContent = body.message || 'Key request failed.';
              return;
            }
            form.hidden = true;
            result.hidden = false;
            document.getElementById('key-value').textContent = body.api_key;
            document.getElementById('key-meta').textContent =
              'Expires in ' + (body.expires_in || '30 days') +
              ' - ' + (body.rate_limit || '');
          })
          .catch(function() {
            formError.hidden = false;
            formError.textContent = 'Network error - please retry.';
          });
      });
    });

    // The key is shown once; the copy affordance works once too.
    var copyBtn = document.getElementById('key-copy');
    copyBtn.addEventListener('click', function() {
      var value = document.getElementById('key-value').textContent;
      navigator.clipboard.writeText(value).then(function() {
        copyBtn.textContent = 'Copied';
        copyBtn.disabled = true;
      });
    }, { once: true });

    document.getElementById('key-done').addEventListener('click', function() {
      document.getElementById('key-value').textContent = '';
      modal.close();
    });
  }
})();
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_css() {
        let css = AssetPipeline::generate_css();
        assert!(css.contains(":root"));
        assert!(css.contains(".lang-tab"));
        assert!(css.contains(".code-panel"));
    }

    #[test]
    fn generates_js_glue() {
        let js = AssetPipeline::generate_js();
        assert!(js.contains("playground"));
        assert!(js.contains("clipboard"));
        assert!(js.contains("whileBusy"));
    }

    #[test]
    fn minifies_css() {
        let css = "
.example-panel {
    margin-bottom: 1.5rem;
    padding: 10px;
}
        ";

        let minified = AssetPipeline::minify_css(css).unwrap();

        assert!(!minified.contains('\n'));
        assert!(minified.contains(".example-panel"));
    }
}
