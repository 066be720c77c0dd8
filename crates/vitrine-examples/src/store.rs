//! Literal request snippets, keyed by language and operation.
//!
//! The snippets are documentation fixtures, never executed. They are compiled
//! in and immutable; the switcher and the landing-page builder read them
//! through [`source`] and [`entries_for`].

use crate::language::Language;
use crate::operation::Operation;

/// One snippet from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExampleEntry {
    pub language: Language,
    pub operation: Operation,
    pub source: &'static str,
}

/// Look up the snippet for a language/operation pair.
pub fn source(language: Language, operation: Operation) -> &'static str {
    match (language, operation) {
        (Language::Curl, Operation::Authentication) => CURL_AUTHENTICATION,
        (Language::Curl, Operation::Generation) => CURL_GENERATION,
        (Language::Curl, Operation::StatusCheck) => CURL_STATUS,
        (Language::Python, Operation::Authentication) => PYTHON_AUTHENTICATION,
        (Language::Python, Operation::Generation) => PYTHON_GENERATION,
        (Language::Python, Operation::StatusCheck) => PYTHON_STATUS,
        (Language::JavaScript, Operation::Authentication) => JS_AUTHENTICATION,
        (Language::JavaScript, Operation::Generation) => JS_GENERATION,
        (Language::JavaScript, Operation::StatusCheck) => JS_STATUS,
    }
}

/// All entries for one language, in panel order.
pub fn entries_for(language: Language) -> Vec<ExampleEntry> {
    Operation::ALL
        .into_iter()
        .map(|operation| ExampleEntry {
            language,
            operation,
            source: source(language, operation),
        })
        .collect()
}

const CURL_AUTHENTICATION: &str = r#"curl -X POST https://api.atrium.dev/v1/keys/generate \
  -H "Content-Type: application/json" \
  -d '{"email": "dev@example.com", "company_name": "Example Inc"}'"#;

const CURL_GENERATION: &str = r#"curl -X POST https://api.atrium.dev/v1/generate/website \
  -H "Authorization: Bearer $ATRIUM_API_KEY" \
  -H "Content-Type: application/json" \
  -d '{
    "description": "Portfolio site for a freelance photographer",
    "style": "modern",
    "pages": ["home", "about", "contact"]
  }'"#;

const CURL_STATUS: &str = r#"curl https://api.atrium.dev/v1/projects/proj_8f2kc1d9/status \
  -H "Authorization: Bearer $ATRIUM_API_KEY""#;

const PYTHON_AUTHENTICATION: &str = r#"import requests

resp = requests.post(
    "https://api.atrium.dev/v1/keys/generate",
    json={"email": "dev@example.com", "company_name": "Example Inc"},
)
resp.raise_for_status()
print(resp.json()["api_key"])"#;

const PYTHON_GENERATION: &str = r#"import os
import requests

resp = requests.post(
    "https://api.atrium.dev/v1/generate/website",
    headers={"Authorization": f"Bearer {os.environ['ATRIUM_API_KEY']}"},
    json={
        "description": "Portfolio site for a freelance photographer",
        "style": "modern",
        "pages": ["home", "about", "contact"],
    },
)
print(resp.json())"#;

const PYTHON_STATUS: &str = r#"import os
import requests

resp = requests.get(
    "https://api.atrium.dev/v1/projects/proj_8f2kc1d9/status",
    headers={"Authorization": f"Bearer {os.environ['ATRIUM_API_KEY']}"},
)
print(resp.json()["status"])"#;

const JS_AUTHENTICATION: &str = r#"const resp = await fetch("https://api.atrium.dev/v1/keys/generate", {
  method: "POST",
  headers: { "Content-Type": "application/json" },
  body: JSON.stringify({
    email: "dev@example.com",
    company_name: "Example Inc",
  }),
});
const { api_key } = await resp.json();"#;

const JS_GENERATION: &str = r#"const resp = await fetch("https://api.atrium.dev/v1/generate/website", {
  method: "POST",
  headers: {
    Authorization: `Bearer ${process.env.ATRIUM_API_KEY}`,
    "Content-Type": "application/json",
  },
  body: JSON.stringify({
    description: "Portfolio site for a freelance photographer",
    style: "modern",
    pages: ["home", "about", "contact"],
  }),
});
console.log(await resp.json());"#;

const JS_STATUS: &str = r#"const resp = await fetch(
  "https://api.atrium.dev/v1/projects/proj_8f2kc1d9/status",
  { headers: { Authorization: `Bearer ${process.env.ATRIUM_API_KEY}` } },
);
const { status } = await resp.json();"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_language_has_three_nonempty_snippets() {
        for language in Language::ALL {
            let entries = entries_for(language);
            assert_eq!(entries.len(), 3);
            for entry in entries {
                assert!(!entry.source.trim().is_empty());
                assert_eq!(entry.language, language);
            }
        }
    }

    #[test]
    fn snippets_target_the_documented_endpoints() {
        for language in Language::ALL {
            assert!(source(language, Operation::Authentication).contains("/keys/generate"));
            assert!(source(language, Operation::Generation).contains("/generate/website"));
            assert!(source(language, Operation::StatusCheck).contains("/status"));
        }
    }

    #[test]
    fn generation_snippets_carry_bearer_auth() {
        for language in Language::ALL {
            assert!(source(language, Operation::Generation).contains("Bearer"));
        }
    }
}
