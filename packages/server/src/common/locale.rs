//! Localized text tables.
//!
//! Every user-visible string lives in a flat JSON table per language
//! (`locales/<tag>.json`), bundled into the binary. Lookups fall back to the
//! default language, then to the key itself, so a missing translation never
//! breaks a conversation.

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

const BUNDLED: &[(&str, &str)] = &[
    ("ru", include_str!("../../locales/ru.json")),
    ("en", include_str!("../../locales/en.json")),
];

#[derive(Debug, Error)]
pub enum LocaleError {
    #[error("locale table '{tag}' is not valid JSON: {source}")]
    Parse {
        tag: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("default language '{0}' has no text table")]
    UnknownDefault(String),
}

/// Language → key → text.
#[derive(Debug, Clone)]
pub struct Texts {
    default_language: String,
    tables: BTreeMap<String, HashMap<String, String>>,
}

impl Texts {
    /// Load the tables shipped with the binary.
    pub fn bundled(default_language: &str) -> Result<Self, LocaleError> {
        let mut tables = BTreeMap::new();
        for (tag, raw) in BUNDLED {
            let table: HashMap<String, String> =
                serde_json::from_str(raw).map_err(|source| LocaleError::Parse {
                    tag: tag.to_string(),
                    source,
                })?;
            tables.insert(tag.to_string(), table);
        }
        Self::from_tables(default_language, tables)
    }

    pub fn from_tables(
        default_language: &str,
        tables: BTreeMap<String, HashMap<String, String>>,
    ) -> Result<Self, LocaleError> {
        if !tables.contains_key(default_language) {
            return Err(LocaleError::UnknownDefault(default_language.to_string()));
        }
        Ok(Self {
            default_language: default_language.to_string(),
            tables,
        })
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Supported language tags, sorted.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn supports(&self, language: &str) -> bool {
        self.tables.contains_key(language)
    }

    /// The language to talk in: the selected one if supported, else the default.
    pub fn resolve<'a>(&'a self, selected: Option<&'a str>) -> &'a str {
        match selected {
            Some(tag) if self.supports(tag) => tag,
            _ => &self.default_language,
        }
    }

    pub fn text(&self, language: &str, key: &str) -> String {
        self.tables
            .get(language)
            .and_then(|table| table.get(key))
            .or_else(|| {
                self.tables
                    .get(&self.default_language)
                    .and_then(|table| table.get(key))
            })
            .cloned()
            .unwrap_or_else(|| {
                tracing::warn!(language, key, "Missing text key");
                key.to_string()
            })
    }

    /// Look up `key` and substitute `{name}` placeholders in one pass, so a
    /// value containing `{other}` is inserted verbatim. Unknown placeholders
    /// are left as they are.
    pub fn render(&self, language: &str, key: &str, args: &[(&str, &str)]) -> String {
        let template = self.text(language, key);
        let mut out = String::with_capacity(template.len());
        let mut rest = template.as_str();

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let tail = &rest[open..];
            let value = tail.find('}').and_then(|close| {
                let name = &tail[1..close];
                args.iter()
                    .find(|(arg, _)| *arg == name)
                    .map(|(_, value)| (*value, close))
            });
            match value {
                Some((value, close)) => {
                    out.push_str(value);
                    rest = &tail[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = &tail[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }
}
