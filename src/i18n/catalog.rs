//! Translation catalog used to localize route URIs.
//!
//! Route URIs are looked up under `routes.<key>`. Catalogs are loaded from a
//! directory holding either `<locale>.json` files or `<locale>/<group>.json`
//! files; nested objects flatten into dotted keys.

use crate::error::{Result, RouteError};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Key/locale string lookup backed by some translation source.
pub trait Translator: Send + Sync {
    fn lookup(&self, key: &str, locale: &str) -> Option<String>;
}

/// In-memory translation catalog keyed by locale, then by dotted key.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<String, HashMap<String, String>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, locale: &str, key: &str, value: &str) {
        self.entries
            .entry(locale.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    /// Chainable variant of `insert`.
    pub fn with(mut self, locale: &str, key: &str, value: &str) -> Self {
        self.insert(locale, key, value);
        self
    }

    /// Merge a JSON document into the catalog for `locale`.
    ///
    /// Keys are prefixed with `group` when given (e.g. `routes`).
    pub fn load_json(
        &mut self,
        locale: &str,
        group: Option<&str>,
        json: &str,
    ) -> serde_json::Result<usize> {
        let value: Value = serde_json::from_str(json)?;
        let bucket = self.entries.entry(locale.to_string()).or_default();
        let before = bucket.len();
        flatten(group.unwrap_or_default(), &value, bucket);
        Ok(bucket.len() - before)
    }

    /// Load every catalog file found under `dir`.
    ///
    /// `dir/fr.json` contributes top-level keys for `fr`;
    /// `dir/fr/routes.json` contributes `routes.*` keys for `fr`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut catalog = Self::new();

        for path in sorted_entries(dir)? {
            if path.is_dir() {
                let Some(locale) = file_stem(&path) else {
                    continue;
                };
                for file in sorted_entries(&path)? {
                    if is_json(&file) {
                        if let Some(group) = file_stem(&file) {
                            catalog.load_file(&locale, Some(&group), &file)?;
                        }
                    }
                }
            } else if is_json(&path) {
                if let Some(locale) = file_stem(&path) {
                    catalog.load_file(&locale, None, &path)?;
                }
            }
        }

        info!(
            "Loaded translation catalog for {} locales from {}",
            catalog.entries.len(),
            dir.display()
        );
        Ok(catalog)
    }

    fn load_file(&mut self, locale: &str, group: Option<&str>, path: &Path) -> Result<()> {
        let raw = fs::read_to_string(path).map_err(|e| catalog_error(path, e))?;
        let count = self
            .load_json(locale, group, &raw)
            .map_err(|e| catalog_error(path, e))?;
        debug!(locale, file = %path.display(), count, "Loaded catalog file");
        Ok(())
    }

    /// Locales with at least one entry.
    pub fn locales(&self) -> Vec<&str> {
        let mut locales: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        locales.sort_unstable();
        locales
    }
}

impl Translator for Catalog {
    fn lookup(&self, key: &str, locale: &str) -> Option<String> {
        self.entries.get(locale)?.get(key).cloned()
    }
}

/// Translated URI text for a route key, if the catalog has one.
pub fn route_translation(translator: &dyn Translator, key: &str, locale: &str) -> Option<String> {
    translator.lookup(&format!("routes.{}", key), locale)
}

fn flatten(prefix: &str, value: &Value, out: &mut HashMap<String, String>) {
    let join = |key: &str| {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", prefix, key)
        }
    };

    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                flatten(&join(key), nested, out);
            }
        }
        Value::String(text) if !prefix.is_empty() => {
            out.insert(prefix.to_string(), text.clone());
        }
        Value::Number(n) if !prefix.is_empty() => {
            out.insert(prefix.to_string(), n.to_string());
        }
        Value::Bool(b) if !prefix.is_empty() => {
            out.insert(prefix.to_string(), b.to_string());
        }
        _ => {}
    }
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = fs::read_dir(dir)
        .map_err(|e| catalog_error(dir, e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect::<Vec<_>>();
    paths.sort();
    Ok(paths)
}

fn is_json(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == "json")
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}

fn catalog_error(path: &Path, err: impl std::fmt::Display) -> RouteError {
    RouteError::Catalog {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
