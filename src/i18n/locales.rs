//! Supported locale set: the locales every multilingual route expands into.
//!
//! The set is built once at startup from configuration and is read-only
//! afterwards. Order is preserved because it decides registration order and
//! therefore route-matching precedence in the router.

use crate::error::{Result, RouteError};
use tracing::debug;

/// Ordered set of locale codes plus the application's default locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedLocales {
    locales: Vec<String>,
    default: String,
}

impl SupportedLocales {
    /// Create a locale set.
    ///
    /// Blank codes are dropped and duplicates collapse onto their first
    /// occurrence. An empty set is representable so that registration can
    /// report it as a configuration error.
    pub fn new<I, S>(locales: I, default: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for code in locales {
            let code = code.into().trim().to_string();
            if !code.is_empty() && !unique.contains(&code) {
                unique.push(code);
            }
        }

        Self {
            locales: unique,
            default: default.into(),
        }
    }

    /// Fail fast when no locale is configured.
    pub fn ensure_configured(&self) -> Result<()> {
        if self.locales.is_empty() {
            return Err(RouteError::Configuration(
                "no supported locales configured".to_string(),
            ));
        }
        Ok(())
    }

    /// Check if a locale code is in the set.
    pub fn contains(&self, code: &str) -> bool {
        self.locales.iter().any(|locale| locale == code)
    }

    /// The application's default locale.
    pub fn default_locale(&self) -> &str {
        &self.default
    }

    pub fn is_default(&self, code: &str) -> bool {
        self.default == code
    }

    /// Locale codes in configured order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.locales.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.locales
    }

    pub fn len(&self) -> usize {
        self.locales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }

    /// Pick the locale to resolve against.
    ///
    /// An explicit locale wins over the active one. Anything outside the set
    /// is silently replaced with the default locale.
    pub fn pick<'a>(&'a self, requested: Option<&'a str>, active: Option<&'a str>) -> &'a str {
        match requested.or(active) {
            Some(code) if self.contains(code) => code,
            Some(code) => {
                debug!(
                    requested = code,
                    fallback = %self.default,
                    "Unsupported locale, using default"
                );
                self.default.as_str()
            }
            None => self.default.as_str(),
        }
    }
}
