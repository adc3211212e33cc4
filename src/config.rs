use crate::i18n::SupportedLocales;
use crate::routing::Flags;
use anyhow::{bail, Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Locales
    pub supported_locales: Vec<String>,
    pub default_locale: Option<String>,
    pub app_locale: String,

    // Prefixing behaviour
    pub prefix_default_locale: bool,
    pub prefix_default_home: bool,
    pub name_prefix_before_locale: bool,

    // URLs and catalogs
    pub app_url: String,
    pub lang_path: String,

    // Server
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            supported_locales: vec!["en".to_string()],
            default_locale: None,
            app_locale: "en".to_string(),
            prefix_default_locale: false,
            prefix_default_home: true,
            name_prefix_before_locale: false,
            app_url: "http://localhost".to_string(),
            lang_path: "lang".to_string(),
            port: 8080,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let supported_locales: Vec<String> = var("SUPPORTED_LOCALES")
            .context("SUPPORTED_LOCALES not set")?
            .split(',')
            .map(|code| code.trim().to_string())
            .filter(|code| !code.is_empty())
            .collect();

        if supported_locales.is_empty() {
            bail!("SUPPORTED_LOCALES must list at least one locale");
        }

        let default_locale = var("DEFAULT_LOCALE")
            .map(|code| code.trim().to_string())
            .filter(|code| !code.is_empty());

        if let Some(code) = &default_locale {
            if !supported_locales.contains(code) {
                bail!("DEFAULT_LOCALE '{}' is not in SUPPORTED_LOCALES", code);
            }
        }

        let app_locale = var("APP_LOCALE")
            .map(|code| code.trim().to_string())
            .filter(|code| !code.is_empty());

        if let Some(code) = &app_locale {
            if !supported_locales.contains(code) {
                bail!("APP_LOCALE '{}' is not in SUPPORTED_LOCALES", code);
            }
        }

        Ok(Self {
            app_locale: app_locale.unwrap_or_else(|| "en".to_string()),
            default_locale,
            supported_locales,

            prefix_default_locale: parse_flag(&var, "PREFIX_DEFAULT_LOCALE", false)?,
            prefix_default_home: parse_flag(&var, "PREFIX_DEFAULT_HOME", true)?,
            name_prefix_before_locale: parse_flag(&var, "NAME_PREFIX_BEFORE_LOCALE", false)?,

            app_url: var("APP_URL").unwrap_or_else(|| "http://localhost".to_string()),
            lang_path: var("LANG_PATH").unwrap_or_else(|| "lang".to_string()),

            port: match var("PORT") {
                Some(port) => port
                    .trim()
                    .parse()
                    .with_context(|| format!("PORT '{}' is not a valid port", port))?,
                None => 8080,
            },
        })
    }

    /// The supported locale set described by this configuration.
    ///
    /// The default locale is `DEFAULT_LOCALE`, else the application locale.
    /// An unset `APP_LOCALE` that is not supported yields the first locale.
    pub fn locales(&self) -> SupportedLocales {
        let default = self
            .default_locale
            .clone()
            .or_else(|| {
                self.supported_locales
                    .contains(&self.app_locale)
                    .then(|| self.app_locale.clone())
            })
            .or_else(|| self.supported_locales.first().cloned())
            .unwrap_or_else(|| self.app_locale.clone());
        SupportedLocales::new(self.supported_locales.iter().cloned(), default)
    }

    /// Flags consumed by the name and URI resolution rules.
    pub fn flags(&self) -> Flags {
        Flags {
            prefix_default_locale: self.prefix_default_locale,
            prefix_default_home: self.prefix_default_home,
            name_prefix_before_locale: self.name_prefix_before_locale,
        }
    }
}

fn parse_flag<F>(var: &F, name: &str, default: bool) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = var(name) else {
        return Ok(default);
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => bail!("{} must be a boolean, got '{}'", name, raw),
    }
}
