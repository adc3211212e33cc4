//! Multilingual routes: define a route once, get one concrete route per locale.
//!
//! Routes are described with [`routing::multilingual`], expanded by a
//! [`routing::Registrar`] at startup and resolved afterwards through
//! [`routing::LocalizedUrls`]. Installing the resolver makes the global
//! helpers [`localized_route`], [`current_route`] and [`supported_locales`]
//! available.

pub mod app;
pub mod config;
pub mod error;
pub mod i18n;
pub mod middleware;
pub mod routing;

use crate::error::{Result, RouteError};
use crate::i18n::SupportedLocales;
use crate::routing::{LocalizedUrls, Params, RequestContext, RouteTable};
use std::sync::OnceLock;

static LOCALIZED_URLS: OnceLock<LocalizedUrls<RouteTable>> = OnceLock::new();

/// Install the process-wide resolver. Only the first call succeeds.
pub fn install(urls: LocalizedUrls<RouteTable>) -> Result<()> {
    LOCALIZED_URLS
        .set(urls)
        .map_err(|_| RouteError::Configuration("localized routes are already installed".to_string()))
}

/// The installed resolver.
pub fn installed() -> Result<&'static LocalizedUrls<RouteTable>> {
    LOCALIZED_URLS
        .get()
        .ok_or_else(|| RouteError::Configuration("localized routes are not installed".to_string()))
}

/// URL of `key_or_name` in `locale`.
///
/// Without a locale, the active request locale is used, then the default.
pub fn localized_route(key_or_name: &str, params: &Params, locale: Option<&str>) -> Result<String> {
    let urls = installed()?;
    let active = middleware::current_locale();
    let context = RequestContext {
        locale: active,
        ..RequestContext::default()
    };
    urls.resolve_in(&context, key_or_name, params, locale)
}

/// URL of the current request's route in `locale`.
pub fn current_route(context: &RequestContext, locale: &str) -> Result<String> {
    installed()?.current_route_in(context, locale)
}

/// The installed supported locale set.
pub fn supported_locales() -> Result<&'static SupportedLocales> {
    Ok(installed()?.locales())
}
