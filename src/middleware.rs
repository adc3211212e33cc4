//! Request locale detection.
//!
//! The first path segment decides the active locale when it names a
//! supported locale; anything else leaves the default locale active. A
//! mismatch never rejects the request.

use crate::i18n::SupportedLocales;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

tokio::task_local! {
    static REQUEST_LOCALE: String;
}

/// Locale active for the request, stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveLocale(pub String);

/// Supported locale named by the first segment of `path`, if any.
pub fn detect_locale<'a>(path: &str, locales: &'a SupportedLocales) -> Option<&'a str> {
    let first = path.trim_start_matches('/').split('/').next()?;
    locales.iter().find(|code| *code == first)
}

/// Axum middleware setting the active locale for the rest of the request.
pub async fn detect_request_locale(
    State(locales): State<Arc<SupportedLocales>>,
    mut req: Request,
    next: Next,
) -> Response {
    let locale = detect_locale(req.uri().path(), &locales)
        .unwrap_or(locales.default_locale())
        .to_string();

    debug!(path = %req.uri().path(), locale = %locale, "Detected request locale");

    req.extensions_mut().insert(ActiveLocale(locale.clone()));
    with_locale(locale, next.run(req)).await
}

/// Run `fut` with `locale` as the active locale.
pub async fn with_locale<F: Future>(locale: String, fut: F) -> F::Output {
    REQUEST_LOCALE.scope(locale, fut).await
}

/// Active locale of the current task, if one was set.
pub fn current_locale() -> Option<String> {
    REQUEST_LOCALE.try_with(Clone::clone).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locales() -> SupportedLocales {
        SupportedLocales::new(["en", "fr"], "en")
    }

    #[test]
    fn test_detect_locale_first_segment() {
        assert_eq!(detect_locale("/fr/recherche", &locales()), Some("fr"));
        assert_eq!(detect_locale("/fr", &locales()), Some("fr"));
        assert_eq!(detect_locale("fr/", &locales()), Some("fr"));
    }

    #[test]
    fn test_detect_locale_no_match() {
        assert_eq!(detect_locale("/", &locales()), None);
        assert_eq!(detect_locale("/search/fr", &locales()), None);
        assert_eq!(detect_locale("/french", &locales()), None);
        assert_eq!(detect_locale("/de/suche", &locales()), None);
    }

    #[tokio::test]
    async fn test_with_locale_scopes_value() {
        assert_eq!(current_locale(), None);
        let inside = with_locale("fr".to_string(), async { current_locale() }).await;
        assert_eq!(inside.as_deref(), Some("fr"));
        assert_eq!(current_locale(), None);
    }
}
