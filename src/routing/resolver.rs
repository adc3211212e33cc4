//! Locale-aware URL resolution.
//!
//! `LocalizedUrls` recomputes concrete route names with the same rules used
//! at registration and asks the router for the URL. It also switches the
//! route matched by the current request to its equivalent in another locale.

use crate::error::{Result, RouteError, UrlGenerationError};
use crate::i18n::SupportedLocales;
use crate::routing::pattern::Params;
use crate::routing::rules::{self, Flags};
use crate::routing::table::{MatchedRoute, RouteTable, Router};
use std::sync::Arc;

/// Per-request state the resolver reads.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Active locale detected for the request.
    pub locale: Option<String>,
    /// Route the request was dispatched to.
    pub matched: Option<MatchedRoute>,
    /// Query string parameters.
    pub query: Params,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locale(mut self, locale: &str) -> Self {
        self.locale = Some(locale.to_string());
        self
    }

    pub fn with_match(mut self, matched: MatchedRoute) -> Self {
        self.matched = Some(matched);
        self
    }

    pub fn with_query(mut self, query: Params) -> Self {
        self.query = query;
        self
    }
}

/// Resolver over a frozen route table.
pub struct LocalizedUrls<R: Router = RouteTable> {
    router: Arc<R>,
    locales: Arc<SupportedLocales>,
    flags: Flags,
}

impl<R: Router> Clone for LocalizedUrls<R> {
    fn clone(&self) -> Self {
        Self {
            router: Arc::clone(&self.router),
            locales: Arc::clone(&self.locales),
            flags: self.flags,
        }
    }
}

impl<R: Router> LocalizedUrls<R> {
    pub fn new(router: Arc<R>, locales: Arc<SupportedLocales>, flags: Flags) -> Self {
        Self {
            router,
            locales,
            flags,
        }
    }

    pub fn router(&self) -> &R {
        &self.router
    }

    pub fn locales(&self) -> &SupportedLocales {
        &self.locales
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Absolute URL of `key_or_name` in `locale`, or the default locale.
    pub fn resolve(&self, key_or_name: &str, params: &Params, locale: Option<&str>) -> Result<String> {
        self.generate(key_or_name, params, locale, None, true)
    }

    /// Like `resolve`, returning the path only.
    pub fn resolve_path(
        &self,
        key_or_name: &str,
        params: &Params,
        locale: Option<&str>,
    ) -> Result<String> {
        self.generate(key_or_name, params, locale, None, false)
    }

    /// Like `resolve`, defaulting to the request's active locale.
    pub fn resolve_in(
        &self,
        context: &RequestContext,
        key_or_name: &str,
        params: &Params,
        locale: Option<&str>,
    ) -> Result<String> {
        self.generate(key_or_name, params, locale, context.locale.as_deref(), true)
    }

    /// Concrete route name for `key_or_name` in a supported `locale`.
    pub fn concrete_name(&self, key_or_name: &str, locale: &str) -> String {
        let candidates = rules::candidate_names(key_or_name, locale, self.flags);
        candidates
            .iter()
            .find(|name| self.router.has_route(name))
            .or_else(|| candidates.first())
            .cloned()
            .unwrap_or_else(|| key_or_name.to_string())
    }

    /// URL of the current request's route in another locale.
    ///
    /// Route parameters take precedence over query parameters of the same
    /// name. A per-locale name override shadows the base name, so switching
    /// from or to an overridden locale is an `UnresolvedRoute`.
    pub fn current_route_in(&self, context: &RequestContext, locale: &str) -> Result<String> {
        let matched = context.matched.as_ref().ok_or(RouteError::NoCurrentRoute)?;
        let route = &matched.route;

        let base = rules::strip_locale(&route.name, &route.locale, self.flags)
            .unwrap_or_else(|| route.name.clone());

        let mut params = context.query.clone();
        params.extend(matched.params.clone());

        self.generate(&base, &params, Some(locale), Some(&route.locale), true)
    }

    /// Whether the current route's base name matches one of `patterns`.
    ///
    /// A trailing `*` matches any suffix.
    pub fn is_localized(&self, context: &RequestContext, patterns: &[&str]) -> bool {
        let Some(matched) = &context.matched else {
            return false;
        };
        let route = &matched.route;
        let base = rules::strip_locale(&route.name, &route.locale, self.flags)
            .unwrap_or_else(|| route.name.clone());

        patterns.iter().any(|pattern| match pattern.strip_suffix('*') {
            Some(prefix) => base.starts_with(prefix),
            None => base == *pattern,
        })
    }

    fn generate(
        &self,
        key_or_name: &str,
        params: &Params,
        locale: Option<&str>,
        active: Option<&str>,
        absolute: bool,
    ) -> Result<String> {
        let locale = self.locales.pick(locale, active);
        let name = self.concrete_name(key_or_name, locale);
        self.url_for_name(&name, params, locale, absolute)
    }

    fn url_for_name(&self, name: &str, params: &Params, locale: &str, absolute: bool) -> Result<String> {
        self.router
            .generate_url(name, params, absolute)
            .map_err(|e| match e {
                UrlGenerationError::NotFound(name) => RouteError::UnresolvedRoute {
                    name,
                    locale: locale.to_string(),
                },
                UrlGenerationError::MissingParameter { route, parameter } => {
                    RouteError::MissingParameter { route, parameter }
                }
            })
    }
}
