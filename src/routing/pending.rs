//! Pending multilingual registrations and the registrar that expands them.
//!
//! A `PendingRegistration` describes one logical route. Modifiers consume and
//! return the builder, so the value handed to `register` is the complete
//! description; expansion is a pure function of it plus the registrar's
//! locales, catalog and flags.

use crate::error::{Result, RouteError};
use crate::i18n::{SupportedLocales, Translator};
use crate::routing::pattern::Params;
use crate::routing::resolver::LocalizedUrls;
use crate::routing::rules::{self, Flags};
use crate::routing::table::{
    compile_constraint, Action, GroupAttributes, Method, RouteHandle, Router,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Start describing a multilingual route.
pub fn multilingual(key: &str) -> PendingRegistration {
    PendingRegistration::new(key)
}

/// One multilingual route, not yet expanded into concrete routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRegistration {
    pub(crate) key: String,
    pub(crate) action: Action,
    pub(crate) method: Method,
    pub(crate) group_name: Option<String>,
    pub(crate) name_overrides: BTreeMap<String, String>,
    pub(crate) include_locales: Option<Vec<String>>,
    pub(crate) exclude_locales: Option<Vec<String>>,
    pub(crate) defaults: Params,
    pub(crate) constraints: BTreeMap<String, String>,
}

impl PendingRegistration {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            action: Action::None,
            method: Method::Get,
            group_name: None,
            name_overrides: BTreeMap::new(),
            include_locales: None,
            exclude_locales: None,
            defaults: Params::new(),
            constraints: BTreeMap::new(),
        }
    }

    pub fn with_action(key: &str, action: Action) -> Self {
        Self::new(key).action(action)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    /// Dispatch to the named handler.
    pub fn handler(self, handler: &str) -> Self {
        self.action(Action::Handler(handler.to_string()))
    }

    /// Render the named view.
    pub fn view(self, view: &str) -> Self {
        self.view_with(view, std::iter::empty::<(String, String)>())
    }

    pub fn view_with<I, K, V>(self, view: &str, data: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.action(Action::View {
            name: view.to_string(),
            data: data
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        })
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn post(self) -> Self {
        self.method(Method::Post)
    }

    pub fn put(self) -> Self {
        self.method(Method::Put)
    }

    pub fn patch(self) -> Self {
        self.method(Method::Patch)
    }

    pub fn delete(self) -> Self {
        self.method(Method::Delete)
    }

    /// Base name for every locale, replacing the key.
    pub fn name(mut self, name: &str) -> Self {
        self.group_name = Some(name.to_string());
        self
    }

    /// Per-locale names. Merged into earlier overrides.
    pub fn names<I, L, N>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = (L, N)>,
        L: Into<String>,
        N: Into<String>,
    {
        self.name_overrides
            .extend(names.into_iter().map(|(l, n)| (l.into(), n.into())));
        self
    }

    /// Only expand into these locales.
    pub fn only<I, S>(mut self, locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_locales = Some(locales.into_iter().map(Into::into).collect());
        self
    }

    /// Expand into every locale except these.
    pub fn except<I, S>(mut self, locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_locales = Some(locales.into_iter().map(Into::into).collect());
        self
    }

    pub fn defaults<I, K, V>(mut self, defaults: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.defaults
            .extend(defaults.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn default_value(self, param: &str, value: &str) -> Self {
        self.defaults([(param, value)])
    }

    /// Constrain a parameter to a regular expression.
    pub fn where_(self, param: &str, pattern: &str) -> Self {
        self.wheres([(param, pattern)])
    }

    pub fn wheres<I, K, V>(mut self, constraints: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.constraints
            .extend(constraints.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Expand into concrete routes through `registrar`.
    pub fn register<R: Router>(self, registrar: &mut Registrar<R>) -> Result<Vec<RouteHandle>> {
        registrar.register(self)
    }

    fn validate(&self) -> Result<()> {
        if self.key.trim().is_empty() {
            return Err(RouteError::Configuration(
                "multilingual route key must not be empty".to_string(),
            ));
        }

        for (param, pattern) in &self.constraints {
            compile_constraint(param, pattern, &self.key)?;
        }

        Ok(())
    }
}

/// Expands pending registrations into a router during startup.
pub struct Registrar<R: Router> {
    router: R,
    locales: Arc<SupportedLocales>,
    translator: Arc<dyn Translator>,
    flags: Flags,
}

impl<R: Router> Registrar<R> {
    pub fn new(
        router: R,
        locales: SupportedLocales,
        translator: Arc<dyn Translator>,
        flags: Flags,
    ) -> Self {
        Self {
            router,
            locales: Arc::new(locales),
            translator,
            flags,
        }
    }

    pub fn router(&self) -> &R {
        &self.router
    }

    pub fn locales(&self) -> &SupportedLocales {
        &self.locales
    }

    /// Register one concrete route per eligible locale, in locale order.
    pub fn register(&mut self, registration: PendingRegistration) -> Result<Vec<RouteHandle>> {
        self.locales.ensure_configured()?;
        registration.validate()?;

        let context = self.router.registration_context();
        let definitions = rules::expand(
            &registration,
            &self.locales,
            self.translator.as_ref(),
            self.flags,
            &context,
        );

        let routes = definitions
            .into_iter()
            .map(|definition| self.router.register_route(definition))
            .collect::<Result<Vec<_>>>()?;

        info!(
            key = %registration.key,
            method = %registration.method,
            routes = routes.len(),
            "Registered multilingual route"
        );
        Ok(routes)
    }

    /// Run `f` inside a route group.
    pub fn group<T>(&mut self, attributes: GroupAttributes, f: impl FnOnce(&mut Self) -> T) -> T {
        self.router.push_group(attributes);
        let result = f(self);
        self.router.pop_group();
        result
    }

    /// Freeze the route table and hand out the resolver.
    pub fn finish(self) -> LocalizedUrls<R> {
        LocalizedUrls::new(Arc::new(self.router), self.locales, self.flags)
    }
}
