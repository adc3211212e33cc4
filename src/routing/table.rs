//! Route table: the router the multilingual layer registers into.
//!
//! The `Router` trait is the seam the registration expander and the resolver
//! talk to. `RouteTable` is the in-memory implementation used by the server.

use crate::error::{Result, RouteError, UrlGenerationError};
use crate::routing::pattern::{Params, UriPattern};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// HTTP verb a route answers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            // HEAD is answered by GET routes
            "GET" | "HEAD" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            "OPTIONS" => Ok(Method::Options),
            other => Err(format!("Unsupported HTTP method: {}", other)),
        }
    }
}

/// What a route dispatches to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Action {
    /// Translation-only placeholder: the route exists for URL generation.
    #[default]
    None,
    /// Named handler the host application dispatches on.
    Handler(String),
    /// Named view rendered with static data.
    View {
        name: String,
        data: BTreeMap<String, String>,
    },
}

/// Everything needed to register one concrete route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDefinition {
    pub name: String,
    pub method: Method,
    pub uri: String,
    pub action: Action,
    pub defaults: Params,
    pub constraints: BTreeMap<String, String>,
    /// Locale tag of the concrete route.
    pub locale: String,
    /// Key of the multilingual registration the route was expanded from.
    pub key: String,
}

/// A registered concrete route.
#[derive(Debug, Clone)]
pub struct Route {
    pub name: String,
    pub method: Method,
    pub pattern: UriPattern,
    pub action: Action,
    pub defaults: Params,
    pub locale: String,
    pub key: String,
    constraints: Vec<(String, Regex)>,
}

impl Route {
    pub fn uri(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn constraints(&self) -> impl Iterator<Item = (&str, &str)> {
        self.constraints
            .iter()
            .map(|(param, regex)| (param.as_str(), regex.as_str()))
    }
}

pub type RouteHandle = Arc<Route>;

/// Result of dispatching a request path against the table.
#[derive(Debug, Clone)]
pub struct MatchedRoute {
    pub route: RouteHandle,
    pub params: Params,
}

/// Name and URI prefixes of the currently open route groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationContext {
    /// Concatenated name prefixes, e.g. `admin.`
    pub name_prefix: String,
    /// Joined URI prefixes without surrounding slashes, e.g. `admin`
    pub uri_prefix: String,
}

/// Attributes of a route group.
#[derive(Debug, Clone, Default)]
pub struct GroupAttributes {
    name: Option<String>,
    prefix: Option<String>,
}

impl GroupAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name prefix for routes in the group, e.g. `admin.`
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// URI prefix for routes in the group, e.g. `admin`
    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = Some(prefix.to_string());
        self
    }
}

/// Compile a parameter constraint; it has to match the whole segment.
pub(crate) fn compile_constraint(param: &str, pattern: &str, route: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| {
        RouteError::Configuration(format!(
            "invalid constraint for parameter '{}' on route '{}': {}",
            param, route, e
        ))
    })
}

/// The router collaborator.
pub trait Router: Send + Sync {
    fn register_route(&mut self, definition: RouteDefinition) -> Result<RouteHandle>;

    /// Generate a URL for a named route.
    fn generate_url(
        &self,
        name: &str,
        params: &Params,
        absolute: bool,
    ) -> std::result::Result<String, UrlGenerationError>;

    fn has_route(&self, name: &str) -> bool;

    /// Open a route group; its prefixes apply until the matching `pop_group`.
    fn push_group(&mut self, attributes: GroupAttributes);

    fn pop_group(&mut self);

    /// Prefixes contributed by the currently open groups.
    fn registration_context(&self) -> RegistrationContext;

    fn match_request(&self, method: Method, path: &str) -> Option<MatchedRoute>;
}

/// In-memory route table.
#[derive(Debug, Default)]
pub struct RouteTable {
    base_url: String,
    routes: Vec<RouteHandle>,
    by_name: HashMap<String, usize>,
    groups: Vec<GroupAttributes>,
}

impl RouteTable {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Run `f` with a group's prefixes applied to everything registered inside.
    pub fn group<T>(&mut self, attributes: GroupAttributes, f: impl FnOnce(&mut Self) -> T) -> T {
        self.push_group(attributes);
        let result = f(self);
        self.pop_group();
        result
    }

    /// Routes in registration order.
    pub fn routes(&self) -> &[RouteHandle] {
        &self.routes
    }

    pub fn get(&self, name: &str) -> Option<&RouteHandle> {
        self.by_name.get(name).map(|&index| &self.routes[index])
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Router for RouteTable {
    fn register_route(&mut self, definition: RouteDefinition) -> Result<RouteHandle> {
        let constraints = definition
            .constraints
            .iter()
            .map(|(param, pattern)| {
                compile_constraint(param, pattern, &definition.name)
                    .map(|regex| (param.clone(), regex))
            })
            .collect::<Result<Vec<_>>>()?;

        let route = Arc::new(Route {
            pattern: UriPattern::parse(&definition.uri),
            name: definition.name,
            method: definition.method,
            action: definition.action,
            defaults: definition.defaults,
            locale: definition.locale,
            key: definition.key,
            constraints,
        });

        debug!(
            name = %route.name,
            method = %route.method,
            uri = route.uri(),
            locale = %route.locale,
            "Registered route"
        );

        // Later registrations take over the name, like any named route table.
        self.by_name.insert(route.name.clone(), self.routes.len());
        self.routes.push(Arc::clone(&route));
        Ok(route)
    }

    fn generate_url(
        &self,
        name: &str,
        params: &Params,
        absolute: bool,
    ) -> std::result::Result<String, UrlGenerationError> {
        let route = self
            .get(name)
            .ok_or_else(|| UrlGenerationError::NotFound(name.to_string()))?;
        let path = route.pattern.render(name, params, &route.defaults)?;

        if absolute {
            Ok(format!("{}{}", self.base_url, path))
        } else {
            Ok(path)
        }
    }

    fn has_route(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    fn push_group(&mut self, attributes: GroupAttributes) {
        self.groups.push(attributes);
    }

    fn pop_group(&mut self) {
        self.groups.pop();
    }

    fn registration_context(&self) -> RegistrationContext {
        let name_prefix = self
            .groups
            .iter()
            .filter_map(|group| group.name.as_deref())
            .collect::<String>();

        let uri_prefix = self
            .groups
            .iter()
            .filter_map(|group| group.prefix.as_deref())
            .map(|prefix| prefix.trim_matches('/'))
            .filter(|prefix| !prefix.is_empty())
            .collect::<Vec<_>>()
            .join("/");

        RegistrationContext {
            name_prefix,
            uri_prefix,
        }
    }

    fn match_request(&self, method: Method, path: &str) -> Option<MatchedRoute> {
        self.routes
            .iter()
            .filter(|route| route.method == method)
            .find_map(|route| {
                route
                    .pattern
                    .matches(path, &route.constraints, &route.defaults)
                    .map(|params| MatchedRoute {
                        route: Arc::clone(route),
                        params,
                    })
            })
    }
}
