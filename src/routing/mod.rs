//! Multilingual route registration and resolution.
//!
//! # Architecture
//!
//! - `pending`: chainable builder for one logical route, and the registrar
//!   expanding it into one concrete route per eligible locale
//! - `rules`: pure naming, URI and eligibility rules shared by registration
//!   and resolution
//! - `table`: the `Router` seam and the in-memory `RouteTable`
//! - `pattern`: URI patterns with `{param}` / `{param?}` placeholders
//! - `resolver`: URL generation by (key, locale, params) and locale switching
//!   of the current route
//!
//! # Example
//!
//! ```rust,ignore
//! let mut registrar = Registrar::new(table, locales, Arc::new(catalog), flags);
//! multilingual("search").name("search.results").register(&mut registrar)?;
//!
//! let urls = registrar.finish();
//! let url = urls.resolve("search.results", &params, Some("fr"))?;
//! ```

mod pattern;
mod pending;
mod resolver;
pub mod rules;
mod table;

pub use pattern::{Params, UriPattern};
pub use pending::{multilingual, PendingRegistration, Registrar};
pub use resolver::{LocalizedUrls, RequestContext};
pub use rules::{Flags, HOME_KEY};
pub use table::{
    Action, GroupAttributes, MatchedRoute, Method, RegistrationContext, Route, RouteDefinition,
    RouteHandle, RouteTable, Router,
};
