//! Locale configuration and route URI translations.
//!
//! - `locales`: the ordered set of supported locales and the default locale
//! - `catalog`: translation lookup used to localize route URIs

mod catalog;
mod locales;

pub use catalog::{route_translation, Catalog, Translator};
pub use locales::SupportedLocales;
