//! Error types shared by the registration and resolution layers.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by route registration and localized URL resolution.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    /// Invalid or missing configuration (no supported locales, bad constraint pattern, ...)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// No concrete route exists for the requested name under the requested locale
    #[error("route [{name}] is not defined for locale [{locale}]")]
    UnresolvedRoute { name: String, locale: String },

    /// A locale switch was requested before any route was matched
    #[error("no route has been matched for the current request")]
    NoCurrentRoute,

    /// URL generation is missing a required route parameter
    #[error("missing required parameter [{parameter}] for route [{route}]")]
    MissingParameter { route: String, parameter: String },

    /// A translation catalog file could not be read or parsed
    #[error("failed to load translation catalog {}: {message}", .path.display())]
    Catalog { path: PathBuf, message: String },
}

/// Errors reported by a router when asked to generate a URL by route name.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlGenerationError {
    #[error("route [{0}] not defined")]
    NotFound(String),

    #[error("missing required parameter [{parameter}] for route [{route}]")]
    MissingParameter { route: String, parameter: String },
}

pub type Result<T> = std::result::Result<T, RouteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_route_message() {
        let err = RouteError::UnresolvedRoute {
            name: "fr.search".to_string(),
            locale: "fr".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "route [fr.search] is not defined for locale [fr]"
        );
    }

    #[test]
    fn test_catalog_message_includes_path() {
        let err = RouteError::Catalog {
            path: PathBuf::from("lang/fr.json"),
            message: "expected value".to_string(),
        };
        assert!(err.to_string().contains("lang/fr.json"));
        assert!(err.to_string().contains("expected value"));
    }
}
