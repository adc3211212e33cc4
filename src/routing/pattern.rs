//! URI patterns with `{param}` and trailing `{param?}` placeholders.

use crate::error::UrlGenerationError;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use std::collections::BTreeMap;

/// Route and query parameters, ordered by name.
pub type Params = BTreeMap<String, String>;

/// Characters left untouched when a parameter value is placed in a URL.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param { name: String, optional: bool },
}

/// Parsed URI pattern such as `fr/recherche/{filter?}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl UriPattern {
    pub fn parse(uri: &str) -> Self {
        let segments: Vec<Segment> = uri
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                match segment
                    .strip_prefix('{')
                    .and_then(|rest| rest.strip_suffix('}'))
                {
                    Some(inner) => match inner.strip_suffix('?') {
                        Some(name) => Segment::Param {
                            name: name.to_string(),
                            optional: true,
                        },
                        None => Segment::Param {
                            name: inner.to_string(),
                            optional: false,
                        },
                    },
                    None => Segment::Literal(segment.to_string()),
                }
            })
            .collect();

        let raw = segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.clone(),
                Segment::Param { name, optional } => {
                    format!("{{{}{}}}", name, if *optional { "?" } else { "" })
                }
            })
            .collect::<Vec<_>>()
            .join("/");

        Self {
            raw: format!("/{}", raw),
            segments,
        }
    }

    /// Normalized pattern text, always starting with `/`.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Param { name, .. } => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Build a path from parameters, falling back to defaults.
    ///
    /// Parameters that do not appear in the pattern are appended as a query
    /// string in name order.
    pub fn render(
        &self,
        route: &str,
        params: &Params,
        defaults: &Params,
    ) -> Result<String, UrlGenerationError> {
        let mut parts: Vec<String> = Vec::with_capacity(self.segments.len());

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => parts.push(text.clone()),
                Segment::Param { name, optional } => {
                    match params.get(name).or_else(|| defaults.get(name)) {
                        Some(value) => parts.push(encode(value)),
                        None if *optional => {}
                        None => {
                            return Err(UrlGenerationError::MissingParameter {
                                route: route.to_string(),
                                parameter: name.clone(),
                            })
                        }
                    }
                }
            }
        }

        let mut path = format!("/{}", parts.join("/"));

        let query: Vec<String> = params
            .iter()
            .filter(|(name, _)| !self.parameter_names().any(|known| known == name.as_str()))
            .map(|(name, value)| format!("{}={}", encode(name), encode(value)))
            .collect();
        if !query.is_empty() {
            path.push('?');
            path.push_str(&query.join("&"));
        }

        Ok(path)
    }

    /// Match a request path, returning extracted parameters.
    pub fn matches(
        &self,
        path: &str,
        constraints: &[(String, Regex)],
        defaults: &Params,
    ) -> Option<Params> {
        let mut incoming = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| percent_decode_str(segment).decode_utf8_lossy().into_owned());
        let mut params = Params::new();

        for segment in &self.segments {
            match (segment, incoming.next()) {
                (Segment::Literal(text), Some(value)) if *text == value => {}
                (Segment::Literal(_), _) => return None,
                (Segment::Param { name, .. }, Some(value)) => {
                    let allowed = constraints
                        .iter()
                        .filter(|(param, _)| param == name)
                        .all(|(_, pattern)| pattern.is_match(&value));
                    if !allowed {
                        return None;
                    }
                    params.insert(name.clone(), value);
                }
                (Segment::Param { name, optional }, None) => {
                    if !*optional && !defaults.contains_key(name) {
                        return None;
                    }
                    if let Some(value) = defaults.get(name) {
                        params.insert(name.clone(), value.clone());
                    }
                }
            }
        }

        if incoming.next().is_some() {
            return None;
        }

        Some(params)
    }
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // ==================== Parse Tests ====================

    #[test]
    fn test_parse_normalizes_slashes() {
        assert_eq!(UriPattern::parse("//fr/recherche/").as_str(), "/fr/recherche");
        assert_eq!(UriPattern::parse("").as_str(), "/");
        assert_eq!(UriPattern::parse("/").as_str(), "/");
    }

    #[test]
    fn test_parse_parameters() {
        let pattern = UriPattern::parse("posts/{post}/comments/{page?}");
        let names: Vec<&str> = pattern.parameter_names().collect();
        assert_eq!(names, vec!["post", "page"]);
        assert_eq!(pattern.as_str(), "/posts/{post}/comments/{page?}");
    }

    // ==================== Render Tests ====================

    #[test]
    fn test_render_optional_present() {
        let pattern = UriPattern::parse("search/{filter?}");
        let path = pattern
            .render("en.search", &params(&[("filter", "Foo")]), &Params::new())
            .unwrap();
        assert_eq!(path, "/search/Foo");
    }

    #[test]
    fn test_render_optional_absent() {
        let pattern = UriPattern::parse("search/{filter?}");
        let path = pattern.render("en.search", &Params::new(), &Params::new()).unwrap();
        assert_eq!(path, "/search");
    }

    #[test]
    fn test_render_missing_required() {
        let pattern = UriPattern::parse("posts/{post}");
        let err = pattern
            .render("en.posts", &Params::new(), &Params::new())
            .unwrap_err();
        assert_eq!(
            err,
            UrlGenerationError::MissingParameter {
                route: "en.posts".to_string(),
                parameter: "post".to_string(),
            }
        );
    }

    #[test]
    fn test_render_uses_default() {
        let pattern = UriPattern::parse("posts/{post}");
        let path = pattern
            .render("en.posts", &Params::new(), &params(&[("post", "latest")]))
            .unwrap();
        assert_eq!(path, "/posts/latest");
    }

    #[test]
    fn test_render_extra_params_become_query() {
        let pattern = UriPattern::parse("search/{filter?}");
        let path = pattern
            .render(
                "en.search",
                &params(&[("filter", "a b"), ("foo", "bar"), ("a", "1")]),
                &Params::new(),
            )
            .unwrap();
        assert_eq!(path, "/search/a%20b?a=1&foo=bar");
    }

    #[test]
    fn test_render_root() {
        let pattern = UriPattern::parse("/");
        assert_eq!(pattern.render("en.home", &Params::new(), &Params::new()).unwrap(), "/");
    }

    // ==================== Match Tests ====================

    #[test]
    fn test_matches_literal_and_param() {
        let pattern = UriPattern::parse("fr/recherche/{filter?}");
        let found = pattern.matches("/fr/recherche/Bar", &[], &Params::new()).unwrap();
        assert_eq!(found, params(&[("filter", "Bar")]));
    }

    #[test]
    fn test_matches_optional_missing_uses_default() {
        let pattern = UriPattern::parse("search/{filter?}");
        let found = pattern
            .matches("/search", &[], &params(&[("filter", "all")]))
            .unwrap();
        assert_eq!(found, params(&[("filter", "all")]));
    }

    #[test]
    fn test_matches_rejects_extra_segments() {
        let pattern = UriPattern::parse("search");
        assert!(pattern.matches("/search/more", &[], &Params::new()).is_none());
    }

    #[test]
    fn test_matches_rejects_missing_required() {
        let pattern = UriPattern::parse("posts/{post}");
        assert!(pattern.matches("/posts", &[], &Params::new()).is_none());
    }

    #[test]
    fn test_matches_honours_constraints() {
        let pattern = UriPattern::parse("posts/{post}");
        let constraints = vec![("post".to_string(), Regex::new(r"^(?:\d+)$").unwrap())];
        assert!(pattern.matches("/posts/42", &constraints, &Params::new()).is_some());
        assert!(pattern.matches("/posts/abc", &constraints, &Params::new()).is_none());
    }

    #[test]
    fn test_matches_decodes_segments() {
        let pattern = UriPattern::parse("fr/{page}");
        let found = pattern.matches("/fr/a%20propos", &[], &Params::new()).unwrap();
        assert_eq!(found, params(&[("page", "a propos")]));
    }

    #[test]
    fn test_matches_root() {
        let pattern = UriPattern::parse("/");
        assert!(pattern.matches("/", &[], &Params::new()).is_some());
        assert!(pattern.matches("/fr", &[], &Params::new()).is_none());
    }
}
