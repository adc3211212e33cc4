//! Name and URI resolution rules.
//!
//! Pure functions deciding, per locale, the concrete route name and URI of a
//! multilingual registration. The resolver reuses the same rules to recompute
//! names, so nothing here may depend on router state beyond the registration
//! context handed in.

use crate::i18n::{route_translation, SupportedLocales, Translator};
use crate::routing::pending::PendingRegistration;
use crate::routing::table::{RegistrationContext, RouteDefinition};
use tracing::debug;

/// Key of the home route.
pub const HOME_KEY: &str = "/";

/// Configuration flags that change naming and prefixing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flags {
    /// Prefix the default locale's URIs with its code too.
    pub prefix_default_locale: bool,
    /// With `prefix_default_locale`, also prefix the default locale's home route.
    pub prefix_default_home: bool,
    /// Place group name prefixes before the locale code (`admin.en.x`
    /// instead of `en.admin.x`).
    pub name_prefix_before_locale: bool,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            prefix_default_locale: false,
            prefix_default_home: true,
            name_prefix_before_locale: false,
        }
    }
}

/// Name override for the locale, else the group name, else the key.
pub fn base_name<'a>(registration: &'a PendingRegistration, locale: &str) -> &'a str {
    registration
        .name_overrides
        .get(locale)
        .or(registration.group_name.as_ref())
        .unwrap_or(&registration.key)
}

/// Compose the concrete route name.
pub fn final_name(base: &str, locale: &str, name_prefix: &str, flags: Flags) -> String {
    if flags.name_prefix_before_locale {
        format!("{}{}.{}", name_prefix, locale, base)
    } else {
        format!("{}.{}{}", locale, name_prefix, base)
    }
}

/// URI text for `key` in `locale`, taken from `routes.<key>` or the key itself.
pub fn uri_segment(key: &str, locale: &str, translator: &dyn Translator) -> String {
    match route_translation(translator, key, locale) {
        Some(text) => text.trim_start_matches('/').to_string(),
        None => {
            debug!(key, locale, "No route translation, using key as URI");
            key.trim_start_matches('/').to_string()
        }
    }
}

/// Whether `locale`'s URIs carry the locale code.
pub fn prefixes_locale(locale: &str, locales: &SupportedLocales, flags: Flags) -> bool {
    !locales.is_default(locale) || flags.prefix_default_locale
}

/// Full URI of `key` in `locale`, including group prefixes.
pub fn localized_uri(
    key: &str,
    locale: &str,
    locales: &SupportedLocales,
    translator: &dyn Translator,
    flags: Flags,
    context: &RegistrationContext,
) -> String {
    let prefixed = prefixes_locale(locale, locales, flags);

    let localized = if key == HOME_KEY {
        let exempt_home = locales.is_default(locale) && !flags.prefix_default_home;
        if prefixed && !exempt_home {
            locale.to_string()
        } else {
            String::new()
        }
    } else {
        let segment = uri_segment(key, locale, translator);
        if prefixed {
            join_path(&[locale, segment.as_str()])
        } else {
            segment
        }
    };

    join_path(&[context.uri_prefix.as_str(), localized.as_str()])
}

/// Whether the registration expands into `locale`.
///
/// An include list takes precedence over an exclude list.
pub fn is_eligible(registration: &PendingRegistration, locale: &str) -> bool {
    if let Some(include) = &registration.include_locales {
        return include.iter().any(|code| code == locale);
    }
    if let Some(exclude) = &registration.exclude_locales {
        return !exclude.iter().any(|code| code == locale);
    }
    true
}

/// One route definition per eligible locale, in configured locale order.
pub fn expand(
    registration: &PendingRegistration,
    locales: &SupportedLocales,
    translator: &dyn Translator,
    flags: Flags,
    context: &RegistrationContext,
) -> Vec<RouteDefinition> {
    locales
        .iter()
        .filter(|locale| is_eligible(registration, locale))
        .map(|locale| RouteDefinition {
            name: final_name(
                base_name(registration, locale),
                locale,
                &context.name_prefix,
                flags,
            ),
            method: registration.method,
            uri: localized_uri(
                &registration.key,
                locale,
                locales,
                translator,
                flags,
                context,
            ),
            action: registration.action.clone(),
            defaults: registration.defaults.clone(),
            constraints: registration.constraints.clone(),
            locale: locale.to_string(),
            key: registration.key.clone(),
        })
        .collect()
}

/// Whether `name` already carries `locale` where the naming mode puts it.
///
/// Locale-first names only qualify with a leading `<locale>.`; with
/// `name_prefix_before_locale` any segment but the last may hold it.
pub fn is_qualified(name: &str, locale: &str, flags: Flags) -> bool {
    if !flags.name_prefix_before_locale {
        return name.starts_with(&format!("{}.", locale));
    }
    let segments: Vec<&str> = name.split('.').collect();
    segments[..segments.len() - 1].contains(&locale)
}

/// Concrete names `key_or_name` may be registered under for `locale`.
///
/// Without `name_prefix_before_locale` there is exactly one. With it, the
/// group prefix is unknown, so the locale is tried at every segment
/// boundary from the front.
pub fn candidate_names(key_or_name: &str, locale: &str, flags: Flags) -> Vec<String> {
    if is_qualified(key_or_name, locale, flags) {
        return vec![key_or_name.to_string()];
    }

    if !flags.name_prefix_before_locale {
        return vec![final_name(key_or_name, locale, "", flags)];
    }

    let segments: Vec<&str> = key_or_name.split('.').collect();
    (0..segments.len())
        .map(|at| {
            let mut parts = segments.clone();
            parts.insert(at, locale);
            parts.join(".")
        })
        .collect()
}

/// Remove the locale segment from a concrete route name.
pub fn strip_locale(name: &str, locale: &str, flags: Flags) -> Option<String> {
    if let Some(rest) = name.strip_prefix(&format!("{}.", locale)) {
        return Some(rest.to_string());
    }
    if !flags.name_prefix_before_locale {
        return None;
    }

    let mut segments: Vec<&str> = name.split('.').collect();
    let position = segments[..segments.len() - 1]
        .iter()
        .position(|segment| *segment == locale)?;
    segments.remove(position);
    Some(segments.join("."))
}

fn join_path(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|part| part.trim_matches('/'))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Catalog;
    use crate::routing::multilingual;

    fn locales() -> SupportedLocales {
        SupportedLocales::new(["en", "fr", "es"], "en")
    }

    fn catalog() -> Catalog {
        Catalog::new()
            .with("en", "routes.search", "/search/{filter?}")
            .with("fr", "routes.search", "recherche/{filter?}")
    }

    // ==================== Base Name Tests ====================

    #[test]
    fn test_base_name_defaults_to_key() {
        let registration = multilingual("search");
        assert_eq!(base_name(&registration, "fr"), "search");
    }

    #[test]
    fn test_base_name_group_name_over_key() {
        let registration = multilingual("search").name("search.results");
        assert_eq!(base_name(&registration, "fr"), "search.results");
    }

    #[test]
    fn test_base_name_override_wins_for_its_locale_only() {
        let registration = multilingual("search")
            .name("search.results")
            .names([("fr", "recherche")]);
        assert_eq!(base_name(&registration, "fr"), "recherche");
        assert_eq!(base_name(&registration, "en"), "search.results");
    }

    // ==================== Final Name Tests ====================

    #[test]
    fn test_final_name_locale_first() {
        let flags = Flags::default();
        assert_eq!(final_name("search", "fr", "", flags), "fr.search");
        assert_eq!(final_name("dashboard", "fr", "admin.", flags), "fr.admin.dashboard");
    }

    #[test]
    fn test_final_name_prefix_before_locale() {
        let flags = Flags {
            name_prefix_before_locale: true,
            ..Flags::default()
        };
        assert_eq!(final_name("dashboard", "fr", "admin.", flags), "admin.fr.dashboard");
        assert_eq!(final_name("search", "fr", "", flags), "fr.search");
    }

    // ==================== URI Tests ====================

    #[test]
    fn test_uri_segment_translated_and_trimmed() {
        assert_eq!(uri_segment("search", "en", &catalog()), "search/{filter?}");
        assert_eq!(uri_segment("search", "fr", &catalog()), "recherche/{filter?}");
    }

    #[test]
    fn test_uri_segment_falls_back_to_key() {
        assert_eq!(uri_segment("search", "es", &catalog()), "search");
        assert_eq!(uri_segment("/about", "es", &catalog()), "about");
    }

    #[test]
    fn test_localized_uri_default_locale_unprefixed() {
        let context = RegistrationContext::default();
        let flags = Flags::default();
        assert_eq!(
            localized_uri("search", "en", &locales(), &catalog(), flags, &context),
            "search/{filter?}"
        );
        assert_eq!(
            localized_uri("search", "fr", &locales(), &catalog(), flags, &context),
            "fr/recherche/{filter?}"
        );
    }

    #[test]
    fn test_localized_uri_prefix_default_locale() {
        let flags = Flags {
            prefix_default_locale: true,
            ..Flags::default()
        };
        assert_eq!(
            localized_uri(
                "search",
                "en",
                &locales(),
                &catalog(),
                flags,
                &RegistrationContext::default()
            ),
            "en/search/{filter?}"
        );
    }

    #[test]
    fn test_localized_uri_home() {
        let context = RegistrationContext::default();
        let cat = catalog();

        let flags = Flags::default();
        assert_eq!(localized_uri(HOME_KEY, "en", &locales(), &cat, flags, &context), "");
        assert_eq!(localized_uri(HOME_KEY, "fr", &locales(), &cat, flags, &context), "fr");

        let flags = Flags {
            prefix_default_locale: true,
            ..Flags::default()
        };
        assert_eq!(localized_uri(HOME_KEY, "en", &locales(), &cat, flags, &context), "en");

        let flags = Flags {
            prefix_default_locale: true,
            prefix_default_home: false,
            ..Flags::default()
        };
        assert_eq!(localized_uri(HOME_KEY, "en", &locales(), &cat, flags, &context), "");
        assert_eq!(localized_uri(HOME_KEY, "fr", &locales(), &cat, flags, &context), "fr");
    }

    #[test]
    fn test_localized_uri_group_prefix_outside_locale() {
        let context = RegistrationContext {
            name_prefix: "admin.".to_string(),
            uri_prefix: "admin".to_string(),
        };
        assert_eq!(
            localized_uri("dashboard", "fr", &locales(), &catalog(), Flags::default(), &context),
            "admin/fr/dashboard"
        );
    }

    // ==================== Eligibility Tests ====================

    #[test]
    fn test_is_eligible_only() {
        let registration = multilingual("search").only(["fr"]);
        assert!(is_eligible(&registration, "fr"));
        assert!(!is_eligible(&registration, "en"));
    }

    #[test]
    fn test_is_eligible_except() {
        let registration = multilingual("search").except(["fr"]);
        assert!(!is_eligible(&registration, "fr"));
        assert!(is_eligible(&registration, "en"));
    }

    #[test]
    fn test_is_eligible_only_wins_over_except() {
        let registration = multilingual("search").except(["fr"]).only(["fr"]);
        assert!(is_eligible(&registration, "fr"));
        assert!(!is_eligible(&registration, "es"));
    }

    // ==================== Expansion Tests ====================

    #[test]
    fn test_expand_follows_locale_order() {
        let registration = multilingual("search")
            .name("search.results")
            .where_("filter", "[A-Za-z]+");
        let definitions = expand(
            &registration,
            &locales(),
            &catalog(),
            Flags::default(),
            &RegistrationContext::default(),
        );

        let names: Vec<&str> = definitions.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["en.search.results", "fr.search.results", "es.search.results"]);

        let uris: Vec<&str> = definitions.iter().map(|d| d.uri.as_str()).collect();
        assert_eq!(uris, vec!["search/{filter?}", "fr/recherche/{filter?}", "es/search"]);

        assert!(definitions
            .iter()
            .all(|d| d.constraints.get("filter").map(String::as_str) == Some("[A-Za-z]+")));
        assert!(definitions.iter().all(|d| d.key == "search"));
    }

    #[test]
    fn test_expand_skips_excluded() {
        let registration = multilingual("search").except(["es"]);
        let definitions = expand(
            &registration,
            &locales(),
            &catalog(),
            Flags::default(),
            &RegistrationContext::default(),
        );
        let locales: Vec<&str> = definitions.iter().map(|d| d.locale.as_str()).collect();
        assert_eq!(locales, vec!["en", "fr"]);
    }

    // ==================== Candidate Name Tests ====================

    #[test]
    fn test_candidate_names_default_mode() {
        assert_eq!(
            candidate_names("search.results", "fr", Flags::default()),
            vec!["fr.search.results"]
        );
    }

    #[test]
    fn test_candidate_names_qualified_passthrough() {
        assert_eq!(
            candidate_names("fr.search.results", "fr", Flags::default()),
            vec!["fr.search.results"]
        );
    }

    #[test]
    fn test_candidate_names_inner_locale_segment_default_mode() {
        assert_eq!(
            candidate_names("docs.es.intro", "es", Flags::default()),
            vec!["es.docs.es.intro"]
        );
    }

    #[test]
    fn test_candidate_names_qualified_prefix_before_locale() {
        let flags = Flags {
            name_prefix_before_locale: true,
            ..Flags::default()
        };
        assert_eq!(
            candidate_names("admin.fr.dashboard", "fr", flags),
            vec!["admin.fr.dashboard"]
        );
    }

    #[test]
    fn test_is_qualified_follows_naming_mode() {
        let flags = Flags {
            name_prefix_before_locale: true,
            ..Flags::default()
        };
        assert!(is_qualified("fr.search", "fr", Flags::default()));
        assert!(!is_qualified("admin.fr.dashboard", "fr", Flags::default()));
        assert!(!is_qualified("french.search", "fr", Flags::default()));
        assert!(is_qualified("admin.fr.dashboard", "fr", flags));
        assert!(!is_qualified("help.fr", "fr", flags));
    }

    #[test]
    fn test_candidate_names_last_segment_is_not_a_locale() {
        assert_eq!(candidate_names("help.fr", "fr", Flags::default()), vec!["fr.help.fr"]);
    }

    #[test]
    fn test_candidate_names_prefix_before_locale() {
        let flags = Flags {
            name_prefix_before_locale: true,
            ..Flags::default()
        };
        assert_eq!(
            candidate_names("admin.dashboard", "fr", flags),
            vec!["fr.admin.dashboard", "admin.fr.dashboard"]
        );
    }

    // ==================== Strip Locale Tests ====================

    #[test]
    fn test_strip_locale_leading() {
        assert_eq!(
            strip_locale("fr.search.results", "fr", Flags::default()).as_deref(),
            Some("search.results")
        );
        assert_eq!(strip_locale("admin.fr.dashboard", "fr", Flags::default()), None);
    }

    #[test]
    fn test_strip_locale_prefix_before_locale() {
        let flags = Flags {
            name_prefix_before_locale: true,
            ..Flags::default()
        };
        assert_eq!(
            strip_locale("admin.fr.dashboard", "fr", flags).as_deref(),
            Some("admin.dashboard")
        );
        assert_eq!(strip_locale("admin.dashboard", "fr", flags), None);
    }
}
