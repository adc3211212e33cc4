//! HTTP application serving the localized route table.
//!
//! Requests run through locale detection, are matched against the
//! `RouteTable` and answered with a plain-text page listing the same page in
//! every other supported locale.

use crate::error::Result;
use crate::middleware::{detect_request_locale, ActiveLocale};
use crate::routing::{
    multilingual, Action, GroupAttributes, LocalizedUrls, Method, Params, Registrar,
    RequestContext, RouteTable, Router, HOME_KEY,
};
use axum::{
    extract::{Query, State},
    http::{StatusCode, Uri},
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    pub urls: LocalizedUrls<RouteTable>,
}

#[derive(Debug, Serialize)]
struct RouteSummary {
    name: String,
    method: String,
    uri: String,
    locale: String,
    key: String,
}

/// Routes served by the bundled server.
pub fn register_demo_routes(registrar: &mut Registrar<RouteTable>) -> Result<()> {
    multilingual(HOME_KEY)
        .name("home")
        .handler("home")
        .register(registrar)?;

    multilingual("search")
        .name("search.results")
        .handler("search")
        .where_("filter", "[^/]+")
        .register(registrar)?;

    multilingual("about")
        .view_with("pages.about", [("title", "About")])
        .names([("fr", "a-propos")])
        .register(registrar)?;

    multilingual("contact")
        .handler("contact.send")
        .post()
        .register(registrar)?;

    registrar.group(GroupAttributes::new().name("admin.").prefix("admin"), |r| {
        multilingual("dashboard")
            .handler("admin.dashboard")
            .only(["en", "fr"])
            .register(r)
            .map(|_| ())
    })
}

pub fn build_app(urls: LocalizedUrls<RouteTable>) -> axum::Router {
    let locales = Arc::new(urls.locales().clone());
    let state = AppState { urls };

    axum::Router::new()
        .route("/routes.json", get(list_routes))
        .fallback(dispatch)
        .layer(from_fn_with_state(locales, detect_request_locale))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn list_routes(State(state): State<AppState>) -> Json<Vec<RouteSummary>> {
    let routes = state
        .urls
        .router()
        .routes()
        .iter()
        .map(|route| RouteSummary {
            name: route.name.clone(),
            method: route.method.to_string(),
            uri: route.uri().to_string(),
            locale: route.locale.clone(),
            key: route.key.clone(),
        })
        .collect();
    Json(routes)
}

async fn dispatch(
    State(state): State<AppState>,
    Extension(active): Extension<ActiveLocale>,
    method: axum::http::Method,
    uri: Uri,
    Query(query): Query<Params>,
) -> Response {
    let Ok(method) = method.as_str().parse::<Method>() else {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    };

    let Some(matched) = state.urls.router().match_request(method, uri.path()) else {
        return (StatusCode::NOT_FOUND, "Not Found").into_response();
    };

    let context = RequestContext::new()
        .with_locale(&active.0)
        .with_match(matched)
        .with_query(query);

    render(&state.urls, &context).into_response()
}

fn render(urls: &LocalizedUrls<RouteTable>, context: &RequestContext) -> String {
    let mut lines = Vec::new();

    if let Some(matched) = &context.matched {
        let route = &matched.route;
        lines.push(format!("route: {}", route.name));
        lines.push(format!("locale: {}", context.locale.as_deref().unwrap_or_default()));
        lines.push(match &route.action {
            Action::None => "action: none".to_string(),
            Action::Handler(handler) => format!("handler: {}", handler),
            Action::View { name, data } => format!("view: {} {:?}", name, data),
        });
        for (param, value) in &matched.params {
            lines.push(format!("param {}: {}", param, value));
        }
    }

    for locale in urls.locales().iter() {
        match urls.current_route_in(context, locale) {
            Ok(url) => lines.push(format!("{}: {}", locale, url)),
            Err(e) => warn!(locale, "No alternate route: {}", e),
        }
    }

    lines.join("\n")
}
