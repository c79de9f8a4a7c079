//! Courtside in-browser WASM module for the NBA prediction game.
//!
//! Two surfaces are exported to JavaScript:
//!
//! * Cookie helpers (`get_cookie`, `csrf_token`, `csrf_header_name`) that read
//!   `document.cookie` on the page. The page attaches the token as a header on
//!   every mutating request to the backend.
//! * `handle_request(method, path, query, body)`, an HTMX-style router that
//!   returns HTML fragments for the leaderboard and the standings picker.
//!   Uses `matchit` for URL routing.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod cookie;
pub mod error;
pub mod predictions;
pub mod routes;

pub use error::Error;

/// Decoded value of the named cookie, or `undefined` when it is not set.
///
/// Throws if the value is not valid percent-encoding.
#[wasm_bindgen]
pub fn get_cookie(name: &str) -> Result<Option<String>, JsError> {
    Ok(cookie::lookup(name)?)
}

/// Current anti-forgery token from the default `csrftoken` cookie.
#[wasm_bindgen]
pub fn csrf_token() -> Result<Option<String>, JsError> {
    let config = config::CsrfConfig::default();
    Ok(config::csrf_token(&cookie::DocumentCookies, &config)?)
}

/// Header the anti-forgery token is sent in.
#[wasm_bindgen]
pub fn csrf_header_name() -> String {
    config::CsrfConfig::default().header_name
}

#[wasm_bindgen(js_name = "leaderboard_path")]
pub fn season_leaderboard_path(season: &str) -> String {
    config::leaderboard_path(season)
}

/// Opacity for a team row given whether it is being dragged.
#[wasm_bindgen]
pub fn drag_opacity(is_dragging: bool) -> f32 {
    predictions::standings::drag_opacity(is_dragging)
}

/// Process an HTTP-like request and return an HTML (or JSON) fragment.
///
/// # Arguments
/// * `method` — HTTP method (e.g., "GET", "POST")
/// * `path`   — URL path (e.g., "/api/standings")
/// * `query`  — Query string (e.g., "?conference=East")
/// * `body`   — Request body (form data or JSON). Empty string for GET requests.
#[wasm_bindgen]
pub fn handle_request(method: &str, path: &str, query: &str, body: &str) -> String {
    let mut router = matchit::Router::new();

    router.insert("/api/leaderboard", "leaderboard").ok();
    router.insert("/api/leaderboard/user", "leaderboard_user").ok();
    router.insert("/api/standings", "standings").ok();
    router.insert("/api/standings/move", "standings_move").ok();
    router.insert("/api/standings/state", "standings_state").ok();
    router.insert("/api/standings/import", "standings_import").ok();

    match router.at(path) {
        Ok(matched) => match (*matched.value, method) {
            ("leaderboard", "GET") => routes::leaderboard::handle_get(query),
            ("leaderboard", "POST") => routes::leaderboard::handle_load_post(body),
            ("leaderboard_user", "GET") => routes::leaderboard::handle_user_get(query),
            ("standings", "GET") => routes::standings::handle_list_get(query),
            ("standings_move", "POST") => routes::standings::handle_move_post(body),
            ("standings_state", "GET") => routes::standings::handle_state_get(query),
            ("standings_import", "POST") => routes::standings::handle_import_post(body),
            _ => {
                log::debug!("{method} {path} not allowed");
                method_not_allowed()
            }
        },
        Err(_) => {
            log::debug!("{method} {path} not found");
            not_found()
        }
    }
}

fn not_found() -> String {
    r#"<span class="text-red-600">404 — route not found</span>"#.to_string()
}

fn method_not_allowed() -> String {
    r#"<span class="text-red-600">405 — method not allowed</span>"#.to_string()
}
