//! Anti-forgery cookie/header names and backend endpoint paths.

use serde::Deserialize;

use crate::cookie::{self, CookieSource};
use crate::error::Result;

pub const DEFAULT_CSRF_COOKIE: &str = "csrftoken";
pub const DEFAULT_CSRF_HEADER: &str = "X-CSRFToken";

/// Which cookie carries the anti-forgery token, and which header echoes it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CsrfConfig {
    pub cookie_name: String,
    pub header_name: String,
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_CSRF_COOKIE.to_string(),
            header_name: DEFAULT_CSRF_HEADER.to_string(),
        }
    }
}

impl CsrfConfig {
    /// Parse from JSON; missing fields fall back to the defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Current anti-forgery token, strict about malformed encoding.
pub fn csrf_token<S>(source: &S, config: &CsrfConfig) -> Result<Option<String>>
where
    S: CookieSource + ?Sized,
{
    cookie::lookup_from(source, &config.cookie_name)
}

/// `(header, value)` pair to attach to a mutating request, if a usable
/// token is present.
pub fn csrf_header<S>(source: &S, config: &CsrfConfig) -> Option<(String, String)>
where
    S: CookieSource + ?Sized,
{
    cookie::lookup_lenient(source, &config.cookie_name)
        .map(|token| (config.header_name.clone(), token))
}

/// Path of the leaderboard endpoint for a season, e.g. `/leaderboard/2024-25`.
pub fn leaderboard_path(season: &str) -> String {
    format!("/leaderboard/{}", season.trim_matches('/'))
}
