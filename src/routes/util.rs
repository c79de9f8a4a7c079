//! Shared URL/form parsing and HTML helpers for route handlers.

use percent_encoding::percent_decode_str;

/// Parse URL-encoded form body into key-value pairs.
/// Handles `key=value&key2=value2` format (from HTMX POST bodies).
pub fn parse_form_body(body: &str) -> Vec<(String, String)> {
    if body.is_empty() {
        return Vec::new();
    }
    body.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, val) = pair.split_once('=').unwrap_or((pair, ""));
            (form_decode(key), form_decode(val))
        })
        .collect()
}

/// Decode one `application/x-www-form-urlencoded` field: `+` is a space,
/// bad escapes pass through and invalid UTF-8 is replaced.
pub fn form_decode(input: &str) -> String {
    let spaced = input.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Parse a query string into key-value pairs.
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    let q = query.strip_prefix('?').unwrap_or(query);
    parse_form_body(q)
}

/// Helper to get a value by key from a list of key-value pairs.
pub fn get_param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Escape text for use inside HTML element content or a quoted attribute.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Inline error fragment.
pub fn error_fragment(message: &str) -> String {
    format!(
        r#"<span class="text-red-600">{}</span>"#,
        escape_html(message)
    )
}
