//! Named cookie lookup over the document cookie jar.
//!
//! The browser exposes every cookie visible to the page as one string,
//! `name1=value1; name2=value2`. Names are compared exactly; values are
//! percent-decoded the way `decodeURIComponent` does it, so a malformed
//! escape in the matched value is an error rather than a silent pass-through.
//!
//! The jar is read once per lookup. Anything implementing [`CookieSource`]
//! can stand in for the document, which is how the tests drive it.

use std::borrow::Cow;

use percent_encoding::percent_decode_str;

use crate::error::{Error, Result};

/// Something that can hand out the current cookie jar string.
pub trait CookieSource {
    fn cookie_string(&self) -> Cow<'_, str>;
}

impl CookieSource for str {
    fn cookie_string(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl CookieSource for String {
    fn cookie_string(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

/// The ambient `document.cookie` of the page the module runs in.
///
/// Outside a browser (native builds, Web Workers) the jar reads as empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentCookies;

impl CookieSource for DocumentCookies {
    fn cookie_string(&self) -> Cow<'_, str> {
        Cow::Owned(read_document_cookie())
    }
}

#[cfg(target_arch = "wasm32")]
fn read_document_cookie() -> String {
    use wasm_bindgen::JsCast;

    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        log::warn!("no document in scope, cookie jar reads as empty");
        return String::new();
    };
    match document.dyn_into::<web_sys::HtmlDocument>() {
        Ok(html) => html.cookie().unwrap_or_else(|err| {
            log::warn!("document.cookie is not readable: {err:?}");
            String::new()
        }),
        Err(_) => {
            log::warn!("document is not an HTML document, cookie jar reads as empty");
            String::new()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn read_document_cookie() -> String {
    String::new()
}

/// Split one `;`-separated candidate into `(name, raw_value)`.
/// Leading whitespace is dropped; only the first `=` separates.
fn split_entry(candidate: &str) -> Option<(&str, &str)> {
    candidate.trim_start().split_once('=')
}

/// Ordered snapshot of the `(name, raw_value)` pairs in a jar string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar<'a> {
    entries: Vec<(&'a str, &'a str)>,
}

impl<'a> CookieJar<'a> {
    pub fn parse(jar: &'a str) -> Self {
        if jar.is_empty() {
            return Self::default();
        }
        Self {
            entries: jar.split(';').filter_map(split_entry).collect(),
        }
    }

    /// Raw (still encoded) value of the first entry named `name`.
    pub fn raw(&self, name: &str) -> Option<&'a str> {
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
    }

    /// Decoded value of the first entry named `name`.
    pub fn get(&self, name: &str) -> Result<Option<String>> {
        self.raw(name).map(decode_component).transpose()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Look `name` up in an explicit jar string. Stops at the first match.
pub fn lookup_in(jar: &str, name: &str) -> Result<Option<String>> {
    if jar.is_empty() {
        return Ok(None);
    }
    jar.split(';')
        .filter_map(split_entry)
        .find(|(key, _)| *key == name)
        .map(|(_, raw)| decode_component(raw))
        .transpose()
}

/// Look `name` up in whatever jar `source` currently holds.
pub fn lookup_from<S>(source: &S, name: &str) -> Result<Option<String>>
where
    S: CookieSource + ?Sized,
{
    let jar = source.cookie_string();
    let found = lookup_in(&jar, name)?;
    match found {
        Some(_) => log::debug!("cookie {name:?} found"),
        None => log::debug!("cookie {name:?} not set"),
    }
    Ok(found)
}

/// Look `name` up in the document cookie jar.
pub fn lookup(name: &str) -> Result<Option<String>> {
    lookup_from(&DocumentCookies, name)
}

/// Like [`lookup_from`], but a malformed value counts as absent.
pub fn lookup_lenient<S>(source: &S, name: &str) -> Option<String>
where
    S: CookieSource + ?Sized,
{
    lookup_from(source, name).unwrap_or_else(|err| {
        log::warn!("ignoring cookie {name:?}: {err}");
        None
    })
}

/// Percent-decode a URI component.
///
/// Every `%` must start a two-hex-digit escape and the decoded bytes must be
/// UTF-8. `+` is left alone.
pub fn decode_component(raw: &str) -> Result<String> {
    let bytes = raw.as_bytes();
    let mut pos = 0;
    while let Some(found) = bytes[pos..].iter().position(|&b| b == b'%') {
        let offset = pos + found;
        let well_formed = bytes
            .get(offset + 1..offset + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
        if !well_formed {
            return Err(Error::MalformedEscape {
                value: raw.to_string(),
                offset,
            });
        }
        pos = offset + 3;
    }

    percent_decode_str(raw)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|_| Error::InvalidUtf8 {
            value: raw.to_string(),
        })
}
