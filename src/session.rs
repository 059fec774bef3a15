use std::{collections::HashMap, convert::Infallible, fmt};

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};

/// Default name of the cookie carrying the session credential.
pub const SESSION_COOKIE: &str = "session_token";

/// SessionToken
///
/// The opaque credential issued by the external auth service at login.
/// This layer only reads it; it is never minted, refreshed or validated here.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens end up in request spans, so never print the value itself.
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

/// CookieJar
///
/// Parsed view of the request's `Cookie` header(s): a mapping from cookie name to raw value.
/// Rebuilt for every request and dropped with it.
///
/// Parsing rules:
/// 1. Split on `;` and trim each segment.
/// 2. Split the segment on the first `=` into (name, value), trimming both.
/// 3. Segments without `=` or with an empty name are skipped.
/// 4. The first occurrence of a name wins.
///
/// Values are not percent-decoded. Decoding belongs to whoever consumes the value.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    cookies: HashMap<String, String>,
}

impl CookieJar {
    /// Parses a single raw `Cookie` header value.
    pub fn parse(header: &str) -> Self {
        let mut jar = Self::default();
        jar.extend_from(header);
        jar
    }

    /// from_headers
    ///
    /// Builds the jar from every `Cookie` header in the map (HTTP/2 clients may send
    /// several). A header that is not valid UTF-8 contributes nothing, so a
    /// malformed header degrades to "no session" rather than to an error.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut jar = Self::default();
        for value in headers.get_all(header::COOKIE) {
            match value.to_str() {
                Ok(raw) => jar.extend_from(raw),
                Err(_) => tracing::debug!("ignoring non UTF-8 cookie header"),
            }
        }
        jar
    }

    fn extend_from(&mut self, raw: &str) {
        for segment in raw.split(';') {
            let Some((name, value)) = segment.trim().split_once('=') else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            self.cookies
                .entry(name.to_string())
                .or_insert_with(|| value.trim().to_string());
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// session_token
    ///
    /// Returns the session credential stored under `name`. An empty value is no credential.
    pub fn session_token(&self, name: &str) -> Option<SessionToken> {
        self.get(name)
            .filter(|value| !value.is_empty())
            .map(SessionToken::new)
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

/// CookieJar Extractor
///
/// Always succeeds: a request without cookies yields an empty jar.
impl<S> FromRequestParts<S> for CookieJar
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}
