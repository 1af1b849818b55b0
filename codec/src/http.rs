//! HTTP capability messages.
//!
//! Requests and responses are carried as plain owned values; the codec only
//! renders them to text and parses edited request text back. Capability
//! names are mapped to URLs through [`CapabilityResolver`].

use std::collections::BTreeMap;
use std::fmt;

use crate::pretty::Markup;

/// HTTP verbs accepted in message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Head,
    Get,
    Put,
    Post,
    Delete,
    Move,
    Options,
    Patch,
    Copy,
}

impl HttpMethod {
    pub const ALL: [Self; 9] = [
        Self::Head,
        Self::Get,
        Self::Put,
        Self::Post,
        Self::Delete,
        Self::Move,
        Self::Options,
        Self::Patch,
        Self::Copy,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Head => "HEAD",
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Move => "MOVE",
            Self::Options => "OPTIONS",
            Self::Patch => "PATCH",
            Self::Copy => "COPY",
        }
    }

    /// Matches an upper-case verb token.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|method| method.as_str() == token)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A captured or authored HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    /// Headers in capture order.
    pub headers: Vec<(String, String)>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            content_type: None,
            body: Vec::new(),
        }
    }

    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// A captured HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// URL of the request this answers, when known.
    pub url: Option<String>,
    pub headers: Vec<(String, String)>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub fn new(status: u16) -> Self {
        Self {
            status,
            url: None,
            headers: Vec::new(),
            content_type: None,
            body: Vec::new(),
        }
    }

    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

pub(crate) fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// How a body is shown in message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyClass {
    /// Always rendered as a hex dump.
    Binary,
    /// Rendered raw, or reformatted when beautifying.
    Markup(Markup),
    /// Rendered raw.
    Text,
}

/// Classifies a `Content-Type` value, ignoring parameters and case.
#[must_use]
pub fn classify_content_type(content_type: &str) -> BodyClass {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        "application/llsd+xml" | "application/xml" | "text/xml" => BodyClass::Markup(Markup::Xml),
        "text/html" => BodyClass::Markup(Markup::Html),
        "application/vnd.ll.mesh" | "application/octet-stream" => BodyClass::Binary,
        other
            if other.starts_with("image/")
                || other.starts_with("audio/")
                || other.ends_with("stream") =>
        {
            BodyClass::Binary
        }
        _ => BodyClass::Text,
    }
}

/// Maps capability names to URLs and back.
pub trait CapabilityResolver {
    /// Returns the URL granted for a capability name.
    fn resolve(&self, name: &str) -> Option<String>;

    /// Returns every capability name whose URL is `base_url`.
    fn names_for_url(&self, _base_url: &str) -> Vec<String> {
        Vec::new()
    }
}

/// A resolver that knows no capabilities.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCapabilities;

impl CapabilityResolver for NoCapabilities {
    fn resolve(&self, _name: &str) -> Option<String> {
        None
    }
}

/// A fixed capability table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticCapabilities {
    urls: BTreeMap<String, String>,
}

impl StaticCapabilities {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a capability.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.insert(name, url);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.urls.insert(name.into(), url.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

impl CapabilityResolver for StaticCapabilities {
    fn resolve(&self, name: &str) -> Option<String> {
        self.urls.get(name).cloned()
    }

    fn names_for_url(&self, base_url: &str) -> Vec<String> {
        self.urls
            .iter()
            .filter(|(_, url)| base_capability_url(url) == base_url)
            .map(|(name, _)| name.clone())
            .collect()
    }
}

/// Reduces a capability URL to the part that identifies the capability.
///
/// The query is dropped, and anything after the id segment of a `/cap/<id>`
/// path is cut.
#[must_use]
pub fn base_capability_url(url: &str) -> &str {
    let url = url.split_once('?').map_or(url, |(base, _)| base);
    let Some(cap) = url.find("/cap/") else {
        return url;
    };
    let id_start = cap + "/cap/".len();
    match url[id_start..].find('/') {
        Some(end) => &url[..id_start + end],
        None => url,
    }
}
