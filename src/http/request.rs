use std::collections::HashMap;
use std::fmt;

/// HTTP request methods.
///
/// Only GET and POST are served. Anything else parses into `Unsupported`
/// so the router and handlers can answer it without ever failing the parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// POST - Create or replace a resource
    POST,
    /// Any other token found in the request line
    Unsupported,
}

impl Method {
    /// Parses an HTTP method token.
    ///
    /// Matching is case-sensitive, as method tokens are.
    ///
    /// # Example
    ///
    /// ```
    /// # use warden::http::request::Method;
    /// assert_eq!(Method::from_token("GET"), Method::GET);
    /// assert_eq!(Method::from_token("get"), Method::Unsupported);
    /// ```
    pub fn from_token(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "POST" => Method::POST,
            _ => Method::Unsupported,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::Unsupported => "UNSUPPORTED",
        };
        f.write_str(s)
    }
}

/// The request headers the engine retains. Every other header is dropped
/// during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderName {
    Host,
    UserAgent,
    Accept,
    ContentType,
    ContentLength,
    AcceptEncoding,
    ContentEncoding,
}

impl HeaderName {
    pub const ALL: [HeaderName; 7] = [
        HeaderName::Host,
        HeaderName::UserAgent,
        HeaderName::Accept,
        HeaderName::ContentType,
        HeaderName::ContentLength,
        HeaderName::AcceptEncoding,
        HeaderName::ContentEncoding,
    ];

    /// Looks up a header name case-insensitively.
    ///
    /// ```
    /// # use warden::http::request::HeaderName;
    /// assert_eq!(HeaderName::from_name("user-agent"), Some(HeaderName::UserAgent));
    /// assert_eq!(HeaderName::from_name("X-Forwarded-For"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|h| h.as_str().eq_ignore_ascii_case(name.trim()))
    }

    /// Canonical wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            HeaderName::Host => "Host",
            HeaderName::UserAgent => "User-Agent",
            HeaderName::Accept => "Accept",
            HeaderName::ContentType => "Content-Type",
            HeaderName::ContentLength => "Content-Length",
            HeaderName::AcceptEncoding => "Accept-Encoding",
            HeaderName::ContentEncoding => "Content-Encoding",
        }
    }
}

impl fmt::Display for HeaderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whitelisted request headers. The first occurrence of a name wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    map: HashMap<HeaderName, String>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `value` under `name` unless the name was already seen.
    /// Returns whether the value was stored.
    pub fn insert(&mut self, name: HeaderName, value: impl Into<String>) -> bool {
        if self.map.contains_key(&name) {
            return false;
        }
        self.map.insert(name, value.into());
        true
    }

    /// Stores a raw `name: value` pair if the name is whitelisted.
    pub fn insert_raw(&mut self, name: &str, value: &str) -> bool {
        match HeaderName::from_name(name) {
            Some(name) => self.insert(name, value.trim()),
            None => false,
        }
    }

    pub fn get(&self, name: HeaderName) -> Option<&str> {
        self.map.get(&name).map(|v| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Represents a parsed HTTP request from a client.
///
/// Built once per connection by the parser and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method
    pub method: Method,
    /// The request target, always starting with `/`
    pub target: String,
    /// HTTP version (typically "HTTP/1.1")
    pub version: String,
    /// Whitelisted request headers
    pub headers: Headers,
    /// Request body, bounded by Content-Length
    pub body: Vec<u8>,
}

/// Builder for constructing Request objects.
#[derive(Default)]
pub struct RequestBuilder {
    method: Option<Method>,
    target: Option<String>,
    version: Option<String>,
    headers: Headers,
    body: Vec<u8>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Adds a header; names outside the whitelist are silently dropped.
    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert_raw(key, value);
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        let target = self.target.ok_or("target missing")?;
        if !target.starts_with('/') {
            return Err("target must start with '/'");
        }

        Ok(Request {
            method: self.method.ok_or("method missing")?,
            target,
            version: self.version.unwrap_or_else(|| "HTTP/1.1".to_string()),
            headers: self.headers,
            body: self.body,
        })
    }
}

impl Request {
    /// Retrieves a header value by name, case-insensitively.
    ///
    /// Returns `None` for names that are not retained by the parser.
    pub fn header(&self, key: &str) -> Option<&str> {
        HeaderName::from_name(key).and_then(|name| self.headers.get(name))
    }
}
