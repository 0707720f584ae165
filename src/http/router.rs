use crate::http::request::Request;

const ECHO_PREFIX: &str = "/echo/";
const FILES_PREFIX: &str = "/files/";

/// What a request target points at. Parameters carried by a path segment
/// live inside the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceKind {
    /// `/` or `/index.html`
    Root,
    /// `/echo/<text>`
    Echo(String),
    /// `/user-agent`
    UserAgent,
    /// `/files/<name>`
    File(String),
    Unknown,
}

impl ResourceKind {
    /// Matches a target against the fixed route list, first match wins.
    ///
    /// Matching is on the path alone; the method only decides what a
    /// handler does with the resource.
    ///
    /// ```
    /// # use warden::http::router::ResourceKind;
    /// assert_eq!(ResourceKind::from_target("/index.html"), ResourceKind::Root);
    /// assert_eq!(
    ///     ResourceKind::from_target("/echo/abc"),
    ///     ResourceKind::Echo("abc".into())
    /// );
    /// ```
    pub fn from_target(target: &str) -> Self {
        if target == "/" || target == "/index.html" {
            ResourceKind::Root
        } else if let Some(text) = target.strip_prefix(ECHO_PREFIX) {
            ResourceKind::Echo(text.to_string())
        } else if target == "/user-agent" {
            ResourceKind::UserAgent
        } else if let Some(name) = target.strip_prefix(FILES_PREFIX) {
            ResourceKind::File(name.to_string())
        } else {
            ResourceKind::Unknown
        }
    }
}

pub fn route(request: &Request) -> ResourceKind {
    ResourceKind::from_target(&request.target)
}
