//! Request pipeline errors.

use crate::http::parser::ParseError;
use crate::http::request::{HeaderName, Method};
use crate::http::response::Response;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedRequest,
    MissingHeader,
    ResourceNotFound,
    UnsupportedMethod,
    IoFailure,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed request: {0}")]
    MalformedRequest(#[from] ParseError),

    #[error("missing required header {0}")]
    MissingHeader(HeaderName),

    #[error("resource not found")]
    ResourceNotFound,

    #[error("method {0} not supported on this resource")]
    UnsupportedMethod(Method),

    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MalformedRequest(_) => ErrorKind::MalformedRequest,
            Error::MissingHeader(_) => ErrorKind::MissingHeader,
            Error::ResourceNotFound => ErrorKind::ResourceNotFound,
            Error::UnsupportedMethod(_) => ErrorKind::UnsupportedMethod,
            Error::Io(_) => ErrorKind::IoFailure,
        }
    }

    /// The response a client gets for this error, if any.
    ///
    /// A malformed request gets nothing back; everything else is a 404.
    pub fn to_response(&self) -> Option<Response> {
        match self.kind() {
            ErrorKind::MalformedRequest => None,
            ErrorKind::MissingHeader
            | ErrorKind::ResourceNotFound
            | ErrorKind::UnsupportedMethod
            | ErrorKind::IoFailure => Some(Response::not_found()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
