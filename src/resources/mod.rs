//! Resource handlers.
//!
//! `Resources` is the handler registry: it is built once from the
//! configuration, shared read-only by every connection, and turns a parsed
//! request into a response by matching on the routed `ResourceKind`.

pub mod files;

use std::path::PathBuf;

use tracing::info;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::http::encoding;
use crate::http::request::{HeaderName, Headers, Method, Request};
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::http::router::{self, ResourceKind};

pub use files::FileStore;

const TEXT_PLAIN: &str = "text/plain";
const OCTET_STREAM: &str = "application/octet-stream";

#[derive(Debug, Clone, Default)]
pub struct Resources {
    files: Option<FileStore>,
}

impl Resources {
    /// Creates the registry. File routes answer 404 when `files_root` is
    /// `None`.
    pub fn new(files_root: Option<PathBuf>) -> Self {
        Self {
            files: files_root.map(FileStore::new),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.files.directory.clone())
    }

    pub fn files(&self) -> Option<&FileStore> {
        self.files.as_ref()
    }

    /// Routes and serves one request.
    pub async fn handle(&self, request: &Request) -> Result<Response> {
        let kind = router::route(request);

        let response = match (kind, request.method) {
            (ResourceKind::Unknown, _) => return Err(Error::ResourceNotFound),
            (ResourceKind::Root, Method::GET) => root(),
            (ResourceKind::Echo(text), Method::GET) => echo(&text, &request.headers)?,
            (ResourceKind::UserAgent, Method::GET) => user_agent(&request.headers)?,
            (ResourceKind::File(name), Method::GET) => self.read_file(&name).await?,
            (ResourceKind::File(name), Method::POST) => {
                self.write_file(&name, &request.body).await?
            }
            (_, method) => return Err(Error::UnsupportedMethod(method)),
        };

        info!(
            method = %request.method,
            target = %request.target,
            status = response.status.as_u16(),
            "request served"
        );
        Ok(response)
    }

    async fn read_file(&self, name: &str) -> Result<Response> {
        let store = self.files.as_ref().ok_or(Error::ResourceNotFound)?;
        let contents = store.read(name).await?;

        Ok(ResponseBuilder::new(StatusCode::Ok)
            .content(OCTET_STREAM, contents)
            .build())
    }

    async fn write_file(&self, name: &str, body: &[u8]) -> Result<Response> {
        let store = self.files.as_ref().ok_or(Error::ResourceNotFound)?;
        store.write(name, body).await?;

        Ok(Response::created())
    }
}

pub fn root() -> Response {
    Response::ok()
}

/// Echoes `text` back, gzip-compressed when the client accepts it.
pub fn echo(text: &str, headers: &Headers) -> Result<Response> {
    let builder = ResponseBuilder::new(StatusCode::Ok);

    let response = match encoding::negotiate(headers) {
        Some(coding) => {
            let encoded = coding.encode(text.as_bytes())?;
            builder
                .header("Content-Type", TEXT_PLAIN)
                .header("Content-Encoding", coding.as_str())
                .header("Content-Length", encoded.len().to_string())
                .body(encoded)
        }
        None => builder.content(TEXT_PLAIN, text.as_bytes().to_vec()),
    };

    Ok(response.build())
}

pub fn user_agent(headers: &Headers) -> Result<Response> {
    let agent = headers
        .get(HeaderName::UserAgent)
        .ok_or(Error::MissingHeader(HeaderName::UserAgent))?;

    Ok(ResponseBuilder::new(StatusCode::Ok)
        .content(TEXT_PLAIN, agent.as_bytes().to_vec())
        .build())
}
