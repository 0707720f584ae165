use std::sync::Arc;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, warn};

use crate::error::{Error, ErrorKind};
use crate::http::parser::parse_http_request;
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::resources::Resources;

pub const DEFAULT_READ_BUFFER_SIZE: usize = 4096;

pub struct Connection<S> {
    stream: S,
    resources: Arc<Resources>,
    buffer: BytesMut,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, resources: Arc<Resources>) -> Self {
        Self::with_buffer_size(stream, resources, DEFAULT_READ_BUFFER_SIZE)
    }

    /// `read_buffer_size` bounds the single read a request must fit in.
    pub fn with_buffer_size(stream: S, resources: Arc<Resources>, read_buffer_size: usize) -> Self {
        Self {
            stream,
            resources,
            buffer: BytesMut::with_capacity(read_buffer_size),
            state: ConnectionState::Reading,
        }
    }

    /// Serves exactly one request, then closes.
    ///
    /// Errors raised while parsing or handling are dealt with here. Only
    /// transport failures are returned to the caller.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await? {
                        Some(req) => ConnectionState::Processing(req),
                        None => ConnectionState::Closed,
                    };
                }

                ConnectionState::Processing(req) => {
                    let response = Self::handle_request(&self.resources, &req).await;
                    self.state = ConnectionState::Writing(ResponseWriter::new(&response));
                }

                ConnectionState::Writing(mut writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    self.stream.shutdown().await?;
                    // no keep-alive
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Performs the one read a request gets. Returns `None` when the peer
    /// sent nothing or the bytes do not form a request.
    pub async fn read_request(&mut self) -> anyhow::Result<Option<Request>> {
        let n = self.stream.read_buf(&mut self.buffer).await?;

        if n == 0 {
            debug!("client closed connection before sending a request");
            return Ok(None);
        }

        match parse_http_request(&self.buffer) {
            Ok(request) => Ok(Some(request)),
            Err(e) => {
                let err = Error::from(e);
                warn!(error = %err, bytes = n, "dropping connection");
                Ok(None)
            }
        }
    }

    async fn handle_request(resources: &Resources, req: &Request) -> Response {
        match resources.handle(req).await {
            Ok(response) => response,
            Err(err) => {
                match err.kind() {
                    ErrorKind::IoFailure => {
                        error!(method = %req.method, target = %req.target, error = %err, "request failed")
                    }
                    _ => {
                        warn!(method = %req.method, target = %req.target, error = %err, "request rejected")
                    }
                }
                err.to_response().unwrap_or_else(Response::not_found)
            }
        }
    }
}
