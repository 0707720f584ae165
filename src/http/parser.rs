use crate::http::request::{HeaderName, Headers, Method, Request};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("request line is not `METHOD target HTTP-version`")]
    InvalidRequestLine,
    #[error("request head is not valid UTF-8")]
    InvalidUtf8,
    #[error("Content-Length is not a number")]
    InvalidContentLength,
}

/// Decodes one complete request out of a single read.
///
/// Everything after the request line up to the first blank line is the
/// header block; lines without a colon are skipped. If the blank line never
/// arrives the whole remainder is treated as headers and the body is empty.
/// When Content-Length is present it bounds the body and trailing bytes are
/// dropped. A body shorter than announced is kept as received.
pub fn parse_http_request(buf: &[u8]) -> Result<Request, ParseError> {
    let (head, body_bytes) = match find_headers_end(buf) {
        Some(end) => (&buf[..end], &buf[end + 4..]),
        None => (buf, &[][..]),
    };

    let head = std::str::from_utf8(head).map_err(|_| ParseError::InvalidUtf8)?;
    let mut lines = head.split("\r\n");

    // Request line
    let request_line = lines.next().ok_or(ParseError::InvalidRequestLine)?;
    let (method, target, version) = parse_request_line(request_line)?;

    // Headers
    let mut headers = Headers::new();
    for line in lines {
        if line.is_empty() {
            break;
        }
        if let Some((key, value)) = line.split_once(':') {
            headers.insert_raw(key, value);
        }
    }

    // Body
    let body = match headers.get(HeaderName::ContentLength) {
        Some(v) => {
            let declared = v
                .parse::<usize>()
                .map_err(|_| ParseError::InvalidContentLength)?;
            body_bytes[..declared.min(body_bytes.len())].to_vec()
        }
        None => Vec::new(),
    };

    Ok(Request {
        method,
        target: target.to_string(),
        version: version.to_string(),
        headers,
        body,
    })
}

fn parse_request_line(line: &str) -> Result<(Method, &str, &str), ParseError> {
    let mut parts = line.split(' ');

    let method = parts.next().filter(|m| !m.is_empty());
    let target = parts.next().filter(|t| t.starts_with('/'));
    let version = parts.next().filter(|v| v.starts_with("HTTP/"));

    match (method, target, version, parts.next()) {
        (Some(m), Some(t), Some(v), None) => Ok((Method::from_token(m), t, v)),
        _ => Err(ParseError::InvalidRequestLine),
    }
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";

        let parsed = parse_http_request(req).unwrap();

        assert_eq!(parsed.target, "/");
        assert_eq!(parsed.headers.get(HeaderName::Host), Some("example.com"));
    }

    #[test]
    fn request_line_needs_exactly_three_parts() {
        assert!(parse_request_line("GET /").is_err());
        assert!(parse_request_line("GET / HTTP/1.1 extra").is_err());
        assert!(parse_request_line("GET  / HTTP/1.1").is_err());
        assert!(parse_request_line("GET / HTTP/1.1").is_ok());
    }
}
