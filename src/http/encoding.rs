//! Content-encoding negotiation.
//!
//! `gzip` is the only coding the server knows how to produce. Negotiation
//! looks at the `Accept-Encoding` tokens and, when gzip was asked for, the
//! body is compressed for real so that `Content-Length` always describes the
//! bytes on the wire.

use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;

use crate::http::request::{HeaderName, Headers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    Gzip,
}

impl ContentEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentEncoding::Gzip => "gzip",
        }
    }

    /// Encodes `body` with this coding.
    pub fn encode(&self, body: &[u8]) -> std::io::Result<Vec<u8>> {
        match self {
            ContentEncoding::Gzip => {
                let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(body)?;
                encoder.finish()
            }
        }
    }
}

/// Returns true if `gzip` is among the codings in an `Accept-Encoding`
/// value. Codings may be separated by commas or whitespace.
///
/// Tokens are compared case-insensitively and `;q=` parameters are
/// stripped. `gzip;q=0` is an explicit refusal.
///
/// ```
/// # use warden::http::encoding::accepts_gzip;
/// assert!(accepts_gzip("deflate, gzip"));
/// assert!(accepts_gzip("deflate gzip"));
/// assert!(!accepts_gzip("gzip;q=0, br"));
/// assert!(!accepts_gzip("invalid-encoding"));
/// ```
pub fn accepts_gzip(accept_encoding: &str) -> bool {
    accept_encoding.split(',').any(|item| {
        let (codings, params) = item.split_once(';').unwrap_or((item, ""));
        let mut tokens = codings.split_whitespace().peekable();

        while let Some(token) = tokens.next() {
            if !token.eq_ignore_ascii_case("gzip") {
                continue;
            }
            // parameters bind to the last coding before the `;`
            let refused = tokens.peek().is_none() && params.split(';').any(is_zero_quality);
            if !refused {
                return true;
            }
        }
        false
    })
}

fn is_zero_quality(param: &str) -> bool {
    match param.trim().split_once('=') {
        Some((key, value)) if key.trim().eq_ignore_ascii_case("q") => {
            value.trim().parse::<f32>().is_ok_and(|q| q == 0.0)
        }
        _ => false,
    }
}

/// Picks the response coding for a request, if any.
pub fn negotiate(headers: &Headers) -> Option<ContentEncoding> {
    headers
        .get(HeaderName::AcceptEncoding)
        .filter(|value| accepts_gzip(value))
        .map(|_| ContentEncoding::Gzip)
}
