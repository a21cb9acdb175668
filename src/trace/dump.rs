//! Textual HTTP/1.x rendering of requests and responses for trace output.
//!
//! Header names are printed in canonical form (`Content-Type`) and sorted so
//! that dumps are stable regardless of insertion order. Bodies are rendered
//! as lossy UTF-8.

use http::header::{HeaderMap, HOST, TRAILER, TRANSFER_ENCODING};
use http::{request, response};
use thiserror::Error;

use crate::SharedError;

#[derive(Debug, Error)]
pub enum DumpError {
    #[error("failed to read body: {0}")]
    Body(#[source] SharedError),
}

/// `content-type` -> `Content-Type`, `x-auth-token` -> `X-Auth-Token`.
pub fn canonical_header_key(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if upper {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        upper = c == '-';
    }
    out
}

fn write_headers(out: &mut String, headers: &HeaderMap, skip: &[&http::HeaderName]) {
    let mut lines: Vec<(String, String)> = headers
        .iter()
        .filter(|(name, _)| !skip.contains(name))
        .map(|(name, value)| {
            (
                canonical_header_key(name.as_str()),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    // Stable sort keeps repeated values of one header in their original order.
    lines.sort_by(|a, b| a.0.cmp(&b.0));

    for (name, value) in lines {
        out.push_str(&name);
        out.push_str(": ");
        out.push_str(&value);
        out.push_str("\r\n");
    }
}

/// Render the request line, `Host`, the remaining headers and, when given, the body.
pub fn dump_request(parts: &request::Parts, body: Option<&[u8]>) -> String {
    let mut out = String::new();

    let target = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .filter(|pq| !pq.is_empty())
        .unwrap_or("/");
    out.push_str(&format!("{} {} {:?}\r\n", parts.method, target, parts.version));

    let host = parts
        .headers
        .get(HOST)
        .map(|h| String::from_utf8_lossy(h.as_bytes()).into_owned())
        .or_else(|| parts.uri.authority().map(|a| a.to_string()));
    if let Some(host) = host.filter(|h| !h.is_empty()) {
        out.push_str(&format!("Host: {host}\r\n"));
    }

    write_headers(&mut out, &parts.headers, &[&HOST, &TRANSFER_ENCODING, &TRAILER]);
    out.push_str("\r\n");

    if let Some(body) = body {
        out.push_str(&String::from_utf8_lossy(body));
    }
    out
}

/// Render the status line, headers and body.
pub fn dump_response(parts: &response::Parts, body: &[u8]) -> String {
    let mut out = String::new();

    let status = match parts.status.canonical_reason() {
        Some(reason) => format!("{} {}", parts.status.as_str(), reason),
        None => parts.status.as_str().to_string(),
    };
    out.push_str(&format!("{:?} {}\r\n", parts.version, status));

    write_headers(&mut out, &parts.headers, &[]);
    out.push_str("\r\n");
    out.push_str(&String::from_utf8_lossy(body));
    out
}
