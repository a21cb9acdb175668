//! Trace logging transport.
//!
//! # Responsibilities
//! - Decorate any request executor (`tower::Service`) with trace output
//! - Dump each request before it is sent and each response once headers arrive
//! - Hide multipart request bodies and redact credentials in both dumps
//! - Pass requests, responses and executor errors through unchanged
//!
//! # Data Flow
//! ```text
//! caller ── Request<B> ──▶ TraceLoggingTransport ── Request<TraceBody> ──▶ executor
//!                              │  start stamp, request dump                 │
//!                              │                                            │
//! caller ◀─ Response<TraceBody> ┤  end stamp, response dump, elapsed ◀───────┘
//!                              ▼
//!                            sink
//! ```
//!
//! # Design Decisions
//! - Composition over the executor; the default executor is chosen explicitly
//! - Bodies are buffered only for dumping and replayed byte-for-byte
//! - Dump failures are logged, never returned; executor errors are returned as is
//! - With a disabled sink nothing is buffered or formatted
//!
//! # Example
//! ```no_run
//! use http_body_util::Full;
//! use bytes::Bytes;
//! use tower::ServiceExt;
//! use trace_transport::trace::{sink::WriterSink, Tracer};
//! use trace_transport::TraceLoggingTransport;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let transport = TraceLoggingTransport::with_default_client(Tracer::new(WriterSink::stderr()));
//! let request = http::Request::get("http://www.example.com/")
//!     .body(Full::new(Bytes::new()))?;
//! let response = transport.oneshot(request).await?;
//! println!("{}", response.status());
//! # Ok(())
//! # }
//! ```

pub mod body;
pub mod client;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, Request, Response};
use http_body::Body;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tower::{Layer, Service};

use crate::trace::{dump, Tracer};
use crate::BoxError;
use body::TraceBody;
use client::{default_client, HttpClient};

const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// Matches on the raw header bytes; values with non-ASCII bytes still count.
fn is_multipart(headers: &HeaderMap) -> bool {
    let needle = MULTIPART_FORM_DATA.as_bytes();
    headers
        .get(CONTENT_TYPE)
        .is_some_and(|v| v.as_bytes().windows(needle.len()).any(|w| w == needle))
}

/// Wraps an executor and writes a trace record for every round trip.
#[derive(Debug, Clone)]
pub struct TraceLoggingTransport<S> {
    inner: S,
    tracer: Tracer,
}

impl<S> TraceLoggingTransport<S> {
    pub fn new(inner: S, tracer: Tracer) -> Self {
        Self { inner, tracer }
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl TraceLoggingTransport<HttpClient> {
    /// Transport over [`default_client`], resolved once here.
    pub fn with_default_client(tracer: Tracer) -> Self {
        Self::new(default_client(), tracer)
    }
}

impl<S, F, B, ResBody> Service<Request<B>> for TraceLoggingTransport<S>
where
    S: Service<Request<TraceBody>, Response = Response<ResBody>, Future = F> + Clone + Send + 'static,
    F: Future<Output = Result<Response<ResBody>, S::Error>> + Send + 'static,
    S::Error: Send + 'static,
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
    ResBody: Body<Data = Bytes> + Send + 'static,
    ResBody::Error: Into<BoxError>,
{
    type Response = Response<TraceBody>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<B>) -> Self::Future {
        // The readied executor serves this call; a fresh clone stays behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let tracer = self.tracer.clone();

        Box::pin(async move {
            if !tracer.is_enabled() {
                let response = inner.call(request.map(body::boxed)).await?;
                return Ok(response.map(body::boxed));
            }

            let start = tracer.now();
            let (parts, req_body) = request.into_parts();
            let show_body = !is_multipart(&parts.headers);

            let (forward_body, request_dump) = if show_body {
                let (replay, read) = body::buffer(req_body).await;
                (replay, read.map(|bytes| dump::dump_request(&parts, Some(&bytes[..]))))
            } else {
                (body::boxed(req_body), Ok(dump::dump_request(&parts, None)))
            };
            tracer.trace_request(&start, request_dump, !show_body);

            let response = inner.call(Request::from_parts(parts, forward_body)).await?;

            let end = tracer.now();
            let (parts, res_body) = response.into_parts();
            let (replay, read) = body::buffer(res_body).await;
            tracer.trace_response(&start, &end, read.map(|bytes| dump::dump_response(&parts, &bytes)));

            Ok(Response::from_parts(parts, replay))
        })
    }
}

/// [`Layer`] that wraps executors in a [`TraceLoggingTransport`].
#[derive(Debug, Clone, Default)]
pub struct TraceLoggingLayer {
    tracer: Tracer,
}

impl TraceLoggingLayer {
    pub fn new(tracer: Tracer) -> Self {
        Self { tracer }
    }
}

impl<S> Layer<S> for TraceLoggingLayer {
    type Service = TraceLoggingTransport<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TraceLoggingTransport::new(inner, self.tracer.clone())
    }
}
