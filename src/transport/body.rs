//! Buffer-and-replay of message bodies.
//!
//! A body inspected for tracing is collected once and handed on as a
//! [`Replay`] that yields exactly the same data and trailers. The size hint
//! is exact only when the source's was, so the wire framing (Content-Length
//! vs chunked) matches an untraced send. A body that fails mid-read replays
//! the failure instead of truncated data.

use bytes::Bytes;
use http::HeaderMap;
use http_body::{Body, Frame, SizeHint};
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::BodyExt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use crate::trace::dump::DumpError;
use crate::{BoxError, SharedError};

/// Body type flowing through the tracing transport in both directions.
pub type TraceBody = UnsyncBoxBody<Bytes, BoxError>;

/// Erase a body's concrete type without reading it.
pub fn boxed<B>(body: B) -> TraceBody
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    body.map_err(Into::into).boxed_unsync()
}

/// Read `body` to the end. Returns the replacement body and, on success, the bytes read.
pub async fn buffer<B>(body: B) -> (TraceBody, Result<Bytes, DumpError>)
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    let sized = body.size_hint().exact().is_some();

    match body.collect().await {
        Ok(collected) => {
            let trailers = collected.trailers().cloned();
            let data = collected.to_bytes();
            let replay = Replay {
                data: Some(data.clone()),
                trailers,
                error: None,
                sized,
            };
            (replay.boxed_unsync(), Ok(data))
        }
        Err(e) => {
            let boxed: BoxError = e.into();
            let shared: SharedError = Arc::from(boxed);
            let replay = Replay {
                data: None,
                trailers: None,
                error: Some(shared.clone()),
                sized,
            };
            (replay.boxed_unsync(), Err(DumpError::Body(shared)))
        }
    }
}

/// A fully buffered body.
#[derive(Debug)]
pub struct Replay {
    data: Option<Bytes>,
    trailers: Option<HeaderMap>,
    error: Option<SharedError>,
    /// Whether the source body had a known length.
    sized: bool,
}

impl Body for Replay {
    type Data = Bytes;
    type Error = BoxError;

    fn poll_frame(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();

        if let Some(data) = this.data.take().filter(|d| !d.is_empty()) {
            return Poll::Ready(Some(Ok(Frame::data(data))));
        }
        if let Some(err) = this.error.take() {
            let err: BoxError = Box::new(err);
            return Poll::Ready(Some(Err(err)));
        }
        if let Some(trailers) = this.trailers.take() {
            return Poll::Ready(Some(Ok(Frame::trailers(trailers))));
        }
        Poll::Ready(None)
    }

    fn is_end_stream(&self) -> bool {
        self.data.as_ref().map_or(true, Bytes::is_empty)
            && self.trailers.is_none()
            && self.error.is_none()
    }

    fn size_hint(&self) -> SizeHint {
        if self.error.is_some() {
            return SizeHint::default();
        }
        let remaining = self.data.as_ref().map_or(0, |d| d.len() as u64);
        if self.sized {
            return SizeHint::with_exact(remaining);
        }
        let mut hint = SizeHint::new();
        hint.set_lower(remaining);
        hint
    }
}
