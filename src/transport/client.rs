//! Default executor: a hyper-util client over plain TCP.

use http::Response;
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::transport::body::TraceBody;

/// Executor used when no other one is supplied.
pub type HttpClient = Client<HttpConnector, TraceBody>;

/// What [`HttpClient`] answers with before the transport buffers the body.
pub type ClientResponse = Response<Incoming>;

/// Build the default HTTP/1.1 + HTTP/2 client.
pub fn default_client() -> HttpClient {
    Client::builder(TokioExecutor::new()).build(HttpConnector::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::body;
    use bytes::Bytes;
    use http::Request;
    use http_body_util::{BodyExt, Empty};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_default_client_streams_incoming_body() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let _ = socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok")
                .await;
        });

        let request = Request::get(format!("http://{addr}/"))
            .body(body::boxed(Empty::<Bytes>::new()))
            .unwrap();
        let response: ClientResponse = default_client().request(request).await.unwrap();

        assert_eq!(response.status(), http::StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(bytes, Bytes::from_static(b"ok"));
    }
}
