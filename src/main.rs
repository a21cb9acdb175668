//! trace-fetch: send one HTTP request through the trace logging transport.
//!
//! ```text
//! trace-fetch -X POST -H 'Authorization: Bearer t0k3n' -d 'a=1&b=2' \
//!     --trace stderr http://localhost:8080/login
//! ```
//!
//! Trace records go to the configured output, the response status to
//! stderr and the response body to stdout.

use bytes::Bytes;
use clap::Parser;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{Method, Request};
use http_body_util::{BodyExt, Full};
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use tower::ServiceExt;

use trace_transport::config::{load_config, load_default};
use trace_transport::observability::logging::init_logging;
use trace_transport::{BoxError, TraceLoggingTransport, Tracer};

#[derive(Parser, Debug)]
#[command(name = "trace-fetch")]
#[command(about = "Send an HTTP request and trace the round trip", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Request method.
    #[arg(short = 'X', long, default_value = "GET")]
    method: String,

    /// Request header as 'Name: value'. Repeatable.
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,

    /// Request body.
    #[arg(short, long)]
    data: Option<String>,

    /// Enable tracing to stdout, stderr, log or a file path.
    #[arg(long)]
    trace: Option<String>,

    /// Target URL (http only).
    url: String,
}

fn build_request(cli: &Cli) -> Result<Request<Full<Bytes>>, BoxError> {
    let method = Method::from_bytes(cli.method.to_ascii_uppercase().as_bytes())?;
    let mut builder = Request::builder().method(method).uri(cli.url.as_str());

    for raw in &cli.headers {
        let (name, value) = raw
            .split_once(':')
            .ok_or_else(|| format!("header '{raw}' is not in 'Name: value' form"))?;
        builder = builder.header(
            HeaderName::from_bytes(name.trim().as_bytes())?,
            HeaderValue::from_str(value.trim())?,
        );
    }

    let body = match &cli.data {
        Some(data) => {
            let has_content_type = builder
                .headers_ref()
                .is_some_and(|headers| headers.contains_key(CONTENT_TYPE));
            if !has_content_type {
                builder = builder.header(CONTENT_TYPE, "application/x-www-form-urlencoded");
            }
            Bytes::from(data.clone())
        }
        None => Bytes::new(),
    };

    Ok(builder.body(Full::new(body))?)
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => load_default()?,
    };
    if let Some(output) = &cli.trace {
        config.trace.enabled = true;
        config.trace.output = output.clone();
    }

    init_logging(&config.observability);

    let tracer = Tracer::from_config(&config)?;
    tracing::debug!(tracer = ?tracer, url = %cli.url, "Sending request");

    let transport = TraceLoggingTransport::with_default_client(tracer);
    let request = build_request(&cli)?;
    let response = transport.oneshot(request).await?;

    eprintln!("{}", response.status());
    let body = response.into_body().collect().await?.to_bytes();

    let mut stdout = tokio::io::stdout();
    stdout.write_all(&body).await?;
    stdout.flush().await?;
    Ok(())
}
