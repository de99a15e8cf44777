//! In-process HTTP server backing the transport and CLI tests.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::header::{AUTHORIZATION, LOCATION};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service_fn(route))
                        .await;
                });
            }
        });

        Self { addr, handle }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Accepts one connection, answers it with an empty 200 and yields the
/// request head exactly as it arrived on the wire.
pub async fn capture_raw_request() -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut head = Vec::new();
        let mut chunk = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let read = stream.read(&mut chunk).await.unwrap();
            if read == 0 {
                break;
            }
            head.extend_from_slice(&chunk[..read]);
        }
        stream
            .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
            .await
            .unwrap();
        String::from_utf8_lossy(&head).into_owned()
    });

    (url, handle)
}

fn text(status: StatusCode, body: String) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}

fn redirect(status: StatusCode, location: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(LOCATION, location)
        .body(Full::new(Bytes::new()))
        .unwrap()
}

async fn route(request: Request<Incoming>) -> Result<Response<Full<Bytes>>, Infallible> {
    let path = request.uri().path().to_string();
    let response = match path.as_str() {
        "/download" => text(StatusCode::OK, "this is a response".to_string()),
        "/upload" => {
            let body = request.into_body().collect().await.unwrap().to_bytes();
            text(
                StatusCode::OK,
                format!("JSON request received: {} bytes", body.len()),
            )
        }
        "/echo-method" => text(StatusCode::OK, request.method().to_string()),
        "/redirect" => redirect(StatusCode::MOVED_PERMANENTLY, "/new-url"),
        "/new-url" => text(StatusCode::OK, "redirected resource".to_string()),
        "/chain/start" => redirect(StatusCode::FOUND, "/chain/middle"),
        "/chain/middle" => redirect(StatusCode::FOUND, "/chain/end"),
        "/chain/end" => text(StatusCode::OK, "final resource".to_string()),
        "/loop" => redirect(StatusCode::FOUND, "/loop"),
        "/bad-redirect" => redirect(StatusCode::FOUND, "ftp://x/y"),
        "/debug-header-response" => {
            let headers: Vec<String> = request
                .headers()
                .iter()
                .filter(|(name, _)| name.as_str().starts_with("debug-"))
                .map(|(name, value)| format!("{}={}", name, value.to_str().unwrap_or_default()))
                .collect();
            text(StatusCode::OK, headers.join(" "))
        }
        "/debug-basicauth" => {
            let credentials = request
                .headers()
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.strip_prefix("Basic "))
                .and_then(|token| STANDARD.decode(token).ok())
                .and_then(|decoded| String::from_utf8(decoded).ok())
                .and_then(|decoded| {
                    decoded
                        .split_once(':')
                        .map(|(user, pass)| format!("{}={}", user, pass))
                });
            match credentials {
                Some(pair) => text(StatusCode::OK, pair),
                None => text(
                    StatusCode::BAD_REQUEST,
                    "Basic auth missing/malformed".to_string(),
                ),
            }
        }
        "/slow" => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            text(StatusCode::OK, "slow".to_string())
        }
        _ => text(StatusCode::NOT_FOUND, "404 page not found".to_string()),
    };
    Ok(response)
}
