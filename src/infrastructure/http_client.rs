use crate::application::redirect_policy::RedirectPolicy;
use crate::application::services::{HttpClient, HttpRequestService};
use crate::domain::entities::{Method as DomainMethod, Request, Response};
use crate::domain::errors::HttpError;

use async_trait::async_trait;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::header::{
    AUTHORIZATION, CONTENT_TYPE, HOST, HeaderMap, HeaderName, HeaderValue, LOCATION, USER_AGENT,
};
use hyper::{Method, Request as HyperRequest, StatusCode};
use hyper_util::rt::TokioIo;
use log::debug;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_native_tls::{TlsConnector, native_tls};

const DEFAULT_USER_AGENT: &str = concat!("mync/", env!("CARGO_PKG_VERSION"));

/// Infrastructure implementation of HttpClient using Hyper
///
/// Every hop opens its own HTTP/1.1 connection (TLS for `https`) and closes
/// it once the response body is read. There is no pooling.
pub struct HyperHttpClient {
    timeout: Option<Duration>,
}

impl HyperHttpClient {
    pub fn new() -> Self {
        Self { timeout: None }
    }

    /// Bounds the whole exchange, redirect hops included.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Creates a configured HTTP request service using this client
    pub fn create_request_service(self) -> HttpRequestService {
        HttpRequestService::new(Box::new(self))
    }
}

impl Default for HyperHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for HyperHttpClient {
    async fn send(&self, request: Request, policy: RedirectPolicy) -> Result<Response, HttpError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.follow(request, policy))
                .await
                .map_err(|_| HttpError::Timeout(limit))?,
            None => self.follow(request, policy).await,
        }
    }
}

impl HyperHttpClient {
    async fn follow(&self, mut request: Request, policy: RedirectPolicy) -> Result<Response, HttpError> {
        let mut followed = 0;

        loop {
            let response = self.round_trip(&request).await?;
            let Some(location) = RedirectAdapter::location(&response) else {
                return Ok(response.into_domain_response());
            };

            let next_url = request.url.join(location)?;
            let next = request.redirected(response.status, next_url);
            policy.check(next.method, &next.url, followed)?;

            debug!("Following {} redirect to {}", response.status, next.url.as_str());
            request = next;
            followed += 1;
        }
    }

    async fn round_trip(&self, request: &Request) -> Result<RawResponse, HttpError> {
        let hyper_request = RequestAdapter::to_hyper_request(request)?;
        let host = request.url.host();
        let port = request.url.port();

        debug!("Connecting to {}:{}", host, port);
        let tcp = TcpStream::connect((host, port))
            .await
            .map_err(|source| HttpError::Connect {
                address: format!("{}:{}", host, port),
                source,
            })?;

        if request.url.is_https() {
            let stream = TlsAdapter::connect(host, tcp).await?;
            Self::exchange(stream, hyper_request).await
        } else {
            Self::exchange(tcp, hyper_request).await
        }
    }

    async fn exchange<S>(stream: S, request: HyperRequest<Full<Bytes>>) -> Result<RawResponse, HttpError>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let (mut sender, connection) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
            .await
            .map_err(|e| HttpError::Protocol(e.to_string()))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                debug!("Connection closed with error: {}", e);
            }
        });

        let response = sender
            .send_request(request)
            .await
            .map_err(|e| HttpError::Protocol(e.to_string()))?;

        ResponseAdapter::collect(response).await
    }
}

/// A response with its body already read, before redirect handling
struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl RawResponse {
    fn into_domain_response(self) -> Response {
        Response {
            status: self.status,
            body: self.body,
        }
    }
}

/// Adapter for converting domain requests to Hyper requests
struct RequestAdapter;

impl RequestAdapter {
    fn to_hyper_request(request: &Request) -> Result<HyperRequest<Full<Bytes>>, HttpError> {
        let mut builder = HyperRequest::builder()
            .method(MethodAdapter::to_hyper_method(request.method))
            .uri(request.url.request_target());

        builder = HeaderAdapter::add_default(builder, request, HOST, || {
            HeaderValue::from_str(request.url.authority())
                .map_err(|e| HttpError::Protocol(format!("Invalid Host header: {}", e)))
        })?;
        builder = HeaderAdapter::add_default(builder, request, USER_AGENT, || {
            Ok(HeaderValue::from_static(DEFAULT_USER_AGENT))
        })?;
        builder = HeaderAdapter::add_json_content_type(builder, request);

        if let Some(credentials) = &request.basic_auth {
            builder = builder.header(AUTHORIZATION, credentials.header_value()?);
        }

        for header in &request.headers {
            builder = builder.header(header.name.clone(), header.value.clone());
        }

        builder
            .body(BodyAdapter::to_hyper_body(&request.body))
            .map_err(|e| HttpError::Protocol(format!("Failed to build HTTP request: {}", e)))
    }
}

/// Adapter for reading Hyper responses
struct ResponseAdapter;

impl ResponseAdapter {
    async fn collect(response: hyper::Response<Incoming>) -> Result<RawResponse, HttpError> {
        let (parts, body) = response.into_parts();
        let body = body
            .collect()
            .await
            .map_err(|e| HttpError::Protocol(format!("Failed to read response body: {}", e)))?
            .to_bytes();

        Ok(RawResponse {
            status: parts.status,
            headers: parts.headers,
            body,
        })
    }
}

/// Adapter for spotting redirect responses
struct RedirectAdapter;

impl RedirectAdapter {
    /// `Location` of a followable redirect, if `response` is one.
    fn location(response: &RawResponse) -> Option<&str> {
        match response.status {
            StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT => response
                .headers
                .get(LOCATION)
                .and_then(|value| value.to_str().ok()),
            _ => None,
        }
    }
}

/// Adapter for wrapping TCP streams in TLS
struct TlsAdapter;

impl TlsAdapter {
    async fn connect(
        host: &str,
        tcp: TcpStream,
    ) -> Result<tokio_native_tls::TlsStream<TcpStream>, HttpError> {
        let tls_error = |reason: String| HttpError::Tls {
            host: host.to_string(),
            reason,
        };

        let connector = native_tls::TlsConnector::new().map_err(|e| tls_error(e.to_string()))?;
        TlsConnector::from(connector)
            .connect(host, tcp)
            .await
            .map_err(|e| tls_error(e.to_string()))
    }
}

/// Adapter for converting domain HTTP methods to Hyper methods
struct MethodAdapter;

impl MethodAdapter {
    fn to_hyper_method(domain_method: DomainMethod) -> Method {
        match domain_method {
            DomainMethod::Get => Method::GET,
            DomainMethod::Post => Method::POST,
            DomainMethod::Head => Method::HEAD,
        }
    }
}

/// Adapter for converting domain request bodies to Hyper bodies
struct BodyAdapter;

impl BodyAdapter {
    fn to_hyper_body(domain_body: &Option<Bytes>) -> Full<Bytes> {
        match domain_body {
            Some(bytes) => Full::new(bytes.clone()),
            None => Full::new(Bytes::new()),
        }
    }
}

/// Adapter for handling HTTP headers
struct HeaderAdapter;

impl HeaderAdapter {
    fn user_supplied(request: &Request, name: &HeaderName) -> bool {
        request.headers.iter().any(|h| h.name == *name)
    }

    /// Sets `name` to the default value unless a `-header` entry provides it.
    fn add_default(
        builder: http::request::Builder,
        request: &Request,
        name: HeaderName,
        value: impl FnOnce() -> Result<HeaderValue, HttpError>,
    ) -> Result<http::request::Builder, HttpError> {
        if Self::user_supplied(request, &name) {
            Ok(builder)
        } else {
            Ok(builder.header(name, value()?))
        }
    }

    /// Bodies are sent as JSON unless the user picked a content type.
    fn add_json_content_type(builder: http::request::Builder, request: &Request) -> http::request::Builder {
        if request.body.is_some() && !Self::user_supplied(request, &CONTENT_TYPE) {
            builder.header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
        } else {
            builder
        }
    }
}
