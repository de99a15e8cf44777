use crate::application::body::resolve_body;
use crate::application::builders::request_builder::RequestBuilder;
use crate::application::redirect_policy::RedirectPolicy;
use crate::domain::config::HttpConfig;
use crate::domain::entities::{Method, Request, Response};
use crate::domain::errors::HttpError;
use async_trait::async_trait;
use log::{debug, info};

/// Trait for HTTP clients to enable mocking and dependency inversion
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends `request`, following redirects as `policy` allows, and returns
    /// the final response with its body fully read.
    async fn send(&self, request: Request, policy: RedirectPolicy) -> Result<Response, HttpError>;
}

/// Application service for orchestrating HTTP request workflows
pub struct HttpRequestService {
    http_client: Box<dyn HttpClient>,
}

impl HttpRequestService {
    pub fn new(http_client: Box<dyn HttpClient>) -> Self {
        Self { http_client }
    }

    /// Runs the whole pipeline for one invocation: body resolution,
    /// validation, request assembly, then a single send. Nothing reaches the
    /// network unless every earlier step succeeded.
    pub async fn execute(&self, config: HttpConfig) -> Result<Response, HttpError> {
        let config = resolve_body(config)?;
        RequestValidator::validate(&config)?;

        let request = RequestBuilder::from_config(&config)?;
        let policy = RedirectPolicy::from_disable_flag(config.disable_redirect);
        debug!("Sending {} {} ({:?})", request.method, request.url.as_str(), policy);

        let response = self.http_client.send(request, policy).await?;
        info!("Status: {}", response.status);
        Ok(response)
    }
}

/// Domain service for config validation
pub struct RequestValidator;

impl RequestValidator {
    /// Checks verb whitelisting and body/verb coherence. Must run after
    /// `resolve_body` so a file-sourced body is already in `post_body`.
    pub fn validate(config: &HttpConfig) -> Result<(), HttpError> {
        let method: Method = config.verb.parse()?;

        match method {
            Method::Post if !config.has_body() => Err(HttpError::EmptyPostBody),
            Method::Get | Method::Head if config.has_body() => Err(HttpError::UnexpectedBody),
            _ => Ok(()),
        }
    }
}
