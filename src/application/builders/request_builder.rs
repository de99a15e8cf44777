use crate::domain::config::HttpConfig;
use crate::domain::entities::{Method, Request};
use crate::domain::errors::HttpError;
use crate::domain::value_objects::{BasicAuth, Header, Url};
use hyper::body::Bytes;
use std::str::FromStr;

pub struct RequestBuilder {
    method: Method,
    url: Option<Url>,
    headers: Vec<Header>,
    basic_auth: Option<BasicAuth>,
    body: Option<Bytes>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: Method::Get,
            url: None,
            headers: Vec::new(),
            basic_auth: None,
            body: None,
        }
    }

    /// Assembles the request for a validated config. Pure: fails only on
    /// malformed URL, header, or credential strings.
    pub fn from_config(config: &HttpConfig) -> Result<Request, HttpError> {
        let builder = Self::new()
            .method(&config.verb)?
            .url(&config.url)?
            .headers(&config.headers)?
            .basic_auth(config.basic_auth.as_deref())?
            .body(&config.post_body);
        builder.build()
    }

    pub fn method(mut self, method: &str) -> Result<Self, HttpError> {
        self.method = Method::from_str(method)?;
        Ok(self)
    }

    pub fn url(mut self, raw_url: &str) -> Result<Self, HttpError> {
        self.url = Some(Url::new(raw_url)?);
        Ok(self)
    }

    pub fn headers(mut self, raw_headers: &[String]) -> Result<Self, HttpError> {
        for raw in raw_headers {
            self.headers.push(Header::parse(raw)?);
        }
        Ok(self)
    }

    pub fn basic_auth(mut self, raw: Option<&str>) -> Result<Self, HttpError> {
        self.basic_auth = match raw {
            Some(credentials) if !credentials.is_empty() => Some(BasicAuth::parse(credentials)?),
            _ => None,
        };
        Ok(self)
    }

    /// Only POST carries a body; it is ignored for other methods, so call
    /// this after `method`.
    pub fn body(mut self, body: &Bytes) -> Self {
        if self.method == Method::Post {
            self.body = Some(body.clone());
        }
        self
    }

    pub fn build(self) -> Result<Request, HttpError> {
        let url = self.url.ok_or_else(|| HttpError::InvalidUrl {
            url: String::new(),
            reason: "URL is required".to_string(),
        })?;

        Ok(Request {
            method: self.method,
            url,
            headers: self.headers,
            basic_auth: self.basic_auth,
            body: self.body,
        })
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
