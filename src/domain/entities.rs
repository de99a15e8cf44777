use crate::domain::errors::HttpError;
use crate::domain::value_objects::{BasicAuth, Header, Url};
use hyper::StatusCode;
use hyper::body::Bytes;
use hyper::header::{AUTHORIZATION, COOKIE};
use std::fmt;
use std::str::FromStr;

/// HTTP methods the client is allowed to send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Head,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Head => "HEAD",
        }
    }
}

impl FromStr for Method {
    type Err = HttpError;

    /// Verbs are matched exactly; `get` is not `GET`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "HEAD" => Ok(Method::Head),
            other => Err(HttpError::InvalidVerb(other.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents an HTTP request
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<Header>, // in flag order
    pub basic_auth: Option<BasicAuth>,
    pub body: Option<Bytes>,
}

impl Request {
    /// The request to send after a redirect response with `status`
    /// pointing at `location`.
    ///
    /// 301/302/303 turn anything but HEAD into a body-less GET; 307/308
    /// replay the method and body. Credentials do not cross origins.
    pub fn redirected(&self, status: StatusCode, location: Url) -> Request {
        let (method, body) = match status {
            StatusCode::TEMPORARY_REDIRECT | StatusCode::PERMANENT_REDIRECT => {
                (self.method, self.body.clone())
            }
            _ if self.method == Method::Head => (Method::Head, None),
            _ => (Method::Get, None),
        };

        let same_origin = self.url.same_origin(&location);
        let headers = self
            .headers
            .iter()
            .filter(|h| same_origin || (h.name != AUTHORIZATION && h.name != COOKIE))
            .cloned()
            .collect();

        Request {
            method,
            url: location,
            headers,
            basic_auth: if same_origin { self.basic_auth.clone() } else { None },
            body,
        }
    }
}

/// Represents an HTTP response
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub body: Bytes,
}
