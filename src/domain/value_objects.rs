use crate::domain::errors::HttpError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http::header::{HeaderName, HeaderValue};

/// Represents a validated absolute http(s) URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url(pub url::Url);

impl Url {
    /// Creates a new Url with validation
    ///
    /// A bare host such as `127.0.0.1:8080/path` is treated as `http://`.
    ///
    /// # Returns
    /// * `Ok(Url)` - Validated URL
    /// * `Err(HttpError::InvalidUrl)` - If the URL cannot be parsed or is not http(s)
    pub fn new(raw: &str) -> Result<Self, HttpError> {
        let invalid = |reason: String| HttpError::InvalidUrl {
            url: raw.to_string(),
            reason,
        };

        if raw.trim().is_empty() {
            return Err(invalid("URL cannot be empty".to_string()));
        }

        let candidate = if has_scheme(raw) {
            raw.to_string()
        } else {
            format!("http://{raw}")
        };

        let parsed = url::Url::parse(&candidate).map_err(|e| invalid(e.to_string()))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(invalid("URL must start with http:// or https://".to_string()));
        }
        if parsed.host_str().is_none() {
            return Err(invalid("URL has no host".to_string()));
        }

        Ok(Url(parsed))
    }

    /// Resolves a server-sent `Location` value against this URL.
    pub fn join(&self, location: &str) -> Result<Self, HttpError> {
        let joined = self.0.join(location).map_err(|e| HttpError::InvalidRedirect {
            location: location.to_string(),
            reason: e.to_string(),
        })?;
        match joined.scheme() {
            "http" | "https" => Ok(Url(joined)),
            other => Err(HttpError::InvalidRedirect {
                location: location.to_string(),
                reason: format!("unsupported redirect scheme '{other}'"),
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_https(&self) -> bool {
        self.0.scheme() == "https"
    }

    /// Host to connect to; IPv6 literals lose their brackets.
    pub fn host(&self) -> &str {
        self.0
            .host_str()
            .unwrap_or_default()
            .trim_start_matches('[')
            .trim_end_matches(']')
    }

    pub fn port(&self) -> u16 {
        self.0.port_or_known_default().unwrap_or(80)
    }

    /// `host[:port]`, with the port only when it is not the scheme default.
    pub fn authority(&self) -> &str {
        &self.0[url::Position::BeforeHost..url::Position::AfterPort]
    }

    /// Origin-form request target: path plus query, no fragment.
    pub fn request_target(&self) -> &str {
        &self.0[url::Position::BeforePath..url::Position::AfterQuery]
    }

    pub fn same_origin(&self, other: &Url) -> bool {
        self.0.origin() == other.0.origin()
    }
}

/// True when `raw` starts with `scheme://`. A `://` further along, e.g.
/// inside a query string, does not count.
fn has_scheme(raw: &str) -> bool {
    raw.split_once("://").is_some_and(|(scheme, _)| {
        scheme.starts_with(|c: char| c.is_ascii_alphabetic())
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

/// Single outgoing header parsed from a `key=value` flag entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: HeaderName,
    pub value: HeaderValue,
}

impl Header {
    /// Splits on the first `=` only; the value may itself contain `=`.
    pub fn parse(raw: &str) -> Result<Self, HttpError> {
        let malformed = || HttpError::MalformedHeader(raw.to_string());

        let (key, value) = raw.split_once('=').ok_or_else(malformed)?;
        let name = HeaderName::from_bytes(key.trim().as_bytes()).map_err(|_| malformed())?;
        let value = HeaderValue::from_str(value.trim()).map_err(|_| malformed())?;

        Ok(Header { name, value })
    }
}

/// HTTP Basic credentials parsed from a `username=password` flag entry
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl BasicAuth {
    pub fn parse(raw: &str) -> Result<Self, HttpError> {
        let (username, password) = raw
            .split_once('=')
            .ok_or(HttpError::MalformedBasicAuth)?;
        Ok(BasicAuth {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// Value of the `Authorization` header for these credentials.
    pub fn header_value(&self) -> Result<HeaderValue, HttpError> {
        let token = STANDARD.encode(format!("{}:{}", self.username, self.password));
        HeaderValue::from_str(&format!("Basic {token}")).map_err(|_| HttpError::MalformedBasicAuth)
    }
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
