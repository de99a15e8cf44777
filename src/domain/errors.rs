use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Every failure the `http` sub-command can report.
///
/// Variants are split in two families: input errors the user can fix by
/// changing flags (reported together with usage text), and transport or
/// file errors raised while the request is in flight.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("you have to specify the remote server")]
    NoServerSpecified,

    #[error("invalid HTTP method: '{0}'")]
    InvalidVerb(String),

    #[error("cannot specify both body and body-file")]
    ConflictingBodySources,

    #[error("http POST request must specify a non-empty JSON body")]
    EmptyPostBody,

    #[error("invalid HTTP command: a body can only be sent with POST")]
    UnexpectedBody,

    #[error("invalid header format: '{0}'. Use 'key=value'")]
    MalformedHeader(String),

    #[error("invalid basic auth format: use 'username=password'")]
    MalformedBasicAuth,

    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to read body file {}: {source}", .path.display())]
    BodyFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write output file {}: {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{method} \"{location}\": stopped after {limit} {}", redirect_noun(.limit))]
    TooManyRedirects {
        method: String,
        location: String,
        limit: usize,
    },

    #[error("invalid redirect to '{location}': {reason}")]
    InvalidRedirect { location: String, reason: String },

    #[error("failed to connect to {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TLS handshake with {host} failed: {reason}")]
    Tls { host: String, reason: String },

    #[error("HTTP request execution failed: {0}")]
    Protocol(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

fn redirect_noun(limit: &usize) -> &'static str {
    if *limit == 1 { "redirect" } else { "redirects" }
}

impl HttpError {
    /// True for errors caused by the flags themselves, which the entry point
    /// reports together with the `http` usage text.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            HttpError::NoServerSpecified
                | HttpError::InvalidVerb(_)
                | HttpError::ConflictingBodySources
                | HttpError::EmptyPostBody
                | HttpError::UnexpectedBody
                | HttpError::MalformedHeader(_)
                | HttpError::MalformedBasicAuth
                | HttpError::InvalidUrl { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_are_classified_as_invalid_input() {
        assert!(HttpError::NoServerSpecified.is_invalid_input());
        assert!(HttpError::InvalidVerb("PUT".into()).is_invalid_input());
        assert!(HttpError::ConflictingBodySources.is_invalid_input());
        assert!(HttpError::MalformedBasicAuth.is_invalid_input());
    }

    #[test]
    fn transport_errors_are_not_invalid_input() {
        let err = HttpError::TooManyRedirects {
            method: "GET".into(),
            location: "http://localhost/next".into(),
            limit: 1,
        };
        assert!(!err.is_invalid_input());
        assert!(!HttpError::Timeout(Duration::from_secs(1)).is_invalid_input());

        let bad_location = HttpError::InvalidRedirect {
            location: "ftp://x/y".into(),
            reason: "unsupported redirect scheme 'ftp'".into(),
        };
        assert!(!bad_location.is_invalid_input());
    }

    #[test]
    fn redirect_limit_message_names_the_limit() {
        let one = HttpError::TooManyRedirects {
            method: "GET".into(),
            location: "http://localhost/new-url".into(),
            limit: 1,
        };
        assert_eq!(
            one.to_string(),
            "GET \"http://localhost/new-url\": stopped after 1 redirect"
        );

        let ten = HttpError::TooManyRedirects {
            method: "POST".into(),
            location: "http://localhost/loop".into(),
            limit: 10,
        };
        assert!(ten.to_string().ends_with("stopped after 10 redirects"));
    }
}
