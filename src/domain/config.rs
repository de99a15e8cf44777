use hyper::body::Bytes;
use std::path::PathBuf;
use std::time::Duration;

/// Resolved parameters of the single request an `http` invocation makes.
///
/// Built once from the command-line flags, completed by body resolution,
/// validated, then consumed by the request builder. Never reused.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpConfig {
    pub url: String,
    pub verb: String,
    /// Literal payload; after body resolution this also holds the raw
    /// contents of `body_file`.
    pub post_body: Bytes,
    pub body_file: Option<PathBuf>,
    /// Raw `key=value` entries in the order they were given.
    pub headers: Vec<String>,
    /// Raw `username=password` entry.
    pub basic_auth: Option<String>,
    /// Limits redirect following to a single hop, see `RedirectPolicy`.
    pub disable_redirect: bool,
    pub output_file: Option<PathBuf>,
    pub timeout: Option<Duration>,
}

impl HttpConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            verb: "GET".to_string(),
            ..Self::default()
        }
    }

    pub fn has_body(&self) -> bool {
        !self.post_body.is_empty()
    }

    /// The body file only counts when its path is non-empty.
    pub fn body_file_path(&self) -> Option<&PathBuf> {
        self.body_file
            .as_ref()
            .filter(|path| !path.as_os_str().is_empty())
    }
}
