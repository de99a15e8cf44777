use crate::domain::config::HttpConfig;
use crate::domain::errors::HttpError;
use crate::infrastructure::files::read_body_file;
use log::debug;

/// Settles where the request body comes from.
///
/// Rejects a literal body combined with a body file before touching the
/// filesystem. For POST, a body file is read in full and becomes
/// `post_body`. For any other verb the file is left unread and the
/// request goes out without a body.
pub fn resolve_body(mut config: HttpConfig) -> Result<HttpConfig, HttpError> {
    let Some(path) = config.body_file_path().cloned() else {
        return Ok(config);
    };

    if config.has_body() {
        return Err(HttpError::ConflictingBodySources);
    }

    if config.verb == "POST" {
        debug!("Reading request body from {}", path.display());
        config.post_body = read_body_file(&path)?;
    }

    Ok(config)
}
