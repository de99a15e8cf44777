use crate::domain::entities::Method;
use crate::domain::errors::HttpError;
use crate::domain::value_objects::Url;

/// Hop limit applied when redirects are not restricted.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Decides whether the transport may follow another redirect.
///
/// `-disable-redirect` maps to [`RedirectPolicy::SingleHop`]: one redirect
/// is still followed, and only a second one aborts the request. It never
/// means "zero redirects".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectPolicy {
    /// Follow up to [`DEFAULT_MAX_REDIRECTS`] hops.
    Follow,
    /// Follow at most one hop.
    SingleHop,
}

impl RedirectPolicy {
    pub fn from_disable_flag(disable_redirect: bool) -> Self {
        if disable_redirect {
            RedirectPolicy::SingleHop
        } else {
            RedirectPolicy::Follow
        }
    }

    pub fn max_hops(&self) -> usize {
        match self {
            RedirectPolicy::Follow => DEFAULT_MAX_REDIRECTS,
            RedirectPolicy::SingleHop => 1,
        }
    }

    /// Called for every redirect response, with the number of hops already
    /// followed. `method` and `location` describe the hop that would be sent.
    pub fn check(&self, method: Method, location: &Url, followed: usize) -> Result<(), HttpError> {
        if followed >= self.max_hops() {
            return Err(HttpError::TooManyRedirects {
                method: method.to_string(),
                location: location.as_str().to_string(),
                limit: self.max_hops(),
            });
        }
        Ok(())
    }
}
