//! URL sanitization
//!
//! The build server echoes back absolute URLs built from whatever hostname
//! it believes it has. Behind a reverse proxy that host is often unreachable
//! from the caller, so every echoed URL is rewritten onto the configured
//! endpoint's scheme, host and port. Path, query and fragment are kept.

use jenkins_trigger_domain::{Result, TriggerError};
use url::{ParseError, Url};

/// Rewrites URLs onto the configured base endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlSanitizer {
    base: Url,
}

impl UrlSanitizer {
    /// # Errors
    /// Returns `TriggerError::MalformedUrl` if `base_url` is not an absolute
    /// URL with a host.
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url).map_err(|err| TriggerError::malformed_url(base_url, err))?;
        if base.host_str().is_none() {
            return Err(TriggerError::malformed_url(base_url, "base URL has no host"));
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Replace scheme, host and port of `url` with the base endpoint's.
    ///
    /// # Errors
    /// Returns `TriggerError::MalformedUrl` if `url` is not absolute or its
    /// scheme cannot be swapped for the base scheme.
    pub fn sanitize(&self, url: &str) -> Result<String> {
        self.sanitize_url(url).map(String::from)
    }

    pub(crate) fn sanitize_url(&self, url: &str) -> Result<Url> {
        let mut parsed = Url::parse(url).map_err(|err| TriggerError::malformed_url(url, err))?;

        parsed
            .set_scheme(self.base.scheme())
            .map_err(|()| TriggerError::malformed_url(url, "scheme cannot be rewritten"))?;
        parsed
            .set_host(self.base.host_str())
            .map_err(|err| TriggerError::malformed_url(url, err))?;
        parsed
            .set_port(self.base.port())
            .map_err(|()| TriggerError::malformed_url(url, "port cannot be rewritten"))?;

        Ok(parsed)
    }

    /// Resolve a URL that is either absolute or relative to the endpoint.
    ///
    /// Absolute URLs are sanitized. Relative ones are joined under the base
    /// path; a leading `/` does not escape a base path prefix.
    pub fn resolve(&self, target: &str) -> Result<String> {
        match Url::parse(target) {
            Ok(_) => self.sanitize(target),
            Err(ParseError::RelativeUrlWithoutBase) => with_trailing_slash(self.base.clone())
                .join(target.trim_start_matches('/'))
                .map(String::from)
                .map_err(|err| TriggerError::malformed_url(target, err)),
            Err(err) => Err(TriggerError::malformed_url(target, err)),
        }
    }
}

/// `{url}/{segment}`, treating `url` as a directory whether or not it ends in `/`.
///
/// # Errors
/// Returns `TriggerError::MalformedUrl` if `url` is not absolute.
pub fn append_path(url: &str, segment: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|err| TriggerError::malformed_url(url, err))?;
    with_trailing_slash(parsed)
        .join(segment)
        .map_err(|err| TriggerError::malformed_url(url, err))
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
