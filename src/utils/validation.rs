use crate::error::{Error, Result};
use tracing::warn;
use url::Url;

/// Validate a URL is well formed, uses the http/https scheme and has a host
pub fn validate_url(url_str: &str) -> Result<Url> {
    let url = Url::parse(url_str)?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            warn!(
                "Security: Blocked non-HTTP(S) URL scheme: {} in URL: {}",
                other, url_str
            );
            return Err(Error::Validation(format!(
                "Invalid protocol '{other}'. Allowed protocols: http, https"
            )));
        }
    }

    if url.host_str().is_none() {
        return Err(Error::Validation("URL must have a valid host".to_string()));
    }

    Ok(url)
}

/// The link itself if it is safe to place in an `href`, otherwise an empty string
pub fn safe_link(link: &str) -> &str {
    if link.is_empty() || validate_url(link).is_err() {
        ""
    } else {
        link
    }
}
