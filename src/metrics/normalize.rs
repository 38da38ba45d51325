use crate::error::{Error, Result};

const SCHEME_DELIMITER: &str = "://";

/// Return the part of `link` after the first `://`.
///
/// Links without a scheme delimiter, or with nothing after it, are rejected.
pub fn strip_scheme(link: &str) -> Result<&str> {
    let (_, domain_hash) = link
        .split_once(SCHEME_DELIMITER)
        .ok_or_else(|| Error::MalformedLink(link.to_string()))?;

    if domain_hash.is_empty() {
        return Err(Error::MalformedLink(link.to_string()));
    }

    Ok(domain_hash)
}

/// Percent-encode for a single path segment; `/` becomes `%2F`.
pub fn encode_segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
