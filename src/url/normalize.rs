use crate::UrlError;
use url::Url;

/// Parses and validates a seed URL supplied by a caller
///
/// # Rules
///
/// 1. Blank input is rejected as missing
/// 2. The URL must parse as an absolute URL
/// 3. Only HTTP and HTTPS schemes are accepted
/// 4. A host is required
/// 5. The fragment is removed
///
/// # Examples
///
/// ```
/// use doc_harvest::url::parse_seed_url;
///
/// let url = parse_seed_url(" https://example.com/docs#intro ").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/docs");
/// ```
pub fn parse_seed_url(input: &str) -> Result<Url, UrlError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(UrlError::Missing);
    }

    let url = Url::parse(input).map_err(|e| UrlError::Parse(format!("'{}': {}", input, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    Ok(normalize_url(&url))
}

/// Returns the canonical form of a URL used for visited-set membership
///
/// Two links that differ only in their fragment point at the same page.
pub fn normalize_url(url: &Url) -> Url {
    let mut normalized = url.clone();
    normalized.set_fragment(None);
    normalized
}
