use crate::UrlError;
use url::Url;

/// Normalizes a URL into its canonical page identity
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject schemes other than HTTP and HTTPS
/// 3. Require a host (the parser already lowercases domain names)
/// 4. Remove the fragment (everything after #)
///
/// Path and query are preserved as-is: two URLs that differ only in their
/// fragment are the same page, anything else is a distinct page.
///
/// # Arguments
///
/// * `url_str` - The URL string to normalize
///
/// # Returns
///
/// * `Ok(Url)` - Normalized URL
/// * `Err(UrlError)` - Failed to parse or normalize the URL
///
/// # Examples
///
/// ```
/// use linkmend::url::normalize_url;
///
/// let url = normalize_url("https://EXAMPLE.COM/page?tab=2#section").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/page?tab=2");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    // Step 1: Parse the URL
    let mut url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    // Step 2: Validate scheme
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    // Step 3: Require a host
    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    // Step 4: Remove fragment
    url.set_fragment(None);

    Ok(url)
}
