use url::Url;

/// Extracts the host from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host (which shouldn't happen for valid HTTP(S) URLs), it returns None.
///
/// # Arguments
///
/// * `url` - The URL to extract the host from
///
/// # Returns
///
/// * `Some(String)` - The lowercase host
/// * `None` - If the URL has no host
///
/// # Examples
///
/// ```
/// use url::Url;
/// use linkmend::url::extract_host;
///
/// let url = Url::parse("https://example.com/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("https://sub.example.com/path").unwrap();
/// assert_eq!(extract_host(&url), Some("sub.example.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Checks whether two URLs share the same host and port
///
/// The crawl boundary is the authority: host compared case-insensitively,
/// port falling back to the scheme default when absent, so
/// `http://example.com` and `http://example.com:80/page` match.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use linkmend::url::same_authority;
///
/// let a = Url::parse("http://example.com/").unwrap();
/// let b = Url::parse("http://example.com:80/page").unwrap();
/// let c = Url::parse("http://example.com:8080/").unwrap();
/// assert!(same_authority(&a, &b));
/// assert!(!same_authority(&a, &c));
/// ```
pub fn same_authority(a: &Url, b: &Url) -> bool {
    let host_a = a.host_str().map(|h| h.to_lowercase());
    let host_b = b.host_str().map(|h| h.to_lowercase());
    host_a.is_some() && host_a == host_b && a.port_or_known_default() == b.port_or_known_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_simple_host() {
        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(extract_host(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_extract_subdomain() {
        let url = Url::parse("https://blog.example.com/post").unwrap();
        assert_eq!(extract_host(&url), Some("blog.example.com".to_string()));
    }

    #[test]
    fn test_extract_with_port() {
        let url = Url::parse("https://example.com:8080/").unwrap();
        assert_eq!(extract_host(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_extract_uppercase_converted_to_lowercase() {
        let url = Url::parse("https://EXAMPLE.COM/").unwrap();
        assert_eq!(extract_host(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_same_authority_same_host() {
        let a = Url::parse("https://example.com/a").unwrap();
        let b = Url::parse("https://example.com/b?x=1").unwrap();
        assert!(same_authority(&a, &b));
    }

    #[test]
    fn test_same_authority_case_insensitive() {
        let a = Url::parse("https://EXAMPLE.com/").unwrap();
        let b = Url::parse("https://example.COM/page").unwrap();
        assert!(same_authority(&a, &b));
    }

    #[test]
    fn test_same_authority_default_port() {
        let a = Url::parse("http://example.com/").unwrap();
        let b = Url::parse("http://example.com:80/page").unwrap();
        assert!(same_authority(&a, &b));
    }

    #[test]
    fn test_different_port_is_different_authority() {
        let a = Url::parse("http://127.0.0.1:3000/").unwrap();
        let b = Url::parse("http://127.0.0.1:4000/").unwrap();
        assert!(!same_authority(&a, &b));
    }

    #[test]
    fn test_subdomain_is_different_authority() {
        let a = Url::parse("https://example.com/").unwrap();
        let b = Url::parse("https://blog.example.com/").unwrap();
        assert!(!same_authority(&a, &b));
    }

    #[test]
    fn test_different_host_is_different_authority() {
        let a = Url::parse("https://example.com/").unwrap();
        let b = Url::parse("https://example.org/").unwrap();
        assert!(!same_authority(&a, &b));
    }
}
