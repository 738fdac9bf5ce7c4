use axum::http::HeaderMap;

/// Per-request client information captured by the auth middleware
#[derive(Clone, Debug)]
pub struct RequestMetadata {
    pub ip_address: String,
    pub user_agent: String,
    pub headers: HeaderMap,
    pub host: String,
    pub is_secure: bool, // true if HTTPS
}

impl RequestMetadata {
    /// Build metadata from request headers, honoring reverse-proxy headers
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let header_str = |name: &str| headers.get(name).and_then(|h| h.to_str().ok());

        let host = header_str("host").unwrap_or("localhost").to_string();
        let is_secure = header_str("x-forwarded-proto") == Some("https");

        Self {
            ip_address: header_str("x-forwarded-for")
                .and_then(|s| s.split(',').next())
                .map(str::trim)
                .unwrap_or("unknown")
                .to_string(),
            user_agent: header_str("user-agent").unwrap_or("unknown").to_string(),
            headers: headers.clone(),
            host,
            is_secure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_from_headers_defaults() {
        let metadata = RequestMetadata::from_headers(&HeaderMap::new());
        assert_eq!(metadata.ip_address, "unknown");
        assert_eq!(metadata.user_agent, "unknown");
        assert_eq!(metadata.host, "localhost");
        assert!(!metadata.is_secure);
    }

    #[test]
    fn test_from_headers_forwarded() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("10.0.0.1, 10.0.0.2"));
        headers.insert("x-forwarded-proto", HeaderValue::from_static("https"));
        headers.insert("host", HeaderValue::from_static("blogs.example.com"));

        let metadata = RequestMetadata::from_headers(&headers);
        assert_eq!(metadata.ip_address, "10.0.0.1");
        assert_eq!(metadata.host, "blogs.example.com");
        assert!(metadata.is_secure);
    }
}
