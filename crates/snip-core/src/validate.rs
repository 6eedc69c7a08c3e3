use url::Url;

/// Longest accepted URL, in bytes. Every storage backend holds at least this.
pub const MAX_URL_LENGTH: usize = 8192;

/// Checks that `raw` is an absolute `http`/`https` URL with a host, no longer
/// than [`MAX_URL_LENGTH`].
///
/// Purely syntactic, no network access is performed.
pub fn is_valid_url(raw: &str) -> bool {
    if raw.is_empty() || raw.len() > MAX_URL_LENGTH {
        return false;
    }

    let Ok(parsed) = Url::parse(raw) else {
        return false;
    };

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return false;
    }

    parsed.host_str().is_some_and(|host| !host.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(is_valid_url("https://example.com"));
        assert!(is_valid_url("http://example.com/a/b?x=1"));
        assert!(is_valid_url("https://sub.example.com:8443/path#frag"));
    }

    #[test]
    fn rejects_empty_and_garbage() {
        assert!(!is_valid_url(""));
        assert!(!is_valid_url("not-a-valid-url"));
        assert!(!is_valid_url("/relative/path"));
    }

    #[test]
    fn rejects_other_schemes() {
        assert!(!is_valid_url("ftp://example.com/file"));
        assert!(!is_valid_url("mailto:someone@example.com"));
        assert!(!is_valid_url("javascript:alert(1)"));
    }

    #[test]
    fn enforces_length_limit() {
        let prefix = "https://example.com/";
        let longest = format!("{prefix}{}", "a".repeat(MAX_URL_LENGTH - prefix.len()));
        assert!(is_valid_url(&longest));
        assert!(!is_valid_url(&format!("{longest}a")));
    }

    #[test]
    fn rejects_missing_host() {
        assert!(!is_valid_url("http://"));
        assert!(!is_valid_url("https://"));
    }
}
