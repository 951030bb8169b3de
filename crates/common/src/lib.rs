pub mod utils;
pub mod env;

/// Environment variable selecting the backend origin.
pub const API_URL_ENV: &str = "PORTAL_API_URL";

/// Fallback origin when neither config nor environment provide one.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_api_url_has_no_trailing_slash() {
        assert!(!DEFAULT_API_URL.ends_with('/'));
        assert!(DEFAULT_API_URL.starts_with("http://"));
    }
}
