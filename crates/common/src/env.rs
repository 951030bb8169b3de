//! Environment/runtime helpers
//!
//! `.env` loading and the handful of variables the portal reads directly.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::API_URL_ENV;

/// What happened to `.env`; logged once a subscriber is installed.
#[derive(Debug)]
pub enum DotenvOutcome {
    Loaded(PathBuf),
    Missing,
    Malformed(String),
}

impl DotenvOutcome {
    fn from_result(result: Result<PathBuf, dotenvy::Error>) -> Self {
        match result {
            Ok(path) => DotenvOutcome::Loaded(path),
            Err(e) if e.not_found() => DotenvOutcome::Missing,
            Err(e) => DotenvOutcome::Malformed(e.to_string()),
        }
    }

    pub fn log(&self) {
        match self {
            DotenvOutcome::Loaded(path) => debug!(path = %path.display(), "loaded .env"),
            DotenvOutcome::Missing => {}
            DotenvOutcome::Malformed(error) => warn!(%error, "ignoring malformed .env"),
        }
    }
}

/// Load `.env` from the working directory if present.
///
/// Runs before logging is set up, so the outcome is returned for the caller to log.
pub fn load_dotenv() -> DotenvOutcome {
    DotenvOutcome::from_result(dotenvy::dotenv())
}

/// Backend origin from `PORTAL_API_URL`, ignoring blank values.
pub fn api_url_from_env() -> Option<String> {
    non_blank(std::env::var(API_URL_ENV).ok())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{non_blank, DotenvOutcome};

    #[test]
    fn dotenv_outcomes_are_classified() {
        let missing = dotenvy::Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "no .env"));
        assert!(matches!(DotenvOutcome::from_result(Err(missing)), DotenvOutcome::Missing));

        let broken = dotenvy::Error::LineParse("KEY VALUE".into(), 3);
        assert!(matches!(DotenvOutcome::from_result(Err(broken)), DotenvOutcome::Malformed(_)));

        let loaded = DotenvOutcome::from_result(Ok(".env".into()));
        assert!(matches!(loaded, DotenvOutcome::Loaded(ref p) if p.ends_with(".env")));
    }

    #[test]
    fn blank_values_are_ignored() {
        assert_eq!(non_blank(Some("   ".into())), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn values_are_trimmed() {
        assert_eq!(
            non_blank(Some(" https://api.example.com ".into())),
            Some("https://api.example.com".to_string())
        );
    }
}
