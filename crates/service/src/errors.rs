use models::ModelError;
use thiserror::Error;

const GENERIC_MESSAGE: &str = "Something went wrong, please try again.";

/// Everything that can go wrong between a screen and the backend.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("http status {status}: {}", detail.as_deref().unwrap_or("no detail"))]
    Status { status: u16, detail: Option<String> },
    #[error("decode error: {0}")]
    Decode(String),
    #[error("not signed in")]
    Unauthenticated,
    #[error(transparent)]
    Validation(#[from] ModelError),
    #[error("io error: {0}")]
    Io(String),
    #[error("config error: {0}")]
    Config(String),
}

impl ApiError {
    pub fn status(status: u16, detail: Option<String>) -> Self { Self::Status { status, detail } }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthenticated | ApiError::Status { status: 401, .. })
    }

    /// Text for a toast/banner: server `detail` and validation messages verbatim, otherwise generic.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { detail: Some(detail), .. } => detail.clone(),
            ApiError::Validation(ModelError::Validation(msg)) => msg.clone(),
            ApiError::Validation(ModelError::Invariant(msg)) => msg.clone(),
            _ => GENERIC_MESSAGE.to_string(),
        }
    }

    /// Stable numeric code for logs; never shown to end users.
    pub fn code(&self) -> u16 {
        match self {
            ApiError::Network(_) => 2001,
            ApiError::Status { .. } => 2002,
            ApiError::Decode(_) => 2003,
            ApiError::Unauthenticated => 2004,
            ApiError::Validation(_) => 2101,
            ApiError::Io(_) => 2201,
            ApiError::Config(_) => 2301,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self { ApiError::Decode(e.to_string()) }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self { ApiError::Io(e.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_is_surfaced_verbatim() {
        let e = ApiError::status(400, Some("相册不存在".into()));
        assert_eq!(e.user_message(), "相册不存在");
    }

    #[test]
    fn other_errors_use_generic_message() {
        assert_eq!(ApiError::Network("reset".into()).user_message(), GENERIC_MESSAGE);
        assert_eq!(ApiError::status(500, None).user_message(), GENERIC_MESSAGE);
        assert_eq!(ApiError::Decode("eof".into()).user_message(), GENERIC_MESSAGE);
    }

    #[test]
    fn validation_message_shown() {
        let e: ApiError = ModelError::required("album name").into();
        assert_eq!(e.user_message(), "album name is required");
    }

    #[test]
    fn codes_are_distinct() {
        let all = [
            ApiError::Network(String::new()).code(),
            ApiError::status(500, None).code(),
            ApiError::Decode(String::new()).code(),
            ApiError::Unauthenticated.code(),
            ApiError::Validation(ModelError::required("x")).code(),
            ApiError::Io(String::new()).code(),
            ApiError::Config(String::new()).code(),
        ];
        let mut dedup = all.to_vec();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), all.len());
    }
}
