use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{require, Validate};

/// Login form; sent url-encoded to the token endpoint.
#[derive(Clone, Default, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").field("username", &self.username).field("password", &"***").finish()
    }
}

impl Validate for Credentials {
    fn validate(&self) -> Result<(), ModelError> {
        require("username", &self.username)?;
        require("password", &self.password)
    }
}

#[derive(Clone, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default = "bearer")]
    pub token_type: String,
}

fn bearer() -> String { "bearer".to_string() }

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token").field("token_type", &self.token_type).finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AdminUser {
    pub username: String,
    #[serde(default)]
    pub disabled: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_never_prints_secrets() {
        let c = Credentials::new("admin", "hunter2");
        assert!(!format!("{c:?}").contains("hunter2"));
        let t: Token = serde_json::from_str(r#"{"access_token":"abc.def","token_type":"bearer"}"#).unwrap();
        assert!(!format!("{t:?}").contains("abc.def"));
    }

    #[test]
    fn credentials_require_both_fields() {
        assert!(Credentials::new("admin", "").validate().is_err());
        assert!(Credentials::new("", "pw").validate().is_err());
        assert!(Credentials::new("admin", "pw").validate().is_ok());
    }
}
