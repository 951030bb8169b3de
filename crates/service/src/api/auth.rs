use models::{AdminUser, Credentials, Token};
use reqwest::Method;

use crate::client::ApiClient;
use crate::errors::ApiError;
use crate::session::Session;

impl ApiClient {
    /// `POST /api/auth/token`, form-encoded as the OAuth2 password flow expects.
    pub async fn request_token(&self, credentials: &Credentials) -> Result<Token, ApiError> {
        let form = [
            ("username", credentials.username.trim()),
            ("password", credentials.password.as_str()),
        ];
        let token: Token = self
            .execute(self.public(Method::POST, "/api/auth/token").form(&form))
            .await?;
        if token.access_token.trim().is_empty() {
            return Err(ApiError::Decode("empty access_token".into()));
        }
        Ok(token)
    }

    pub async fn current_admin(&self, session: &Session) -> Result<AdminUser, ApiError> {
        self.execute(self.authed(Method::GET, "/api/auth/me", session)).await
    }
}
