use models::{Credentials, Validate};
use service::{ApiError, Authenticator, Session};

use crate::notice::Notice;

/// Admin sign-in form.
#[derive(Debug, Default)]
pub struct LoginScreen {
    pub username: String,
    pub password: String,
    submitting: bool,
    error: Option<Notice>,
}

impl LoginScreen {
    pub fn new() -> Self { Self::default() }

    pub fn is_submitting(&self) -> bool { self.submitting }

    pub fn error(&self) -> Option<&Notice> { self.error.as_ref() }

    /// Validate, then sign in. The password is cleared whatever the outcome.
    pub async fn submit<A: Authenticator + ?Sized>(&mut self, auth: &A) -> Result<Session, ApiError> {
        let credentials = Credentials::new(self.username.clone(), std::mem::take(&mut self.password));
        if let Err(e) = credentials.validate() {
            let err = ApiError::from(e);
            self.error = Some(Notice::from_error(&err));
            return Err(err);
        }
        self.submitting = true;
        let result = auth.login(&credentials).await;
        self.submitting = false;
        match &result {
            Ok(_) => self.error = None,
            Err(e) => self.error = Some(Notice::from_error(e)),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    #[derive(Default)]
    struct FakeAuth {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Authenticator for FakeAuth {
        async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if credentials.password == "secret" {
                Ok(Session::new("tok", Some(credentials.username.clone())))
            } else {
                Err(ApiError::status(401, Some("Incorrect username or password".into())))
            }
        }
    }

    #[tokio::test]
    async fn blank_password_is_caught_before_login() {
        let auth = FakeAuth::default();
        let mut screen = LoginScreen { username: "admin".into(), ..Default::default() };
        assert!(screen.submit(&auth).await.is_err());
        assert_eq!(auth.calls.load(Ordering::SeqCst), 0);
        assert_eq!(screen.error().map(|n| n.message.as_str()), Some("password is required"));
    }

    #[tokio::test]
    async fn server_detail_is_shown_verbatim() {
        let auth = FakeAuth::default();
        let mut screen = LoginScreen { username: "admin".into(), password: "nope".into(), ..Default::default() };
        assert!(screen.submit(&auth).await.is_err());
        assert_eq!(screen.error().map(|n| n.message.as_str()), Some("Incorrect username or password"));
        assert!(screen.password.is_empty());

        screen.password = "secret".into();
        let session = screen.submit(&auth).await.unwrap();
        assert_eq!(session.username(), Some("admin"));
        assert!(screen.error().is_none());
    }
}
