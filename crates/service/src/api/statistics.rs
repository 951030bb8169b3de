use models::Statistics;
use reqwest::Method;

use crate::client::ApiClient;
use crate::errors::ApiError;
use crate::session::Session;

impl ApiClient {
    pub async fn statistics(&self, session: &Session) -> Result<Statistics, ApiError> {
        self.execute(self.authed(Method::GET, "/api/admin/statistics", session)).await
    }
}
