use models::service::sort_by_order;
use models::{Id, OrderAssignment, Service, ServiceDraft, Validate};
use reqwest::Method;
use serde::Serialize;
use tracing::{info, instrument};

use crate::client::{or_empty, or_missing, ApiClient};
use crate::errors::ApiError;
use crate::session::Session;

#[derive(Serialize)]
struct OrderOnly {
    order: i32,
}

#[derive(Serialize)]
struct OrderBatch<'a> {
    orders: &'a [OrderAssignment],
}

impl ApiClient {
    /// Services in display order.
    pub async fn list_services(&self) -> Vec<Service> {
        or_empty(self.try_services().await, "services")
    }

    pub(crate) async fn try_services(&self) -> Result<Vec<Service>, ApiError> {
        let mut services: Vec<Service> = self.execute(self.public(Method::GET, "/api/services")).await?;
        sort_by_order(&mut services);
        Ok(services)
    }

    pub async fn service(&self, service_id: Id) -> Result<Option<Service>, ApiError> {
        let path = format!("/api/services/{service_id}");
        or_missing(self.execute(self.public(Method::GET, &path)).await)
    }

    #[instrument(skip(self, session, draft), fields(name = %draft.name))]
    pub async fn create_service(&self, session: &Session, draft: &ServiceDraft) -> Result<Service, ApiError> {
        draft.validate()?;
        let service: Service = self
            .execute(self.authed(Method::POST, "/api/services", session).json(draft))
            .await?;
        info!(service_id = service.id, "service_created");
        Ok(service)
    }

    #[instrument(skip(self, session, draft))]
    pub async fn update_service(&self, session: &Session, service_id: Id, draft: &ServiceDraft) -> Result<Service, ApiError> {
        draft.validate()?;
        let path = format!("/api/services/{service_id}");
        self.execute(self.authed(Method::PUT, &path, session).json(draft)).await
    }

    /// Partial update touching only `order`.
    #[instrument(skip(self, session))]
    pub async fn set_service_order(&self, session: &Session, service_id: Id, order: i32) -> Result<Service, ApiError> {
        let path = format!("/api/services/{service_id}");
        self.execute(self.authed(Method::PUT, &path, session).json(&OrderOnly { order })).await
    }

    /// Batched `set order`, applied by the backend in one transaction.
    #[instrument(skip(self, session, orders), fields(count = orders.len()))]
    pub async fn set_service_orders(&self, session: &Session, orders: &[OrderAssignment]) -> Result<Vec<Service>, ApiError> {
        let req = self
            .authed(Method::PUT, "/api/admin/services/order", session)
            .json(&OrderBatch { orders });
        let mut services: Vec<Service> = self.execute(req).await?;
        sort_by_order(&mut services);
        Ok(services)
    }

    #[instrument(skip(self, session))]
    pub async fn delete_service(&self, session: &Session, service_id: Id) -> Result<(), ApiError> {
        let path = format!("/api/services/{service_id}");
        self.execute_unit(self.authed(Method::DELETE, &path, session)).await
    }
}
