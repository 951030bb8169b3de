use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::timestamp::{self, Timestamp};
use crate::{require, Id, Identified, Validate};

/// A service offered by the studio, ranked by `order` on the public page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: Id,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub order: i32,
    #[serde(default, with = "timestamp::option")]
    pub created_at: Option<Timestamp>,
    #[serde(default, with = "timestamp::option")]
    pub updated_at: Option<Timestamp>,
}

impl Identified for Service {
    fn id(&self) -> Id { self.id }
}

/// Display order: `order` ascending, ties broken by id so the sequence is total.
pub fn sort_by_order(services: &mut [Service]) {
    services.sort_by_key(|s| (s.order, s.id));
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServiceDraft {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub order: i32,
}

impl ServiceDraft {
    /// Prefill an edit form from an existing service.
    pub fn from_service(s: &Service) -> Self {
        Self { name: s.name.clone(), description: s.description.clone(), icon: s.icon.clone(), order: s.order }
    }
}

impl Validate for ServiceDraft {
    fn validate(&self) -> Result<(), ModelError> {
        require("service name", &self.name)?;
        require("service description", &self.description)
    }
}

/// One entry of a batched "set order" request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAssignment {
    pub id: Id,
    pub order: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn svc(id: Id, order: i32) -> Service {
        Service { id, name: format!("s{id}"), description: "d".into(), icon: None, order, created_at: None, updated_at: None }
    }

    #[test]
    fn decodes_public_shape_without_timestamps() {
        let s: Service = serde_json::from_value(json!({
            "id": 1, "name": "Kitchen", "description": "Full remodel", "icon": null
        }))
        .unwrap();
        assert_eq!(s.order, 0);
        assert!(s.created_at.is_none());
    }

    #[test]
    fn sort_is_total_on_ties() {
        let mut v = vec![svc(3, 1), svc(1, 2), svc(2, 1)];
        sort_by_order(&mut v);
        let ids: Vec<Id> = v.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn draft_requires_name_and_description() {
        let d = ServiceDraft { name: "Lighting".into(), ..Default::default() };
        assert_eq!(d.validate(), Err(ModelError::required("service description")));
    }
}
