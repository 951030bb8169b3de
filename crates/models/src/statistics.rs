use serde::{Deserialize, Serialize};

/// Dashboard counters from `GET /api/admin/statistics`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub album_count: u64,
    pub image_count: u64,
    pub service_count: u64,
    pub contact_count: u64,
    pub unread_contact_count: u64,
}
