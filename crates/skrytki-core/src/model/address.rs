use serde::{Deserialize, Serialize};

use super::EntityId;

/// One electronic mailbox address of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
    pub id: EntityId,
    pub skrytka: String,
}

impl AddressRecord {
    #[must_use]
    pub fn new(id: EntityId, skrytka: impl Into<String>) -> Self {
        Self {
            id,
            skrytka: skrytka.into(),
        }
    }
}
