use serde::{Deserialize, Serialize};

use super::EntityId;

/// A single search result row, serialized with the field names the
/// landing page expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub nazwa: String,
    pub regon: String,
    pub adres: String,
    pub skrytka: Option<String>,
    pub id: EntityId,
}
