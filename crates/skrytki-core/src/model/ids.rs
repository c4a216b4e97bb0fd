use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Identifier of a registry entity.
///
/// Identifiers are dense integer codes assigned by the ETL run; two source
/// rows with the same name, registry number and address share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(i64);

impl EntityId {
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| Error::InvalidData(format!("not an entity id: {s:?}")))
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_parse() {
        let id: EntityId = "42".parse().unwrap();
        assert_eq!(id.get(), 42);

        let padded: EntityId = " 7 ".parse().unwrap();
        assert_eq!(padded, EntityId::new(7));
    }

    #[test]
    fn test_entity_id_rejects_garbage() {
        assert!("abc".parse::<EntityId>().is_err());
        assert!("".parse::<EntityId>().is_err());
        assert!("1.5".parse::<EntityId>().is_err());
    }

    #[test]
    fn test_entity_id_serializes_as_number() {
        let json = serde_json::to_string(&EntityId::new(12)).unwrap();
        assert_eq!(json, "12");
    }
}
