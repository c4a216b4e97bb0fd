use serde::{Deserialize, Serialize};

use super::EntityId;

/// Government-office flag used to filter "offices only" searches.
///
/// Stored as an integer so the search can filter with a simple threshold:
/// offices-only searches keep rows with `typ > 1`, all other searches keep
/// rows with `typ > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Any other registered entity.
    Other,
    /// Municipal, city or commune office.
    Office,
}

impl Category {
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Other => 1,
            Self::Office => 2,
        }
    }

    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Other),
            2 => Some(Self::Office),
            _ => None,
        }
    }

    /// Lowest category code excluded by a search (`typ > threshold`).
    #[must_use]
    pub const fn search_threshold(offices_only: bool) -> i64 {
        if offices_only {
            1
        } else {
            0
        }
    }
}

/// A registered organization or office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,

    /// Normalized name.
    pub nazwa: String,

    /// Registry number (REGON).
    pub regon: String,

    /// Normalized postal address: postcode, locality, street.
    pub adres: String,

    pub category: Category,

    /// Canonical mailbox URI, if the entity has any address at all.
    pub skrytka: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_codes_round_trip() {
        for category in [Category::Other, Category::Office] {
            assert_eq!(Category::from_code(category.code()), Some(category));
        }
        assert_eq!(Category::from_code(0), None);
    }

    #[test]
    fn test_offices_only_threshold_excludes_other() {
        let threshold = Category::search_threshold(true);
        assert!(Category::Office.code() > threshold);
        assert!(Category::Other.code() <= threshold);

        let threshold = Category::search_threshold(false);
        assert!(Category::Other.code() > threshold);
    }
}
