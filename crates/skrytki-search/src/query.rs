use skrytki_core::model::Category;

use crate::error::LookupError;

/// Result limit used when the caller does not give one.
pub const DEFAULT_LIMIT: usize = 100;

/// A validated search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    raw: String,
    wildcard: String,
    offices_only: bool,
    limit: usize,
}

impl SearchQuery {
    /// Validate and normalize a request.
    ///
    /// The text is trimmed. An empty text or a zero limit is rejected.
    pub fn new(text: &str, offices_only: bool, limit: usize) -> Result<Self, LookupError> {
        let raw = text.trim();
        if raw.is_empty() {
            return Err(LookupError::InvalidInput("empty search query".to_string()));
        }
        if limit == 0 {
            return Err(LookupError::InvalidInput(
                "limit must be a positive integer".to_string(),
            ));
        }

        Ok(Self {
            raw: raw.to_string(),
            wildcard: format!("%{}%", raw.replace(' ', "%")),
            offices_only,
            limit,
        })
    }

    /// The trimmed query text.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// `LIKE` pattern: every space becomes a wildcard and the whole text
    /// is wrapped in wildcards.
    #[must_use]
    pub fn wildcard(&self) -> &str {
        &self.wildcard
    }

    #[must_use]
    pub const fn offices_only(&self) -> bool {
        self.offices_only
    }

    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Rows pass the category filter when `typ > category_threshold()`.
    #[must_use]
    pub const fn category_threshold(&self) -> i64 {
        Category::search_threshold(self.offices_only)
    }
}
