//! Query result shapes: pages, cursors, and status tallies.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RepriseError, RepriseResult};
use crate::types::review::ContentType;

/// One page of query results plus the cursor for the next page.
///
/// `next_cursor` is `None` on the last page. An empty page is a normal
/// result, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// An empty final page.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_cursor: None,
        }
    }

    /// Whether this is the last page.
    pub fn is_last(&self) -> bool {
        self.next_cursor.is_none()
    }
}

/// Keyset position within a due-review listing.
///
/// Holds the sort key of the last item already returned
/// (`next_review_at`, then `content_type`, then `content_id`), so pages stay
/// stable when records are inserted or reviewed between requests. Callers
/// only ever see the base64 form; the fields are not part of the public API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DueCursor {
    pub next_review_at: DateTime<Utc>,
    pub content_type: ContentType,
    pub content_id: String,
}

impl DueCursor {
    /// Position after the given sort key.
    pub fn after(
        next_review_at: DateTime<Utc>,
        content_type: ContentType,
        content_id: impl Into<String>,
    ) -> Self {
        Self {
            next_review_at,
            content_type,
            content_id: content_id.into(),
        }
    }

    /// Encode into the opaque token handed to callers.
    pub fn encode(&self) -> RepriseResult<String> {
        let json = serde_json::to_vec(self)?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    /// Decode a caller-supplied token.
    ///
    /// Any undecodable token is an `InvalidInput` error; the engine never
    /// guesses at a position.
    pub fn decode(token: &str) -> RepriseResult<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|e| RepriseError::invalid_cursor(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| RepriseError::invalid_cursor(e.to_string()))
    }

    /// Whether a record's sort key comes strictly after this position.
    pub fn precedes(
        &self,
        next_review_at: DateTime<Utc>,
        content_type: ContentType,
        content_id: &str,
    ) -> bool {
        let lhs = (self.next_review_at, self.content_type.to_string());
        let rhs = (next_review_at, content_type.to_string());
        match lhs.0.cmp(&rhs.0) {
            std::cmp::Ordering::Less => true,
            std::cmp::Ordering::Greater => false,
            std::cmp::Ordering::Equal => match lhs.1.cmp(&rhs.1) {
                std::cmp::Ordering::Less => true,
                std::cmp::Ordering::Greater => false,
                std::cmp::Ordering::Equal => self.content_id.as_str() < content_id,
            },
        }
    }
}

/// Per-status record counts for one user (optionally one content family).
///
/// `due` counts active records whose `next_review_at` has elapsed; `leeches`
/// counts records at or past the lapse threshold. Both overlap the status
/// buckets rather than adding to them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusTally {
    pub learning: u64,
    pub reviewing: u64,
    pub suspended: u64,
    pub due: u64,
    pub leeches: u64,
}

impl StatusTally {
    /// Total records across all statuses.
    pub fn total(&self) -> u64 {
        self.learning + self.reviewing + self.suspended
    }
}

/// Caller-facing scheduling summary built from a [`StatusTally`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub user_id: String,
    /// `None` means the summary spans every content family.
    pub content_type: Option<ContentType>,
    pub learning: u64,
    pub reviewing: u64,
    pub suspended: u64,
    pub due: u64,
    pub leeches: u64,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_cursor_round_trip() {
        let cursor = DueCursor::after(Utc::now(), ContentType::Flashcard, "card-42");
        let token = cursor.encode().unwrap();
        assert!(!token.contains('='), "token should be unpadded");
        let decoded = DueCursor::decode(&token).unwrap();
        assert_eq!(decoded, cursor);
    }

    #[test]
    fn test_cursor_rejects_garbage() {
        assert!(DueCursor::decode("not base64!!").is_err());
        // Valid base64, invalid payload
        let token = URL_SAFE_NO_PAD.encode(b"{\"nope\":1}");
        assert!(DueCursor::decode(&token).is_err());
    }

    #[test]
    fn test_cursor_ordering_by_time_then_key() {
        let t0 = Utc::now();
        let cursor = DueCursor::after(t0, ContentType::Flashcard, "m");

        // Strictly later timestamps come after the cursor
        assert!(cursor.precedes(t0 + Duration::seconds(1), ContentType::Flashcard, "a"));
        // Earlier timestamps do not
        assert!(!cursor.precedes(t0 - Duration::seconds(1), ContentType::Flashcard, "z"));
        // Same timestamp: tie-break on content type text, then id
        assert!(cursor.precedes(t0, ContentType::Question, "a"));
        assert!(!cursor.precedes(t0, ContentType::ExamQuestion, "a"));
        assert!(cursor.precedes(t0, ContentType::Flashcard, "n"));
        assert!(!cursor.precedes(t0, ContentType::Flashcard, "m"));
    }

    #[test]
    fn test_tally_total() {
        let tally = StatusTally {
            learning: 3,
            reviewing: 5,
            suspended: 2,
            due: 4,
            leeches: 1,
        };
        assert_eq!(tally.total(), 10);
    }

    #[test]
    fn test_empty_page_is_last() {
        let page: Page<u32> = Page::empty();
        assert!(page.is_last());
        assert!(page.items.is_empty());
    }
}
