//! Query/search façade and text-matching helpers.
//!
//! One read path per listable entity: an empty query lists everything in
//! scope, a non-empty query narrows the same listing to rows whose text
//! matches. Matching is case-insensitive and accepts either a plain
//! substring hit or trigram word similarity, mirroring PostgreSQL's
//! `ILIKE` + `pg_trgm` `<%` pair used by the database store.

use std::collections::HashSet;

use crate::entities::{Comment, Post, Topic};
use crate::error::{CoreError, CoreResult};
use crate::lifecycle::ForumService;
use crate::store::ListFilter;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum page size accepted on listings.
pub const MAX_LIST_LIMIT: i64 = 100;

/// Share of query trigrams that must appear in the text for a fuzzy match.
///
/// Same default as PostgreSQL's `pg_trgm.word_similarity_threshold`.
pub const WORD_SIMILARITY_THRESHOLD: f64 = 0.6;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Where a post search looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    /// Every post in every topic.
    Global,
    /// Posts of a single topic.
    Topic(DbId),
}

/// Caller-facing listing/search parameters, before normalisation.
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub query: Option<String>,
    pub include_removed: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl SearchRequest {
    /// A plain "list everything active" request.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn text(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }

    /// Normalise into the filter handed to the store.
    pub fn to_filter(&self) -> ListFilter {
        ListFilter {
            text: self.query.as_deref().and_then(normalize_query),
            include_removed: self.include_removed,
            limit: self.limit.map(|l| clamp_limit(l, MAX_LIST_LIMIT)),
            offset: clamp_offset(self.offset),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Trim a raw query, returning `None` when nothing searchable is left.
pub fn normalize_query(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Clamp a user-provided limit to `1..=max`.
pub fn clamp_limit(limit: i64, max: i64) -> i64 {
    limit.max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Escape `%`, `_` and `\` so user input is matched literally by `ILIKE`.
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Extract the pg_trgm-style trigram set of `text`.
///
/// Text is lowercased and split into alphanumeric words; each word is padded
/// with two leading spaces and one trailing space before windowing.
pub fn trigrams(text: &str) -> HashSet<[char; 3]> {
    let mut set = HashSet::new();
    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let padded: Vec<char> = "  "
            .chars()
            .chain(word.chars().flat_map(char::to_lowercase))
            .chain(std::iter::once(' '))
            .collect();
        for window in padded.windows(3) {
            set.insert([window[0], window[1], window[2]]);
        }
    }
    set
}

/// Fraction of the query's trigrams present in `text` (0.0 when the query
/// has none).
pub fn word_similarity(query: &str, text: &str) -> f64 {
    let wanted = trigrams(query);
    if wanted.is_empty() {
        return 0.0;
    }
    let present = trigrams(text);
    let hits = wanted.iter().filter(|t| present.contains(*t)).count();
    hits as f64 / wanted.len() as f64
}

/// Whether `query` matches any of `fields`: case-insensitive substring, or
/// word similarity at or above [`WORD_SIMILARITY_THRESHOLD`].
pub fn text_matches(query: &str, fields: &[&str]) -> bool {
    let haystack = fields.join(" ");
    if haystack.to_lowercase().contains(&query.to_lowercase()) {
        return true;
    }
    word_similarity(query, &haystack) >= WORD_SIMILARITY_THRESHOLD
}

// ---------------------------------------------------------------------------
// Façade
// ---------------------------------------------------------------------------

impl ForumService {
    /// List or search topics, newest first. Removed topics are excluded
    /// unless the request opts in.
    pub async fn search_topics(&self, request: &SearchRequest) -> CoreResult<Vec<Topic>> {
        let filter = request.to_filter();
        Ok(self.store().list_topics(&filter).await?)
    }

    /// List or search posts within `scope`, newest first.
    ///
    /// A topic scope whose topic does not exist is `NotFound`; an existing
    /// topic with no matching posts is an empty list.
    pub async fn search_posts(
        &self,
        scope: SearchScope,
        request: &SearchRequest,
    ) -> CoreResult<Vec<Post>> {
        let filter = request.to_filter();
        let topic_id = match scope {
            SearchScope::Global => None,
            SearchScope::Topic(topic_id) => {
                self.get_topic(topic_id).await?;
                Some(topic_id)
            }
        };
        Ok(self.store().list_posts(topic_id, &filter).await?)
    }

    /// Every comment on a post in thread order, removed ones included.
    pub async fn list_comments(&self, post_id: DbId) -> CoreResult<Vec<Comment>> {
        if self.store().find_post(post_id).await?.is_none() {
            return Err(CoreError::NotFound {
                entity: "Post",
                id: post_id,
            });
        }
        Ok(self.store().list_comments(post_id).await?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- normalize_query -----------------------------------------------------

    #[test]
    fn empty_and_blank_queries_normalize_to_none() {
        assert_eq!(normalize_query(""), None);
        assert_eq!(normalize_query("   \t"), None);
    }

    #[test]
    fn query_is_trimmed() {
        assert_eq!(normalize_query("  rust "), Some("rust".to_string()));
    }

    // -- clamps --------------------------------------------------------------

    #[test]
    fn clamp_limit_bounds() {
        assert_eq!(clamp_limit(0, 100), 1);
        assert_eq!(clamp_limit(-3, 100), 1);
        assert_eq!(clamp_limit(500, 100), 100);
        assert_eq!(clamp_limit(25, 100), 25);
    }

    #[test]
    fn clamp_offset_floors_at_zero() {
        assert_eq!(clamp_offset(None), 0);
        assert_eq!(clamp_offset(Some(-10)), 0);
        assert_eq!(clamp_offset(Some(40)), 40);
    }

    #[test]
    fn request_without_limit_stays_unbounded() {
        let filter = SearchRequest::text("  go ").to_filter();
        assert_eq!(filter.text.as_deref(), Some("go"));
        assert_eq!(filter.limit, None);
        assert_eq!(filter.offset, 0);
        assert!(!filter.include_removed);
    }

    // -- escape_like ---------------------------------------------------------

    #[test]
    fn escape_like_escapes_wildcards() {
        assert_eq!(escape_like("100%_sure\\"), "100\\%\\_sure\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    // -- matching ------------------------------------------------------------

    #[test]
    fn exact_substring_always_matches() {
        assert!(text_matches("borrow", &["The borrow checker", "explained"]));
        assert!(text_matches("w ch", &["The borrow checker"]));
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert!(text_matches("RUST", &["rust tips", ""]));
        assert!(text_matches("async", &["Async Rust", ""]));
    }

    #[test]
    fn near_miss_matches_by_similarity() {
        assert!(word_similarity("programing", "Programming in Rust") >= WORD_SIMILARITY_THRESHOLD);
        assert!(text_matches("programing", &["Programming in Rust", "a book"]));
    }

    #[test]
    fn unrelated_text_does_not_match() {
        assert!(!text_matches("kubernetes", &["Gardening", "Tomatoes and basil"]));
    }

    #[test]
    fn punctuation_only_query_has_no_trigrams() {
        assert_eq!(word_similarity("!!", "anything"), 0.0);
    }

    #[test]
    fn trigrams_are_padded_per_word() {
        let set = trigrams("Cat");
        assert!(set.contains(&[' ', ' ', 'c']));
        assert!(set.contains(&[' ', 'c', 'a']));
        assert!(set.contains(&['c', 'a', 't']));
        assert!(set.contains(&['a', 't', ' ']));
        assert_eq!(set.len(), 4);
    }
}
