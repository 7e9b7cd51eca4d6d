//! Recent-search history.
//!
//! Most-recent-first, de-duplicated ignoring case, capped at [`RECENT_SEARCH_LIMIT`].
//! Persisted as `{"recentSearches": [...]}`; entries loaded from storage are normalised through
//! the same rules, so an over-long or duplicated blob cannot break the invariants.

use crate::constants::{POPULAR_SEARCHES, RECENT_SEARCH_LIMIT};
use medcodes_types::NonEmptyText;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredHistory", into = "StoredHistory")]
pub struct SearchHistory {
    entries: Vec<NonEmptyText>,
}

#[derive(Serialize, Deserialize)]
struct StoredHistory {
    #[serde(rename = "recentSearches", default)]
    recent_searches: Vec<String>,
}

impl From<StoredHistory> for SearchHistory {
    fn from(stored: StoredHistory) -> Self {
        let mut history = SearchHistory::default();
        // Blank entries are skipped individually.
        let valid = stored
            .recent_searches
            .iter()
            .filter_map(|q| NonEmptyText::new(q).ok());
        for query in valid.rev() {
            history.push_front(query);
        }
        history
    }
}

impl From<SearchHistory> for StoredHistory {
    fn from(history: SearchHistory) -> Self {
        StoredHistory {
            recent_searches: history
                .entries
                .into_iter()
                .map(NonEmptyText::into_inner)
                .collect(),
        }
    }
}

impl SearchHistory {
    /// Records a submitted query.
    ///
    /// Blank queries are ignored. Otherwise any entry equal to the trimmed query ignoring case is
    /// removed, the trimmed query is placed first, and the list is cut back to the limit.
    ///
    /// # Returns
    /// `true` if the history changed.
    pub fn add_recent_search(&mut self, query: &str) -> bool {
        match NonEmptyText::new(query) {
            Ok(query) => {
                self.push_front(query);
                true
            }
            Err(_) => false,
        }
    }

    pub fn clear_recent_searches(&mut self) {
        self.entries.clear();
    }

    fn push_front(&mut self, query: NonEmptyText) {
        self.entries.retain(|existing| !existing.eq_ignore_case(query.as_str()));
        self.entries.insert(0, query);
        self.entries.truncate(RECENT_SEARCH_LIMIT);
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(NonEmptyText::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.entries().map(str::to_owned).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Suggestions offered on an empty search box.
pub fn popular_searches() -> &'static [&'static str] {
    &POPULAR_SEARCHES
}
