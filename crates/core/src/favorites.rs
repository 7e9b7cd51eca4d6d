//! Favourite codes.
//!
//! A set of catalog ids with toggle semantics. Insertion order is kept so lists render in the
//! order codes were starred; membership and equality are set semantics.

use crate::catalog::CodeCatalog;
use crate::code::MedicalCode;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "StoredFavorites", into = "StoredFavorites")]
pub struct FavoriteSet {
    ids: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct StoredFavorites {
    #[serde(default)]
    favorites: Vec<String>,
}

impl From<StoredFavorites> for FavoriteSet {
    fn from(stored: StoredFavorites) -> Self {
        let mut set = FavoriteSet::default();
        for id in stored.favorites {
            set.add_favorite(&id);
        }
        set
    }
}

impl From<FavoriteSet> for StoredFavorites {
    fn from(set: FavoriteSet) -> Self {
        StoredFavorites { favorites: set.ids }
    }
}

impl PartialEq for FavoriteSet {
    fn eq(&self, other: &Self) -> bool {
        self.ids.len() == other.ids.len() && self.ids.iter().all(|id| other.is_favorite(id))
    }
}

impl Eq for FavoriteSet {}

impl FavoriteSet {
    pub fn is_favorite(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    /// Adds `id`. Adding an id that is already present is a no-op.
    pub fn add_favorite(&mut self, id: &str) {
        if !self.is_favorite(id) {
            self.ids.push(id.to_owned());
        }
    }

    /// Removes `id`. Removing an absent id is a no-op.
    pub fn remove_favorite(&mut self, id: &str) {
        self.ids.retain(|existing| existing != id);
    }

    /// Flips membership of `id`.
    ///
    /// # Returns
    /// `true` if `id` is a favourite after the call.
    pub fn toggle_favorite(&mut self, id: &str) -> bool {
        if self.is_favorite(id) {
            self.remove_favorite(id);
            false
        } else {
            self.add_favorite(id);
            true
        }
    }

    pub fn clear_favorites(&mut self) {
        self.ids.clear();
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Resolves favourites against the catalog, in catalog order. Ids the catalog does not know
    /// are skipped.
    pub fn favorite_codes<'a>(&self, catalog: &'a CodeCatalog) -> Vec<&'a MedicalCode> {
        catalog
            .iter()
            .filter(|code| self.is_favorite(&code.id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_twice_restores_empty_set() {
        let mut set = FavoriteSet::default();
        assert!(set.toggle_favorite("5"));
        assert!(set.is_favorite("5"));
        assert!(!set.toggle_favorite("5"));
        assert_eq!(set, FavoriteSet::default());
    }

    #[test]
    fn toggle_twice_restores_non_empty_set() {
        let mut set = FavoriteSet::default();
        set.add_favorite("1");
        set.add_favorite("3");
        let before = set.clone();

        set.toggle_favorite("3");
        set.toggle_favorite("3");
        assert_eq!(set, before);
    }

    #[test]
    fn add_and_remove_are_idempotent() {
        let mut set = FavoriteSet::default();
        set.add_favorite("1");
        set.add_favorite("1");
        assert_eq!(set.len(), 1);

        set.remove_favorite("2");
        assert_eq!(set.len(), 1);
        set.remove_favorite("1");
        set.remove_favorite("1");
        assert!(set.is_empty());
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let mut a = FavoriteSet::default();
        a.add_favorite("1");
        a.add_favorite("2");
        let mut b = FavoriteSet::default();
        b.add_favorite("2");
        b.add_favorite("1");
        assert_eq!(a, b);
    }

    #[test]
    fn clear_removes_everything() {
        let mut set = FavoriteSet::default();
        set.add_favorite("1");
        set.add_favorite("7");
        set.clear_favorites();
        assert!(set.is_empty());
        assert!(!set.is_favorite("1"));
    }

    #[test]
    fn favorite_codes_follow_catalog_order_and_skip_unknown() {
        let catalog = CodeCatalog::builtin().unwrap();
        let mut set = FavoriteSet::default();
        set.add_favorite("12");
        set.add_favorite("missing");
        set.add_favorite("3");

        let codes: Vec<&str> = set
            .favorite_codes(&catalog)
            .iter()
            .map(|c| c.code.as_str())
            .collect();
        assert_eq!(codes, vec!["E11.9", "J44.1"]);
    }

    #[test]
    fn stored_list_is_deduplicated_on_load() {
        let set: FavoriteSet =
            serde_json::from_value(serde_json::json!({ "favorites": ["1", "2", "1"] })).unwrap();
        assert_eq!(set.ids().collect::<Vec<_>>(), vec!["1", "2"]);
        assert_eq!(
            serde_json::to_value(&set).unwrap(),
            serde_json::json!({ "favorites": ["1", "2"] })
        );
    }
}
