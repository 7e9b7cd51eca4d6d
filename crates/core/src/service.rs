//! The MedCodes application state in one place.
//!
//! [`MedCodesService`] owns the shared catalog and the three persisted state objects
//! (favourites, recent searches, auth session). Front ends build one at startup and call
//! through it; there are no process-wide singletons.

use crate::auth::{AuthService, UserDirectory};
use crate::browse::{browse, CategoryIndex};
use crate::catalog::CodeCatalog;
use crate::code::MedicalCode;
use crate::config::CoreConfig;
use crate::constants::{FAVORITES_STORAGE_KEY, SEARCH_STORAGE_KEY};
use crate::favorites::FavoriteSet;
use crate::history::SearchHistory;
use crate::persisted::Persisted;
use crate::query::{search, CodeFilters};
use crate::stats::{CatalogStats, UsageStats};
use crate::storage::{JsonFileStore, KeyValueStore};
use crate::CoreResult;
use std::sync::Arc;

#[derive(Debug)]
pub struct MedCodesService {
    catalog: Arc<CodeCatalog>,
    favorites: Persisted<FavoriteSet>,
    history: Persisted<SearchHistory>,
    auth: AuthService,
}

impl MedCodesService {
    /// Loads the configured catalog and opens file-backed storage under the data directory.
    pub fn new(cfg: Arc<CoreConfig>) -> CoreResult<Self> {
        let catalog = Arc::new(cfg.load_catalog()?);
        let storage: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::new(cfg.data_dir()));
        tracing::debug!(
            data_dir = %cfg.data_dir().display(),
            codes = catalog.len(),
            "opened medcodes state"
        );
        Ok(Self::with_storage(catalog, storage, UserDirectory::demo()?))
    }

    pub fn with_storage(
        catalog: Arc<CodeCatalog>,
        storage: Arc<dyn KeyValueStore>,
        directory: UserDirectory,
    ) -> Self {
        Self {
            catalog,
            favorites: Persisted::load(FAVORITES_STORAGE_KEY, storage.clone()),
            history: Persisted::load(SEARCH_STORAGE_KEY, storage.clone()),
            auth: AuthService::new(directory, storage),
        }
    }

    pub fn get_code(&self, id: &str) -> Option<&MedicalCode> {
        self.catalog.get(id)
    }

    pub fn search(&self, query: &str, filters: &CodeFilters) -> Vec<&MedicalCode> {
        search(&self.catalog, query, filters)
    }

    /// Runs a search and records the query in the recent-search history.
    pub fn submit_search(&self, query: &str, filters: &CodeFilters) -> Vec<&MedicalCode> {
        self.history.update(|h| h.add_recent_search(query));
        self.search(query, filters)
    }

    pub fn browse(&self) -> CategoryIndex<'_> {
        browse(&self.catalog)
    }

    pub fn favorites(&self) -> &Persisted<FavoriteSet> {
        &self.favorites
    }

    pub fn history(&self) -> &Persisted<SearchHistory> {
        &self.history
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    /// Favourites resolved against the catalog, in catalog order.
    pub fn favorite_codes(&self) -> Vec<&MedicalCode> {
        self.favorites.read(|f| f.favorite_codes(&self.catalog))
    }

    pub fn catalog_stats(&self) -> CatalogStats {
        CatalogStats::compute(&self.catalog)
    }

    pub fn usage_stats(&self) -> UsageStats {
        UsageStats {
            favorite_count: self.favorites.read(FavoriteSet::len),
            recent_search_count: self.history.read(SearchHistory::len),
        }
    }
}
