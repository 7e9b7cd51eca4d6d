//! Constants used throughout the MedCodes core crate.

/// Default directory for persisted key-value blobs when none is configured.
pub const DEFAULT_DATA_DIR: &str = "medcodes_data";

/// Storage key for the signed-in session.
pub const AUTH_STORAGE_KEY: &str = "auth-storage";

/// Storage key for the favourites set.
pub const FAVORITES_STORAGE_KEY: &str = "favorites-storage";

/// Storage key for the recent-search history.
pub const SEARCH_STORAGE_KEY: &str = "search-storage";

/// Envelope version written alongside every persisted blob.
pub const STORAGE_VERSION: u32 = 0;

/// Maximum number of entries kept in the recent-search history.
pub const RECENT_SEARCH_LIMIT: usize = 10;

/// Page size used by the remote search endpoint when no limit is supplied.
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

/// Largest page size the remote search endpoint accepts.
pub const MAX_SEARCH_LIMIT: u32 = 100;

/// Suggestions offered before the user has typed anything.
pub const POPULAR_SEARCHES: [&str; 9] = [
    "99213",
    "99214",
    "diabetes",
    "hypertension",
    "chest pain",
    "physical therapy",
    "colonoscopy",
    "mammogram",
    "depression",
];

/// Built-in reference catalog, embedded at compile time.
pub const BUILTIN_CATALOG_JSON: &str = include_str!("../data/codes.json");
