//! # MedCodes Core
//!
//! Core logic for the MedCodes medical-code reference:
//! - the read-only [`CodeCatalog`] of CPT and ICD-10 records
//! - search and filtering ([`query`]), specialty grouping ([`browse`], [`categorize`])
//! - per-user state: favourites, recent searches and a mocked sign-in, each persisted through a
//!   [`KeyValueStore`]
//!
//! **No API concerns**: HTTP routing and command-line parsing belong in `api-rest` and `cli`.
//! Wire types shared with those front ends live in `api-shared`.

pub mod auth;
pub mod browse;
pub mod catalog;
pub mod categorize;
pub mod code;
pub mod config;
pub mod constants;
pub mod error;
pub mod favorites;
pub mod history;
pub mod persisted;
pub mod query;
pub mod service;
pub mod stats;
pub mod storage;

pub use api_shared::wire;

pub use auth::{AuthService, AuthSession, ProfileUpdate, Role, User, UserDirectory};
pub use browse::{browse, CategoryGroup, CategoryIndex};
pub use catalog::CodeCatalog;
pub use categorize::{categorize, Category};
pub use code::{CodeType, Coverage, CoverageStatus, InsuranceType, MedicalCode};
pub use config::CoreConfig;
pub use error::{CoreError, CoreResult};
pub use favorites::FavoriteSet;
pub use history::{popular_searches, SearchHistory};
pub use persisted::Persisted;
pub use query::{search, search_codes, CodeFilters, Filter, FilterState};
pub use service::MedCodesService;
pub use stats::{CatalogStats, UsageStats};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
