//! # API Shared
//!
//! Shared wire definitions for the MedCodes APIs.
//!
//! Contains:
//! - Request/response types (`wire` module) serialised as JSON and described for OpenAPI
//! - Shared services like `HealthService`
//!
//! Used by `medcodes-core` (which converts domain records into these types), `api-rest` and
//! the CLI.

pub mod health;
pub mod wire;

pub use health::HealthService;
pub use wire::*;
