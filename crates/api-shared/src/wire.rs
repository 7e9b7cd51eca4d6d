//! JSON request/response types for the MedCodes APIs.
//!
//! Enumerations travel as their display labels (`"CPT"`, `"ICD-10"`, `"Not Covered"`, ...) so
//! the payloads stay readable and match the labels shown to users.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
    pub catalog_size: u32,
}

/// Coverage block of a code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CoverageRes {
    pub status: String,
    pub insurance: String,
    /// Only present for conditionally covered codes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<String>,
}

/// A single catalog entry as returned over the API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MedicalCodeRes {
    pub id: String,
    pub code: String,
    pub description: String,
    #[serde(rename = "type")]
    pub code_type: String,
    pub coverage: CoverageRes,
    pub documentation: Vec<String>,
    pub billing: Vec<String>,
    /// Specialty bucket assigned by the categoriser.
    pub category: String,
}

/// Query parameters accepted by `GET /codes/search`.
///
/// Every field is optional: `type` defaults to `All` and `limit` to 20 (allowed range 1..=100).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchCodesReq {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default, rename = "type")]
    pub code_type: Option<String>,
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SearchCodesRes {
    pub codes: Vec<MedicalCodeRes>,
    /// Number of matches before `limit` was applied.
    pub total: u32,
    pub query: String,
    #[serde(rename = "type")]
    pub code_type: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryGroupRes {
    pub category: String,
    pub count: u32,
    pub codes: Vec<MedicalCodeRes>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BrowseRes {
    pub categories: Vec<CategoryGroupRes>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatsRes {
    pub total_codes: u32,
    pub cpt_codes: u32,
    pub icd_codes: u32,
    pub covered_codes: u32,
    pub not_covered_codes: u32,
    pub conditional_codes: u32,
    pub medicare_codes: u32,
    pub medicaid_codes: u32,
    pub both_insurance: u32,
    pub coverage_percentage: u32,
}
