//! Code search and filtering.
//!
//! Searching is a linear scan over the catalog: a case-insensitive substring match on the code
//! or its description, ANDed with optional type, coverage and insurance filters. Results keep
//! catalog order and are never re-ranked.
//!
//! Search itself cannot fail. A filter label that does not name a known value is kept as
//! [`Filter::Unrecognised`] and matches nothing, so callers that pass raw user input get an
//! empty result rather than an error. Strict validation happens at the API boundary
//! ([`search_codes`]).

use crate::catalog::CodeCatalog;
use crate::code::{CodeType, CoverageStatus, InsuranceType, MedicalCode};
use crate::constants::{DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT};
use crate::{CoreError, CoreResult};
use api_shared::wire::{SearchCodesReq, SearchCodesRes};
use std::fmt;
use std::str::FromStr;

/// Label used for the pass-through filter value.
pub const ALL_LABEL: &str = "All";

/// A single filter dimension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Filter<T> {
    /// Pass everything through.
    All,
    /// Keep records whose field equals this value.
    Only(T),
    /// A label that did not parse. Matches nothing.
    Unrecognised(String),
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Filter::All
    }
}

impl<T: PartialEq> Filter<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(wanted) => wanted == value,
            Filter::Unrecognised(_) => false,
        }
    }
}

impl<T: FromStr> Filter<T> {
    /// Parses a filter label, keeping unknown labels as [`Filter::Unrecognised`].
    pub fn lenient(label: &str) -> Self {
        let trimmed = label.trim();
        if trimmed.eq_ignore_ascii_case(ALL_LABEL) {
            return Filter::All;
        }
        match trimmed.parse::<T>() {
            Ok(value) => Filter::Only(value),
            Err(_) => Filter::Unrecognised(label.to_owned()),
        }
    }

    /// Parses a filter label, rejecting unknown labels.
    pub fn strict(label: &str) -> CoreResult<Self> {
        match Self::lenient(label) {
            Filter::Unrecognised(value) => Err(CoreError::InvalidInput(format!(
                "unrecognised filter value: {value}"
            ))),
            parsed => Ok(parsed),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => f.write_str(ALL_LABEL),
            Filter::Only(value) => value.fmt(f),
            Filter::Unrecognised(value) => f.write_str(value),
        }
    }
}

/// The three structured filter dimensions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeFilters {
    pub code_type: Filter<CodeType>,
    pub coverage: Filter<CoverageStatus>,
    pub insurance: Filter<InsuranceType>,
}

impl CodeFilters {
    pub fn admits(&self, code: &MedicalCode) -> bool {
        self.code_type.admits(&code.code_type)
            && self.coverage.admits(&code.coverage.status)
            && self.insurance.admits(&code.coverage.insurance)
    }
}

/// Returns the catalog records matching `query` and `filters`, in catalog order.
///
/// A blank query matches every record. The query is trimmed before matching.
pub fn search<'a>(
    catalog: &'a CodeCatalog,
    query: &str,
    filters: &CodeFilters,
) -> Vec<&'a MedicalCode> {
    let needle = query.trim().to_lowercase();
    catalog
        .iter()
        .filter(|code| code.matches_lowercase(&needle) && filters.admits(code))
        .collect()
}

/// Ephemeral search screen state: the current query and filters.
///
/// Never persisted; a fresh process starts from the defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search_query: String,
    pub filters: CodeFilters,
}

impl FilterState {
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn set_filter_type(&mut self, filter: Filter<CodeType>) {
        self.filters.code_type = filter;
    }

    pub fn set_filter_coverage(&mut self, filter: Filter<CoverageStatus>) {
        self.filters.coverage = filter;
    }

    pub fn set_filter_insurance(&mut self, filter: Filter<InsuranceType>) {
        self.filters.insurance = filter;
    }

    /// Resets the three filters to `All`. The query is left alone.
    pub fn reset_filters(&mut self) {
        self.filters = CodeFilters::default();
    }

    pub fn filtered_codes<'a>(&self, catalog: &'a CodeCatalog) -> Vec<&'a MedicalCode> {
        search(catalog, &self.search_query, &self.filters)
    }
}

/// Runs a search request from the REST API.
///
/// Mirrors [`search`] restricted to a type filter and truncated to `limit`. `total` counts the
/// matches before truncation and `query` echoes the request (or `""`).
///
/// # Errors
///
/// Returns `CoreError::InvalidInput` if `limit` is outside `1..=100` or `type` is not one of
/// `CPT`, `ICD-10` or `All`.
pub fn search_codes(catalog: &CodeCatalog, req: &SearchCodesReq) -> CoreResult<SearchCodesRes> {
    let limit = req.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
    if !(1..=MAX_SEARCH_LIMIT).contains(&limit) {
        return Err(CoreError::InvalidInput(format!(
            "limit must be between 1 and {MAX_SEARCH_LIMIT}, got {limit}"
        )));
    }

    let code_type = match req.code_type.as_deref() {
        Some(label) => Filter::<CodeType>::strict(label)?,
        None => Filter::All,
    };

    let query = req.query.clone().unwrap_or_default();
    let filters = CodeFilters {
        code_type,
        ..CodeFilters::default()
    };

    let matches = search(catalog, &query, &filters);
    let total = matches.len() as u32;
    let codes = matches
        .into_iter()
        .take(limit as usize)
        .map(MedicalCode::to_wire)
        .collect();

    Ok(SearchCodesRes {
        codes,
        total,
        query,
        code_type: filters.code_type.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::two_code_catalog;

    fn builtin() -> CodeCatalog {
        CodeCatalog::builtin().expect("builtin catalog")
    }

    fn codes_of(results: &[&MedicalCode]) -> Vec<String> {
        results.iter().map(|c| c.code.clone()).collect()
    }

    #[test]
    fn blank_query_returns_whole_catalog_in_order() {
        let catalog = builtin();
        for query in ["", "   ", "\t"] {
            let results = search(&catalog, query, &CodeFilters::default());
            let expected: Vec<&MedicalCode> = catalog.iter().collect();
            assert_eq!(results, expected);
        }
    }

    #[test]
    fn query_is_case_insensitive() {
        let catalog = builtin();
        let results = search(&catalog, "e11.9", &CodeFilters::default());
        assert_eq!(codes_of(&results), vec!["E11.9"]);

        let results = search(&catalog, "HYPERTENSION", &CodeFilters::default());
        assert_eq!(codes_of(&results), vec!["I10"]);
    }

    #[test]
    fn query_matches_code_prefix_and_description() {
        let catalog = builtin();
        let results = search(&catalog, "9921", &CodeFilters::default());
        assert_eq!(codes_of(&results), vec!["99213", "99214", "99215"]);

        let results = search(&catalog, "established patient", &CodeFilters::default());
        assert_eq!(codes_of(&results), vec!["99213", "99214", "99215"]);
    }

    #[test]
    fn results_are_subset_of_catalog() {
        let catalog = builtin();
        for query in ["a", "visit", "zzz", "9", "."] {
            for result in search(&catalog, query, &CodeFilters::default()) {
                assert_eq!(catalog.get(&result.id), Some(result));
            }
        }
    }

    #[test]
    fn type_filter_selects_cpt_only() {
        let catalog = two_code_catalog();
        let filters = CodeFilters {
            code_type: Filter::Only(CodeType::Cpt),
            ..CodeFilters::default()
        };
        let results = search(&catalog, "", &filters);
        assert_eq!(codes_of(&results), vec!["99213"]);
    }

    #[test]
    fn description_match_finds_diagnosis() {
        let catalog = two_code_catalog();
        let results = search(&catalog, "diabetes", &CodeFilters::default());
        assert_eq!(codes_of(&results), vec!["E11.9"]);
    }

    #[test]
    fn filters_are_anded() {
        let catalog = builtin();
        let filters = CodeFilters {
            code_type: Filter::Only(CodeType::Cpt),
            coverage: Filter::Only(CoverageStatus::Conditional),
            insurance: Filter::Only(InsuranceType::Medicare),
        };
        let results = search(&catalog, "", &filters);
        assert_eq!(codes_of(&results), vec!["97110"]);

        let results = search(&catalog, "psychotherapy", &filters);
        assert!(results.is_empty());
    }

    #[test]
    fn coverage_filter_matches_not_covered() {
        let catalog = builtin();
        let filters = CodeFilters {
            coverage: Filter::Only(CoverageStatus::NotCovered),
            ..CodeFilters::default()
        };
        assert_eq!(codes_of(&search(&catalog, "", &filters)), vec!["M79.3"]);
    }

    #[test]
    fn unrecognised_filter_matches_nothing() {
        let catalog = builtin();
        let filters = CodeFilters {
            insurance: Filter::lenient("Private"),
            ..CodeFilters::default()
        };
        assert_eq!(filters.insurance, Filter::Unrecognised("Private".into()));
        assert!(search(&catalog, "", &filters).is_empty());
    }

    #[test]
    fn empty_filter_label_matches_nothing() {
        let catalog = builtin();
        let filters = CodeFilters {
            code_type: Filter::lenient(""),
            ..CodeFilters::default()
        };
        assert_eq!(filters.code_type, Filter::Unrecognised(String::new()));
        assert!(search(&catalog, "", &filters).is_empty());
    }

    #[test]
    fn lenient_parses_all_and_known_labels() {
        assert_eq!(Filter::<CodeType>::lenient("All"), Filter::All);
        assert_eq!(Filter::<CodeType>::lenient("all"), Filter::All);
        assert_eq!(
            Filter::<CodeType>::lenient("ICD-10"),
            Filter::Only(CodeType::Icd10)
        );
        assert!(Filter::<CodeType>::strict("HCPCS").is_err());
    }

    #[test]
    fn filter_state_reset_keeps_query() {
        let catalog = builtin();
        let mut state = FilterState::default();
        state.set_search_query("visit");
        state.set_filter_type(Filter::Only(CodeType::Icd10));
        assert!(state.filtered_codes(&catalog).is_empty());

        state.reset_filters();
        assert_eq!(state.search_query, "visit");
        assert_eq!(state.filters, CodeFilters::default());
        assert_eq!(
            codes_of(&state.filtered_codes(&catalog)),
            vec!["99213", "99214", "99215"]
        );
    }

    #[test]
    fn search_codes_defaults() {
        let catalog = builtin();
        let res = search_codes(&catalog, &SearchCodesReq::default()).unwrap();
        assert_eq!(res.total, 15);
        assert_eq!(res.codes.len(), 15);
        assert_eq!(res.query, "");
        assert_eq!(res.code_type, "All");
    }

    #[test]
    fn search_codes_truncates_but_counts_all_matches() {
        let catalog = builtin();
        let req = SearchCodesReq {
            query: None,
            code_type: Some("CPT".into()),
            limit: Some(2),
        };
        let res = search_codes(&catalog, &req).unwrap();
        assert_eq!(res.total, 9);
        assert_eq!(res.codes.len(), 2);
        assert_eq!(res.codes[0].code, "99213");
        assert_eq!(res.codes[1].code, "99214");
        assert_eq!(res.code_type, "CPT");
    }

    #[test]
    fn search_codes_echoes_query() {
        let catalog = two_code_catalog();
        let req = SearchCodesReq {
            query: Some("Diabetes".into()),
            code_type: Some("All".into()),
            limit: None,
        };
        let res = search_codes(&catalog, &req).unwrap();
        assert_eq!(res.query, "Diabetes");
        assert_eq!(res.total, 1);
        assert_eq!(res.codes[0].id, "2");
        assert_eq!(res.codes[0].category, "Endocrine");
    }

    #[test]
    fn search_codes_rejects_out_of_range_limit() {
        let catalog = builtin();
        for limit in [0, 101] {
            let req = SearchCodesReq {
                limit: Some(limit),
                ..SearchCodesReq::default()
            };
            let err = search_codes(&catalog, &req).expect_err("limit out of range");
            assert!(matches!(err, CoreError::InvalidInput(msg) if msg.contains("limit")));
        }
    }

    #[test]
    fn search_codes_rejects_unknown_type() {
        let catalog = builtin();
        let req = SearchCodesReq {
            code_type: Some("HCPCS".into()),
            ..SearchCodesReq::default()
        };
        assert!(matches!(
            search_codes(&catalog, &req),
            Err(CoreError::InvalidInput(_))
        ));
    }
}
