//! Catalog and usage statistics.

use crate::catalog::CodeCatalog;
use crate::code::{CodeType, CoverageStatus, InsuranceType};
use api_shared::wire::StatsRes;
use serde::Serialize;

/// Counts over the whole catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub total_codes: usize,
    pub cpt_codes: usize,
    pub icd_codes: usize,
    pub covered_codes: usize,
    pub not_covered_codes: usize,
    pub conditional_codes: usize,
    /// Medicare or Both.
    pub medicare_codes: usize,
    /// Medicaid or Both.
    pub medicaid_codes: usize,
    pub both_insurance: usize,
}

impl CatalogStats {
    pub fn compute(catalog: &CodeCatalog) -> Self {
        let mut stats = CatalogStats::default();
        for code in catalog {
            stats.total_codes += 1;

            match code.code_type {
                CodeType::Cpt => stats.cpt_codes += 1,
                CodeType::Icd10 => stats.icd_codes += 1,
            }

            match code.coverage.status {
                CoverageStatus::Covered => stats.covered_codes += 1,
                CoverageStatus::NotCovered => stats.not_covered_codes += 1,
                CoverageStatus::Conditional => stats.conditional_codes += 1,
            }

            let insurance = code.coverage.insurance;
            if insurance.includes_medicare() {
                stats.medicare_codes += 1;
            }
            if insurance.includes_medicaid() {
                stats.medicaid_codes += 1;
            }
            if insurance == InsuranceType::Both {
                stats.both_insurance += 1;
            }
        }
        stats
    }

    /// Share of codes with status Covered, rounded half up. Zero for an empty catalog.
    pub fn coverage_percentage(&self) -> usize {
        if self.total_codes == 0 {
            return 0;
        }
        (self.covered_codes * 100 + self.total_codes / 2) / self.total_codes
    }

    pub fn to_wire(&self) -> StatsRes {
        let n = |v: usize| u32::try_from(v).unwrap_or(u32::MAX);
        StatsRes {
            total_codes: n(self.total_codes),
            cpt_codes: n(self.cpt_codes),
            icd_codes: n(self.icd_codes),
            covered_codes: n(self.covered_codes),
            not_covered_codes: n(self.not_covered_codes),
            conditional_codes: n(self.conditional_codes),
            medicare_codes: n(self.medicare_codes),
            medicaid_codes: n(self.medicaid_codes),
            both_insurance: n(self.both_insurance),
            coverage_percentage: n(self.coverage_percentage()),
        }
    }
}

/// Per-user activity shown alongside the catalog counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UsageStats {
    pub favorite_count: usize,
    pub recent_search_count: usize,
}
