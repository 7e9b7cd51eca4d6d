//! Medical billing code records.
//!
//! A [`MedicalCode`] is owned by the [`CodeCatalog`](crate::catalog::CodeCatalog) and never
//! mutated after loading. The enumerations serialise as the labels users see, which are also
//! the labels used on disk and over the API.

use crate::categorize::categorize;
use crate::{CoreError, CoreResult};
use api_shared::wire;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Code set a record belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeType {
    #[serde(rename = "CPT")]
    Cpt,
    #[serde(rename = "ICD-10")]
    Icd10,
}

impl CodeType {
    pub const ALL: [CodeType; 2] = [CodeType::Cpt, CodeType::Icd10];

    pub fn label(self) -> &'static str {
        match self {
            CodeType::Cpt => "CPT",
            CodeType::Icd10 => "ICD-10",
        }
    }
}

/// Whether a payer reimburses the code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoverageStatus {
    Covered,
    #[serde(rename = "Not Covered")]
    NotCovered,
    Conditional,
}

impl CoverageStatus {
    pub const ALL: [CoverageStatus; 3] = [
        CoverageStatus::Covered,
        CoverageStatus::NotCovered,
        CoverageStatus::Conditional,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CoverageStatus::Covered => "Covered",
            CoverageStatus::NotCovered => "Not Covered",
            CoverageStatus::Conditional => "Conditional",
        }
    }
}

/// Public payer programme(s) the coverage applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InsuranceType {
    Medicare,
    Medicaid,
    Both,
    Neither,
}

impl InsuranceType {
    pub const ALL: [InsuranceType; 4] = [
        InsuranceType::Medicare,
        InsuranceType::Medicaid,
        InsuranceType::Both,
        InsuranceType::Neither,
    ];

    pub fn label(self) -> &'static str {
        match self {
            InsuranceType::Medicare => "Medicare",
            InsuranceType::Medicaid => "Medicaid",
            InsuranceType::Both => "Both",
            InsuranceType::Neither => "Neither",
        }
    }

    /// True when Medicare pays under this arrangement.
    pub fn includes_medicare(self) -> bool {
        matches!(self, InsuranceType::Medicare | InsuranceType::Both)
    }

    /// True when Medicaid pays under this arrangement.
    pub fn includes_medicaid(self) -> bool {
        matches!(self, InsuranceType::Medicaid | InsuranceType::Both)
    }
}

/// Parses a label case-insensitively against a fixed list of variants.
fn parse_label<T: Copy>(
    kind: &'static str,
    value: &str,
    variants: &[T],
    label: impl Fn(T) -> &'static str,
) -> CoreResult<T> {
    let wanted = value.trim();
    variants
        .iter()
        .copied()
        .find(|v| label(*v).eq_ignore_ascii_case(wanted))
        .ok_or_else(|| CoreError::UnknownLabel {
            kind,
            value: value.to_owned(),
        })
}

impl FromStr for CodeType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label("code type", s, &Self::ALL, Self::label)
    }
}

impl FromStr for CoverageStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label("coverage status", s, &Self::ALL, Self::label)
    }
}

impl FromStr for InsuranceType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label("insurance type", s, &Self::ALL, Self::label)
    }
}

impl fmt::Display for CodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for CoverageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for InsuranceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coverage details for a code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coverage {
    pub status: CoverageStatus,
    pub insurance: InsuranceType,
    /// Free-text conditions. Only meaningful when `status` is `Conditional`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<String>,
}

impl Coverage {
    /// Conditions that apply to this coverage, ignored unless the status is `Conditional`.
    pub fn applicable_conditions(&self) -> Option<&str> {
        match self.status {
            CoverageStatus::Conditional => self.conditions.as_deref(),
            _ => None,
        }
    }
}

/// A single catalog entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalCode {
    pub id: String,
    pub code: String,
    pub description: String,
    #[serde(rename = "type")]
    pub code_type: CodeType,
    pub coverage: Coverage,
    #[serde(default)]
    pub documentation: Vec<String>,
    #[serde(default)]
    pub billing: Vec<String>,
}

impl MedicalCode {
    /// Case-insensitive substring test against the code and its description.
    ///
    /// `needle` must already be lower-cased; an empty needle matches everything.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.code.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }

    /// Converts the record into its API representation, including its category.
    pub fn to_wire(&self) -> wire::MedicalCodeRes {
        wire::MedicalCodeRes {
            id: self.id.clone(),
            code: self.code.clone(),
            description: self.description.clone(),
            code_type: self.code_type.label().to_owned(),
            coverage: wire::CoverageRes {
                status: self.coverage.status.label().to_owned(),
                insurance: self.coverage.insurance.label().to_owned(),
                conditions: self.coverage.conditions.clone(),
            },
            documentation: self.documentation.clone(),
            billing: self.billing.clone(),
            category: categorize(self).label().to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_case_insensitively() {
        assert_eq!("icd-10".parse::<CodeType>().unwrap(), CodeType::Icd10);
        assert_eq!("CPT".parse::<CodeType>().unwrap(), CodeType::Cpt);
        assert_eq!(
            "not covered".parse::<CoverageStatus>().unwrap(),
            CoverageStatus::NotCovered
        );
        assert_eq!(
            " Medicaid ".parse::<InsuranceType>().unwrap(),
            InsuranceType::Medicaid
        );
    }

    #[test]
    fn unknown_label_reports_kind() {
        let err = "HCPCS".parse::<CodeType>().expect_err("HCPCS is not a code type");
        match err {
            CoreError::UnknownLabel { kind, value } => {
                assert_eq!(kind, "code type");
                assert_eq!(value, "HCPCS");
            }
            other => panic!("expected UnknownLabel, got {other:?}"),
        }
    }

    #[test]
    fn deserializes_record_with_wire_labels() {
        let json = r#"{
            "id": "10",
            "code": "M79.3",
            "description": "Panniculitis, unspecified",
            "type": "ICD-10",
            "coverage": { "status": "Not Covered", "insurance": "Neither" },
            "documentation": ["Clinical examination findings"],
            "billing": []
        }"#;

        let code: MedicalCode = serde_json::from_str(json).expect("parse record");
        assert_eq!(code.code_type, CodeType::Icd10);
        assert_eq!(code.coverage.status, CoverageStatus::NotCovered);
        assert_eq!(code.coverage.insurance, InsuranceType::Neither);
        assert!(code.coverage.conditions.is_none());
        assert!(code.billing.is_empty());
    }

    #[test]
    fn conditions_only_apply_to_conditional_coverage() {
        let mut coverage = Coverage {
            status: CoverageStatus::Conditional,
            insurance: InsuranceType::Medicare,
            conditions: Some("Requires prior authorization".into()),
        };
        assert_eq!(
            coverage.applicable_conditions(),
            Some("Requires prior authorization")
        );

        coverage.status = CoverageStatus::Covered;
        assert_eq!(coverage.applicable_conditions(), None);
    }

    #[test]
    fn insurance_programme_membership() {
        assert!(InsuranceType::Both.includes_medicare());
        assert!(InsuranceType::Both.includes_medicaid());
        assert!(InsuranceType::Medicare.includes_medicare());
        assert!(!InsuranceType::Medicare.includes_medicaid());
        assert!(!InsuranceType::Neither.includes_medicare());
    }
}
