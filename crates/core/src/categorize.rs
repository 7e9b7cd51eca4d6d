//! Specialty categorisation of codes.
//!
//! Categories are assigned by prefix rules evaluated first-match-wins. The rule order is part of
//! the observable behaviour and two of the CPT rules can never fire:
//!
//! - `993…` is claimed by E&M before the Preventive rule that also lists it.
//! - The Emergency rule requires a `992` prefix, which E&M has already taken.
//!
//! Both rules stay in the chain exactly as listed.

use crate::code::{CodeType, MedicalCode};
use serde::{Serialize, Serializer};
use std::fmt;

/// Specialty bucket a code is grouped under when browsing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    EvaluationAndManagement,
    Surgery,
    Radiology,
    Laboratory,
    Anesthesia,
    PhysicalTherapy,
    MentalHealth,
    Preventive,
    Emergency,
    Cardiovascular,
    Respiratory,
    Musculoskeletal,
    Digestive,
    Genitourinary,
    Endocrine,
    Neurological,
    Dermatology,
    InfectiousDisease,
    Oncology,
    Other,
}

impl Category {
    /// Every category in display order.
    pub const ALL: [Category; 20] = [
        Category::EvaluationAndManagement,
        Category::Surgery,
        Category::Radiology,
        Category::Laboratory,
        Category::Anesthesia,
        Category::PhysicalTherapy,
        Category::MentalHealth,
        Category::Preventive,
        Category::Emergency,
        Category::Cardiovascular,
        Category::Respiratory,
        Category::Musculoskeletal,
        Category::Digestive,
        Category::Genitourinary,
        Category::Endocrine,
        Category::Neurological,
        Category::Dermatology,
        Category::InfectiousDisease,
        Category::Oncology,
        Category::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::EvaluationAndManagement => "E&M",
            Category::Surgery => "Surgery",
            Category::Radiology => "Radiology",
            Category::Laboratory => "Laboratory",
            Category::Anesthesia => "Anesthesia",
            Category::PhysicalTherapy => "Physical Therapy",
            Category::MentalHealth => "Mental Health",
            Category::Preventive => "Preventive",
            Category::Emergency => "Emergency",
            Category::Cardiovascular => "Cardiovascular",
            Category::Respiratory => "Respiratory",
            Category::Musculoskeletal => "Musculoskeletal",
            Category::Digestive => "Digestive",
            Category::Genitourinary => "Genitourinary",
            Category::Endocrine => "Endocrine",
            Category::Neurological => "Neurological",
            Category::Dermatology => "Dermatology",
            Category::InfectiousDisease => "Infectious Disease",
            Category::Oncology => "Oncology",
            Category::Other => "Other",
        }
    }

    /// Looks a category up by its label, ignoring ASCII case.
    pub fn from_label(label: &str) -> Option<Category> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Assigns a code to its specialty category.
pub fn categorize(code: &MedicalCode) -> Category {
    categorize_code(code.code_type, &code.code)
}

/// Categorises a bare code string of the given type.
pub fn categorize_code(code_type: CodeType, code: &str) -> Category {
    match code_type {
        CodeType::Cpt => categorize_cpt(code),
        CodeType::Icd10 => categorize_icd10(code),
    }
}

fn categorize_cpt(code: &str) -> Category {
    let starts = |prefix: &str| code.starts_with(prefix);

    if starts("992") || starts("993") {
        Category::EvaluationAndManagement
    } else if starts("994") || starts("993") {
        Category::Preventive
    } else if starts("1") || starts("2") || starts("3") || starts("4") || starts("5") || starts("6")
    {
        Category::Surgery
    } else if starts("7") {
        Category::Radiology
    } else if starts("8") {
        Category::Laboratory
    } else if starts("00") {
        Category::Anesthesia
    } else if starts("97") {
        Category::PhysicalTherapy
    } else if starts("908") || starts("907") {
        Category::MentalHealth
    } else if starts("992") && (code.contains("81") || code.contains("85")) {
        Category::Emergency
    } else {
        Category::Other
    }
}

fn categorize_icd10(code: &str) -> Category {
    match code.chars().next() {
        Some('I') => Category::Cardiovascular,
        Some('J') => Category::Respiratory,
        Some('M') => Category::Musculoskeletal,
        Some('F') => Category::MentalHealth,
        Some('K') => Category::Digestive,
        Some('N') => Category::Genitourinary,
        Some('E') => Category::Endocrine,
        Some('G') => Category::Neurological,
        Some('L') => Category::Dermatology,
        Some('A') | Some('B') => Category::InfectiousDisease,
        Some('C') | Some('D') => Category::Oncology,
        _ => Category::Other,
    }
}
