//! The code catalog.
//!
//! The catalog is the authoritative, read-only list of [`MedicalCode`] records. It is loaded
//! once at startup (either the built-in reference set or a JSON file named in configuration)
//! and then shared immutably. There are no write operations.

use crate::code::MedicalCode;
use crate::constants::BUILTIN_CATALOG_JSON;
use crate::{CoreError, CoreResult};
use std::collections::HashMap;
use std::path::Path;

#[derive(Clone, Debug, Default)]
pub struct CodeCatalog {
    codes: Vec<MedicalCode>,
    by_id: HashMap<String, usize>,
}

impl CodeCatalog {
    /// Builds a catalog from records, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidInput` for a record with a blank id or code, and
    /// `CoreError::DuplicateCodeId` when two records share an id.
    pub fn from_codes(codes: Vec<MedicalCode>) -> CoreResult<Self> {
        let mut by_id = HashMap::with_capacity(codes.len());

        for (index, code) in codes.iter().enumerate() {
            if code.id.trim().is_empty() {
                return Err(CoreError::InvalidInput(format!(
                    "catalog entry {index} has an empty id"
                )));
            }
            if code.code.trim().is_empty() {
                return Err(CoreError::InvalidInput(format!(
                    "catalog entry {} has an empty code",
                    code.id
                )));
            }
            if by_id.insert(code.id.clone(), index).is_some() {
                return Err(CoreError::DuplicateCodeId(code.id.clone()));
            }
        }

        Ok(Self { codes, by_id })
    }

    /// Parses a JSON array of records.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let codes: Vec<MedicalCode> = serde_json::from_str(json).map_err(CoreError::CatalogParse)?;
        Self::from_codes(codes)
    }

    /// Loads a catalog from a JSON file on disk.
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        let json = std::fs::read_to_string(path).map_err(CoreError::CatalogRead)?;
        let catalog = Self::from_json(&json)?;
        tracing::info!(
            "loaded {} codes from catalog file {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// The built-in reference catalog shipped with the crate.
    pub fn builtin() -> CoreResult<Self> {
        Self::from_json(BUILTIN_CATALOG_JSON)
    }

    /// All records in catalog order.
    pub fn all(&self) -> &[MedicalCode] {
        &self.codes
    }

    /// Looks up a record by its id. Unknown ids yield `None`.
    pub fn get(&self, id: &str) -> Option<&MedicalCode> {
        self.by_id.get(id).map(|&index| &self.codes[index])
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MedicalCode> {
        self.codes.iter()
    }
}

impl<'a> IntoIterator for &'a CodeCatalog {
    type Item = &'a MedicalCode;
    type IntoIter = std::slice::Iter<'a, MedicalCode>;

    fn into_iter(self) -> Self::IntoIter {
        self.codes.iter()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::code::{CodeType, Coverage, CoverageStatus, InsuranceType, MedicalCode};

    pub(crate) fn code(id: &str, code: &str, code_type: CodeType, description: &str) -> MedicalCode {
        MedicalCode {
            id: id.into(),
            code: code.into(),
            description: description.into(),
            code_type,
            coverage: Coverage {
                status: CoverageStatus::Covered,
                insurance: InsuranceType::Both,
                conditions: None,
            },
            documentation: vec![],
            billing: vec![],
        }
    }

    /// The two-code catalog used by the search endpoint mock.
    pub(crate) fn two_code_catalog() -> super::CodeCatalog {
        super::CodeCatalog::from_codes(vec![
            code(
                "1",
                "99213",
                CodeType::Cpt,
                "Office visit for established patient",
            ),
            code(
                "2",
                "E11.9",
                CodeType::Icd10,
                "Type 2 diabetes mellitus without complications",
            ),
        ])
        .expect("two-code catalog is valid")
    }
}
