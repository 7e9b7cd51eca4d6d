//! Grouping the catalog by specialty category.

use crate::catalog::CodeCatalog;
use crate::categorize::{categorize, Category};
use crate::code::MedicalCode;
use api_shared::wire::{BrowseRes, CategoryGroupRes};

/// One category and its codes, in catalog order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryGroup<'a> {
    pub category: Category,
    pub codes: Vec<&'a MedicalCode>,
}

impl CategoryGroup<'_> {
    pub fn to_wire(&self) -> CategoryGroupRes {
        CategoryGroupRes {
            category: self.category.label().to_owned(),
            count: self.codes.len() as u32,
            codes: self.codes.iter().map(|c| c.to_wire()).collect(),
        }
    }
}

/// The catalog grouped by category. Every category is present, in display order, even when
/// it has no codes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryIndex<'a> {
    groups: Vec<CategoryGroup<'a>>,
}

impl<'a> CategoryIndex<'a> {
    pub fn groups(&self) -> &[CategoryGroup<'a>] {
        &self.groups
    }

    /// Codes filed under `category`.
    pub fn get(&self, category: Category) -> &[&'a MedicalCode] {
        self.groups
            .iter()
            .find(|g| g.category == category)
            .map(|g| g.codes.as_slice())
            .unwrap_or_default()
    }

    /// Groups with at least one code.
    pub fn non_empty(&self) -> impl Iterator<Item = &CategoryGroup<'a>> {
        self.groups.iter().filter(|g| !g.codes.is_empty())
    }

    /// Populated groups, largest first. Groups of equal size stay in display order.
    pub fn by_size(&self) -> Vec<&CategoryGroup<'a>> {
        let mut groups: Vec<_> = self.non_empty().collect();
        groups.sort_by(|a, b| b.codes.len().cmp(&a.codes.len()));
        groups
    }

    /// API view listing only the populated categories, largest first.
    pub fn to_wire(&self) -> BrowseRes {
        BrowseRes {
            categories: self.by_size().into_iter().map(CategoryGroup::to_wire).collect(),
        }
    }
}

/// Categorises every record in the catalog.
pub fn browse(catalog: &CodeCatalog) -> CategoryIndex<'_> {
    let mut groups: Vec<CategoryGroup<'_>> = Category::ALL
        .into_iter()
        .map(|category| CategoryGroup {
            category,
            codes: Vec::new(),
        })
        .collect();

    for code in catalog {
        let category = categorize(code);
        // Category::ALL is in declaration order, so the discriminant is the slot.
        groups[category as usize].codes.push(code);
    }

    CategoryIndex { groups }
}
