//! Filter sets and their SPARQL pattern fragments

use crate::sparql::escape::{has_unescapable_control, string_literal};
use serde::Serialize;
use thiserror::Error;

/// Variables a keyword is matched against. Every template that accepts a
/// keyword binds all three (the label variables optionally).
pub const KEYWORD_VARIABLES: [&str; 3] = ["name", "flavorLabel", "ingLabel"];

/// Ingredients a vegan beverage must not contain, as ontology local names
pub const NON_VEGAN_INGREDIENTS: [&str; 3] = ["FreshMilk", "Cream", "CondensedMilk"];

/// Filter errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FilterError {
    /// Value carries a control character that has no SPARQL escape
    #[error("Filter {field} contains a control character")]
    ControlCharacter { field: &'static str },
}

pub type FilterResult<T> = Result<T, FilterError>;

/// The filters of one catalog request.
///
/// Built once through [`FilterSetBuilder`], which normalizes and validates
/// every value; immutable afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSet {
    keyword: Option<String>,
    origin: Option<String>,
    process: Option<String>,
    vegan: bool,
}

impl FilterSet {
    /// No filtering at all
    pub fn none() -> Self {
        Self::default()
    }

    pub fn builder() -> FilterSetBuilder {
        FilterSetBuilder::default()
    }

    /// Lowercased keyword, if any
    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    pub fn process(&self) -> Option<&str> {
        self.process.as_deref()
    }

    pub fn vegan(&self) -> bool {
        self.vegan
    }

    /// Whether no filter is active
    pub fn is_empty(&self) -> bool {
        self.keyword.is_none() && self.origin.is_none() && self.process.is_none() && !self.vegan
    }
}

/// Builder for [`FilterSet`]
#[derive(Debug, Clone, Default)]
pub struct FilterSetBuilder {
    keyword: Option<String>,
    origin: Option<String>,
    process: Option<String>,
    vegan: bool,
}

impl FilterSetBuilder {
    /// Free-text keyword; matched case-insensitively
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// Exact origin label
    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Exact processing-method label
    pub fn process(mut self, process: impl Into<String>) -> Self {
        self.process = Some(process.into());
        self
    }

    /// Exclude beverages containing dairy
    pub fn vegan(mut self, vegan: bool) -> Self {
        self.vegan = vegan;
        self
    }

    pub fn build(self) -> FilterResult<FilterSet> {
        let keyword = normalize("keyword", self.keyword)?.map(|k| k.trim().to_lowercase());
        Ok(FilterSet {
            keyword,
            origin: normalize("origin", self.origin)?,
            process: normalize("process", self.process)?,
            vegan: self.vegan,
        })
    }
}

/// Blank values count as absent; values that cannot be escaped are refused.
fn normalize(field: &'static str, value: Option<String>) -> FilterResult<Option<String>> {
    match value {
        Some(v) if v.trim().is_empty() => Ok(None),
        Some(v) if has_unescapable_control(&v) => Err(FilterError::ControlCharacter { field }),
        other => Ok(other),
    }
}

/// Which filters a template can honour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterScope {
    pub keyword: bool,
    pub origin: bool,
    pub process: bool,
    pub vegan: bool,
}

impl FilterScope {
    /// Accepts nothing
    pub const NONE: Self = Self {
        keyword: false,
        origin: false,
        process: false,
        vegan: false,
    };

    /// Coffee lots: keyword plus origin and process selections
    pub const LOTS: Self = Self {
        keyword: true,
        origin: true,
        process: true,
        vegan: false,
    };

    /// Beverages: keyword plus the vegan exclusion
    pub const BEVERAGES: Self = Self {
        keyword: true,
        origin: false,
        process: false,
        vegan: true,
    };
}

/// Compose the WHERE-clause fragment for `filters`.
///
/// `subject` is the template's subject variable without `?`. Filters outside
/// `scope` are not emitted. The fragment is empty when nothing applies.
///
/// The keyword test is a plain `FILTER` in the template's outer group, so it
/// runs before aggregation: an item matched only through one flavor or
/// ingredient keeps just the matching labels in its aggregated lists.
pub fn compose(filters: &FilterSet, subject: &str, scope: FilterScope) -> String {
    let mut lines = Vec::new();

    if let Some(keyword) = filters.keyword().filter(|_| scope.keyword) {
        let needle = string_literal(keyword);
        let tests: Vec<String> = KEYWORD_VARIABLES
            .iter()
            .map(|var| format!("CONTAINS(LCASE(STR(?{var})), {needle})"))
            .collect();
        lines.push(format!("FILTER ({})", tests.join(" || ")));
    }

    if let Some(origin) = filters.origin().filter(|_| scope.origin) {
        lines.push(format!(
            "?{subject} :hasDerivedOrigin ?originFilter . ?originFilter rdfs:label {} .",
            string_literal(origin)
        ));
    }

    if let Some(process) = filters.process().filter(|_| scope.process) {
        lines.push(format!(
            "?{subject} :processedWith ?processFilter . ?processFilter rdfs:label {} .",
            string_literal(process)
        ));
    }

    if filters.vegan() && scope.vegan {
        for ingredient in NON_VEGAN_INGREDIENTS {
            lines.push(format!("FILTER NOT EXISTS {{ ?{subject} :hasIngredient :{ingredient} }}"));
        }
    }

    lines.join("\n")
}
