//! Catalog query construction
//!
//! A request's [`FilterSet`] is composed into a WHERE-clause fragment and
//! spliced into the [`Template`] of the requested view. Every value coming
//! from the request is escaped on the way in; see [`crate::sparql::escape`].

pub mod filter;
pub mod template;

pub use filter::{
    compose, FilterError, FilterResult, FilterScope, FilterSet, FilterSetBuilder,
    KEYWORD_VARIABLES, NON_VEGAN_INGREDIENTS,
};
pub use template::{
    distinct_labels, inventory_stats, recommendations, Aggregate, Pattern, SortOrder, Template,
    BARISTA, DETAIL, GROWER, LIST_SEPARATOR, ROASTER,
};
