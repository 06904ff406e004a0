//! View records handed to the presentation layer
//!
//! Every field is always present. Absent scalars carry [`PLACEHOLDER`]
//! (or the view's price fallback), absent lists are empty.
//!
//! [`PLACEHOLDER`]: super::format::PLACEHOLDER

use super::format::StockLevel;
use serde::Serialize;

/// Lot as the grower showcase lists it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowerRecord {
    pub id: String,
    pub title: String,
    pub price: String,
    pub score: String,
    pub harvest: String,
    /// `Organik` or `Konvensional`
    pub organic: String,
    pub flavors: Vec<String>,
}

/// Lot as the roaster sourcing sheet lists it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoasterRecord {
    pub id: String,
    pub title: String,
    pub price: String,
    pub origin: String,
    pub process: String,
    pub roast_profile: String,
    pub score: String,
    pub stock_kg: String,
    pub stock_level: StockLevel,
    pub flavors: Vec<String>,
    pub specs: RoasterSpecs,
}

/// Green-bean and roast parameters of a lot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoasterSpecs {
    pub moisture: String,
    pub density: String,
    pub water_activity: String,
    pub defect_count: String,
    pub crop_year: String,
    pub screen_size: String,
    pub grade: String,
    pub packaging: String,
    pub agtron: String,
    pub first_crack: String,
    pub dtr: String,
    pub shrinkage: String,
    pub resting_days: String,
    pub fermentation_hours: String,
    pub acidity: String,
    pub body: String,
    pub certifications: Vec<String>,
}

/// Beverage as the barista guide lists it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaristaRecord {
    pub id: String,
    pub title: String,
    pub price: String,
    pub description: String,
    pub shop: String,
    pub base_coffee: String,
    pub specs: BrewSpecs,
    pub ingredients: Vec<String>,
    pub flavors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrewSpecs {
    pub temperature: String,
    pub time: String,
    pub ratio: String,
}

/// One item, lot or beverage, with everything known about it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub score: String,
    pub shop: String,
    pub farm: String,
    pub altitude: String,
    pub origin: String,
    pub process: String,
    pub harvest: String,
    pub moisture: String,
    pub density: String,
    pub roast_profile: String,
    pub base_coffee: String,
    pub specs: DetailSpecs,
    pub ingredients: Vec<String>,
    pub flavors: Vec<String>,
    /// Full IRI of the item
    #[serde(skip)]
    pub iri: String,
    /// Full IRI of the item's origin, when it has one
    #[serde(skip)]
    pub origin_iri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailSpecs {
    pub temperature: String,
    pub time: String,
    pub ratio: String,
    pub agtron: String,
    pub dtr: String,
    pub water_activity: String,
    pub shrinkage: String,
    pub resting_days: String,
}

/// A "similar item" suggestion on a detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub id: String,
    pub name: String,
    pub price: String,
}
