//! Binding row → view record projection
//!
//! [`project`] is a pure function: it resolves optional fields to
//! placeholders, splits aggregated label lists, formats prices and derives
//! the computed display fields of each view. Rows missing a variable the
//! view's template requires are rejected; that only happens when a query is
//! malformed, never because data is absent.

pub mod format;
mod records;

pub use format::{StockLevel, PLACEHOLDER};
pub use records::{
    BaristaRecord, BrewSpecs, DetailRecord, DetailSpecs, GrowerRecord, Recommendation,
    RoasterRecord, RoasterSpecs,
};

use crate::query::Template;
use crate::sparql::BindingRow;
use format::{fragment_id, organic_label, parse_quantity, price_or, quantity, split_list};
use serde::Serialize;
use thiserror::Error;

/// Projection errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProjectionError {
    /// Row lacks a variable the template always binds
    #[error("{view:?} row is missing required binding ?{var}")]
    MissingRequired { view: ViewKind, var: String },
}

pub type ProjectionResult<T> = Result<T, ProjectionError>;

/// The record shapes a row can be projected into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    Grower,
    Roaster,
    Barista,
    Detail,
}

impl ViewKind {
    /// Price text used when a row has no usable price
    pub fn price_fallback(self) -> &'static str {
        match self {
            ViewKind::Grower => "Rp -",
            ViewKind::Roaster => "Call",
            ViewKind::Barista => "Ask Barista",
            ViewKind::Detail => PLACEHOLDER,
        }
    }
}

/// A projected record of any view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ViewRecord {
    Grower(GrowerRecord),
    Roaster(RoasterRecord),
    Barista(BaristaRecord),
    Detail(Box<DetailRecord>),
}

impl ViewRecord {
    pub fn kind(&self) -> ViewKind {
        match self {
            ViewRecord::Grower(_) => ViewKind::Grower,
            ViewRecord::Roaster(_) => ViewKind::Roaster,
            ViewRecord::Barista(_) => ViewKind::Barista,
            ViewRecord::Detail(_) => ViewKind::Detail,
        }
    }

    /// Short display id
    pub fn id(&self) -> &str {
        match self {
            ViewRecord::Grower(r) => &r.id,
            ViewRecord::Roaster(r) => &r.id,
            ViewRecord::Barista(r) => &r.id,
            ViewRecord::Detail(r) => &r.id,
        }
    }

    /// Display name
    pub fn title(&self) -> &str {
        match self {
            ViewRecord::Grower(r) => &r.title,
            ViewRecord::Roaster(r) => &r.title,
            ViewRecord::Barista(r) => &r.title,
            ViewRecord::Detail(r) => &r.name,
        }
    }

    /// Formatted price or the view's fallback text
    pub fn price(&self) -> &str {
        match self {
            ViewRecord::Grower(r) => &r.price,
            ViewRecord::Roaster(r) => &r.price,
            ViewRecord::Barista(r) => &r.price,
            ViewRecord::Detail(r) => &r.price,
        }
    }
}

/// Project one row of `view`'s query
pub fn project(row: &BindingRow, view: ViewKind) -> ProjectionResult<ViewRecord> {
    let fields = Fields::checked(row, view)?;
    let record = match view {
        ViewKind::Grower => ViewRecord::Grower(grower(&fields)),
        ViewKind::Roaster => ViewRecord::Roaster(roaster(&fields)),
        ViewKind::Barista => ViewRecord::Barista(barista(&fields)),
        ViewKind::Detail => ViewRecord::Detail(Box::new(detail(&fields))),
    };
    Ok(record)
}

/// Project one row of the recommendation query
pub fn project_recommendation(row: &BindingRow) -> ProjectionResult<Recommendation> {
    let missing = |var: &str| ProjectionError::MissingRequired {
        view: ViewKind::Detail,
        var: var.to_string(),
    };
    let iri = row.get("rec").ok_or_else(|| missing("rec"))?;
    let name = row.get("recName").ok_or_else(|| missing("recName"))?;

    Ok(Recommendation {
        id: fragment_id(iri).to_string(),
        name: name.to_string(),
        price: price_or(row.get("recPrice"), PLACEHOLDER),
    })
}

/// Row accessor for one view; required bindings are checked up front
struct Fields<'a> {
    row: &'a BindingRow,
    view: ViewKind,
    subject: &'a str,
}

impl<'a> Fields<'a> {
    fn checked(row: &'a BindingRow, view: ViewKind) -> ProjectionResult<Self> {
        let template = Template::for_view(view);
        if let Some(var) = template.required_vars().find(|var| !row.contains(var)) {
            return Err(ProjectionError::MissingRequired {
                view,
                var: var.to_string(),
            });
        }
        Ok(Self {
            row,
            view,
            subject: row.get(template.subject).unwrap_or_default(),
        })
    }

    fn raw(&self, var: &str) -> Option<&'a str> {
        self.row.get(var)
    }

    /// Scalar text or the placeholder
    fn text(&self, var: &str) -> String {
        self.raw(var).unwrap_or(PLACEHOLDER).to_string()
    }

    fn list(&self, alias: &str) -> Vec<String> {
        split_list(self.raw(alias))
    }

    fn id(&self) -> String {
        fragment_id(self.subject).to_string()
    }

    fn price(&self) -> String {
        price_or(self.raw("price"), self.view.price_fallback())
    }
}

fn grower(f: &Fields<'_>) -> GrowerRecord {
    GrowerRecord {
        id: f.id(),
        title: f.text("name"),
        price: f.price(),
        score: f.text("score"),
        harvest: f.text("harvest"),
        organic: organic_label(f.raw("organic")).to_string(),
        flavors: f.list("flavors"),
    }
}

fn roaster(f: &Fields<'_>) -> RoasterRecord {
    let stock = parse_quantity(f.raw("stock"));
    RoasterRecord {
        id: f.id(),
        title: f.text("name"),
        price: f.price(),
        origin: f.text("origin"),
        process: f.text("process"),
        roast_profile: f.text("profile"),
        score: f.text("score"),
        stock_kg: quantity(stock),
        stock_level: StockLevel::classify(stock),
        flavors: f.list("flavors"),
        specs: RoasterSpecs {
            moisture: f.text("moisture"),
            density: f.text("density"),
            water_activity: f.text("aw"),
            defect_count: f.text("defect"),
            crop_year: f.text("crop"),
            screen_size: f.text("screen"),
            grade: f.text("grade"),
            packaging: f.text("packaging"),
            agtron: f.text("agtron"),
            first_crack: f.text("firstCrack"),
            dtr: f.text("dtr"),
            shrinkage: f.text("shrink"),
            resting_days: f.text("rest"),
            fermentation_hours: f.text("ferm"),
            acidity: f.text("acid"),
            body: f.text("body"),
            certifications: f.list("certs"),
        },
    }
}

fn barista(f: &Fields<'_>) -> BaristaRecord {
    BaristaRecord {
        id: f.id(),
        title: f.text("name"),
        price: f.price(),
        description: f.text("desc"),
        shop: f.text("shopName"),
        base_coffee: f.text("baseName"),
        specs: BrewSpecs {
            temperature: f.text("temp"),
            time: f.text("time"),
            ratio: f.text("ratio"),
        },
        ingredients: f.list("ingredients"),
        flavors: f.list("flavors"),
    }
}

fn detail(f: &Fields<'_>) -> DetailRecord {
    DetailRecord {
        id: f.id(),
        name: f.text("name"),
        description: f.text("desc"),
        price: f.price(),
        score: f.text("score"),
        shop: f.text("shopName"),
        farm: f.text("farmName"),
        altitude: f.text("altitude"),
        origin: f.text("originName"),
        process: f.text("processName"),
        harvest: f.text("harvest"),
        moisture: f.text("moisture"),
        density: f.text("density"),
        roast_profile: f.text("roastProfile"),
        base_coffee: f.text("baseName"),
        specs: DetailSpecs {
            temperature: f.text("temp"),
            time: f.text("time"),
            ratio: f.text("ratio"),
            agtron: f.text("agtron"),
            dtr: f.text("dtr"),
            water_activity: f.text("aw"),
            shrinkage: f.text("shrink"),
            resting_days: f.text("rest"),
        },
        ingredients: f.list("ingredients"),
        flavors: f.list("flavors"),
        iri: f.subject.to_string(),
        origin_iri: f.raw("originUri").map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = "http://kopiverse.org/ontology#";

    fn row(pairs: &[(&str, &str)]) -> BindingRow {
        BindingRow::from_pairs(pairs.iter().copied())
    }

    #[test]
    fn test_grower_full_row() {
        let r = row(&[
            ("lot", "http://kopiverse.org/ontology#GayoWine"),
            ("name", "Gayo Wine"),
            ("price", "12000.0"),
            ("harvest", "2024-05-01"),
            ("organic", "true"),
            ("score", "86.5"),
            ("flavors", "Floral|Citrus|Floral"),
        ]);

        let ViewRecord::Grower(rec) = project(&r, ViewKind::Grower).unwrap() else {
            panic!("expected grower record");
        };
        assert_eq!(rec.id, "GayoWine");
        assert_eq!(rec.title, "Gayo Wine");
        assert_eq!(rec.price, "Rp 12,000");
        assert_eq!(rec.score, "86.5");
        assert_eq!(rec.harvest, "2024-05-01");
        assert_eq!(rec.organic, "Organik");
        assert_eq!(rec.flavors, vec!["Floral", "Citrus"]);
    }

    #[test]
    fn test_grower_sparse_row_uses_placeholders() {
        let r = row(&[
            ("lot", "http://kopiverse.org/ontology#Kintamani"),
            ("name", "Kintamani"),
            ("price", "on request"),
        ]);

        let ViewRecord::Grower(rec) = project(&r, ViewKind::Grower).unwrap() else {
            panic!("expected grower record");
        };
        assert_eq!(rec.price, "Rp -");
        assert_eq!(rec.score, PLACEHOLDER);
        assert_eq!(rec.harvest, PLACEHOLDER);
        assert_eq!(rec.organic, "Konvensional");
        assert!(rec.flavors.is_empty());
    }

    #[test]
    fn test_missing_required_binding() {
        // Grower rows always carry a price
        let r = row(&[("lot", "http://kopiverse.org/ontology#X"), ("name", "X")]);
        assert_eq!(
            project(&r, ViewKind::Grower).unwrap_err(),
            ProjectionError::MissingRequired {
                view: ViewKind::Grower,
                var: "price".to_string()
            }
        );

        let r = row(&[("bev", "http://kopiverse.org/ontology#Latte")]);
        assert!(project(&r, ViewKind::Barista).is_err());
    }

    #[test]
    fn test_roaster_stock_tiers() {
        let cases = [
            (None, "0", StockLevel::OutOfStock),
            (Some("0"), "0", StockLevel::OutOfStock),
            (Some("99"), "99", StockLevel::Low),
            (Some("100"), "100", StockLevel::Available),
            (Some("100000"), "100000", StockLevel::Available),
            (Some("a lot"), "0", StockLevel::OutOfStock),
        ];

        for (stock, shown, tier) in cases {
            let mut r = row(&[
                ("lot", "http://kopiverse.org/ontology#Toraja"),
                ("name", "Toraja Sapan"),
                ("origin", "Toraja"),
            ]);
            if let Some(stock) = stock {
                r.bind("stock", stock);
            }
            let ViewRecord::Roaster(rec) = project(&r, ViewKind::Roaster).unwrap() else {
                panic!("expected roaster record");
            };
            assert_eq!(rec.stock_kg, shown, "{stock:?}");
            assert_eq!(rec.stock_level, tier, "{stock:?}");
        }
    }

    #[test]
    fn test_roaster_specs_and_fallbacks() {
        let r = row(&[
            ("lot", "http://kopiverse.org/ontology#Toraja"),
            ("name", "Toraja Sapan"),
            ("origin", "Toraja"),
            ("process", "Full Wash"),
            ("shrink", "14.5"),
            ("rest", "7"),
            ("certs", "Fair Trade|Rainforest Alliance"),
        ]);

        let ViewRecord::Roaster(rec) = project(&r, ViewKind::Roaster).unwrap() else {
            panic!("expected roaster record");
        };
        assert_eq!(rec.price, "Call");
        assert_eq!(rec.process, "Full Wash");
        assert_eq!(rec.roast_profile, PLACEHOLDER);
        assert_eq!(rec.specs.shrinkage, "14.5");
        assert_eq!(rec.specs.resting_days, "7");
        assert_eq!(rec.specs.moisture, PLACEHOLDER);
        assert_eq!(rec.specs.certifications, vec!["Fair Trade", "Rainforest Alliance"]);
    }

    #[test]
    fn test_barista_row() {
        let r = row(&[
            ("bev", "http://kopiverse.org/ontology#KopiSusuAren"),
            ("name", "Kopi Susu Aren"),
            ("baseName", "GayoWine"),
            ("ingredients", "Fresh Milk|Palm Sugar"),
        ]);

        let ViewRecord::Barista(rec) = project(&r, ViewKind::Barista).unwrap() else {
            panic!("expected barista record");
        };
        assert_eq!(rec.id, "KopiSusuAren");
        assert_eq!(rec.price, "Ask Barista");
        assert_eq!(rec.base_coffee, "GayoWine");
        assert_eq!(rec.description, PLACEHOLDER);
        assert_eq!(rec.specs.temperature, PLACEHOLDER);
        assert_eq!(rec.ingredients, vec!["Fresh Milk", "Palm Sugar"]);
        assert!(rec.flavors.is_empty());
    }

    #[test]
    fn test_detail_row_keeps_iris() {
        let r = row(&[
            ("s", "http://kopiverse.org/ontology#GayoWine"),
            ("name", "Gayo Wine"),
            ("originName", "Aceh Gayo"),
            ("originUri", "http://kopiverse.org/ontology#AcehGayo"),
            ("price", "185000"),
        ]);

        let record = project(&r, ViewKind::Detail).unwrap();
        assert_eq!(record.kind(), ViewKind::Detail);
        assert_eq!(record.price(), "Rp 185,000");
        let ViewRecord::Detail(rec) = record else {
            panic!("expected detail record");
        };
        assert_eq!(rec.iri, format!("{NS}GayoWine"));
        assert_eq!(rec.origin_iri.as_deref(), Some("http://kopiverse.org/ontology#AcehGayo"));
        assert_eq!(rec.farm, PLACEHOLDER);

        let json = serde_json::to_value(&*rec).unwrap();
        assert!(json.get("iri").is_none());
        assert_eq!(json["specs"]["agtron"], PLACEHOLDER);
        assert_eq!(json["ingredients"], serde_json::json!([]));
    }

    #[test]
    fn test_recommendation_row() {
        let r = row(&[
            ("rec", "http://kopiverse.org/ontology#GayoNatural"),
            ("recName", "Gayo Natural"),
        ]);
        let rec = project_recommendation(&r).unwrap();
        assert_eq!(rec.id, "GayoNatural");
        assert_eq!(rec.price, "-");

        assert!(project_recommendation(&row(&[("recName", "Orphan")])).is_err());
    }

    #[test]
    fn test_record_accessors() {
        let r = row(&[
            ("lot", "http://kopiverse.org/ontology#GayoWine"),
            ("name", "Gayo Wine"),
            ("price", "1000"),
        ]);
        let record = project(&r, ViewKind::Grower).unwrap();
        assert_eq!(record.id(), "GayoWine");
        assert_eq!(record.title(), "Gayo Wine");
        assert_eq!(record.price(), "Rp 1,000");
    }
}
