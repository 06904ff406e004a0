//! Per-view SPARQL query templates

use super::filter::{compose, FilterScope, FilterSet};
use crate::projection::ViewKind;
use crate::rdf::NamespaceManager;
use crate::sparql::escape::string_literal;
use oxrdf::NamedNode;
use std::fmt::Write;

/// Separator `GROUP_CONCAT` joins multi-valued labels with
pub const LIST_SEPARATOR: &str = "|";

/// A graph pattern and the variables it binds for projection
#[derive(Debug, Clone, Copy)]
pub struct Pattern {
    pub vars: &'static [&'static str],
    pub text: &'static str,
}

/// Labels of one multi-valued relation, concatenated into `alias`
#[derive(Debug, Clone, Copy)]
pub struct Aggregate {
    pub alias: &'static str,
    pub var: &'static str,
    pub pattern: &'static str,
}

/// Result ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Whatever order the store produces
    Natural,
    Ascending(&'static str),
    Descending(&'static str),
}

/// Query skeleton for one view
#[derive(Debug, Clone, Copy)]
pub struct Template {
    pub view: ViewKind,
    /// Subject variable, without `?`
    pub subject: &'static str,
    /// `rdf:type` constraint on the subject
    pub class: Option<&'static str>,
    pub required: &'static [Pattern],
    /// Each rendered as its own `OPTIONAL` block
    pub optional: &'static [Pattern],
    /// Optional patterns bound only so filters can see them
    pub context: &'static [&'static str],
    pub aggregates: &'static [Aggregate],
    pub order: SortOrder,
    pub scope: FilterScope,
}

const FLAVORS: Aggregate = Aggregate {
    alias: "flavors",
    var: "flavorLabel",
    pattern: "?{s} :hasFlavorNote ?flavor . ?flavor rdfs:label ?flavorLabel",
};

const INGREDIENTS: Aggregate = Aggregate {
    alias: "ingredients",
    var: "ingLabel",
    pattern: "?{s} :hasIngredient ?ing . OPTIONAL { ?ing rdfs:label ?ingLabelRaw } \
              BIND(COALESCE(?ingLabelRaw, STRAFTER(STR(?ing), \"#\")) AS ?ingLabel)",
};

const INGREDIENT_CONTEXT: &str = "?{s} :hasIngredient ?ing . OPTIONAL { ?ing rdfs:label ?ingLabelRaw } \
     BIND(COALESCE(?ingLabelRaw, STRAFTER(STR(?ing), \"#\")) AS ?ingLabel)";

const BASE_COFFEE: &str = "?{s} :brewedFrom ?base . OPTIONAL { ?base rdfs:label ?baseLabelRaw } \
     BIND(COALESCE(?baseLabelRaw, STRAFTER(STR(?base), \"#\")) AS ?baseName)";

/// Grower showcase: lots by price, most expensive first
pub const GROWER: Template = Template {
    view: ViewKind::Grower,
    subject: "lot",
    class: Some(":CoffeeLot"),
    required: &[
        Pattern { vars: &["name"], text: "?{s} rdfs:label ?name" },
        Pattern { vars: &["price"], text: "?{s} :hasPrice ?price" },
    ],
    optional: &[
        Pattern { vars: &["harvest"], text: "?{s} :hasHarvestDate ?harvest" },
        Pattern { vars: &["organic"], text: "?{s} :isOrganic ?organic" },
        Pattern { vars: &["score"], text: "?{s} :hasCuppingScore ?score" },
    ],
    context: &[INGREDIENT_CONTEXT],
    aggregates: &[FLAVORS],
    // Ties between equal prices come back in store order.
    order: SortOrder::Descending("price"),
    scope: FilterScope::LOTS,
};

/// Roaster sourcing sheet: lots with the full green-bean and roast spec
pub const ROASTER: Template = Template {
    view: ViewKind::Roaster,
    subject: "lot",
    class: Some(":CoffeeLot"),
    required: &[
        Pattern { vars: &["name"], text: "?{s} rdfs:label ?name" },
        Pattern { vars: &["origin"], text: "?{s} :hasDerivedOrigin ?o . ?o rdfs:label ?origin" },
    ],
    optional: &[
        Pattern { vars: &["price"], text: "?{s} :hasPrice ?price" },
        Pattern { vars: &["moisture"], text: "?{s} :hasMoistureContent ?moisture" },
        Pattern { vars: &["density"], text: "?{s} :hasBeanDensity ?density" },
        Pattern { vars: &["profile"], text: "?{s} :recommendedRoastProfile ?profile" },
        Pattern { vars: &["process"], text: "?{s} :processedWith ?p . ?p rdfs:label ?process" },
        Pattern { vars: &["score"], text: "?{s} :hasCuppingScore ?score" },
        Pattern { vars: &["screen"], text: "?{s} :hasScreenSize ?screen" },
        Pattern { vars: &["aw"], text: "?{s} :hasWaterActivity ?aw" },
        Pattern { vars: &["stock"], text: "?{s} :hasStockKg ?stock" },
        Pattern { vars: &["crop"], text: "?{s} :hasCropYear ?crop" },
        Pattern { vars: &["defect"], text: "?{s} :hasDefectCount ?defect" },
        Pattern { vars: &["grade"], text: "?{s} :hasBeanGrade ?grade" },
        Pattern { vars: &["packaging"], text: "?{s} :packagingType ?packaging" },
        Pattern { vars: &["agtron"], text: "?{s} :hasAgtronNumber ?agtron" },
        Pattern { vars: &["firstCrack"], text: "?{s} :hasFirstCrackTemp ?firstCrack" },
        Pattern { vars: &["dtr"], text: "?{s} :recommendedDTR ?dtr" },
        Pattern { vars: &["shrink"], text: "?{s} :hasShrinkage ?shrink" },
        Pattern { vars: &["rest"], text: "?{s} :restingDays ?rest" },
        Pattern { vars: &["ferm"], text: "?{s} :fermentationHours ?ferm" },
        Pattern { vars: &["acid"], text: "?{s} :acidityLevel ?acid" },
        Pattern { vars: &["body"], text: "?{s} :bodyLevel ?body" },
    ],
    context: &[INGREDIENT_CONTEXT],
    aggregates: &[
        FLAVORS,
        Aggregate {
            alias: "certs",
            var: "certLabel",
            pattern: "?{s} :hasCertification ?cert . ?cert rdfs:label ?certLabel",
        },
    ],
    order: SortOrder::Natural,
    scope: FilterScope::LOTS,
};

/// Barista brewing guide: beverages by name
pub const BARISTA: Template = Template {
    view: ViewKind::Barista,
    subject: "bev",
    class: Some(":CoffeeBeverage"),
    required: &[Pattern { vars: &["name"], text: "?{s} rdfs:label ?name" }],
    optional: &[
        Pattern { vars: &["price"], text: "?{s} :hasPrice ?price" },
        Pattern { vars: &["desc"], text: "?{s} rdfs:comment ?desc" },
        Pattern { vars: &["shopName"], text: "?{s} :servedBy ?shop . ?shop rdfs:label ?shopName" },
        Pattern { vars: &["baseName"], text: BASE_COFFEE },
        Pattern { vars: &["temp"], text: "?{s} :brewingTemp ?temp" },
        Pattern { vars: &["time"], text: "?{s} :brewingTime ?time" },
        Pattern { vars: &["ratio"], text: "?{s} :waterRatio ?ratio" },
    ],
    context: &[],
    aggregates: &[INGREDIENTS, FLAVORS],
    order: SortOrder::Ascending("name"),
    scope: FilterScope::BEVERAGES,
};

/// Single item, lot or beverage, selected by IRI
pub const DETAIL: Template = Template {
    view: ViewKind::Detail,
    subject: "s",
    class: None,
    required: &[Pattern { vars: &["name"], text: "?{s} rdfs:label ?name" }],
    optional: &[
        Pattern { vars: &["desc"], text: "?{s} rdfs:comment ?desc" },
        Pattern { vars: &["price"], text: "?{s} :hasPrice ?price" },
        Pattern { vars: &["score"], text: "?{s} :hasCuppingScore ?score" },
        Pattern { vars: &["shopName"], text: "?{s} :servedBy ?shop . ?shop rdfs:label ?shopName" },
        Pattern { vars: &["temp"], text: "?{s} :brewingTemp ?temp" },
        Pattern { vars: &["time"], text: "?{s} :brewingTime ?time" },
        Pattern { vars: &["ratio"], text: "?{s} :waterRatio ?ratio" },
        Pattern { vars: &["baseName"], text: BASE_COFFEE },
        Pattern {
            vars: &["farmName", "altitude"],
            text: "?{s} :producedBy ?farm . ?farm rdfs:label ?farmName . \
                   OPTIONAL { ?farm :hasAltitude ?altitude }",
        },
        Pattern {
            vars: &["processName", "processUri"],
            text: "?{s} :processedWith ?processUri . ?processUri rdfs:label ?processName",
        },
        Pattern {
            vars: &["originName", "originUri"],
            text: "?{s} :hasDerivedOrigin ?originUri . ?originUri rdfs:label ?originName",
        },
        Pattern { vars: &["harvest"], text: "?{s} :hasHarvestDate ?harvest" },
        Pattern { vars: &["moisture"], text: "?{s} :hasMoistureContent ?moisture" },
        Pattern { vars: &["density"], text: "?{s} :hasBeanDensity ?density" },
        Pattern { vars: &["roastProfile"], text: "?{s} :recommendedRoastProfile ?roastProfile" },
        Pattern { vars: &["agtron"], text: "?{s} :hasAgtronNumber ?agtron" },
        Pattern { vars: &["dtr"], text: "?{s} :recommendedDTR ?dtr" },
        Pattern { vars: &["aw"], text: "?{s} :hasWaterActivity ?aw" },
        Pattern { vars: &["shrink"], text: "?{s} :hasShrinkage ?shrink" },
        Pattern { vars: &["rest"], text: "?{s} :restingDays ?rest" },
    ],
    context: &[],
    aggregates: &[INGREDIENTS, FLAVORS],
    order: SortOrder::Natural,
    scope: FilterScope::NONE,
};

impl Template {
    /// The template serving `view`
    pub fn for_view(view: ViewKind) -> &'static Template {
        match view {
            ViewKind::Grower => &GROWER,
            ViewKind::Roaster => &ROASTER,
            ViewKind::Barista => &BARISTA,
            ViewKind::Detail => &DETAIL,
        }
    }

    /// Variables every accepted row must bind
    pub fn required_vars(&self) -> impl Iterator<Item = &'static str> {
        let required: &'static [Pattern] = self.required;
        std::iter::once(self.subject).chain(required.iter().flat_map(|p| p.vars.iter().copied()))
    }

    /// Scalar variables in SELECT (and GROUP BY) order
    pub fn scalar_vars(&self) -> Vec<&'static str> {
        let optional: &'static [Pattern] = self.optional;
        self.required_vars()
            .chain(optional.iter().flat_map(|p| p.vars.iter().copied()))
            .collect()
    }

    /// Render a listing query with `filters` spliced into the WHERE clause
    pub fn render(&self, ns: &NamespaceManager, filters: &FilterSet) -> String {
        self.render_with(ns, None, &compose(filters, self.subject, self.scope))
    }

    /// Render a query pinned to one subject
    pub fn render_for(&self, ns: &NamespaceManager, subject: &NamedNode) -> String {
        self.render_with(ns, Some(subject), "")
    }

    fn render_with(&self, ns: &NamespaceManager, pinned: Option<&NamedNode>, fragment: &str) -> String {
        let s = self.subject;
        let scalars: Vec<String> = self.scalar_vars().iter().map(|v| format!("?{v}")).collect();
        let separator = string_literal(LIST_SEPARATOR);
        let pattern = |text: &str| text.replace("{s}", s);

        let mut q = ns.prologue();
        let _ = writeln!(q, "SELECT {}", scalars.join(" "));
        for agg in self.aggregates {
            let _ = writeln!(
                q,
                "       (GROUP_CONCAT(DISTINCT ?{}; separator={}) AS ?{})",
                agg.var, separator, agg.alias
            );
        }
        q.push_str("WHERE {\n");
        if let Some(node) = pinned {
            let _ = writeln!(q, "    VALUES ?{s} {{ {node} }}");
        }
        if let Some(class) = self.class {
            let _ = writeln!(q, "    ?{s} a {class} .");
        }
        for required in self.required {
            let _ = writeln!(q, "    {} .", pattern(required.text));
        }
        for optional in self.optional {
            let _ = writeln!(q, "    OPTIONAL {{ {} }}", pattern(optional.text));
        }
        for context in self.context {
            let _ = writeln!(q, "    OPTIONAL {{ {} }}", pattern(context));
        }
        for agg in self.aggregates {
            let _ = writeln!(q, "    OPTIONAL {{ {} }}", pattern(agg.pattern));
        }
        for line in fragment.lines() {
            let _ = writeln!(q, "    {line}");
        }
        q.push_str("}\n");
        let _ = writeln!(q, "GROUP BY {}", scalars.join(" "));
        match self.order {
            SortOrder::Natural => {}
            SortOrder::Ascending(var) => {
                let _ = writeln!(q, "ORDER BY ?{var}");
            }
            SortOrder::Descending(var) => {
                let _ = writeln!(q, "ORDER BY DESC(?{var})");
            }
        }
        q
    }
}

/// Inventory totals across every lot with both stock and price, regardless
/// of any active filter
pub fn inventory_stats(ns: &NamespaceManager) -> String {
    format!(
        "{}SELECT (SUM(?value) AS ?grandTotal) (SUM(?stock) AS ?totalStock)\n\
         WHERE {{\n\
         \x20   ?lot a :CoffeeLot ; :hasStockKg ?stock ; :hasPrice ?price .\n\
         \x20   BIND(?stock * ?price AS ?value)\n\
         }}\n",
        ns.prologue()
    )
}

/// Other items sharing `origin`, never `source` itself
pub fn recommendations(
    ns: &NamespaceManager,
    source: &NamedNode,
    origin: &NamedNode,
    limit: usize,
) -> String {
    format!(
        "{}SELECT ?rec ?recName ?recPrice\n\
         WHERE {{\n\
         \x20   ?rec :hasDerivedOrigin {origin} .\n\
         \x20   ?rec rdfs:label ?recName .\n\
         \x20   OPTIONAL {{ ?rec :hasPrice ?recPrice }}\n\
         \x20   FILTER (?rec != {source})\n\
         }}\n\
         LIMIT {limit}\n",
        ns.prologue()
    )
}

/// Distinct labels of the resources reached through `relation`
pub fn distinct_labels(ns: &NamespaceManager, relation: &str) -> String {
    format!(
        "{}SELECT DISTINCT ?label\n\
         WHERE {{\n\
         \x20   ?s {relation} ?o . ?o rdfs:label ?label .\n\
         }}\n\
         ORDER BY ?label\n",
        ns.prologue()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ns() -> NamespaceManager {
        NamespaceManager::new("http://kopiverse.org/ontology#")
    }

    #[test]
    fn test_for_view() {
        assert_eq!(Template::for_view(ViewKind::Grower).subject, "lot");
        assert_eq!(Template::for_view(ViewKind::Barista).subject, "bev");
        assert_eq!(Template::for_view(ViewKind::Detail).view, ViewKind::Detail);
    }

    #[test]
    fn test_grower_query_shape() {
        let q = GROWER.render(&ns(), &FilterSet::none());

        assert!(q.starts_with("PREFIX : <http://kopiverse.org/ontology#>\n"));
        assert!(q.contains("SELECT ?lot ?name ?price ?harvest ?organic ?score\n"));
        assert!(q.contains(
            "(GROUP_CONCAT(DISTINCT ?flavorLabel; separator=\"|\") AS ?flavors)"
        ));
        assert!(q.contains("    ?lot a :CoffeeLot .\n"));
        assert!(q.contains("    ?lot :hasPrice ?price .\n"));
        assert!(q.contains("    OPTIONAL { ?lot :isOrganic ?organic }\n"));
        assert!(q.contains("GROUP BY ?lot ?name ?price ?harvest ?organic ?score\n"));
        assert!(q.trim_end().ends_with("ORDER BY DESC(?price)"));
        assert!(!q.contains("{s}"));
    }

    #[test]
    fn test_keyword_context_is_bound() {
        // Keyword filter needs ?ingLabel even on lot views
        for template in [&GROWER, &ROASTER, &BARISTA] {
            let q = template.render(&ns(), &FilterSet::none());
            assert!(q.contains("AS ?ingLabel)"), "{:?}", template.view);
            assert!(q.contains("?flavorLabel"), "{:?}", template.view);
            assert!(q.contains("rdfs:label ?name"), "{:?}", template.view);
        }
    }

    #[test]
    fn test_keyword_filters_before_aggregation() {
        let filters = FilterSet::builder().keyword("berry").build().unwrap();
        let q = GROWER.render(&ns(), &filters);

        // Same group as the flavor OPTIONAL, after it and before GROUP BY
        let flavor = q.find("OPTIONAL { ?lot :hasFlavorNote").unwrap();
        let keyword = q.find("FILTER (CONTAINS(LCASE(STR(?name))").unwrap();
        let group_by = q.find("GROUP BY").unwrap();
        assert!(flavor < keyword && keyword < group_by);
        assert!(!q.contains("EXISTS"));
    }

    #[test]
    fn test_filter_fragment_spliced_inside_where() {
        let filters = FilterSet::builder().keyword("gayo").origin("Aceh").build().unwrap();
        let q = ROASTER.render(&ns(), &filters);

        let where_start = q.find("WHERE {").unwrap();
        let where_end = q.find("\n}\nGROUP BY").unwrap();
        let body = &q[where_start..where_end];
        assert!(body.contains("CONTAINS(LCASE(STR(?name)), \"gayo\")"));
        assert!(body.contains("?lot :hasDerivedOrigin ?originFilter . ?originFilter rdfs:label \"Aceh\" ."));
        assert!(!q.contains("ORDER BY"));
    }

    #[test]
    fn test_roaster_exposes_superset() {
        let vars = ROASTER.scalar_vars();
        for var in ["shrink", "rest", "ferm", "acid", "body", "firstCrack", "stock", "origin"] {
            assert!(vars.contains(&var), "missing {var}");
        }
        let q = ROASTER.render(&ns(), &FilterSet::none());
        assert!(q.contains("AS ?certs)"));
    }

    #[test]
    fn test_barista_query() {
        let filters = FilterSet::builder().vegan(true).origin("Gayo").build().unwrap();
        let q = BARISTA.render(&ns(), &filters);

        assert!(q.contains("?bev a :CoffeeBeverage ."));
        assert!(q.contains("FILTER NOT EXISTS { ?bev :hasIngredient :Cream }"));
        assert!(!q.contains("originFilter"));
        assert!(q.trim_end().ends_with("ORDER BY ?name"));
        // Label lookup precedes the COALESCE that reads it
        let base = q.find("?bev :brewedFrom ?base").unwrap();
        assert!(q[base..].find("OPTIONAL { ?base rdfs:label").unwrap() < q[base..].find("BIND").unwrap());
    }

    #[test]
    fn test_detail_pinned_subject() {
        let node = ns().resource("GayoWineLot").unwrap();
        let q = DETAIL.render_for(&ns(), &node);

        assert!(q.contains("    VALUES ?s { <http://kopiverse.org/ontology#GayoWineLot> }\n"));
        assert!(q.contains("?originUri rdfs:label ?originName"));
        assert!(q.contains("OPTIONAL { ?farm :hasAltitude ?altitude }"));
        assert!(!q.contains(" a :Coffee"));
        assert!(DETAIL.scalar_vars().contains(&"originUri"));
    }

    #[test]
    fn test_auxiliary_queries() {
        let ns = ns();
        let stats = inventory_stats(&ns);
        assert!(stats.contains("SUM(?value) AS ?grandTotal"));
        assert!(stats.contains("SUM(?stock) AS ?totalStock"));

        let source = ns.resource("GayoWineLot").unwrap();
        let origin = ns.resource("AcehGayo").unwrap();
        let rec = recommendations(&ns, &source, &origin, 3);
        assert!(rec.contains("?rec :hasDerivedOrigin <http://kopiverse.org/ontology#AcehGayo> ."));
        assert!(rec.contains("FILTER (?rec != <http://kopiverse.org/ontology#GayoWineLot>)"));
        assert!(rec.trim_end().ends_with("LIMIT 3"));

        let origins = distinct_labels(&ns, ":hasDerivedOrigin");
        assert!(origins.contains("SELECT DISTINCT ?label"));
        assert!(origins.contains("?s :hasDerivedOrigin ?o . ?o rdfs:label ?label ."));
    }
}
