//! Values for the catalog's filter controls

use crate::query::distinct_labels;
use crate::rdf::NamespaceManager;
use crate::sparql::{BindingRow, GraphSource};
use serde::Serialize;
use std::collections::BTreeSet;

/// Distinct origin and process labels present in the graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub origins: Vec<String>,
    pub processes: Vec<String>,
}

/// Fetch both option lists; a failed query leaves its list empty
pub async fn list_options<S>(source: &S, ns: &NamespaceManager) -> FilterOptions
where
    S: GraphSource + ?Sized,
{
    let origins = source
        .select_or_empty(&distinct_labels(ns, ":hasDerivedOrigin"))
        .await;
    let processes = source
        .select_or_empty(&distinct_labels(ns, ":processedWith"))
        .await;

    FilterOptions {
        origins: sorted_labels(&origins),
        processes: sorted_labels(&processes),
    }
}

fn sorted_labels(rows: &[BindingRow]) -> Vec<String> {
    rows.iter()
        .filter_map(|row| row.get("label"))
        .map(str::to_owned)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparql::{SparqlError, SparqlResult};
    use async_trait::async_trait;

    /// Serves origins, fails on anything else
    struct OriginsOnly;

    #[async_trait]
    impl GraphSource for OriginsOnly {
        async fn select(&self, query: &str) -> SparqlResult<Vec<BindingRow>> {
            if query.contains(":hasDerivedOrigin") {
                Ok(["Toraja", "Aceh Gayo", "Toraja", "Bali Kintamani"]
                    .into_iter()
                    .map(|l| BindingRow::from_pairs([("label", l)]))
                    .collect())
            } else {
                Err(SparqlError::Status(503))
            }
        }
    }

    #[tokio::test]
    async fn test_sorted_and_deduplicated() {
        let ns = NamespaceManager::new("http://kopiverse.org/ontology#");
        let options = list_options(&OriginsOnly, &ns).await;

        assert_eq!(options.origins, vec!["Aceh Gayo", "Bali Kintamani", "Toraja"]);
        // Process query failed, page still gets its options
        assert!(options.processes.is_empty());
    }
}
