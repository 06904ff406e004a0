//! "Similar item" suggestions for the detail page
//!
//! Similarity is purely categorical: other items derived from the same
//! origin, in whatever order the store returns them.

use crate::projection::{project_recommendation, Recommendation};
use crate::query::recommendations;
use crate::rdf::NamespaceManager;
use crate::sparql::GraphSource;
use oxrdf::NamedNode;
use tracing::{debug, warn};

/// Up to `limit` items sharing `origin_iri` with `item_iri`.
///
/// An item without an origin has no suggestions. The source item is never
/// suggested, even if the store hands it back.
pub async fn recommend<S>(
    source: &S,
    ns: &NamespaceManager,
    item_iri: &str,
    origin_iri: Option<&str>,
    limit: usize,
) -> Vec<Recommendation>
where
    S: GraphSource + ?Sized,
{
    let Some(origin_iri) = origin_iri else {
        debug!(item = item_iri, "no origin, skipping recommendations");
        return Vec::new();
    };

    let (item, origin) = match (NamedNode::new(item_iri), NamedNode::new(origin_iri)) {
        (Ok(item), Ok(origin)) => (item, origin),
        (Err(e), _) | (_, Err(e)) => {
            warn!(item = item_iri, origin = origin_iri, error = %e, "unusable IRI, skipping recommendations");
            return Vec::new();
        }
    };

    let query = recommendations(ns, &item, &origin, limit);
    source
        .select_or_empty(&query)
        .await
        .iter()
        .filter(|row| row.get("rec") != Some(item_iri))
        .filter_map(|row| match project_recommendation(row) {
            Ok(rec) => Some(rec),
            Err(e) => {
                warn!(error = %e, "dropping malformed recommendation row");
                None
            }
        })
        .take(limit)
        .collect()
}
