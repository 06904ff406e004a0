//! SPARQL query results

use super::{SparqlError, SparqlResult};
use indexmap::IndexMap;
use oxrdf::Term;
use sparesults::{QueryResultsFormat, QueryResultsParser, QuerySolution, ReaderQueryResultsParserOutput};

/// One solution of a SELECT query: variable name → lexical value.
///
/// Variables left unbound by an `OPTIONAL` pattern are simply absent.
/// IRIs and blank nodes are kept as their bare identifier, literals as their
/// lexical form without datatype or language tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingRow {
    values: IndexMap<String, String>,
}

impl BindingRow {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from `(variable, value)` pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Convert a parsed solution
    pub fn from_solution(solution: &QuerySolution) -> Self {
        Self {
            values: solution
                .into_iter()
                .map(|(variable, term)| (variable.as_str().to_owned(), lexical_value(term)))
                .collect(),
        }
    }

    /// Add a binding
    pub fn bind(&mut self, variable: impl Into<String>, value: impl Into<String>) {
        self.values.insert(variable.into(), value.into());
    }

    /// Get a binding
    pub fn get(&self, variable: &str) -> Option<&str> {
        self.values.get(variable).map(String::as_str)
    }

    /// Whether the variable is bound in this row
    pub fn contains(&self, variable: &str) -> bool {
        self.values.contains_key(variable)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn lexical_value(term: &Term) -> String {
    match term {
        Term::NamedNode(node) => node.as_str().to_owned(),
        Term::BlankNode(node) => node.as_str().to_owned(),
        Term::Literal(literal) => literal.value().to_owned(),
        #[allow(unreachable_patterns)]
        other => other.to_string(),
    }
}

/// Parse an `application/sparql-results+json` body into rows
pub fn parse_json_results(body: &[u8]) -> SparqlResult<Vec<BindingRow>> {
    let parser = QueryResultsParser::from_format(QueryResultsFormat::Json);
    let output = parser
        .for_reader(body)
        .map_err(|e| SparqlError::Parse(e.to_string()))?;

    match output {
        ReaderQueryResultsParserOutput::Solutions(solutions) => {
            let mut rows = Vec::new();
            for solution in solutions {
                let solution = solution.map_err(|e| SparqlError::Parse(e.to_string()))?;
                rows.push(BindingRow::from_solution(&solution));
            }
            Ok(rows)
        }
        ReaderQueryResultsParserOutput::Boolean(value) => Err(SparqlError::UnexpectedForm(
            format!("boolean result ({value}) where bindings were expected"),
        )),
    }
}
