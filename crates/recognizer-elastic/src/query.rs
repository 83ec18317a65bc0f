//! Typed search request builder.
//!
//! Queries are plain values until the transport serializes them, so a
//! malformed clause is a type error rather than a rejected request.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::schema::{EDGE_FIELD, FUZZY_FIELD, STRICT_FIELD};

/// Only the best hit is consumed by category lookup.
pub const DEFAULT_PAGE_SIZE: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub query: Query,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

impl SearchRequest {
    pub fn new(query: impl Into<Query>) -> Self { Self { query: query.into(), size: None } }

    #[must_use]
    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Query {
    Bool(BoolQuery),
    Match(MatchQuery),
}

/// Documents matching any `should` clause; scores of matching clauses combine.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoolQuery {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub should: Vec<Query>,
}

impl BoolQuery {
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn should(mut self, clause: impl Into<Query>) -> Self {
        self.should.push(clause.into());
        self
    }
}

impl From<BoolQuery> for Query {
    fn from(q: BoolQuery) -> Self { Query::Bool(q) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    And,
    Or,
}

/// Per-term edit distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fuzziness {
    Edits(u8),
    Auto,
}

impl Serialize for Fuzziness {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Fuzziness::Edits(n) => serializer.serialize_u8(*n),
            Fuzziness::Auto => serializer.serialize_str("AUTO"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchOptions {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<Operator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzziness: Option<Fuzziness>,
}

/// `{"<field>": {"query": ..., ...}}`
#[derive(Debug, Clone, PartialEq)]
pub struct MatchQuery {
    pub field: String,
    pub options: MatchOptions,
}

impl MatchQuery {
    pub fn new(field: impl Into<String>, text: impl Into<String>) -> Self {
        Self { field: field.into(), options: MatchOptions { query: text.into(), operator: None, fuzziness: None } }
    }

    #[must_use]
    pub fn operator(mut self, op: Operator) -> Self {
        self.options.operator = Some(op);
        self
    }

    #[must_use]
    pub fn fuzziness(mut self, f: Fuzziness) -> Self {
        self.options.fuzziness = Some(f);
        self
    }
}

impl Serialize for MatchQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.field, &self.options)?;
        map.end()
    }
}

impl From<MatchQuery> for Query {
    fn from(q: MatchQuery) -> Self { Query::Match(q) }
}

/// Category lookup: exact words, then typo-tolerant stems, then prefixes,
/// OR-combined so the backend scores whichever strategies matched.
pub fn category_query(text: &str) -> SearchRequest {
    let query = BoolQuery::new()
        .should(MatchQuery::new(STRICT_FIELD, text).operator(Operator::And))
        .should(MatchQuery::new(FUZZY_FIELD, text).operator(Operator::And).fuzziness(Fuzziness::Edits(1)))
        .should(MatchQuery::new(EDGE_FIELD, text));
    SearchRequest::new(query).size(DEFAULT_PAGE_SIZE)
}
