//! Domain types shared by the backend client and the service binaries.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

pub type CategoryId = String;

/// A canonical vocabulary entry. `id` is unique and doubles as the
/// backend document id, so re-indexing the same id overwrites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

/// The nested `query` object of an indexed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentQuery {
    pub name: String,
}

/// Backend-stored projection of a [`Category`]: `{id, query: {name}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedDocument {
    pub id: CategoryId,
    pub query: DocumentQuery,
}

impl IndexedDocument {
    pub fn name(&self) -> &str { &self.query.name }
}

impl From<&Category> for IndexedDocument {
    fn from(c: &Category) -> Self {
        Self { id: c.id.clone(), query: DocumentQuery { name: c.name.clone() } }
    }
}

/// One ranked hit. Higher `score` is better; the value is backend-defined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub index: String,
    pub doc_id: String,
    pub score: f64,
    pub source: IndexedDocument,
}

/// Hits in backend order (descending score). Never re-sorted locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub took_ms: u64,
    pub total_hits: u64,
    pub hits: Vec<SearchHit>,
}

impl SearchResponse {
    pub fn is_empty(&self) -> bool { self.total_hits == 0 }

    pub fn best(&self) -> Option<&SearchHit> { self.hits.first() }
}

/// Visibility of a write to subsequent searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    /// Refresh the affected shards before returning.
    #[default]
    True,
    /// Block until the next scheduled refresh.
    WaitFor,
    /// Return immediately; visible after the backend's refresh interval.
    False,
}

impl RefreshPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            RefreshPolicy::True => "true",
            RefreshPolicy::WaitFor => "wait_for",
            RefreshPolicy::False => "false",
        }
    }
}

// Accepts `true`/`false` as booleans too: env providers parse them that way.
impl<'de> Deserialize<'de> for RefreshPolicy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Name(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Flag(true) => Ok(RefreshPolicy::True),
            Raw::Flag(false) => Ok(RefreshPolicy::False),
            Raw::Name(name) => match name.as_str() {
                "true" => Ok(RefreshPolicy::True),
                "wait_for" => Ok(RefreshPolicy::WaitFor),
                "false" => Ok(RefreshPolicy::False),
                other => Err(de::Error::unknown_variant(other, &["true", "wait_for", "false"])),
            },
        }
    }
}
