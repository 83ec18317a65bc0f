//! recognizer-elastic
//!
//! Category index on an Elasticsearch-compatible backend: index schema,
//! typed query builder, response translation and the HTTP transport.

pub mod index;
pub mod query;
pub mod response;
pub mod schema;
pub mod transport;

pub use index::ElasticCategoryIndex;
pub use schema::build_schema;
