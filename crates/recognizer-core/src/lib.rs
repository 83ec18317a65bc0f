#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod config;
pub mod context;
pub mod error;
pub mod traits;
pub mod types;

pub use context::RequestContext;
pub use error::{BackendError, Error, Result};
pub use traits::CategoryRecognizer;
pub use types::{Category, IndexedDocument, RefreshPolicy, SearchHit, SearchResponse};
