use async_trait::async_trait;
use reqwest::Method;

use recognizer_core::config::{validate_backend_url, validate_index_name, BackendSettings};
use recognizer_core::{
    CategoryRecognizer, Category, Error, IndexedDocument, RefreshPolicy, RequestContext, Result, SearchResponse,
};

use crate::query::category_query;
use crate::response::{parse_count_response, parse_error_response, parse_search_response};
use crate::schema::build_schema;
use crate::transport::{RawResponse, Transport};

/// Category index on an Elasticsearch-compatible backend.
///
/// Holds no mutable state, so one instance can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct ElasticCategoryIndex {
    transport: Transport,
    index: String,
    refresh: RefreshPolicy,
}

impl ElasticCategoryIndex {
    pub fn new(settings: &BackendSettings) -> Result<Self> {
        let base = validate_backend_url(&settings.url)?;
        validate_index_name(&settings.index)?;
        let transport = Transport::new(base, settings.timeout())?;
        Ok(Self { transport, index: settings.index.clone(), refresh: settings.refresh })
    }

    pub fn index_name(&self) -> &str { &self.index }

    pub fn refresh_policy(&self) -> RefreshPolicy { self.refresh }

    /// Run the category query and return every hit the backend sent back.
    pub async fn search(&self, ctx: &RequestContext, text: &str) -> Result<SearchResponse> {
        let url = self.transport.url(&[self.index.as_str(), "_search"])?;
        let res = self.transport.send_json(ctx, Method::POST, url, &category_query(text)).await?;
        let res = expect_success(res)?;
        parse_search_response(&res.body)
    }

    /// Number of documents currently in the index.
    pub async fn count(&self, ctx: &RequestContext) -> Result<u64> {
        let url = self.transport.url(&[self.index.as_str(), "_count"])?;
        let res = expect_success(self.transport.send(ctx, Method::GET, url).await?)?;
        parse_count_response(&res.body)
    }
}

#[async_trait]
impl CategoryRecognizer for ElasticCategoryIndex {
    async fn create_index(&self, ctx: &RequestContext) -> Result<()> {
        let url = self.transport.url(&[self.index.as_str()])?;
        expect_success(self.transport.send_json(ctx, Method::PUT, url, &build_schema()).await?)?;
        tracing::info!(index = %self.index, "index created");
        Ok(())
    }

    async fn delete_index(&self, ctx: &RequestContext) -> Result<()> {
        let url = self.transport.url(&[self.index.as_str()])?;
        match expect_success(self.transport.send(ctx, Method::DELETE, url).await?) {
            Ok(_) => {
                tracing::info!(index = %self.index, "index deleted");
                Ok(())
            }
            Err(e) if e.is_index_not_found() => {
                tracing::warn!(index = %self.index, error = %e, "index did not exist, nothing to delete");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn index_category(&self, ctx: &RequestContext, category: &Category) -> Result<()> {
        if category.id.is_empty() {
            return Err(Error::InvalidInput(format!("category '{}' has an empty id", category.name)));
        }
        // dot segments are dropped from the path and would address `_doc` itself
        if category.id == "." || category.id == ".." {
            return Err(Error::InvalidInput(format!("category '{}' has a reserved id '{}'", category.name, category.id)));
        }
        let mut url = self.transport.url(&[self.index.as_str(), "_doc", category.id.as_str()])?;
        url.query_pairs_mut().append_pair("refresh", self.refresh.as_str());
        let doc = IndexedDocument::from(category);
        expect_success(self.transport.send_json(ctx, Method::PUT, url, &doc).await?)?;
        tracing::debug!(index = %self.index, id = %category.id, name = %category.name, "category indexed");
        Ok(())
    }

    /// Ties between equally scored hits are resolved by backend order.
    async fn search_category(&self, ctx: &RequestContext, text: &str) -> Result<String> {
        let res = self.search(ctx, text).await?;
        if res.is_empty() {
            return Err(Error::NotFound(text.to_string()));
        }
        let total = res.total_hits;
        let best = res
            .hits
            .into_iter()
            .next()
            .ok_or_else(|| Error::Decode(format!("{} hits reported but none returned", total)))?;
        tracing::debug!(text, id = %best.doc_id, score = best.score, "category matched");
        Ok(best.source.query.name)
    }
}

fn expect_success(res: RawResponse) -> Result<RawResponse> {
    if res.is_success() {
        Ok(res)
    } else {
        Err(parse_error_response(res.status.as_u16(), &res.body))
    }
}
