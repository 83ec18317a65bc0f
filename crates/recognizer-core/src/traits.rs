use async_trait::async_trait;

use crate::context::RequestContext;
use crate::error::Result;
use crate::types::Category;

/// The capability surface callers program against.
#[async_trait]
pub trait CategoryRecognizer: Send + Sync {
    /// Provision the category index. Fails if it already exists.
    async fn create_index(&self, ctx: &RequestContext) -> Result<()>;
    /// Remove the category index. A missing index is not an error.
    async fn delete_index(&self, ctx: &RequestContext) -> Result<()>;
    /// Upsert one category, visible to the next search.
    async fn index_category(&self, ctx: &RequestContext, category: &Category) -> Result<()>;
    /// Resolve free text to the best-matching canonical category name.
    async fn search_category(&self, ctx: &RequestContext, text: &str) -> Result<String>;

    /// Delete then create. Safe to run unconditionally at startup.
    async fn reset_index(&self, ctx: &RequestContext) -> Result<()> {
        self.delete_index(ctx).await?;
        self.create_index(ctx).await
    }
}
