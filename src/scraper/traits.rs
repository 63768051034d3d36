use crate::model::{ProductQuery, UpstreamError};
use crate::parser::{RawCategoryNode, RawProduct};

/// Read access to the retailer's public JSON API.
#[async_trait::async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Categories of the configured branch, departments flattened away.
    async fn fetch_taxonomy(&self) -> Result<Vec<RawCategoryNode>, UpstreamError>;

    /// First page of products for a category or subcategory.
    async fn fetch_products(&self, query: &ProductQuery) -> Result<Vec<RawProduct>, UpstreamError>;
}
