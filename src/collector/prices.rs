use crate::model::{CollectionOutcome, ErrorMarker, PriceRecord, ProductQuery};
use crate::normalizer::{normalize, PriceContext};
use crate::parser::RawProduct;
use crate::scraper::UpstreamClient;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

/// Fetches and normalizes one page of prices per category or subcategory.
pub struct PriceCollector<'a> {
    upstream: &'a dyn UpstreamClient,
    recorded_at: DateTime<Utc>,
}

impl<'a> PriceCollector<'a> {
    /// Every record produced by this collector carries `recorded_at`.
    pub fn new(upstream: &'a dyn UpstreamClient, recorded_at: DateTime<Utc>) -> Self {
        Self {
            upstream,
            recorded_at,
        }
    }

    pub async fn collect_for_category(&self, category_id: i64, category_name: &str) -> CollectionOutcome {
        info!("Recolectando precios para categoría: {}", category_name);
        let query = ProductQuery {
            category_id,
            sub_category_id: None,
        };
        self.collect(query, category_name, "Error obteniendo precios por categoría")
            .await
    }

    pub async fn collect_for_subcategory(
        &self,
        sub_category_id: i64,
        category_id: i64,
        category_name: &str,
    ) -> CollectionOutcome {
        info!(
            "Recolectando precios para subcategoría {} de {}",
            sub_category_id, category_name
        );
        let query = ProductQuery {
            category_id,
            sub_category_id: Some(sub_category_id),
        };
        self.collect(query, category_name, "Error obteniendo precios por subcategoría")
            .await
    }

    async fn collect(&self, query: ProductQuery, category_name: &str, failure: &str) -> CollectionOutcome {
        let products = match self.upstream.fetch_products(&query).await {
            Ok(products) => products,
            Err(e) => {
                warn!("{} '{}': {}", failure, category_name, e);
                return CollectionOutcome::Failed(ErrorMarker {
                    category_id: query.category_id,
                    category_name: category_name.to_string(),
                    error_message: format!("{}: {}", failure, e),
                    timestamp: Utc::now(),
                });
            }
        };

        let ctx = PriceContext {
            category_id: query.category_id,
            category_name,
            sub_category_id: query.sub_category_id,
            recorded_at: self.recorded_at,
        };
        CollectionOutcome::Collected(normalize_valid(&products, &ctx))
    }
}

/// Normalizes a product page, logging and dropping records that fail validation.
pub fn normalize_valid(products: &[RawProduct], ctx: &PriceContext<'_>) -> Vec<PriceRecord> {
    let records: Vec<PriceRecord> = products
        .iter()
        .filter_map(|product| match normalize(product, ctx) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(
                    "❌ Rejected product {} in '{}': {}",
                    product.product_id().as_deref().unwrap_or("<sin id>"),
                    ctx.category_name,
                    e
                );
                None
            }
        })
        .collect();

    if records.len() != products.len() {
        info!(
            "📊 Processing {} valid products out of {} total",
            records.len(),
            products.len()
        );
    }
    records
}
