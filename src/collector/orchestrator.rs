use crate::collector::prices::PriceCollector;
use crate::collector::taxonomy;
use crate::config::FilterConfig;
use crate::model::{CollectionError, CollectionOutcome, PriceRecord, StorageError, Summary};
use crate::scraper::UpstreamClient;
use crate::storage::{PriceSink, SinkLease};
use crate::utils::format_timestamp;
use chrono::Utc;
use std::time::Instant;
use tracing::{info, warn};

/// Drives one collection run: resolve, collect, aggregate, persist.
pub struct CollectionOrchestrator<'a> {
    upstream: &'a dyn UpstreamClient,
    sink: &'a dyn PriceSink,
    filters: &'a FilterConfig,
}

impl<'a> CollectionOrchestrator<'a> {
    pub fn new(upstream: &'a dyn UpstreamClient, sink: &'a dyn PriceSink, filters: &'a FilterConfig) -> Self {
        Self {
            upstream,
            sink,
            filters,
        }
    }

    pub async fn run(&self) -> Result<Summary, CollectionError> {
        let started = Instant::now();
        info!("Recolectando precios...");

        let stage = Instant::now();
        let selections = taxonomy::resolve(self.upstream, self.filters.active()).await;
        info!(
            "Resolved {} categories in {} ms",
            selections.len(),
            stage.elapsed().as_millis()
        );
        if selections.is_empty() {
            return Err(CollectionError::NoCategories);
        }

        let stage = Instant::now();
        let collector = PriceCollector::new(self.upstream, Utc::now());
        let mut outcomes = Vec::new();
        for selection in &selections {
            if selection.all_subcategories {
                outcomes.push(
                    collector
                        .collect_for_category(selection.category_id, &selection.category_name)
                        .await,
                );
            } else {
                for sub in &selection.subcategories {
                    outcomes.push(
                        collector
                            .collect_for_subcategory(
                                sub.sub_category_id,
                                selection.category_id,
                                &selection.category_name,
                            )
                            .await,
                    );
                }
            }
        }
        info!(
            "Collected {} outcomes in {} ms",
            outcomes.len(),
            stage.elapsed().as_millis()
        );

        let (batch, summary) = aggregate(outcomes);

        let stage = Instant::now();
        let inserted = self.persist(batch).await?;
        info!(
            "Persisted {} products in {} ms",
            inserted,
            stage.elapsed().as_millis()
        );

        info!(
            "Tiempo de ejecución: {} milisegundos ({:?})",
            started.elapsed().as_millis(),
            summary
        );
        Ok(summary)
    }

    /// One lease per run, released whatever the insert outcome.
    async fn persist(&self, batch: Vec<PriceRecord>) -> Result<usize, StorageError> {
        if batch.is_empty() {
            info!("No products to upload");
            return Ok(0);
        }

        let lease = self.sink.acquire()?;
        let inserted =
            tokio::task::spawn_blocking(move || insert_and_release(lease, &batch)).await??;
        info!("✅ Successfully uploaded {} products to database", inserted);
        Ok(inserted)
    }
}

/// Runs on the blocking pool; the lease is released even when the insert fails.
fn insert_and_release(mut lease: Box<dyn SinkLease>, batch: &[PriceRecord]) -> Result<usize, StorageError> {
    let inserted = lease.insert_batch(batch);
    if let Err(e) = lease.release() {
        warn!("Error closing connection: {}", e);
    }
    inserted
}

/// Flattens successful outcomes into one batch and counts attempts.
pub fn aggregate(outcomes: Vec<CollectionOutcome>) -> (Vec<PriceRecord>, Summary) {
    let total_categories = outcomes.len();
    let failed_categories = outcomes.iter().filter(|o| o.is_failure()).count();

    for outcome in &outcomes {
        if let CollectionOutcome::Failed(marker) = outcome {
            warn!(
                "Category {} '{}' failed at {}: {}",
                marker.category_id,
                marker.category_name,
                format_timestamp(marker.timestamp),
                marker.error_message
            );
        }
    }

    let batch: Vec<PriceRecord> = outcomes
        .into_iter()
        .flat_map(|outcome| match outcome {
            CollectionOutcome::Collected(records) => records,
            CollectionOutcome::Failed(_) => Vec::new(),
        })
        .collect();

    let summary = Summary {
        total_categories,
        successful_categories: total_categories - failed_categories,
        failed_categories,
        total_products: batch.len(),
    };
    (batch, summary)
}
