// In-memory upstream and sink used by the collector tests.
use crate::model::{PriceRecord, ProductQuery, StorageError, UpstreamError};
use crate::parser::hipermaxi_parser::parse_products;
use crate::parser::{RawCategoryNode, RawProduct, RawSubcategoryNode};
use crate::scraper::UpstreamClient;
use crate::storage::{DbHealth, PriceSink, SinkLease};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn category(id: i64, name: &str, subs: &[(i64, &str)]) -> RawCategoryNode {
    RawCategoryNode {
        id,
        name: name.to_string(),
        subcategories: subs
            .iter()
            .map(|(sub_id, sub_name)| RawSubcategoryNode {
                id: *sub_id,
                name: sub_name.to_string(),
            })
            .collect(),
    }
}

pub fn product(id: &str, price: i64) -> RawProduct {
    serde_json::from_value(serde_json::json!({
        "IdProducto": id,
        "Descripcion": format!("Producto {}", id),
        "ConOferta": false,
        "PrecioVenta": price,
        "Moneda": "Bs"
    }))
    .unwrap()
}

pub struct FakeUpstream {
    taxonomy: Result<Vec<RawCategoryNode>, String>,
    products: HashMap<(i64, Option<i64>), Result<Vec<RawProduct>, String>>,
    taxonomy_calls: AtomicUsize,
    product_calls: Mutex<Vec<ProductQuery>>,
}

impl FakeUpstream {
    pub fn new(taxonomy: Vec<RawCategoryNode>) -> Self {
        Self {
            taxonomy: Ok(taxonomy),
            products: HashMap::new(),
            taxonomy_calls: AtomicUsize::new(0),
            product_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_taxonomy() -> Self {
        let mut upstream = Self::new(Vec::new());
        upstream.taxonomy = Err("Sucursal no disponible".into());
        upstream
    }

    pub fn with_products(mut self, category_id: i64, sub_id: Option<i64>, products: Vec<RawProduct>) -> Self {
        self.products.insert((category_id, sub_id), Ok(products));
        self
    }

    /// Serves a raw upstream body, decoded the way the HTTP client decodes it.
    pub fn with_page(mut self, category_id: i64, sub_id: Option<i64>, body: &str) -> Self {
        let products = parse_products(body)
            .and_then(|envelope| envelope.into_data())
            .map_err(|e| e.to_string());
        self.products.insert((category_id, sub_id), products);
        self
    }

    pub fn with_failure(mut self, category_id: i64, sub_id: Option<i64>) -> Self {
        self.products
            .insert((category_id, sub_id), Err("ConError".into()));
        self
    }

    pub fn taxonomy_calls(&self) -> usize {
        self.taxonomy_calls.load(Ordering::SeqCst)
    }

    pub fn product_calls(&self) -> Vec<ProductQuery> {
        self.product_calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl UpstreamClient for FakeUpstream {
    async fn fetch_taxonomy(&self) -> Result<Vec<RawCategoryNode>, UpstreamError> {
        self.taxonomy_calls.fetch_add(1, Ordering::SeqCst);
        self.taxonomy.clone().map_err(UpstreamError::Flagged)
    }

    async fn fetch_products(&self, query: &ProductQuery) -> Result<Vec<RawProduct>, UpstreamError> {
        self.product_calls.lock().unwrap().push(*query);
        match self.products.get(&(query.category_id, query.sub_category_id)) {
            Some(result) => result.clone().map_err(UpstreamError::Flagged),
            None => Ok(Vec::new()),
        }
    }
}

#[derive(Clone, Default)]
pub struct RecordingSink {
    pub batches: Arc<Mutex<Vec<Vec<PriceRecord>>>>,
    pub acquired: Arc<AtomicUsize>,
    pub released: Arc<AtomicUsize>,
    pub fail_insert: bool,
    pub fail_acquire: bool,
}

impl RecordingSink {
    pub fn failing_insert() -> Self {
        Self {
            fail_insert: true,
            ..Self::default()
        }
    }

    pub fn unreachable() -> Self {
        Self {
            fail_acquire: true,
            ..Self::default()
        }
    }

    pub fn batches(&self) -> Vec<Vec<PriceRecord>> {
        self.batches.lock().unwrap().clone()
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

impl PriceSink for RecordingSink {
    fn acquire(&self) -> Result<Box<dyn SinkLease>, StorageError> {
        if self.fail_acquire {
            return Err(StorageError::Connection("connection refused".into()));
        }
        self.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(self.clone()))
    }
}

impl SinkLease for RecordingSink {
    fn insert_batch(&mut self, batch: &[PriceRecord]) -> Result<usize, StorageError> {
        if self.fail_insert {
            return Err(StorageError::Connection("bulk insert rejected".into()));
        }
        self.batches.lock().unwrap().push(batch.to_vec());
        Ok(batch.len())
    }

    fn ping(&self) -> Result<DbHealth, StorageError> {
        Ok(DbHealth {
            database: "memoria".into(),
            server: "fake".into(),
            current_time: "2026-10-17 12:00:00".into(),
        })
    }

    fn release(self: Box<Self>) -> Result<(), StorageError> {
        self.released.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
