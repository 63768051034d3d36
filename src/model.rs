// Core structs: PriceRecord, ResolvedSelection, CollectionOutcome, Summary
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// Canonical price row, one per upstream product.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRecord {
    pub product_id: String,
    pub description: String,
    pub on_offer: bool,
    pub price: Option<Decimal>,
    pub original_price: Option<Decimal>,
    pub currency: String,
    pub category_id: i64,
    pub category_name: String,
    pub sub_category_id: i64,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubcategoryRef {
    #[serde(rename = "idSubCategoria")]
    pub sub_category_id: i64,
    #[serde(rename = "descripcion")]
    pub name: String,
}

/// A category chosen for price collection in one run.
///
/// With `all_subcategories` set the category is collected as a whole, otherwise
/// each entry of `subcategories` gets its own upstream call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSelection {
    #[serde(rename = "idCategoria")]
    pub category_id: i64,
    #[serde(rename = "descripcion")]
    pub category_name: String,
    #[serde(skip)]
    pub all_subcategories: bool,
    #[serde(rename = "subCategorias")]
    pub subcategories: Vec<SubcategoryRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorMarker {
    pub category_id: i64,
    pub category_name: String,
    pub error_message: String,
    pub timestamp: DateTime<Utc>,
}

/// Result of one category-level or subcategory-level collection call.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionOutcome {
    Collected(Vec<PriceRecord>),
    Failed(ErrorMarker),
}

impl CollectionOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, CollectionOutcome::Failed(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    #[serde(rename = "totalCategorias")]
    pub total_categories: usize,
    #[serde(rename = "categoriasExitosas")]
    pub successful_categories: usize,
    #[serde(rename = "categoriasConError")]
    pub failed_categories: usize,
    #[serde(rename = "totalProductos")]
    pub total_products: usize,
}

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("upstream responded with status {0}")]
    Status(u16),
    #[error("invalid upstream payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("upstream signaled an error: {0}")]
    Flagged(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
    #[error("connection error: {0}")]
    Connection(String),
    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("No se encontraron categorías para recolectar precios")]
    NoCategories,
    #[error("Error uploading products to database: {0}")]
    Persist(#[from] StorageError),
}

/// One product-listing request: a whole category, or one of its subcategories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductQuery {
    pub category_id: i64,
    pub sub_category_id: Option<i64>,
}
