// Hipermaxi-specific JSON payloads
use crate::model::UpstreamError;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// Response wrapper shared by every upstream endpoint.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Envelope<T> {
    #[serde(rename = "ConError", default)]
    pub con_error: bool,
    #[serde(rename = "Mensaje", default)]
    pub message: Option<String>,
    #[serde(rename = "Dato", default, deserialize_with = "lenient_entries")]
    pub data: Vec<T>,
}

impl<T> Envelope<T> {
    pub fn into_data(self) -> Result<Vec<T>, UpstreamError> {
        if self.con_error {
            return Err(UpstreamError::Flagged(
                self.message.unwrap_or_else(|| "sin mensaje".into()),
            ));
        }
        Ok(self.data)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDepartment {
    #[serde(rename = "Categorias", default, deserialize_with = "lenient_entries")]
    pub categories: Vec<RawCategoryNode>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawCategoryNode {
    #[serde(rename = "IdCategoria")]
    pub id: i64,
    #[serde(rename = "Descripcion")]
    pub name: String,
    #[serde(rename = "SubCategorias", default, deserialize_with = "lenient_entries")]
    pub subcategories: Vec<RawSubcategoryNode>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawSubcategoryNode {
    #[serde(rename = "IdSubcategoria")]
    pub id: i64,
    #[serde(rename = "Descripcion")]
    pub name: String,
}

/// Product entry as listed upstream; every field may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProduct {
    #[serde(rename = "IdProducto", default)]
    pub id: Option<Value>,
    #[serde(rename = "Descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "ConOferta", default)]
    pub on_offer: Option<bool>,
    #[serde(rename = "PrecioOferta", default)]
    pub offer_price: Option<Decimal>,
    #[serde(rename = "PrecioVenta", default)]
    pub sale_price: Option<Decimal>,
    #[serde(rename = "PrecioOriginal", default)]
    pub original_price: Option<Decimal>,
    #[serde(rename = "Moneda", default)]
    pub currency: Option<String>,
}

impl RawProduct {
    /// Product ids arrive as strings or numbers; anything else counts as missing.
    pub fn product_id(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Decodes a list entry by entry. `null` is an empty list and malformed
/// entries are logged and skipped, so one bad item never costs its siblings.
fn lenient_entries<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let entries = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("⚠️ Skipping malformed upstream entry: {}", e);
                None
            }
        })
        .collect())
}

pub fn parse_taxonomy(body: &str) -> Result<Envelope<RawDepartment>, UpstreamError> {
    Ok(serde_json::from_str(body)?)
}

pub fn parse_products(body: &str) -> Result<Envelope<RawProduct>, UpstreamError> {
    Ok(serde_json::from_str(body)?)
}

/// Drops the department level, keeping upstream order.
pub fn flatten_departments(departments: Vec<RawDepartment>) -> Vec<RawCategoryNode> {
    departments
        .into_iter()
        .flat_map(|d| d.categories)
        .collect()
}
