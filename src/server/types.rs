use crate::model::{ResolvedSelection, Summary};
use crate::utils::timestamp_now;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct DbHealthResponse {
    pub status: &'static str,
    pub database: String,
    pub server: String,
    #[serde(rename = "currentTime")]
    pub current_time: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct DbDownResponse {
    pub status: &'static str,
    pub error: String,
    pub timestamp: String,
}

/// Error envelope shared by the category and collection endpoints.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            timestamp: None,
        }
    }

    pub fn timestamped(error: impl Into<String>) -> Self {
        Self {
            timestamp: Some(timestamp_now()),
            ..Self::new(error)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
}

impl<T> DataResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategorySummary {
    #[serde(rename = "IdCategoria")]
    pub id: i64,
    #[serde(rename = "Descripcion")]
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct SubcategorySummary {
    #[serde(rename = "IdSubcategoria")]
    pub id: i64,
    #[serde(rename = "Descripcion")]
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CategoryTree {
    #[serde(rename = "IdCategoria")]
    pub id: i64,
    #[serde(rename = "Descripcion")]
    pub name: String,
    #[serde(rename = "SubCategorias")]
    pub subcategories: Vec<SubcategorySummary>,
}

impl From<&ResolvedSelection> for CategorySummary {
    fn from(selection: &ResolvedSelection) -> Self {
        Self {
            id: selection.category_id,
            name: selection.category_name.clone(),
        }
    }
}

impl From<&ResolvedSelection> for CategoryTree {
    fn from(selection: &ResolvedSelection) -> Self {
        Self {
            id: selection.category_id,
            name: selection.category_name.clone(),
            subcategories: selection
                .subcategories
                .iter()
                .map(|sub| SubcategorySummary {
                    id: sub.sub_category_id,
                    name: sub.name.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CollectionResponse {
    pub success: bool,
    pub message: &'static str,
    pub summary: Summary,
    pub timestamp: String,
}
