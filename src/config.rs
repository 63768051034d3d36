use crate::model::ConfigError;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CategoryFilter {
    #[serde(rename = "Categoria")]
    pub category: String,
    /// Empty means every subcategory of the category.
    #[serde(rename = "SubCategorias", default)]
    pub subcategories: Vec<String>,
}

/// The filter mode in effect for one resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterSpec<'a> {
    CategoryWithSubcategories(&'a [CategoryFilter]),
    CategoryOnly(&'a [String]),
    Unfiltered,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterConfig {
    pub categories_with_subcategories: Vec<CategoryFilter>,
    pub categories: Vec<String>,
}

impl FilterConfig {
    /// Category-with-subcategories wins over category-only, which wins over no filter.
    pub fn active(&self) -> FilterSpec<'_> {
        if !self.categories_with_subcategories.is_empty() {
            FilterSpec::CategoryWithSubcategories(&self.categories_with_subcategories)
        } else {
            self.category_only()
        }
    }

    /// Same precedence, ignoring the subcategory filter.
    pub fn category_only(&self) -> FilterSpec<'_> {
        if !self.categories.is_empty() {
            FilterSpec::CategoryOnly(&self.categories)
        } else {
            FilterSpec::Unfiltered
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub market_id: String,
    pub branch_id: String,
    pub page_size: u32,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub upstream: UpstreamConfig,
    pub filters: FilterConfig,
    pub database: DatabaseConfig,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |name: &str, default: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let upstream = UpstreamConfig {
            base_url: text("baseURL", "https://www.hipermaxi.com"),
            market_id: text("IdMarket", "85"),
            branch_id: text("IdSucursal", "85"),
            page_size: parse_number("CantidadProductos", lookup("CantidadProductos"), 10_000)?,
            request_timeout_secs: parse_number(
                "REQUEST_TIMEOUT_SECS",
                lookup("REQUEST_TIMEOUT_SECS"),
                30,
            )?,
        };

        let filters = FilterConfig {
            categories_with_subcategories: parse_filter(
                "CategoriasYSubCategorias",
                lookup("CategoriasYSubCategorias"),
            ),
            categories: parse_filter("Categorias", lookup("Categorias")),
        };

        Ok(Self {
            upstream,
            filters,
            database: DatabaseConfig {
                path: PathBuf::from(text("DB_PATH", "precios.db")),
            },
            port: parse_number("PORT", lookup("PORT"), 3000)?,
        })
    }
}

fn parse_number<T: FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
            name,
            value: value.to_string(),
        }),
    }
}

/// Malformed filter JSON is logged and treated as absent.
fn parse_filter<T: DeserializeOwned>(name: &str, raw: Option<String>) -> Vec<T> {
    let Some(raw) = raw.filter(|v| !v.trim().is_empty()) else {
        return Vec::new();
    };
    match serde_json::from_str(&raw) {
        Ok(values) => values,
        Err(e) => {
            warn!("Error parsing {} from environment: {}. Using empty list", name, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let cfg = config_from(&[]).unwrap();
        assert_eq!(cfg.upstream.base_url, "https://www.hipermaxi.com");
        assert_eq!(cfg.upstream.market_id, "85");
        assert_eq!(cfg.upstream.branch_id, "85");
        assert_eq!(cfg.upstream.page_size, 10_000);
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.filters.active(), FilterSpec::Unfiltered);
    }

    #[test]
    fn subcategory_filter_takes_precedence_over_category_filter() {
        let cfg = config_from(&[
            ("Categorias", r#"["Lacteos"]"#),
            (
                "CategoriasYSubCategorias",
                r#"[{"Categoria":"Bebidas","SubCategorias":["Gaseosas"]}]"#,
            ),
        ])
        .unwrap();

        match cfg.filters.active() {
            FilterSpec::CategoryWithSubcategories(filters) => {
                assert_eq!(filters.len(), 1);
                assert_eq!(filters[0].category, "Bebidas");
                assert_eq!(filters[0].subcategories, vec!["Gaseosas".to_string()]);
            }
            other => panic!("unexpected mode: {:?}", other),
        }
        assert_eq!(
            cfg.filters.category_only(),
            FilterSpec::CategoryOnly(&["Lacteos".to_string()])
        );
    }

    #[test]
    fn missing_subcategory_list_means_all() {
        let cfg = config_from(&[("CategoriasYSubCategorias", r#"[{"Categoria":"Bebidas"}]"#)])
            .unwrap();
        assert!(cfg.filters.categories_with_subcategories[0].subcategories.is_empty());
    }

    #[test]
    fn malformed_filter_falls_back_to_next_mode() {
        let cfg = config_from(&[
            ("CategoriasYSubCategorias", "not json"),
            ("Categorias", r#"["Lacteos"]"#),
        ])
        .unwrap();
        assert!(matches!(cfg.filters.active(), FilterSpec::CategoryOnly(_)));
    }

    #[test]
    fn invalid_number_is_rejected() {
        let err = config_from(&[("CantidadProductos", "lots")]).unwrap_err();
        assert!(err.to_string().contains("CantidadProductos"));
    }
}
