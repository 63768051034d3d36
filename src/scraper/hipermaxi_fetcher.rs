use crate::config::UpstreamConfig;
use crate::model::{ProductQuery, UpstreamError};
use crate::parser::hipermaxi_parser::{flatten_departments, parse_products, parse_taxonomy};
use crate::parser::{RawCategoryNode, RawProduct};
use crate::scraper::traits::UpstreamClient;

use reqwest::Client;
use std::time::Duration;
use tracing::debug;

pub struct HipermaxiClient {
    client: Client,
    config: UpstreamConfig,
}

impl HipermaxiClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) PreciosSniperBot/0.1")
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn product_params(&self, query: &ProductQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("IdMarket", self.config.market_id.clone()),
            ("IdLocatario", self.config.branch_id.clone()),
            ("IdCategoria", query.category_id.to_string()),
        ];
        if let Some(sub_id) = query.sub_category_id {
            params.push(("IdsSubcategoria[0]", sub_id.to_string()));
        }
        params.push(("Pagina", "1".to_string()));
        params.push(("Cantidad", self.config.page_size.to_string()));
        params
    }

    async fn get_text(&self, url: &str, params: &[(&str, String)]) -> Result<String, UpstreamError> {
        debug!("GET {} {:?}", url, params);
        let response = self.client.get(url).query(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

#[async_trait::async_trait]
impl UpstreamClient for HipermaxiClient {
    async fn fetch_taxonomy(&self) -> Result<Vec<RawCategoryNode>, UpstreamError> {
        let url = self.build_url("markets/clasificaciones");
        let params = [
            ("IdMarket", self.config.market_id.clone()),
            ("IdSucursal", self.config.branch_id.clone()),
        ];
        let body = self.get_text(&url, &params).await?;
        let departments = parse_taxonomy(&body)?.into_data()?;
        Ok(flatten_departments(departments))
    }

    async fn fetch_products(&self, query: &ProductQuery) -> Result<Vec<RawProduct>, UpstreamError> {
        let url = self.build_url("public/productos");
        let body = self.get_text(&url, &self.product_params(query)).await?;
        parse_products(&body)?.into_data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> HipermaxiClient {
        HipermaxiClient::new(&UpstreamConfig {
            base_url: base_url.to_string(),
            market_id: "85".into(),
            branch_id: "92".into(),
            page_size: 500,
            request_timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn url_joins_without_double_slash() {
        assert_eq!(
            client("https://example.test/api/").build_url("public/productos"),
            "https://example.test/api/public/productos"
        );
        assert_eq!(
            client("https://example.test/api").build_url("markets/clasificaciones"),
            "https://example.test/api/markets/clasificaciones"
        );
    }

    #[test]
    fn subcategory_query_adds_subcategory_param() {
        let c = client("https://example.test");
        let category = c.product_params(&ProductQuery { category_id: 7, sub_category_id: None });
        assert!(!category.iter().any(|(k, _)| *k == "IdsSubcategoria[0]"));
        assert!(category.contains(&("IdLocatario", "92".to_string())));
        assert!(category.contains(&("Cantidad", "500".to_string())));

        let sub = c.product_params(&ProductQuery { category_id: 7, sub_category_id: Some(70) });
        assert!(sub.contains(&("IdsSubcategoria[0]", "70".to_string())));
        assert!(sub.contains(&("Pagina", "1".to_string())));
    }
}
