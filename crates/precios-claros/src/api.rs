//! Precios Claros API client.
//!
//! One logical page request per call: the caller supplies `limit`/`offset`,
//! the response carries the authoritative `total` plus a page of records.
//! Transport retries happen here; a response missing its records field is
//! a schema error and is never retried.

use std::time::Duration;

use precios_core::{FetchError, SHARED_RUNTIME, http_client};

use crate::items::{ApiProduct, StoreRecord};

const API_MAX_RETRIES: u32 = 5;
const API_BASE_DELAY: Duration = Duration::from_secs(2);

/// Page size for the store listing.
pub const LIMIT_STORES: usize = 30;
/// Page size for a store's nested product listing.
pub const LIMIT_PRODUCTS: usize = 50;
/// Page size for the category-scoped catalog listing.
pub const LIMIT_CATEGORY: usize = 100;

/// Static request configuration. Every request carries the API key,
/// referer and user-agent headers — fixed values, not computed.
#[derive(Clone, Debug)]
pub struct ApiSettings {
    pub base_url: String,
    pub api_key: String,
    pub referer: String,
    pub user_agent: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://d3e6htiiul5ek9.cloudfront.net/prod".to_string(),
            api_key: "zIgFou7Gta7g87VFGL9dZ4BEEs19gNYS1SOQZt96".to_string(),
            referer: "https://www.preciosclaros.gob.ar".to_string(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/77.0.3865.90 Safari/537.36"
                .to_string(),
        }
    }
}

/// One page of the store listing.
#[derive(Debug)]
pub struct StoresPage {
    pub total: usize,
    pub records: Vec<StoreRecord>,
}

/// One page of a nested (or category-scoped) product listing.
#[derive(Debug)]
pub struct ProductsPage {
    pub total: usize,
    pub records: Vec<ApiProduct>,
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    settings: ApiSettings,
}

impl ApiClient {
    pub fn new(settings: ApiSettings) -> Self {
        Self { settings }
    }

    /// Fetch one store listing page. `offset = None` is the first page,
    /// used to learn the total before any offsets are enumerable.
    pub fn stores_page(&self, offset: Option<usize>) -> Result<StoresPage, FetchError> {
        let mut url = format!(
            "{}/sucursales?limit={LIMIT_STORES}",
            self.settings.base_url
        );
        if let Some(offset) = offset {
            url.push_str(&format!("&offset={offset}"));
        }
        let body = self.get_with_retry(&url)?;
        parse_stores_page(&body)
    }

    /// Fetch one page of a store's nested product listing.
    pub fn products_page(
        &self,
        store_id: &str,
        offset: Option<usize>,
    ) -> Result<ProductsPage, FetchError> {
        let mut url = format!(
            "{}/productos?limit={LIMIT_PRODUCTS}&id_sucursal={store_id}",
            self.settings.base_url
        );
        if let Some(offset) = offset {
            url.push_str(&format!("&offset={offset}"));
        }
        let body = self.get_with_retry(&url)?;
        parse_products_page(&body)
    }

    /// Fetch one category-scoped catalog page over a fixed store sample.
    /// `category_code` goes on the wire without its dashes.
    pub fn category_page(
        &self,
        store_sample: &str,
        category_code: &str,
        offset: Option<usize>,
    ) -> Result<ProductsPage, FetchError> {
        let mut url = format!(
            "{}/productos?array_sucursales={store_sample}&limit={LIMIT_CATEGORY}\
             &sort=-cant_sucursales_disponible&id_categoria={}",
            self.settings.base_url,
            category_code.replace('-', ""),
        );
        if let Some(offset) = offset {
            url.push_str(&format!("&offset={offset}"));
        }
        let body = self.get_with_retry(&url)?;
        parse_products_page(&body)
    }

    /// HTTP GET with retry for rate limit (429), server errors (5xx) and
    /// plain transport failures. Exponential backoff between attempts.
    fn get_with_retry(&self, url: &str) -> Result<String, FetchError> {
        for attempt in 0..API_MAX_RETRIES {
            let result: Result<String, reqwest::Error> =
                SHARED_RUNTIME.handle().block_on(async {
                    let resp = http_client()
                        .get(url)
                        .header("x-api-key", &self.settings.api_key)
                        .header("referer", &self.settings.referer)
                        .header("user-agent", &self.settings.user_agent)
                        .header("sec-fetch-mode", "cors")
                        .send()
                        .await?
                        .error_for_status()?;
                    resp.text().await
                });

            match result {
                Ok(text) => return Ok(text),
                Err(e) => {
                    let err = FetchError::from_reqwest(&e);
                    if err.is_retryable() && attempt < API_MAX_RETRIES - 1 {
                        let delay = API_BASE_DELAY * 2u32.pow(attempt);
                        log::warn!(
                            "page request failed ({err}), retry {}/{} in {delay:?}",
                            attempt + 1,
                            API_MAX_RETRIES
                        );
                        std::thread::sleep(delay);
                    } else {
                        return Err(err);
                    }
                }
            }
        }
        Err(FetchError::Http {
            status: None,
            message: format!("request failed after {API_MAX_RETRIES} retries"),
        })
    }
}

fn parse_stores_page(body: &str) -> Result<StoresPage, FetchError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|_| FetchError::schema("json", body))?;
    let total = read_total(&value, body)?;
    let records = value
        .get("sucursales")
        .ok_or_else(|| FetchError::schema("sucursales", body))?;
    let records: Vec<StoreRecord> = serde_json::from_value(records.clone())
        .map_err(|_| FetchError::schema("sucursales", body))?;
    Ok(StoresPage { total, records })
}

fn parse_products_page(body: &str) -> Result<ProductsPage, FetchError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|_| FetchError::schema("json", body))?;
    let total = read_total(&value, body)?;
    let records = value
        .get("productos")
        .ok_or_else(|| FetchError::schema("productos", body))?;
    let records: Vec<ApiProduct> = serde_json::from_value(records.clone())
        .map_err(|_| FetchError::schema("productos", body))?;
    Ok(ProductsPage { total, records })
}

fn read_total(value: &serde_json::Value, body: &str) -> Result<usize, FetchError> {
    value
        .get("total")
        .and_then(|v| v.as_u64())
        .map(|v| v as usize)
        .ok_or_else(|| FetchError::schema("total", body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_stores_page_ok() {
        let body = r#"{
            "total": 2,
            "sucursales": [
                {"id": "15-1-1", "comercioId": 15, "banderaId": 1, "provincia": "AR-B"},
                {"id": "15-1-2", "comercioId": 15, "banderaId": 1, "provincia": "AR-S"}
            ]
        }"#;
        let page = parse_stores_page(body).unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.records[1].provincia, "AR-S");
    }

    #[test]
    fn parse_stores_page_missing_records_preserves_body() {
        let body = r#"{"total": 5, "mensaje": "rate limited"}"#;
        match parse_stores_page(body) {
            Err(FetchError::Schema { field, body: kept }) => {
                assert_eq!(field, "sucursales");
                assert!(kept.contains("rate limited"));
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn parse_products_page_ok() {
        let body = r#"{
            "total": 1,
            "productos": [
                {"id": "779", "marca": "M", "nombre": "N", "presentacion": "1 kg",
                 "precio": 100.0, "precioMax": 120.0, "precioMin": 90.0}
            ]
        }"#;
        let page = parse_products_page(body).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.records[0].precio, Some(100.0));
    }

    #[test]
    fn parse_products_page_missing_total() {
        let body = r#"{"productos": []}"#;
        assert!(matches!(
            parse_products_page(body),
            Err(FetchError::Schema { field: "total", .. })
        ));
    }

    #[test]
    fn parse_rejects_non_json() {
        assert!(matches!(
            parse_products_page("<html>504</html>"),
            Err(FetchError::Schema { field: "json", .. })
        ));
    }
}
