//! CommerceClient — HTTP client for the external commerce API

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use shared::external::{CatalogItemUpdate, CatalogObject, InventoryCount, InventorySet};

use super::{CommerceApi, CommerceError};
use async_trait::async_trait;

/// reqwest-backed implementation of [`CommerceApi`]
pub struct CommerceClient {
    client: Client,
    base_url: String,
    access_token: String,
}

#[derive(Deserialize)]
struct ListCatalogResponse {
    #[serde(default)]
    objects: Vec<CatalogObject>,
}

#[derive(Deserialize)]
struct GetObjectResponse {
    object: CatalogObject,
}

#[derive(Deserialize)]
struct UpdateItemResponse {
    version: i64,
}

#[derive(Deserialize)]
struct BatchCountsResponse {
    #[serde(default)]
    counts: Vec<InventoryCount>,
}

#[derive(Deserialize)]
struct UploadImageResponse {
    url: String,
}

impl CommerceClient {
    pub fn new(base_url: String, access_token: String) -> Result<Self, CommerceError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url,
            access_token,
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{path}", self.base_url))
            .bearer_auth(&self.access_token)
    }

    /// Turn non-success statuses into [`CommerceError::Api`]
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, CommerceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(CommerceError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl CommerceApi for CommerceClient {
    async fn list_catalog_items(&self) -> Result<Vec<CatalogObject>, CommerceError> {
        let response = self
            .request(reqwest::Method::GET, "/v2/catalog/list")
            .query(&[("types", "ITEM")])
            .send()
            .await?;

        let parsed: ListCatalogResponse = Self::check(response).await?.json().await?;
        Ok(parsed.objects)
    }

    async fn get_catalog_item(&self, id: &str) -> Result<Option<CatalogObject>, CommerceError> {
        let response = self
            .request(reqwest::Method::GET, &format!("/v2/catalog/object/{id}"))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let parsed: GetObjectResponse = Self::check(response).await?.json().await?;
        Ok(Some(parsed.object))
    }

    async fn update_catalog_item(&self, update: &CatalogItemUpdate) -> Result<i64, CommerceError> {
        let response = self
            .request(
                reqwest::Method::POST,
                &format!("/v2/catalog/items/{}/price", update.item_id),
            )
            .json(update)
            .send()
            .await?;

        if response.status() == StatusCode::CONFLICT {
            return Err(CommerceError::VersionConflict {
                item_id: update.item_id.clone(),
            });
        }

        let parsed: UpdateItemResponse = Self::check(response).await?.json().await?;
        Ok(parsed.version)
    }

    async fn get_inventory_counts(
        &self,
        variation_ids: &[String],
        location_id: &str,
    ) -> Result<Vec<InventoryCount>, CommerceError> {
        let response = self
            .request(reqwest::Method::POST, "/v2/inventory/batch-retrieve-counts")
            .json(&serde_json::json!({
                "catalog_object_ids": variation_ids,
                "location_ids": [location_id],
            }))
            .send()
            .await?;

        let parsed: BatchCountsResponse = Self::check(response).await?.json().await?;
        Ok(parsed.counts)
    }

    async fn set_inventory_quantity(&self, set: &InventorySet) -> Result<(), CommerceError> {
        let response = self
            .request(reqwest::Method::POST, "/v2/inventory/physical-count")
            .json(&serde_json::json!({
                "catalog_object_id": set.variation_id,
                "location_id": set.location_id,
                "quantity": set.quantity.to_string(),
            }))
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    async fn upload_item_image(
        &self,
        item_id: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<String, CommerceError> {
        let response = self
            .request(
                reqwest::Method::POST,
                &format!("/v2/catalog/items/{item_id}/image"),
            )
            .query(&[("filename", filename)])
            .header("content-type", "application/octet-stream")
            .body(bytes)
            .send()
            .await?;

        let parsed: UploadImageResponse = Self::check(response).await?.json().await?;
        Ok(parsed.url)
    }
}
