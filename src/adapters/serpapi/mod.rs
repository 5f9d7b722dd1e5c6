pub mod parse;

use crate::config::SerpApiConfig;
use crate::domain::model::{BusinessProfile, ReviewPage, ReviewPageRequest};
use crate::domain::ports::{ReviewSource, SearchSource};
use crate::utils::error::{AuditError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

const SEARCH_ENGINE: &str = "google";
const REVIEWS_ENGINE: &str = "google_maps_reviews";

/// HTTP client for the SerpApi search endpoint.
///
/// Cloning is cheap and shares the underlying connection pool.
#[derive(Clone)]
pub struct SerpApiClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl SerpApiClient {
    pub fn new(config: &SerpApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }

    async fn get_json(&self, params: &[(&str, &str)]) -> Result<Value> {
        tracing::debug!("SerpApi request to {} with {:?}", self.endpoint, params);

        let response = self
            .client
            .get(&self.endpoint)
            .query(params)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("SerpApi response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|value| parse::api_error_message(&value).map(str::to_string))
                .unwrap_or(body);
            return Err(AuditError::ApiStatusError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl ReviewSource for SerpApiClient {
    async fn fetch_page(&self, request: &ReviewPageRequest) -> Result<ReviewPage> {
        let mut params = vec![
            ("engine", REVIEWS_ENGINE),
            ("place_id", request.place_id.as_str()),
            ("hl", request.locale.as_str()),
            ("sort_by", request.sort_order.as_str()),
        ];
        if let Some(token) = &request.continuation_token {
            params.push(("next_page_token", token.as_str()));
        }

        let body = self.get_json(&params).await?;
        if let Some(message) = parse::api_error_message(&body) {
            // 沒有評論時 SerpApi 也會回傳 error 欄位
            tracing::warn!("⚠️ Review page for {} reported: {}", request.place_id, message);
        }

        Ok(parse::parse_review_page(&body))
    }
}

#[async_trait]
impl SearchSource for SerpApiClient {
    async fn search(&self, query: &str) -> Result<BusinessProfile> {
        let body = self.get_json(&[("engine", SEARCH_ENGINE), ("q", query)]).await?;
        if let Some(message) = parse::api_error_message(&body) {
            tracing::warn!("⚠️ Search for '{}' reported: {}", query, message);
        }

        Ok(parse::parse_business_profile(&body))
    }
}
