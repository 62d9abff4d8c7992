// HTTP client for the external reporting service
use crate::application::record_repository::RecordRepository;
use crate::domain::record::MonthlyRecord;
use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportingError {
    #[error("reporting service request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("reporting service returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

#[derive(Debug, Clone)]
pub struct ReportingClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct CabinetListResponse {
    cabinets: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PraticienListResponse {
    praticiens: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RecordListResponse {
    records: Vec<MonthlyRecord>,
}

impl ReportingClient {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ReportingError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {} {:?}", url, query);

        let mut request = self.client.get(&url).query(query);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ReportingError::Status { status, body });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl RecordRepository for ReportingClient {
    async fn list_cabinet_ids(&self) -> anyhow::Result<Vec<String>> {
        let response: CabinetListResponse = self
            .get_json("/cabinets", &[])
            .await
            .context("Failed to list cabinets from reporting service")?;
        Ok(response.cabinets)
    }

    async fn list_praticiens(&self, cabinet_id: &str) -> anyhow::Result<Vec<String>> {
        let response: PraticienListResponse = self
            .get_json(&format!("/cabinets/{cabinet_id}/praticiens"), &[])
            .await
            .with_context(|| format!("Failed to list praticiens for cabinet {cabinet_id}"))?;
        Ok(response.praticiens)
    }

    async fn fetch_monthly_records(
        &self,
        cabinet_id: &str,
        months: u32,
    ) -> anyhow::Result<Vec<MonthlyRecord>> {
        let response: RecordListResponse = self
            .get_json(
                &format!("/cabinets/{cabinet_id}/records"),
                &[("months", months.to_string())],
            )
            .await
            .with_context(|| format!("Failed to fetch records for cabinet {cabinet_id}"))?;

        tracing::debug!(
            "Fetched {} monthly records for cabinet {}",
            response.records.len(),
            cabinet_id
        );
        Ok(response.records)
    }
}
