use crate::core::{ConfigProvider, CriterionService, MutateResult, ReportDownloader};
use crate::domain::model::AdGroupCriterionOperation;
use crate::domain::report::ReportDefinition;
use crate::utils::error::{AdsError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use std::time::Duration;

/// Authorized REST client shared by the keyword and report components.
///
/// Credentials are taken as given; obtaining or refreshing the access token
/// happens outside this crate.
#[derive(Debug, Clone)]
pub struct AdsClient {
    client: Client,
    endpoint: String,
    developer_token: String,
    customer_id: String,
    access_token: String,
}

#[derive(Serialize)]
struct MutateRequest<'a> {
    operations: &'a [AdGroupCriterionOperation],
}

impl AdsClient {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(seconds) = config.timeout_seconds() {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: config.endpoint().trim_end_matches('/').to_string(),
            developer_token: config.developer_token().to_string(),
            customer_id: config.customer_id().replace('-', ""),
            access_token: config.access_token().to_string(),
        })
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    fn resource_url(&self, resource: &str) -> String {
        format!(
            "{}/customers/{}/{}",
            self.endpoint, self.customer_id, resource
        )
    }

    fn post(&self, resource: &str) -> RequestBuilder {
        let url = self.resource_url(resource);
        tracing::debug!("POST {}", url);
        self.client
            .post(url)
            .bearer_auth(&self.access_token)
            .header("developer-token", &self.developer_token)
            .header("client-customer-id", &self.customer_id)
    }

    async fn ensure_success(response: Response) -> Result<Response> {
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if status.is_success() {
            return Ok(response);
        }

        Err(api_error(status.as_u16(), response.text().await))
    }
}

/// Build the error for a non-2xx response. An unreadable body is reported
/// in place of the body text.
fn api_error<E: std::fmt::Display>(status: u16, body: std::result::Result<String, E>) -> AdsError {
    let body = match body {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Could not read body of {} response: {}", status, e);
            format!("<response body unreadable: {}>", e)
        }
    };
    AdsError::ApiError { status, body }
}

#[async_trait]
impl CriterionService for AdsClient {
    async fn mutate(&self, operations: Vec<AdGroupCriterionOperation>) -> Result<MutateResult> {
        let response = self
            .post("adGroupCriteria:mutate")
            .json(&MutateRequest {
                operations: &operations,
            })
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ReportDownloader for AdsClient {
    async fn download_report(&self, definition: &ReportDefinition) -> Result<String> {
        let response = self
            .post("reports:download")
            .json(definition)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        Ok(response.text().await?)
    }
}
