use crate::domain::model::{AdGroupCriterionOperation, MutateResult};
use crate::domain::report::ReportDefinition;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Connection settings for an already-authorized API session.
pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn developer_token(&self) -> &str;
    fn customer_id(&self) -> &str;
    fn access_token(&self) -> &str;
    fn timeout_seconds(&self) -> Option<u64>;
}

/// Criterion-management endpoint.
#[async_trait]
pub trait CriterionService: Send + Sync {
    async fn mutate(&self, operations: Vec<AdGroupCriterionOperation>) -> Result<MutateResult>;
}

/// Reporting endpoint. Returns the raw CSV body.
#[async_trait]
pub trait ReportDownloader: Send + Sync {
    async fn download_report(&self, definition: &ReportDefinition) -> Result<String>;
}
