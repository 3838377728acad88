use crate::core::{CriterionService, MutateResult};
use crate::domain::model::{
    AdGroupCriterionOperation, BiddableAdGroupCriterion, BiddingStrategyConfiguration, Keyword,
    KeywordConfig, Operator, UrlList,
};
use crate::utils::error::{AdsError, Result};

/// Build an `ADD` operation for a biddable keyword criterion.
///
/// Only the ad group id is required; status, final URLs and the CPC bid are
/// attached when present and otherwise left to the platform defaults.
pub fn build_add_operation(config: &KeywordConfig) -> Result<AdGroupCriterionOperation> {
    let ad_group_id = config.ad_group_id.ok_or_else(|| AdsError::ConfigError {
        message: "Ad group ID must be set in the config in order to create a keyword".to_string(),
    })?;

    let operand = BiddableAdGroupCriterion {
        ad_group_id,
        criterion: Keyword {
            text: config.keyword.clone(),
            match_type: config.match_type,
        },
        user_status: config.status,
        final_urls: config
            .final_urls
            .as_ref()
            .map(|urls| UrlList { urls: urls.clone() }),
        bidding_strategy_configuration: config.bid.map(BiddingStrategyConfiguration::from_bid),
    };

    Ok(AdGroupCriterionOperation {
        operand,
        operator: Operator::Add,
    })
}

/// Creates keywords through an injected criterion service.
pub struct KeywordManager<S: CriterionService> {
    service: S,
}

impl<S: CriterionService> KeywordManager<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub async fn create(&self, config: &KeywordConfig) -> Result<MutateResult> {
        let operation = build_add_operation(config)?;
        tracing::debug!(
            "Submitting keyword '{}' for ad group {}",
            operation.operand.criterion.text,
            operation.operand.ad_group_id
        );
        self.service.mutate(vec![operation]).await
    }

    /// All operations are built before anything is submitted, so a bad
    /// config in the batch sends nothing.
    pub async fn create_batch(&self, configs: &[KeywordConfig]) -> Result<MutateResult> {
        if configs.is_empty() {
            return Err(AdsError::ValidationError {
                message: "Keyword batch is empty".to_string(),
            });
        }

        let operations = configs
            .iter()
            .map(build_add_operation)
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!("Submitting batch of {} keyword operations", operations.len());
        self.service.mutate(operations).await
    }
}
