use anyhow::Result;
use easy_adwords::utils::validation::Validate;
use easy_adwords::{AdsClient, AdsError, KeywordConfig, KeywordManager, MatchType, TomlConfig};
use httpmock::prelude::*;

fn config_for(endpoint: &str) -> Result<TomlConfig> {
    let content = format!(
        r#"
[client]
endpoint = "{}"
developer_token = "dev-token"
customer_id = "1234567890"
access_token = "access-token"

[[keywords]]
keyword = "running shoes"
match_type = "EXACT"
ad_group_id = 555
bid = 2.50

[[keywords]]
keyword = "trail shoes"
match_type = "PHRASE"
ad_group_id = 555
status = "PAUSED"
final_urls = ["https://shop.example.com/trail"]
"#,
        endpoint
    );
    let config = TomlConfig::from_toml_str(&content)?;
    config.validate()?;
    Ok(config)
}

#[tokio::test]
async fn test_keyword_batch_end_to_end() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/customers/1234567890/adGroupCriteria:mutate")
            .header("authorization", "Bearer access-token")
            .body_contains("\"text\":\"running shoes\"")
            .body_contains("\"microAmount\":2500000")
            .body_contains("\"userStatus\":\"PAUSED\"")
            .body_contains("\"finalUrls\":{\"urls\":[\"https://shop.example.com/trail\"]}");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "value": [{ "criterionId": 1 }, { "criterionId": 2 }]
            }));
    });

    let config = config_for(&server.base_url())?;
    let manager = KeywordManager::new(AdsClient::new(&config.client)?);
    let result = manager.create_batch(&config.keywords).await?;

    api_mock.assert();
    assert_eq!(result.value.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_missing_ad_group_never_reaches_the_api() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST);
        then.status(200).json_body(serde_json::json!({ "value": [] }));
    });

    let config = config_for(&server.base_url())?;
    let manager = KeywordManager::new(AdsClient::new(&config.client)?);

    let err = manager
        .create(&KeywordConfig::new("orphan keyword", MatchType::Broad))
        .await
        .err()
        .expect("missing ad group id must fail");

    assert!(matches!(err, AdsError::ConfigError { .. }));
    api_mock.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_api_rejection_passes_through_unchanged() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/customers/1234567890/adGroupCriteria:mutate");
        then.status(400).body("INVALID_KEYWORD_TEXT");
    });

    let config = config_for(&server.base_url())?;
    let manager = KeywordManager::new(AdsClient::new(&config.client)?);

    match manager.create(&config.keywords[0]).await {
        Err(AdsError::ApiError { status, body }) => {
            assert_eq!(status, 400);
            assert_eq!(body, "INVALID_KEYWORD_TEXT");
        }
        other => panic!("unexpected result: {:?}", other),
    }
    api_mock.assert_hits(1);
    Ok(())
}
