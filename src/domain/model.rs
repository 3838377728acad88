use crate::utils::error::{AdsError, Result};
use bigdecimal::{BigDecimal, ToPrimitive, Zero};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

pub const MICROS_PER_UNIT: i64 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchType {
    Exact,
    Phrase,
    Broad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Enabled,
    Paused,
    Removed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    Add,
    Set,
    Remove,
}

/// A positive currency amount held as integer micros.
///
/// Parsing goes through `BigDecimal`, so "2.50" becomes exactly 2_500_000
/// micros. Amounts with more than six fractional digits are rejected rather
/// than rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BidAmount {
    micros: i64,
}

impl BidAmount {
    pub fn from_micros(micros: i64) -> Result<Self> {
        if micros <= 0 {
            return Err(AdsError::InvalidConfigValueError {
                field: "bid".to_string(),
                value: micros.to_string(),
                reason: "Bid must be greater than zero".to_string(),
            });
        }
        Ok(Self { micros })
    }

    pub fn from_decimal(amount: &BigDecimal) -> Result<Self> {
        let invalid = |reason: &str| AdsError::InvalidConfigValueError {
            field: "bid".to_string(),
            value: amount.to_string(),
            reason: reason.to_string(),
        };

        if amount <= &BigDecimal::zero() {
            return Err(invalid("Bid must be greater than zero"));
        }

        let scaled = amount.clone() * BigDecimal::from(MICROS_PER_UNIT);
        if !scaled.is_integer() {
            return Err(invalid("Bid has more than six fractional digits"));
        }

        let micros = scaled
            .to_i64()
            .ok_or_else(|| invalid("Bid is too large to express in micros"))?;
        Ok(Self { micros })
    }

    pub fn micros(&self) -> i64 {
        self.micros
    }
}

impl FromStr for BidAmount {
    type Err = AdsError;

    fn from_str(s: &str) -> Result<Self> {
        let amount =
            BigDecimal::from_str(s.trim()).map_err(|e| AdsError::InvalidConfigValueError {
                field: "bid".to_string(),
                value: s.to_string(),
                reason: format!("Not a decimal amount: {}", e),
            })?;
        Self::from_decimal(&amount)
    }
}

impl<'de> Deserialize<'de> for BidAmount {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawBid {
            Int(i64),
            Float(f64),
            Text(String),
        }

        // f64's Display is the shortest round-trip form, so 2.5 parses as "2.5"
        let text = match RawBid::deserialize(deserializer)? {
            RawBid::Int(v) => v.to_string(),
            RawBid::Float(v) => v.to_string(),
            RawBid::Text(v) => v,
        };
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KeywordConfig {
    pub keyword: String,
    pub match_type: MatchType,
    #[serde(default)]
    pub ad_group_id: Option<i64>,
    #[serde(default)]
    pub status: Option<UserStatus>,
    #[serde(default)]
    pub final_urls: Option<Vec<String>>,
    #[serde(default)]
    pub bid: Option<BidAmount>,
}

impl KeywordConfig {
    pub fn new(keyword: impl Into<String>, match_type: MatchType) -> Self {
        Self {
            keyword: keyword.into(),
            match_type,
            ad_group_id: None,
            status: None,
            final_urls: None,
            bid: None,
        }
    }

    pub fn with_ad_group_id(mut self, ad_group_id: i64) -> Self {
        self.ad_group_id = Some(ad_group_id);
        self
    }

    pub fn with_status(mut self, status: UserStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_final_urls(mut self, urls: Vec<String>) -> Self {
        self.final_urls = Some(urls);
        self
    }

    pub fn with_bid(mut self, bid: BidAmount) -> Self {
        self.bid = Some(bid);
        self
    }
}

// Wire types below mirror the criterion service's JSON shapes.

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyword {
    pub text: String,
    pub match_type: MatchType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub micro_amount: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpcBid {
    pub bid: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiddingStrategyConfiguration {
    pub bids: Vec<CpcBid>,
}

impl BiddingStrategyConfiguration {
    pub fn from_bid(bid: BidAmount) -> Self {
        Self {
            bids: vec![CpcBid {
                bid: Money {
                    micro_amount: bid.micros(),
                },
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlList {
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiddableAdGroupCriterion {
    pub ad_group_id: i64,
    pub criterion: Keyword,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_status: Option<UserStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_urls: Option<UrlList>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bidding_strategy_configuration: Option<BiddingStrategyConfiguration>,
}

impl BiddableAdGroupCriterion {
    /// Micro amount of the first CPC bid, if one is attached.
    pub fn cpc_bid_micros(&self) -> Option<i64> {
        self.bidding_strategy_configuration
            .as_ref()
            .and_then(|config| config.bids.first())
            .map(|bid| bid.bid.micro_amount)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdGroupCriterionOperation {
    pub operand: BiddableAdGroupCriterion,
    pub operator: Operator,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutateResult {
    #[serde(default)]
    pub value: Vec<serde_json::Value>,
    #[serde(default)]
    pub partial_failure_errors: Vec<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bid_amount_exact_micros() {
        assert_eq!("2.50".parse::<BidAmount>().unwrap().micros(), 2_500_000);
        assert_eq!("0.29".parse::<BidAmount>().unwrap().micros(), 290_000);
        assert_eq!("3".parse::<BidAmount>().unwrap().micros(), 3_000_000);
        assert_eq!("0.000001".parse::<BidAmount>().unwrap().micros(), 1);
        assert_eq!(
            "123456.789012".parse::<BidAmount>().unwrap().micros(),
            123_456_789_012
        );
    }

    #[test]
    fn test_bid_amount_rejects_invalid_values() {
        assert!("0".parse::<BidAmount>().is_err());
        assert!("-1.5".parse::<BidAmount>().is_err());
        assert!("0.0000001".parse::<BidAmount>().is_err());
        assert!("abc".parse::<BidAmount>().is_err());
        assert!(BidAmount::from_micros(0).is_err());
    }

    #[test]
    fn test_bid_amount_deserializes_numbers_and_strings() {
        #[derive(Deserialize)]
        struct Holder {
            bid: BidAmount,
        }

        let from_float: Holder = serde_json::from_str(r#"{"bid": 0.29}"#).unwrap();
        assert_eq!(from_float.bid.micros(), 290_000);

        let from_int: Holder = serde_json::from_str(r#"{"bid": 2}"#).unwrap();
        assert_eq!(from_int.bid.micros(), 2_000_000);

        let from_text: Holder = serde_json::from_str(r#"{"bid": "1.75"}"#).unwrap();
        assert_eq!(from_text.bid.micros(), 1_750_000);

        assert!(serde_json::from_str::<Holder>(r#"{"bid": -1}"#).is_err());
    }

    #[test]
    fn test_operation_wire_shape() {
        let operation = AdGroupCriterionOperation {
            operand: BiddableAdGroupCriterion {
                ad_group_id: 555,
                criterion: Keyword {
                    text: "running shoes".to_string(),
                    match_type: MatchType::Exact,
                },
                user_status: None,
                final_urls: None,
                bidding_strategy_configuration: Some(BiddingStrategyConfiguration::from_bid(
                    BidAmount::from_micros(2_500_000).unwrap(),
                )),
            },
            operator: Operator::Add,
        };

        let json = serde_json::to_value(&operation).unwrap();
        assert_eq!(json["operator"], "ADD");
        assert_eq!(json["operand"]["adGroupId"], 555);
        assert_eq!(json["operand"]["criterion"]["matchType"], "EXACT");
        assert_eq!(
            json["operand"]["biddingStrategyConfiguration"]["bids"][0]["bid"]["microAmount"],
            2_500_000
        );
        assert!(json["operand"].get("userStatus").is_none());
    }
}
