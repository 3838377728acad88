use chrono::NaiveDate;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Report types this crate knows how to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    CampaignPerformance,
    AdGroupPerformance,
    KeywordsPerformance,
}

impl ReportKind {
    pub fn report_type(&self) -> &'static str {
        match self {
            ReportKind::CampaignPerformance => "CAMPAIGN_PERFORMANCE_REPORT",
            ReportKind::AdGroupPerformance => "ADGROUP_PERFORMANCE_REPORT",
            ReportKind::KeywordsPerformance => "KEYWORDS_PERFORMANCE_REPORT",
        }
    }

    pub fn default_fields(&self) -> &'static [&'static str] {
        match self {
            ReportKind::CampaignPerformance => &[
                "CampaignId",
                "CampaignName",
                "Impressions",
                "Clicks",
                "Cost",
            ],
            ReportKind::AdGroupPerformance => &[
                "CampaignId",
                "AdGroupId",
                "AdGroupName",
                "Impressions",
                "Clicks",
                "Cost",
            ],
            ReportKind::KeywordsPerformance => &[
                "AdGroupId",
                "Id",
                "Criteria",
                "KeywordMatchType",
                "Impressions",
                "Clicks",
                "Cost",
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PredefinedRange {
    Today,
    Yesterday,
    #[serde(rename = "LAST_7_DAYS")]
    Last7Days,
    #[serde(rename = "LAST_30_DAYS")]
    Last30Days,
    ThisMonth,
    LastMonth,
    AllTime,
}

impl PredefinedRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredefinedRange::Today => "TODAY",
            PredefinedRange::Yesterday => "YESTERDAY",
            PredefinedRange::Last7Days => "LAST_7_DAYS",
            PredefinedRange::Last30Days => "LAST_30_DAYS",
            PredefinedRange::ThisMonth => "THIS_MONTH",
            PredefinedRange::LastMonth => "LAST_MONTH",
            PredefinedRange::AllTime => "ALL_TIME",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    Predefined(PredefinedRange),
    Custom { start: NaiveDate, end: NaiveDate },
}

impl DateRange {
    pub fn date_range_type(&self) -> &'static str {
        match self {
            DateRange::Predefined(range) => range.as_str(),
            DateRange::Custom { .. } => "CUSTOM_DATE",
        }
    }

    /// `YYYYMMDD,YYYYMMDD` for custom ranges, `None` otherwise.
    pub fn custom_range(&self) -> Option<String> {
        match self {
            DateRange::Predefined(_) => None,
            DateRange::Custom { start, end } => Some(format!(
                "{},{}",
                start.format("%Y%m%d"),
                end.format("%Y%m%d")
            )),
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            DateRange::Predefined(_) => true,
            DateRange::Custom { start, end } => start <= end,
        }
    }
}

impl Default for DateRange {
    fn default() -> Self {
        DateRange::Predefined(PredefinedRange::Last7Days)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PredicateOperator {
    Equals,
    NotEquals,
    In,
    NotIn,
    GreaterThan,
    LessThan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    pub field: String,
    pub operator: PredicateOperator,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportConfig {
    pub date_range: DateRange,
    pub fields: Vec<String>,
    pub predicates: Vec<Predicate>,
}

impl ReportConfig {
    pub fn new(date_range: DateRange) -> Self {
        Self {
            date_range,
            ..Self::default()
        }
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }
}

/// Request body for the reporting endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDefinition {
    pub report_name: String,
    pub report_type: String,
    pub date_range_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<String>,
    pub fields: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub predicates: Vec<Predicate>,
    pub download_format: String,
}

impl ReportDefinition {
    pub fn new(kind: ReportKind, config: &ReportConfig) -> Self {
        let fields = if config.fields.is_empty() {
            kind.default_fields().iter().map(|f| f.to_string()).collect()
        } else {
            config.fields.clone()
        };

        Self {
            report_name: format!(
                "{} #{}",
                kind.report_type(),
                chrono::Utc::now().format("%Y%m%d%H%M%S")
            ),
            report_type: kind.report_type().to_string(),
            date_range_type: config.date_range.date_range_type().to_string(),
            date_range: config.date_range.custom_range(),
            fields,
            predicates: config.predicates.clone(),
            download_format: "CSV".to_string(),
        }
    }
}

/// One report row: column name to cell value, in the report's column order.
///
/// Serializes as a flat JSON object whose keys follow that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    cells: Vec<(String, String)>,
}

impl Record {
    pub fn new(cells: Vec<(String, String)>) -> Self {
        Self { cells }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, value) in &self.cells {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of column names to cell values")
            }

            fn visit_map<A>(self, mut access: A) -> std::result::Result<Record, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut cells = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, value)) = access.next_entry::<String, String>()? {
                    cells.push((name, value));
                }
                Ok(Record { cells })
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedReport {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

impl FormattedReport {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
