use crate::core::ConfigProvider;
use crate::domain::model::KeywordConfig;
use crate::domain::report::{DateRange, Predicate, PredefinedRange, ReportConfig, ReportKind};
use crate::utils::error::{AdsError, Result};
use crate::utils::validation::{self, Validate};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const OUTPUT_FORMATS: [&str; 2] = ["json", "csv"];

#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    pub client: ClientConfig,
    pub report: Option<ReportSection>,
    pub output: Option<OutputConfig>,
    #[serde(default)]
    pub keywords: Vec<KeywordConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub endpoint: String,
    pub developer_token: String,
    pub customer_id: String,
    pub access_token: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSection {
    pub kind: ReportKind,
    pub date_range: Option<PredefinedRange>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub predicates: Vec<Predicate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub format: Option<String>,
}

impl TomlConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AdsError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AdsError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` placeholders with environment values; unset
    /// variables are left as-is so validation can report them.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AdsError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("client.endpoint", &self.client.endpoint)?;
        validation::validate_non_empty_string("client.developer_token", &self.client.developer_token)?;
        validation::validate_non_empty_string("client.customer_id", &self.client.customer_id)?;
        validation::validate_non_empty_string("client.access_token", &self.client.access_token)?;

        for (field, value) in [
            ("client.developer_token", &self.client.developer_token),
            ("client.access_token", &self.client.access_token),
        ] {
            if value.starts_with("${") {
                return Err(AdsError::ConfigValidationError {
                    field: field.to_string(),
                    message: format!("environment variable {} is not set", value),
                });
            }
        }

        if let Some(report) = &self.report {
            report.to_report_config()?;
        }

        if let Some(output) = &self.output {
            validation::validate_path("output.path", &output.path)?;
            validation::validate_one_of("output.format", output.format(), &OUTPUT_FORMATS)?;
        }

        Ok(())
    }

    pub fn report_section(&self) -> Result<&ReportSection> {
        validation::validate_required_field("report", &self.report)
    }

    pub fn output_path(&self) -> &str {
        self.output.as_ref().map(|o| o.path.as_str()).unwrap_or("./output")
    }

    pub fn output_format(&self) -> &str {
        self.output.as_ref().map(OutputConfig::format).unwrap_or("json")
    }
}

impl ReportSection {
    /// Resolve the date settings: either a predefined range or a
    /// `start_date`/`end_date` pair, never both.
    pub fn to_report_config(&self) -> Result<ReportConfig> {
        let date_range = match (self.start_date, self.end_date, self.date_range) {
            (Some(_), Some(_), Some(_)) => {
                return Err(AdsError::ConfigValidationError {
                    field: "report.date_range".to_string(),
                    message: "use either date_range or start_date/end_date".to_string(),
                })
            }
            (Some(start), end, None) => {
                let end = *validation::validate_required_field("report.end_date", &end)?;
                DateRange::Custom { start, end }
            }
            (None, Some(_), _) => {
                return Err(AdsError::MissingConfigError {
                    field: "report.start_date".to_string(),
                })
            }
            (Some(_), None, Some(_)) => {
                return Err(AdsError::ConfigValidationError {
                    field: "report.date_range".to_string(),
                    message: "use either date_range or start_date/end_date".to_string(),
                })
            }
            (None, None, Some(range)) => DateRange::Predefined(range),
            (None, None, None) => DateRange::default(),
        };

        if !date_range.is_valid() {
            return Err(AdsError::InvalidConfigValueError {
                field: "report.start_date".to_string(),
                value: date_range.custom_range().unwrap_or_default(),
                reason: "start_date must not be after end_date".to_string(),
            });
        }

        Ok(ReportConfig {
            date_range,
            fields: self.fields.clone(),
            predicates: self.predicates.clone(),
        })
    }
}

impl OutputConfig {
    pub fn format(&self) -> &str {
        self.format.as_deref().unwrap_or("json")
    }
}

impl ConfigProvider for ClientConfig {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn developer_token(&self) -> &str {
        &self.developer_token
    }

    fn customer_id(&self) -> &str {
        &self.customer_id
    }

    fn access_token(&self) -> &str {
        &self.access_token
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
