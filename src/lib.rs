pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::{AdsClient, LocalStorage};
pub use crate::config::TomlConfig;
pub use crate::core::keyword::{build_add_operation, KeywordManager};
pub use crate::core::report::{export_report, format_csv, ReportFetcher, ReportState};
pub use crate::domain::model::{BidAmount, KeywordConfig, MatchType, UserStatus};
pub use crate::domain::report::{
    DateRange, FormattedReport, PredefinedRange, ReportConfig, ReportKind,
};
pub use crate::utils::error::{AdsError, Result};
