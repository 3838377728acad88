pub mod keyword;
pub mod report;

pub use crate::domain::model::{AdGroupCriterionOperation, KeywordConfig, MutateResult};
pub use crate::domain::ports::{ConfigProvider, CriterionService, ReportDownloader, Storage};
pub use crate::domain::report::{FormattedReport, Record, ReportConfig, ReportKind};
pub use crate::utils::error::Result;
