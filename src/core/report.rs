use crate::core::{ReportDownloader, Storage};
use crate::domain::report::{FormattedReport, Record, ReportConfig, ReportDefinition, ReportKind};
use crate::utils::error::{AdsError, Result};
use std::collections::HashSet;

/// Lifecycle of a single report cycle. There is no way back to an earlier state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportState {
    Unfetched,
    RawAvailable { raw: String },
    Formatted { raw: String, report: FormattedReport },
}

impl ReportState {
    fn name(&self) -> &'static str {
        match self {
            ReportState::Unfetched => "unfetched",
            ReportState::RawAvailable { .. } => "raw available",
            ReportState::Formatted { .. } => "formatted",
        }
    }
}

#[derive(Debug)]
pub struct ReportFetcher<D: ReportDownloader> {
    kind: ReportKind,
    config: ReportConfig,
    downloader: D,
    state: ReportState,
}

impl<D: ReportDownloader> ReportFetcher<D> {
    pub fn new(kind: ReportKind, config: ReportConfig, downloader: D) -> Self {
        Self {
            kind,
            config,
            downloader,
            state: ReportState::Unfetched,
        }
    }

    pub fn campaign_performance(config: ReportConfig, downloader: D) -> Self {
        Self::new(ReportKind::CampaignPerformance, config, downloader)
    }

    pub fn kind(&self) -> ReportKind {
        self.kind
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn state(&self) -> &ReportState {
        &self.state
    }

    pub fn definition(&self) -> ReportDefinition {
        ReportDefinition::new(self.kind, &self.config)
    }

    /// Fetch the raw CSV payload. Allowed once per fetcher; a failed
    /// request leaves the fetcher unfetched.
    pub async fn download(&mut self) -> Result<&mut Self> {
        if self.state != ReportState::Unfetched {
            return Err(AdsError::StateError {
                message: format!(
                    "download() called on a report that is already {}",
                    self.state.name()
                ),
            });
        }

        let definition = self.definition();
        tracing::debug!(
            "Requesting {} ({})",
            definition.report_type,
            definition.date_range_type
        );
        let raw = self.downloader.download_report(&definition).await?;
        tracing::debug!("Downloaded raw report ({} bytes)", raw.len());

        self.state = ReportState::RawAvailable { raw };
        Ok(self)
    }

    /// Parse the downloaded payload. Calling it again after success is a no-op.
    pub fn format(&mut self) -> Result<&mut Self> {
        if matches!(self.state, ReportState::Formatted { .. }) {
            return Ok(self);
        }

        let raw = match &self.state {
            ReportState::RawAvailable { raw } => raw.clone(),
            _ => {
                return Err(AdsError::FormatError {
                    message: "no raw report available; call download() first".to_string(),
                })
            }
        };

        let report = format_csv(&raw)?;
        tracing::debug!("Formatted report into {} records", report.len());
        self.state = ReportState::Formatted { raw, report };
        Ok(self)
    }

    pub fn raw(&self) -> Option<&str> {
        match &self.state {
            ReportState::Unfetched => None,
            ReportState::RawAvailable { raw } | ReportState::Formatted { raw, .. } => Some(raw),
        }
    }

    pub fn formatted(&self) -> Option<&FormattedReport> {
        match &self.state {
            ReportState::Formatted { report, .. } => Some(report),
            _ => None,
        }
    }

    pub fn into_formatted(self) -> Result<FormattedReport> {
        match self.state {
            ReportState::Formatted { report, .. } => Ok(report),
            other => Err(AdsError::StateError {
                message: format!("report is {}, not formatted", other.name()),
            }),
        }
    }
}

/// Parse a CSV payload with a header row into field-keyed records.
pub fn format_csv(raw: &str) -> Result<FormattedReport> {
    if raw.trim().is_empty() {
        return Err(AdsError::FormatError {
            message: "raw report is empty".to_string(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(raw.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut seen = HashSet::new();
    for header in &headers {
        if !seen.insert(header.as_str()) {
            return Err(AdsError::FormatError {
                message: format!("duplicate column '{}' in report header", header),
            });
        }
    }

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row.map_err(|e| AdsError::FormatError {
            message: format!("malformed row {}: {}", index + 1, e),
        })?;

        let cells = headers
            .iter()
            .cloned()
            .zip(row.iter().map(str::to_string))
            .collect();
        records.push(Record::new(cells));
    }

    Ok(FormattedReport { headers, records })
}

impl FormattedReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.records)?)
    }

    /// Re-serialize as CSV with the original column order.
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.headers)?;
        for record in &self.records {
            writer.write_record(
                self.headers
                    .iter()
                    .map(|h| record.get(h).unwrap_or_default()),
            )?;
        }
        let bytes = writer.into_inner().map_err(|e| AdsError::FormatError {
            message: format!("failed to flush CSV output: {}", e),
        })?;
        String::from_utf8(bytes).map_err(|e| AdsError::FormatError {
            message: format!("CSV output is not UTF-8: {}", e),
        })
    }
}

/// Write a formatted report through `storage` as `json` or `csv`.
/// Returns the file name written, relative to the storage root.
pub async fn export_report<S: Storage>(
    storage: &S,
    kind: ReportKind,
    report: &FormattedReport,
    format: &str,
) -> Result<String> {
    let body = match format {
        "json" => report.to_json()?,
        "csv" => report.to_csv()?,
        other => {
            return Err(AdsError::ValidationError {
                message: format!("unsupported export format: {}", other),
            })
        }
    };

    let file_name = format!("{}.{}", kind.report_type().to_lowercase(), format);
    tracing::debug!("Writing {} records to {}", report.len(), file_name);
    storage.write_file(&file_name, body.as_bytes()).await?;
    Ok(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone)]
    struct StaticDownloader {
        payload: std::result::Result<String, u16>,
        calls: Arc<AtomicUsize>,
    }

    impl StaticDownloader {
        fn ok(payload: &str) -> Self {
            Self {
                payload: Ok(payload.to_string()),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                payload: Err(status),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl ReportDownloader for StaticDownloader {
        async fn download_report(&self, _definition: &ReportDefinition) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.payload {
                Ok(body) => Ok(body.clone()),
                Err(status) => Err(AdsError::ApiError {
                    status: *status,
                    body: "backend error".to_string(),
                }),
            }
        }
    }

    const CLICKS_COST: &str = "Clicks,Cost\n10,5.00\n3,1.50\n";

    #[test]
    fn test_format_csv_preserves_row_order() {
        let report = format_csv(CLICKS_COST).unwrap();

        assert_eq!(report.headers, vec!["Clicks", "Cost"]);
        assert_eq!(report.len(), 2);
        assert_eq!(report.records[0].get("Clicks"), Some("10"));
        assert_eq!(report.records[0].get("Cost"), Some("5.00"));
        assert_eq!(report.records[1].get("Clicks"), Some("3"));
        assert_eq!(report.records[1].get("Cost"), Some("1.50"));
    }

    #[test]
    fn test_format_csv_header_only() {
        let report = format_csv("Clicks,Cost\n").unwrap();
        assert_eq!(report.headers.len(), 2);
        assert!(report.is_empty());
    }

    #[test]
    fn test_format_csv_rejects_ragged_rows() {
        let err = format_csv("Clicks,Cost\n10,5.00\n3\n").unwrap_err();
        assert!(matches!(err, AdsError::FormatError { .. }));
    }

    #[test]
    fn test_format_csv_rejects_empty_payload() {
        assert!(matches!(
            format_csv("  \n"),
            Err(AdsError::FormatError { .. })
        ));
    }

    #[tokio::test]
    async fn test_download_then_format() {
        let mut fetcher = ReportFetcher::campaign_performance(
            ReportConfig::default(),
            StaticDownloader::ok(CLICKS_COST),
        );

        fetcher.download().await.unwrap().format().unwrap();

        assert_eq!(fetcher.raw(), Some(CLICKS_COST));
        let report = fetcher.into_formatted().unwrap();
        assert_eq!(report.records[1].get("Cost"), Some("1.50"));
    }

    #[tokio::test]
    async fn test_format_before_download_fails() {
        let mut fetcher = ReportFetcher::campaign_performance(
            ReportConfig::default(),
            StaticDownloader::ok(CLICKS_COST),
        );

        assert!(matches!(
            fetcher.format(),
            Err(AdsError::FormatError { .. })
        ));
        assert_eq!(fetcher.state(), &ReportState::Unfetched);
    }

    #[tokio::test]
    async fn test_second_download_is_rejected() {
        let downloader = StaticDownloader::ok(CLICKS_COST);
        let mut fetcher =
            ReportFetcher::campaign_performance(ReportConfig::default(), downloader.clone());

        fetcher.download().await.unwrap();
        fetcher.format().unwrap();

        assert!(matches!(
            fetcher.download().await,
            Err(AdsError::StateError { .. })
        ));
        assert_eq!(downloader.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_format_twice_is_noop() {
        let mut fetcher = ReportFetcher::campaign_performance(
            ReportConfig::default(),
            StaticDownloader::ok(CLICKS_COST),
        );
        fetcher.download().await.unwrap();
        fetcher.format().unwrap();
        let first = fetcher.formatted().cloned();

        fetcher.format().unwrap();
        assert_eq!(fetcher.formatted().cloned(), first);
    }

    #[tokio::test]
    async fn test_download_error_passes_through_and_keeps_state() {
        let mut fetcher = ReportFetcher::campaign_performance(
            ReportConfig::default(),
            StaticDownloader::failing(503),
        );

        match fetcher.download().await {
            Err(AdsError::ApiError { status, .. }) => assert_eq!(status, 503),
            Err(other) => panic!("unexpected error: {:?}", other),
            Ok(_) => panic!("download should fail"),
        }
        assert_eq!(fetcher.state(), &ReportState::Unfetched);
    }

    #[test]
    fn test_export_csv_keeps_column_order() {
        let report = format_csv("Cost,Clicks\n5.00,10\n").unwrap();
        assert_eq!(report.to_csv().unwrap(), "Cost,Clicks\n5.00,10\n");

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json[0]["Clicks"], "10");
        assert!(json[0].get("data").is_none());
    }

    #[test]
    fn test_json_export_is_flat_and_ordered() {
        let report = format_csv("Clicks,Cost,Impressions,Conversions\n10,5.00,100,1\n").unwrap();
        let json = report.to_json().unwrap();
        let compact: String = json.split_whitespace().collect();

        assert_eq!(
            compact,
            r#"[{"Clicks":"10","Cost":"5.00","Impressions":"100","Conversions":"1"}]"#
        );
    }

    #[test]
    fn test_format_csv_rejects_duplicate_columns() {
        let err = format_csv("Clicks,Clicks\n1,2\n").unwrap_err();
        match err {
            AdsError::FormatError { message } => assert!(message.contains("Clicks")),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
