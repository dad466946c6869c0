//! Result export
//!
//! Flattens each analysis result into one record and serializes the batch as
//! JSON, CSV or an Excel workbook. Per-profile score bundles are flattened with
//! a `desktop_` / `mobile_` key prefix; structural metrics keep their own
//! names. The artifact is built fully in memory, so a failed export never
//! leaves a partial file behind.

use crate::analysis::{AnalysisBatch, AnalysisResult, Findings};
use crate::scoring::MetricValue;
use rust_xlsxwriter::{Format, Workbook};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Name of the single worksheet in spreadsheet exports
const SHEET_NAME: &str = "Results";

/// Errors that can occur while exporting a batch
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Cannot export an empty batch")]
    EmptyBatch,

    #[error("Unknown export format '{0}' (expected json, csv or excel)")]
    UnknownFormat(String),

    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Structured text: a JSON array of flat objects
    Json,

    /// Tabular text: CSV with a header row
    Csv,

    /// Spreadsheet: an XLSX workbook with one sheet
    Excel,
}

impl ExportFormat {
    /// Default file name for the artifact
    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Json => "seo_audit_results.json",
            ExportFormat::Csv => "seo_audit_results.csv",
            ExportFormat::Excel => "seo_audit_results.xlsx",
        }
    }

    /// MIME type of the artifact
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
            ExportFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "excel",
        };
        f.write_str(name)
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" | "structured-text" => Ok(ExportFormat::Json),
            "csv" | "tabular-text" => Ok(ExportFormat::Csv),
            "excel" | "xlsx" | "spreadsheet" => Ok(ExportFormat::Excel),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

/// One analysis result flattened to ordered key/value pairs
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRecord {
    fields: Vec<(String, MetricValue)>,
}

impl FlatRecord {
    pub fn get(&self, key: &str) -> Option<&MetricValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Flattens one result: `url` first, then the findings
pub fn flatten_result(result: &AnalysisResult) -> FlatRecord {
    let mut fields = vec![("url".to_string(), MetricValue::from(result.url.as_str()))];

    match &result.findings {
        Findings::Scores(bundles) => {
            for (profile, bundle) in bundles {
                for (key, value) in bundle {
                    fields.push((format!("{}_{}", profile, key), value.clone()));
                }
            }
        }
        Findings::Structure(metrics) => {
            for (key, value) in metrics.fields() {
                fields.push((key.to_string(), value));
            }
        }
    }

    FlatRecord { fields }
}

/// Flattens every result of a batch, in batch order
pub fn flatten_batch(batch: &AnalysisBatch) -> Vec<FlatRecord> {
    batch.results.iter().map(flatten_result).collect()
}

/// Serializes a batch in the requested format
///
/// # Arguments
///
/// * `batch` - The analysis results to export
/// * `format` - The output format
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - The complete artifact
/// * `Err(ExportError)` - Empty batch or serialization failure
///
/// # Example
///
/// ```no_run
/// use pagescope::analysis::AnalysisBatch;
/// use pagescope::output::{export, ExportFormat};
///
/// # fn example(batch: &AnalysisBatch) -> Result<(), Box<dyn std::error::Error>> {
/// let format: ExportFormat = "csv".parse()?;
/// let bytes = export(batch, format)?;
/// std::fs::write(format.file_name(), bytes)?;
/// # Ok(())
/// # }
/// ```
pub fn export(batch: &AnalysisBatch, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
    if batch.is_empty() {
        return Err(ExportError::EmptyBatch);
    }

    let records = flatten_batch(batch);
    let bytes = match format {
        ExportFormat::Json => to_json(&records)?,
        ExportFormat::Csv => to_csv(&records)?,
        ExportFormat::Excel => to_xlsx(&records)?,
    };

    tracing::debug!(
        "Exported {} records as {} ({} bytes)",
        records.len(),
        format,
        bytes.len()
    );

    Ok(bytes)
}

/// Union of all record keys, in order of first appearance
fn header(records: &[FlatRecord]) -> Vec<&str> {
    let mut columns: Vec<&str> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !columns.contains(&key) {
                columns.push(key);
            }
        }
    }
    columns
}

fn to_json(records: &[FlatRecord]) -> Result<Vec<u8>, ExportError> {
    let rows = records
        .iter()
        .map(|record| {
            record
                .iter()
                .map(|(key, value)| serde_json::to_value(value).map(|v| (key.to_string(), v)))
                .collect::<Result<serde_json::Map<String, serde_json::Value>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(serde_json::to_vec_pretty(&rows)?)
}

fn to_csv(records: &[FlatRecord]) -> Result<Vec<u8>, ExportError> {
    let columns = header(records);
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(&columns)?;
    for record in records {
        writer.write_record(columns.iter().map(|column| {
            record
                .get(column)
                .map(|value| value.to_string())
                .unwrap_or_default()
        }))?;
    }

    writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}

fn to_xlsx(records: &[FlatRecord]) -> Result<Vec<u8>, ExportError> {
    let columns = header(records);
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, name) in columns.iter().enumerate() {
        worksheet.write_string_with_format(0, column_index(col)?, *name, &bold)?;
    }

    for (index, record) in records.iter().enumerate() {
        let row = u32::try_from(index + 1)
            .map_err(|_| ExportError::Format("too many rows for a worksheet".to_string()))?;

        for (col, name) in columns.iter().enumerate() {
            let col = column_index(col)?;
            match record.get(name) {
                Some(MetricValue::Count(n)) => {
                    worksheet.write_number(row, col, *n as f64)?;
                }
                Some(MetricValue::Number(x)) => {
                    worksheet.write_number(row, col, *x)?;
                }
                Some(MetricValue::Flag(b)) => {
                    worksheet.write_boolean(row, col, *b)?;
                }
                Some(MetricValue::Text(s)) if !s.is_empty() => {
                    worksheet.write_string(row, col, s.as_str())?;
                }
                Some(MetricValue::Text(_)) | None => {}
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn column_index(col: usize) -> Result<u16, ExportError> {
    u16::try_from(col)
        .map_err(|_| ExportError::Format("too many columns for a worksheet".to_string()))
}
