// Batch validation - CSV of IBANs → JSON-serializable report
//
// Input: a CSV file with a header row and an `IBAN` column (any other
// columns are ignored). Every row is checked independently; a bad row never
// aborts the batch.

use crate::error::{IbanError, Rejection};
use crate::format::electronic_format;
use crate::registry::CountryRegistry;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

// ============================================================================
// INPUT RECORD
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct IbanRecord {
    #[serde(alias = "IBAN", alias = "Iban")]
    pub iban: String,
}

/// Load IBAN records from a CSV file
pub fn load_csv(csv_path: &Path) -> Result<Vec<IbanRecord>> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open CSV file {}", csv_path.display()))?;
    load_from_reader(file)
}

/// Load IBAN records from any CSV source
pub fn load_from_reader<R: Read>(reader: R) -> Result<Vec<IbanRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: IbanRecord = result.context("Failed to deserialize IBAN record")?;
        records.push(record);
    }

    debug!("Loaded {} IBAN records", records.len());
    Ok(records)
}

// ============================================================================
// PER-ROW RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    UnknownCountry { country_code: String },
    Rejected { rejection: Rejection },
}

#[derive(Debug, Clone, Serialize)]
pub struct IbanCheck {
    /// 1-based data row (header excluded)
    pub line: usize,
    pub input: String,
    pub electronic: String,
    pub country_code: Option<String>,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,
}

impl IbanCheck {
    fn run(line: usize, input: &str, registry: &CountryRegistry) -> Self {
        let electronic = electronic_format(input);
        let code = electronic.get(..2).unwrap_or(electronic.as_str()).to_string();

        let reason = match registry.lookup(&code) {
            Ok(spec) => spec
                .check(&electronic)
                .err()
                .map(|rejection| FailureReason::Rejected { rejection }),
            Err(IbanError::UnknownCountry(country_code)) => {
                Some(FailureReason::UnknownCountry { country_code })
            }
            Err(_) => Some(FailureReason::UnknownCountry {
                country_code: code.clone(),
            }),
        };

        IbanCheck {
            line,
            input: input.to_string(),
            country_code: registry.contains(&code).then_some(code),
            electronic,
            valid: reason.is_none(),
            reason,
        }
    }
}

// ============================================================================
// BATCH REPORT
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub source: String,
    pub checked_at: DateTime<Utc>,
    pub total: usize,
    pub valid_count: usize,
    pub invalid_count: usize,
    /// Valid IBANs per country code
    pub by_country: BTreeMap<String, usize>,
    pub results: Vec<IbanCheck>,
}

impl BatchReport {
    pub fn summary(&self) -> String {
        let rate = if self.total == 0 {
            0.0
        } else {
            self.valid_count as f64 / self.total as f64 * 100.0
        };

        format!(
            "{}: {} IBANs, {} valid, {} invalid ({:.1}% valid) across {} countries",
            self.source,
            self.total,
            self.valid_count,
            self.invalid_count,
            rate,
            self.by_country.len()
        )
    }

    pub fn failures(&self) -> impl Iterator<Item = &IbanCheck> {
        self.results.iter().filter(|r| !r.valid)
    }

    pub fn all_valid(&self) -> bool {
        self.invalid_count == 0
    }
}

/// Check every record against `registry`
pub fn validate_batch(source: &str, records: &[IbanRecord], registry: &CountryRegistry) -> BatchReport {
    let results: Vec<IbanCheck> = records
        .iter()
        .enumerate()
        .map(|(idx, record)| IbanCheck::run(idx + 1, &record.iban, registry))
        .collect();

    let mut by_country = BTreeMap::new();
    for check in results.iter().filter(|r| r.valid) {
        if let Some(code) = &check.country_code {
            *by_country.entry(code.clone()).or_insert(0) += 1;
        }
    }

    let valid_count = results.iter().filter(|r| r.valid).count();
    let report = BatchReport {
        source: source.to_string(),
        checked_at: Utc::now(),
        total: results.len(),
        valid_count,
        invalid_count: results.len() - valid_count,
        by_country,
        results,
    };

    info!("{}", report.summary());
    report
}

// ============================================================================
// TESTS
// ============================================================================
