//! Query string parsing for report endpoints.

use std::str::FromStr;

use serde::Deserialize;
use tally_core::ledger::{ReportFilters, TransactionType};
use tally_core::period::{ComparisonKind, Granularity, PeriodSpec, PeriodType};
use tally_core::reports::{ReportError, ReportRequest};

/// Query parameters accepted by every report endpoint.
///
/// Report-specific parameters are ignored by endpoints that do not use them.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    /// `month`, `quarter`, `year`, `ytd` or `custom`.
    pub period_type: Option<String>,
    /// Value for the named period type, e.g. `2025-01`.
    pub period_value: Option<String>,
    /// Custom range start.
    pub start: Option<String>,
    /// Custom range end.
    pub end: Option<String>,
    /// `previous_period`, `same_period_last_year` or `budget`.
    pub comparison: Option<String>,
    /// Account IDs (comma-separated).
    pub accounts: Option<String>,
    /// Category IDs (comma-separated).
    pub categories: Option<String>,
    /// Tag IDs (comma-separated).
    pub tags: Option<String>,
    /// `day`, `week` or `month`.
    pub granularity: Option<String>,
    /// Row limit.
    pub limit: Option<usize>,
    /// Trailing months for the expense pace report.
    pub months: Option<usize>,
    /// Transaction type.
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
}

impl ReportQuery {
    /// Builds the shared report request.
    pub fn request(&self) -> Result<ReportRequest, ReportError> {
        let period_type = match non_empty(self.period_type.as_deref()) {
            Some(raw) => raw.parse::<PeriodType>()?,
            None => PeriodType::default(),
        };
        let comparison = match non_empty(self.comparison.as_deref()) {
            Some(raw) => raw.parse::<ComparisonKind>()?,
            None => ComparisonKind::default(),
        };

        Ok(ReportRequest {
            period: PeriodSpec {
                period_type,
                period_value: self.period_value.clone(),
                start: self.start.clone(),
                end: self.end.clone(),
            },
            filters: ReportFilters {
                account_ids: parse_id_list("accounts", self.accounts.as_deref())?,
                category_ids: parse_id_list("categories", self.categories.as_deref())?,
                tag_ids: parse_id_list("tags", self.tags.as_deref())?,
            },
            comparison,
        })
    }

    /// The requested transaction type, or `default`.
    pub fn transaction_type_or(&self, default: TransactionType) -> Result<TransactionType, ReportError> {
        match non_empty(self.transaction_type.as_deref()) {
            Some(raw) => raw.parse().map_err(ReportError::InvalidRequest),
            None => Ok(default),
        }
    }

    /// The requested granularity, or `default`.
    pub fn granularity_or(&self, default: Granularity) -> Result<Granularity, ReportError> {
        match non_empty(self.granularity.as_deref()) {
            Some(raw) => Ok(raw.parse()?),
            None => Ok(default),
        }
    }
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// Parses comma-separated IDs. Empty parts are skipped; malformed ones fail.
fn parse_id_list<T: FromStr>(name: &str, raw: Option<&str>) -> Result<Vec<T>, ReportError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<T>()
                .map_err(|_| ReportError::InvalidRequest(format!("invalid id in {name}: '{part}'")))
        })
        .collect()
}
