//! Aggregation types.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::CategoryId;

use crate::ledger::LedgerEntry;

/// Dimension a report groups by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationDimension {
    /// Group by category.
    Category,
    /// Group by source account.
    Account,
    /// Group by tag. Entries with several tags land in each of their groups.
    Tag,
    /// Group by calendar bucket.
    Period,
    /// A single group holding everything.
    #[default]
    None,
}

impl AggregationDimension {
    /// Wire name of the dimension.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Account => "account",
            Self::Tag => "tag",
            Self::Period => "period",
            Self::None => "none",
        }
    }
}

impl FromStr for AggregationDimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "category" => Ok(Self::Category),
            "account" => Ok(Self::Account),
            "tag" => Ok(Self::Tag),
            "period" => Ok(Self::Period),
            "none" | "" => Ok(Self::None),
            other => Err(format!("unknown dimension '{other}'")),
        }
    }
}

/// A ledger entry with its amount converted into the base currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedEntry {
    /// The original entry.
    pub entry: LedgerEntry,
    /// `entry.amount` in the base currency.
    pub base_amount: Decimal,
}

/// Entries sharing one value of a dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Stable key: an id, a bucket key, or a sentinel such as `uncategorized`.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Icon, when the dimension has one.
    pub icon: Option<String>,
    /// Display color, when the dimension has one.
    pub color: Option<String>,
    /// Member entries in the order they were read.
    pub entries: Vec<ConvertedEntry>,
}

impl Group {
    /// Creates an empty group.
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            icon: None,
            color: None,
            entries: Vec::new(),
        }
    }

    /// Base-currency amounts of the members.
    #[must_use]
    pub fn values(&self) -> Vec<Decimal> {
        self.entries.iter().map(|e| e.base_amount).collect()
    }

    /// Base-currency total of the members.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.entries.iter().map(|e| e.base_amount).sum()
    }
}

/// Total for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    /// Category id, `None` for uncategorized entries.
    pub id: Option<CategoryId>,
    /// Category name.
    pub name: String,
    /// Icon name.
    pub icon: Option<String>,
    /// Display color.
    pub color: Option<String>,
    /// Base-currency total.
    pub total: Decimal,
}

/// Total and entry count for one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DailyTotal {
    /// Base-currency total.
    pub total: Decimal,
    /// Number of entries.
    pub count: usize,
}
