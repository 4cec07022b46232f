//! Filters applied when reading the ledger.
//!
//! An empty id list means "no restriction" on that dimension.

use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, CategoryId, TagId};

use super::types::{Account, LedgerEntry, TransactionType};
use crate::period::Period;

/// Report-level filters shared by every sub-aggregation of a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportFilters {
    /// Restrict to these source accounts.
    #[serde(default)]
    pub account_ids: Vec<AccountId>,
    /// Restrict to these categories.
    #[serde(default)]
    pub category_ids: Vec<CategoryId>,
    /// Restrict to entries carrying any of these tags.
    #[serde(default)]
    pub tag_ids: Vec<TagId>,
}

/// Selection of ledger entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Inclusive day range. `None` reads the whole history.
    pub range: Option<Period>,
    /// Allowed transaction types.
    pub types: Vec<TransactionType>,
    /// Allowed source accounts.
    pub account_ids: Vec<AccountId>,
    /// Allowed categories.
    pub category_ids: Vec<CategoryId>,
    /// Entries must carry at least one of these tags.
    pub tag_ids: Vec<TagId>,
}

impl TransactionFilter {
    /// Entries of one type inside `range`, narrowed by report filters.
    #[must_use]
    pub fn for_type(transaction_type: TransactionType, range: Period, filters: &ReportFilters) -> Self {
        Self {
            range: Some(range),
            types: vec![transaction_type],
            account_ids: filters.account_ids.clone(),
            category_ids: filters.category_ids.clone(),
            tag_ids: filters.tag_ids.clone(),
        }
    }

    /// Narrows the filter to a single category.
    #[must_use]
    pub fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_ids = vec![category_id];
        self
    }

    /// Returns true if the entry passes every restriction.
    #[must_use]
    pub fn matches(&self, entry: &LedgerEntry) -> bool {
        if let Some(range) = &self.range {
            if !range.contains(entry.date) {
                return false;
            }
        }
        if !self.types.is_empty() && !self.types.contains(&entry.transaction_type) {
            return false;
        }
        if !self.account_ids.is_empty() && !self.account_ids.contains(&entry.account_id) {
            return false;
        }
        if !self.category_ids.is_empty()
            && !entry
                .category_id
                .is_some_and(|id| self.category_ids.contains(&id))
        {
            return false;
        }
        if !self.tag_ids.is_empty() && !entry.tag_ids.iter().any(|t| self.tag_ids.contains(t)) {
            return false;
        }
        true
    }
}

/// Selection of accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountFilter {
    /// Restrict to these accounts.
    pub ids: Vec<AccountId>,
    /// Leave out inactive accounts.
    pub active_only: bool,
}

impl AccountFilter {
    /// Returns true if the account passes every restriction.
    #[must_use]
    pub fn matches(&self, account: &Account) -> bool {
        (self.ids.is_empty() || self.ids.contains(&account.id))
            && (!self.active_only || account.is_active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tally_shared::types::{CurrencyId, TransactionId};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn entry() -> LedgerEntry {
        LedgerEntry {
            id: TransactionId::from_u128(1),
            transaction_type: TransactionType::Expense,
            date: d(2025, 1, 15),
            account_id: AccountId::from_u128(10),
            to_account_id: None,
            category_id: Some(CategoryId::from_u128(20)),
            amount: dec!(10),
            to_amount: None,
            currency_id: CurrencyId::from_u128(1),
            to_currency_id: None,
            description: String::new(),
            tag_ids: vec![TagId::from_u128(30), TagId::from_u128(31)],
        }
    }

    fn january() -> Period {
        Period::new(d(2025, 1, 1), d(2025, 1, 31)).unwrap()
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(TransactionFilter::default().matches(&entry()));
    }

    #[test]
    fn test_range_and_type() {
        let filter = TransactionFilter::for_type(TransactionType::Expense, january(), &ReportFilters::default());
        assert!(filter.matches(&entry()));

        let income = TransactionFilter::for_type(TransactionType::Income, january(), &ReportFilters::default());
        assert!(!income.matches(&entry()));

        let feb = Period::new(d(2025, 2, 1), d(2025, 2, 28)).unwrap();
        let outside = TransactionFilter::for_type(TransactionType::Expense, feb, &ReportFilters::default());
        assert!(!outside.matches(&entry()));
    }

    #[test]
    fn test_tag_filter_matches_any() {
        let filters = ReportFilters {
            tag_ids: vec![TagId::from_u128(31), TagId::from_u128(99)],
            ..ReportFilters::default()
        };
        let filter = TransactionFilter::for_type(TransactionType::Expense, january(), &filters);
        assert!(filter.matches(&entry()));

        let filters = ReportFilters {
            tag_ids: vec![TagId::from_u128(99)],
            ..ReportFilters::default()
        };
        let filter = TransactionFilter::for_type(TransactionType::Expense, january(), &filters);
        assert!(!filter.matches(&entry()));
    }

    #[test]
    fn test_category_filter_excludes_uncategorized() {
        let filter = TransactionFilter::default().with_category(CategoryId::from_u128(20));
        assert!(filter.matches(&entry()));

        let mut uncategorized = entry();
        uncategorized.category_id = None;
        assert!(!filter.matches(&uncategorized));
    }
}
