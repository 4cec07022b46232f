//! Ledger aggregation over one snapshot.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tally_shared::types::{AccountId, CategoryId, TagId};
use tracing::debug;

use super::error::AggregationError;
use super::types::{AggregationDimension, CategoryTotal, ConvertedEntry, DailyTotal, Group};
use crate::currency::CurrencyConverter;
use crate::ledger::{
    Account, AccountFilter, Category, LedgerStore, ReportFilters, Tag, TransactionFilter,
    TransactionType,
};
use crate::period::{Granularity, Period, PeriodBucket, PeriodBucketer};

/// Group key for entries without a category.
pub const UNCATEGORIZED: &str = "uncategorized";
/// Group key for entries without tags.
pub const UNTAGGED: &str = "untagged";
/// Group key for the single group of an ungrouped aggregation.
pub const ALL: &str = "all";

/// Names and colors used to label groups.
#[derive(Debug, Clone, Default)]
pub struct Lookups {
    categories: HashMap<CategoryId, Category>,
    accounts: HashMap<AccountId, Account>,
    tags: HashMap<TagId, Tag>,
}

impl Lookups {
    /// Builds lookups from full lists.
    #[must_use]
    pub fn new(categories: Vec<Category>, accounts: Vec<Account>, tags: Vec<Tag>) -> Self {
        Self {
            categories: categories.into_iter().map(|c| (c.id, c)).collect(),
            accounts: accounts.into_iter().map(|a| (a.id, a)).collect(),
            tags: tags.into_iter().map(|t| (t.id, t)).collect(),
        }
    }

    /// Category by id.
    #[must_use]
    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.get(&id)
    }

    /// Account by id.
    #[must_use]
    pub fn account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.get(&id)
    }
}

/// Computes base-currency aggregates by reading one ledger snapshot.
#[derive(Clone)]
pub struct LedgerAggregator {
    store: Arc<dyn LedgerStore>,
    converter: Arc<CurrencyConverter>,
    bucketer: PeriodBucketer,
}

impl LedgerAggregator {
    /// Creates an aggregator over `store`.
    #[must_use]
    pub fn new(
        store: Arc<dyn LedgerStore>,
        converter: Arc<CurrencyConverter>,
        bucketer: PeriodBucketer,
    ) -> Self {
        Self {
            store,
            converter,
            bucketer,
        }
    }

    /// The bucketer used for period grouping.
    #[must_use]
    pub const fn bucketer(&self) -> &PeriodBucketer {
        &self.bucketer
    }

    /// Matching entries with base-currency amounts.
    pub async fn entries(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<ConvertedEntry>, AggregationError> {
        let entries = self.store.list_transactions(filter).await?;
        entries
            .into_iter()
            .map(|entry| {
                let base_amount = self.converter.to_base_by_id(entry.amount, entry.currency_id)?;
                Ok(ConvertedEntry { entry, base_amount })
            })
            .collect()
    }

    /// Total of one transaction type in `range`.
    pub async fn sum_by_type(
        &self,
        transaction_type: TransactionType,
        range: &Period,
        filters: &ReportFilters,
    ) -> Result<Decimal, AggregationError> {
        let filter = TransactionFilter::for_type(transaction_type, *range, filters);
        Ok(self.entries(&filter).await?.iter().map(|e| e.base_amount).sum())
    }

    /// Totals per category, uncategorized entries included as one group.
    ///
    /// The order is stable but not ranked; callers sort as needed.
    pub async fn sum_grouped_by_category(
        &self,
        transaction_type: TransactionType,
        range: &Period,
        filters: &ReportFilters,
    ) -> Result<Vec<CategoryTotal>, AggregationError> {
        let groups = self
            .grouped(transaction_type, range, filters, AggregationDimension::Category, Granularity::Month)
            .await?;
        Ok(groups
            .iter()
            .map(|group| CategoryTotal {
                id: group.key.parse().ok(),
                name: group.label.clone(),
                icon: group.icon.clone(),
                color: group.color.clone(),
                total: group.total(),
            })
            .collect())
    }

    /// Totals per source account.
    pub async fn sum_grouped_by_account(
        &self,
        transaction_type: TransactionType,
        range: &Period,
        filters: &ReportFilters,
    ) -> Result<Vec<(String, String, Decimal)>, AggregationError> {
        self.labelled_totals(transaction_type, range, filters, AggregationDimension::Account)
            .await
    }

    /// Totals per tag. Entries with several tags count towards each.
    pub async fn sum_grouped_by_tag(
        &self,
        transaction_type: TransactionType,
        range: &Period,
        filters: &ReportFilters,
    ) -> Result<Vec<(String, String, Decimal)>, AggregationError> {
        self.labelled_totals(transaction_type, range, filters, AggregationDimension::Tag)
            .await
    }

    async fn labelled_totals(
        &self,
        transaction_type: TransactionType,
        range: &Period,
        filters: &ReportFilters,
        dimension: AggregationDimension,
    ) -> Result<Vec<(String, String, Decimal)>, AggregationError> {
        let groups = self
            .grouped(transaction_type, range, filters, dimension, Granularity::Month)
            .await?;
        Ok(groups
            .into_iter()
            .map(|g| {
                let total = g.total();
                (g.key, g.label, total)
            })
            .collect())
    }

    /// Totals keyed by bucket key. Buckets without entries are absent.
    pub async fn grouped_by_period(
        &self,
        transaction_type: TransactionType,
        range: &Period,
        granularity: Granularity,
        filters: &ReportFilters,
        category_id: Option<CategoryId>,
    ) -> Result<BTreeMap<String, Decimal>, AggregationError> {
        let mut filter = TransactionFilter::for_type(transaction_type, *range, filters);
        if let Some(category_id) = category_id {
            filter = filter.with_category(category_id);
        }

        let mut totals = BTreeMap::new();
        for converted in self.entries(&filter).await? {
            let key = self.bucketer.key_for(converted.entry.date, granularity);
            *totals.entry(key).or_insert(Decimal::ZERO) += converted.base_amount;
        }
        Ok(totals)
    }

    /// Total and count per day. Days without entries are absent.
    pub async fn daily_totals(
        &self,
        transaction_type: TransactionType,
        range: &Period,
        filters: &ReportFilters,
    ) -> Result<BTreeMap<NaiveDate, DailyTotal>, AggregationError> {
        let filter = TransactionFilter::for_type(transaction_type, *range, filters);
        let mut days: BTreeMap<NaiveDate, DailyTotal> = BTreeMap::new();
        for converted in self.entries(&filter).await? {
            let day = days.entry(converted.entry.date).or_default();
            day.total += converted.base_amount;
            day.count += 1;
        }
        Ok(days)
    }

    /// The `limit` largest entries by base amount.
    ///
    /// Ties are broken by date, newest first, then by id.
    pub async fn top_by_amount(
        &self,
        transaction_type: TransactionType,
        range: &Period,
        filters: &ReportFilters,
        limit: usize,
    ) -> Result<Vec<ConvertedEntry>, AggregationError> {
        let filter = TransactionFilter::for_type(transaction_type, *range, filters);
        let mut entries = self.entries(&filter).await?;
        entries.sort_by_key(|e| (Reverse(e.base_amount), Reverse(e.entry.date), e.entry.id));
        entries.truncate(limit);
        Ok(entries)
    }

    /// Entries of one type grouped along `dimension`.
    ///
    /// Period groups cover every bucket of `range` in order, empty ones
    /// included. Other dimensions are ordered by key.
    pub async fn grouped(
        &self,
        transaction_type: TransactionType,
        range: &Period,
        filters: &ReportFilters,
        dimension: AggregationDimension,
        granularity: Granularity,
    ) -> Result<Vec<Group>, AggregationError> {
        let filter = TransactionFilter::for_type(transaction_type, *range, filters);
        let entries = self.entries(&filter).await?;
        let lookups = self.lookups(dimension).await?;
        let buckets = if dimension == AggregationDimension::Period {
            self.bucketer.generate(range, granularity)?
        } else {
            Vec::new()
        };

        debug!(
            transaction_type = transaction_type.as_str(),
            dimension = dimension.as_str(),
            entries = entries.len(),
            "Grouping entries"
        );
        Ok(group_entries(
            entries,
            dimension,
            &lookups,
            &self.bucketer,
            &buckets,
            granularity,
        ))
    }

    /// Loads the labels `dimension` needs.
    pub async fn lookups(
        &self,
        dimension: AggregationDimension,
    ) -> Result<Lookups, AggregationError> {
        let categories = if dimension == AggregationDimension::Category {
            self.store.list_categories().await?
        } else {
            Vec::new()
        };
        let accounts = if dimension == AggregationDimension::Account {
            self.store.get_accounts(&AccountFilter::default()).await?
        } else {
            Vec::new()
        };
        let tags = if dimension == AggregationDimension::Tag {
            self.store.list_tags().await?
        } else {
            Vec::new()
        };
        Ok(Lookups::new(categories, accounts, tags))
    }
}

/// Splits entries into groups along `dimension`.
///
/// `buckets` is only used for the period dimension and must be the buckets
/// of the aggregated range at `granularity`.
#[must_use]
pub fn group_entries(
    entries: Vec<ConvertedEntry>,
    dimension: AggregationDimension,
    lookups: &Lookups,
    bucketer: &PeriodBucketer,
    buckets: &[PeriodBucket],
    granularity: Granularity,
) -> Vec<Group> {
    if dimension == AggregationDimension::Period {
        let mut groups: Vec<Group> = buckets
            .iter()
            .map(|b| Group::new(b.key.clone(), b.label.clone()))
            .collect();
        let index: HashMap<String, usize> = groups
            .iter()
            .enumerate()
            .map(|(i, g)| (g.key.clone(), i))
            .collect();
        for converted in entries {
            let key = bucketer.key_for(converted.entry.date, granularity);
            if let Some(i) = index.get(&key) {
                groups[*i].entries.push(converted);
            }
        }
        return groups;
    }

    let mut groups: BTreeMap<String, Group> = BTreeMap::new();
    for converted in entries {
        for (key, template) in keys_for(&converted, dimension, lookups) {
            groups
                .entry(key)
                .or_insert(template)
                .entries
                .push(converted.clone());
        }
    }
    groups.into_values().collect()
}

fn keys_for(
    converted: &ConvertedEntry,
    dimension: AggregationDimension,
    lookups: &Lookups,
) -> Vec<(String, Group)> {
    let entry = &converted.entry;
    match dimension {
        AggregationDimension::Category => {
            let group = match entry.category_id {
                Some(id) => {
                    let mut group = Group::new(id.to_string(), "Unknown category");
                    if let Some(category) = lookups.categories.get(&id) {
                        group.label.clone_from(&category.name);
                        group.icon.clone_from(&category.icon);
                        group.color.clone_from(&category.color);
                    }
                    group
                }
                None => Group::new(UNCATEGORIZED, "Uncategorized"),
            };
            vec![(group.key.clone(), group)]
        }
        AggregationDimension::Account => {
            let label = lookups
                .account(entry.account_id)
                .map_or_else(|| "Unknown account".to_string(), |a| a.name.clone());
            let key = entry.account_id.to_string();
            vec![(key.clone(), Group::new(key, label))]
        }
        AggregationDimension::Tag => {
            if entry.tag_ids.is_empty() {
                return vec![(UNTAGGED.to_string(), Group::new(UNTAGGED, "Untagged"))];
            }
            entry
                .tag_ids
                .iter()
                .map(|id| {
                    let mut group = Group::new(id.to_string(), "Unknown tag");
                    if let Some(tag) = lookups.tags.get(id) {
                        group.label.clone_from(&tag.name);
                        group.color.clone_from(&tag.color);
                    }
                    (group.key.clone(), group)
                })
                .collect()
        }
        AggregationDimension::Period | AggregationDimension::None => {
            vec![(ALL.to_string(), Group::new(ALL, "All"))]
        }
    }
}
