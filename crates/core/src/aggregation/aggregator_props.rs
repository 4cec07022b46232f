//! Property-based tests for grouping and metrics.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::types::{AccountId, CategoryId, CurrencyId, TagId, TransactionId};

use super::aggregator::{Lookups, group_entries};
use super::metrics::{Metric, compute, median};
use super::types::{AggregationDimension, ConvertedEntry};
use crate::ledger::{LedgerEntry, TransactionType};
use crate::period::{Granularity, Period, PeriodBucketer};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

fn range() -> Period {
    Period::new(start(), NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()).unwrap()
}

fn entries() -> impl Strategy<Value = Vec<ConvertedEntry>> {
    prop::collection::vec(
        (
            0i64..365,
            prop::option::of(1u128..6),
            1u128..4,
            prop::collection::vec(1u128..4, 0..3),
            1i64..10_000_000,
        ),
        0..60,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (day, category, account, tags, cents))| {
                let amount = Decimal::new(cents, 2);
                ConvertedEntry {
                    entry: LedgerEntry {
                        id: TransactionId::from_u128(i as u128 + 1),
                        transaction_type: TransactionType::Expense,
                        date: start() + chrono::Duration::days(day),
                        account_id: AccountId::from_u128(account),
                        to_account_id: None,
                        category_id: category.map(CategoryId::from_u128),
                        amount,
                        to_amount: None,
                        currency_id: CurrencyId::from_u128(1),
                        to_currency_id: None,
                        description: String::new(),
                        tag_ids: tags.into_iter().map(TagId::from_u128).collect(),
                    },
                    base_amount: amount,
                }
            })
            .collect()
    })
}

fn dimension() -> impl Strategy<Value = AggregationDimension> {
    prop_oneof![
        Just(AggregationDimension::Category),
        Just(AggregationDimension::Account),
        Just(AggregationDimension::Period),
        Just(AggregationDimension::None),
    ]
}

fn granularity() -> impl Strategy<Value = Granularity> {
    prop_oneof![
        Just(Granularity::Day),
        Just(Granularity::Week),
        Just(Granularity::Month),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every non-tag dimension partitions the entries: group totals add up to the overall sum.
    #[test]
    fn prop_group_totals_sum_to_total(
        entries in entries(),
        dimension in dimension(),
        granularity in granularity(),
    ) {
        let total: Decimal = entries.iter().map(|e| e.base_amount).sum();
        let count = entries.len();
        let bucketer = PeriodBucketer::default();
        let buckets = bucketer.generate(&range(), granularity).unwrap();

        let groups = group_entries(entries, dimension, &Lookups::default(), &bucketer, &buckets, granularity);

        let grouped: Decimal = groups.iter().map(super::types::Group::total).sum();
        let members: usize = groups.iter().map(|g| g.entries.len()).sum();
        prop_assert_eq!(grouped, total);
        prop_assert_eq!(members, count);
    }

    /// Percent-of-total across a partition adds up to 100 when the total is positive.
    #[test]
    fn prop_percent_of_total_sums_to_hundred(entries in entries()) {
        prop_assume!(!entries.is_empty());
        let total: Decimal = entries.iter().map(|e| e.base_amount).sum();
        let bucketer = PeriodBucketer::default();
        let groups = group_entries(
            entries,
            AggregationDimension::Category,
            &Lookups::default(),
            &bucketer,
            &[],
            Granularity::Month,
        );

        let percent: Decimal = groups
            .iter()
            .map(|g| compute(&g.values(), &[Metric::PercentOfTotal], total, total)[&Metric::PercentOfTotal])
            .sum();
        prop_assert!((percent - Decimal::ONE_HUNDRED).abs() < Decimal::new(1, 12));
    }

    /// The median lies between min and max.
    #[test]
    fn prop_median_bounded(values in prop::collection::vec(-1_000_000i64..1_000_000, 1..30)) {
        let values: Vec<Decimal> = values.into_iter().map(|v| Decimal::new(v, 2)).collect();
        let set = compute(&values, &[Metric::Min, Metric::Max], Decimal::ZERO, Decimal::ZERO);
        let m = median(&values);
        prop_assert!(set[&Metric::Min] <= m && m <= set[&Metric::Max]);
    }
}
