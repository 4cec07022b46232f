//! Derived metrics over a group of base-currency amounts.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{percent_of, round_money, round_percent, safe_div};

/// A metric that can be requested for a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Sum of amounts.
    Sum,
    /// Number of entries.
    Count,
    /// Mean amount.
    Average,
    /// Smallest amount.
    Min,
    /// Largest amount.
    Max,
    /// Middle amount.
    Median,
    /// Group sum as a percentage of the overall total.
    PercentOfTotal,
    /// Group sum as a percentage of total income.
    PercentOfIncome,
}

impl Metric {
    /// Every metric, in presentation order.
    pub const ALL: [Self; 8] = [
        Self::Sum,
        Self::Count,
        Self::Average,
        Self::Min,
        Self::Max,
        Self::Median,
        Self::PercentOfTotal,
        Self::PercentOfIncome,
    ];

    /// Whether the metric is a percentage.
    #[must_use]
    pub const fn is_percent(self) -> bool {
        matches!(self, Self::PercentOfTotal | Self::PercentOfIncome)
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sum" => Ok(Self::Sum),
            "count" => Ok(Self::Count),
            "average" | "avg" => Ok(Self::Average),
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            "median" => Ok(Self::Median),
            "percent_of_total" => Ok(Self::PercentOfTotal),
            "percent_of_income" => Ok(Self::PercentOfIncome),
            other => Err(format!("unknown metric '{other}'")),
        }
    }
}

/// Metric name to value.
pub type MetricSet = BTreeMap<Metric, Decimal>;

/// Computes the requested metrics for `values`.
///
/// `overall_total` is the denominator for `percent_of_total` and
/// `income_total` the denominator for `percent_of_income`; both yield zero
/// when the denominator is not positive. Empty groups yield zero for every
/// metric.
#[must_use]
pub fn compute(
    values: &[Decimal],
    requested: &[Metric],
    overall_total: Decimal,
    income_total: Decimal,
) -> MetricSet {
    let sum: Decimal = values.iter().copied().sum();
    let count = Decimal::from(values.len());

    requested
        .iter()
        .map(|metric| {
            let value = match metric {
                Metric::Sum => sum,
                Metric::Count => count,
                Metric::Average => safe_div(sum, count),
                Metric::Min => values.iter().copied().min().unwrap_or_default(),
                Metric::Max => values.iter().copied().max().unwrap_or_default(),
                Metric::Median => median(values),
                Metric::PercentOfTotal => percent_of(sum, overall_total),
                Metric::PercentOfIncome => percent_of(sum, income_total),
            };
            (*metric, value)
        })
        .collect()
}

/// Middle of the sorted values, or the mean of the two middles for even counts.
#[must_use]
pub fn median(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / Decimal::TWO
    } else {
        sorted[mid]
    }
}

/// Rounds a metric set for presentation.
///
/// Percentages round to 1 dp, counts stay whole, everything else is money.
#[must_use]
pub fn round_metrics(set: &MetricSet) -> MetricSet {
    set.iter()
        .map(|(metric, value)| {
            let rounded = match metric {
                Metric::Count => *value,
                m if m.is_percent() => round_percent(*value),
                _ => round_money(*value),
            };
            (*metric, rounded)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(&[], dec!(0))]
    #[case(&[dec!(5)], dec!(5))]
    #[case(&[dec!(3), dec!(1), dec!(2)], dec!(2))]
    #[case(&[dec!(4), dec!(1), dec!(3), dec!(2)], dec!(2.5))]
    fn test_median(#[case] values: &[Decimal], #[case] expected: Decimal) {
        assert_eq!(median(values), expected);
    }

    #[test]
    fn test_compute_all_metrics() {
        let values = [dec!(1500), dec!(800), dec!(300), dec!(200), dec!(100)];
        let set = compute(&values, &Metric::ALL, dec!(5800), dec!(5855));

        assert_eq!(set[&Metric::Sum], dec!(2900));
        assert_eq!(set[&Metric::Count], dec!(5));
        assert_eq!(set[&Metric::Average], dec!(580));
        assert_eq!(set[&Metric::Min], dec!(100));
        assert_eq!(set[&Metric::Max], dec!(1500));
        assert_eq!(set[&Metric::Median], dec!(300));
        assert_eq!(set[&Metric::PercentOfTotal], dec!(50));
        assert_eq!(round_percent(set[&Metric::PercentOfIncome]), dec!(49.5));
    }

    #[test]
    fn test_empty_group_is_all_zero() {
        let set = compute(&[], &Metric::ALL, Decimal::ZERO, Decimal::ZERO);
        assert!(set.values().all(Decimal::is_zero));
    }

    #[test]
    fn test_only_requested_metrics() {
        let set = compute(&[dec!(1)], &[Metric::Sum, Metric::Median], dec!(1), dec!(1));
        assert_eq!(set.len(), 2);
        assert!(!set.contains_key(&Metric::Count));
    }

    #[test]
    fn test_round_metrics() {
        let mut set = MetricSet::new();
        set.insert(Metric::Average, dec!(1.005));
        set.insert(Metric::PercentOfTotal, dec!(33.333));
        set.insert(Metric::Count, dec!(3));
        let rounded = round_metrics(&set);
        assert_eq!(rounded[&Metric::Average], dec!(1.00));
        assert_eq!(rounded[&Metric::PercentOfTotal], dec!(33.3));
        assert_eq!(rounded[&Metric::Count], dec!(3));
    }

    #[test]
    fn test_parse_metric() {
        assert_eq!("percent_of_income".parse::<Metric>().unwrap(), Metric::PercentOfIncome);
        assert!("mode".parse::<Metric>().is_err());
    }
}
