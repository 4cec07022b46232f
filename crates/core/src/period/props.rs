//! Property-based tests for period resolution and bucketing.

use chrono::{Datelike, NaiveDate};
use proptest::prelude::*;

use super::bucketer::PeriodBucketer;
use super::resolver::PeriodResolver;
use super::types::{
    ComparisonKind, Granularity, ParseMode, Period, PeriodSpec, PeriodType, WeekStart,
};

/// Strategy to generate dates between 2000-01-01 and roughly 2049.
fn any_date() -> impl Strategy<Value = NaiveDate> {
    (0i64..18_000).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2000, 1, 1).unwrap() + chrono::Duration::days(offset)
    })
}

/// Strategy to generate ranges of 1 to 400 days.
fn any_range() -> impl Strategy<Value = Period> {
    (any_date(), 0i64..400).prop_map(|(start, len)| {
        Period::new(start, start + chrono::Duration::days(len)).unwrap()
    })
}

fn granularity() -> impl Strategy<Value = Granularity> {
    prop_oneof![
        Just(Granularity::Day),
        Just(Granularity::Week),
        Just(Granularity::Month),
    ]
}

fn week_start() -> impl Strategy<Value = WeekStart> {
    prop_oneof![Just(WeekStart::Sunday), Just(WeekStart::Monday)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Buckets are ordered, contiguous, and their union is exactly the range.
    #[test]
    fn prop_buckets_tile_range(
        range in any_range(),
        granularity in granularity(),
        week_start in week_start(),
    ) {
        let buckets = PeriodBucketer::new(week_start).generate(&range, granularity).unwrap();

        prop_assert!(!buckets.is_empty());
        prop_assert_eq!(buckets[0].start, range.start);
        prop_assert_eq!(buckets[buckets.len() - 1].end, range.end);
        for pair in buckets.windows(2) {
            prop_assert_eq!(pair[0].end.succ_opt().unwrap(), pair[1].start);
            prop_assert!(pair[0].key < pair[1].key);
        }
        let covered: i64 = buckets.iter().map(|b| (b.end - b.start).num_days() + 1).sum();
        prop_assert_eq!(covered, range.duration_days());
    }

    /// The previous period has the same length and ends the day before.
    #[test]
    fn prop_previous_period_adjacent_same_length(range in any_range()) {
        let prev = PeriodResolver::comparison_range(&range, ComparisonKind::PreviousPeriod)
            .unwrap()
            .unwrap();

        prop_assert_eq!(prev.duration_days(), range.duration_days());
        prop_assert_eq!(prev.end.succ_opt().unwrap(), range.start);
    }

    /// Same period last year keeps month and day, except Feb 29 which clamps.
    #[test]
    fn prop_same_period_last_year(range in any_range()) {
        let last = PeriodResolver::comparison_range(&range, ComparisonKind::SamePeriodLastYear)
            .unwrap()
            .unwrap();

        for (now, then) in [(range.start, last.start), (range.end, last.end)] {
            prop_assert_eq!(then.year(), now.year() - 1);
            prop_assert_eq!(then.month(), now.month());
            if now.month() == 2 && now.day() == 29 {
                prop_assert_eq!(then.day(), 28);
            } else {
                prop_assert_eq!(then.day(), now.day());
            }
        }
    }

    /// Month sparklines are full, consecutive calendar months ending with the current one.
    #[test]
    fn prop_month_sparkline_full_months(today in any_date(), count in 1usize..13) {
        let resolver = PeriodResolver::new(ParseMode::Strict, today);
        let current = resolver
            .resolve(&PeriodSpec { period_type: PeriodType::Month, ..PeriodSpec::default() })
            .unwrap();
        let periods = resolver.sparkline_periods(&current, count).unwrap();

        prop_assert_eq!(periods.len(), count);
        prop_assert_eq!(periods[count - 1], current.range);
        for period in &periods {
            prop_assert_eq!(period.start.day(), 1);
            prop_assert_eq!(period.end.succ_opt().unwrap().day(), 1);
        }
        for pair in periods.windows(2) {
            prop_assert_eq!(pair[0].end.succ_opt().unwrap(), pair[1].start);
        }
    }
}
