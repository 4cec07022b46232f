//! Splits a range into contiguous calendar buckets.

use chrono::NaiveDate;

use super::calendar::{add_days, add_months, month_start, week_start};
use super::error::PeriodError;
use super::types::{Granularity, Period, PeriodBucket, WeekStart};

/// Generates ordered, gap-free time-series buckets.
#[derive(Debug, Clone, Copy, Default)]
pub struct PeriodBucketer {
    week_start: WeekStart,
}

impl PeriodBucketer {
    /// Creates a bucketer using the given week convention.
    #[must_use]
    pub const fn new(week_start: WeekStart) -> Self {
        Self { week_start }
    }

    /// Calendar start of the bucket that contains `date`.
    #[must_use]
    pub fn bucket_start(&self, date: NaiveDate, granularity: Granularity) -> NaiveDate {
        match granularity {
            Granularity::Day => date,
            Granularity::Week => week_start(date, self.week_start),
            Granularity::Month => month_start(date),
        }
    }

    /// Stable key of the bucket that contains `date`.
    ///
    /// Keys are the ISO date of the calendar bucket start, so a key computed
    /// for a ledger entry always matches the key of the generated bucket,
    /// including partial first and last buckets.
    #[must_use]
    pub fn key_for(&self, date: NaiveDate, granularity: Granularity) -> String {
        self.bucket_start(date, granularity)
            .format("%Y-%m-%d")
            .to_string()
    }

    /// Buckets covering `range` exactly once each day.
    ///
    /// The first bucket starts at `range.start` and the last one ends at
    /// `range.end`, even when those fall inside a calendar unit.
    pub fn generate(
        &self,
        range: &Period,
        granularity: Granularity,
    ) -> Result<Vec<PeriodBucket>, PeriodError> {
        let mut buckets = Vec::new();
        let mut cursor = self.bucket_start(range.start, granularity);

        while cursor <= range.end {
            let next = match granularity {
                Granularity::Day => add_days(cursor, 1)?,
                Granularity::Week => add_days(cursor, 7)?,
                Granularity::Month => add_months(cursor, 1)?,
            };
            let unit_end = add_days(next, -1)?;

            let start = cursor.max(range.start);
            let end = unit_end.min(range.end);
            buckets.push(PeriodBucket {
                key: cursor.format("%Y-%m-%d").to_string(),
                label: label_for(cursor, granularity),
                start,
                end,
            });

            cursor = next;
        }

        Ok(buckets)
    }
}

fn label_for(bucket_start: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Day | Granularity::Week => bucket_start.format("%b %-d").to_string(),
        Granularity::Month => bucket_start.format("%b %Y").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_daily_buckets_one_per_day() {
        let range = Period::new(d(2025, 1, 1), d(2025, 1, 31)).unwrap();
        let buckets = PeriodBucketer::default()
            .generate(&range, Granularity::Day)
            .unwrap();

        assert_eq!(buckets.len(), 31);
        assert_eq!(buckets[0].key, "2025-01-01");
        assert_eq!(buckets[0].label, "Jan 1");
        assert_eq!(buckets[30].key, "2025-01-31");
        assert!(buckets.iter().all(|b| b.start == b.end));
    }

    #[test]
    fn test_weekly_buckets_clip_to_range() {
        // 2025-01-01 is a Wednesday; the Sunday week starts 2024-12-29.
        let range = Period::new(d(2025, 1, 1), d(2025, 1, 15)).unwrap();
        let buckets = PeriodBucketer::new(WeekStart::Sunday)
            .generate(&range, Granularity::Week)
            .unwrap();

        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0].key, "2024-12-29");
        assert_eq!(buckets[0].label, "Dec 29");
        assert_eq!((buckets[0].start, buckets[0].end), (d(2025, 1, 1), d(2025, 1, 4)));
        assert_eq!((buckets[1].start, buckets[1].end), (d(2025, 1, 5), d(2025, 1, 11)));
        assert_eq!((buckets[2].start, buckets[2].end), (d(2025, 1, 12), d(2025, 1, 15)));
    }

    #[test]
    fn test_monday_weeks() {
        let range = Period::new(d(2025, 1, 1), d(2025, 1, 7)).unwrap();
        let buckets = PeriodBucketer::new(WeekStart::Monday)
            .generate(&range, Granularity::Week)
            .unwrap();

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].key, "2024-12-30");
        assert_eq!(buckets[1].key, "2025-01-06");
    }

    #[test]
    fn test_monthly_buckets_partial_edges() {
        let range = Period::new(d(2024, 11, 15), d(2025, 2, 10)).unwrap();
        let buckets = PeriodBucketer::default()
            .generate(&range, Granularity::Month)
            .unwrap();

        let keys: Vec<_> = buckets.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, ["2024-11-01", "2024-12-01", "2025-01-01", "2025-02-01"]);
        assert_eq!(buckets[0].label, "Nov 2024");
        assert_eq!(buckets[0].start, d(2024, 11, 15));
        assert_eq!(buckets[1].end, d(2024, 12, 31));
        assert_eq!(buckets[3].end, d(2025, 2, 10));
    }

    #[test]
    fn test_key_for_matches_generated_bucket() {
        let bucketer = PeriodBucketer::default();
        let range = Period::new(d(2025, 1, 1), d(2025, 3, 31)).unwrap();

        for granularity in [Granularity::Day, Granularity::Week, Granularity::Month] {
            let buckets = bucketer.generate(&range, granularity).unwrap();
            for day in range.days() {
                let key = bucketer.key_for(day, granularity);
                let bucket = buckets.iter().find(|b| b.key == key).unwrap();
                assert!(bucket.start <= day && day <= bucket.end);
            }
        }
    }
}
