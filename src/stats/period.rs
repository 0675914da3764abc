use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Calendar bucket size for trend charts and payment summaries. Weeks start
/// on Monday everywhere.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Display, EnumString, ToSchema)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Period {
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl Period {
    /// Parses a `period` query parameter, falling back to `default` for
    /// anything unrecognized or absent.
    pub fn from_param(value: Option<&str>, default: Period) -> Period {
        value.and_then(|v| v.parse().ok()).unwrap_or(default)
    }

    /// Chart granularity inside one period: short periods chart per day,
    /// long ones per month.
    pub fn chart_step(self) -> Period {
        match self {
            Period::Day | Period::Week | Period::Month => Period::Day,
            Period::Quarter | Period::Year => Period::Month,
        }
    }
}

pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.week(Weekday::Mon).first_day()
}

/// First day of the bucket containing `date`.
pub fn start_of(period: Period, date: NaiveDate) -> NaiveDate {
    match period {
        Period::Day => date,
        Period::Week => week_start(date),
        Period::Month => NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date),
        Period::Quarter => {
            let month = (date.month0() / 3) * 3 + 1;
            NaiveDate::from_ymd_opt(date.year(), month, 1).unwrap_or(date)
        }
        Period::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
    }
}

/// First day of the bucket after the one starting at `start`.
pub fn next_start(period: Period, start: NaiveDate) -> NaiveDate {
    match period {
        Period::Day => start + Duration::days(1),
        Period::Week => start + Duration::days(7),
        Period::Month => add_months(start, 1),
        Period::Quarter => add_months(start, 3),
        Period::Year => {
            NaiveDate::from_ymd_opt(start.year() + 1, 1, 1).unwrap_or(start)
        }
    }
}

/// Last day of the bucket containing `date`.
pub fn end_of(period: Period, date: NaiveDate) -> NaiveDate {
    next_start(period, start_of(period, date)) - Duration::days(1)
}

fn add_months(start: NaiveDate, months: u32) -> NaiveDate {
    let zero_based = start.month0() + months;
    let year = start.year() + (zero_based / 12) as i32;
    let month = zero_based % 12 + 1;
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(start)
}

/// Every bucket start covering `[from, to]`, in chronological order. Empty
/// buckets are enumerated too, so charts get a contiguous axis.
pub fn enumerate_buckets(period: Period, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    let mut starts = Vec::new();
    let mut cursor = start_of(period, from);
    while cursor <= to {
        starts.push(cursor);
        cursor = next_start(period, cursor);
    }
    starts
}

/// Human label for a bucket, keyed by period size.
pub fn bucket_label(period: Period, start: NaiveDate) -> String {
    match period {
        Period::Day => start.format("%d/%m").to_string(),
        Period::Week => format!("Week of {}", start.format("%d/%m")),
        Period::Month => start.format("%B %Y").to_string(),
        Period::Quarter => format!("Q{} {}", start.month0() / 3 + 1, start.year()),
        Period::Year => start.year().to_string(),
    }
}

/// One paid attendance row flattened for bucketing.
#[derive(Debug, Clone)]
pub struct PaidRow {
    pub date: NaiveDate,
    pub employee_id: u64,
    pub amount: f64,
    pub daily_rate: f64,
}

/// Per-bucket payment totals for the salary-payments view.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBucket {
    /// Bucket start date, the stable sort key.
    #[schema(example = "2026-08-24", value_type = String, format = "date")]
    pub period: NaiveDate,
    #[schema(example = "Week of 24/08")]
    pub label: String,
    pub total_salary: f64,
    pub total_amount: f64,
    pub employee_count: u32,
    pub employees: Vec<u64>,
}

/// Buckets paid rows over `[from, to]`. Buckets are pre-enumerated: a span
/// with no payments still shows up with zero totals. Rows outside the span
/// are dropped.
pub fn bucket_payments(
    period: Period,
    from: NaiveDate,
    to: NaiveDate,
    rows: &[PaidRow],
) -> Vec<PaymentBucket> {
    use std::collections::BTreeSet;

    let starts = enumerate_buckets(period, from, to);
    let mut buckets: Vec<(PaymentBucket, BTreeSet<u64>)> = starts
        .into_iter()
        .map(|start| {
            (
                PaymentBucket {
                    period: start,
                    label: bucket_label(period, start),
                    total_salary: 0.0,
                    total_amount: 0.0,
                    employee_count: 0,
                    employees: Vec::new(),
                },
                BTreeSet::new(),
            )
        })
        .collect();

    for row in rows {
        let start = start_of(period, row.date);
        if let Some((bucket, ids)) = buckets.iter_mut().find(|(b, _)| b.period == start) {
            bucket.total_salary += row.daily_rate;
            bucket.total_amount += row.amount;
            ids.insert(row.employee_id);
        }
    }

    buckets
        .into_iter()
        .map(|(mut bucket, ids)| {
            bucket.employee_count = ids.len() as u32;
            bucket.employees = ids.into_iter().collect();
            bucket
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn weeks_start_on_monday() {
        assert_eq!(week_start(d(2026, 8, 25)), d(2026, 8, 24));
        assert_eq!(week_start(d(2026, 8, 24)), d(2026, 8, 24));
        assert_eq!(week_start(d(2026, 8, 23)), d(2026, 8, 17));
    }

    #[test]
    fn bucket_boundaries() {
        assert_eq!(start_of(Period::Month, d(2026, 8, 25)), d(2026, 8, 1));
        assert_eq!(end_of(Period::Month, d(2026, 8, 25)), d(2026, 8, 31));
        assert_eq!(start_of(Period::Quarter, d(2026, 8, 25)), d(2026, 7, 1));
        assert_eq!(end_of(Period::Quarter, d(2026, 8, 25)), d(2026, 9, 30));
        assert_eq!(start_of(Period::Year, d(2026, 8, 25)), d(2026, 1, 1));
        assert_eq!(end_of(Period::Year, d(2026, 8, 25)), d(2026, 12, 31));
        assert_eq!(end_of(Period::Week, d(2026, 8, 25)), d(2026, 8, 30));
    }

    #[test]
    fn december_rolls_into_next_year() {
        assert_eq!(next_start(Period::Month, d(2026, 12, 1)), d(2027, 1, 1));
        assert_eq!(next_start(Period::Quarter, d(2026, 10, 1)), d(2027, 1, 1));
    }

    #[test]
    fn enumerate_covers_the_whole_range() {
        let weeks = enumerate_buckets(Period::Week, d(2026, 8, 1), d(2026, 8, 31));
        // The week containing Aug 1 starts in July.
        assert_eq!(weeks.first(), Some(&d(2026, 7, 27)));
        assert_eq!(weeks.last(), Some(&d(2026, 8, 31)));
        assert_eq!(weeks.len(), 6);

        let months = enumerate_buckets(Period::Month, d(2026, 1, 15), d(2026, 3, 2));
        assert_eq!(months, vec![d(2026, 1, 1), d(2026, 2, 1), d(2026, 3, 1)]);
    }

    #[test]
    fn parse_period_param() {
        assert_eq!(Period::from_param(Some("week"), Period::Month), Period::Week);
        assert_eq!(Period::from_param(Some("QUARTER"), Period::Week), Period::Quarter);
        assert_eq!(Period::from_param(Some("decade"), Period::Month), Period::Month);
        assert_eq!(Period::from_param(None, Period::Year), Period::Year);
    }

    #[test]
    fn empty_buckets_are_pre_enumerated() {
        let rows = vec![PaidRow {
            date: d(2026, 8, 5),
            employee_id: 1,
            amount: 60.0,
            daily_rate: 50.0,
        }];
        let buckets = bucket_payments(Period::Week, d(2026, 8, 3), d(2026, 8, 16), &rows);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].total_amount, 60.0);
        assert_eq!(buckets[0].employee_count, 1);
        assert_eq!(buckets[1].total_amount, 0.0);
        assert_eq!(buckets[1].employee_count, 0);
    }

    #[test]
    fn rows_outside_the_span_are_dropped() {
        let rows = vec![
            PaidRow { date: d(2026, 7, 30), employee_id: 1, amount: 10.0, daily_rate: 50.0 },
            PaidRow { date: d(2026, 8, 5), employee_id: 2, amount: 20.0, daily_rate: 45.0 },
        ];
        let buckets = bucket_payments(Period::Month, d(2026, 8, 1), d(2026, 8, 31), &rows);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].total_amount, 20.0);
        assert_eq!(buckets[0].employees, vec![2]);
    }

    #[test]
    fn distinct_employees_counted_once_per_bucket() {
        let rows = vec![
            PaidRow { date: d(2026, 8, 3), employee_id: 1, amount: 60.0, daily_rate: 50.0 },
            PaidRow { date: d(2026, 8, 4), employee_id: 1, amount: 55.0, daily_rate: 50.0 },
            PaidRow { date: d(2026, 8, 5), employee_id: 2, amount: 70.0, daily_rate: 45.0 },
        ];
        let buckets = bucket_payments(Period::Week, d(2026, 8, 3), d(2026, 8, 9), &rows);
        assert_eq!(buckets[0].employee_count, 2);
        assert_eq!(buckets[0].total_salary, 145.0);
        assert_eq!(buckets[0].total_amount, 185.0);
    }
}
