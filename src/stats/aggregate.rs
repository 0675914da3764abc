use serde::Serialize;
use utoipa::ToSchema;

use crate::model::advance::{AdvanceStatus, SalaryAdvance};
use crate::model::attendance::{AttendanceRecord, DayStatus};

/// Per-employee totals over a date range, typically one week.
///
/// `remaining_amount` is what is still owed: the realized amount minus the
/// advances that count against it (Approved and Paid). An empty range yields
/// all-zero totals and `is_fully_paid = false`; a week with no rows has not
/// been paid, it just has nothing to pay.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyStats {
    #[schema(example = 5)]
    pub total_days: u32,
    #[schema(example = 4)]
    pub present_days: u32,
    #[schema(example = 0)]
    pub absent_days: u32,
    #[schema(example = 1)]
    pub rest_days: u32,
    #[schema(example = 250.0)]
    pub total_amount: f64,
    #[schema(example = 200.0)]
    pub total_salary: f64,
    #[schema(example = 40.0)]
    pub total_advances: f64,
    #[schema(example = 0.0)]
    pub pending_advances: f64,
    #[schema(example = 40.0)]
    pub approved_advances: f64,
    #[schema(example = 210.0)]
    pub remaining_amount: f64,
    pub is_fully_paid: bool,
}

/// Folds one employee's attendance rows and salary advances into weekly
/// totals. Pure: same input, same output.
pub fn aggregate(
    records: &[AttendanceRecord],
    daily_rate: f64,
    advances: &[SalaryAdvance],
) -> WeeklyStats {
    let mut present_days = 0u32;
    let mut absent_days = 0u32;
    let mut rest_days = 0u32;
    let mut total_amount = 0.0f64;

    for record in records {
        match record.day_status.parse::<DayStatus>() {
            Ok(DayStatus::Present) => present_days += 1,
            Ok(DayStatus::Absent) => absent_days += 1,
            Ok(DayStatus::Rest) => rest_days += 1,
            Err(_) => {}
        }
        total_amount += record.amount;
    }

    let mut total_advances = 0.0f64;
    let mut pending_advances = 0.0f64;
    let mut approved_advances = 0.0f64;

    for advance in advances {
        match advance.status.parse::<AdvanceStatus>() {
            Ok(status) if status.counts_against_owed() => {
                total_advances += advance.amount;
                if status == AdvanceStatus::Approved {
                    approved_advances += advance.amount;
                }
            }
            Ok(AdvanceStatus::Pending) => pending_advances += advance.amount,
            _ => {}
        }
    }

    WeeklyStats {
        total_days: records.len() as u32,
        present_days,
        absent_days,
        rest_days,
        total_amount,
        total_salary: present_days as f64 * daily_rate,
        total_advances,
        pending_advances,
        approved_advances,
        remaining_amount: total_amount - total_advances,
        is_fully_paid: !records.is_empty() && records.iter().all(|r| r.paid),
    }
}

/// Attendance statistics over an arbitrary period, with a presence rate.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStats {
    pub total_days: u32,
    pub present_days: u32,
    pub absent_days: u32,
    pub rest_days: u32,
    /// Percentage of tracked days marked Present, rounded to 2 decimals.
    #[schema(example = 80.0)]
    pub attendance_rate: f64,
    pub total_amount: f64,
    pub total_salary: f64,
}

pub fn attendance_stats(records: &[AttendanceRecord], daily_rate: f64) -> AttendanceStats {
    let totals = aggregate(records, daily_rate, &[]);

    let attendance_rate = if totals.total_days > 0 {
        round2(totals.present_days as f64 / totals.total_days as f64 * 100.0)
    } else {
        0.0
    };

    AttendanceStats {
        total_days: totals.total_days,
        present_days: totals.present_days,
        absent_days: totals.absent_days,
        rest_days: totals.rest_days,
        attendance_rate,
        total_amount: totals.total_amount,
        total_salary: totals.total_salary,
    }
}

/// One week's slice of a longer period, for per-week breakdown views.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeekBreakdown {
    #[schema(example = "2026-08-24", value_type = String, format = "date")]
    pub week_start: chrono::NaiveDate,
    pub days: u32,
    pub present_days: u32,
    pub absent_days: u32,
    pub rest_days: u32,
    pub total_amount: f64,
    pub total_salary: f64,
}

/// Groups attendance rows by their Monday-start week, in chronological order.
pub fn weekly_breakdown(records: &[AttendanceRecord], daily_rate: f64) -> Vec<WeekBreakdown> {
    use std::collections::BTreeMap;

    let mut weeks: BTreeMap<chrono::NaiveDate, Vec<AttendanceRecord>> = BTreeMap::new();
    for record in records {
        weeks
            .entry(crate::stats::period::week_start(record.date))
            .or_default()
            .push(record.clone());
    }

    weeks
        .into_iter()
        .map(|(week_start, rows)| {
            let totals = aggregate(&rows, daily_rate, &[]);
            WeekBreakdown {
                week_start,
                days: totals.total_days,
                present_days: totals.present_days,
                absent_days: totals.absent_days,
                rest_days: totals.rest_days,
                total_amount: totals.total_amount,
                total_salary: totals.total_salary,
            }
        })
        .collect()
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(day: u32, status: &str, amount: f64, paid: bool) -> AttendanceRecord {
        AttendanceRecord {
            id: day as u64,
            employee_id: 1,
            date: NaiveDate::from_ymd_opt(2026, 8, day).unwrap(),
            day_status: status.to_string(),
            shift: None,
            amount,
            paid,
            paid_at: None,
        }
    }

    fn advance(amount: f64, status: &str) -> SalaryAdvance {
        SalaryAdvance {
            id: 1,
            employee_id: 1,
            amount,
            date: NaiveDate::from_ymd_opt(2026, 8, 20).unwrap(),
            description: None,
            status: status.to_string(),
            created_at: None,
        }
    }

    #[test]
    fn empty_range_is_all_zero_and_unpaid() {
        let stats = aggregate(&[], 50.0, &[]);
        assert_eq!(stats.total_days, 0);
        assert_eq!(stats.total_amount, 0.0);
        assert_eq!(stats.total_salary, 0.0);
        assert_eq!(stats.remaining_amount, 0.0);
        assert!(!stats.is_fully_paid);
    }

    #[test]
    fn day_counts_partition_the_range() {
        let records = vec![
            record(17, "Present", 60.0, false),
            record(18, "Absent", 0.0, false),
            record(19, "Rest", 0.0, false),
            record(20, "Present", 70.0, false),
        ];
        let stats = aggregate(&records, 50.0, &[]);
        assert_eq!(
            stats.present_days + stats.absent_days + stats.rest_days,
            stats.total_days
        );
    }

    #[test]
    fn week_of_four_present_days_with_an_approved_advance() {
        // rate 50, 4 Present + 1 Rest, amounts [60,55,0,70,65], advance 40
        let records = vec![
            record(17, "Present", 60.0, false),
            record(18, "Present", 55.0, false),
            record(19, "Rest", 0.0, false),
            record(20, "Present", 70.0, false),
            record(21, "Present", 65.0, false),
        ];
        let advances = vec![advance(40.0, "Approved")];

        let stats = aggregate(&records, 50.0, &advances);
        assert_eq!(stats.total_days, 5);
        assert_eq!(stats.present_days, 4);
        assert_eq!(stats.rest_days, 1);
        assert_eq!(stats.total_salary, 200.0);
        assert_eq!(stats.total_amount, 250.0);
        assert_eq!(stats.total_advances, 40.0);
        assert_eq!(stats.approved_advances, 40.0);
        assert_eq!(stats.remaining_amount, 210.0);
    }

    #[test]
    fn only_approved_and_paid_advances_count_against_owed() {
        let records = vec![record(17, "Present", 100.0, false)];
        let advances = vec![
            advance(10.0, "Pending"),
            advance(20.0, "Approved"),
            advance(30.0, "Rejected"),
            advance(40.0, "Paid"),
        ];

        let stats = aggregate(&records, 50.0, &advances);
        assert_eq!(stats.total_advances, 60.0);
        assert_eq!(stats.pending_advances, 10.0);
        assert_eq!(stats.approved_advances, 20.0);
        assert_eq!(stats.remaining_amount, 40.0);
    }

    #[test]
    fn fully_paid_requires_every_row_paid() {
        let mut records = vec![
            record(17, "Present", 60.0, true),
            record(18, "Present", 55.0, true),
        ];
        assert!(aggregate(&records, 50.0, &[]).is_fully_paid);

        records.push(record(19, "Present", 70.0, false));
        assert!(!aggregate(&records, 50.0, &[]).is_fully_paid);
    }

    #[test]
    fn aggregate_is_idempotent() {
        let records = vec![
            record(17, "Present", 60.0, false),
            record(18, "Absent", 0.0, false),
        ];
        let advances = vec![advance(15.0, "Paid")];
        assert_eq!(
            aggregate(&records, 50.0, &advances),
            aggregate(&records, 50.0, &advances)
        );
    }

    #[test]
    fn attendance_rate_is_rounded_percentage() {
        let records = vec![
            record(17, "Present", 60.0, false),
            record(18, "Present", 55.0, false),
            record(19, "Absent", 0.0, false),
        ];
        let stats = attendance_stats(&records, 50.0);
        assert_eq!(stats.attendance_rate, 66.67);

        assert_eq!(attendance_stats(&[], 50.0).attendance_rate, 0.0);
    }

    #[test]
    fn breakdown_groups_by_monday_week() {
        // Aug 2026: the 21st is a Friday, the 24th the following Monday.
        let records = vec![
            record(21, "Present", 60.0, false),
            record(24, "Present", 55.0, false),
            record(25, "Rest", 0.0, false),
        ];
        let weeks = weekly_breakdown(&records, 50.0);
        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0].week_start, NaiveDate::from_ymd_opt(2026, 8, 17).unwrap());
        assert_eq!(weeks[0].days, 1);
        assert_eq!(weeks[1].week_start, NaiveDate::from_ymd_opt(2026, 8, 24).unwrap());
        assert_eq!(weeks[1].days, 2);
        assert_eq!(weeks[1].total_salary, 50.0);
    }
}
