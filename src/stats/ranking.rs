use serde::Serialize;
use utoipa::ToSchema;

use crate::stats::aggregate::round2;

/// How many employees the leaderboard shows.
pub const LEADERBOARD_SIZE: usize = 5;

/// One employee's score over a ranking period.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeScore {
    #[schema(example = 1)]
    pub employee_id: u64,
    #[schema(example = "Aicha")]
    pub first_name: String,
    #[schema(example = "Diallo")]
    pub last_name: String,
    #[schema(example = 5)]
    pub present_days: u32,
    #[schema(example = 300.0)]
    pub total_amount: f64,
}

/// Orders scores by present days descending, ties broken by realized amount
/// descending. The sort is stable, so fully tied scores keep their input
/// order and the winner is deterministic across runs.
pub fn rank(mut scores: Vec<EmployeeScore>) -> Vec<EmployeeScore> {
    scores.sort_by(|a, b| {
        b.present_days
            .cmp(&a.present_days)
            .then(b.total_amount.total_cmp(&a.total_amount))
    });
    scores
}

/// Global presence stats across the ranked set.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RankingSummary {
    #[schema(example = 8)]
    pub total_employees: u32,
    #[schema(example = 34)]
    pub total_present_days: u32,
    /// Rounded to 2 decimals.
    #[schema(example = 4.25)]
    pub average_present_days: f64,
}

pub fn summarize(scores: &[EmployeeScore]) -> RankingSummary {
    let total_present_days: u32 = scores.iter().map(|s| s.present_days).sum();
    let average = if scores.is_empty() {
        0.0
    } else {
        round2(total_present_days as f64 / scores.len() as f64)
    };

    RankingSummary {
        total_employees: scores.len() as u32,
        total_present_days,
        average_present_days: average,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(id: u64, present_days: u32, total_amount: f64) -> EmployeeScore {
        EmployeeScore {
            employee_id: id,
            first_name: format!("emp{id}"),
            last_name: String::new(),
            present_days,
            total_amount,
        }
    }

    #[test]
    fn more_present_days_wins() {
        let ranked = rank(vec![score(1, 3, 500.0), score(2, 5, 100.0)]);
        assert_eq!(ranked[0].employee_id, 2);
    }

    #[test]
    fn tie_on_days_broken_by_amount() {
        // Both at 5 present days, A realized 300 vs B 250.
        let ranked = rank(vec![score(2, 5, 250.0), score(1, 5, 300.0)]);
        assert_eq!(ranked[0].employee_id, 1);
        assert_eq!(ranked[1].employee_id, 2);
    }

    #[test]
    fn full_ties_keep_input_order() {
        let ranked = rank(vec![
            score(7, 4, 200.0),
            score(3, 4, 200.0),
            score(9, 4, 200.0),
        ]);
        let ids: Vec<u64> = ranked.iter().map(|s| s.employee_id).collect();
        assert_eq!(ids, vec![7, 3, 9]);
    }

    #[test]
    fn summary_averages_present_days() {
        let scores = vec![score(1, 5, 0.0), score(2, 4, 0.0), score(3, 1, 0.0)];
        let summary = summarize(&scores);
        assert_eq!(summary.total_employees, 3);
        assert_eq!(summary.total_present_days, 10);
        assert_eq!(summary.average_present_days, 3.33);
    }

    #[test]
    fn empty_set_summarizes_to_zero() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_employees, 0);
        assert_eq!(summary.average_present_days, 0.0);
    }
}
