//! # Statistics Aggregation
//!
//! Pure functions over a snapshot of visible tasks: count breakdowns by
//! quadrant and status, and a deadline-proximity report for pending work.
//! No storage access happens here; handlers fetch the visible snapshot and
//! pass it in.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::Task;
use crate::quadrant::{days_remaining, Quadrant};

/// Aggregate counts over a task snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub by_quadrant: QuadrantCounts,
    pub by_status: StatusCounts,
}

/// Per-quadrant counts. All four keys are always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuadrantCounts {
    #[serde(rename = "Q1")]
    pub q1: usize,
    #[serde(rename = "Q2")]
    pub q2: usize,
    #[serde(rename = "Q3")]
    pub q3: usize,
    #[serde(rename = "Q4")]
    pub q4: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub completed: usize,
    pub pending: usize,
}

/// One pending task in the deadline report. `days_left` is floored whole
/// days and negative when overdue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeadlineEntry {
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub days_left: i64,
}

/// Single O(n) pass over the snapshot.
pub fn aggregate(tasks: &[Task]) -> TaskStats {
    let mut by_quadrant = QuadrantCounts::default();
    let mut by_status = StatusCounts::default();

    for task in tasks {
        match task.quadrant {
            Quadrant::Q1 => by_quadrant.q1 += 1,
            Quadrant::Q2 => by_quadrant.q2 += 1,
            Quadrant::Q3 => by_quadrant.q3 += 1,
            Quadrant::Q4 => by_quadrant.q4 += 1,
        }
        if task.completed {
            by_status.completed += 1;
        } else {
            by_status.pending += 1;
        }
    }

    TaskStats {
        total: tasks.len(),
        by_quadrant,
        by_status,
    }
}

/// Remaining-days report for pending tasks, in snapshot order.
pub fn deadline_report(tasks: &[Task], now: DateTime<Utc>) -> Vec<DeadlineEntry> {
    tasks
        .iter()
        .filter(|task| !task.completed)
        .map(|task| DeadlineEntry {
            title: task.title.clone(),
            description: task.description.clone(),
            created_at: task.created_at,
            days_left: days_remaining(task.deadline_at, now),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskDraft;
    use chrono::Duration;
    use proptest::prelude::*;

    fn task(id: i64, important: bool, days_out: i64, completed: bool) -> Task {
        let now = Utc::now();
        let mut task = Task::from_draft(
            id,
            1,
            TaskDraft {
                title: format!("task {id}"),
                description: None,
                is_important: important,
                deadline_at: now + Duration::days(days_out),
            },
            now,
        );
        if completed {
            task.completed = true;
            task.completed_at = Some(now);
        }
        task
    }

    #[test]
    fn test_aggregate_counts_by_quadrant_and_status() {
        let tasks = vec![
            task(1, true, 1, false),   // Q1
            task(2, true, 30, false),  // Q2
            task(3, false, 1, true),   // Q3
            task(4, false, 30, false), // Q4
            task(5, true, 2, true),    // Q1
        ];

        let stats = aggregate(&tasks);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.by_quadrant.q1, 2);
        assert_eq!(stats.by_quadrant.q2, 1);
        assert_eq!(stats.by_quadrant.q3, 1);
        assert_eq!(stats.by_quadrant.q4, 1);
        assert_eq!(stats.by_status.completed, 2);
        assert_eq!(stats.by_status.pending, 3);
    }

    #[test]
    fn test_aggregate_empty_snapshot() {
        let stats = aggregate(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.by_quadrant, QuadrantCounts::default());
        assert_eq!(stats.by_status, StatusCounts::default());
    }

    #[test]
    fn test_quadrant_keys_always_serialized() {
        let json = serde_json::to_value(aggregate(&[])).unwrap();
        for key in ["Q1", "Q2", "Q3", "Q4"] {
            assert_eq!(json["by_quadrant"][key], 0);
        }
    }

    #[test]
    fn test_deadline_report_skips_completed() {
        let tasks = vec![task(1, true, 5, false), task(2, true, 5, true)];
        let report = deadline_report(&tasks, Utc::now());
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].title, "task 1");
    }

    #[test]
    fn test_deadline_report_negative_for_overdue() {
        let now = Utc::now();
        let tasks = vec![task(1, true, -2, false)];
        let report = deadline_report(&tasks, now);
        assert_eq!(report[0].days_left, -2);
    }

    proptest! {
        #[test]
        fn prop_aggregate_counts_are_consistent(
            shape in proptest::collection::vec((any::<bool>(), -10i64..60, any::<bool>()), 0..60)
        ) {
            let tasks: Vec<Task> = shape
                .iter()
                .enumerate()
                .map(|(i, (important, days_out, completed))| {
                    task(i as i64 + 1, *important, *days_out, *completed)
                })
                .collect();

            let stats = aggregate(&tasks);
            let quadrant_sum = stats.by_quadrant.q1
                + stats.by_quadrant.q2
                + stats.by_quadrant.q3
                + stats.by_quadrant.q4;

            prop_assert_eq!(stats.total, tasks.len());
            prop_assert_eq!(quadrant_sum, stats.total);
            prop_assert_eq!(stats.by_status.completed + stats.by_status.pending, stats.total);
        }
    }
}
