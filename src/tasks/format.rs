use chrono::{DateTime, NaiveDate};
use serde::Serialize;

use crate::store::{Task, TaskId};

pub const CANONICAL_DATE: &str = "%Y-%m-%d";

/// Exact values that render as an upper bound rather than a bare amount.
pub const DURATION_BOUND_MINUTES: u32 = 15;
pub const COST_BOUND: u32 = 1000;

/// Rewrites a stored due date as `YYYY-MM-DD`.
///
/// Accepted encodings, tried in order: plain date, RFC 3339, an offset-aware
/// `T` timestamp, and Postgres timestamp text. All of them start with a
/// zero-padded `YYYY-MM-DD`. Anything else, including padded or unpadded
/// variants, is returned as is.
pub fn normalize_due_date(raw: &str) -> String {
    if !has_fixed_width_date(raw) {
        return raw.to_string();
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, CANONICAL_DATE) {
        return date.format(CANONICAL_DATE).to_string();
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.date_naive().format(CANONICAL_DATE).to_string();
    }

    for layout in ["%Y-%m-%dT%H:%M:%S%:z", "%Y-%m-%d %H:%M:%S%.f%#z"] {
        if let Ok(ts) = DateTime::parse_from_str(raw, layout) {
            return ts.date_naive().format(CANONICAL_DATE).to_string();
        }
    }

    raw.to_string()
}

/// `NNNN-NN-NN` at the very start; chrono alone would accept `2025-1-2`.
fn has_fixed_width_date(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() >= 10
        && bytes[..10].iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

pub fn duration_label(minutes: u32) -> String {
    if minutes == DURATION_BOUND_MINUTES {
        format!("{minutes}分以内")
    } else {
        format!("{minutes}分")
    }
}

pub fn cost_label(cost: u32) -> String {
    if cost == COST_BOUND {
        format!("{cost}円以内")
    } else {
        format!("{cost}円")
    }
}

/// A task plus the strings the pages show for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskView {
    pub id: TaskId,
    pub description: String,
    pub due: String,
    pub due_formatted: String,
    pub duration_minutes: u32,
    pub duration_label: String,
    pub cost: u32,
    pub cost_label: String,
    pub done: bool,
}

impl From<Task> for TaskView {
    fn from(task: Task) -> Self {
        TaskView {
            id: task.id,
            due_formatted: normalize_due_date(&task.due),
            duration_label: duration_label(task.duration_minutes),
            cost_label: cost_label(task.cost),
            description: task.description,
            due: task.due,
            duration_minutes: task.duration_minutes,
            cost: task.cost,
            done: task.done,
        }
    }
}
