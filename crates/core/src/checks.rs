//! Issue health checks
//!
//! Each check is a pure function from an enriched issue and a shared
//! reference instant to a [`CheckResult`]. Checks are independent of one
//! another, but [`builtin_checks`] fixes the registry order so that callers
//! see results (and first-failing reasons) in a stable sequence.
//!
//! Every decision table resolves to exactly one outcome; the first matching
//! guard wins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::issue::EnhancedIssue;
use crate::time::{
    difference_in_business_days, difference_in_calendar_months, format_distance,
    format_seconds_as_jira_duration, parse_jira_timestamp, subtract_business_days,
};

/// Outcome of a single check
///
/// `CantApply` marks an indeterminate situation (for example a stalled issue
/// with no discoverable transition date) and is deliberately distinct from
/// `Fail`.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    #[serde(rename = "cant apply")]
    CantApply,
    #[serde(rename = "not applied")]
    NotApplied,
    #[serde(rename = "ok")]
    Ok,
    #[serde(rename = "warn")]
    Warn,
    #[serde(rename = "fail")]
    Fail,
}

impl std::fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            CheckOutcome::CantApply => "cant apply",
            CheckOutcome::NotApplied => "not applied",
            CheckOutcome::Ok => "ok",
            CheckOutcome::Warn => "warn",
            CheckOutcome::Fail => "fail",
        };
        write!(f, "{text}")
    }
}

/// Result of evaluating one check against one issue
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CheckResult {
    pub description: String,
    pub outcome: CheckOutcome,
    /// At least one entry explaining the outcome.
    pub reasons: Vec<String>,
}

impl CheckResult {
    fn new(description: &str, outcome: CheckOutcome, reasons: Vec<String>) -> Self {
        Self {
            description: description.to_string(),
            outcome,
            reasons,
        }
    }

    fn ok(description: &str) -> Self {
        Self::new(description, CheckOutcome::Ok, vec!["ok".to_string()])
    }

    fn fail(description: &str, reason: String) -> Self {
        Self::new(description, CheckOutcome::Fail, vec![reason])
    }

    fn not_applied(description: &str, reason: &str) -> Self {
        Self::new(
            description,
            CheckOutcome::NotApplied,
            vec![reason.to_string()],
        )
    }

    fn cant_apply(description: &str, reason: &str) -> Self {
        Self::new(
            description,
            CheckOutcome::CantApply,
            vec![reason.to_string()],
        )
    }
}

/// A check function, closed over nothing but its inputs
///
/// Caller-supplied custom checks share this shape and are appended after the
/// built-in registry.
pub type CheckFn = fn(&EnhancedIssue, DateTime<Utc>) -> CheckResult;

/// The built-in registry, in its fixed evaluation order.
pub fn builtin_checks() -> Vec<CheckFn> {
    vec![
        check_comment_recency,
        check_description,
        check_in_progress_has_estimate,
        check_time_spent_within_estimate,
        check_not_stalled_for_more_than_a_day,
        check_not_stalled_for_more_than_a_week,
        check_not_in_backlog_for_too_long,
        check_dependency_has_due_date,
        check_dependency_due_date_not_passed,
        check_in_progress_has_recent_worklog,
        check_qa_impact_statement,
    ]
}

const DEPENDENCY: &str = "dependency";

fn is_dependency(issue: &EnhancedIssue) -> bool {
    issue.issue_type().as_deref() == Some(DEPENDENCY)
}

/// Column name when a board is known, raw status name otherwise, lowercased.
fn column_or_status(issue: &EnhancedIssue) -> String {
    issue
        .column
        .clone()
        .unwrap_or_else(|| issue.issue.fields.status.name.clone())
        .to_lowercase()
}

/// Issues being worked should have a comment newer than one business day.
pub fn check_comment_recency(issue: &EnhancedIssue, now: DateTime<Utc>) -> CheckResult {
    const DESCRIPTION: &str = "recent comments";

    if issue.closed {
        return CheckResult::not_applied(DESCRIPTION, "closed");
    }

    let time_spent = issue.aggregate_time_spent();
    let last_commented = issue
        .most_recent_comment
        .as_ref()
        .and_then(|c| parse_jira_timestamp(&c.created));

    match last_commented {
        None if issue.most_recent_comment.is_none() => {
            if !issue.in_progress && time_spent == 0 {
                CheckResult::not_applied(DESCRIPTION, "not in progress and no time logged")
            } else if issue.in_progress {
                CheckResult::fail(DESCRIPTION, "no comments, in progress".to_string())
            } else {
                CheckResult::fail(DESCRIPTION, "no comments, time logged".to_string())
            }
        }
        Some(commented)
            if commented < subtract_business_days(now, 1)
                && (issue.in_progress || time_spent > 0) =>
        {
            CheckResult::fail(
                DESCRIPTION,
                format!("last comment was {} ago", format_distance(commented, now)),
            )
        }
        _ => CheckResult::ok(DESCRIPTION),
    }
}

/// Issues should have a description.
pub fn check_description(issue: &EnhancedIssue, _now: DateTime<Utc>) -> CheckResult {
    const DESCRIPTION: &str = "has a description";

    match issue.description_text() {
        Some(text) if !text.trim().is_empty() => CheckResult::ok(DESCRIPTION),
        _ => CheckResult::fail(DESCRIPTION, "description is empty".to_string()),
    }
}

/// In-progress issues should carry an original estimate.
pub fn check_in_progress_has_estimate(issue: &EnhancedIssue, _now: DateTime<Utc>) -> CheckResult {
    const DESCRIPTION: &str = "in progress issues have estimates";

    if is_dependency(issue) {
        return CheckResult::not_applied(DESCRIPTION, "dependencies are not estimated");
    }
    if !issue.in_progress {
        return CheckResult::not_applied(DESCRIPTION, "not in progress");
    }

    if issue.original_estimate_seconds().unwrap_or(0) > 0 {
        CheckResult::ok(DESCRIPTION)
    } else {
        CheckResult::fail(DESCRIPTION, "no original estimate".to_string())
    }
}

/// Time spent on an in-progress issue should stay within 80% of the
/// original estimate.
pub fn check_time_spent_within_estimate(issue: &EnhancedIssue, _now: DateTime<Utc>) -> CheckResult {
    const DESCRIPTION: &str = "time spent within original estimate";

    if !issue.in_progress {
        return CheckResult::not_applied(DESCRIPTION, "not in progress");
    }

    let original = issue.original_estimate_seconds().unwrap_or(0);
    let spent = issue.time_spent_seconds().unwrap_or(0);

    if (spent as f64) > 0.8 * (original as f64) {
        CheckResult::fail(
            DESCRIPTION,
            format!(
                "time spent [{}] exceeds 80% of the original estimate [{}]",
                format_seconds_as_jira_duration(spent),
                format_seconds_as_jira_duration(original)
            ),
        )
    } else {
        CheckResult::ok(DESCRIPTION)
    }
}

fn check_not_stalled(
    issue: &EnhancedIssue,
    now: DateTime<Utc>,
    description: &str,
    threshold_business_days: i64,
    message: &str,
) -> CheckResult {
    if !issue.stalled {
        return CheckResult::not_applied(description, "not stalled");
    }

    let transitioned = issue
        .most_recent_transition
        .as_ref()
        .and_then(|t| parse_jira_timestamp(&t.created));

    match transitioned {
        None => CheckResult::cant_apply(
            description,
            "can't determine when the issue was last transitioned",
        ),
        Some(transitioned)
            if difference_in_business_days(now, transitioned) > threshold_business_days =>
        {
            CheckResult::fail(description, message.to_string())
        }
        Some(_) => CheckResult::ok(description),
    }
}

/// Stalled issues should be moved along within a business day.
pub fn check_not_stalled_for_more_than_a_day(
    issue: &EnhancedIssue,
    now: DateTime<Utc>,
) -> CheckResult {
    check_not_stalled(
        issue,
        now,
        "not stalled for more than a day",
        0,
        "stalled for more than one day",
    )
}

/// Stalled issues should never sit for a week.
pub fn check_not_stalled_for_more_than_a_week(
    issue: &EnhancedIssue,
    now: DateTime<Utc>,
) -> CheckResult {
    check_not_stalled(
        issue,
        now,
        "not stalled for more than a week",
        5,
        "stalled for more than one week",
    )
}

/// Backlog issues older than three calendar months should be triaged.
pub fn check_not_in_backlog_for_too_long(issue: &EnhancedIssue, now: DateTime<Utc>) -> CheckResult {
    const DESCRIPTION: &str = "not in the backlog for too long";

    if column_or_status(issue) != "backlog" {
        return CheckResult::not_applied(DESCRIPTION, "not in the backlog");
    }

    match issue.created() {
        None => CheckResult::cant_apply(DESCRIPTION, "can't determine when the issue was created"),
        Some(created) => {
            let months = difference_in_calendar_months(now, created);
            if months > 3 {
                CheckResult::fail(
                    DESCRIPTION,
                    format!("in backlog for too long [{months} months]"),
                )
            } else {
                CheckResult::ok(DESCRIPTION)
            }
        }
    }
}

/// Dependencies must carry a due date.
pub fn check_dependency_has_due_date(issue: &EnhancedIssue, _now: DateTime<Utc>) -> CheckResult {
    const DESCRIPTION: &str = "dependencies have a due date";

    if !is_dependency(issue) {
        return CheckResult::not_applied(DESCRIPTION, "not a dependency");
    }

    if issue.issue.fields.duedate.is_some() {
        CheckResult::ok(DESCRIPTION)
    } else {
        CheckResult::fail(DESCRIPTION, "dependency has no due date".to_string())
    }
}

/// Open dependencies must not outlive their due date.
pub fn check_dependency_due_date_not_passed(
    issue: &EnhancedIssue,
    now: DateTime<Utc>,
) -> CheckResult {
    const DESCRIPTION: &str = "dependency due dates have not passed";

    if !is_dependency(issue) {
        return CheckResult::not_applied(DESCRIPTION, "not a dependency");
    }
    if issue.closed {
        return CheckResult::not_applied(DESCRIPTION, "dependency is closed");
    }

    match issue.due_date() {
        None => CheckResult::not_applied(DESCRIPTION, "dependency has no due date"),
        Some(due) if due < now => {
            CheckResult::fail(DESCRIPTION, "due date has passed".to_string())
        }
        Some(_) => CheckResult::ok(DESCRIPTION),
    }
}

/// In-progress issues should have a worklog newer than one business day.
pub fn check_in_progress_has_recent_worklog(
    issue: &EnhancedIssue,
    now: DateTime<Utc>,
) -> CheckResult {
    const DESCRIPTION: &str = "in progress issues have a recent worklog";

    if is_dependency(issue) {
        return CheckResult::not_applied(DESCRIPTION, "dependencies are not worked");
    }

    let worked_recently = issue
        .most_recent_worklog
        .as_ref()
        .and_then(|w| parse_jira_timestamp(&w.started))
        .is_some_and(|started| started >= subtract_business_days(now, 1));

    match (worked_recently, issue.in_progress) {
        (false, true) => CheckResult::fail(DESCRIPTION, "no recent worklog".to_string()),
        (true, true) => CheckResult::ok(DESCRIPTION),
        _ => CheckResult::not_applied(DESCRIPTION, "not in progress"),
    }
}

/// Issues in review or completed columns need a QA impact statement.
pub fn check_qa_impact_statement(issue: &EnhancedIssue, _now: DateTime<Utc>) -> CheckResult {
    const DESCRIPTION: &str = "QA impact statement";

    let column = column_or_status(issue);
    if column != "review" && column != "completed" {
        return CheckResult::not_applied(DESCRIPTION, "not in review or completed");
    }

    match &issue.qa_impact_statement {
        Some(statement) if !statement.trim().is_empty() => CheckResult::ok(DESCRIPTION),
        _ => CheckResult::fail(DESCRIPTION, "missing a QA impact statement".to_string()),
    }
}
