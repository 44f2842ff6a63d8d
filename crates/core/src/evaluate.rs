//! Evaluation reducer and quality scoring
//!
//! [`evaluate`] runs the check registry against one enriched issue and folds
//! the results into an [`IssueAction`]; [`quality`] maps an action's check
//! outcomes onto a letter grade. Both are total functions with no error
//! path: non-ok outcomes are domain signals, not failures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::checks::{builtin_checks, CheckFn, CheckOutcome, CheckResult};
use crate::issue::EnhancedIssue;
use crate::time::difference_in_business_days;

/// Newly created, untouched issues are exempt from checks for this many
/// business days.
const GRACE_PERIOD_BUSINESS_DAYS: i64 = 2;

/// Overall action recommendation for one issue
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum ActionRequired {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "inspect")]
    Inspect,
}

impl std::fmt::Display for ActionRequired {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionRequired::None => write!(f, "none"),
            ActionRequired::Inspect => write!(f, "inspect"),
        }
    }
}

/// The reduced result of evaluating all checks against one issue
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct IssueAction {
    pub action_required: ActionRequired,
    /// Check results in registry order.
    pub checks: Vec<CheckResult>,
}

/// Runs the built-in registry plus any caller-supplied custom checks.
///
/// Issues inside the grace period (not in progress, no time logged, and less
/// than two business days old) are exempt from all checks and come back with
/// an empty check list. Otherwise `action_required` is `Inspect` iff at
/// least one check produced `Warn` or `Fail`.
pub fn evaluate(
    issue: &EnhancedIssue,
    now: DateTime<Utc>,
    custom_checks: &[CheckFn],
) -> IssueAction {
    if in_grace_period(issue, now) {
        return IssueAction {
            action_required: ActionRequired::None,
            checks: Vec::new(),
        };
    }

    let mut action_required = ActionRequired::None;
    let mut checks = Vec::new();

    for check in builtin_checks().iter().chain(custom_checks) {
        let result = check(issue, now);
        // Ok / not-applied / cant-apply never downgrade an Inspect.
        if matches!(result.outcome, CheckOutcome::Warn | CheckOutcome::Fail) {
            action_required = ActionRequired::Inspect;
        }
        checks.push(result);
    }

    IssueAction {
        action_required,
        checks,
    }
}

fn in_grace_period(issue: &EnhancedIssue, now: DateTime<Utc>) -> bool {
    !issue.in_progress
        && issue.aggregate_time_spent() == 0
        && issue
            .created()
            .is_some_and(|created| {
                difference_in_business_days(now, created) < GRACE_PERIOD_BUSINESS_DAYS
            })
}

/// Maps an issue action onto a letter grade.
///
/// Failures weigh twice as much as warnings; the weighted total selects the
/// grade band.
pub fn quality(action: &IssueAction) -> &'static str {
    let failures = action
        .checks
        .iter()
        .filter(|check| check.outcome == CheckOutcome::Fail)
        .count();
    let warnings = action
        .checks
        .iter()
        .filter(|check| check.outcome == CheckOutcome::Warn)
        .count();

    match 2 * failures + warnings {
        0 => "A+",
        1 => "A",
        total if total < 3 => "B",
        total if total < 5 => "C",
        _ => "F",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::{enrich, CustomFieldNames, Issue, IssueFields, Status};
    use chrono::TimeZone;

    // Tuesday 2024-01-16 12:00 UTC
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 16, 12, 0, 0).unwrap()
    }

    fn enhanced(status_name: &str, created: Option<&str>) -> EnhancedIssue {
        let fields = IssueFields {
            summary: "Test".to_string(),
            created: created.map(|c| c.to_string()),
            status: Status {
                id: Some("3".to_string()),
                name: status_name.to_string(),
                status_category: None,
            },
            ..IssueFields::default()
        };
        enrich(
            Issue {
                key: "PROJ-1".to_string(),
                fields,
                changelog: None,
            },
            None,
            "link".to_string(),
            &CustomFieldNames::default(),
        )
    }

    fn result(outcome: CheckOutcome) -> CheckResult {
        CheckResult {
            description: "a check".to_string(),
            outcome,
            reasons: vec!["because".to_string()],
        }
    }

    #[test]
    fn test_grace_period_short_circuits_everything() {
        // Arrange: Created the day before, untouched, not in progress
        let issue = enhanced("To Do", Some("2024-01-15T09:00:00.000+0000"));

        // Act
        let action = evaluate(&issue, now(), &[]);

        // Assert: No checks at all
        assert_eq!(action.action_required, ActionRequired::None);
        assert!(action.checks.is_empty());
    }

    #[test]
    fn test_grace_period_spans_weekends() {
        // Created Friday morning, evaluated Monday: one business day elapsed
        let issue = enhanced("To Do", Some("2024-01-12T09:00:00.000+0000"));
        let monday = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();

        let action = evaluate(&issue, monday, &[]);

        assert!(action.checks.is_empty());
    }

    #[test]
    fn test_grace_period_does_not_cover_in_progress_issues() {
        // Same age, but in progress
        let issue = enhanced("In Progress", Some("2024-01-15T09:00:00.000+0000"));

        let action = evaluate(&issue, now(), &[]);

        assert!(!action.checks.is_empty());
    }

    #[test]
    fn test_grace_period_expires() {
        // Created a week before now
        let issue = enhanced("To Do", Some("2024-01-09T09:00:00.000+0000"));

        let action = evaluate(&issue, now(), &[]);

        assert_eq!(action.checks.len(), 11);
    }

    #[test]
    fn test_evaluate_sets_inspect_on_any_failure() {
        // An in-progress issue with no description, estimate, comment or
        // worklog fails several checks
        let issue = enhanced("In Progress", Some("2024-01-02T09:00:00.000+0000"));

        let action = evaluate(&issue, now(), &[]);

        assert_eq!(action.action_required, ActionRequired::Inspect);
        assert!(action
            .checks
            .iter()
            .any(|check| check.outcome == CheckOutcome::Fail));
    }

    #[test]
    fn test_evaluate_none_when_no_check_fails() {
        // An old backlog-free to-do issue with nothing logged passes or
        // skips every check except the description one, so give it one
        let mut fields = IssueFields {
            summary: "Test".to_string(),
            created: Some("2024-01-02T09:00:00.000+0000".to_string()),
            description: Some(serde_json::Value::String("Well described".to_string())),
            status: Status {
                id: Some("3".to_string()),
                name: "To Do".to_string(),
                status_category: None,
            },
            ..IssueFields::default()
        };
        fields.duedate = None;
        let issue = enrich(
            Issue {
                key: "PROJ-1".to_string(),
                fields,
                changelog: None,
            },
            None,
            "link".to_string(),
            &CustomFieldNames::default(),
        );

        let action = evaluate(&issue, now(), &[]);

        assert_eq!(action.action_required, ActionRequired::None);
        assert_eq!(action.checks.len(), 11);
    }

    #[test]
    fn test_evaluate_preserves_registry_order() {
        let issue = enhanced("To Do", Some("2024-01-02T09:00:00.000+0000"));

        let action = evaluate(&issue, now(), &[]);

        assert_eq!(action.checks[0].description, "recent comments");
        assert_eq!(action.checks[1].description, "has a description");
        assert_eq!(
            action.checks.last().unwrap().description,
            "QA impact statement"
        );
    }

    fn always_fails(_issue: &EnhancedIssue, _now: DateTime<Utc>) -> CheckResult {
        CheckResult {
            description: "custom rule".to_string(),
            outcome: CheckOutcome::Fail,
            reasons: vec!["custom failure".to_string()],
        }
    }

    #[test]
    fn test_custom_checks_append_to_registry() {
        // Arrange: An issue that passes every built-in check
        let mut fields = IssueFields {
            summary: "Test".to_string(),
            created: Some("2024-01-02T09:00:00.000+0000".to_string()),
            description: Some(serde_json::Value::String("Well described".to_string())),
            status: Status {
                id: Some("3".to_string()),
                name: "To Do".to_string(),
                status_category: None,
            },
            ..IssueFields::default()
        };
        fields.duedate = None;
        let issue = enrich(
            Issue {
                key: "PROJ-1".to_string(),
                fields,
                changelog: None,
            },
            None,
            "link".to_string(),
            &CustomFieldNames::default(),
        );

        // Act
        let action = evaluate(&issue, now(), &[always_fails]);

        // Assert: Custom check runs last and flips the action
        assert_eq!(action.checks.len(), 12);
        assert_eq!(action.checks.last().unwrap().description, "custom rule");
        assert_eq!(action.action_required, ActionRequired::Inspect);
    }

    #[test]
    fn test_quality_grade_bands() {
        let grade = |outcomes: &[CheckOutcome]| {
            quality(&IssueAction {
                action_required: ActionRequired::None,
                checks: outcomes.iter().map(|o| result(*o)).collect(),
            })
        };

        assert_eq!(grade(&[]), "A+");
        assert_eq!(grade(&[CheckOutcome::Ok, CheckOutcome::NotApplied]), "A+");
        assert_eq!(grade(&[CheckOutcome::Warn]), "A");
        assert_eq!(grade(&[CheckOutcome::Fail]), "B");
        assert_eq!(grade(&[CheckOutcome::Fail, CheckOutcome::Warn]), "C");
        assert_eq!(grade(&[CheckOutcome::Fail, CheckOutcome::Fail]), "C");
        assert_eq!(
            grade(&[CheckOutcome::Fail, CheckOutcome::Fail, CheckOutcome::Warn]),
            "F"
        );
        assert_eq!(grade(&[CheckOutcome::CantApply]), "A+");
    }

    #[test]
    fn test_quality_is_monotonic_in_failures() {
        // Adding a fail never improves the grade; adding an ok never
        // changes it
        let grades = ["A+", "A", "B", "C", "F"];
        let rank = |grade: &str| grades.iter().position(|g| *g == grade).unwrap();

        let mut checks = Vec::new();
        let mut previous = rank(quality(&IssueAction {
            action_required: ActionRequired::None,
            checks: checks.clone(),
        }));

        for _ in 0..6 {
            checks.push(result(CheckOutcome::Fail));
            let with_fail = rank(quality(&IssueAction {
                action_required: ActionRequired::None,
                checks: checks.clone(),
            }));
            assert!(with_fail >= previous);

            checks.push(result(CheckOutcome::Ok));
            let with_ok = rank(quality(&IssueAction {
                action_required: ActionRequired::None,
                checks: checks.clone(),
            }));
            assert_eq!(with_ok, with_fail);

            previous = with_fail;
        }
    }
}
