//! Jira issue wire model and enrichment
//!
//! The raw types mirror the shapes returned by the Jira REST API. The
//! [`enrich`] function derives an [`EnhancedIssue`] carrying the semantic
//! facts the checks reason about: board column, in-progress / stalled /
//! closed / released flags, and the most recent comment, worklog and status
//! transition. Enrichment is pure and total; absent or malformed data yields
//! `None`, never an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time::parse_jira_timestamp;

/// Jira issue as returned by the search API
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Issue {
    pub key: String,
    pub fields: IssueFields,
    #[serde(default)]
    pub changelog: Option<Changelog>,
}

/// Fields requested for issue evaluation
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct IssueFields {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: Option<serde_json::Value>, // Can be a string or ADF (Atlassian Document Format)
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub duedate: Option<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub issuetype: Option<IssueType>,
    #[serde(default)]
    pub assignee: Option<Assignee>,
    #[serde(default)]
    pub aggregatetimespent: Option<i64>,
    #[serde(default)]
    pub aggregatetimeoriginalestimate: Option<i64>,
    #[serde(default)]
    pub timeoriginalestimate: Option<i64>,
    #[serde(default)]
    pub timespent: Option<i64>,
    #[serde(default)]
    #[serde(rename = "fixVersions")]
    pub fix_versions: Vec<FixVersion>,
    #[serde(default)]
    pub parent: Option<ParentRef>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    #[serde(default)]
    pub comment: Option<CommentPage>,
    #[serde(default)]
    pub worklog: Option<WorklogPage>,
    /// Custom fields keyed by tracker-specific identifiers (customfield_*)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Jira status field
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Status {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    #[serde(rename = "statusCategory")]
    pub status_category: Option<StatusCategory>,
}

/// Jira status category (To Do / In Progress / Done)
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct StatusCategory {
    pub name: String,
}

/// Jira issue type field
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct IssueType {
    pub name: String,
}

/// Jira assignee field
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Assignee {
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(default)]
    #[serde(rename = "emailAddress")]
    pub email_address: Option<String>,
}

/// Fix version with its release flag
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FixVersion {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub released: bool,
}

/// Reference to a parent issue
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ParentRef {
    pub key: String,
}

/// Subtask stub as embedded in a search result
///
/// Only the collections consulted for most-recent selection are kept.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Subtask {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub fields: SubtaskFields,
}

/// Subtask fields visible to the search
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct SubtaskFields {
    #[serde(default)]
    pub comment: Option<CommentPage>,
    #[serde(default)]
    pub worklog: Option<WorklogPage>,
}

/// Paginated comment collection
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct CommentPage {
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    #[serde(rename = "maxResults")]
    pub max_results: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Comment on a Jira issue
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Comment {
    #[serde(default)]
    pub id: Option<String>,
    pub created: String,
    #[serde(default)]
    pub author: Option<Assignee>,
    #[serde(default)]
    pub body: Option<serde_json::Value>,
}

/// Paginated worklog collection
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct WorklogPage {
    #[serde(default)]
    pub worklogs: Vec<Worklog>,
    #[serde(default)]
    #[serde(rename = "maxResults")]
    pub max_results: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Worklog entry on a Jira issue
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Worklog {
    #[serde(default)]
    pub id: Option<String>,
    pub started: String,
    #[serde(default)]
    pub author: Option<Assignee>,
    #[serde(default)]
    #[serde(rename = "timeSpentSeconds")]
    pub time_spent_seconds: Option<i64>,
}

/// Issue change history
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Changelog {
    #[serde(default)]
    pub histories: Vec<ChangeHistory>,
}

/// A single change-history entry
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ChangeHistory {
    pub created: String,
    #[serde(default)]
    pub items: Vec<ChangeItem>,
}

/// A field change within a history entry
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ChangeItem {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    #[serde(rename = "fieldtype")]
    pub field_type: String,
    #[serde(default)]
    #[serde(rename = "fromString")]
    pub from_value: Option<String>,
    #[serde(default)]
    #[serde(rename = "toString")]
    pub to_value: Option<String>,
}

/// Kanban board context for status-to-column mapping
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Board {
    pub columns: Vec<BoardColumn>,
}

/// Board column grouping one or more raw statuses
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BoardColumn {
    pub name: String,
    pub status_ids: Vec<String>,
}

/// Names of the custom tracker fields consulted during enrichment
///
/// Field identifiers are tracker-specific (e.g. `customfield_10038`), so the
/// caller supplies them as configuration rather than the core hard-coding
/// them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomFieldNames {
    pub quality: Option<String>,
    pub quality_reason: Option<String>,
    pub qa_impact_statement: Option<String>,
}

/// Issue augmented with derived status facts
///
/// Computed once per issue per evaluation run and never mutated afterwards.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct EnhancedIssue {
    pub issue: Issue,
    pub in_progress: bool,
    pub stalled: bool,
    pub closed: bool,
    pub released: bool,
    pub column: Option<String>,
    pub most_recent_comment: Option<Comment>,
    pub most_recent_worklog: Option<Worklog>,
    pub most_recent_transition: Option<ChangeHistory>,
    pub view_link: String,
    pub quality: Option<String>,
    pub quality_reason: Option<String>,
    pub qa_impact_statement: Option<String>,
}

impl EnhancedIssue {
    /// Trimmed plain-text description, with ADF documents rendered to text.
    pub fn description_text(&self) -> Option<String> {
        extract_description(self.issue.fields.description.clone())
    }

    /// Issue type name, lowercased for comparison against known tokens.
    pub fn issue_type(&self) -> Option<String> {
        self.issue
            .fields
            .issuetype
            .as_ref()
            .map(|t| t.name.to_lowercase())
    }

    /// Aggregated time spent in seconds, zero when absent.
    pub fn aggregate_time_spent(&self) -> i64 {
        self.issue.fields.aggregatetimespent.unwrap_or(0)
    }

    /// Original estimate in seconds, preferring the aggregate when present.
    pub fn original_estimate_seconds(&self) -> Option<i64> {
        self.issue
            .fields
            .aggregatetimeoriginalestimate
            .or(self.issue.fields.timeoriginalestimate)
    }

    /// Time spent in seconds, preferring the aggregate when present.
    pub fn time_spent_seconds(&self) -> Option<i64> {
        self.issue
            .fields
            .timespent
            .or(self.issue.fields.aggregatetimespent)
    }

    /// Creation instant, when present and parseable.
    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.issue
            .fields
            .created
            .as_deref()
            .and_then(parse_jira_timestamp)
    }

    /// Due date as midnight UTC, when present and parseable.
    pub fn due_date(&self) -> Option<DateTime<Utc>> {
        self.issue
            .fields
            .duedate
            .as_deref()
            .and_then(crate::time::parse_jira_date)
    }
}

/// Derives an [`EnhancedIssue`] from a raw issue and optional board context.
///
/// With a board, the issue's status is mapped onto its column name; without
/// one, the raw status name stands in. All temporal derivations tolerate
/// missing or unparseable data.
pub fn enrich(
    issue: Issue,
    board: Option<&Board>,
    view_link: String,
    custom_fields: &CustomFieldNames,
) -> EnhancedIssue {
    let column = board.and_then(|b| column_for_status(b, &issue.fields.status));

    // With no board context the raw status name is the best column proxy.
    let column_or_status = column
        .clone()
        .unwrap_or_else(|| issue.fields.status.name.clone());

    let in_progress = column_or_status.eq_ignore_ascii_case("in progress");
    let stalled = column_or_status.to_lowercase().starts_with("stalled");
    let closed = match &column {
        Some(name) => name.eq_ignore_ascii_case("release ready"),
        None => issue
            .fields
            .status
            .status_category
            .as_ref()
            .is_some_and(|c| c.name.eq_ignore_ascii_case("done")),
    };
    let released = issue.fields.fix_versions.iter().any(|v| v.released);

    let most_recent_comment = most_recent_by(comment_candidates(&issue), |c| &c.created);
    let most_recent_worklog = most_recent_by(worklog_candidates(&issue), |w| &w.started);
    let most_recent_transition = most_recent_by(transition_candidates(&issue), |h| &h.created);

    let quality = custom_field_string(&issue, custom_fields.quality.as_deref());
    let quality_reason = custom_field_string(&issue, custom_fields.quality_reason.as_deref());
    let qa_impact_statement =
        custom_field_string(&issue, custom_fields.qa_impact_statement.as_deref());

    EnhancedIssue {
        issue,
        in_progress,
        stalled,
        closed,
        released,
        column,
        most_recent_comment,
        most_recent_worklog,
        most_recent_transition,
        view_link,
        quality,
        quality_reason,
        qa_impact_statement,
    }
}

fn column_for_status(board: &Board, status: &Status) -> Option<String> {
    let status_id = status.id.as_deref()?;
    board
        .columns
        .iter()
        .find(|column| column.status_ids.iter().any(|id| id == status_id))
        .map(|column| column.name.clone())
}

/// Comments from the issue's own page and any subtask pages.
fn comment_candidates(issue: &Issue) -> Vec<Comment> {
    let own = issue
        .fields
        .comment
        .iter()
        .flat_map(|page| page.comments.iter().cloned());
    let subtasks = issue.fields.subtasks.iter().flat_map(|subtask| {
        subtask
            .fields
            .comment
            .iter()
            .flat_map(|page| page.comments.iter().cloned())
    });
    own.chain(subtasks).collect()
}

/// Worklogs from the issue's own page and any subtask pages.
fn worklog_candidates(issue: &Issue) -> Vec<Worklog> {
    let own = issue
        .fields
        .worklog
        .iter()
        .flat_map(|page| page.worklogs.iter().cloned());
    let subtasks = issue.fields.subtasks.iter().flat_map(|subtask| {
        subtask
            .fields
            .worklog
            .iter()
            .flat_map(|page| page.worklogs.iter().cloned())
    });
    own.chain(subtasks).collect()
}

/// Changelog entries that record an actual status transition.
fn transition_candidates(issue: &Issue) -> Vec<ChangeHistory> {
    issue
        .changelog
        .iter()
        .flat_map(|log| log.histories.iter())
        .filter(|history| {
            history
                .items
                .iter()
                .any(|item| item.field == "status" && item.field_type == "jira")
        })
        .cloned()
        .collect()
}

/// Picks the entry with the latest timestamp.
///
/// The sort is stable and descending, so entries with equal timestamps keep
/// their input order and the earliest-encountered one wins.
fn most_recent_by<T, F>(mut entries: Vec<T>, timestamp: F) -> Option<T>
where
    F: Fn(&T) -> &String,
{
    entries.sort_by_key(|entry| {
        // Unparseable timestamps rank last
        std::cmp::Reverse(
            parse_jira_timestamp(timestamp(entry)).map_or(i64::MIN, |dt| dt.timestamp_millis()),
        )
    });
    entries.into_iter().next()
}

fn custom_field_string(issue: &Issue, field_name: Option<&str>) -> Option<String> {
    let value = issue.fields.extra.get(field_name?)?;
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Object(map) => map
            .get("value")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Extract description text from a Jira field (handles both string and ADF)
///
/// Jira descriptions can be either plain strings or ADF (Atlassian Document
/// Format) JSON. This function handles both cases and extracts readable text.
pub fn extract_description(value: Option<serde_json::Value>) -> Option<String> {
    value.and_then(|v| match &v {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Object(_) => {
            if v.get("type").and_then(|t| t.as_str()) == Some("doc") {
                render_adf(&v)
            } else {
                None
            }
        }
        _ => None,
    })
}

/// Render ADF (Atlassian Document Format) to readable text
///
/// Walks the ADF tree and extracts human-readable text from the node types
/// that occur in issue descriptions.
pub fn render_adf(value: &serde_json::Value) -> Option<String> {
    let mut output = String::new();

    if let Some(content) = value.get("content").and_then(|c| c.as_array()) {
        for node in content {
            if let Some(rendered) = render_adf_node(node) {
                output.push_str(&rendered);
                if !rendered.ends_with('\n') {
                    output.push('\n');
                }
            }
        }
    }

    if output.trim().is_empty() {
        None
    } else {
        Some(output.trim().to_string())
    }
}

fn render_adf_node(node: &serde_json::Value) -> Option<String> {
    let node_type = node.get("type")?.as_str()?;

    match node_type {
        "text" => node
            .get("text")
            .and_then(|t| t.as_str())
            .map(|text| text.to_string()),
        "hardBreak" => Some("\n".to_string()),
        "paragraph" | "listItem" => {
            let text = render_children(node);
            if text.is_empty() {
                None
            } else {
                Some(format!("{}\n", text.trim_end()))
            }
        }
        _ => {
            // Headings, lists, code blocks and unknown nodes flatten to their
            // text content.
            let text = render_children(node);
            if text.is_empty() {
                None
            } else {
                Some(text)
            }
        }
    }
}

fn render_children(node: &serde_json::Value) -> String {
    let mut text = String::new();
    if let Some(content) = node.get("content").and_then(|c| c.as_array()) {
        for child in content {
            if let Some(rendered) = render_adf_node(child) {
                text.push_str(&rendered);
            }
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(created: &str) -> Comment {
        Comment {
            id: None,
            created: created.to_string(),
            author: None,
            body: None,
        }
    }

    fn status_transition(created: &str) -> ChangeHistory {
        ChangeHistory {
            created: created.to_string(),
            items: vec![ChangeItem {
                field: "status".to_string(),
                field_type: "jira".to_string(),
                from_value: Some("To Do".to_string()),
                to_value: Some("In Progress".to_string()),
            }],
        }
    }

    fn base_issue(status_name: &str) -> Issue {
        Issue {
            key: "PROJ-1".to_string(),
            fields: IssueFields {
                summary: "Test issue".to_string(),
                status: Status {
                    id: Some("3".to_string()),
                    name: status_name.to_string(),
                    status_category: None,
                },
                ..IssueFields::default()
            },
            changelog: None,
        }
    }

    fn board(column: &str, status_ids: &[&str]) -> Board {
        Board {
            columns: vec![BoardColumn {
                name: column.to_string(),
                status_ids: status_ids.iter().map(|id| id.to_string()).collect(),
            }],
        }
    }

    fn enrich_plain(issue: Issue) -> EnhancedIssue {
        enrich(
            issue,
            None,
            "https://jira.example.com/browse/PROJ-1".to_string(),
            &CustomFieldNames::default(),
        )
    }

    #[test]
    fn test_enrich_in_progress_from_status_name() {
        // Arrange: No board, raw status name stands in for the column
        let issue = base_issue("In Progress");

        // Act
        let enhanced = enrich_plain(issue);

        // Assert
        assert!(enhanced.in_progress);
        assert!(!enhanced.stalled);
        assert_eq!(enhanced.column, None);
    }

    #[test]
    fn test_enrich_column_mapping_from_board() {
        // Arrange: Board maps status id 3 to a column
        let issue = base_issue("Development");
        let board = board("In Progress", &["3", "4"]);

        // Act
        let enhanced = enrich(
            issue,
            Some(&board),
            "link".to_string(),
            &CustomFieldNames::default(),
        );

        // Assert: Column name drives the in-progress flag, not the status name
        assert_eq!(enhanced.column, Some("In Progress".to_string()));
        assert!(enhanced.in_progress);
    }

    #[test]
    fn test_enrich_unmapped_status_has_no_column() {
        let issue = base_issue("Weird Status");
        let board = board("In Progress", &["99"]);

        let enhanced = enrich(
            issue,
            Some(&board),
            "link".to_string(),
            &CustomFieldNames::default(),
        );

        assert_eq!(enhanced.column, None);
        assert!(!enhanced.in_progress);
    }

    #[test]
    fn test_enrich_stalled_prefix() {
        let issue = base_issue("Stalled - waiting on vendor");
        let enhanced = enrich_plain(issue);
        assert!(enhanced.stalled);
    }

    #[test]
    fn test_enrich_closed_via_board_column() {
        let issue = base_issue("Done");
        let board = board("Release Ready", &["3"]);

        let enhanced = enrich(
            issue,
            Some(&board),
            "link".to_string(),
            &CustomFieldNames::default(),
        );

        assert!(enhanced.closed);
    }

    #[test]
    fn test_enrich_closed_via_status_category_without_board() {
        let mut issue = base_issue("Closed");
        issue.fields.status.status_category = Some(StatusCategory {
            name: "Done".to_string(),
        });

        let enhanced = enrich_plain(issue);

        assert!(enhanced.closed);
    }

    #[test]
    fn test_enrich_released_from_fix_versions() {
        let mut issue = base_issue("Done");
        issue.fields.fix_versions = vec![
            FixVersion {
                name: "1.0".to_string(),
                released: false,
            },
            FixVersion {
                name: "1.1".to_string(),
                released: true,
            },
        ];

        let enhanced = enrich_plain(issue);

        assert!(enhanced.released);
    }

    #[test]
    fn test_most_recent_comment_ignores_input_order() {
        // Arrange: Same comments in both orders
        let mut issue_a = base_issue("To Do");
        issue_a.fields.comment = Some(CommentPage {
            comments: vec![
                comment("2000-01-01T10:00:00.000+0000"),
                comment("2021-06-01T10:00:00.000+0000"),
            ],
            ..CommentPage::default()
        });
        let mut issue_b = base_issue("To Do");
        issue_b.fields.comment = Some(CommentPage {
            comments: vec![
                comment("2021-06-01T10:00:00.000+0000"),
                comment("2000-01-01T10:00:00.000+0000"),
            ],
            ..CommentPage::default()
        });

        // Act
        let enhanced_a = enrich_plain(issue_a);
        let enhanced_b = enrich_plain(issue_b);

        // Assert: Selection is by timestamp, not input order
        assert_eq!(
            enhanced_a.most_recent_comment.as_ref().map(|c| &c.created),
            enhanced_b.most_recent_comment.as_ref().map(|c| &c.created),
        );
        assert_eq!(
            enhanced_a.most_recent_comment.unwrap().created,
            "2021-06-01T10:00:00.000+0000"
        );
    }

    #[test]
    fn test_most_recent_comment_includes_subtasks() {
        let mut issue = base_issue("To Do");
        issue.fields.comment = Some(CommentPage {
            comments: vec![comment("2021-01-01T10:00:00.000+0000")],
            ..CommentPage::default()
        });
        issue.fields.subtasks = vec![Subtask {
            key: "PROJ-2".to_string(),
            fields: SubtaskFields {
                comment: Some(CommentPage {
                    comments: vec![comment("2023-01-01T10:00:00.000+0000")],
                    ..CommentPage::default()
                }),
                worklog: None,
            },
        }];

        let enhanced = enrich_plain(issue);

        assert_eq!(
            enhanced.most_recent_comment.unwrap().created,
            "2023-01-01T10:00:00.000+0000"
        );
    }

    #[test]
    fn test_most_recent_transition_filters_non_status_changes() {
        // Arrange: A later assignee change must not shadow the status change
        let mut issue = base_issue("In Progress");
        issue.changelog = Some(Changelog {
            histories: vec![
                status_transition("2023-05-01T10:00:00.000+0000"),
                ChangeHistory {
                    created: "2023-06-01T10:00:00.000+0000".to_string(),
                    items: vec![ChangeItem {
                        field: "assignee".to_string(),
                        field_type: "jira".to_string(),
                        from_value: None,
                        to_value: Some("Alice".to_string()),
                    }],
                },
                ChangeHistory {
                    created: "2023-07-01T10:00:00.000+0000".to_string(),
                    items: vec![ChangeItem {
                        field: "status".to_string(),
                        field_type: "custom".to_string(),
                        from_value: None,
                        to_value: None,
                    }],
                },
            ],
        });

        // Act
        let enhanced = enrich_plain(issue);

        // Assert: Only field="status", fieldtype="jira" entries qualify
        assert_eq!(
            enhanced.most_recent_transition.unwrap().created,
            "2023-05-01T10:00:00.000+0000"
        );
    }

    #[test]
    fn test_most_recent_tie_keeps_first_encountered() {
        let mut issue = base_issue("To Do");
        let mut first = comment("2021-06-01T10:00:00.000+0000");
        first.id = Some("first".to_string());
        let mut second = comment("2021-06-01T10:00:00.000+0000");
        second.id = Some("second".to_string());
        issue.fields.comment = Some(CommentPage {
            comments: vec![first, second],
            ..CommentPage::default()
        });

        let enhanced = enrich_plain(issue);

        assert_eq!(
            enhanced.most_recent_comment.unwrap().id,
            Some("first".to_string())
        );
    }

    #[test]
    fn test_enrich_is_idempotent() {
        // Arrange
        let mut issue = base_issue("In Progress");
        issue.fields.comment = Some(CommentPage {
            comments: vec![comment("2021-06-01T10:00:00.000+0000")],
            ..CommentPage::default()
        });
        let names = CustomFieldNames::default();

        // Act: Enrich the same raw issue twice
        let first = enrich(issue.clone(), None, "link".to_string(), &names);
        let second = enrich(issue, None, "link".to_string(), &names);

        // Assert: Structurally equal results
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_fields_extracted_by_configured_name() {
        let mut issue = base_issue("To Do");
        issue.fields.extra.insert(
            "customfield_10038".to_string(),
            serde_json::Value::String("B".to_string()),
        );
        issue.fields.extra.insert(
            "customfield_10039".to_string(),
            serde_json::json!({ "value": "needs tests" }),
        );

        let names = CustomFieldNames {
            quality: Some("customfield_10038".to_string()),
            quality_reason: Some("customfield_10039".to_string()),
            qa_impact_statement: Some("customfield_99999".to_string()),
        };

        let enhanced = enrich(issue, None, "link".to_string(), &names);

        assert_eq!(enhanced.quality, Some("B".to_string()));
        assert_eq!(enhanced.quality_reason, Some("needs tests".to_string()));
        // Unknown field names are not an error
        assert_eq!(enhanced.qa_impact_statement, None);
    }

    #[test]
    fn test_extract_description_string() {
        let value = Some(serde_json::Value::String("plain text".to_string()));
        assert_eq!(extract_description(value), Some("plain text".to_string()));
    }

    #[test]
    fn test_extract_description_adf() {
        let adf = serde_json::json!({
            "type": "doc",
            "content": [
                {
                    "type": "paragraph",
                    "content": [
                        { "type": "text", "text": "Hello world" }
                    ]
                }
            ]
        });
        assert_eq!(
            extract_description(Some(adf)),
            Some("Hello world".to_string())
        );
    }

    #[test]
    fn test_extract_description_empty_adf() {
        let adf = serde_json::json!({ "type": "doc", "content": [] });
        assert_eq!(extract_description(Some(adf)), None);
    }

    #[test]
    fn test_extract_description_non_adf_object() {
        let value = Some(serde_json::json!({ "foo": "bar" }));
        assert_eq!(extract_description(value), None);
    }
}
