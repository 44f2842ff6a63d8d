use chrono::Utc;
use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::jira::board::BoardCache;
use crate::jira::{assignee_name, create_authenticated_client, search_issues, JiraConfig};
use crate::prelude::{eprintln, println, *};
use jiralint_core::checks::{CheckOutcome, CheckResult};
use jiralint_core::evaluate::{evaluate, quality, ActionRequired};
use jiralint_core::issue::{enrich, CommentPage, Issue, WorklogPage};

/// Fields requested for issue evaluation. Custom fields are appended from
/// configuration at request time.
const EVALUATION_FIELDS: &str = "summary,description,created,duedate,status,issuetype,assignee,\
aggregatetimespent,aggregatetimeoriginalestimate,timeoriginalestimate,timespent,fixVersions,\
parent,subtasks,comment,worklog";

/// Options for rating Jira issues
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
#[command(after_help = "EXAMPLES:
  # Rate every issue assigned to the current user:
  jiralint rate \"assignee = currentUser()\"

  # Rate the open issues of one project:
  jiralint rate \"project = PROJ AND statusCategory != Done\"

  # Machine-readable output:
  jiralint rate \"project = PROJ\" --json

  # Fetch next page using pagination token:
  jiralint rate \"project = PROJ\" --limit 50 --next-page <token>

NOTES:
  - JQL queries use Jira Query Language syntax
  - Issues created less than two business days ago that are untouched are
    exempt from all checks
  - Board columns are resolved per project when the project has a Kanban
    board; otherwise raw status names are used")]
pub struct RateOptions {
    /// JQL query selecting the issues to rate
    #[clap(env = "JIRA_QUERY")]
    pub jql_query: String,

    /// Maximum number of issues to rate per page
    #[arg(short, long, default_value = "25")]
    pub limit: usize,

    /// Pagination token for fetching the next page (token-based pagination)
    #[arg(long)]
    pub next_page: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// One rated issue, as emitted by --json
#[derive(Debug, Serialize)]
pub struct RatedIssue {
    pub key: String,
    pub summary: String,
    pub view_link: String,
    pub column: Option<String>,
    pub assignee: String,
    pub action_required: ActionRequired,
    pub grade: String,
    /// Grade recorded on the tracker's own quality field, when configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_quality: Option<String>,
    pub checks: Vec<CheckResult>,
}

/// Output structure for the rate command
#[derive(Debug, Serialize)]
pub struct RateOutput {
    pub issues: Vec<RatedIssue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// Public data function - searches, enriches and evaluates issues
pub async fn rate_issues_data(
    query: String,
    limit: usize,
    next_page: Option<String>,
) -> Result<RateOutput> {
    let config = JiraConfig::from_env()?;
    let client = create_authenticated_client(&config)?;

    let mut fields = EVALUATION_FIELDS.to_string();
    for custom in [
        &config.quality_field,
        &config.quality_reason_field,
        &config.qa_impact_field,
    ]
    .into_iter()
    .flatten()
    {
        fields.push(',');
        fields.push_str(custom);
    }

    let response = search_issues(
        &client,
        &config,
        &query,
        limit,
        next_page.as_deref(),
        &fields,
        Some("changelog"),
    )
    .await?;

    // Top up truncated comment and worklog pages, concurrently across issues.
    let issues = futures::future::join_all(
        response
            .issues
            .into_iter()
            .map(|issue| complete_issue(&client, &config, issue)),
    )
    .await;

    // One shared reference instant for the whole batch.
    let now = Utc::now();
    let custom_field_names = config.custom_field_names();
    let mut board_cache = BoardCache::new();

    let mut rated = Vec::with_capacity(issues.len());
    for issue in issues {
        let project_key = issue
            .key
            .split('-')
            .next()
            .unwrap_or(issue.key.as_str())
            .to_string();
        let board = board_cache
            .board_for_project(&client, &config, &project_key)
            .await?;

        let view_link = config.view_link(&issue.key);
        let enhanced = enrich(issue, board.as_ref(), view_link, &custom_field_names);
        let action = evaluate(&enhanced, now, &[]);
        let grade = quality(&action);

        rated.push(RatedIssue {
            key: enhanced.issue.key.clone(),
            summary: enhanced.issue.fields.summary.clone(),
            view_link: enhanced.view_link.clone(),
            column: enhanced.column.clone(),
            assignee: assignee_name(&enhanced.issue),
            action_required: action.action_required,
            grade: grade.to_string(),
            recorded_quality: enhanced.quality.clone(),
            checks: action.checks,
        });
    }

    Ok(RateOutput {
        issues: rated,
        next_page_token: response.next_page_token,
    })
}

/// Fetch the full comment and worklog collections for an issue whose search
/// result pages are truncated. Failures degrade to the truncated pages.
async fn complete_issue(client: &reqwest::Client, config: &JiraConfig, mut issue: Issue) -> Issue {
    let base_url = config.base_url.trim_end_matches('/');

    let comments_truncated = issue
        .fields
        .comment
        .as_ref()
        .is_some_and(|page| page.total.is_some_and(|t| t as usize > page.comments.len()));
    if comments_truncated {
        let url = format!(
            "{}/rest/api/3/issue/{}/comment",
            base_url,
            urlencoding::encode(&issue.key)
        );
        match fetch_json::<CommentPage>(client, &url).await {
            Ok(page) => issue.fields.comment = Some(page),
            Err(e) => log::warn!("Failed to fetch comments for {}: {}", issue.key, e),
        }
    }

    let worklogs_truncated = issue
        .fields
        .worklog
        .as_ref()
        .is_some_and(|page| page.total.is_some_and(|t| t as usize > page.worklogs.len()));
    if worklogs_truncated {
        let url = format!(
            "{}/rest/api/3/issue/{}/worklog",
            base_url,
            urlencoding::encode(&issue.key)
        );
        match fetch_json::<WorklogPage>(client, &url).await {
            Ok(page) => issue.fields.worklog = Some(page),
            Err(e) => log::warn!("Failed to fetch worklogs for {}: {}", issue.key, e),
        }
    }

    issue
}

async fn fetch_json<T: serde::de::DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
) -> Result<T> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| eyre!("Failed to send request to Jira: {}", e))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(eyre!("Jira API error [{}]: {}", status, body));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| eyre!("Failed to parse Jira response: {}", e))
}

/// Handle the rate command
pub async fn handler(options: RateOptions, global: crate::Global) -> Result<()> {
    if global.verbose {
        println!("Rating issues for query: {}", options.jql_query);
    }

    let data = rate_issues_data(
        options.jql_query.clone(),
        options.limit,
        options.next_page,
    )
    .await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    println!("Rated {} issue(s):\n", data.issues.len());

    if data.issues.is_empty() {
        println!("No issues found.");
        return Ok(());
    }

    let mut table = crate::prelude::new_table();
    table.add_row(prettytable::row![
        "Key", "Column", "Assignee", "Grade", "Action", "Problems"
    ]);

    for issue in &data.issues {
        table.add_row(prettytable::row![
            &issue.key,
            issue.column.as_deref().unwrap_or("-"),
            &issue.assignee,
            colorize_grade(&issue.grade),
            colorize_action(issue.action_required),
            problems(&issue.checks)
        ]);
    }

    table.printstd();

    if let Some(next_token) = &data.next_page_token {
        eprintln!(
            "\nTo fetch the next page, run:\n  jiralint rate '{}' --limit {} --next-page {}",
            options.jql_query, options.limit, next_token
        );
    }

    Ok(())
}

fn colorize_grade(grade: &str) -> String {
    match grade {
        "A+" | "A" => grade.green().bold().to_string(),
        "B" | "C" => grade.yellow().bold().to_string(),
        _ => grade.red().bold().to_string(),
    }
}

fn colorize_action(action: ActionRequired) -> String {
    match action {
        ActionRequired::None => "none".green().to_string(),
        ActionRequired::Inspect => "inspect".red().bold().to_string(),
    }
}

/// One line per warn/fail reason, for the Problems column.
fn problems(checks: &[CheckResult]) -> String {
    checks
        .iter()
        .filter(|check| matches!(check.outcome, CheckOutcome::Warn | CheckOutcome::Fail))
        .flat_map(|check| {
            check
                .reasons
                .iter()
                .map(move |reason| format!("{}: {}", check.description, reason))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
