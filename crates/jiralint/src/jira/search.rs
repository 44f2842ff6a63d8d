use serde::{Deserialize, Serialize};

use crate::jira::{assignee_name, create_authenticated_client, search_issues, JiraConfig};
use crate::prelude::{eprintln, println, *};
use jiralint_core::issue::extract_description;

/// Options for searching Jira issues
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
#[command(after_help = "EXAMPLES:
  # Get all issues assigned to the current user:
  jiralint search \"assignee = currentUser()\"

  # Get only active issues (excluding Done/Closed):
  jiralint search \"assignee = currentUser() AND status NOT IN (Done, Closed)\"

  # Find issues by summary (search by name):
  jiralint search \"summary ~ \\\"bug fix\\\"\"

  # Fetch next page using pagination token:
  jiralint search \"assignee = currentUser()\" --limit 50 --next-page <token>

NOTES:
  - JQL queries use Jira Query Language syntax
  - Use currentUser() to reference the logged-in user
  - The ~ operator performs text search (case-insensitive substring match)
  - Results are limited to 10 per page by default; use --limit to change
  - Use --next-page with the token from the previous response to fetch
    additional pages")]
pub struct SearchOptions {
    /// JQL query (e.g., "project = PROJ AND status = Open")
    #[clap(env = "JIRA_QUERY")]
    pub jql_query: String,

    /// Maximum number of results to return per page
    #[arg(short, long, default_value = "10")]
    pub limit: usize,

    /// Pagination token for fetching the next page (token-based pagination)
    #[arg(long)]
    pub next_page: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Output structure for a single issue
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct IssueOutput {
    pub key: String,
    pub summary: String,
    pub description: Option<String>,
    pub status: String,
    pub issue_type: Option<String>,
    pub assignee: String,
}

/// Output structure for the search command
#[derive(Debug, Serialize)]
pub struct SearchOutput {
    pub issues: Vec<IssueOutput>,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// Public data function - used by the CLI handler
pub async fn search_issues_data(
    query: String,
    limit: usize,
    next_page: Option<String>,
) -> Result<SearchOutput> {
    let config = JiraConfig::from_env()?;
    let client = create_authenticated_client(&config)?;

    let response = search_issues(
        &client,
        &config,
        &query,
        limit,
        next_page.as_deref(),
        "summary,description,status,issuetype,assignee",
        None,
    )
    .await?;

    let issues: Vec<IssueOutput> = response
        .issues
        .into_iter()
        .map(|issue| IssueOutput {
            assignee: assignee_name(&issue),
            description: extract_description(issue.fields.description),
            issue_type: issue.fields.issuetype.map(|t| t.name),
            key: issue.key,
            summary: issue.fields.summary,
            status: issue.fields.status.name,
        })
        .collect();

    Ok(SearchOutput {
        total: response.total.map(|t| t as usize).unwrap_or(issues.len()),
        issues,
        next_page_token: response.next_page_token,
    })
}

/// Handle the search command
pub async fn handler(options: SearchOptions, global: crate::Global) -> Result<()> {
    if global.verbose {
        println!("Searching issues for query: {}", options.jql_query);
    }

    let data = search_issues_data(
        options.jql_query.clone(),
        options.limit,
        options.next_page,
    )
    .await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    println!("Found {} issue(s):\n", data.issues.len());

    if data.issues.is_empty() {
        println!("No issues found.");
        return Ok(());
    }

    let mut table = crate::prelude::new_table();
    table.add_row(prettytable::row!["Key", "Type", "Summary", "Status", "Assignee"]);

    for issue in &data.issues {
        table.add_row(prettytable::row![
            &issue.key,
            issue.issue_type.as_deref().unwrap_or("-"),
            &issue.summary,
            &issue.status,
            &issue.assignee
        ]);
    }

    table.printstd();

    if let Some(next_token) = &data.next_page_token {
        eprintln!(
            "\nTo fetch the next page, run:\n  jiralint search '{}' --limit {} --next-page {}",
            options.jql_query, options.limit, next_token
        );
    }

    Ok(())
}
