use serde::Deserialize;

use crate::prelude::*;
use jiralint_core::issue::{CustomFieldNames, Issue};

pub mod board;
pub mod rate;
pub mod search;

/// Jira configuration from environment variables
#[derive(Debug, Clone)]
pub struct JiraConfig {
    pub base_url: String,
    pub email: String,
    pub api_token: String,
    /// Custom field identifiers (customfield_*) for the quality fields, when
    /// the tracker has them.
    pub quality_field: Option<String>,
    pub quality_reason_field: Option<String>,
    pub qa_impact_field: Option<String>,
}

impl JiraConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            base_url: std::env::var("JIRA_BASE_URL")
                .map_err(|_| eyre!("JIRA_BASE_URL environment variable not set"))?,
            email: std::env::var("JIRA_EMAIL")
                .map_err(|_| eyre!("JIRA_EMAIL environment variable not set"))?,
            api_token: std::env::var("JIRA_API_TOKEN")
                .map_err(|_| eyre!("JIRA_API_TOKEN environment variable not set"))?,
            quality_field: std::env::var("JIRALINT_QUALITY_FIELD").ok(),
            quality_reason_field: std::env::var("JIRALINT_QUALITY_REASON_FIELD").ok(),
            qa_impact_field: std::env::var("JIRALINT_QA_IMPACT_FIELD").ok(),
        })
    }

    /// Custom field names as consumed by the core enrichment step
    pub fn custom_field_names(&self) -> CustomFieldNames {
        CustomFieldNames {
            quality: self.quality_field.clone(),
            quality_reason: self.quality_reason_field.clone(),
            qa_impact_statement: self.qa_impact_field.clone(),
        }
    }

    /// Browsable URL for an issue key
    pub fn view_link(&self, key: &str) -> String {
        format!("{}/browse/{}", self.base_url.trim_end_matches('/'), key)
    }
}

/// Create an authenticated HTTP client with Basic Auth headers
pub fn create_authenticated_client(config: &JiraConfig) -> Result<reqwest::Client> {
    use base64::Engine;
    use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

    let auth_string = format!("{}:{}", config.email, config.api_token);
    let auth_encoded = base64::engine::general_purpose::STANDARD.encode(&auth_string);

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Basic {auth_encoded}"))
            .map_err(|e| eyre!("Invalid header value: {}", e))?,
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .map_err(|e| eyre!("Failed to build HTTP client: {}", e))
}

/// Search response from Jira API
/// The GET /rest/api/3/search/jql endpoint returns this structure
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub issues: Vec<Issue>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    #[serde(rename = "isLast")]
    pub is_last: Option<bool>,
    #[serde(default)]
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

/// Run a JQL search, requesting the given field set.
///
/// This endpoint uses token-based pagination, not offset-based.
pub async fn search_issues(
    client: &reqwest::Client,
    config: &JiraConfig,
    jql: &str,
    limit: usize,
    next_page: Option<&str>,
    fields: &str,
    expand: Option<&str>,
) -> Result<SearchResponse> {
    // Handle base_url that may or may not have trailing slash
    let base_url = config.base_url.trim_end_matches('/');
    let url = format!("{base_url}/rest/api/3/search/jql");

    let max_results = std::cmp::min(limit, 100); // Jira API max is 100
    let max_results_str = max_results.to_string();

    let mut query_params = vec![
        ("jql", jql),
        ("maxResults", max_results_str.as_str()),
        ("fields", fields),
    ];
    if let Some(expand) = expand {
        query_params.push(("expand", expand));
    }
    if let Some(token) = next_page {
        query_params.push(("nextPageToken", token));
    }

    let response = client
        .get(&url)
        .query(&query_params)
        .send()
        .await
        .map_err(|e| eyre!("Failed to send request to Jira: {}", e))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(eyre!("Jira API error [{}]: {}", status, body));
    }

    let body_text = response
        .text()
        .await
        .map_err(|e| eyre!("Failed to read response body: {}", e))?;

    let search_response: SearchResponse = serde_json::from_str(&body_text)
        .map_err(|e| eyre!("Failed to parse Jira response: {}", e))?;

    Ok(search_response)
}

/// Display name of an issue's assignee, falling back to their email.
pub fn assignee_name(issue: &Issue) -> String {
    issue
        .fields
        .assignee
        .as_ref()
        .and_then(|a| a.display_name.clone().or_else(|| a.email_address.clone()))
        .unwrap_or_else(|| "Unassigned".to_string())
}
