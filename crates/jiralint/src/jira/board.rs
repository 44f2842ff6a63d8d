//! Kanban board discovery via the Jira Agile API
//!
//! An issue's project may have a Kanban board whose columns group raw
//! statuses. The rate command uses that mapping to derive board-column
//! names; projects without a discoverable board fall back to raw status
//! names.

use std::collections::HashMap;

use serde::Deserialize;

use crate::jira::JiraConfig;
use crate::prelude::*;
use jiralint_core::issue::{Board, BoardColumn};

#[derive(Debug, Deserialize)]
struct BoardList {
    #[serde(default)]
    values: Vec<BoardRef>,
}

#[derive(Debug, Deserialize)]
struct BoardRef {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct BoardConfiguration {
    #[serde(rename = "columnConfig")]
    column_config: ColumnConfig,
}

#[derive(Debug, Deserialize)]
struct ColumnConfig {
    #[serde(default)]
    columns: Vec<ColumnEntry>,
}

#[derive(Debug, Deserialize)]
struct ColumnEntry {
    name: String,
    #[serde(default)]
    statuses: Vec<StatusRef>,
}

#[derive(Debug, Deserialize)]
struct StatusRef {
    id: String,
}

/// Per-run memo of project key to board context.
///
/// Projects without a Kanban board memoize as `None` so the lookup is not
/// repeated for every issue of the project.
#[derive(Debug, Default)]
pub struct BoardCache {
    boards: HashMap<String, Option<Board>>,
}

impl BoardCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Board context for a project key, fetching it on first use.
    pub async fn board_for_project(
        &mut self,
        client: &reqwest::Client,
        config: &JiraConfig,
        project_key: &str,
    ) -> Result<Option<Board>> {
        if let Some(cached) = self.boards.get(project_key) {
            return Ok(cached.clone());
        }

        let board = fetch_board(client, config, project_key).await?;
        self.boards.insert(project_key.to_string(), board.clone());
        Ok(board)
    }
}

/// Fetch the first Kanban board for a project, with its column mapping.
async fn fetch_board(
    client: &reqwest::Client,
    config: &JiraConfig,
    project_key: &str,
) -> Result<Option<Board>> {
    let base_url = config.base_url.trim_end_matches('/');
    let boards_url = format!(
        "{}/rest/agile/1.0/board?projectKeyOrId={}&type=kanban",
        base_url,
        urlencoding::encode(project_key)
    );

    let response = client
        .get(&boards_url)
        .send()
        .await
        .map_err(|e| eyre!("Failed to send board request to Jira: {}", e))?;

    if !response.status().is_success() {
        // Projects without agile boards answer 4xx here; that is a normal
        // fallback case, not a hard failure.
        log::debug!(
            "No board for project {project_key}: HTTP {}",
            response.status()
        );
        return Ok(None);
    }

    let board_list: BoardList = response
        .json()
        .await
        .map_err(|e| eyre!("Failed to parse board list: {}", e))?;

    let Some(board_ref) = board_list.values.first() else {
        log::debug!("Project {project_key} has no Kanban board");
        return Ok(None);
    };

    let config_url = format!(
        "{}/rest/agile/1.0/board/{}/configuration",
        base_url, board_ref.id
    );

    let response = client
        .get(&config_url)
        .send()
        .await
        .map_err(|e| eyre!("Failed to send board configuration request: {}", e))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(eyre!("Jira API error [{}]: {}", status, body));
    }

    let configuration: BoardConfiguration = response
        .json()
        .await
        .map_err(|e| eyre!("Failed to parse board configuration: {}", e))?;

    let columns = configuration
        .column_config
        .columns
        .into_iter()
        .map(|column| BoardColumn {
            name: column.name,
            status_ids: column.statuses.into_iter().map(|s| s.id).collect(),
        })
        .collect();

    Ok(Some(Board { columns }))
}
