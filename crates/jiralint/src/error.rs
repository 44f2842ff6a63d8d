#[derive(thiserror::Error, Debug, serde::Deserialize, serde::Serialize)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    #[error("Generic {0}")]
    Generic(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Jira API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),
}
