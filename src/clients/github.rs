use std::env;
use std::fmt;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::config::GithubConfig;

const API_BASE: &str = "https://api.github.com";
const TOKEN_ENV: &str = "GITHUB_TOKEN";

#[derive(Debug)]
pub enum GithubError {
    NotConfigured,
    MissingToken,
    Construction { message: String },
    Request {
        operation: &'static str,
        source: reqwest::Error,
    },
    Api {
        operation: &'static str,
        status: StatusCode,
        body: String,
    },
}

impl fmt::Display for GithubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConfigured => write!(
                f,
                "github is not configured; add a [github] section to the config"
            ),
            Self::MissingToken => write!(
                f,
                "github token is not set and {TOKEN_ENV} is not in the environment"
            ),
            Self::Construction { message } => {
                write!(f, "failed to construct github client: {message}")
            }
            Self::Request { operation, source } => {
                write!(f, "github {operation} failed: {source}")
            }
            Self::Api {
                operation,
                status,
                body,
            } => write!(f, "github {operation} failed: API error {status}: {body}"),
        }
    }
}

impl std::error::Error for GithubError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Request { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Repo {
    pub name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub stargazers_count: u64,
    pub private: bool,
}

#[derive(Debug)]
pub struct GithubClient {
    client: reqwest::Client,
    token: String,
    org: String,
}

impl GithubClient {
    pub fn new(cfg: &GithubConfig) -> Result<Self, GithubError> {
        let token = match cfg.token.as_deref().filter(|token| !token.trim().is_empty()) {
            Some(token) => token.to_string(),
            None => env::var(TOKEN_ENV)
                .ok()
                .filter(|token| !token.trim().is_empty())
                .ok_or(GithubError::MissingToken)?,
        };

        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| GithubError::Construction {
                message: err.to_string(),
            })?;

        Ok(Self {
            client,
            token,
            org: cfg.org.clone(),
        })
    }

    /// Lists the configured org's repositories.
    pub async fn repos(&self) -> Result<Vec<Repo>, GithubError> {
        let operation = "list repos";
        let url = format!("{API_BASE}/orgs/{}/repos", self.org);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::USER_AGENT, "aictl")
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|source| GithubError::Request { operation, source })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GithubError::Api {
                operation,
                status,
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|source| GithubError::Request { operation, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_config_token() {
        let cfg = GithubConfig {
            token: Some("ghp_test".to_string()),
            org: "acme".to_string(),
        };
        assert!(GithubClient::new(&cfg).is_ok());
    }

    #[test]
    fn parses_repo_listing() {
        let repos: Vec<Repo> = serde_json::from_str(
            r#"[{"name":"widget","description":null,"html_url":"https://github.com/acme/widget","stargazers_count":3,"private":false,"fork":false}]"#,
        )
        .unwrap();
        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0].name, "widget");
        assert!(repos[0].description.is_none());
    }
}
