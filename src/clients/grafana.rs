use std::fmt;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::config::GrafanaConfig;

#[derive(Debug)]
pub enum GrafanaError {
    NotConfigured,
    InvalidUrl { url: String, message: String },
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

impl fmt::Display for GrafanaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConfigured => write!(
                f,
                "grafana is not configured; add a [grafana] section to the config"
            ),
            Self::InvalidUrl { url, message } => {
                write!(f, "invalid grafana url '{url}': {message}")
            }
            Self::Construction { message } => {
                write!(f, "failed to construct grafana client: {message}")
            }
            Self::Request { operation, source } => {
                write!(f, "grafana {operation} failed: {source}")
            }
            Self::Api {
                operation,
                status,
                body,
            } => write!(f, "grafana {operation} failed: API error {status}: {body}"),
        }
    }
}

impl std::error::Error for GrafanaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Request { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Dashboard {
    pub uid: String,
    pub title: String,
    pub url: String,
    #[serde(rename = "folderTitle")]
    pub folder_title: Option<String>,
}

#[derive(Debug)]
pub struct GrafanaClient {
    client: reqwest::Client,
    base: reqwest::Url,
    token: Option<String>,
}

impl GrafanaClient {
    pub fn new(cfg: &GrafanaConfig) -> Result<Self, GrafanaError> {
        let base = reqwest::Url::parse(&cfg.url).map_err(|err| GrafanaError::InvalidUrl {
            url: cfg.url.clone(),
            message: err.to_string(),
        })?;

        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| GrafanaError::Construction {
                message: err.to_string(),
            })?;

        Ok(Self {
            client,
            base,
            token: cfg.token.clone(),
        })
    }

    /// Lists dashboards via the search API.
    pub async fn dashboards(&self) -> Result<Vec<Dashboard>, GrafanaError> {
        let operation = "dashboard search";
        let url = self
            .base
            .join("/api/search")
            .map_err(|err| GrafanaError::InvalidUrl {
                url: self.base.to_string(),
                message: err.to_string(),
            })?;

        let mut request = self.client.get(url).query(&[("type", "dash-db")]);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|source| GrafanaError::Request { operation, source })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GrafanaError::Api {
                operation,
                status,
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|source| GrafanaError::Request { operation, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_an_invalid_url() {
        let cfg = GrafanaConfig {
            url: "not a url".to_string(),
            token: None,
        };
        assert!(matches!(
            GrafanaClient::new(&cfg),
            Err(GrafanaError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn parses_dashboard_listing() {
        let dashboards: Vec<Dashboard> = serde_json::from_str(
            r#"[{"uid":"abc","title":"API latency","url":"/d/abc/api-latency","folderTitle":"SRE","type":"dash-db"}]"#,
        )
        .unwrap();
        assert_eq!(dashboards[0].title, "API latency");
        assert_eq!(dashboards[0].folder_title.as_deref(), Some("SRE"));
    }
}
