// src/context/client.rs — Transport to the project-context service

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use super::types::{ContextUpdate, ProjectContext};

/// Where project context comes from. Errors are reported to the caller, who
/// decides how to degrade.
#[async_trait]
pub trait ContextSource: Send + Sync {
    /// `Ok(None)` when the service does not know the project.
    async fn fetch(&self, project: &str) -> anyhow::Result<Option<ProjectContext>>;

    /// `Ok(true)` when the service accepted the update.
    async fn send(&self, project: &str, update: &ContextUpdate) -> anyhow::Result<bool>;
}

#[derive(Deserialize)]
struct ContextEnvelope {
    #[serde(default)]
    context: Option<ProjectContext>,
}

/// REST client for the context service (`GET /project/{name}`,
/// `POST /project/{name}/{endpoint}`).
pub struct HttpContextSource {
    client: Client,
    base_url: String,
}

impl HttpContextSource {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn project_url(&self, project: &str) -> String {
        format!("{}/project/{}", self.base_url, project)
    }
}

#[async_trait]
impl ContextSource for HttpContextSource {
    async fn fetch(&self, project: &str) -> anyhow::Result<Option<ProjectContext>> {
        let url = self.project_url(project);
        let resp = self.client.get(&url).send().await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Context service GET {url} returned {status}: {body}");
        }

        let envelope: ContextEnvelope = resp.json().await?;
        let mut context = envelope.context.unwrap_or_default();
        if context.name.is_empty() {
            context.name = project.to_string();
        }
        Ok(Some(context))
    }

    async fn send(&self, project: &str, update: &ContextUpdate) -> anyhow::Result<bool> {
        let url = format!("{}/{}", self.project_url(project), update.endpoint());
        let resp = self.client.post(&url).json(update).send().await?;
        let status = resp.status();
        if !status.is_success() {
            tracing::warn!("Context service POST {} returned {}", url, status);
        }
        Ok(status.is_success())
    }
}

/// Used when context integration is turned off.
pub struct DisabledContextSource;

#[async_trait]
impl ContextSource for DisabledContextSource {
    async fn fetch(&self, _project: &str) -> anyhow::Result<Option<ProjectContext>> {
        Ok(None)
    }

    async fn send(&self, _project: &str, _update: &ContextUpdate) -> anyhow::Result<bool> {
        Ok(false)
    }
}
