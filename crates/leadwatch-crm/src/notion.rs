//! Notion database client — one query request, then local normalization.

use async_trait::async_trait;
use chrono::NaiveDate;
use leadwatch_core::config::{FieldMapping, NotionConfig};
use leadwatch_core::error::{LeadWatchError, Result};
use leadwatch_core::traits::LeadSource;
use leadwatch_core::types::Lead;
use serde::Deserialize;
use std::time::Duration;

use crate::normalize::normalize_page;

const SERVICE: &str = "Notion";

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<serde_json::Value>,
}

/// Extract leads with a one-shot client. Validates credentials first.
pub async fn fetch_leads(config: &NotionConfig, fields: &FieldMapping) -> Result<Vec<Lead>> {
    NotionClient::new(config.clone(), fields.clone())?
        .fetch_leads()
        .await
}

/// Client for one Notion CRM database.
pub struct NotionClient {
    config: NotionConfig,
    fields: FieldMapping,
    client: reqwest::Client,
}

impl NotionClient {
    /// Fails with [`LeadWatchError::Config`] when the token or database id is missing.
    pub fn new(config: NotionConfig, fields: FieldMapping) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .user_agent("LeadWatch/0.1")
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LeadWatchError::Network(format!("Client error: {e}")))?;
        Ok(Self {
            config,
            fields,
            client,
        })
    }

    fn query_url(&self) -> String {
        format!(
            "{}/databases/{}/query",
            self.config.api_base.trim_end_matches('/'),
            self.config.database_id
        )
    }

    /// Raw page objects from the database query.
    pub async fn query_pages(&self) -> Result<Vec<serde_json::Value>> {
        tracing::debug!("Querying Notion database {}", self.config.database_id);

        let response = self
            .client
            .post(self.query_url())
            .bearer_auth(&self.config.token)
            .header("Notion-Version", &self.config.version)
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<unreadable body: {e}>"));
            return Err(LeadWatchError::Upstream {
                service: SERVICE.into(),
                status: status.as_u16(),
                description: body,
            });
        }

        let body: QueryResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                self.transport_error(e)
            } else {
                LeadWatchError::Upstream {
                    service: SERVICE.into(),
                    status: status.as_u16(),
                    description: format!("Invalid query response: {e}"),
                }
            }
        })?;
        Ok(body.results)
    }

    /// Query and normalize, computing staleness against `today`.
    pub async fn fetch_leads_on(&self, today: NaiveDate) -> Result<Vec<Lead>> {
        let pages = self.query_pages().await?;
        let leads: Vec<Lead> = pages
            .iter()
            .map(|page| normalize_page(page, &self.fields, today))
            .collect();

        let degraded = leads.iter().filter(|l| l.has_unknown_contact()).count();
        tracing::info!(
            "Extracted {} leads from Notion ({} without a usable contact date)",
            leads.len(),
            degraded
        );
        Ok(leads)
    }

    fn transport_error(&self, e: reqwest::Error) -> LeadWatchError {
        if e.is_timeout() {
            LeadWatchError::Timeout {
                service: SERVICE.into(),
                secs: self.config.timeout_secs,
            }
        } else {
            LeadWatchError::Network(format!("Notion query failed: {e}"))
        }
    }
}

#[async_trait]
impl LeadSource for NotionClient {
    fn name(&self) -> &str {
        "notion"
    }

    async fn fetch_leads(&self) -> Result<Vec<Lead>> {
        self.fetch_leads_on(chrono::Local::now().date_naive()).await
    }
}
