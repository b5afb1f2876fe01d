//! Seams between the pipeline stages.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Ack, Lead};

/// Anything that can produce a fresh snapshot of leads.
#[async_trait]
pub trait LeadSource: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch and normalize every lead. Fails as a whole; per-record anomalies
    /// are absorbed into the returned leads.
    async fn fetch_leads(&self) -> Result<Vec<Lead>>;
}

/// A destination for pre-formatted alert messages.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    /// Deliver one message. Never retries.
    async fn send(&self, message: &str) -> Result<Ack>;
}
