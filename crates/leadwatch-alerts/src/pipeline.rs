//! One alert run: extract → compose → notify.

use chrono::NaiveDate;
use leadwatch_core::error::{LeadWatchError, Result};
use leadwatch_core::traits::{LeadSource, Notifier};
use leadwatch_core::types::Ack;

use crate::buckets::{BucketCounts, Buckets};
use crate::compose::AlertComposer;

/// What happened to the composed message.
#[derive(Debug)]
pub enum Delivery {
    Sent(Ack),
    /// Dry run; nothing was sent.
    Skipped,
    /// The notifier failed. The run itself still produced a message.
    Failed(LeadWatchError),
}

#[derive(Debug)]
pub struct RunReport {
    pub total_leads: usize,
    pub counts: BucketCounts,
    pub message: String,
    pub delivery: Delivery,
}

impl RunReport {
    pub fn delivered(&self) -> bool {
        matches!(self.delivery, Delivery::Sent(_))
    }
}

/// Run the pipeline once. Without a notifier this is a dry run: the message is
/// composed and returned but not sent.
///
/// Extraction failures abort with `Err`: there is no partial lead list worth
/// alerting on. Notification failures are reported in [`RunReport::delivery`]
/// so the caller can decide whether to escalate.
pub async fn run_alerts(
    source: &dyn LeadSource,
    notifier: Option<&dyn Notifier>,
    composer: &AlertComposer,
    today: NaiveDate,
) -> Result<RunReport> {
    let leads = source.fetch_leads().await?;
    let buckets = Buckets::classify(&leads);
    let counts = buckets.counts();
    tracing::info!(
        "{} leads from {}: {} critical, {} warning, {} attention, {} recent",
        leads.len(),
        source.name(),
        counts.critical,
        counts.warning,
        counts.attention,
        counts.recent
    );

    let message = composer.render(&buckets, today);

    let delivery = match notifier {
        None => {
            tracing::info!("Dry run: alert composed, not sent");
            Delivery::Skipped
        }
        Some(notifier) => match notifier.send(&message).await {
            Ok(ack) => Delivery::Sent(ack),
            Err(e) => {
                tracing::error!("Failed to deliver alert via {}: {e}", notifier.name());
                Delivery::Failed(e)
            }
        },
    };

    Ok(RunReport {
        total_leads: leads.len(),
        counts,
        message,
        delivery,
    })
}
