//! Staleness buckets.

use leadwatch_core::types::{Lead, Staleness};
use serde::{Deserialize, Serialize};

/// Leads grouped by staleness, each bucket sorted oldest contact first.
#[derive(Debug, Default)]
pub struct Buckets<'a> {
    pub critical: Vec<&'a Lead>,
    pub warning: Vec<&'a Lead>,
    pub attention: Vec<&'a Lead>,
    pub recent: Vec<&'a Lead>,
}

impl<'a> Buckets<'a> {
    pub fn classify(leads: &'a [Lead]) -> Self {
        let mut buckets = Self::default();
        for lead in leads {
            buckets.bucket_mut(lead.staleness()).push(lead);
        }
        for bucket in [
            &mut buckets.critical,
            &mut buckets.warning,
            &mut buckets.attention,
            &mut buckets.recent,
        ] {
            // Stable: ties keep source order
            bucket.sort_by(|a, b| b.days_since_contact.cmp(&a.days_since_contact));
        }
        buckets
    }

    pub fn get(&self, staleness: Staleness) -> &[&'a Lead] {
        match staleness {
            Staleness::Critical => &self.critical,
            Staleness::Warning => &self.warning,
            Staleness::Attention => &self.attention,
            Staleness::Recent => &self.recent,
        }
    }

    fn bucket_mut(&mut self, staleness: Staleness) -> &mut Vec<&'a Lead> {
        match staleness {
            Staleness::Critical => &mut self.critical,
            Staleness::Warning => &mut self.warning,
            Staleness::Attention => &mut self.attention,
            Staleness::Recent => &mut self.recent,
        }
    }

    /// Leads needing follow-up (critical + warning + attention).
    pub fn alert_count(&self) -> usize {
        self.critical.len() + self.warning.len() + self.attention.len()
    }

    pub fn counts(&self) -> BucketCounts {
        BucketCounts {
            critical: self.critical.len(),
            warning: self.warning.len(),
            attention: self.attention.len(),
            recent: self.recent.len(),
        }
    }
}

/// Bucket sizes, for logs and run reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCounts {
    pub critical: usize,
    pub warning: usize,
    pub attention: usize,
    pub recent: usize,
}

impl BucketCounts {
    pub fn needing_follow_up(&self) -> usize {
        self.critical + self.warning + self.attention
    }

    pub fn total(&self) -> usize {
        self.needing_follow_up() + self.recent
    }
}
