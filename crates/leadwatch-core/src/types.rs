//! Canonical values shared across the pipeline.

use serde::{Deserialize, Serialize};

/// Display name used when the source record has no name.
pub const NO_NAME: &str = "Sin nombre";
/// `last_contact` value used when the source record has no date.
pub const NO_DATE: &str = "Sin fecha";
/// Default `status` when the source record has none.
pub const DEFAULT_STATUS: &str = "Lead";
/// Staleness sentinel for a missing or unparsable contact date.
pub const UNKNOWN_DAYS: u32 = 999;

/// A normalized CRM lead. Every field is always populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    pub url: String,
    pub name: String,
    /// `YYYY-MM-DD`, [`NO_DATE`], or the raw source value when it did not parse.
    pub last_contact: String,
    /// Days between the last contact and today, or [`UNKNOWN_DAYS`].
    pub days_since_contact: u32,
    pub status: String,
    pub email: String,
    pub company: String,
    pub contact_person: String,
    pub telegram: String,
    /// Comma-separated tag names.
    pub tags: String,
    pub notes: String,
    pub owner: String,
}

impl Default for Lead {
    fn default() -> Self {
        Self {
            id: String::new(),
            url: String::new(),
            name: NO_NAME.into(),
            last_contact: NO_DATE.into(),
            days_since_contact: UNKNOWN_DAYS,
            status: DEFAULT_STATUS.into(),
            email: String::new(),
            company: String::new(),
            contact_person: String::new(),
            telegram: String::new(),
            tags: String::new(),
            notes: String::new(),
            owner: String::new(),
        }
    }
}

impl Lead {
    pub fn staleness(&self) -> Staleness {
        Staleness::from_days(self.days_since_contact)
    }

    /// Whether the contact date was missing or unparsable.
    pub fn has_unknown_contact(&self) -> bool {
        self.days_since_contact == UNKNOWN_DAYS
    }
}

/// Urgency bucket derived from days since last contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Staleness {
    /// 21 days or more.
    Critical,
    /// 14 to 20 days.
    Warning,
    /// 7 to 13 days.
    Attention,
    /// Under 7 days. Counted, never alerted on.
    Recent,
}

impl Staleness {
    pub fn from_days(days: u32) -> Self {
        match days {
            21.. => Self::Critical,
            14..=20 => Self::Warning,
            7..=13 => Self::Attention,
            _ => Self::Recent,
        }
    }

    pub fn is_alert(self) -> bool {
        !matches!(self, Self::Recent)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Attention => "attention",
            Self::Recent => "recent",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Critical => "🔴",
            Self::Warning => "🟡",
            Self::Attention => "🟠",
            Self::Recent => "✅",
        }
    }

    /// Human range, e.g. `21+ days`.
    pub fn range(self) -> &'static str {
        match self {
            Self::Critical => "21+ days",
            Self::Warning => "14-20 days",
            Self::Attention => "7-13 days",
            Self::Recent => "0-6 days",
        }
    }
}

impl std::fmt::Display for Staleness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Delivery receipt returned by a notifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub chat_id: String,
    pub message_id: i64,
    pub thread_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staleness_boundaries() {
        assert_eq!(Staleness::from_days(0), Staleness::Recent);
        assert_eq!(Staleness::from_days(6), Staleness::Recent);
        assert_eq!(Staleness::from_days(7), Staleness::Attention);
        assert_eq!(Staleness::from_days(13), Staleness::Attention);
        assert_eq!(Staleness::from_days(14), Staleness::Warning);
        assert_eq!(Staleness::from_days(20), Staleness::Warning);
        assert_eq!(Staleness::from_days(21), Staleness::Critical);
        assert_eq!(Staleness::from_days(UNKNOWN_DAYS), Staleness::Critical);
    }

    #[test]
    fn test_staleness_exhaustive_and_exclusive() {
        for days in 0..60 {
            let s = Staleness::from_days(days);
            let expected = if days >= 21 {
                Staleness::Critical
            } else if days >= 14 {
                Staleness::Warning
            } else if days >= 7 {
                Staleness::Attention
            } else {
                Staleness::Recent
            };
            assert_eq!(s, expected, "days = {days}");
            assert_eq!(s.is_alert(), days >= 7);
        }
    }

    #[test]
    fn test_default_lead_is_total() {
        let lead = Lead::default();
        assert_eq!(lead.name, NO_NAME);
        assert_eq!(lead.last_contact, NO_DATE);
        assert_eq!(lead.status, DEFAULT_STATUS);
        assert!(lead.has_unknown_contact());
        assert!(lead.email.is_empty());
    }

    #[test]
    fn test_lead_serializes_every_field() {
        let json = serde_json::to_value(Lead::default()).unwrap();
        for key in [
            "id",
            "url",
            "name",
            "last_contact",
            "days_since_contact",
            "status",
            "email",
            "company",
            "contact_person",
            "telegram",
            "tags",
            "notes",
            "owner",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }
}
