//! Page → [`Lead`] normalization. Pure and total: every page yields a lead.

use chrono::NaiveDate;
use leadwatch_core::config::FieldMapping;
use leadwatch_core::error::{LeadWatchError, Result};
use leadwatch_core::types::{DEFAULT_STATUS, Lead, NO_DATE, NO_NAME, UNKNOWN_DAYS};
use serde_json::Value;

use crate::properties::{self, Properties};

/// Normalize one Notion page. Missing `id`, `url` or `properties` become empty.
pub fn normalize_page(page: &Value, fields: &FieldMapping, today: NaiveDate) -> Lead {
    let empty = Properties::new();
    let props = page
        .get("properties")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    let id = page["id"].as_str().unwrap_or_default().to_string();
    let (last_contact, days_since_contact) = contact_staleness(props, fields, today, &id);

    Lead {
        url: page["url"].as_str().unwrap_or_default().to_string(),
        name: properties::text_or(props, &fields.name, NO_NAME),
        last_contact,
        days_since_contact,
        status: properties::text_or(props, &fields.status, DEFAULT_STATUS),
        email: properties::text_or(props, &fields.email, ""),
        company: properties::text_or(props, &fields.company, ""),
        contact_person: properties::text_or(props, &fields.contact_person, ""),
        telegram: properties::text_or(props, &fields.telegram, ""),
        tags: properties::text_or(props, &fields.tags, ""),
        notes: properties::text_or(props, &fields.notes, ""),
        owner: properties::text_or(props, &fields.owner, ""),
        id,
    }
}

/// `(last_contact, days_since_contact)` for a page.
fn contact_staleness(
    props: &Properties,
    fields: &FieldMapping,
    today: NaiveDate,
    page_id: &str,
) -> (String, u32) {
    let Some(raw) = fields
        .last_contact
        .iter()
        .find_map(|name| properties::date_start(props, name))
    else {
        return (NO_DATE.to_string(), UNKNOWN_DAYS);
    };

    match parse_contact_date(raw) {
        Ok(date) => (date.format("%Y-%m-%d").to_string(), days_between(date, today)),
        Err(e) => {
            tracing::warn!("Lead {page_id}: {e}; marking contact as unknown");
            (raw.to_string(), UNKNOWN_DAYS)
        }
    }
}

/// Parse the calendar-date part of a Notion date (`2026-01-06` or
/// `2026-01-06T10:00:00.000-06:00`).
pub fn parse_contact_date(raw: &str) -> Result<NaiveDate> {
    let date_part = raw.split('T').next().unwrap_or(raw).trim();
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|e| LeadWatchError::Parse(format!("could not parse date '{raw}': {e}")))
}

/// Whole days from `date` to `today`. Future dates count as contacted today.
fn days_between(date: NaiveDate, today: NaiveDate) -> u32 {
    let days = (today - date).num_days().max(0);
    u32::try_from(days).unwrap_or(u32::MAX)
}
