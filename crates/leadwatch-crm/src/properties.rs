//! Reading Notion property objects as plain text.
//!
//! Notion nests each value under a key named after the property type, e.g.
//! `{"type": "select", "select": {"name": "Hot"}}`. A candidate only matches
//! when the property exists under that key and yields non-empty text.

use leadwatch_core::config::{FieldCandidate, PropertyShape};
use serde_json::{Map, Value};

pub type Properties = Map<String, Value>;

/// Try each candidate in order; the first non-empty value wins.
pub fn first_match(props: &Properties, candidates: &[FieldCandidate]) -> Option<String> {
    candidates.iter().find_map(|c| extract_text(props, c))
}

/// Like [`first_match`] but total: falls back to `default`.
pub fn text_or(props: &Properties, candidates: &[FieldCandidate], default: &str) -> String {
    first_match(props, candidates).unwrap_or_else(|| default.to_string())
}

/// Read one property with one shape.
pub fn extract_text(props: &Properties, candidate: &FieldCandidate) -> Option<String> {
    let prop = props.get(&candidate.property)?;
    let value = prop.get(candidate.shape.key())?;

    let text = match candidate.shape {
        PropertyShape::Title | PropertyShape::RichText => first_plain_text(value),
        PropertyShape::Select | PropertyShape::Status => named(value),
        PropertyShape::People => value.as_array()?.first().and_then(named),
        PropertyShape::MultiSelect => {
            let names: Vec<String> = value.as_array()?.iter().filter_map(named).collect();
            Some(names.join(", "))
        }
        PropertyShape::Email | PropertyShape::Url | PropertyShape::PhoneNumber => {
            value.as_str().map(str::to_string)
        }
    }?;

    if text.is_empty() { None } else { Some(text) }
}

/// `date.start` of a date property, if set.
pub fn date_start<'a>(props: &'a Properties, property: &str) -> Option<&'a str> {
    props
        .get(property)?
        .get("date")?
        .get("start")?
        .as_str()
        .filter(|s| !s.is_empty())
}

fn first_plain_text(value: &Value) -> Option<String> {
    value
        .as_array()?
        .first()?
        .get("plain_text")?
        .as_str()
        .map(str::to_string)
}

fn named(value: &Value) -> Option<String> {
    value
        .get("name")?
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use PropertyShape::*;

    fn props(value: Value) -> Properties {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_title_and_rich_text_take_first_segment() {
        let p = props(json!({
            "Customer": {"type": "title", "title": [
                {"plain_text": "Acme"}, {"plain_text": " Corp"}
            ]},
            "Notes": {"type": "rich_text", "rich_text": [{"plain_text": "call back"}]}
        }));
        assert_eq!(
            extract_text(&p, &FieldCandidate::new("Customer", Title)).as_deref(),
            Some("Acme")
        );
        assert_eq!(
            extract_text(&p, &FieldCandidate::new("Notes", RichText)).as_deref(),
            Some("call back")
        );
    }

    #[test]
    fn test_select_status_people() {
        let p = props(json!({
            "Status": {"type": "status", "status": {"name": "Negotiation"}},
            "Industry": {"type": "select", "select": {"name": "Fintech"}},
            "Owner": {"type": "people", "people": [{"name": "Ana"}, {"name": "Luis"}]}
        }));
        assert_eq!(extract_text(&p, &FieldCandidate::new("Status", Status)).as_deref(), Some("Negotiation"));
        assert_eq!(extract_text(&p, &FieldCandidate::new("Status", Select)), None);
        assert_eq!(extract_text(&p, &FieldCandidate::new("Industry", Select)).as_deref(), Some("Fintech"));
        assert_eq!(extract_text(&p, &FieldCandidate::new("Owner", People)).as_deref(), Some("Ana"));
    }

    #[test]
    fn test_multi_select_joins_names() {
        let p = props(json!({
            "Tags": {"type": "multi_select", "multi_select": [
                {"name": "web3"}, {"name": "hackathon"}, {"name": "mx"}
            ]}
        }));
        assert_eq!(
            extract_text(&p, &FieldCandidate::new("Tags", MultiSelect)).as_deref(),
            Some("web3, hackathon, mx")
        );
    }

    #[test]
    fn test_scalar_shapes() {
        let p = props(json!({
            "Email ": {"type": "email", "email": "ana@example.com"},
            "Site": {"type": "url", "url": null},
            "Phone": {"type": "phone_number", "phone_number": "+52 55 1234"}
        }));
        assert_eq!(extract_text(&p, &FieldCandidate::new("Email ", Email)).as_deref(), Some("ana@example.com"));
        assert_eq!(extract_text(&p, &FieldCandidate::new("Site", Url)), None);
        assert_eq!(extract_text(&p, &FieldCandidate::new("Phone", PhoneNumber)).as_deref(), Some("+52 55 1234"));
    }

    #[test]
    fn test_empty_values_do_not_match() {
        let p = props(json!({
            "Industry": {"type": "select", "select": null},
            "Tags": {"type": "multi_select", "multi_select": []},
            "Customer": {"type": "title", "title": []},
            "Owner": {"type": "people", "people": []}
        }));
        assert_eq!(extract_text(&p, &FieldCandidate::new("Industry", Select)), None);
        assert_eq!(extract_text(&p, &FieldCandidate::new("Tags", MultiSelect)), None);
        assert_eq!(extract_text(&p, &FieldCandidate::new("Customer", Title)), None);
        assert_eq!(extract_text(&p, &FieldCandidate::new("Owner", People)), None);
        assert_eq!(extract_text(&p, &FieldCandidate::new("Missing", RichText)), None);
    }

    #[test]
    fn test_first_match_order_wins_without_merging() {
        let p = props(json!({
            "Industry": {"type": "rich_text", "rich_text": [{"plain_text": "Retail"}]},
            "Client": {"type": "select", "select": {"name": "BigCo"}}
        }));
        let candidates = vec![
            FieldCandidate::new("Industry", Select),
            FieldCandidate::new("Industry", RichText),
            FieldCandidate::new("Client", Select),
        ];
        assert_eq!(first_match(&p, &candidates).as_deref(), Some("Retail"));
        assert_eq!(text_or(&p, &candidates[..1], "n/a"), "n/a");
    }

    #[test]
    fn test_date_start() {
        let p = props(json!({
            "Last Contact Date": {"type": "date", "date": {"start": "2026-01-06T10:00:00.000-06:00", "end": null}},
            "Empty": {"type": "date", "date": null}
        }));
        assert_eq!(date_start(&p, "Last Contact Date"), Some("2026-01-06T10:00:00.000-06:00"));
        assert_eq!(date_start(&p, "Empty"), None);
        assert_eq!(date_start(&p, "Nope"), None);
    }
}
