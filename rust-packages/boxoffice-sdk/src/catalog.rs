//! Catalog response parsing.
//!
//! The events API has shipped several response shapes over time (`{events}`,
//! `{data}`, bare arrays) and several spellings for tier fields. Everything is
//! normalized here into [`Event`] and [`TicketTier`] so nothing downstream has
//! to probe for alternatives.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::CatalogError;
use crate::tier::TicketTier;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub venue_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub organiser_name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub category: Option<String>,
    pub categories: Vec<String>,
    pub price_from: Option<u64>,
    pub status: Option<String>,
    pub ticket_tiers: Vec<TicketTier>,
}

impl Event {
    /// Lower-cased categories from both the list and the single value, without duplicates.
    pub fn category_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for c in self.categories.iter().chain(self.category.iter()) {
            let c = c.to_lowercase();
            if !ids.contains(&c) {
                ids.push(c);
            }
        }
        ids
    }
}

/// Parse a list response: `{ "events": [...] }`, `{ "data": [...] }` or a bare array.
pub fn parse_event_list(value: &Value) -> Result<Vec<Event>, CatalogError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(obj) => match (obj.get("events"), obj.get("data")) {
            (Some(Value::Array(items)), _) => items,
            (_, Some(Value::Array(items))) => items,
            _ => return Err(CatalogError::UnrecognizedShape),
        },
        _ => return Err(CatalogError::UnrecognizedShape),
    };
    items.iter().map(parse_event_object).collect()
}

/// Parse a single-event response, with or without an `event`/`data` envelope.
pub fn parse_event(value: &Value) -> Result<Event, CatalogError> {
    let Value::Object(obj) = value else {
        return Err(CatalogError::UnrecognizedShape);
    };
    for envelope in ["event", "data"] {
        if let Some(inner) = obj.get(envelope).filter(|v| v.is_object()) {
            return parse_event_object(inner);
        }
    }
    parse_event_object(value)
}

pub fn find_event<'a>(events: &'a [Event], id: &str) -> Result<&'a Event, CatalogError> {
    events
        .iter()
        .find(|e| e.id == id)
        .ok_or_else(|| CatalogError::EventNotFound(id.to_string()))
}

fn parse_event_object(value: &Value) -> Result<Event, CatalogError> {
    let Value::Object(obj) = value else {
        return Err(CatalogError::UnrecognizedShape);
    };
    let id = id_field(obj).ok_or(CatalogError::MissingField("id"))?;

    let tiers = match first(obj, &["ticketTiers", "tickets"]) {
        Some(Value::Array(items)) => items.iter().map(parse_tier).collect::<Result<Vec<_>, _>>()?,
        _ => Vec::new(),
    };

    let categories = match obj.get("categories") {
        Some(Value::Array(items)) => items.iter().filter_map(|v| v.as_str().map(str::to_string)).collect(),
        _ => Vec::new(),
    };

    let price_from = match first(obj, &["priceFrom", "price"]).map(|v| parse_amount(v, &id)) {
        Some(Ok(Some(price))) => Some(price),
        _ => tiers.iter().filter(|t| t.is_paid()).map(|t| t.price).min(),
    };

    let event = Event {
        title: string_field(obj, &["title", "name"]).unwrap_or_default(),
        description: string_field(obj, &["description"]),
        venue_name: string_field(obj, &["venueName", "location"]),
        address: string_field(obj, &["address"]),
        city: string_field(obj, &["city"]),
        organiser_name: string_field(obj, &["organiserName", "organizerName"]),
        start_date: string_field(obj, &["startDate", "startsAt"]),
        end_date: string_field(obj, &["endDate", "endsAt"]),
        category: string_field(obj, &["category"]),
        categories,
        price_from,
        status: string_field(obj, &["status"]),
        ticket_tiers: tiers,
        id,
    };
    debug!(event_id = %event.id, tiers = event.ticket_tiers.len(), "parsed event");
    Ok(event)
}

fn parse_tier(value: &Value) -> Result<TicketTier, CatalogError> {
    let Value::Object(obj) = value else {
        return Err(CatalogError::UnrecognizedShape);
    };
    let id = id_field(obj).ok_or(CatalogError::MissingField("ticketTiers[].id"))?;

    let price = match first(obj, &["price", "amount", "unitPrice"]) {
        Some(value) => parse_amount(value, &id)?.unwrap_or(0),
        None => 0,
    };

    let available_quantity = first(
        obj,
        &["availableQuantity", "qtyAvailable", "quantityAvailable", "quantity"],
    )
    .and_then(parse_count);

    Ok(TicketTier {
        name: string_field(obj, &["name", "title"]).unwrap_or_else(|| "Ticket".to_string()),
        price,
        available_quantity,
        description: string_field(obj, &["description", "subtitle"]),
        access: string_field(obj, &["access"]),
        id,
    })
}

fn first<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
}

fn string_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find_map(|v| v.as_str())
        .map(str::to_string)
}

fn id_field(obj: &Map<String, Value>) -> Option<String> {
    match first(obj, &["id", "_id"])? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// `Ok(None)` when not numeric; `InvalidPrice` when negative or not finite.
fn parse_amount(value: &Value, owner: &str) -> Result<Option<u64>, CatalogError> {
    let Some(amount) = as_number(value) else {
        return Ok(None);
    };
    if !amount.is_finite() || amount < 0.0 {
        return Err(CatalogError::InvalidPrice { tier_id: owner.to_string() });
    }
    Ok(Some((amount + 0.5).floor() as u64))
}

fn parse_count(value: &Value) -> Option<u32> {
    let count = as_number(value)?;
    if count.is_nan() {
        return None;
    }
    Some(count.max(0.0).min(u32::MAX as f64) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_shapes() {
        let event = json!({ "id": "e1", "title": "Afrobeats Live" });
        for body in [
            json!({ "events": [event.clone()] }),
            json!({ "data": [event.clone()] }),
            json!([event.clone()]),
        ] {
            let events = parse_event_list(&body).unwrap();
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].title, "Afrobeats Live");
        }
        assert_eq!(
            parse_event_list(&json!({ "message": "ok" })),
            Err(CatalogError::UnrecognizedShape)
        );
        assert_eq!(parse_event_list(&json!("nope")), Err(CatalogError::UnrecognizedShape));
    }

    #[test]
    fn test_single_event_envelopes() {
        let inner = json!({ "id": 7, "title": "Comedy Night" });
        assert_eq!(parse_event(&inner).unwrap().id, "7");
        assert_eq!(parse_event(&json!({ "event": inner.clone() })).unwrap().id, "7");
        assert_eq!(parse_event(&json!({ "data": inner })).unwrap().id, "7");
    }

    #[test]
    fn test_tier_field_fallbacks() {
        let event = parse_event(&json!({
            "id": "e1",
            "title": "Tech Summit",
            "location": "Landmark Centre",
            "startDate": "2026-11-20T09:00:00Z",
            "tickets": [
                { "id": "t1", "title": "Student", "amount": "2500", "qtyAvailable": 40 },
                { "id": "t2", "unitPrice": 99.5, "quantityAvailable": -3 },
                { "id": "t3", "name": "Walk-in", "price": null }
            ]
        }))
        .unwrap();

        assert_eq!(event.venue_name.as_deref(), Some("Landmark Centre"));
        assert_eq!(event.start_date.as_deref(), Some("2026-11-20T09:00:00Z"));
        let tiers = &event.ticket_tiers;
        assert_eq!(tiers[0].name, "Student");
        assert_eq!(tiers[0].price, 2_500);
        assert_eq!(tiers[0].available_quantity, Some(40));
        assert_eq!(tiers[1].name, "Ticket");
        assert_eq!(tiers[1].price, 100);
        assert_eq!(tiers[1].available_quantity, Some(0));
        assert_eq!(tiers[2].price, 0);
        assert_eq!(tiers[2].available_quantity, None);
        assert_eq!(event.price_from, Some(100));
    }

    #[test]
    fn test_negative_price_rejected() {
        let err = parse_event(&json!({
            "id": "e1",
            "ticketTiers": [{ "id": "bad", "price": -10 }]
        }))
        .unwrap_err();
        assert_eq!(err, CatalogError::InvalidPrice { tier_id: "bad".into() });
    }

    #[test]
    fn test_missing_ids() {
        assert_eq!(parse_event(&json!({ "title": "x" })), Err(CatalogError::MissingField("id")));
        assert_eq!(
            parse_event(&json!({ "id": "e", "ticketTiers": [{ "price": 1 }] })),
            Err(CatalogError::MissingField("ticketTiers[].id"))
        );
    }

    #[test]
    fn test_category_ids() {
        let single = parse_event(&json!({ "id": "a", "category": "Music" })).unwrap();
        assert_eq!(single.category_ids(), vec!["music"]);
        let many = parse_event(&json!({ "id": "b", "categories": ["Tech", "Family"] })).unwrap();
        assert_eq!(many.category_ids(), vec!["tech", "family"]);
        let both = parse_event(&json!({ "id": "c", "category": "Music", "categories": ["Tech", "music"] })).unwrap();
        assert_eq!(both.category_ids(), vec!["tech", "music"]);
    }

    #[test]
    fn test_find_event() {
        let events = parse_event_list(&json!([{ "id": "a" }, { "id": "b" }])).unwrap();
        assert_eq!(find_event(&events, "b").unwrap().id, "b");
        assert_eq!(
            find_event(&events, "c"),
            Err(CatalogError::EventNotFound("c".into()))
        );
    }
}
