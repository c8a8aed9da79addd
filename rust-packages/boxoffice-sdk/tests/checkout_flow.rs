// Catalog response -> ticket selection -> checkout intent -> revisit

use boxoffice_sdk::catalog::{find_event, parse_event_list};
use boxoffice_sdk::checkout::checkout_path;
use boxoffice_sdk::{
    CheckoutError, EventCheckout, FeePolicy, FileStore, Handoff, MemoryStore, Session, SessionStore,
};
use serde_json::json;

fn catalog_response() -> serde_json::Value {
    json!({
        "events": [
            {
                "id": "afrofest-2026",
                "title": "Afrofest 2026",
                "venueName": "Tafawa Balewa Square",
                "startDate": "2026-12-19T16:00:00+01:00",
                "category": "Festival",
                "ticketTiers": [
                    { "id": "early", "name": "Early Bird", "price": 5000, "availableQuantity": 120 },
                    { "id": "vip", "name": "VIP", "price": 20000, "availableQuantity": 30 },
                    { "id": "kids", "name": "Under 12", "price": 0 }
                ]
            },
            {
                "id": "standup",
                "title": "Standup Sundays",
                "ticketTiers": [
                    { "id": "door", "title": "Door", "amount": 3000, "qtyAvailable": 0 }
                ]
            }
        ]
    })
}

#[test]
fn test_full_checkout_and_revisit() {
    let events = parse_event_list(&catalog_response()).unwrap();
    let event = find_event(&events, "afrofest-2026").unwrap().clone();
    let mut store = MemoryStore::new();

    let mut view = EventCheckout::open(&store, event.clone(), FeePolicy::default());
    assert!(view.summary().lines.is_empty());
    view.set_quantity("early", 2);
    view.set_quantity("vip", 1);
    view.set_quantity("kids", 3);

    let summary = view.summary().clone();
    assert_eq!(summary.count, 6);
    assert_eq!(summary.count_paid, 3);
    assert_eq!(summary.ticket_subtotal, 30_000);
    assert_eq!(summary.fees, 1_800);
    assert_eq!(summary.grand_total, 31_800);

    let started = view.begin_checkout(&mut store, None).unwrap();
    assert_eq!(started.handoff, Handoff::Navigate(checkout_path("afrofest-2026")));
    assert_eq!(started.intent.venue_name, "Tafawa Balewa Square");
    assert_eq!(started.intent.starts_at.as_deref(), Some("2026-12-19T16:00:00+01:00"));
    assert_eq!(started.intent.currency, "NGN");

    let raw = store.get("checkout:afrofest-2026").unwrap().unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored["selection"], json!({ "early": 2, "kids": 3, "vip": 1 }));
    assert_eq!(stored["grandTotal"], 31_800);
    assert_eq!(stored["feeFormula"], "5% + ₦100 per paid ticket");

    let revisit = EventCheckout::open(&store, event, FeePolicy::default());
    assert_eq!(revisit.calculator().selection(), view.calculator().selection());
    assert_eq!(revisit.summary(), &summary);
}

#[test]
fn test_sold_out_event_cannot_check_out() {
    let events = parse_event_list(&catalog_response()).unwrap();
    let event = find_event(&events, "standup").unwrap().clone();
    let mut store = MemoryStore::new();

    let mut view = EventCheckout::open(&store, event, FeePolicy::default());
    assert!(view.calculator().all_sold_out());
    assert_eq!(view.set_quantity("door", 2), 0);
    assert_eq!(
        view.begin_checkout(&mut store, None),
        Err(CheckoutError::InvalidState { event_id: "standup".into() })
    );
}

#[test]
fn test_file_backed_session_spans_handles() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let events = parse_event_list(&catalog_response()).unwrap();
    let event = find_event(&events, "afrofest-2026").unwrap().clone();

    {
        let mut store = FileStore::new(&path);
        let mut view = EventCheckout::open(&store, event.clone(), FeePolicy::default());
        view.set_quantity("vip", 2);
        view.begin_checkout(&mut store, None).unwrap();
    }

    let store = FileStore::new(&path);
    let revisit = EventCheckout::open(&store, event, FeePolicy::default());
    assert_eq!(revisit.calculator().quantity("vip"), 2);
    assert_eq!(revisit.summary().grand_total, 42_200);
}

#[test]
fn test_logout_clears_saved_checkouts() {
    let events = parse_event_list(&catalog_response()).unwrap();
    let event = find_event(&events, "afrofest-2026").unwrap().clone();

    let mut session = Session::init(MemoryStore::new());
    session.login(None, "tok_abc").unwrap();

    let mut view = EventCheckout::open(session.store(), event.clone(), FeePolicy::default());
    view.set_quantity("early", 1);
    view.begin_checkout(session.store_mut(), None).unwrap();

    session.logout().unwrap();
    let revisit = EventCheckout::open(session.store(), event, FeePolicy::default());
    assert!(revisit.calculator().selection().is_empty());
    assert!(session.authorization_header().is_none());
}
