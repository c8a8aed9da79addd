//! # boxoffice-sdk
//!
//! Client-side ordering logic for the **Boxoffice** ticketing platform.
//!
//! Pick tickets → price the order → save a checkout intent.
//!
//! ## Quick Start
//!
//! ```rust
//! use boxoffice_sdk::{EventCheckout, FeePolicy, MemoryStore, TicketTier};
//! use boxoffice_sdk::catalog::Event;
//!
//! let event = Event {
//!     id: "afrofest".into(),
//!     title: "Afrofest".into(),
//!     ticket_tiers: vec![
//!         TicketTier::new("early", "Early Bird", 5_000).with_available(120),
//!         TicketTier::new("vip", "VIP", 20_000).with_available(30),
//!     ],
//!     ..Event::default()
//! };
//!
//! let mut session = MemoryStore::new();
//! let mut view = EventCheckout::open(&session, event, FeePolicy::default());
//! view.set_quantity("early", 2);
//! view.set_quantity("vip", 1);
//! assert_eq!(view.summary().grand_total, 31_800);
//!
//! let started = view.begin_checkout(&mut session, None).unwrap();
//! assert_eq!(started.intent.fees, 1_800);
//! ```

pub mod calculator;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod constants;
pub mod contact;
pub mod errors;
pub mod fees;
pub mod filter;
pub mod intent;
pub mod session;
pub mod store;
pub mod tier;

pub use calculator::{recompute, OrderCalculator, OrderLine, OrderSummary};
pub use checkout::{begin_checkout, load_intent, restore_selection, CheckoutStarted, EventCheckout, Handoff};
pub use errors::{CatalogError, CheckoutError, ConfigError, ContactError, StorageError};
pub use fees::FeePolicy;
pub use intent::CheckoutIntent;
pub use session::Session;
pub use store::{FileStore, MemoryStore, SessionStore};
pub use tier::{Selection, TicketTier};
