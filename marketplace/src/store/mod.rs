// kiln-market/src/store/mod.rs

//! In-memory stores seeded from the demo catalog.

pub mod carts;
pub mod catalog;
pub mod favorites;
pub mod ledger;
pub mod market;
pub mod messages;
pub mod seed;
pub mod session;

pub use catalog::{Catalog, SellerDashboard, ALL_CATEGORIES};
pub use market::{CartMutation, Inbox, Marketplace, PlacedOrder, ProductChange, ProductRemoval};
pub use seed::DemoData;
