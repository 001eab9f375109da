// kiln-market/src/lib.rs

//! Kiln: a demo marketplace for handmade ceramics. Catalog browsing, a
//! per-buyer cart kept consistent with seller inventory, favorites,
//! buyer/seller messaging, a seller dashboard and a mock checkout.

pub mod config;
pub mod errors;
pub mod models;
pub mod pipelines;
pub mod services;
pub mod state;
pub mod store;
pub mod web;
