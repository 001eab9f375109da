// tests/common/mod.rs
#![allow(dead_code)]

use kiln_market::config::AppConfig;
use kiln_market::models::CheckoutForm;
use kiln_market::state::AppState;
use kiln_market::store::{DemoData, Marketplace};
use once_cell::sync::Lazy;
use std::time::Duration;
use tracing::Level;

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

pub fn test_config() -> AppConfig {
  AppConfig {
    checkout_processing: Duration::from_millis(0),
    ..AppConfig::default()
  }
}

/// Fresh demo marketplace with every flow registered. Nothing is persisted.
pub fn demo_state() -> AppState {
  setup_tracing();
  let data = DemoData::bundled().expect("bundled demo data loads");
  AppState::new(test_config(), Marketplace::from_data(data, None))
}

/// Demo marketplace whose mock payment takes `processing` to settle.
pub fn slow_checkout_state(processing: Duration) -> AppState {
  setup_tracing();
  let data = DemoData::bundled().expect("bundled demo data loads");
  let config = AppConfig {
    checkout_processing: processing,
    ..test_config()
  };
  AppState::new(config, Marketplace::from_data(data, None))
}

pub fn valid_checkout_form() -> CheckoutForm {
  CheckoutForm {
    name: "Alex Taylor".into(),
    email: "alex@example.com".into(),
    address: "12 Pike St".into(),
    city: "Seattle".into(),
    state: "WA".into(),
    zip: "98101".into(),
    card_name: "Alex Taylor".into(),
    card_number: "4242424242424242".into(),
    expiry: "12/30".into(),
    cvv: "123".into(),
  }
}
