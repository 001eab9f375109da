// kiln-market/src/state.rs

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::pipelines;
use crate::store::{DemoData, Marketplace};
use kiln_flow::FlowRegistry;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub market: Arc<Marketplace>,
  pub flows: Arc<FlowRegistry<AppError>>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  /// Wires the stores to a registry holding every application flow.
  pub fn new(config: AppConfig, market: Marketplace) -> Self {
    let flows = FlowRegistry::<AppError>::new();
    pipelines::register_all_flows(&flows);
    Self {
      market: Arc::new(market),
      flows: Arc::new(flows),
      config: Arc::new(config),
    }
  }

  /// Builds the stores the configuration asks for: the demo catalog or nothing.
  pub fn from_config(config: AppConfig) -> Result<Self> {
    let data = if config.seed_demo_data {
      DemoData::bundled()?
    } else {
      tracing::info!("Demo data disabled; starting with empty stores.");
      DemoData::default()
    };
    let market = Marketplace::from_data(data, Some(config.session_file.clone()));
    Ok(Self::new(config, market))
  }
}
