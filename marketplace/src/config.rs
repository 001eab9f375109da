// kiln-market/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  /// Load the bundled demo catalog on startup; otherwise the stores start empty.
  pub seed_demo_data: bool,
  /// Where the current buyer id is remembered between runs.
  pub session_file: PathBuf,
  /// Simulated payment processing time.
  pub checkout_processing: Duration,
  pub order_email_sender: String,
  pub log_json: bool,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 8080,
      seed_demo_data: true,
      session_file: PathBuf::from(".kiln_session"),
      checkout_processing: Duration::from_millis(1500),
      order_email_sender: "orders@kiln.example".to_string(),
      log_json: false,
    }
  }
}

fn parse_var<T>(var_name: &str, default: T) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  match env::var(var_name) {
    Ok(raw) => raw
      .trim()
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", var_name, raw, e))),
    Err(_) => Ok(default),
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    let defaults = Self::default();

    let server_host = env::var("SERVER_HOST").unwrap_or(defaults.server_host);
    let server_port = parse_var("SERVER_PORT", defaults.server_port)?;
    let seed_demo_data = parse_var("SEED_DEMO_DATA", defaults.seed_demo_data)?;
    let session_file = env::var("SESSION_FILE").map(PathBuf::from).unwrap_or(defaults.session_file);
    let processing_ms = parse_var("CHECKOUT_PROCESSING_MS", 1500u64)?;
    let order_email_sender = env::var("ORDER_EMAIL_SENDER").unwrap_or(defaults.order_email_sender);
    let log_json = parse_var("LOG_JSON", defaults.log_json)?;

    if !order_email_sender.contains('@') {
      return Err(AppError::Config(format!(
        "ORDER_EMAIL_SENDER '{}' is not an email address",
        order_email_sender
      )));
    }

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      seed_demo_data,
      session_file,
      checkout_processing: Duration::from_millis(processing_ms),
      order_email_sender,
      log_json,
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}
