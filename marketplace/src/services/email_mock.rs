// kiln-market/src/services/email_mock.rs

use crate::errors::{AppError, Result as AppResult};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct SentEmailInfo {
  pub to: String,
  pub from: String,
  pub subject: String,
  pub body_preview: String,
  pub message_id: String,
}

/// Pretends to deliver an email. Recipients on the reserved `.invalid` TLD bounce.
pub async fn send_mock_email(to: &str, from: &str, subject: &str, html_body: &str) -> AppResult<SentEmailInfo> {
  info!("Simulating sending email: To='{}', From='{}', Subject='{}'", to, from, subject);
  tokio::time::sleep(std::time::Duration::from_millis(20)).await;

  if !to.contains('@') || to.trim_end().ends_with(".invalid") {
    warn!(recipient = to, "Simulated email bounce.");
    return Err(AppError::Internal(format!("Mail to '{}' bounced", to)));
  }

  let body_preview = html_body.chars().take(50).collect::<String>() + "...";
  let message_id = format!("mock_email_{}", uuid::Uuid::new_v4());
  info!("Mock email sent successfully. Message ID: {}", message_id);

  Ok(SentEmailInfo {
    to: to.to_string(),
    from: from.to_string(),
    subject: subject.to_string(),
    body_preview,
    message_id,
  })
}
