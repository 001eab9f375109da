// kiln-market/src/models/notice.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeVariant {
  Default,
  Destructive,
}

/// Feedback for the person who triggered an operation ("Added to Cart", "Insufficient Stock", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
  pub title: String,
  pub description: String,
  pub variant: NoticeVariant,
}

impl Notice {
  pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
    Self {
      title: title.into(),
      description: description.into(),
      variant: NoticeVariant::Default,
    }
  }

  pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
    Self {
      title: title.into(),
      description: description.into(),
      variant: NoticeVariant::Destructive,
    }
  }
}
