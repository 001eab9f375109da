// kiln-market/src/models/seller.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seller {
  pub id: String,
  pub name: String,
  pub photo: String,
  pub location: String,
  pub style: String,
  pub bio: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub story: Option<String>,
  #[serde(default)]
  pub studio_images: Vec<String>,
  #[serde(default)]
  pub featured: bool,
}
