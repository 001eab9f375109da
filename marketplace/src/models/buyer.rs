// kiln-market/src/models/buyer.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Buyer {
  pub id: String,
  pub name: String,
  pub location: String,
  pub avatar: String,
  /// Favorites the buyer starts with; the live set is kept by the favorites store.
  #[serde(default)]
  pub favorites: Vec<String>,
}
