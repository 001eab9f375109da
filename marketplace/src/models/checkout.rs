// kiln-market/src/models/checkout.rs

use crate::errors::FieldErrors;
use serde::{Deserialize, Serialize};

/// Shipping and card details submitted at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutForm {
  pub name: String,
  pub email: String,
  pub address: String,
  pub city: String,
  pub state: String,
  pub zip: String,
  pub card_name: String,
  pub card_number: String,
  pub expiry: String,
  pub cvv: String,
}

impl CheckoutForm {
  /// Every field is required; all missing fields are reported together.
  pub fn validate(&self) -> Result<(), FieldErrors> {
    let required: [(&str, &str, &str); 10] = [
      ("name", self.name.as_str(), "Name is required"),
      ("email", self.email.as_str(), "Email is required"),
      ("address", self.address.as_str(), "Address is required"),
      ("city", self.city.as_str(), "City is required"),
      ("state", self.state.as_str(), "State is required"),
      ("zip", self.zip.as_str(), "ZIP code is required"),
      ("cardName", self.card_name.as_str(), "Name on card is required"),
      ("cardNumber", self.card_number.as_str(), "Card number is required"),
      ("expiry", self.expiry.as_str(), "Expiry date is required"),
      ("cvv", self.cvv.as_str(), "CVV is required"),
    ];

    let mut errors = FieldErrors::new();
    for (field, value, message) in required {
      if value.trim().is_empty() {
        errors.insert(field.to_string(), message.to_string());
      }
    }
    if !errors.contains_key("email") && !self.email.contains('@') {
      errors.insert("email".to_string(), "Please enter a valid email address".to_string());
    }

    if errors.is_empty() {
      Ok(())
    } else {
      Err(errors)
    }
  }
}
