// kiln-market/src/models/mod.rs

//! Plain data types shared by the stores, flows and HTTP layer.

pub mod buyer;
pub mod cart;
pub mod checkout;
pub mod message;
pub mod notice;
pub mod product;
pub mod seller;
pub mod transaction;

pub use buyer::Buyer;
pub use cart::{Cart, CartItem, CartView, LineChange, QuantityOutcome, StockShortfall};
pub use checkout::CheckoutForm;
pub use message::Message;
pub use notice::{Notice, NoticeVariant};
pub use product::{Product, ProductDraft};
pub use seller::Seller;
pub use transaction::{Transaction, TransactionStatus};
