pub mod auth;
pub mod cart;
pub mod checkout;
pub mod flags;
pub mod health;
pub mod payment_vault;
pub mod products;
pub mod purchases;
pub mod sale;
