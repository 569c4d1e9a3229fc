pub mod auth;
pub mod cart;
pub mod checkout;
pub mod flag;
pub mod product;
pub mod purchase;
pub mod sale;
pub mod shared;
pub mod vault;
