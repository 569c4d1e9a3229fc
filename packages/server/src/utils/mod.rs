pub mod hash;
pub mod jwt;
pub mod notify;
pub mod payment;
pub mod sale;
pub mod vault;
