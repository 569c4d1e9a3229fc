mod common;

mod cart;
mod flags;
mod payment_vault;
mod purchases;
mod sale;
