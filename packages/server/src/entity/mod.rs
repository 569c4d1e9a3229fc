pub mod feature_flag;
pub mod product;
pub mod product_metadata;
pub mod purchase;
pub mod sale_category;
pub mod sale_price;
pub mod user;
pub mod user_cart;
