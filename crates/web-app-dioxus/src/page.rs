pub mod account;
pub mod admin;
pub mod cart;
pub mod checkout;
pub mod landing;
pub mod login;
pub mod not_found;
pub mod product;
pub mod revenue;
pub mod search;
pub mod seller;
pub mod shop;
pub mod shopping;
