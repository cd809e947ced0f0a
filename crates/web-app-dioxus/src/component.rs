pub mod address;
pub mod element;
pub mod form;
pub mod navbar;
pub mod order;
pub mod product;
