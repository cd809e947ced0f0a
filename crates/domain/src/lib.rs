#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod admin;
mod cart;
mod checkout;
mod debounce;
mod error;
mod location;
mod name;
mod order;
mod product;
mod service;
mod session;
mod shop;
mod user;

pub use admin::*;
pub use cart::*;
pub use checkout::*;
pub use debounce::*;
pub use error::*;
pub use location::*;
pub use name::*;
pub use order::*;
pub use product::*;
pub use service::*;
pub use session::*;
pub use shop::*;
pub use user::*;
