#![warn(clippy::pedantic)]

pub mod config;
pub mod log;

mod format;
mod service;
mod settings;
mod token;

pub use format::*;
pub use service::*;
pub use settings::*;
pub use token::*;
