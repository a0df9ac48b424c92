//! A client for a personal expense tracking service.
//!
//! The service stores each user's transactions and computes their balance. This crate keeps a
//! local view of one user's transactions and summary in sync with it (`TransactionSync`),
//! validates and submits new transactions (`create`), and maps identity-provider errors to
//! messages (`auth`). The `expense` binary is a command-line front end over all of this.

pub mod api;
pub mod args;
pub mod auth;
pub mod commands;
mod config;
pub mod create;
mod error;
pub mod model;
pub mod notify;
mod session;
pub mod sync;
mod utils;


pub use api::Mode;
pub use config::Config;
pub use error::{Error, ErrorType, Result};
pub use session::Session;
pub use sync::TransactionSync;
