//! Server module.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod constants;
pub mod errors;
mod event_type;
pub mod ghapi;
mod health;
mod judge;
mod metrics;
pub mod middlewares;
pub mod server;
#[cfg(test)]
mod testutils;
mod utils;
mod webhook;

pub use errors::{Result, ServerError};
