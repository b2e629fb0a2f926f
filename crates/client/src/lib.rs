//! Async client for the Coincraddle exchange REST API.
//!
//! One method per endpoint. Each call builds its query parameters, attaches
//! the API key, issues a GET and hands back the decoded JSON body.

pub mod client;
pub mod error;
mod params;

#[cfg(test)]
mod mock_server;

pub use client::{CoincraddleClient, BASE_URL, REQUEST_TIMEOUT};
pub use coincraddle_core::{EmergencyAction, OrderStatus, RateType, HISTORY_LIMIT_MAX};
pub use error::ClientError;
