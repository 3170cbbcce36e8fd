//! flowwave — keyword-triggered WhatsApp autoresponder.

pub mod automation;
pub mod config;
pub mod error;
pub mod routes;
pub mod transport;
