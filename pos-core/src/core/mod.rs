//! Core configuration

pub mod config;

pub use config::{CheckoutSettings, Config};
