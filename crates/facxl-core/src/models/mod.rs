//! Data models for line items, vendors and configuration.

pub mod config;
pub mod record;
