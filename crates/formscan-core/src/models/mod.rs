//! Data models for application records and configuration.

pub mod config;
pub mod record;
