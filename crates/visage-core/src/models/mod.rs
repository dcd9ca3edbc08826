//! Configuration and model artifact data.

pub mod config;

#[cfg(feature = "embedded-model")]
pub mod embedded;
