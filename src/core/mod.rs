//! Scan configuration and content hashing

pub mod config;
pub mod hasher;

pub use config::ScanConfig;
pub use hasher::{hash_file, ReadError, DIGEST_HEX_LEN};
